//! Classification of a single query token.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// `key<op>value`, with the two-character operators tried first.
static COMPARISON: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)^([a-z]+)(>=|<=|!=|>|<|=)(.+)$").expect("comparison pattern is valid")
});

/// Comparison operators for field terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompareOp {
    /// `=` equals
    #[serde(rename = "=")]
    Eq,
    /// `!=` not equals
    #[serde(rename = "!=")]
    NotEq,
    /// `>` greater than
    #[serde(rename = ">")]
    Gt,
    /// `<` less than
    #[serde(rename = "<")]
    Lt,
    /// `>=` greater or equal
    #[serde(rename = ">=")]
    Gte,
    /// `<=` less or equal
    #[serde(rename = "<=")]
    Lte,
}

impl CompareOp {
    /// Parse an operator symbol.
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "=" => Some(CompareOp::Eq),
            "!=" => Some(CompareOp::NotEq),
            ">" => Some(CompareOp::Gt),
            "<" => Some(CompareOp::Lt),
            ">=" => Some(CompareOp::Gte),
            "<=" => Some(CompareOp::Lte),
            _ => None,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            CompareOp::Eq => "=",
            CompareOp::NotEq => "!=",
            CompareOp::Gt => ">",
            CompareOp::Lt => "<",
            CompareOp::Gte => ">=",
            CompareOp::Lte => "<=",
        }
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// A token split into its key, operator and value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedTerm {
    /// Operator key as typed (None = bare name search)
    pub key: Option<String>,
    /// Value to search for
    pub value: String,
    /// Comparison operator (None for `key:value` and bare terms)
    pub operator: Option<CompareOp>,
    /// Leading `-` was present
    pub negated: bool,
}

/// Parse one non-grouping token.
///
/// A leading `-` negates the term. The rest is tried as `key<op>value`, then
/// as `key:value` split at the first colon, and otherwise taken as a bare
/// value.
pub fn parse_term(token: &str) -> ParsedTerm {
    let (negated, body) = match token.strip_prefix('-') {
        Some(rest) if !rest.is_empty() => (true, rest),
        _ => (false, token),
    };

    if let Some(caps) = COMPARISON.captures(body) {
        return ParsedTerm {
            key: Some(caps[1].to_string()),
            value: caps[3].to_string(),
            operator: CompareOp::from_symbol(&caps[2]),
            negated,
        };
    }

    match body.find(':') {
        Some(pos) if pos > 0 => ParsedTerm {
            key: Some(body[..pos].to_string()),
            value: body[pos + 1..].to_string(),
            operator: None,
            negated,
        },
        _ => ParsedTerm {
            key: None,
            value: body.to_string(),
            operator: None,
            negated,
        },
    }
}
