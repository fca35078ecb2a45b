//! Recursive descent over the token stream.
//!
//! # Grammar
//!
//! ```text
//! query   := group*
//! group   := item (OR item)*          -- adjacent groups are AND-ed
//! item    := '-'? '(' query ')' | term
//! ```
//!
//! `or` binds tighter than the implicit AND between groups, so
//! `a b or c d` reads as `a AND (b OR c) AND d`.
//!
//! Recursion stops at [`MAX_DEPTH`]; deeper parens (and their negation) are
//! skipped and their contents join the group at the limit.

use tracing::debug;

use super::operators::Operator;
use super::predicate::Predicate;
use super::registry;
use super::term::parse_term;

/// Groups nested deeper than this are merged into the enclosing group.
pub const MAX_DEPTH: usize = 64;

/// Parse tokens from `start` until the end or an unmatched `)`.
///
/// Returns the combined predicate (`None` if every term was dropped) and
/// the index where parsing stopped. A closing `)` is left for the caller.
pub fn parse_expression(tokens: &[String], start: usize) -> (Option<Predicate>, usize) {
    parse_group(tokens, start, 0)
}

fn parse_group(tokens: &[String], start: usize, depth: usize) -> (Option<Predicate>, usize) {
    let mut and_groups: Vec<Predicate> = Vec::new();
    let mut or_group: Vec<Predicate> = Vec::new();
    let mut pos = start;
    // Parens opened past MAX_DEPTH that still await their ')'
    let mut flattened = 0usize;

    while pos < tokens.len() {
        let token = tokens[pos].as_str();

        if token == ")" {
            if flattened == 0 {
                break;
            }
            flattened -= 1;
            pos += 1;
            continue;
        }

        if is_or(token) {
            pos += 1;
            continue;
        }

        let negate_group = token == "-" && tokens.get(pos + 1).map(String::as_str) == Some("(");

        if (token == "(" || negate_group) && depth >= MAX_DEPTH {
            debug!(depth, "flattening group nested too deeply");
            flattened += 1;
            pos += if negate_group { 2 } else { 1 };
            continue;
        }

        if token == "(" || negate_group {
            let open = if negate_group { pos + 1 } else { pos };
            let (nested, end) = parse_group(tokens, open + 1, depth + 1);
            if let Some(nested) = nested {
                or_group.push(if negate_group { nested.negate() } else { nested });
            }
            // Skip the matching ')', if there is one
            pos = (end + 1).min(tokens.len());
        } else {
            if let Some(predicate) = build_term(token) {
                or_group.push(predicate);
            }
            pos += 1;
        }

        if !tokens.get(pos).is_some_and(|next| is_or(next)) {
            close_group(&mut or_group, &mut and_groups);
        }
    }

    close_group(&mut or_group, &mut and_groups);

    let combined = match and_groups.len() {
        0 => None,
        _ => Some(Predicate::all_of(and_groups)),
    };
    (combined, pos)
}

fn is_or(token: &str) -> bool {
    token.eq_ignore_ascii_case("or")
}

/// Move the OR-group into the AND list. Empty groups vanish.
fn close_group(or_group: &mut Vec<Predicate>, and_groups: &mut Vec<Predicate>) {
    if !or_group.is_empty() {
        and_groups.push(Predicate::any_of(std::mem::take(or_group)));
    }
}

/// Build the predicate for one term token, or `None` if it is dropped.
pub fn build_term(token: &str) -> Option<Predicate> {
    let term = parse_term(token);

    let operator = match term.key.as_deref() {
        None => Operator::Name,
        Some(key) => match registry::lookup(key) {
            Some(operator) => operator,
            None => {
                debug!(token, key, "dropping term with unknown operator");
                return None;
            }
        },
    };

    if !operator.validate(&term.value) {
        debug!(token, ?operator, "dropping term rejected by validator");
        return None;
    }

    let Some(predicate) = operator.build(&term.value, term.operator) else {
        debug!(token, ?operator, "dropping term with unsupported value");
        return None;
    };

    Some(if term.negated {
        predicate.negate()
    } else {
        predicate
    })
}
