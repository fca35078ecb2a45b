//! Query compiler entry point.

use tracing::trace;

use super::parser::parse_expression;
use super::predicate::Predicate;
use super::tokenizer::tokenize;

/// Compile a query string into a predicate.
///
/// Never fails: terms that cannot be understood are dropped, and a query
/// with nothing left matches every card. An unmatched `)` is skipped and
/// parsing resumes after it.
pub fn compile(query: &str) -> Predicate {
    let tokens = tokenize(query);
    trace!(?tokens, "tokenized query");

    let mut parts = Vec::new();
    let mut pos = 0;
    while pos < tokens.len() {
        let (predicate, end) = parse_expression(&tokens, pos);
        parts.extend(predicate);
        // parse_expression only stops early on a stray ')'
        pos = end + 1;
    }

    Predicate::all_of(parts)
}
