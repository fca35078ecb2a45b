//! Scryfall-style search query compiler.
//!
//! # Syntax Overview
//!
//! - **Bare words**: `bolt` searches card names (and flavor names)
//! - **Field terms**: `key:value`, e.g. `t:goblin`, `c:ur`, `set:war`
//! - **Comparisons**: `key<op>value` with `= != > < >= <=`, e.g. `mv>=3`
//! - **Negation**: `-t:creature`, `-(t:elf or t:goblin)`
//! - **Grouping**: `( ... )`, with `or` between alternatives
//! - **Quoting**: `o:"draw a card"` keeps spaces in one term
//!
//! Terms next to each other are AND-ed. [`compile`] is the entry point; it
//! never fails and silently drops terms it cannot interpret.

mod compiler;
mod helpers;
mod operators;
mod parser;
mod predicate;
mod registry;
mod term;
mod tokenizer;

pub use compiler::compile;
pub use helpers::{escape_pattern, parse_colors, parse_comparison, parse_even_odd};
pub use operators::{Operator, EXTRA_LAYOUTS, PLACEHOLDER_TYPE_LINE};
pub use parser::{build_term, parse_expression, MAX_DEPTH};
pub use predicate::{Color, Field, Predicate};
pub use registry::{aliases, lookup};
pub use term::{parse_term, CompareOp, ParsedTerm};
pub use tokenizer::tokenize;
