//! Alias table from query keys to operators.

use std::collections::HashMap;

use once_cell::sync::Lazy;

use super::operators::Operator;

/// Built once on first lookup, read-only afterwards.
static REGISTRY: Lazy<HashMap<&'static str, Operator>> = Lazy::new(|| {
    Operator::ALL
        .iter()
        .flat_map(|op| op.aliases().iter().map(move |alias| (*alias, *op)))
        .collect()
});

/// Resolve a query key (any case) to its operator.
pub fn lookup(key: &str) -> Option<Operator> {
    REGISTRY.get(key.to_lowercase().as_str()).copied()
}

/// All recognized aliases, sorted.
pub fn aliases() -> Vec<&'static str> {
    let mut aliases: Vec<&'static str> = REGISTRY.keys().copied().collect();
    aliases.sort_unstable();
    aliases
}
