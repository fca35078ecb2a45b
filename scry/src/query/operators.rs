//! Per-field operator definitions.
//!
//! Every searchable key resolves to one [`Operator`]. An operator turns the
//! term's value (and optional comparison) into a [`Predicate`], or returns
//! `None` when the term should be ignored.

use super::helpers::{
    is_integer, parse_colors, parse_comparison, parse_even_odd, parse_integer, substring,
};
use super::predicate::{Field, Predicate};
use super::term::CompareOp;

/// Rarities in ascending order.
const RARITY_ORDER: [&str; 4] = ["common", "uncommon", "rare", "mythic"];

/// Layouts hidden by `exclude:extras`.
pub const EXTRA_LAYOUTS: &[&str] = &[
    "token",
    "double_faced_token",
    "emblem",
    "art_series",
    "planar",
    "scheme",
    "vanguard",
];

/// Type line carried by memorabilia and other non-game entries.
pub const PLACEHOLDER_TYPE_LINE: &str = "Card";

/// A search operator, one per queryable field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Color,
    Identity,
    Type,
    Oracle,
    Name,
    FlavorName,
    ManaValue,
    Power,
    Toughness,
    Loyalty,
    Set,
    Rarity,
    Keyword,
    Layout,
    Exclude,
    Language,
}

impl Operator {
    pub const ALL: [Operator; 16] = [
        Operator::Color,
        Operator::Identity,
        Operator::Type,
        Operator::Oracle,
        Operator::Name,
        Operator::FlavorName,
        Operator::ManaValue,
        Operator::Power,
        Operator::Toughness,
        Operator::Loyalty,
        Operator::Set,
        Operator::Rarity,
        Operator::Keyword,
        Operator::Layout,
        Operator::Exclude,
        Operator::Language,
    ];

    /// Lower-case keys that select this operator.
    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            Operator::Color => &["c", "color"],
            Operator::Identity => &["id", "identity"],
            Operator::Type => &["t", "type"],
            Operator::Oracle => &["o", "oracle"],
            Operator::Name => &["name"],
            Operator::FlavorName => &["fn", "flavorname", "flavor"],
            Operator::ManaValue => &["mv", "manavalue", "cmc"],
            Operator::Power => &["pow", "power"],
            Operator::Toughness => &["tou", "toughness"],
            Operator::Loyalty => &["loy", "loyalty"],
            Operator::Set => &["e", "s", "set", "edition"],
            Operator::Rarity => &["r", "rarity"],
            Operator::Keyword => &["kw", "keyword"],
            Operator::Layout => &["layout"],
            Operator::Exclude => &["exclude"],
            Operator::Language => &["lang", "language"],
        }
    }

    /// Reject values outright. A rejected term is dropped.
    pub fn validate(self, value: &str) -> bool {
        match self {
            Operator::Set | Operator::Layout | Operator::Language => is_code(value),
            _ => true,
        }
    }

    /// Build the predicate for `value`, or `None` to ignore the term.
    pub fn build(self, value: &str, op: Option<CompareOp>) -> Option<Predicate> {
        match self {
            Operator::Color => Some(colors(Field::Colors, value, op)),
            Operator::Identity => Some(colors(Field::ColorIdentity, value, op)),
            Operator::Type => Some(substring(Field::TypeLine, value)),
            Operator::Oracle => Some(substring(Field::OracleText, value)),
            Operator::FlavorName => Some(substring(Field::FlavorName, value)),
            Operator::Keyword => Some(substring(Field::Keywords, value)),
            Operator::Name => Some(Predicate::any_of(vec![
                substring(Field::Name, value),
                substring(Field::FlavorName, value),
            ])),
            Operator::ManaValue => numeric(Field::ManaValue, value, op),
            Operator::Power => numeric(Field::Power, value, op),
            Operator::Toughness => numeric(Field::Toughness, value, op),
            Operator::Loyalty => numeric(Field::Loyalty, value, op),
            Operator::Set => Some(equality(Field::Set, &value.to_lowercase(), op)),
            Operator::Layout => Some(equality(Field::Layout, &value.to_lowercase(), op)),
            Operator::Language => Some(equality(Field::Lang, &value.to_lowercase(), op)),
            Operator::Rarity => Some(rarity(value, op)),
            Operator::Exclude => exclude(value),
        }
    }
}

/// Set codes, layouts and languages: non-empty, no punctuation beyond `_`/`-`.
fn is_code(value: &str) -> bool {
    !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

fn colors(field: Field, value: &str, op: Option<CompareOp>) -> Predicate {
    let colors = parse_colors(value);
    if colors.is_empty() {
        return Predicate::NoColors { field };
    }

    match op {
        Some(CompareOp::Eq) => Predicate::ColorsExactly { field, colors },
        Some(CompareOp::Lte) => Predicate::ColorsWithin { field, colors },
        _ => Predicate::ColorsInclude { field, colors },
    }
}

/// Equality, negated for `!=`.
fn equality(field: Field, value: &str, op: Option<CompareOp>) -> Predicate {
    let eq = Predicate::Equals {
        field,
        value: value.to_string(),
    };
    if op == Some(CompareOp::NotEq) {
        eq.negate()
    } else {
        eq
    }
}

/// Numbers stored as text: power, toughness, loyalty, mana value.
fn numeric(field: Field, value: &str, op: Option<CompareOp>) -> Option<Predicate> {
    if let Some(parity) = parse_even_odd(field, value) {
        return Some(parity);
    }

    let (op, value) = match op {
        Some(op) => (op, value),
        // `mv:>=3` carries its operator in the value
        None => match parse_comparison(value) {
            (op, Some(n)) => {
                return Some(Predicate::Compare {
                    field,
                    cmp: op,
                    value: n,
                })
            }
            (op, None) => {
                let trimmed = value.trim();
                (op, trimmed.strip_prefix(op.symbol()).unwrap_or(trimmed))
            }
        },
    };

    if !is_integer(value) {
        return match op {
            CompareOp::Eq | CompareOp::NotEq => Some(equality(field, value, Some(op))),
            _ => None,
        };
    }

    let value = parse_integer(value)?;
    Some(Predicate::Compare {
        field,
        cmp: op,
        value,
    })
}

fn rarity_rank(value: &str) -> Option<usize> {
    let value = match value {
        "c" => "common",
        "u" => "uncommon",
        "r" => "rare",
        "m" => "mythic",
        other => other,
    };
    RARITY_ORDER.iter().position(|r| *r == value)
}

fn rarity(value: &str, op: Option<CompareOp>) -> Predicate {
    let value = value.to_lowercase();
    let Some(rank) = rarity_rank(&value) else {
        return equality(Field::Rarity, &value, op);
    };

    let slice = match op {
        Some(CompareOp::Gt) => &RARITY_ORDER[rank + 1..],
        Some(CompareOp::Gte) => &RARITY_ORDER[rank..],
        Some(CompareOp::Lt) => &RARITY_ORDER[..rank],
        Some(CompareOp::Lte) => &RARITY_ORDER[..=rank],
        _ => return equality(Field::Rarity, RARITY_ORDER[rank], op),
    };

    Predicate::OneOf {
        field: Field::Rarity,
        values: slice.iter().map(|r| r.to_string()).collect(),
    }
}

fn exclude(value: &str) -> Option<Predicate> {
    if !value.eq_ignore_ascii_case("extras") {
        return None;
    }

    Some(Predicate::all_of(vec![
        Predicate::OneOf {
            field: Field::Layout,
            values: EXTRA_LAYOUTS.iter().map(|l| l.to_string()).collect(),
        }
        .negate(),
        Predicate::Equals {
            field: Field::TypeLine,
            value: PLACEHOLDER_TYPE_LINE.to_string(),
        }
        .negate(),
    ]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::predicate::Color;

    #[test]
    fn test_color_default_includes() {
        assert_eq!(
            Operator::Color.build("red", None),
            Some(Predicate::ColorsInclude {
                field: Field::Colors,
                colors: vec![Color::R],
            })
        );
    }

    #[test]
    fn test_color_operators() {
        let exact = Operator::Color.build("ur", Some(CompareOp::Eq));
        assert!(matches!(exact, Some(Predicate::ColorsExactly { .. })));

        let within = Operator::Identity.build("ur", Some(CompareOp::Lte));
        assert!(matches!(
            within,
            Some(Predicate::ColorsWithin {
                field: Field::ColorIdentity,
                ..
            })
        ));

        let gte = Operator::Color.build("ur", Some(CompareOp::Gte));
        assert!(matches!(gte, Some(Predicate::ColorsInclude { .. })));
    }

    #[test]
    fn test_color_other_operators_fall_back_to_include() {
        for op in [CompareOp::Gt, CompareOp::Lt, CompareOp::NotEq] {
            let p = Operator::Color.build("g", Some(op));
            assert!(matches!(p, Some(Predicate::ColorsInclude { .. })), "{:?}", op);
        }
    }

    #[test]
    fn test_colorless() {
        for value in ["colorless", "c", ""] {
            assert_eq!(
                Operator::Color.build(value, Some(CompareOp::Eq)),
                Some(Predicate::NoColors {
                    field: Field::Colors,
                })
            );
        }
    }

    #[test]
    fn test_type_escapes() {
        assert_eq!(
            Operator::Type.build("Legendary.*", None),
            Some(Predicate::Matches {
                field: Field::TypeLine,
                pattern: r"Legendary\.\*".to_string(),
            })
        );
    }

    #[test]
    fn test_name_checks_flavor_name() {
        let p = Operator::Name.build("bolt", None).unwrap();
        assert_eq!(
            p,
            Predicate::Or {
                any: vec![
                    Predicate::Matches {
                        field: Field::Name,
                        pattern: "bolt".to_string(),
                    },
                    Predicate::Matches {
                        field: Field::FlavorName,
                        pattern: "bolt".to_string(),
                    },
                ]
            }
        );
    }

    #[test]
    fn test_numeric_compare() {
        assert_eq!(
            Operator::ManaValue.build("3", Some(CompareOp::Gte)),
            Some(Predicate::Compare {
                field: Field::ManaValue,
                cmp: CompareOp::Gte,
                value: 3,
            })
        );
        assert_eq!(
            Operator::Toughness.build("-1", Some(CompareOp::Eq)),
            Some(Predicate::Compare {
                field: Field::Toughness,
                cmp: CompareOp::Eq,
                value: -1,
            })
        );
    }

    #[test]
    fn test_numeric_colon_defaults_to_eq() {
        assert_eq!(
            Operator::Power.build("4", None),
            Some(Predicate::Compare {
                field: Field::Power,
                cmp: CompareOp::Eq,
                value: 4,
            })
        );
    }

    #[test]
    fn test_numeric_operator_in_value() {
        assert_eq!(
            Operator::ManaValue.build(">=3", None),
            Some(Predicate::Compare {
                field: Field::ManaValue,
                cmp: CompareOp::Gte,
                value: 3,
            })
        );
    }

    #[test]
    fn test_numeric_symbolic_equality() {
        assert_eq!(
            Operator::Power.build("*", Some(CompareOp::Eq)),
            Some(Predicate::Equals {
                field: Field::Power,
                value: "*".to_string(),
            })
        );
        assert_eq!(
            Operator::Loyalty.build("X", Some(CompareOp::NotEq)),
            Some(
                Predicate::Equals {
                    field: Field::Loyalty,
                    value: "X".to_string(),
                }
                .negate()
            )
        );
        assert_eq!(
            Operator::Power.build("*", None),
            Some(Predicate::Equals {
                field: Field::Power,
                value: "*".to_string(),
            })
        );
    }

    #[test]
    fn test_numeric_symbolic_ordering_dropped() {
        assert_eq!(Operator::Power.build("*", Some(CompareOp::Gte)), None);
        assert_eq!(Operator::ManaValue.build("x", Some(CompareOp::Lt)), None);
        assert_eq!(Operator::ManaValue.build(">x", None), None);
    }

    #[test]
    fn test_numeric_overflow_clamps() {
        assert_eq!(
            Operator::ManaValue.build("99999999999999999999", Some(CompareOp::Gte)),
            Some(Predicate::Compare {
                field: Field::ManaValue,
                cmp: CompareOp::Gte,
                value: i64::MAX,
            })
        );
        assert_eq!(
            Operator::Power.build("<-99999999999999999999", None),
            Some(Predicate::Compare {
                field: Field::Power,
                cmp: CompareOp::Lt,
                value: i64::MIN,
            })
        );
    }

    #[test]
    fn test_numeric_symbolic_operator_in_value() {
        assert_eq!(
            Operator::Power.build("!=*", None),
            Some(
                Predicate::Equals {
                    field: Field::Power,
                    value: "*".to_string(),
                }
                .negate()
            )
        );
    }

    #[test]
    fn test_numeric_even_odd() {
        assert_eq!(
            Operator::ManaValue.build("even", None),
            Some(Predicate::Modulo {
                field: Field::ManaValue,
                divisor: 2,
                remainder: 0,
            })
        );
    }

    #[test]
    fn test_set_normalized() {
        assert_eq!(
            Operator::Set.build("WAR", None),
            Some(Predicate::Equals {
                field: Field::Set,
                value: "war".to_string(),
            })
        );
        assert!(Operator::Set.validate("war"));
        assert!(Operator::Layout.validate("double_faced_token"));
        assert!(!Operator::Set.validate(""));
        assert!(!Operator::Language.validate("e n"));
        assert!(!Operator::Set.validate("w.a.r"));
    }

    #[test]
    fn test_rarity_slices() {
        let values = |p: Option<Predicate>| match p {
            Some(Predicate::OneOf { values, .. }) => values,
            other => panic!("Expected OneOf, got {:?}", other),
        };
        assert_eq!(
            values(Operator::Rarity.build("uncommon", Some(CompareOp::Gt))),
            vec!["rare", "mythic"]
        );
        assert_eq!(
            values(Operator::Rarity.build("rare", Some(CompareOp::Gte))),
            vec!["rare", "mythic"]
        );
        assert_eq!(
            values(Operator::Rarity.build("rare", Some(CompareOp::Lt))),
            vec!["common", "uncommon"]
        );
        assert_eq!(
            values(Operator::Rarity.build("u", Some(CompareOp::Lte))),
            vec!["common", "uncommon"]
        );
        assert_eq!(
            values(Operator::Rarity.build("mythic", Some(CompareOp::Gt))),
            Vec::<String>::new()
        );
    }

    #[test]
    fn test_rarity_equality() {
        assert_eq!(
            Operator::Rarity.build("M", None),
            Some(Predicate::Equals {
                field: Field::Rarity,
                value: "mythic".to_string(),
            })
        );
        assert_eq!(
            Operator::Rarity.build("special", Some(CompareOp::Gt)),
            Some(Predicate::Equals {
                field: Field::Rarity,
                value: "special".to_string(),
            })
        );
    }

    #[test]
    fn test_exclude_extras() {
        let p = Operator::Exclude.build("extras", None).unwrap();
        match p {
            Predicate::And { all } => {
                assert_eq!(all.len(), 2);
                assert!(all.iter().all(|p| matches!(p, Predicate::Not { .. })));
            }
            other => panic!("Expected And, got {:?}", other),
        }
        assert_eq!(Operator::Exclude.build("tokens", None), None);
    }

    #[test]
    fn test_all_operators_have_aliases() {
        for op in Operator::ALL {
            assert!(!op.aliases().is_empty(), "{:?}", op);
        }
    }
}
