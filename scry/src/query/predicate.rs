//! Store-agnostic predicate tree produced by the query compiler.
//!
//! Leaves name a card [`Field`] and a constraint on it; interior nodes are
//! AND, OR and NOT. Executors translate the tree into their own filter
//! language (see `store::sql` for the DuckDB rendering).

use std::fmt;

use serde::{Deserialize, Serialize};

use super::term::CompareOp;

/// A searchable card field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Colors,
    ColorIdentity,
    TypeLine,
    OracleText,
    Name,
    FlavorName,
    ManaValue,
    Power,
    Toughness,
    Loyalty,
    Set,
    Rarity,
    Keywords,
    Layout,
    Lang,
}

impl Field {
    pub fn as_str(self) -> &'static str {
        match self {
            Field::Colors => "colors",
            Field::ColorIdentity => "color_identity",
            Field::TypeLine => "type_line",
            Field::OracleText => "oracle_text",
            Field::Name => "name",
            Field::FlavorName => "flavor_name",
            Field::ManaValue => "mana_value",
            Field::Power => "power",
            Field::Toughness => "toughness",
            Field::Loyalty => "loyalty",
            Field::Set => "set",
            Field::Rarity => "rarity",
            Field::Keywords => "keywords",
            Field::Layout => "layout",
            Field::Lang => "lang",
        }
    }

    /// Fields compared in lower case on both sides.
    pub fn is_normalized(self) -> bool {
        matches!(self, Field::Set | Field::Rarity | Field::Layout | Field::Lang)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One of the five colors of mana.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Color {
    W,
    U,
    B,
    R,
    G,
}

impl Color {
    pub const ALL: [Color; 5] = [Color::W, Color::U, Color::B, Color::R, Color::G];

    /// Map a single-letter color code (any case) to its color.
    pub fn from_code(code: char) -> Option<Color> {
        match code.to_ascii_lowercase() {
            'w' => Some(Color::W),
            'u' => Some(Color::U),
            'b' => Some(Color::B),
            'r' => Some(Color::R),
            'g' => Some(Color::G),
            _ => None,
        }
    }

    /// The upper-case code as stored in card data.
    pub fn as_str(self) -> &'static str {
        match self {
            Color::W => "W",
            Color::U => "U",
            Color::B => "B",
            Color::R => "R",
            Color::G => "G",
        }
    }
}

/// A node in the compiled predicate tree.
///
/// `And` with no children matches every card; `Or` with no children matches
/// none. Use [`Predicate::all_of`] and [`Predicate::any_of`] to build
/// combinators so nested groups of the same kind are flattened.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Predicate {
    /// Case-insensitive regex match; `pattern` is already escaped.
    Matches { field: Field, pattern: String },
    /// Exact string equality. Normalized fields compare lower-cased.
    Equals { field: Field, value: String },
    /// Field equals any of the values.
    OneOf { field: Field, values: Vec<String> },
    /// Card has every listed color, possibly more.
    ColorsInclude { field: Field, colors: Vec<Color> },
    /// Every color on the card is listed (colorless cards qualify).
    ColorsWithin { field: Field, colors: Vec<Color> },
    /// Card has exactly the listed colors.
    ColorsExactly { field: Field, colors: Vec<Color> },
    /// Color list is absent or empty.
    NoColors { field: Field },
    /// Relational comparison of the text field coerced to an integer.
    /// Stored values that are not integers compare as zero.
    Compare {
        field: Field,
        cmp: CompareOp,
        value: i64,
    },
    /// Integer-coerced field modulo `divisor` equals `remainder`.
    Modulo {
        field: Field,
        divisor: i64,
        remainder: i64,
    },
    And { all: Vec<Predicate> },
    Or { any: Vec<Predicate> },
    Not { inner: Box<Predicate> },
}

impl Predicate {
    /// The universal predicate: an empty AND.
    pub fn match_all() -> Self {
        Predicate::And { all: Vec::new() }
    }

    pub fn is_match_all(&self) -> bool {
        matches!(self, Predicate::And { all } if all.is_empty())
    }

    /// AND the parts together, merging nested ANDs and unwrapping a single part.
    pub fn all_of(parts: Vec<Predicate>) -> Self {
        let mut all = Vec::with_capacity(parts.len());
        for part in parts {
            match part {
                Predicate::And { all: nested } => all.extend(nested),
                other => all.push(other),
            }
        }
        if all.len() == 1 {
            all.pop().unwrap_or_else(Predicate::match_all)
        } else {
            Predicate::And { all }
        }
    }

    /// OR the parts together, merging nested ORs and unwrapping a single part.
    pub fn any_of(parts: Vec<Predicate>) -> Self {
        let mut any = Vec::with_capacity(parts.len());
        for part in parts {
            match part {
                Predicate::Or { any: nested } => any.extend(nested),
                other => any.push(other),
            }
        }
        if any.len() == 1 {
            any.pop().unwrap_or(Predicate::Or { any: Vec::new() })
        } else {
            Predicate::Or { any }
        }
    }

    /// Wrap in NOT. A double negation cancels out.
    pub fn negate(self) -> Self {
        match self {
            Predicate::Not { inner } => *inner,
            other => Predicate::Not {
                inner: Box::new(other),
            },
        }
    }
}

fn write_colors(f: &mut fmt::Formatter<'_>, colors: &[Color]) -> fmt::Result {
    let codes: Vec<&str> = colors.iter().map(|c| c.as_str()).collect();
    write!(f, "{{{}}}", codes.join(","))
}

fn write_joined(f: &mut fmt::Formatter<'_>, parts: &[Predicate], sep: &str) -> fmt::Result {
    f.write_str("(")?;
    for (i, part) in parts.iter().enumerate() {
        if i > 0 {
            write!(f, " {} ", sep)?;
        }
        write!(f, "{}", part)?;
    }
    f.write_str(")")
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::Matches { field, pattern } => write!(f, "{} ~ /{}/i", field, pattern),
            Predicate::Equals { field, value } => write!(f, "{} = {:?}", field, value),
            Predicate::OneOf { field, values } => write!(f, "{} in {:?}", field, values),
            Predicate::ColorsInclude { field, colors } => {
                write!(f, "{} >= ", field)?;
                write_colors(f, colors)
            }
            Predicate::ColorsWithin { field, colors } => {
                write!(f, "{} <= ", field)?;
                write_colors(f, colors)
            }
            Predicate::ColorsExactly { field, colors } => {
                write!(f, "{} = ", field)?;
                write_colors(f, colors)
            }
            Predicate::NoColors { field } => write!(f, "{} = {{}}", field),
            Predicate::Compare { field, cmp, value } => write!(f, "{} {} {}", field, cmp, value),
            Predicate::Modulo {
                field,
                divisor,
                remainder,
            } => write!(f, "{} % {} = {}", field, divisor, remainder),
            Predicate::And { all } if all.is_empty() => f.write_str("TRUE"),
            Predicate::And { all } => write_joined(f, all, "AND"),
            Predicate::Or { any } if any.is_empty() => f.write_str("FALSE"),
            Predicate::Or { any } => write_joined(f, any, "OR"),
            Predicate::Not { inner } => write!(f, "NOT {}", inner),
        }
    }
}
