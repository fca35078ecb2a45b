//! Renders a [`Predicate`] as a DuckDB boolean expression over `cards`.

use crate::query::{Color, Field, Predicate};

/// Column holding `field` in the `cards` table.
pub fn column(field: Field) -> &'static str {
    match field {
        Field::Set => "set_code",
        other => other.as_str(),
    }
}

/// Quote a string literal for DuckDB.
pub fn quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

/// Build the WHERE clause body for a predicate.
pub fn where_clause(predicate: &Predicate) -> String {
    match predicate {
        Predicate::Matches { field, pattern } => format!(
            "regexp_matches(coalesce({}, ''), {}, 'i')",
            column(*field),
            quote(pattern)
        ),
        Predicate::Equals { field, value } => {
            if field.is_normalized() {
                format!(
                    "lower(coalesce({}, '')) = {}",
                    column(*field),
                    quote(&value.to_lowercase())
                )
            } else {
                format!("coalesce({}, '') = {}", column(*field), quote(value))
            }
        }
        Predicate::OneOf { field, values } => {
            if values.is_empty() {
                return "FALSE".to_string();
            }
            let list: Vec<String> = values.iter().map(|v| quote(v)).collect();
            let lhs = if field.is_normalized() {
                format!("lower(coalesce({}, ''))", column(*field))
            } else {
                format!("coalesce({}, '')", column(*field))
            };
            format!("{} IN ({})", lhs, list.join(", "))
        }
        Predicate::ColorsInclude { field, colors } => {
            format!("list_has_all({}, {})", color_list(*field), color_literal(colors))
        }
        Predicate::ColorsWithin { field, colors } => {
            format!("list_has_all({}, {})", color_literal(colors), color_list(*field))
        }
        Predicate::ColorsExactly { field, colors } => format!(
            "(list_has_all({list}, {colors}) AND len({list}) = {n})",
            list = color_list(*field),
            colors = color_literal(colors),
            n = colors.len()
        ),
        Predicate::NoColors { field } => {
            let col = column(*field);
            format!("({col} IS NULL OR len({col}) = 0)")
        }
        Predicate::Compare { field, cmp, value } => {
            format!("{} {} {}", as_integer(*field), cmp.symbol(), value)
        }
        Predicate::Modulo {
            field,
            divisor,
            remainder,
        } => format!("{} % {} = {}", as_integer(*field), divisor, remainder),
        Predicate::And { all } => join(all, "AND", "TRUE"),
        Predicate::Or { any } => join(any, "OR", "FALSE"),
        Predicate::Not { inner } => format!("NOT ({})", where_clause(inner)),
    }
}

/// Text column coerced to an integer; anything non-numeric counts as zero.
fn as_integer(field: Field) -> String {
    format!("coalesce(TRY_CAST({} AS INTEGER), 0)", column(field))
}

/// A color column with NULL read as the empty list.
fn color_list(field: Field) -> String {
    format!("coalesce({}, []::VARCHAR[])", column(field))
}

fn color_literal(colors: &[Color]) -> String {
    if colors.is_empty() {
        return "[]::VARCHAR[]".to_string();
    }
    let codes: Vec<String> = colors.iter().map(|c| quote(c.as_str())).collect();
    format!("[{}]", codes.join(", "))
}

fn join(parts: &[Predicate], sep: &str, empty: &str) -> String {
    if parts.is_empty() {
        return empty.to_string();
    }
    let rendered: Vec<String> = parts.iter().map(where_clause).collect();
    format!("({})", rendered.join(&format!(" {} ", sep)))
}
