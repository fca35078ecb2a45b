//! Value parsers shared by the operator definitions.

use once_cell::sync::Lazy;
use regex::Regex;

use super::predicate::Color::{B, G, R, U, W};
use super::predicate::{Color, Field, Predicate};
use super::term::CompareOp;

static INTEGER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^-?\d+$").expect("integer pattern is valid"));

/// Named color combinations. Matched against the whole lower-cased value.
const COLOR_NAMES: &[(&str, &[Color])] = &[
    ("white", &[W]),
    ("blue", &[U]),
    ("black", &[B]),
    ("red", &[R]),
    ("green", &[G]),
    ("colorless", &[]),
    // Guilds
    ("azorius", &[W, U]),
    ("dimir", &[U, B]),
    ("rakdos", &[B, R]),
    ("gruul", &[R, G]),
    ("selesnya", &[G, W]),
    ("orzhov", &[W, B]),
    ("izzet", &[U, R]),
    ("golgari", &[B, G]),
    ("boros", &[R, W]),
    ("simic", &[G, U]),
    // Shards
    ("bant", &[G, W, U]),
    ("esper", &[W, U, B]),
    ("grixis", &[U, B, R]),
    ("jund", &[B, R, G]),
    ("naya", &[R, G, W]),
    // Wedges
    ("abzan", &[W, B, G]),
    ("jeskai", &[U, R, W]),
    ("sultai", &[B, G, U]),
    ("mardu", &[R, W, B]),
    ("temur", &[G, U, R]),
];

/// Expand a color value into a set of colors.
///
/// Whole-word names (`red`, `azorius`, `jund`) win; anything else is read
/// letter by letter with unknown letters skipped. An empty result means
/// colorless.
pub fn parse_colors(input: &str) -> Vec<Color> {
    let lower = input.to_lowercase();

    if let Some((_, colors)) = COLOR_NAMES.iter().find(|(name, _)| *name == lower) {
        return colors.to_vec();
    }

    let mut colors = Vec::new();
    for color in lower.chars().filter_map(Color::from_code) {
        if !colors.contains(&color) {
            colors.push(color);
        }
    }
    colors
}

/// Split `>=3` style values into an operator and an integer.
///
/// The operator defaults to `=`. The integer is `None` when the remainder
/// is not a number.
pub fn parse_comparison(input: &str) -> (CompareOp, Option<i64>) {
    let input = input.trim();
    let (op, rest) = [">=", "<=", "!=", ">", "<", "="]
        .iter()
        .find_map(|symbol| {
            input
                .strip_prefix(symbol)
                .and_then(|rest| CompareOp::from_symbol(symbol).map(|op| (op, rest)))
        })
        .unwrap_or((CompareOp::Eq, input));

    (op, parse_integer(rest.trim()))
}

/// `even` / `odd` as a modulus-2 constraint on `field`.
pub fn parse_even_odd(field: Field, input: &str) -> Option<Predicate> {
    let remainder = if input.eq_ignore_ascii_case("even") {
        0
    } else if input.eq_ignore_ascii_case("odd") {
        1
    } else {
        return None;
    };

    Some(Predicate::Modulo {
        field,
        divisor: 2,
        remainder,
    })
}

/// Whether a value is a plain (optionally negative) integer.
pub fn is_integer(input: &str) -> bool {
    INTEGER.is_match(input)
}

/// Parse an integer. Digit strings too long for `i64` clamp to its bounds.
pub fn parse_integer(input: &str) -> Option<i64> {
    if let Ok(n) = input.parse() {
        return Some(n);
    }
    let (negative, digits) = match input.strip_prefix('-') {
        Some(digits) => (true, digits),
        None => (false, input.strip_prefix('+').unwrap_or(input)),
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(if negative { i64::MIN } else { i64::MAX })
}

/// Escape regex metacharacters so free text matches literally.
pub fn escape_pattern(input: &str) -> String {
    regex::escape(input)
}

/// Case-insensitive substring match on `field`.
pub fn substring(field: Field, text: &str) -> Predicate {
    Predicate::Matches {
        field,
        pattern: escape_pattern(text),
    }
}
