//! Schema definitions for the card catalog.

use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// A card printing, in the shape of Scryfall's bulk data.
///
/// Fields the catalog does not search are ignored on import.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardRecord {
    /// Scryfall card id.
    pub id: Uuid,

    pub name: String,

    /// Alternate in-universe name (e.g. Godzilla series cards).
    #[serde(default)]
    pub flavor_name: Option<String>,

    /// Color codes (`W`, `U`, `B`, `R`, `G`).
    #[serde(default)]
    pub colors: Vec<String>,

    /// Colors anywhere on the card, including rules text.
    #[serde(default)]
    pub color_identity: Vec<String>,

    #[serde(default)]
    pub type_line: Option<String>,

    #[serde(default)]
    pub oracle_text: Option<String>,

    /// Mana value, kept as text like power and toughness.
    #[serde(
        rename = "cmc",
        alias = "mana_value",
        default,
        deserialize_with = "text_or_number"
    )]
    pub mana_value: Option<String>,

    /// Power; may be `*`, `1+*` or similar.
    #[serde(default, deserialize_with = "text_or_number")]
    pub power: Option<String>,

    #[serde(default, deserialize_with = "text_or_number")]
    pub toughness: Option<String>,

    #[serde(default, deserialize_with = "text_or_number")]
    pub loyalty: Option<String>,

    /// Set code, e.g. `war`.
    pub set: String,

    pub rarity: String,

    #[serde(default)]
    pub keywords: Vec<String>,

    #[serde(default = "default_layout")]
    pub layout: String,

    #[serde(default = "default_lang")]
    pub lang: String,
}

fn default_layout() -> String {
    "normal".to_string()
}

fn default_lang() -> String {
    "en".to_string()
}

impl CardRecord {
    /// Create a minimal card record.
    pub fn new(name: impl Into<String>, set: impl Into<String>, rarity: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            flavor_name: None,
            colors: Vec::new(),
            color_identity: Vec::new(),
            type_line: None,
            oracle_text: None,
            mana_value: None,
            power: None,
            toughness: None,
            loyalty: None,
            set: set.into(),
            rarity: rarity.into(),
            keywords: Vec::new(),
            layout: default_layout(),
            lang: default_lang(),
        }
    }

    /// Set colors; color identity follows unless set separately.
    pub fn with_colors(mut self, colors: &[&str]) -> Self {
        self.colors = colors.iter().map(|c| c.to_string()).collect();
        self.color_identity = self.colors.clone();
        self
    }

    pub fn with_color_identity(mut self, colors: &[&str]) -> Self {
        self.color_identity = colors.iter().map(|c| c.to_string()).collect();
        self
    }

    pub fn with_type_line(mut self, type_line: impl Into<String>) -> Self {
        self.type_line = Some(type_line.into());
        self
    }

    pub fn with_oracle_text(mut self, text: impl Into<String>) -> Self {
        self.oracle_text = Some(text.into());
        self
    }

    pub fn with_flavor_name(mut self, flavor_name: impl Into<String>) -> Self {
        self.flavor_name = Some(flavor_name.into());
        self
    }

    pub fn with_mana_value(mut self, mana_value: impl Into<String>) -> Self {
        self.mana_value = Some(mana_value.into());
        self
    }

    /// Set power and toughness.
    pub fn with_stats(mut self, power: impl Into<String>, toughness: impl Into<String>) -> Self {
        self.power = Some(power.into());
        self.toughness = Some(toughness.into());
        self
    }

    pub fn with_loyalty(mut self, loyalty: impl Into<String>) -> Self {
        self.loyalty = Some(loyalty.into());
        self
    }

    pub fn with_keywords(mut self, keywords: &[&str]) -> Self {
        self.keywords = keywords.iter().map(|k| k.to_string()).collect();
        self
    }

    pub fn with_layout(mut self, layout: impl Into<String>) -> Self {
        self.layout = layout.into();
        self
    }

    pub fn with_lang(mut self, lang: impl Into<String>) -> Self {
        self.lang = lang.into();
        self
    }
}

/// Accept `"3"`, `3` or `3.0` and store it as text. Whole floats lose
/// their fraction so `3.0` and `"3"` compare the same.
fn text_or_number<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(serde_json::Value::Null) => None,
        Some(serde_json::Value::String(s)) => Some(s),
        Some(serde_json::Value::Number(n)) => Some(match n.as_f64() {
            Some(f) if n.is_f64() && f.fract() == 0.0 => format!("{}", f as i64),
            _ => n.to_string(),
        }),
        Some(other) => Some(other.to_string()),
    })
}
