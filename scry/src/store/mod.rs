//! Store - imports cards and runs compiled searches.
//!
//! Uses DuckDB as the reference executor for [`Predicate`] trees.

pub mod sql;

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use duckdb::{params, Connection};
use flate2::read::GzDecoder;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::query::Predicate;
use crate::schema::CardRecord;
use crate::{Config, Error, Result};

/// Result ordering for searches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    #[default]
    Name,
    ManaValue,
    Set,
    Rarity,
}

impl SortOrder {
    fn order_by(self) -> &'static str {
        match self {
            SortOrder::Name => "name, set_code",
            SortOrder::ManaValue => "coalesce(TRY_CAST(mana_value AS DOUBLE), 0), name",
            SortOrder::Set => "set_code, name",
            SortOrder::Rarity => {
                "CASE lower(rarity) WHEN 'mythic' THEN 0 WHEN 'rare' THEN 1 \
                 WHEN 'uncommon' THEN 2 WHEN 'common' THEN 3 ELSE 4 END, name"
            }
        }
    }
}

/// Options for [`Store::search`].
#[derive(Debug, Clone, Default)]
pub struct SearchOptions {
    /// Maximum rows; `None` returns everything.
    pub limit: Option<usize>,
    pub order_by: SortOrder,
}

impl SearchOptions {
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_order(mut self, order_by: SortOrder) -> Self {
        self.order_by = order_by;
        self
    }
}

/// A search hit (for listing).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CardSummary {
    pub id: String,
    pub name: String,
    pub set: String,
    pub rarity: String,
    pub type_line: Option<String>,
    pub mana_value: Option<String>,
    pub power: Option<String>,
    pub toughness: Option<String>,
}

/// A SCRY catalog backed by DuckDB.
pub struct Store {
    config: Config,
}

impl Store {
    /// Open an existing catalog.
    pub fn open(config: Config) -> Result<Self> {
        if !config.db_path().exists() {
            return Err(Error::NotInitialized(config.scry_root.clone()));
        }
        Ok(Self { config })
    }

    /// Get a DuckDB connection to the catalog.
    pub fn connection(&self) -> Result<Connection> {
        Ok(Connection::open(self.config.db_path())?)
    }

    /// Get config reference.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Insert cards, replacing any existing rows with the same id.
    ///
    /// Runs in a single transaction. Returns the number of cards written.
    pub fn import_cards(&self, cards: &[CardRecord]) -> Result<usize> {
        let mut conn = self.connection()?;
        let tx = conn.transaction()?;

        {
            let mut delete = tx.prepare("DELETE FROM cards WHERE id = CAST(? AS UUID)")?;
            let mut insert = tx.prepare(
                r#"
                INSERT INTO cards VALUES (
                    CAST(? AS UUID), ?, ?, CAST(? AS VARCHAR[]), CAST(? AS VARCHAR[]),
                    ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?
                )
                "#,
            )?;

            for card in cards {
                let id = card.id.to_string();
                delete.execute(params![id])?;
                insert.execute(params![
                    id,
                    card.name,
                    card.flavor_name,
                    list_literal(&card.colors),
                    list_literal(&card.color_identity),
                    card.type_line,
                    card.oracle_text,
                    card.mana_value,
                    card.power,
                    card.toughness,
                    card.loyalty,
                    card.set.to_lowercase(),
                    card.rarity.to_lowercase(),
                    card.keywords.join(", "),
                    card.layout.to_lowercase(),
                    card.lang.to_lowercase(),
                ])?;
            }
        }

        tx.commit()?;
        info!(count = cards.len(), "imported cards");
        Ok(cards.len())
    }

    /// Count cards in the catalog.
    pub fn card_count(&self) -> Result<i64> {
        let conn = self.connection()?;
        let count = conn.query_row("SELECT COUNT(*) FROM cards", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Run a compiled predicate against the catalog.
    pub fn search(&self, predicate: &Predicate, opts: &SearchOptions) -> Result<Vec<CardSummary>> {
        let conn = self.connection()?;

        let mut sql = format!(
            r#"
            SELECT id::VARCHAR, name, set_code, rarity, type_line, mana_value, power, toughness
            FROM cards
            WHERE {}
            ORDER BY {}
            "#,
            sql::where_clause(predicate),
            opts.order_by.order_by()
        );
        if let Some(limit) = opts.limit {
            sql.push_str(&format!("LIMIT {}", limit));
        }
        debug!(%sql, "search");

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map([], |row| {
            Ok(CardSummary {
                id: row.get(0)?,
                name: row.get(1)?,
                set: row.get(2)?,
                rarity: row.get(3)?,
                type_line: row.get(4)?,
                mana_value: row.get(5)?,
                power: row.get(6)?,
                toughness: row.get(7)?,
            })
        })?;

        let mut results = Vec::new();
        for row in rows {
            results.push(row?);
        }
        Ok(results)
    }

    /// Look up a single card by id.
    pub fn card(&self, id: &str) -> Result<CardSummary> {
        let conn = self.connection()?;
        let result = conn.query_row(
            r#"
            SELECT id::VARCHAR, name, set_code, rarity, type_line, mana_value, power, toughness
            FROM cards
            WHERE id::VARCHAR = ?
            "#,
            params![id],
            |row| {
                Ok(CardSummary {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    set: row.get(2)?,
                    rarity: row.get(3)?,
                    type_line: row.get(4)?,
                    mana_value: row.get(5)?,
                    power: row.get(6)?,
                    toughness: row.get(7)?,
                })
            },
        );

        match result {
            Ok(card) => Ok(card),
            Err(duckdb::Error::QueryReturnedNoRows) => Err(Error::NotFound(id.to_string())),
            Err(e) => Err(e.into()),
        }
    }
}

/// `["W", "U"]` as DuckDB list text, cast to `VARCHAR[]` on insert.
fn list_literal(values: &[String]) -> String {
    format!("[{}]", values.join(", "))
}

/// Card files are either a bare array (bulk data) or a list object with
/// a `data` array (API search responses).
#[derive(Deserialize)]
#[serde(untagged)]
enum CardFile {
    Cards(Vec<CardRecord>),
    List { data: Vec<CardRecord> },
}

/// Read cards from a JSON file. Files ending in `.gz` are decompressed.
pub fn read_cards(path: &Path) -> Result<Vec<CardRecord>> {
    if !path.exists() {
        return Err(Error::NotFound(path.display().to_string()));
    }

    let file = File::open(path)?;
    let reader: Box<dyn Read> = if path.extension().is_some_and(|ext| ext == "gz") {
        Box::new(GzDecoder::new(file))
    } else {
        Box::new(file)
    };

    let parsed: CardFile = serde_json::from_reader(BufReader::new(reader))
        .map_err(|e| Error::Import(format!("{}: {}", path.display(), e)))?;

    let cards = match parsed {
        CardFile::Cards(cards) => cards,
        CardFile::List { data } => data,
    };
    debug!(path = %path.display(), count = cards.len(), "read card file");
    Ok(cards)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::init::initialize;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;
    use tempfile::TempDir;

    fn setup_store() -> (TempDir, Store) {
        let tmp = TempDir::new().unwrap();
        let config = Config::with_root(tmp.path());
        initialize(&config).unwrap();
        let store = Store::open(config).unwrap();
        (tmp, store)
    }

    #[test]
    fn test_open_uninitialized() {
        let tmp = TempDir::new().unwrap();
        let result = Store::open(Config::with_root(tmp.path()));
        assert!(matches!(result, Err(Error::NotInitialized(_))));
    }

    #[test]
    fn test_import_and_count() {
        let (_tmp, store) = setup_store();
        let cards = vec![
            CardRecord::new("Lightning Bolt", "lea", "common").with_colors(&["R"]),
            CardRecord::new("Counterspell", "lea", "uncommon").with_colors(&["U"]),
        ];

        assert_eq!(store.import_cards(&cards).unwrap(), 2);
        assert_eq!(store.card_count().unwrap(), 2);
    }

    #[test]
    fn test_import_replaces_same_id() {
        let (_tmp, store) = setup_store();
        let card = CardRecord::new("Lightning Bolt", "lea", "common");
        store.import_cards(&[card.clone()]).unwrap();

        let mut updated = card.clone();
        updated.rarity = "uncommon".to_string();
        store.import_cards(&[updated]).unwrap();

        assert_eq!(store.card_count().unwrap(), 1);
        let found = store.card(&card.id.to_string()).unwrap();
        assert_eq!(found.rarity, "uncommon");
    }

    #[test]
    fn test_search_match_all() {
        let (_tmp, store) = setup_store();
        store
            .import_cards(&[
                CardRecord::new("Shock", "m19", "common"),
                CardRecord::new("Ajani", "m19", "mythic"),
            ])
            .unwrap();

        let hits = store
            .search(&Predicate::match_all(), &SearchOptions::default())
            .unwrap();
        let names: Vec<&str> = hits.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Ajani", "Shock"]);
    }

    #[test]
    fn test_search_limit_and_order() {
        let (_tmp, store) = setup_store();
        store
            .import_cards(&[
                CardRecord::new("Big", "m19", "rare").with_mana_value("7"),
                CardRecord::new("Small", "m19", "common").with_mana_value("1"),
                CardRecord::new("Mid", "m19", "mythic").with_mana_value("3"),
            ])
            .unwrap();

        let opts = SearchOptions::default()
            .with_order(SortOrder::ManaValue)
            .with_limit(2);
        let hits = store.search(&Predicate::match_all(), &opts).unwrap();
        let names: Vec<&str> = hits.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Small", "Mid"]);

        let opts = SearchOptions::default().with_order(SortOrder::Rarity);
        let hits = store.search(&Predicate::match_all(), &opts).unwrap();
        assert_eq!(hits[0].name, "Mid");
    }

    #[test]
    fn test_card_not_found() {
        let (_tmp, store) = setup_store();
        let result = store.card("00000000-0000-0000-0000-000000000000");
        assert!(matches!(result, Err(Error::NotFound(_))));
    }

    #[test]
    fn test_read_cards_array_and_list() {
        let tmp = TempDir::new().unwrap();
        let card = CardRecord::new("Shock", "m19", "common");

        let array_path = tmp.path().join("cards.json");
        std::fs::write(&array_path, serde_json::to_string(&vec![&card]).unwrap()).unwrap();
        assert_eq!(read_cards(&array_path).unwrap(), vec![card.clone()]);

        let list_path = tmp.path().join("list.json");
        let list = serde_json::json!({"object": "list", "data": [&card]});
        std::fs::write(&list_path, list.to_string()).unwrap();
        assert_eq!(read_cards(&list_path).unwrap(), vec![card]);
    }

    #[test]
    fn test_read_cards_gzip() {
        let tmp = TempDir::new().unwrap();
        let card = CardRecord::new("Shock", "m19", "common");
        let path = tmp.path().join("cards.json.gz");

        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder
            .write_all(serde_json::to_string(&vec![&card]).unwrap().as_bytes())
            .unwrap();
        std::fs::write(&path, encoder.finish().unwrap()).unwrap();

        let cards = read_cards(&path).unwrap();
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].name, "Shock");
    }

    #[test]
    fn test_read_cards_errors() {
        let tmp = TempDir::new().unwrap();
        assert!(matches!(
            read_cards(&tmp.path().join("missing.json")),
            Err(Error::NotFound(_))
        ));

        let bad = tmp.path().join("bad.json");
        std::fs::write(&bad, r#"{"object": "error"}"#).unwrap();
        assert!(matches!(read_cards(&bad), Err(Error::Import(_))));
    }

    #[test]
    fn test_list_literal() {
        assert_eq!(list_literal(&[]), "[]");
        assert_eq!(
            list_literal(&["W".to_string(), "U".to_string()]),
            "[W, U]"
        );
    }
}
