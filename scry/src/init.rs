//! SCRY initialization - creates directory structure and database.

use std::fs;

use crate::{Config, Error, Result};

/// Initialize a new SCRY catalog.
///
/// Creates the directory structure, the DuckDB database with an empty
/// `cards` table, and writes config.toml.
pub fn initialize(config: &Config) -> Result<()> {
    let scry_root = &config.scry_root;

    if config.db_path().exists() {
        return Err(Error::AlreadyInitialized(scry_root.clone()));
    }

    create_directories(config)?;
    init_database(config)?;
    config.save()?;

    Ok(())
}

fn create_directories(config: &Config) -> Result<()> {
    fs::create_dir_all(config.scry_root.join("db"))?;
    Ok(())
}

/// Create the cards table.
///
/// Colors are lists so color predicates can use list functions; numeric
/// stats stay text because printed values include `*` and `X`.
fn init_database(config: &Config) -> Result<()> {
    let conn = duckdb::Connection::open(config.db_path())?;

    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS cards (
            id UUID,
            name VARCHAR NOT NULL,
            flavor_name VARCHAR,
            colors VARCHAR[],
            color_identity VARCHAR[],
            type_line VARCHAR,
            oracle_text VARCHAR,
            mana_value VARCHAR,
            power VARCHAR,
            toughness VARCHAR,
            loyalty VARCHAR,
            set_code VARCHAR,
            rarity VARCHAR,
            keywords VARCHAR,
            layout VARCHAR,
            lang VARCHAR
        );
        "#,
    )?;

    Ok(())
}

/// Check if SCRY is initialized at the given location.
pub fn is_initialized(config: &Config) -> bool {
    config.db_path().exists()
}
