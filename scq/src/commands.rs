//! CLI command implementations.

use std::path::Path;

use scry::query::{aliases, tokenize};
use scry::store::{read_cards, sql};
use scry::{init, CardSummary, Config, Predicate, SearchOptions, Store};
use tracing::debug;

/// Initialize the card catalog.
pub fn init() -> scry::Result<()> {
    let config = Config::default_location()?;

    if init::is_initialized(&config) {
        println!("Catalog already initialized at {}", config.scry_root.display());
        return Ok(());
    }

    init::initialize(&config)?;
    println!("Catalog initialized at {}", config.scry_root.display());

    Ok(())
}

/// Import cards from a JSON or gzipped JSON file.
pub fn import(file: &str) -> scry::Result<()> {
    let config = Config::load()?;
    let store = Store::open(config)?;

    let cards = read_cards(Path::new(file))?;
    let count = store.import_cards(&cards)?;
    println!("Imported {} cards from {}", count, file);

    Ok(())
}

/// Compile a query, hiding extras unless asked otherwise.
fn search_predicate(query: &str, include_extras: bool) -> Predicate {
    let predicate = scry::compile(query);
    if include_extras {
        return predicate;
    }
    Predicate::all_of(vec![predicate, scry::compile("exclude:extras")])
}

/// Search the catalog.
pub fn search(
    query: &str,
    limit: Option<usize>,
    format: &str,
    include_extras: bool,
) -> scry::Result<()> {
    let config = Config::load()?;
    let include_extras = include_extras || config.include_extras;
    let opts = SearchOptions {
        limit: Some(limit.unwrap_or(config.default_limit)),
        order_by: config.order_by,
    };
    let store = Store::open(config)?;

    let predicate = search_predicate(query, include_extras);
    debug!(%predicate, "compiled query");
    let cards = store.search(&predicate, &opts)?;

    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&cards)?),
        _ => print_table(&cards),
    }

    Ok(())
}

fn print_table(cards: &[CardSummary]) {
    if cards.is_empty() {
        println!("No cards found.");
        return;
    }

    println!("{:<32} {:<6} {:<9} {:>3} {:<7} TYPE", "NAME", "SET", "RARITY", "MV", "P/T");
    println!("{}", "-".repeat(80));

    for card in cards {
        let pt = match (&card.power, &card.toughness) {
            (Some(p), Some(t)) => format!("{}/{}", p, t),
            _ => String::new(),
        };
        println!(
            "{:<32} {:<6} {:<9} {:>3} {:<7} {}",
            truncate(&card.name, 32),
            card.set,
            card.rarity,
            card.mana_value.as_deref().unwrap_or("-"),
            pt,
            card.type_line.as_deref().unwrap_or("-")
        );
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() > max {
        let head: String = s.chars().take(max - 1).collect();
        format!("{}…", head)
    } else {
        s.to_string()
    }
}

/// Print one card as JSON.
pub fn card(id: &str) -> scry::Result<()> {
    let config = Config::load()?;
    let store = Store::open(config)?;

    let card = store.card(id)?;
    println!("{}", serde_json::to_string_pretty(&card)?);

    Ok(())
}

/// List search keys, one per line.
pub fn keys() -> scry::Result<()> {
    for alias in aliases() {
        println!("{}", alias);
    }
    Ok(())
}

/// Print the compiled form of a query.
pub fn compile(query: &str, format: &str, show_tokens: bool) -> scry::Result<()> {
    if show_tokens {
        let tokens = tokenize(query);
        let quoted: Vec<String> = tokens.iter().map(|t| format!("{:?}", t)).collect();
        println!("tokens: [{}]", quoted.join(", "));
    }

    let predicate = scry::compile(query);
    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&predicate)?),
        "sql" => println!("{}", sql::where_clause(&predicate)),
        _ => println!("{}", predicate),
    }

    Ok(())
}

/// Show catalog statistics.
pub fn stats() -> scry::Result<()> {
    let config = Config::load()?;
    let root = config.scry_root.clone();
    let store = Store::open(config)?;

    println!("Root:   {}", root.display());
    println!("Cards:  {}", store.card_count()?);
    println!("Limit:  {}", store.config().default_limit);
    println!("Extras: {}", if store.config().include_extras { "shown" } else { "hidden" });

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_predicate_hides_extras() {
        let hidden = search_predicate("t:goblin", false);
        match hidden {
            Predicate::And { all } => assert_eq!(all.len(), 3),
            other => panic!("Expected And, got {:?}", other),
        }
        assert_eq!(search_predicate("t:goblin", true), scry::compile("t:goblin"));
    }

    #[test]
    fn test_search_predicate_blank_query() {
        let hidden = search_predicate("", false);
        assert_eq!(hidden, scry::compile("exclude:extras"));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Shock", 10), "Shock");
        assert_eq!(truncate("Ugin, the Spirit Dragon", 8), "Ugin, t…");
    }
}
