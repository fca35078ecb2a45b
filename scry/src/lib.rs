//! SCRY: Scryfall-style search for a local card catalog.
//!
//! The [`query`] module compiles search strings into a store-agnostic
//! [`Predicate`]; [`store`] keeps cards in DuckDB and runs those predicates.

pub mod config;
pub mod error;
pub mod init;
pub mod query;
pub mod schema;
pub mod store;

pub use config::Config;
pub use error::{Error, Result};
pub use query::{compile, Color, CompareOp, Field, Predicate};
pub use schema::CardRecord;
pub use store::{CardSummary, SearchOptions, SortOrder, Store};
