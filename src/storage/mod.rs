//! Storage Layer - SQLite-backed persistence
//!
//! System of record is a single SQLite file `data` with one table:
//! - servers(_id, host, port, username, password)
//!
//! The schema version lives in `PRAGMA user_version`; see `schema::migrate`.

pub mod schema;
pub mod sqlite;

pub use sqlite::{ProfileStore, StoreContext, INVALID_ROW_ID};
