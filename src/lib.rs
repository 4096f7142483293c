//! # serverdb - local store for server connection profiles
//!
//! A small SQLite-backed table of connection profiles (host, port,
//! username, password) with open/close lifecycle and CRUD operations.
//!
//! serverdb provides:
//! - `ProfileStore`, the data-access component over the `servers` table
//! - `StoreContext`, the host-supplied storage directory
//! - Write-side sanitizing (length truncation, port clamping)
//! - Versioned schema with destructive recreate on upgrade

pub mod profile;
pub mod storage;
pub mod config;
pub mod ui;

// Re-exports for convenient access
pub use profile::{NewServer, ServerProfile};
pub use storage::{ProfileStore, StoreContext, INVALID_ROW_ID};

/// Result type alias for serverdb operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for serverdb operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Store is not open")]
    NotOpen,

    #[error("Cannot downgrade database from version {found} to {expected}")]
    Downgrade { found: i64, expected: i64 },
}
