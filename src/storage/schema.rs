//! Database schema definitions and version handling

use rusqlite::Connection;
use crate::{Error, Result};

/// File name of the database inside the storage directory
pub const DATABASE_NAME: &str = "data";

/// Name of the only table
pub const DATABASE_TABLE: &str = "servers";

/// Declared schema version, stored in `PRAGMA user_version`
pub const DATABASE_VERSION: i64 = 3;

// Column keys
pub const KEY_ROWID: &str = "_id";
pub const KEY_HOST: &str = "host";
pub const KEY_PORT: &str = "port";
pub const KEY_USERNAME: &str = "username";
pub const KEY_PASSWORD: &str = "password";

/// Every read returns columns in this order
pub const SELECT_SERVERS: &str = "SELECT _id, host, port, username, password FROM servers";

/// SQL to create the servers table
pub const CREATE_SERVERS_TABLE: &str = r#"
CREATE TABLE servers (
    _id INTEGER PRIMARY KEY AUTOINCREMENT,
    host VARCHAR(128) NOT NULL,
    port INT NOT NULL,
    username VARCHAR(128) NOT NULL,
    password VARCHAR(128) NOT NULL
)
"#;

pub const DROP_SERVERS_TABLE: &str = "DROP TABLE IF EXISTS servers";

/// What `migrate` did to bring the file to the target version
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Migration {
    /// Fresh file, table created
    Created,
    /// Older version found; table dropped and recreated, all rows lost
    Recreated { from: i64 },
    /// Already at the target version
    Current,
}

pub fn user_version(conn: &Connection) -> Result<i64> {
    let version: i64 = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;
    Ok(version)
}

/// Bring the schema to `target`.
///
/// Version 0 means the schema is absent. Any older non-zero version is
/// upgraded by dropping and recreating `servers`. A newer version is
/// refused. Runs in a single transaction.
pub fn migrate(conn: &mut Connection, target: i64) -> Result<Migration> {
    let tx = conn.transaction()?;
    let found = user_version(&tx)?;

    let migration = if found == target {
        Migration::Current
    } else if found > target {
        return Err(Error::Downgrade { found, expected: target });
    } else if found == 0 {
        tx.execute_batch(CREATE_SERVERS_TABLE)?;
        Migration::Created
    } else {
        tracing::warn!(
            "Upgrading database from version {} to {}, which will destroy all old data",
            found,
            target
        );
        tx.execute_batch(DROP_SERVERS_TABLE)?;
        tx.execute_batch(CREATE_SERVERS_TABLE)?;
        Migration::Recreated { from: found }
    };

    if migration != Migration::Current {
        // PRAGMA does not take bound parameters
        tx.execute_batch(&format!("PRAGMA user_version = {}", target))?;
    }
    tx.commit()?;
    Ok(migration)
}
