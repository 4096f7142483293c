//! SQLite storage implementation

use std::path::{Path, PathBuf};
use rusqlite::{Connection, params, OptionalExtension};
use crate::{Result, Error};
use crate::profile::{NewServer, ServerProfile};
use super::schema::{self, Migration};

/// Returned by `create_server` when the insert fails
pub const INVALID_ROW_ID: i64 = -1;

/// Where the store keeps its database, supplied by the host application
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreContext {
    /// Database file `data` inside this directory
    Directory(PathBuf),
    /// Private in-memory database (for testing)
    InMemory,
}

impl StoreContext {
    pub fn directory(dir: impl Into<PathBuf>) -> Self {
        StoreContext::Directory(dir.into())
    }

    pub fn in_memory() -> Self {
        StoreContext::InMemory
    }

    /// Path of the backing file, if there is one
    pub fn database_path(&self) -> Option<PathBuf> {
        match self {
            StoreContext::Directory(dir) => Some(dir.join(schema::DATABASE_NAME)),
            StoreContext::InMemory => None,
        }
    }
}

/// Data-access object for the `servers` table.
///
/// Construct with a `StoreContext`, then call `open` before anything else.
/// Every operation on a store that is not open fails with `Error::NotOpen`.
pub struct ProfileStore {
    ctx: StoreContext,
    conn: Option<Connection>,
}

impl ProfileStore {
    pub fn new(ctx: StoreContext) -> Self {
        Self { ctx, conn: None }
    }

    /// Open a store in `dir` (creates the directory and database if needed)
    pub fn open_in(dir: &Path) -> Result<Self> {
        let mut store = Self::new(StoreContext::directory(dir));
        store.open()?;
        Ok(store)
    }

    /// Open an in-memory store (for testing)
    pub fn open_in_memory() -> Result<Self> {
        let mut store = Self::new(StoreContext::in_memory());
        store.open()?;
        Ok(store)
    }

    pub fn context(&self) -> &StoreContext {
        &self.ctx
    }

    pub fn is_open(&self) -> bool {
        self.conn.is_some()
    }

    /// Acquire a writable handle, creating or upgrading the schema.
    ///
    /// Opening an already open store replaces (and closes) the old handle.
    pub fn open(&mut self) -> Result<&mut Self> {
        let mut conn = match &self.ctx {
            StoreContext::Directory(dir) => {
                std::fs::create_dir_all(dir)?;
                Connection::open(dir.join(schema::DATABASE_NAME))?
            }
            StoreContext::InMemory => Connection::open_in_memory()?,
        };

        match schema::migrate(&mut conn, schema::DATABASE_VERSION)? {
            Migration::Created => tracing::info!("Created servers table (version {})", schema::DATABASE_VERSION),
            Migration::Recreated { from } => tracing::debug!("Recreated servers table, was version {}", from),
            Migration::Current => tracing::debug!("Opened servers database at version {}", schema::DATABASE_VERSION),
        }

        self.conn = Some(conn);
        Ok(self)
    }

    /// Release the handle. A no-op when the store is not open.
    pub fn close(&mut self) -> Result<()> {
        if let Some(conn) = self.conn.take() {
            conn.close().map_err(|(_, e)| Error::Storage(e))?;
        }
        Ok(())
    }

    fn conn(&self) -> Result<&Connection> {
        self.conn.as_ref().ok_or(Error::NotOpen)
    }

    // ========== Server Operations ==========

    /// Create a server profile. Returns the new row id, or
    /// `INVALID_ROW_ID` if the insert failed.
    pub fn create_server(&self, host: &str, port: i32, username: &str, password: &str) -> i64 {
        match self.insert_server(NewServer::new(host, port, username, password)) {
            Ok(id) => id,
            Err(e) => {
                tracing::error!("Failed to insert server {}:{}: {}", host, port, e);
                INVALID_ROW_ID
            }
        }
    }

    /// Insert a server profile and return its row id
    pub fn insert_server(&self, server: NewServer) -> Result<i64> {
        let server = server.sanitized();
        let conn = self.conn()?;
        conn.execute(
            r#"
            INSERT INTO servers (host, port, username, password)
            VALUES (?1, ?2, ?3, ?4)
            "#,
            params![server.host, server.port, server.username, server.password],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// Delete the server with the given row id. Returns whether a row was removed.
    pub fn delete_server(&self, id: i64) -> Result<bool> {
        let removed = self.conn()?.execute("DELETE FROM servers WHERE _id = ?1", [id])?;
        Ok(removed > 0)
    }

    /// Get every stored server, in storage order
    pub fn fetch_all_servers(&self) -> Result<Vec<ServerProfile>> {
        let mut stmt = self.conn()?.prepare(schema::SELECT_SERVERS)?;

        let servers = stmt
            .query_map([], |row| self.row_to_profile(row))?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(servers)
    }

    /// Get a server by row id
    pub fn fetch_server(&self, id: i64) -> Result<Option<ServerProfile>> {
        let sql = format!("{} WHERE _id = ?1", schema::SELECT_SERVERS);
        self.conn()?
            .query_row(&sql, [id], |row| self.row_to_profile(row))
            .optional()
            .map_err(Into::into)
    }

    /// Overwrite the server with the given row id. Returns whether a row was updated.
    pub fn update_server(&self, id: i64, host: &str, port: i32, username: &str, password: &str) -> Result<bool> {
        self.replace_server(id, NewServer::new(host, port, username, password))
    }

    /// Same as `update_server`, taking the new values as a `NewServer`
    pub fn replace_server(&self, id: i64, server: NewServer) -> Result<bool> {
        let server = server.sanitized();
        let updated = self.conn()?.execute(
            r#"
            UPDATE servers SET host = ?1, port = ?2, username = ?3, password = ?4
            WHERE _id = ?5
            "#,
            params![server.host, server.port, server.username, server.password, id],
        )?;
        Ok(updated > 0)
    }

    /// Count all servers
    pub fn count_servers(&self) -> Result<usize> {
        let count: i64 = self.conn()?.query_row("SELECT COUNT(*) FROM servers", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Helper to convert a row to a ServerProfile
    fn row_to_profile(&self, row: &rusqlite::Row) -> rusqlite::Result<ServerProfile> {
        Ok(ServerProfile {
            id: row.get(schema::KEY_ROWID)?,
            host: row.get(schema::KEY_HOST)?,
            port: row.get(schema::KEY_PORT)?,
            username: row.get(schema::KEY_USERNAME)?,
            password: row.get(schema::KEY_PASSWORD)?,
        })
    }
}

impl Drop for ProfileStore {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            tracing::warn!("Failed to close servers database: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> ProfileStore {
        ProfileStore::open_in_memory().unwrap()
    }

    #[test]
    fn test_create_and_fetch() {
        let store = store();

        let id = store.create_server("example.com", 22, "alice", "secret");
        assert_eq!(id, 1);

        let server = store.fetch_server(id).unwrap().unwrap();
        assert_eq!(
            server,
            ServerProfile {
                id: 1,
                host: "example.com".to_string(),
                port: 22,
                username: "alice".to_string(),
                password: "secret".to_string(),
            }
        );
    }

    #[test]
    fn test_create_truncates_and_clamps() {
        let store = store();

        let id = store.create_server(&"a".repeat(200), 70000, "bob", "pw");
        assert!(id >= 0);

        let server = store.fetch_server(id).unwrap().unwrap();
        assert_eq!(server.host.len(), 127);
        assert_eq!(server.port, 65535);
        assert_eq!(server.username, "bob");
        assert_eq!(server.password, "pw");
    }

    #[test]
    fn test_low_ports_are_clamped() {
        let store = store();

        let zero = store.create_server("h", 0, "u", "p");
        let negative = store.create_server("h", -22, "u", "p");
        let low = store.create_server("h", 1, "u", "p");

        assert_eq!(store.fetch_server(zero).unwrap().unwrap().port, 65535);
        assert_eq!(store.fetch_server(negative).unwrap().unwrap().port, 65535);
        assert_eq!(store.fetch_server(low).unwrap().unwrap().port, 1);
    }

    #[test]
    fn test_delete() {
        let store = store();
        let id = store.create_server("example.com", 22, "alice", "secret");

        assert!(store.delete_server(id).unwrap());
        assert!(store.fetch_server(id).unwrap().is_none());
        assert!(!store.delete_server(id).unwrap());
    }

    #[test]
    fn test_update() {
        let store = store();
        let id = store.create_server("example.com", 22, "alice", "secret");

        assert!(store.update_server(id, "other.org", 2222, "carol", &"x".repeat(150)).unwrap());

        let server = store.fetch_server(id).unwrap().unwrap();
        assert_eq!(server.id, id);
        assert_eq!(server.host, "other.org");
        assert_eq!(server.port, 2222);
        assert_eq!(server.username, "carol");
        assert_eq!(server.password.len(), 127);
    }

    #[test]
    fn test_update_missing_row() {
        let store = store();
        let id = store.create_server("example.com", 22, "alice", "secret");

        assert!(!store.update_server(id + 1, "other.org", 2222, "carol", "pw").unwrap());

        let all = store.fetch_all_servers().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].host, "example.com");
    }

    #[test]
    fn test_fetch_all_skips_deleted() {
        let store = store();
        let a = store.create_server("a.example", 22, "u", "p");
        let b = store.create_server("b.example", 23, "u", "p");
        let c = store.create_server("c.example", 24, "u", "p");

        store.delete_server(b).unwrap();

        let ids: Vec<i64> = store.fetch_all_servers().unwrap().iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![a, c]);
        assert_eq!(store.count_servers().unwrap(), 2);
    }

    #[test]
    fn test_ids_are_not_reused() {
        let store = store();
        let first = store.create_server("h", 22, "u", "p");
        store.delete_server(first).unwrap();

        let second = store.create_server("h", 22, "u", "p");
        assert!(second > first);
    }

    #[test]
    fn test_operations_before_open() {
        let mut store = ProfileStore::new(StoreContext::in_memory());
        assert!(!store.is_open());

        assert_eq!(store.create_server("h", 22, "u", "p"), INVALID_ROW_ID);
        assert!(matches!(store.fetch_all_servers(), Err(Error::NotOpen)));
        assert!(matches!(store.delete_server(1), Err(Error::NotOpen)));

        store.open().unwrap();
        assert!(store.is_open());
        assert_eq!(store.create_server("h", 22, "u", "p"), 1);
    }

    #[test]
    fn test_close() {
        let mut store = store();
        store.close().unwrap();
        assert!(!store.is_open());
        assert!(matches!(store.fetch_server(1), Err(Error::NotOpen)));

        // closing twice is harmless
        store.close().unwrap();
    }

    #[test]
    fn test_file_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = StoreContext::directory(dir.path().join("profiles"));

        let mut store = ProfileStore::new(ctx.clone());
        store.open().unwrap();
        let id = store.create_server("example.com", 22, "alice", "secret");
        store.close().unwrap();

        assert!(ctx.database_path().unwrap().exists());

        let mut reopened = ProfileStore::new(ctx);
        reopened.open().unwrap();
        assert_eq!(reopened.fetch_server(id).unwrap().unwrap().username, "alice");
    }

    #[test]
    fn test_reopen_replaces_handle() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = ProfileStore::open_in(dir.path()).unwrap();
        let id = store.create_server("example.com", 22, "alice", "secret");

        store.open().unwrap();
        assert!(store.is_open());

        let server = store.fetch_server(id).unwrap().unwrap();
        assert_eq!(server.host, "example.com");
        assert_eq!(store.count_servers().unwrap(), 1);
    }

    #[test]
    fn test_out_of_range_port_is_read_back() {
        let store = store();
        store
            .conn()
            .unwrap()
            .execute(
                "INSERT INTO servers (host, port, username, password) VALUES ('big', 5000000000, 'u', 'p')",
                [],
            )
            .unwrap();
        let id = store.create_server("example.com", 22, "alice", "secret");

        let servers = store.fetch_all_servers().unwrap();
        assert_eq!(servers.len(), 2);
        assert_eq!(servers[0].port, 5_000_000_000);
        assert_eq!(store.fetch_server(id).unwrap().unwrap().port, 22);
    }

    #[test]
    fn test_failed_migration_keeps_version() {
        let dir = tempfile::tempdir().unwrap();
        {
            // table present but version never recorded
            let conn = Connection::open(dir.path().join(schema::DATABASE_NAME)).unwrap();
            conn.execute_batch(schema::CREATE_SERVERS_TABLE).unwrap();
        }

        let mut store = ProfileStore::new(StoreContext::directory(dir.path()));
        assert!(matches!(store.open(), Err(Error::Storage(_))));
        assert!(!store.is_open());

        let conn = Connection::open(dir.path().join(schema::DATABASE_NAME)).unwrap();
        assert_eq!(schema::user_version(&conn).unwrap(), 0);
    }

    #[test]
    fn test_old_version_is_wiped_on_open() {
        let dir = tempfile::tempdir().unwrap();
        {
            let conn = Connection::open(dir.path().join(schema::DATABASE_NAME)).unwrap();
            conn.execute_batch(schema::CREATE_SERVERS_TABLE).unwrap();
            conn.execute(
                "INSERT INTO servers (host, port, username, password) VALUES ('old', 22, 'u', 'p')",
                [],
            )
            .unwrap();
            conn.execute_batch("PRAGMA user_version = 2").unwrap();
        }

        let store = ProfileStore::open_in(dir.path()).unwrap();
        assert!(store.fetch_all_servers().unwrap().is_empty());

        let version = schema::user_version(store.conn().unwrap()).unwrap();
        assert_eq!(version, schema::DATABASE_VERSION);
    }

    #[test]
    fn test_newer_version_refuses_to_open() {
        let dir = tempfile::tempdir().unwrap();
        {
            let conn = Connection::open(dir.path().join(schema::DATABASE_NAME)).unwrap();
            conn.execute_batch("PRAGMA user_version = 4").unwrap();
        }

        let mut store = ProfileStore::new(StoreContext::directory(dir.path()));
        assert!(matches!(store.open(), Err(Error::Downgrade { found: 4, expected: 3 })));
        assert!(!store.is_open());
    }
}
