//! Server profile types
//!
//! `ServerProfile` is a row as read back from the store. `NewServer` is the
//! write-side input; every insert and update goes through
//! `NewServer::sanitized` so stored rows always satisfy the length and
//! port rules below.

use serde::{Deserialize, Serialize};

/// Longest host, username or password kept on write (in characters).
pub const MAX_FIELD_CHARS: usize = 127;

/// Port stored in place of anything outside `1..=65535`.
pub const FALLBACK_PORT: i32 = 65535;

/// A stored server connection profile.
///
/// Rows are returned exactly as stored; nothing is re-validated on read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerProfile {
    /// Row id assigned by the store
    pub id: i64,
    pub host: String,
    /// Read as `i64` so rows written by other tools load even when out of range
    pub port: i64,
    pub username: String,
    /// Stored in plain text
    pub password: String,
}

impl ServerProfile {
    /// `username@host:port`
    pub fn address(&self) -> String {
        format!("{}@{}:{}", self.username, self.host, self.port)
    }
}

impl std::fmt::Display for ServerProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{} {}", self.id, self.address())
    }
}

/// Field values for a profile that is about to be inserted or updated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewServer {
    pub host: String,
    pub port: i32,
    pub username: String,
    pub password: String,
}

impl NewServer {
    pub fn new(
        host: impl Into<String>,
        port: i32,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            port,
            username: username.into(),
            password: password.into(),
        }
    }

    /// Apply the write rules: text fields cut to `MAX_FIELD_CHARS`,
    /// out-of-range ports replaced with `FALLBACK_PORT`.
    pub fn sanitized(self) -> Self {
        Self {
            host: truncate_chars(self.host, MAX_FIELD_CHARS),
            port: clamp_port(self.port),
            username: truncate_chars(self.username, MAX_FIELD_CHARS),
            password: truncate_chars(self.password, MAX_FIELD_CHARS),
        }
    }
}

/// Cut `value` down to at most `max` chars, never splitting a code point.
pub fn truncate_chars(mut value: String, max: usize) -> String {
    if let Some((byte_idx, _)) = value.char_indices().nth(max) {
        value.truncate(byte_idx);
    }
    value
}

pub fn clamp_port(port: i32) -> i32 {
    if (1..=65535).contains(&port) {
        port
    } else {
        FALLBACK_PORT
    }
}
