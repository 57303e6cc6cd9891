//! Environment bindings handed to the router at construction time.
//!
//! The host provides a database handle, a session key-value store and a
//! signing secret. None of the group handlers use them yet, but they travel
//! with the application state so that real implementations can pick them up
//! without any global lookup.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};

use crate::Result;

/// Handle to the application database.
///
/// The connection is never opened by the current handlers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseHandle {
    /// Logical database name.
    pub name: String,
    /// Connection URL.
    pub url: String,
}

impl DatabaseHandle {
    /// Creates a new database handle.
    #[must_use]
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }
}

impl Default for DatabaseHandle {
    fn default() -> Self {
        Self::new("swatch", "sqlite://swatch.db")
    }
}

/// Key-value store used for sessions.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Returns the value stored under `key`.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Inserts or overwrites the value under `key`.
    async fn put(&self, key: &str, value: String) -> Result<()>;

    /// Deletes `key`. Returns `true` if an entry was removed.
    async fn delete(&self, key: &str) -> Result<bool>;
}

/// In-memory session store (for development/testing).
#[derive(Default)]
pub struct InMemorySessionStore {
    entries: parking_lot::RwLock<HashMap<String, String>>,
}

impl InMemorySessionStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.read().get(key).cloned())
    }

    async fn put(&self, key: &str, value: String) -> Result<()> {
        self.entries.write().insert(key.to_string(), value);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<bool> {
        Ok(self.entries.write().remove(key).is_some())
    }
}

/// Everything the router expects from its host environment.
#[derive(Clone)]
pub struct Bindings {
    /// Database handle.
    pub database: DatabaseHandle,
    /// Session key-value store.
    pub sessions: Arc<dyn SessionStore>,
    /// Secret used to sign tokens.
    pub jwt_secret: SecretString,
}

impl Bindings {
    /// Creates bindings from their parts.
    #[must_use]
    pub fn new(
        database: DatabaseHandle,
        sessions: Arc<dyn SessionStore>,
        jwt_secret: impl Into<String>,
    ) -> Self {
        Self {
            database,
            sessions,
            jwt_secret: SecretString::from(jwt_secret.into()),
        }
    }

    /// Bindings backed by in-memory stores, for development and tests.
    #[must_use]
    pub fn in_memory(jwt_secret: impl Into<String>) -> Self {
        Self::new(
            DatabaseHandle::default(),
            Arc::new(InMemorySessionStore::new()),
            jwt_secret,
        )
    }

    /// Returns `true` if a non-empty signing secret is configured.
    #[must_use]
    pub fn has_secret(&self) -> bool {
        !self.jwt_secret.expose_secret().is_empty()
    }
}

impl fmt::Debug for Bindings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bindings")
            .field("database", &self.database)
            .field("sessions", &"<session store>")
            .field("jwt_secret", &"[REDACTED]")
            .finish()
    }
}
