//! Session identity storage
//!
//! A session is one opaque string token correlating all turns of a
//! conversation on the remote service. The [`SessionStore`] owns the
//! current token and is the sole writer of the persisted copy, kept in an
//! embedded `sled` key-value database under one fixed key.
//!
//! Persistence unavailability is tolerated: the store degrades to an
//! in-memory-only token for the run instead of failing the caller, since a
//! lost token only affects conversational continuity.

use crate::error::{ChatClientError, Result};
use rand::Rng;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

/// Fixed storage key for the session token
pub const SESSION_STORAGE_KEY: &str = "autostream_session_id";

const TOKEN_SUFFIX_LEN: usize = 9;
const TOKEN_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Key-value persistence capability used for the session token
///
/// The production implementation is [`SledStore`]; tests use
/// [`MemoryStore`]. The session layer only ever reads and writes a single
/// fixed key.
pub trait KeyValueStore: Send {
    /// Returns the stored value for `key`, if any
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value
    fn set(&mut self, key: &str, value: &str) -> Result<()>;

    /// Removes the value stored under `key`, if any
    fn remove(&mut self, key: &str) -> Result<()>;
}

/// Durable key-value store backed by an embedded `sled` database
pub struct SledStore {
    db: sled::Db,
}

impl SledStore {
    /// Open or create a store at `path`
    ///
    /// # Errors
    ///
    /// Returns `ChatClientError::Storage` if the database cannot be opened.
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let db = sled::open(path)
            .map_err(|e| ChatClientError::Storage(format!("Failed to open database: {}", e)))?;
        Ok(Self { db })
    }
}

impl KeyValueStore for SledStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        match self
            .db
            .get(key.as_bytes())
            .map_err(|e| ChatClientError::Storage(format!("Get failed: {}", e)))?
        {
            Some(bytes) => {
                let value = String::from_utf8(bytes.to_vec())
                    .map_err(|e| ChatClientError::Storage(format!("Invalid UTF-8: {}", e)))?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.db
            .insert(key.as_bytes(), value.as_bytes())
            .map_err(|e| ChatClientError::Storage(format!("Insert failed: {}", e)))?;
        self.db
            .flush()
            .map_err(|e| ChatClientError::Storage(format!("Flush failed: {}", e)))?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.db
            .remove(key.as_bytes())
            .map_err(|e| ChatClientError::Storage(format!("Remove failed: {}", e)))?;
        self.db
            .flush()
            .map_err(|e| ChatClientError::Storage(format!("Flush failed: {}", e)))?;
        Ok(())
    }
}

/// In-memory key-value store
///
/// Used by tests and as the degraded mode when durable storage is
/// unavailable.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    /// Creates an empty in-memory store
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.entries.remove(key);
        Ok(())
    }
}

/// Owner of the current session token and its persisted copy
///
/// Exactly one session is active per store instance. The token is read from
/// storage at start; if absent, a fresh one is generated and written back
/// immediately. A server-issued token may supersede it at any time via
/// [`SessionStore::adopt`].
///
/// # Examples
///
/// ```
/// use autostream::session::SessionStore;
///
/// let mut store = SessionStore::in_memory();
/// let token = store.acquire();
/// assert_eq!(store.acquire(), token);
/// ```
pub struct SessionStore {
    key: String,
    token: Option<String>,
    backing: Option<Box<dyn KeyValueStore>>,
}

impl SessionStore {
    /// Opens a store persisted at `path`
    ///
    /// If the database cannot be opened the store degrades to an
    /// in-memory-only token for this run; the failure is logged and never
    /// propagated.
    pub fn open(path: impl AsRef<Path>) -> Self {
        match SledStore::new(&path) {
            Ok(store) => Self::with_store(Box::new(store)),
            Err(e) => {
                tracing::warn!(
                    "Session storage unavailable at {}; using in-memory token: {}",
                    path.as_ref().display(),
                    e
                );
                Self {
                    key: SESSION_STORAGE_KEY.to_string(),
                    token: None,
                    backing: None,
                }
            }
        }
    }

    /// Creates a store over an explicit persistence collaborator
    pub fn with_store(backing: Box<dyn KeyValueStore>) -> Self {
        Self {
            key: SESSION_STORAGE_KEY.to_string(),
            token: None,
            backing: Some(backing),
        }
    }

    /// Creates a store with no durable persistence
    pub fn in_memory() -> Self {
        Self::with_store(Box::new(MemoryStore::new()))
    }

    /// Returns the current token, creating and persisting one if needed
    ///
    /// The first call reads the persisted copy; when none exists a fresh
    /// token is generated and written back immediately. Subsequent calls
    /// return the same token until [`SessionStore::adopt`] replaces it.
    pub fn acquire(&mut self) -> String {
        if let Some(token) = &self.token {
            return token.clone();
        }

        let stored = self.backing.as_ref().and_then(|b| match b.get(&self.key) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!("Failed to read persisted session token: {}", e);
                None
            }
        });

        let token = match stored {
            Some(token) => {
                tracing::debug!("Resuming persisted session");
                token
            }
            None => {
                let token = generate_session_token();
                tracing::debug!("Generated new session token");
                self.persist(&token);
                token
            }
        };

        self.token = Some(token.clone());
        token
    }

    /// Adopts a server-issued token
    ///
    /// No-op when `token` is empty or equal to the current value; otherwise
    /// the token replaces the current one and is persisted. The store never
    /// invents a token here; callers pass only values returned by the
    /// remote service.
    pub fn adopt(&mut self, token: &str) {
        if token.is_empty() || self.token.as_deref() == Some(token) {
            return;
        }
        tracing::debug!("Adopting server-issued session token");
        self.token = Some(token.to_string());
        self.persist(token);
    }

    /// Discards the current token and generates a fresh persisted one
    pub fn reset(&mut self) -> String {
        if let Some(backing) = &mut self.backing {
            if let Err(e) = backing.remove(&self.key) {
                tracing::warn!("Failed to remove persisted session token: {}", e);
            }
        }
        let token = generate_session_token();
        self.persist(&token);
        self.token = Some(token.clone());
        token
    }

    /// Best-effort write-back of the current token.
    fn persist(&mut self, token: &str) {
        if let Some(backing) = &mut self.backing {
            if let Err(e) = backing.set(&self.key, token) {
                tracing::warn!("Failed to persist session token: {}", e);
            }
        }
    }
}

/// Generates a new session token
///
/// Collision-resistant in practice (millisecond timestamp plus a random
/// base36 component) but not cryptographically unique; collisions only
/// affect conversational continuity.
pub fn generate_session_token() -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis();

    let mut rng = rand::rng();
    let suffix: String = (0..TOKEN_SUFFIX_LEN)
        .map(|_| TOKEN_ALPHABET[rng.random_range(0..TOKEN_ALPHABET.len())] as char)
        .collect();

    format!("session_{}_{}", millis, suffix)
}

/// Default filesystem location for the session database
///
/// Falls back to a path relative to the working directory when no home
/// directory can be resolved.
pub fn default_storage_path() -> PathBuf {
    directories::ProjectDirs::from("com", "AutoStream", "autostream")
        .map(|dirs| dirs.data_dir().join("session"))
        .unwrap_or_else(|| PathBuf::from(".autostream/session"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_token_format() {
        let token = generate_session_token();
        assert!(token.starts_with("session_"));
        let parts: Vec<&str> = token.split('_').collect();
        assert_eq!(parts.len(), 3);
        assert!(parts[1].chars().all(|c| c.is_ascii_digit()));
        assert_eq!(parts[2].len(), TOKEN_SUFFIX_LEN);
        assert!(parts[2]
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()));
    }

    #[test]
    fn test_generate_token_varies() {
        assert_ne!(generate_session_token(), generate_session_token());
    }

    #[test]
    fn test_acquire_is_stable_without_adopt() {
        let mut store = SessionStore::in_memory();
        let first = store.acquire();
        let second = store.acquire();
        assert_eq!(first, second);
    }

    #[test]
    fn test_acquire_persists_generated_token() {
        let mut backing = MemoryStore::new();
        backing.set(SESSION_STORAGE_KEY, "session_1_abcdefghi").unwrap();
        let mut store = SessionStore::with_store(Box::new(backing));
        assert_eq!(store.acquire(), "session_1_abcdefghi");
    }

    #[test]
    fn test_adopt_empty_is_noop() {
        let mut store = SessionStore::in_memory();
        let token = store.acquire();
        store.adopt("");
        assert_eq!(store.acquire(), token);
    }

    #[test]
    fn test_adopt_replaces_and_is_idempotent() {
        let mut store = SessionStore::in_memory();
        store.acquire();
        store.adopt("server_token");
        assert_eq!(store.acquire(), "server_token");
        // Adopting the same value again changes nothing.
        store.adopt("server_token");
        assert_eq!(store.acquire(), "server_token");
    }

    #[test]
    fn test_sled_round_trip_across_reopen() {
        let dir = tempfile::TempDir::new().expect("Failed to create temp dir");
        let path = dir.path().join("session");

        let token = {
            let mut store = SessionStore::open(&path);
            store.acquire()
        };

        let mut reopened = SessionStore::open(&path);
        assert_eq!(reopened.acquire(), token);
    }

    #[test]
    fn test_adopted_token_survives_reopen() {
        let dir = tempfile::TempDir::new().expect("Failed to create temp dir");
        let path = dir.path().join("session");

        {
            let mut store = SessionStore::open(&path);
            store.acquire();
            store.adopt("session_from_server");
        }

        let mut reopened = SessionStore::open(&path);
        assert_eq!(reopened.acquire(), "session_from_server");
    }

    #[test]
    fn test_open_degrades_to_memory_on_bad_path() {
        // A file (not a directory) at the database path makes sled fail.
        let dir = tempfile::TempDir::new().expect("Failed to create temp dir");
        let path = dir.path().join("blocker");
        std::fs::write(&path, b"not a database").expect("Failed to write blocker");

        let mut store = SessionStore::open(&path);
        let token = store.acquire();
        assert!(token.starts_with("session_"));
        assert_eq!(store.acquire(), token);
    }

    #[test]
    fn test_reset_generates_fresh_token() {
        let mut store = SessionStore::in_memory();
        let original = store.acquire();
        let fresh = store.reset();
        assert_ne!(original, fresh);
        assert_eq!(store.acquire(), fresh);
    }

    #[test]
    fn test_sled_store_remove() {
        let dir = tempfile::TempDir::new().expect("Failed to create temp dir");
        let mut store = SledStore::new(dir.path().join("kv")).expect("Failed to open store");
        store.set("k", "v").unwrap();
        assert_eq!(store.get("k").unwrap(), Some("v".to_string()));
        store.remove("k").unwrap();
        assert_eq!(store.get("k").unwrap(), None);
    }
}
