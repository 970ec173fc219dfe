//! Session identity: one random id per browsing session.
//!
//! The backend correlates requests by an `x-session-id` header that is
//! independent of login state. The id is generated once, persisted in
//! session-scoped storage, and reused for every request until the session
//! ends. Storage is injected so the provider stays testable and so hosts can
//! plug in whatever session-scoped persistence they have.

use std::collections::HashMap;
use std::sync::Mutex;

use thiserror::Error;
use uuid::Uuid;

/// Storage key under which the session id is persisted.
pub const SESSION_ID_KEY: &str = "app_session_id";

/// Failure talking to the session storage backend.
#[derive(Debug, Error)]
#[error("session storage error: {0}")]
pub struct StorageError(pub String);

/// Session-scoped key/value storage.
///
/// Implementations are expected to be cleared when the session ends; the
/// in-memory implementation below ties the session to the process lifetime.
pub trait SessionStorage: Send + Sync {
    /// Read a value, `None` when the key has never been written.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] when the backend is unreachable.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Persist a value.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] when the backend is unreachable.
    fn put(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Process-lifetime storage backed by a mutex-guarded map.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let entries = match self.entries.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        Ok(entries.get(key).cloned())
    }

    fn put(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = match self.entries.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// The per-session correlation id sent with every request.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionId(String);

impl SessionId {
    /// Load the persisted session id, generating and persisting a fresh
    /// UUID v4 if storage holds none.
    ///
    /// Repeated calls against the same storage return the identical value.
    /// Storage failures degrade to a fresh id for this handle rather than
    /// failing the caller; the correlation is then process-local only.
    pub fn load_or_generate(storage: &dyn SessionStorage) -> Self {
        match storage.get(SESSION_ID_KEY) {
            Ok(Some(existing)) => return Self(existing),
            Ok(None) => {}
            Err(err) => {
                tracing::warn!(error = %err, "session storage read failed, using fresh id");
                return Self(Uuid::new_v4().to_string());
            }
        }

        let fresh = Uuid::new_v4().to_string();
        if let Err(err) = storage.put(SESSION_ID_KEY, &fresh) {
            tracing::warn!(error = %err, "session storage write failed, id not persisted");
        }
        Self(fresh)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FailingStorage;

    impl SessionStorage for FailingStorage {
        fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError("backend offline".to_string()))
        }

        fn put(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError("backend offline".to_string()))
        }
    }

    #[test]
    fn stable_across_repeated_loads() {
        let storage = MemoryStorage::new();
        let first = SessionId::load_or_generate(&storage);
        let second = SessionId::load_or_generate(&storage);
        let third = SessionId::load_or_generate(&storage);
        assert_eq!(first, second);
        assert_eq!(second, third);
    }

    #[test]
    fn generates_a_uuid() {
        let storage = MemoryStorage::new();
        let id = SessionId::load_or_generate(&storage);
        assert!(Uuid::parse_str(id.as_str()).is_ok());
    }

    #[test]
    fn distinct_sessions_get_distinct_ids() {
        let a = SessionId::load_or_generate(&MemoryStorage::new());
        let b = SessionId::load_or_generate(&MemoryStorage::new());
        assert_ne!(a, b);
    }

    #[test]
    fn storage_failure_falls_back_to_fresh_id() {
        let id = SessionId::load_or_generate(&FailingStorage);
        assert!(Uuid::parse_str(id.as_str()).is_ok());
    }
}
