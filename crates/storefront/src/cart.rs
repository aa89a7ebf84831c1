//! Cart storage over the visitor's session.

use snackshop_core::{CartStore, KeyValueStore, StorageError};
use tower_sessions::Session;

/// [`KeyValueStore`] backed by a `tower-sessions` session.
#[derive(Debug, Clone)]
pub struct SessionStore {
    session: Session,
}

impl SessionStore {
    #[must_use]
    pub const fn new(session: Session) -> Self {
        Self { session }
    }
}

fn backend(e: tower_sessions::session::Error) -> StorageError {
    StorageError::Backend(e.to_string())
}

impl KeyValueStore for SessionStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.session.get::<String>(key).await.map_err(backend)
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StorageError> {
        self.session.insert(key, value).await.map_err(backend)
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.session
            .remove::<String>(key)
            .await
            .map(|_| ())
            .map_err(backend)
    }
}

/// The cart of the session's visitor.
#[must_use]
pub fn cart_store(session: &Session) -> CartStore<SessionStore> {
    CartStore::new(SessionStore::new(session.clone()))
}
