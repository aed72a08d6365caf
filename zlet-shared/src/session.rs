//! Process-wide session context.
//!
//! The session owns the bearer token. It is started by a successful login,
//! ended by an explicit logout and expired when the server answers `401`.
//! Storage is pluggable so the browser keeps the token in local storage and
//! the terminal client in a file.

use std::fmt;
use std::sync::{Arc, Mutex};

use thiserror::Error;
use tracing::{debug, info, warn};

/// Failure to read or write persisted session state.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("failed to persist session token: {0}")]
    Persist(String),
}

/// Backing storage for the bearer token.
pub trait TokenStore: Send + Sync + fmt::Debug {
    fn load(&self) -> Option<String>;

    /// # Errors
    /// Returns [`SessionError::Persist`] when the store cannot be written.
    fn save(&self, token: &str) -> Result<(), SessionError>;

    fn clear(&self);
}

/// Token kept in memory only. Used by tests and short lived tools.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Mutex::new(Some(token.into())),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Option<String> {
        self.token.lock().ok().and_then(|guard| guard.clone())
    }

    fn save(&self, token: &str) -> Result<(), SessionError> {
        let mut guard = self
            .token
            .lock()
            .map_err(|err| SessionError::Persist(err.to_string()))?;
        *guard = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) {
        if let Ok(mut guard) = self.token.lock() {
            *guard = None;
        }
    }
}

/// Outcome of the presence-based route guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Granted,
    RedirectToEntry,
}

type ExpiryHook = Arc<dyn Fn() + Send + Sync>;

/// Session context shared by every request.
#[derive(Clone)]
pub struct Session {
    store: Arc<dyn TokenStore>,
    on_expired: Option<ExpiryHook>,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("store", &self.store)
            .field("active", &self.is_active())
            .field("has_expiry_hook", &self.on_expired.is_some())
            .finish()
    }
}

impl Session {
    pub fn new(store: Arc<dyn TokenStore>) -> Self {
        Self {
            store,
            on_expired: None,
        }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryTokenStore::default()))
    }

    /// Registers a callback run after the session expires, typically a
    /// navigation back to the entry view.
    #[must_use]
    pub fn with_expiry_hook(mut self, hook: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_expired = Some(Arc::new(hook));
        self
    }

    pub fn token(&self) -> Option<String> {
        self.store.load().filter(|token| !token.is_empty())
    }

    pub fn is_active(&self) -> bool {
        self.token().is_some()
    }

    /// Starts a session with a freshly issued token.
    ///
    /// # Errors
    /// Propagates storage failures from the underlying [`TokenStore`].
    pub fn begin(&self, token: &str) -> Result<(), SessionError> {
        self.store.save(token)?;
        info!("session started");
        Ok(())
    }

    /// Ends the session at the user's request.
    pub fn end(&self) {
        self.store.clear();
        info!("session ended");
    }

    /// Tears the session down after the server rejected the token.
    pub fn expire(&self) {
        self.store.clear();
        warn!("session expired; returning to the entry view");
        if let Some(hook) = &self.on_expired {
            hook();
        }
    }

    /// Presence-based check. A stale token still passes; the next request
    /// that comes back `401` expires it.
    pub fn guard(&self) -> Access {
        if self.is_active() {
            Access::Granted
        } else {
            debug!("no session token; redirecting to the entry view");
            Access::RedirectToEntry
        }
    }
}
