//! Holder of the bearer token used by [`crate::APIClient`].
//!
//! A [`Session`] is injected into the client rather than read from a global,
//! so tests and multiple dashboards can each own their own. The token is
//! mirrored to a [`TokenStore`] so a restarted process stays signed in.

use secrecy::{ExposeSecret, SecretBox};
use std::{
    fmt, io,
    path::PathBuf,
    sync::{Arc, Mutex, PoisonError, RwLock},
};

/// Persistent storage for the session token.
pub trait TokenStore: Send + Sync + fmt::Debug {
    fn load(&self) -> io::Result<Option<String>>;
    fn save(&self, token: &str) -> io::Result<()>;
    fn clear(&self) -> io::Result<()>;
}

/// Keeps the token in a single file.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> io::Result<Option<String>> {
        match std::fs::read_to_string(&self.path) {
            Ok(token) => {
                let token = token.trim();
                Ok((!token.is_empty()).then(|| token.to_string()))
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn save(&self, token: &str) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, token)
    }

    fn clear(&self) -> io::Result<()> {
        match std::fs::remove_file(&self.path) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
            _ => Ok(()),
        }
    }
}

/// Keeps the token for the life of the process only.
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
    fn load(&self) -> io::Result<Option<String>> {
        Ok(self
            .token
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }

    fn save(&self, token: &str) -> io::Result<()> {
        *self.token.lock().unwrap_or_else(PoisonError::into_inner) =
            Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> io::Result<()> {
        *self.token.lock().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }
}

#[derive(Clone)]
pub struct Session {
    token: Arc<RwLock<Option<SecretBox<String>>>>,
    store: Arc<dyn TokenStore>,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("authenticated", &self.is_authenticated())
            .field("store", &self.store)
            .finish()
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(Arc::new(MemoryTokenStore::default()))
    }
}

impl Session {
    /// Create a session, restoring any token the store already holds.
    pub fn new(store: Arc<dyn TokenStore>) -> Self {
        let token = match store.load() {
            Ok(token) => token,
            Err(e) => {
                tracing::warn!("could not load persisted session token: {e}");
                None
            }
        };
        Self {
            token: Arc::new(RwLock::new(
                token.map(|t| SecretBox::new(Box::new(t))),
            )),
            store,
        }
    }

    pub fn in_memory() -> Self {
        Self::default()
    }

    pub fn set_token(&self, token: impl Into<String>) {
        let token = token.into();
        if let Err(e) = self.store.save(&token) {
            tracing::warn!("could not persist session token: {e}");
        }
        *self.token.write().unwrap_or_else(PoisonError::into_inner) =
            Some(SecretBox::new(Box::new(token)));
    }

    pub fn clear_token(&self) {
        if let Err(e) = self.store.clear() {
            tracing::warn!("could not clear persisted session token: {e}");
        }
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = None;
    }

    pub fn is_authenticated(&self) -> bool {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// The raw token, for callers that must hand it on.
    pub fn token(&self) -> Option<SecretBox<String>> {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|t| SecretBox::new(Box::new(t.expose_secret().clone())))
    }

    pub(crate) fn bearer(&self) -> Option<String> {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|t| format!("Bearer {}", t.expose_secret()))
    }
}
