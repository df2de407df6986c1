//! Admin session persistence.
//!
//! The bearer token obtained from `/admin/login` is kept behind the
//! [`TokenStore`] trait so the CLI can persist it to disk while tests and
//! embedded callers keep it in memory. [`AuthSession`] is the cheap, cloneable
//! handle the rest of the crate passes around.

use std::fmt;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from reading or writing a persisted session.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("session file is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),

    #[error("session store lock poisoned")]
    Poisoned,
}

/// What gets persisted after a successful login.
#[derive(Clone, Serialize, Deserialize)]
pub struct StoredSession {
    pub token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl StoredSession {
    #[must_use]
    pub fn new(token: &SecretString, email: Option<&str>) -> Self {
        Self {
            token: token.expose_secret().to_string(),
            email: email.map(str::to_string),
        }
    }
}

impl fmt::Debug for StoredSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoredSession")
            .field("token", &"[REDACTED]")
            .field("email", &self.email)
            .finish()
    }
}

/// Backing storage for the admin bearer token.
pub trait TokenStore: Send + Sync + fmt::Debug {
    /// Load the stored session, `None` when nobody is signed in.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` if the storage cannot be read.
    fn load(&self) -> Result<Option<StoredSession>, SessionError>;

    /// Replace the stored session.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` if the storage cannot be written.
    fn save(&self, session: &StoredSession) -> Result<(), SessionError>;

    /// Remove the stored session. Clearing an empty store is not an error.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` if the storage cannot be written.
    fn clear(&self) -> Result<(), SessionError>;
}

/// Session kept in process memory only.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    session: Mutex<Option<StoredSession>>,
}

impl MemoryTokenStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<Option<StoredSession>, SessionError> {
        let guard = self.session.lock().map_err(|_| SessionError::Poisoned)?;
        Ok(guard.clone())
    }

    fn save(&self, session: &StoredSession) -> Result<(), SessionError> {
        let mut guard = self.session.lock().map_err(|_| SessionError::Poisoned)?;
        *guard = Some(session.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        let mut guard = self.session.lock().map_err(|_| SessionError::Poisoned)?;
        *guard = None;
        Ok(())
    }
}

/// Session persisted as JSON on disk (owner-only permissions on Unix).
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Result<Option<StoredSession>, SessionError> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        if raw.trim().is_empty() {
            return Ok(None);
        }
        let session: StoredSession = serde_json::from_str(&raw)?;
        Ok((!session.token.is_empty()).then_some(session))
    }

    fn save(&self, session: &StoredSession) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let body = serde_json::to_vec_pretty(session)?;
        std::fs::write(&self.path, body)?;
        restrict_permissions(&self.path)?;
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> std::io::Result<()> {
    Ok(())
}

/// Shared handle to the session store.
#[derive(Clone)]
pub struct AuthSession {
    store: Arc<dyn TokenStore>,
}

impl AuthSession {
    pub fn new(store: impl TokenStore + 'static) -> Self {
        Self {
            store: Arc::new(store),
        }
    }

    /// Session that lives only as long as the process.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(MemoryTokenStore::new())
    }

    /// Session persisted at `path`.
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::new(FileTokenStore::new(path))
    }

    /// The stored bearer token, if any.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` if the store cannot be read.
    pub fn token(&self) -> Result<Option<SecretString>, SessionError> {
        Ok(self
            .store
            .load()?
            .map(|session| SecretString::from(session.token)))
    }

    /// Email of the signed-in admin, if recorded at login.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` if the store cannot be read.
    pub fn email(&self) -> Result<Option<String>, SessionError> {
        Ok(self.store.load()?.and_then(|session| session.email))
    }

    /// Persist a freshly issued token.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` if the store cannot be written.
    pub fn set_token(&self, token: &SecretString, email: Option<&str>) -> Result<(), SessionError> {
        self.store.save(&StoredSession::new(token, email))
    }

    /// Forget the stored token.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` if the store cannot be written.
    pub fn clear(&self) -> Result<(), SessionError> {
        self.store.clear()
    }
}

impl fmt::Debug for AuthSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthSession")
            .field("store", &self.store)
            .finish()
    }
}
