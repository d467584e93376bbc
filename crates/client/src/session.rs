//! Session store.
//!
//! A single [`Session`] handle owns the authenticated user and bearer token
//! and is passed by reference to the API client and every hook. Persistence
//! mirrors the three keys the web client kept in local storage:
//!
//! | Key         | Value                          |
//! |-------------|--------------------------------|
//! | `authToken` | bearer token                   |
//! | `userData`  | JSON blob of the logged-in user |
//! | `userId`    | the user's id as a string      |
//!
//! All three are written together on sign-in and removed together on
//! logout or on any 401 response.

use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use greencart_core::{Role, UserId};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::types::User;

/// Errors from the session storage backend.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Session storage I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Session storage is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
    #[error("Session storage lock poisoned")]
    Poisoned,
}

// =============================================================================
// Storage
// =============================================================================

/// Persisted session keys, named as the web client named them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredSession {
    #[serde(rename = "authToken", default, skip_serializing_if = "Option::is_none")]
    pub auth_token: Option<String>,
    #[serde(rename = "userData", default, skip_serializing_if = "Option::is_none")]
    pub user_data: Option<String>,
    #[serde(rename = "userId", default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

impl StoredSession {
    /// True when none of the keys are present.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.auth_token.is_none() && self.user_data.is_none() && self.user_id.is_none()
    }
}

/// Backend that persists the session keys between runs.
pub trait SessionStorage: Send + Sync {
    /// Read the persisted keys.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read or is corrupt.
    fn load(&self) -> Result<StoredSession, SessionError>;

    /// Replace the persisted keys.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn save(&self, stored: &StoredSession) -> Result<(), SessionError>;

    /// Remove all persisted keys.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn clear(&self) -> Result<(), SessionError> {
        self.save(&StoredSession::default())
    }
}

/// In-memory storage; nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    stored: Mutex<StoredSession>,
}

impl MemoryStorage {
    /// Start with the given keys already present.
    #[must_use]
    pub const fn with(stored: StoredSession) -> Self {
        Self {
            stored: Mutex::new(stored),
        }
    }

    /// Copy of the currently stored keys.
    #[must_use]
    pub fn snapshot(&self) -> StoredSession {
        self.stored
            .lock()
            .map(|s| s.clone())
            .unwrap_or_default()
    }
}

impl SessionStorage for MemoryStorage {
    fn load(&self) -> Result<StoredSession, SessionError> {
        self.stored
            .lock()
            .map(|s| s.clone())
            .map_err(|_| SessionError::Poisoned)
    }

    fn save(&self, stored: &StoredSession) -> Result<(), SessionError> {
        let mut guard = self.stored.lock().map_err(|_| SessionError::Poisoned)?;
        *guard = stored.clone();
        Ok(())
    }
}

/// JSON file storage.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    /// Use `path` as the session file, creating its parent directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the parent directory cannot be created.
    pub fn new(path: PathBuf) -> Result<Self, SessionError> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        Ok(Self { path })
    }
}

impl SessionStorage for FileStorage {
    fn load(&self) -> Result<StoredSession, SessionError> {
        match fs::read_to_string(&self.path) {
            Ok(contents) if contents.trim().is_empty() => Ok(StoredSession::default()),
            Ok(contents) => Ok(serde_json::from_str(&contents)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(StoredSession::default()),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, stored: &StoredSession) -> Result<(), SessionError> {
        if stored.is_empty() {
            return self.clear();
        }
        fs::write(&self.path, serde_json::to_string_pretty(stored)?)?;
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

// =============================================================================
// Session
// =============================================================================

/// Navigation requests published by the session.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Navigation {
    /// Nothing requested.
    #[default]
    Stay,
    /// Send the user to the login page (session expired or logged out).
    Login,
}

#[derive(Clone, Default)]
struct SessionState {
    token: Option<SecretString>,
    user: Option<User>,
}

/// Shared authentication state.
///
/// Cheaply cloneable; all clones observe the same state.
#[derive(Clone)]
pub struct Session {
    inner: Arc<SessionInner>,
}

struct SessionInner {
    state: watch::Sender<SessionState>,
    navigation: watch::Sender<Navigation>,
    storage: Arc<dyn SessionStorage>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.inner.state.borrow();
        f.debug_struct("Session")
            .field("token", &state.token.as_ref().map(|_| "[REDACTED]"))
            .field("user_id", &state.user.as_ref().map(|u| u.user_id))
            .finish_non_exhaustive()
    }
}

impl Session {
    /// An anonymous session persisted nowhere.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::with_storage(Arc::new(MemoryStorage::default()), SessionState::default())
    }

    /// Restore a session from storage.
    ///
    /// The user is only considered logged in when both the token and the
    /// user blob are present; a partial or unreadable blob is discarded and
    /// the storage cleared.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage backend cannot be read or cleared.
    pub fn restore(storage: Arc<dyn SessionStorage>) -> Result<Self, SessionError> {
        let stored = match storage.load() {
            Ok(stored) => stored,
            Err(SessionError::Corrupt(e)) => {
                warn!(error = %e, "Discarding corrupt session storage");
                storage.clear()?;
                StoredSession::default()
            }
            Err(e) => return Err(e),
        };

        let state = match (&stored.auth_token, &stored.user_data) {
            (Some(token), Some(blob)) => match serde_json::from_str::<User>(blob) {
                Ok(user) => {
                    debug!(user_id = %user.user_id, "Restored session");
                    SessionState {
                        token: Some(SecretString::from(token.clone())),
                        user: Some(user),
                    }
                }
                Err(e) => {
                    warn!(error = %e, "Discarding unreadable user blob");
                    storage.clear()?;
                    SessionState::default()
                }
            },
            _ => {
                if !stored.is_empty() {
                    storage.clear()?;
                }
                SessionState::default()
            }
        };

        Ok(Self::with_storage(storage, state))
    }

    fn with_storage(storage: Arc<dyn SessionStorage>, state: SessionState) -> Self {
        let (state, _) = watch::channel(state);
        let (navigation, _) = watch::channel(Navigation::Stay);
        Self {
            inner: Arc::new(SessionInner {
                state,
                navigation,
                storage,
            }),
        }
    }

    /// Store a freshly issued token and user, persisting all three keys.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage backend cannot be written. The
    /// in-memory session is updated regardless.
    pub fn sign_in(&self, token: SecretString, user: User) -> Result<(), SessionError> {
        let stored = StoredSession {
            auth_token: Some(token.expose_secret().to_string()),
            user_data: Some(serde_json::to_string(&user)?),
            user_id: Some(user.user_id.to_string()),
        };
        info!(user_id = %user.user_id, role = %user.role, "Signed in");
        self.inner.state.send_replace(SessionState {
            token: Some(token),
            user: Some(user),
        });
        self.inner.navigation.send_replace(Navigation::Stay);
        self.inner.storage.save(&stored)
    }

    /// Replace the cached user after a profile update, keeping the token.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage backend cannot be written.
    pub fn update_user(&self, user: User) -> Result<(), SessionError> {
        let Some(token) = self.token() else {
            return Ok(());
        };
        let stored = StoredSession {
            auth_token: Some(token.expose_secret().to_string()),
            user_data: Some(serde_json::to_string(&user)?),
            user_id: Some(user.user_id.to_string()),
        };
        self.inner.state.send_modify(|state| state.user = Some(user));
        self.inner.storage.save(&stored)
    }

    /// Forget the user and token and remove every persisted key.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage backend cannot be cleared. The
    /// in-memory session is cleared regardless.
    pub fn clear(&self) -> Result<(), SessionError> {
        self.inner.state.send_replace(SessionState::default());
        self.inner.storage.clear()
    }

    /// Global handler for 401 responses: clear everything and send the
    /// user to the login page.
    pub fn expire(&self) {
        warn!("Session rejected by server, clearing credentials");
        if let Err(e) = self.clear() {
            warn!(error = %e, "Failed to clear session storage");
        }
        self.inner.navigation.send_replace(Navigation::Login);
    }

    /// Bearer token, if signed in.
    #[must_use]
    pub fn token(&self) -> Option<SecretString> {
        self.inner.state.borrow().token.clone()
    }

    /// Logged-in user, if any.
    #[must_use]
    pub fn user(&self) -> Option<User> {
        self.inner.state.borrow().user.clone()
    }

    /// Logged-in user's id, if any.
    #[must_use]
    pub fn user_id(&self) -> Option<UserId> {
        self.inner.state.borrow().user.as_ref().map(|u| u.user_id)
    }

    /// Logged-in user's role, if any.
    #[must_use]
    pub fn role(&self) -> Option<Role> {
        self.inner.state.borrow().user.as_ref().map(|u| u.role)
    }

    /// Whether a token and user are present.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        let state = self.inner.state.borrow();
        state.token.is_some() && state.user.is_some()
    }

    /// The most recent navigation request.
    #[must_use]
    pub fn pending_navigation(&self) -> Navigation {
        self.inner.navigation.borrow().clone()
    }

    /// Subscribe to navigation requests.
    #[must_use]
    pub fn navigation(&self) -> watch::Receiver<Navigation> {
        self.inner.navigation.subscribe()
    }

    /// Acknowledge a navigation request once it has been acted on.
    pub fn acknowledge_navigation(&self) {
        self.inner.navigation.send_replace(Navigation::Stay);
    }
}
