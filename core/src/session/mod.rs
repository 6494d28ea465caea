//! Credential cache: the bearer token and user profile of the signed-in admin.
//!
//! # Design
//! `SessionStore` is constructed explicitly over a `Storage` backend and
//! shared as `Arc<SessionStore>` with `MarketplaceClient`; there is no global.
//! Token and profile are two independent persisted keys. They are written and
//! cleared together by `sign_in` and `logout`, but nothing makes the pair
//! atomic.
//!
//! Restoring never fails: missing keys, unreadable storage, or a profile that
//! no longer decodes all resolve to an empty value.

mod storage;
mod token;

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{debug, warn};

use crate::types::{AuthResponse, UserProfile};

pub use storage::{FileStorage, MemoryStorage, Storage, StorageError};
pub use token::is_well_formed;

/// Storage key of the bearer token.
pub const TOKEN_KEY: &str = "token";
/// Storage key of the JSON-encoded profile.
pub const USER_KEY: &str = "user";

/// In-memory view of the credential cache.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub token: Option<String>,
    pub user: Option<UserProfile>,
}

impl Session {
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }
}

pub struct SessionStore {
    storage: Arc<dyn Storage>,
    state: RwLock<Session>,
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.read();
        f.debug_struct("SessionStore")
            .field("has_token", &state.token.is_some())
            .field("user", &state.user)
            .finish()
    }
}

impl SessionStore {
    /// An empty cache over `storage`. Call `load_session` to restore.
    pub fn new(storage: impl Storage + 'static) -> Self {
        Self::with_shared_storage(Arc::new(storage))
    }

    pub fn with_shared_storage(storage: Arc<dyn Storage>) -> Self {
        Self {
            storage,
            state: RwLock::new(Session::default()),
        }
    }

    pub fn in_memory() -> Self {
        Self::new(MemoryStorage::new())
    }

    /// Persist `token`, or clear it when `None` or empty.
    pub fn set_token(&self, token: Option<&str>) -> Result<(), StorageError> {
        let token = token.filter(|t| !t.is_empty());
        match token {
            Some(t) => self.storage.set_item(TOKEN_KEY, t)?,
            None => self.storage.remove_item(TOKEN_KEY)?,
        }
        debug!(present = token.is_some(), "token updated");
        self.write().token = token.map(str::to_string);
        Ok(())
    }

    /// Persist the profile snapshot, or clear it when `None`.
    pub fn set_user(&self, user: Option<&UserProfile>) -> Result<(), StorageError> {
        match user {
            Some(profile) => {
                let raw = serde_json::to_string(profile)?;
                self.storage.set_item(USER_KEY, &raw)?;
            }
            None => self.storage.remove_item(USER_KEY)?,
        }
        debug!(present = user.is_some(), "user profile updated");
        self.write().user = user.cloned();
        Ok(())
    }

    /// Read token and profile back from storage into memory.
    pub fn load_session(&self) -> Session {
        let token = match self.storage.get_item(TOKEN_KEY) {
            Ok(token) => token.filter(|t| !t.is_empty()),
            Err(e) => {
                warn!(error = %e, "could not read stored token");
                None
            }
        };
        let user = match self.storage.get_item(USER_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<UserProfile>(&raw) {
                Ok(profile) => Some(profile),
                Err(e) => {
                    warn!(error = %e, "discarding undecodable stored profile");
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                warn!(error = %e, "could not read stored profile");
                None
            }
        };

        let session = Session { token, user };
        debug!(authenticated = session.is_authenticated(), "session restored");
        *self.write() = session.clone();
        session
    }

    /// Clear both persisted keys and the in-memory state.
    pub fn logout(&self) -> Result<(), StorageError> {
        let result = self.storage.multi_remove(&[TOKEN_KEY, USER_KEY]);
        *self.write() = Session::default();
        debug!("session cleared");
        result
    }

    /// Cache the profile and token from a successful login, profile first.
    pub fn sign_in(&self, auth: &AuthResponse) -> Result<Option<UserProfile>, StorageError> {
        let profile = auth.profile();
        self.set_user(profile.as_ref())?;
        self.set_token(Some(&auth.token))?;
        Ok(profile)
    }

    pub fn token(&self) -> Option<String> {
        self.read().token.clone()
    }

    pub fn user(&self) -> Option<UserProfile> {
        self.read().user.clone()
    }

    pub fn snapshot(&self) -> Session {
        self.read().clone()
    }

    /// The cached token, only if it passes the JWT shape check.
    pub fn bearer_token(&self) -> Option<String> {
        self.token().filter(|t| is_well_formed(t))
    }

    fn read(&self) -> RwLockReadGuard<'_, Session> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Session> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}
