//! Session state shared by the route guard and the HTTP client. The session is
//! read from and written to an injected `Storage` backend under the keys
//! `token`, `refresh_token` and `role`; nothing here is ambient global state.

pub mod storage;

pub use self::storage::{FileStorage, MemoryStorage, Storage, StorageError};

use secrecy::{ExposeSecret, SecretString};
use std::{fmt, str::FromStr, sync::Arc};
use tracing::warn;

pub const TOKEN_KEY: &str = "token";
pub const REFRESH_TOKEN_KEY: &str = "refresh_token";
pub const ROLE_KEY: &str = "role";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Manager,
    Supplier,
}

impl Role {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Manager => "manager",
            Role::Supplier => "supplier",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "manager" => Ok(Role::Manager),
            "supplier" => Ok(Role::Supplier),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

/// Snapshot of the stored credentials. Empty values are treated as absent.
#[derive(Debug, Clone, Default)]
pub struct Session {
    access: Option<SecretString>,
    refresh: Option<SecretString>,
    role: Option<Role>,
}

impl Session {
    #[must_use]
    pub fn new(access: Option<&str>, refresh: Option<&str>, role: Option<Role>) -> Self {
        Self {
            access: non_empty_secret(access),
            refresh: non_empty_secret(refresh),
            role,
        }
    }

    #[must_use]
    pub fn access_token(&self) -> Option<&str> {
        self.access.as_ref().map(|secret| secret.expose_secret())
    }

    #[must_use]
    pub fn refresh_token(&self) -> Option<&str> {
        self.refresh.as_ref().map(|secret| secret.expose_secret())
    }

    #[must_use]
    pub fn role(&self) -> Option<Role> {
        self.role
    }

    /// A role without an access credential does not authenticate anyone.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.access.is_some()
    }
}

fn non_empty_secret(value: Option<&str>) -> Option<SecretString> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(|value| SecretString::from(value.to_string()))
}

/// Typed view over a `Storage` backend. Cloning shares the backend.
#[derive(Clone)]
pub struct SessionStore {
    storage: Arc<dyn Storage>,
}

impl fmt::Debug for SessionStore {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_struct("SessionStore").finish_non_exhaustive()
    }
}

impl SessionStore {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    /// Store backed by process memory only.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStorage::new()))
    }

    /// Reads the current session. Unknown roles read as absent.
    #[must_use]
    pub fn get(&self) -> Session {
        let access = self.storage.get_item(TOKEN_KEY);
        let refresh = self.storage.get_item(REFRESH_TOKEN_KEY);
        let role = self
            .storage
            .get_item(ROLE_KEY)
            .and_then(|role| role.trim().parse::<Role>().ok());

        Session::new(access.as_deref(), refresh.as_deref(), role)
    }

    /// Replaces the whole session; absent fields are removed.
    pub fn set(&self, session: &Session) {
        self.write(TOKEN_KEY, session.access_token());
        self.write(REFRESH_TOKEN_KEY, session.refresh_token());
        self.write(ROLE_KEY, session.role().map(Role::as_str));
    }

    /// Replaces only the access credential, as a refresh does.
    pub fn set_access(&self, token: &str) {
        self.write(TOKEN_KEY, Some(token));
    }

    pub fn clear(&self) {
        self.write(TOKEN_KEY, None);
        self.write(REFRESH_TOKEN_KEY, None);
        self.write(ROLE_KEY, None);
    }

    fn write(&self, key: &str, value: Option<&str>) {
        let result = match value {
            Some(value) => self.storage.set_item(key, value),
            None => self.storage.remove_item(key),
        };

        if let Err(err) = result {
            warn!("Failed to persist session key {}: {}", key, err);
        }
    }
}
