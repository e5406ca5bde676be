//! In-process credential store shared by every API client.

use std::fmt;
use std::path::PathBuf;

use parking_lot::RwLock;
use secrecy::{ExposeSecret, SecretString};

use crate::error::AuthError;
use crate::token_file;

/// Environment variable that supplies a token without logging in.
pub const TOKEN_ENV_VAR: &str = "LECTERN_AUTH__TOKEN";

/// Where the current token came from (for status display).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenSource {
    Env,
    File,
    Login,
}

impl TokenSource {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Env => "env",
            Self::File => "file",
            Self::Login => "login",
        }
    }
}

impl fmt::Display for TokenSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

struct Credential {
    token: SecretString,
    source: TokenSource,
}

/// Holds the bearer token for the current process.
///
/// Set at login, cleared at logout. Reads never fail: an absent token simply
/// yields `None`, and callers still issue their request so the backend's
/// authorization error reaches the user unaltered.
pub struct CredentialStore {
    current: RwLock<Option<Credential>>,
    path: Option<PathBuf>,
}

impl CredentialStore {
    /// A store that never touches disk.
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            current: RwLock::new(None),
            path: None,
        }
    }

    /// A store persisted at `path`, preloaded from that file if it exists.
    #[must_use]
    pub fn with_file(path: PathBuf) -> Self {
        let current = token_file::load(&path).map(|token| Credential {
            token: SecretString::new(token),
            source: TokenSource::File,
        });
        Self {
            current: RwLock::new(current),
            path: Some(path),
        }
    }

    /// Resolve the store used by the CLI.
    ///
    /// Priority: `LECTERN_AUTH__TOKEN` env → `~/.lectern/credentials`.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::TokenStoreError` if the home directory cannot be resolved.
    pub fn load_default() -> Result<Self, AuthError> {
        let store = Self::with_file(token_file::default_path()?);
        if let Ok(token) = std::env::var(TOKEN_ENV_VAR)
            && !token.trim().is_empty()
        {
            *store.current.write() = Some(Credential {
                token: SecretString::new(token.trim().to_string()),
                source: TokenSource::Env,
            });
        }
        Ok(store)
    }

    /// Record a token obtained at login, persisting it when file-backed.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::EmptyToken` for a blank token, or
    /// `AuthError::TokenStoreError` if persisting fails. On error the
    /// previous credential is kept.
    pub fn login(&self, token: &str) -> Result<(), AuthError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(AuthError::EmptyToken);
        }
        if let Some(path) = &self.path {
            token_file::store(path, token)?;
        }
        *self.current.write() = Some(Credential {
            token: SecretString::new(token.to_string()),
            source: TokenSource::Login,
        });
        tracing::debug!("credential stored");
        Ok(())
    }

    /// Clear the in-memory token and delete the persisted file.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::TokenStoreError` if the credentials file cannot be removed.
    pub fn logout(&self) -> Result<(), AuthError> {
        self.current.write().take();
        if let Some(path) = &self.path {
            token_file::delete(path)?;
        }
        tracing::debug!("credential cleared");
        Ok(())
    }

    /// The token to attach as `Authorization: Bearer …`, if any.
    #[must_use]
    pub fn bearer(&self) -> Option<String> {
        self.current
            .read()
            .as_ref()
            .map(|credential| credential.token.expose_secret().clone())
    }

    #[must_use]
    pub fn source(&self) -> Option<TokenSource> {
        self.current.read().as_ref().map(|credential| credential.source)
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.current.read().is_some()
    }
}

impl fmt::Debug for CredentialStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialStore")
            .field("source", &self.source())
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}
