//! File persistence for the bearer token (`~/.lectern/credentials`).
//!
//! The file and its parent directory are restricted to the owner on Unix.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::AuthError;

const CREDENTIALS_FILE_NAME: &str = "credentials";

/// Default location of the credentials file.
///
/// # Errors
///
/// Returns `AuthError::TokenStoreError` if the home directory cannot be resolved.
pub fn default_path() -> Result<PathBuf, AuthError> {
    dirs::home_dir()
        .map(|h| h.join(".lectern").join(CREDENTIALS_FILE_NAME))
        .ok_or_else(|| {
            AuthError::TokenStoreError("home directory not found, cannot store credentials".into())
        })
}

/// Write `token` to `path`, creating the parent directory if needed.
///
/// # Errors
///
/// Returns `AuthError::TokenStoreError` if the directory or file cannot be written.
pub fn store(path: &Path, token: &str) -> Result<(), AuthError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| AuthError::TokenStoreError(format!("mkdir {}: {e}", parent.display())))?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            if let Err(e) = fs::set_permissions(parent, fs::Permissions::from_mode(0o700)) {
                tracing::warn!("failed to chmod 0700 {}: {e}", parent.display());
            }
        }
    }
    fs::write(path, token)
        .map_err(|e| AuthError::TokenStoreError(format!("write {}: {e}", path.display())))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o600))
            .map_err(|e| AuthError::TokenStoreError(format!("chmod {}: {e}", path.display())))?;
    }

    Ok(())
}

/// Read the token at `path`. Missing or whitespace-only files yield `None`.
#[must_use]
pub fn load(path: &Path) -> Option<String> {
    fs::read_to_string(path)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Remove the credentials file if it exists.
///
/// # Errors
///
/// Returns `AuthError::TokenStoreError` if the file exists but cannot be removed.
pub fn delete(path: &Path) -> Result<(), AuthError> {
    if path.exists() {
        fs::remove_file(path).map_err(|e| {
            AuthError::TokenStoreError(format!("failed to delete {}: {e}", path.display()))
        })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_path_is_under_home() {
        let path = default_path().expect("should resolve");
        assert!(path.ends_with(".lectern/credentials"));
    }

    #[test]
    fn store_load_delete_cycle() {
        let tmp = tempfile::TempDir::new().expect("tmp dir");
        let path = tmp.path().join("nested").join("credentials");

        store(&path, "tok_abc123").expect("store");
        assert_eq!(load(&path).as_deref(), Some("tok_abc123"));

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = fs::metadata(&path).expect("metadata").permissions().mode() & 0o777;
            assert_eq!(mode, 0o600, "credentials file should be 0600");
        }

        delete(&path).expect("delete");
        assert!(!path.exists());
        delete(&path).expect("second delete is a no-op");
    }

    #[test]
    fn load_ignores_empty_content() {
        let tmp = tempfile::TempDir::new().expect("tmp dir");
        let path = tmp.path().join("credentials");
        fs::write(&path, "   \n  ").expect("write");
        assert!(load(&path).is_none(), "whitespace-only should return None");
    }
}
