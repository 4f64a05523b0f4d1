use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
#[cfg(test)]
use std::sync::{PoisonError, RwLock};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

/// Access/refresh token pair for one authenticated session.
///
/// Always replaced or cleared as a whole, never edited in place.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialPair {
    pub access_token: String,
    pub refresh_token: String,
}

impl std::fmt::Debug for CredentialPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialPair")
            .field("access_token", &"<redacted>")
            .field("refresh_token", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Session storage I/O failed: {0}")]
    Io(#[from] io::Error),
    #[error("Session storage encoding failed: {0}")]
    Encoding(#[from] serde_json::Error),
}

pub trait SessionStore: Send + Sync {
    fn get(&self) -> Option<CredentialPair>;
    fn set(&self, credentials: CredentialPair) -> Result<(), SessionError>;
    fn clear(&self) -> Result<(), SessionError>;
}

#[cfg(test)]
#[derive(Default)]
pub struct MemorySessionStore {
    credentials: RwLock<Option<CredentialPair>>,
}

#[cfg(test)]
impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_credentials(credentials: CredentialPair) -> Self {
        Self {
            credentials: RwLock::new(Some(credentials)),
        }
    }
}

#[cfg(test)]
impl SessionStore for MemorySessionStore {
    fn get(&self) -> Option<CredentialPair> {
        self.credentials
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn set(&self, credentials: CredentialPair) -> Result<(), SessionError> {
        *self.credentials.write().unwrap_or_else(PoisonError::into_inner) = Some(credentials);
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        *self.credentials.write().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }
}

/// Credentials persisted as a small JSON file so a session survives restarts
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

/// Creates `path` readable by the owner only
fn write_private(path: &Path, contents: &[u8]) -> io::Result<()> {
    match fs::remove_file(path) {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(e),
    }

    let mut options = OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options.open(path)?;
    file.write_all(contents)?;
    file.sync_all()
}

impl SessionStore for FileSessionStore {
    /// Missing, unreadable or corrupt files all read as "no session"
    fn get(&self) -> Option<CredentialPair> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return None,
            Err(e) => {
                warn!("Failed to read session file {}: {}", self.path.display(), e);
                return None;
            }
        };

        match serde_json::from_str(&content) {
            Ok(credentials) => Some(credentials),
            Err(e) => {
                warn!("Ignoring corrupt session file {}: {}", self.path.display(), e);
                None
            }
        }
    }

    fn set(&self, credentials: CredentialPair) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        // Write-then-rename so a crash never leaves half a token pair behind
        let tmp = self.path.with_extension("json.tmp");
        write_private(&tmp, &serde_json::to_vec_pretty(&credentials)?)?;
        fs::rename(&tmp, &self.path)?;

        debug!("Stored session at {}", self.path.display());
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                debug!("Removed session at {}", self.path.display());
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(tag: &str) -> CredentialPair {
        CredentialPair {
            access_token: format!("access-{}", tag),
            refresh_token: format!("refresh-{}", tag),
        }
    }

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("vaultpay-test-{}-{}", name, uuid::Uuid::new_v4()))
            .join("session.json")
    }

    #[test]
    fn test_memory_store_replaces_and_clears() {
        let store = MemorySessionStore::new();
        assert_eq!(store.get(), None);

        store.set(pair("a")).unwrap();
        store.set(pair("b")).unwrap();
        assert_eq!(store.get(), Some(pair("b")));

        store.clear().unwrap();
        assert_eq!(store.get(), None);
    }

    #[test]
    fn test_file_store_survives_new_instance() {
        let path = temp_path("persist");
        FileSessionStore::new(&path).set(pair("a")).unwrap();

        let reopened = FileSessionStore::new(&path);
        assert_eq!(reopened.get(), Some(pair("a")));

        let raw: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["access_token"], "access-a");
        assert_eq!(raw["refresh_token"], "refresh-a");

        reopened.clear().unwrap();
        assert!(!path.exists());
        assert_eq!(reopened.get(), None);
    }

    #[cfg(unix)]
    #[test]
    fn test_file_store_is_private_to_owner() {
        use std::os::unix::fs::PermissionsExt;

        let path = temp_path("mode");
        let store = FileSessionStore::new(&path);
        store.set(pair("a")).unwrap();
        store.set(pair("b")).unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o077, 0, "session file mode {:o}", mode & 0o777);
        assert_eq!(store.get(), Some(pair("b")));
    }

    #[test]
    fn test_file_store_clear_without_file_is_ok() {
        let store = FileSessionStore::new(temp_path("absent"));
        assert!(store.clear().is_ok());
    }

    #[test]
    fn test_corrupt_file_reads_as_logged_out() {
        let path = temp_path("corrupt");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "not json").unwrap();

        assert_eq!(FileSessionStore::new(&path).get(), None);
    }

    #[test]
    fn test_debug_never_prints_tokens() {
        let rendered = format!("{:?}", pair("secret"));
        assert!(!rendered.contains("access-secret"));
    }
}
