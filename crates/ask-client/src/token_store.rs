//! Persistence for the single session token.
//!
//! There is exactly one key. The token is opaque plain text, no expiry is
//! tracked, and concurrent writers get last-write-wins.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::{debug, warn};

use crate::error::StoreError;

/// Storage key, also the file name used by [`FileTokenStore`].
pub const TOKEN_KEY: &str = "qa_auth_token";

pub trait TokenStore: Send + Sync {
    fn get(&self) -> Option<String>;

    fn set(&self, token: &str) -> Result<(), StoreError>;

    /// Removing an absent token is fine. Never fails from the caller's view.
    fn remove(&self);

    fn is_present(&self) -> bool {
        self.get().is_some()
    }
}

/// Token kept in a plain text file.
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store under `dir/qa_auth_token`.
    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join(TOKEN_KEY))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TokenStore for FileTokenStore {
    fn get(&self) -> Option<String> {
        match fs::read_to_string(&self.path) {
            Ok(raw) => {
                let token = raw.trim();
                (!token.is_empty()).then(|| token.to_string())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => {
                warn!("Cannot read token file {}: {}", self.path.display(), e);
                None
            }
        }
    }

    fn set(&self, token: &str) -> Result<(), StoreError> {
        let write = || -> std::io::Result<()> {
            if let Some(parent) = self.path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&self.path, token)
        };
        write().map_err(|source| StoreError::Write {
            path: self.path.clone(),
            source,
        })?;
        debug!("Token stored at {}", self.path.display());
        Ok(())
    }

    fn remove(&self) {
        match fs::remove_file(&self.path) {
            Ok(()) => debug!("Token removed from {}", self.path.display()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!("Cannot remove token file {}: {}", self.path.display(), e),
        }
    }
}

/// Process-local store, gone when the process exits.
#[derive(Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: &str) -> Self {
        Self {
            token: Mutex::new(Some(token.to_string())),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self) -> Option<String> {
        self.token.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    fn set(&self, token: &str) -> Result<(), StoreError> {
        let mut guard = self.token.lock().unwrap_or_else(|e| e.into_inner());
        *guard = Some(token.to_string());
        Ok(())
    }

    fn remove(&self) {
        let mut guard = self.token.lock().unwrap_or_else(|e| e.into_inner());
        *guard = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_store_roundtrip_and_remove() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileTokenStore::in_dir(&dir.path().join("nested"));

        assert_eq!(store.get(), None);
        store.set("abc.def").unwrap();
        assert_eq!(store.get().as_deref(), Some("abc.def"));
        assert!(store.path().ends_with(TOKEN_KEY));

        store.remove();
        assert_eq!(store.get(), None);
        // second remove is a no-op
        store.remove();
    }

    #[test]
    fn file_store_last_write_wins() {
        let dir = tempfile::tempdir().unwrap();
        let a = FileTokenStore::in_dir(dir.path());
        let b = FileTokenStore::in_dir(dir.path());

        a.set("first").unwrap();
        b.set("second").unwrap();
        assert_eq!(a.get().as_deref(), Some("second"));
    }

    #[test]
    fn blank_file_reads_as_absent() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileTokenStore::in_dir(dir.path());
        fs::write(store.path(), "  \n").unwrap();
        assert!(!store.is_present());
    }

    #[test]
    fn memory_store() {
        let store = MemoryTokenStore::with_token("t");
        assert!(store.is_present());
        store.remove();
        assert_eq!(store.get(), None);
        store.set("u").unwrap();
        assert_eq!(store.get().as_deref(), Some("u"));
    }
}
