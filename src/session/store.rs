use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};
use thiserror::Error;

/// The fixed key the admin token is stored under.
pub const TOKEN_KEY: &str = "adminToken";

/// A failure writing the durable token slot.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("token store I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A single durable string slot holding the current admin token.
///
/// Reads fail closed: anything that prevents reading the slot is reported as
/// "no token". Clearing an empty slot is a no-op.
pub trait TokenStore: Send + Sync {
    /// Returns the stored token, if any.
    fn load(&self) -> Option<String>;

    /// Replaces the stored token.
    fn save(&self, token: &str) -> Result<(), StoreError>;

    /// Removes the stored token.
    fn clear(&self);

    /// Removes the stored token only if it is still `expected`. Returns
    /// whether it was removed.
    fn clear_if_current(&self, expected: &str) -> bool;
}

/// A process-local token slot, mostly for tests and short-lived tools.
#[derive(Clone, Default)]
pub struct MemoryTokenStore {
    slot: Arc<Mutex<Option<String>>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store that already holds `token`.
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Some(token.into()))),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Option<String> {
        self.slot.lock().ok().and_then(|slot| slot.clone())
    }

    fn save(&self, token: &str) -> Result<(), StoreError> {
        if let Ok(mut slot) = self.slot.lock() {
            *slot = Some(token.to_string());
        }
        Ok(())
    }

    fn clear(&self) {
        if let Ok(mut slot) = self.slot.lock() {
            slot.take();
        }
    }

    fn clear_if_current(&self, expected: &str) -> bool {
        let Ok(mut slot) = self.slot.lock() else {
            return false;
        };
        if slot.as_deref() == Some(expected) {
            slot.take();
            true
        } else {
            false
        }
    }
}

/// A token slot backed by a file named [`TOKEN_KEY`] inside a directory, so
/// the session survives restarts of the admin tool.
#[derive(Clone, Debug)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    /// Creates a store rooted at `dir`. The directory is created lazily on
    /// the first save.
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(TOKEN_KEY),
        }
    }

    /// The file holding the token.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Option<String> {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) => {
                let token = contents.trim();
                (!token.is_empty()).then(|| token.to_string())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => None,
            Err(e) => {
                tracing::warn!("⚠️ Could not read token store {}: {}", self.path.display(), e);
                None
            }
        }
    }

    fn save(&self, token: &str) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, token)?;
        tracing::debug!("💾 Token saved to {}", self.path.display());
        Ok(())
    }

    fn clear(&self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => tracing::debug!("🧹 Token removed from {}", self.path.display()),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => {
                tracing::warn!("⚠️ Could not remove token store {}: {}", self.path.display(), e);
            }
        }
    }

    fn clear_if_current(&self, expected: &str) -> bool {
        if self.load().as_deref() != Some(expected) {
            return false;
        }
        self.clear();
        true
    }
}
