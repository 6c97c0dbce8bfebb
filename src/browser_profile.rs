//! Throwaway Chrome profile directories
//!
//! Each local browser session gets its own UUID-named user data directory so
//! sequential sessions never contend for Chrome's SingletonLock.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use uuid::Uuid;

/// Prefix of every profile directory created under the temp dir
pub const PROFILE_PREFIX: &str = "bannerscrape_chrome";

/// RAII wrapper for a Chrome profile directory
///
/// The directory is removed on drop. Drop only after the browser process has
/// exited, otherwise Chrome may still hold files open.
#[derive(Debug)]
pub struct BrowserProfile {
    path: PathBuf,
}

impl BrowserProfile {
    /// Create a fresh profile directory under `base`
    pub fn create_in(base: &Path) -> Result<Self> {
        let path = base.join(format!("{PROFILE_PREFIX}_{}", Uuid::new_v4()));

        // create_dir fails on an existing path, guarding against reuse
        std::fs::create_dir(&path)
            .with_context(|| format!("Failed to create profile directory: {}", path.display()))?;

        debug!("Created Chrome profile directory: {}", path.display());
        Ok(Self { path })
    }

    /// Create a fresh profile directory in the system temp dir
    pub fn create() -> Result<Self> {
        Self::create_in(&std::env::temp_dir())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for BrowserProfile {
    fn drop(&mut self) {
        if self.path.exists() {
            debug!("Removing Chrome profile directory: {}", self.path.display());
            if let Err(e) = std::fs::remove_dir_all(&self.path) {
                warn!(
                    "Failed to cleanup profile directory {}: {}",
                    self.path.display(),
                    e
                );
            }
        }
    }
}
