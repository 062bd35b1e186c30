// src/config/shared.rs

//! Lock-protected configuration shared between build steps and whatever
//! reloads the config file.

use std::path::Path;
use std::sync::Arc;

use tokio::sync::{RwLock, RwLockReadGuard};
use tracing::info;

use crate::config::loader::load_and_validate;
use crate::config::model::ProjectConfig;
use crate::errors::Result;

/// Cheap-to-clone handle to the current `ProjectConfig`.
///
/// Readers hold the read lock only for the duration of one read; the
/// orchestrator never writes through it. [`SharedConfig::reload`] is the only
/// writer.
#[derive(Debug, Clone)]
pub struct SharedConfig {
    inner: Arc<RwLock<ProjectConfig>>,
}

impl SharedConfig {
    pub fn new(config: ProjectConfig) -> Self {
        Self {
            inner: Arc::new(RwLock::new(config)),
        }
    }

    pub async fn read(&self) -> RwLockReadGuard<'_, ProjectConfig> {
        self.inner.read().await
    }

    /// Clone the whole config under the read lock.
    pub async fn snapshot(&self) -> ProjectConfig {
        self.inner.read().await.clone()
    }

    /// Re-read and validate the file, then swap it in.
    ///
    /// On error the current config is left untouched.
    pub async fn reload(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let fresh = load_and_validate(path)?;
        *self.inner.write().await = fresh;
        info!(path = %path.display(), "configuration reloaded");
        Ok(())
    }
}
