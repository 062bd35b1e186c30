// src/fs/mock.rs

use super::FileSystem;
use anyhow::{anyhow, Result};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Default)]
struct MockState {
    dirs: HashSet<PathBuf>,
    resets: Vec<PathBuf>,
    failing: HashSet<PathBuf>,
}

/// In-memory filesystem that records directory resets.
///
/// Clones share state, so a test can keep one handle while the build steps
/// own another.
#[derive(Debug, Clone, Default)]
pub struct MockFileSystem {
    state: Arc<Mutex<MockState>>,
}

impl MockFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every later `reset_dir(path)` fail.
    pub fn fail_resets_of(&self, path: impl AsRef<Path>) {
        self.lock().failing.insert(path.as_ref().to_path_buf());
    }

    /// Every path passed to `reset_dir`, in call order (failed ones included).
    pub fn resets(&self) -> Vec<PathBuf> {
        self.lock().resets.clone()
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        // A poisoned lock only means another test thread panicked.
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl FileSystem for MockFileSystem {
    fn reset_dir(&self, path: &Path) -> Result<()> {
        let mut state = self.lock();
        state.resets.push(path.to_path_buf());
        if state.failing.contains(path) {
            return Err(anyhow!("permission denied: {:?}", path));
        }
        state.dirs.insert(path.to_path_buf());
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        self.lock().dirs.contains(path)
    }
}
