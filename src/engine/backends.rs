// src/engine/backends.rs

use std::fmt;
use std::sync::Arc;

use crate::assets::{AssetToolchain, CommandToolchain};
use crate::exec::{BuildTool, ChildLauncher, CommandBuildTool, ProcessLauncher};
use crate::fs::{FileSystem, RealFileSystem};

/// The external collaborators the engine drives.
///
/// Production code uses [`Backends::real`]; tests swap in fakes.
pub struct Backends {
    pub fs: Arc<dyn FileSystem>,
    pub assets: Arc<dyn AssetToolchain>,
    pub tool: Arc<dyn BuildTool>,
    pub launcher: Box<dyn ProcessLauncher>,
}

impl Backends {
    pub fn real() -> Self {
        Self {
            fs: Arc::new(RealFileSystem),
            assets: Arc::new(CommandToolchain::new()),
            tool: Arc::new(CommandBuildTool),
            launcher: Box::new(ChildLauncher),
        }
    }
}

impl fmt::Debug for Backends {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Backends")
            .field("fs", &self.fs)
            .finish_non_exhaustive()
    }
}
