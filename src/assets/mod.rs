// src/assets/mod.rs

//! Asset compiler seam.
//!
//! The orchestrator owns ordering, directory resets and iteration; turning
//! an entry into files under `public/` belongs to an [`AssetCompiler`].
//! An [`AssetToolchain`] builds one compiler per `(kind, entry)` from a
//! snapshot of the asset catalog.
//!
//! - [`command`] is the production toolchain: one shell command template
//!   per asset kind, taken from `[assets.compilers]`.

pub mod command;

use anyhow::Result;

use crate::config::AssetsSection;
use crate::exec::BoxFuture;
use crate::types::AssetKind;

pub use command::CommandToolchain;

/// Builds a single asset entry.
pub trait AssetCompiler: Send + Sync {
    fn build(&self, production: bool) -> BoxFuture<'_, Result<()>>;
}

/// Factory for per-entry compilers.
pub trait AssetToolchain: Send + Sync {
    /// Construct the compiler for `entry`.
    ///
    /// Called with the config read lock held, so implementations must not
    /// block or await.
    fn compiler(
        &self,
        kind: AssetKind,
        assets: &AssetsSection,
        entry: &str,
    ) -> Result<Box<dyn AssetCompiler>>;
}
