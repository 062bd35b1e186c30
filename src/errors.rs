// src/errors.rs

//! Crate-wide error type and result alias.
//!
//! Every failure a build step or the supervisor can produce has its own
//! variant so the queue runner can record it as the cycle's last error and
//! the operator sees which entry, module or target was involved.

use std::path::PathBuf;

use thiserror::Error;

use crate::types::AssetKind;

#[derive(Error, Debug)]
pub enum BuildwebError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("failed to reset output directory {}: {source}", dir.display())]
    DirectoryReset {
        dir: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("failed to build {kind} entry '{entry}': {message}")]
    AssetCompile {
        kind: AssetKind,
        entry: String,
        message: String,
    },

    #[error("tests failed for module '{module}': {message}")]
    TestFailure { module: String, message: String },

    #[error("compiling {binary} failed:\n{output}")]
    Compile { binary: String, output: String },

    #[error("failed to launch {binary}: {source}")]
    ProcessLaunch {
        binary: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to stop process: {0}")]
    ProcessStop(#[source] std::io::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, BuildwebError>;
