// src/config/mod.rs

//! Project configuration for buildweb.
//!
//! - [`model`] is the TOML-backed data model.
//! - [`loader`] reads a config file from disk.
//! - [`validate`] turns a raw model into a checked `ProjectConfig`.
//! - [`shared`] wraps the config in a read/write lock for concurrent readers.

pub mod loader;
pub mod model;
pub mod shared;
pub mod validate;

pub use loader::{load_and_validate, load_from_path};
pub use model::{
    AssetEntry, AssetsSection, CompilersSection, DistributionSection, PackageSection,
    ProjectConfig, RawProjectConfig, ToolchainSection,
};
pub use shared::SharedConfig;
