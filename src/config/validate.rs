// src/config/validate.rs

use std::collections::HashSet;

use crate::config::model::{ProjectConfig, RawProjectConfig};
use crate::errors::{BuildwebError, Result};

impl TryFrom<RawProjectConfig> for ProjectConfig {
    type Error = crate::errors::BuildwebError;

    fn try_from(raw: RawProjectConfig) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        Ok(ProjectConfig::new_unchecked(raw))
    }
}

fn validate_raw_config(cfg: &RawProjectConfig) -> Result<()> {
    validate_package(cfg)?;
    validate_asset_names(cfg)?;
    validate_cross_targets(cfg)?;
    Ok(())
}

fn validate_package(cfg: &RawProjectConfig) -> Result<()> {
    if cfg.package.name.trim().is_empty() {
        return Err(BuildwebError::Config(
            "[package].name must not be empty".to_string(),
        ));
    }
    if cfg.package.version.trim().is_empty() {
        return Err(BuildwebError::Config(
            "[package].version must not be empty".to_string(),
        ));
    }
    Ok(())
}

fn validate_asset_names(cfg: &RawProjectConfig) -> Result<()> {
    // Names address a single asset in `Task`s, so they must be unique across
    // vendor sets and entries.
    let mut seen = HashSet::new();
    for entry in cfg.assets.vendor_sets.iter().chain(cfg.assets.entries.iter()) {
        if entry.name.trim().is_empty() {
            return Err(BuildwebError::Config(
                "[assets] entries and vendor_sets must have a non-empty name".to_string(),
            ));
        }
        if !seen.insert(entry.name.as_str()) {
            return Err(BuildwebError::Config(format!(
                "duplicate asset name '{}' in [assets]",
                entry.name
            )));
        }
    }
    Ok(())
}

fn validate_cross_targets(cfg: &RawProjectConfig) -> Result<()> {
    for [os, arch] in cfg.distribution.cross_targets.iter() {
        if os.trim().is_empty() || arch.trim().is_empty() {
            return Err(BuildwebError::Config(format!(
                "[distribution].cross_targets contains an incomplete target [{:?}, {:?}]",
                os, arch
            )));
        }
    }
    Ok(())
}
