// src/engine/target.rs

//! Build targets and the distribution target resolver.
//!
//! Targets use the backend toolchain's naming (`linux`/`darwin`/`windows`,
//! `amd64`/`arm64`/`386`), not Rust's, because they end up in the
//! toolchain's environment and in binary file names.

use std::collections::HashSet;
use std::fmt;

/// An `(os, arch)` pair to compile the backend binary for.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Target {
    pub os: String,
    pub arch: String,
}

impl Target {
    pub fn new(os: impl Into<String>, arch: impl Into<String>) -> Self {
        Self {
            os: os.into(),
            arch: arch.into(),
        }
    }

    /// The machine buildweb itself runs on.
    pub fn host() -> Self {
        Self::new(
            host_os_name(std::env::consts::OS),
            host_arch_name(std::env::consts::ARCH),
        )
    }

    /// Dedup key, `os_arch`.
    pub fn key(&self) -> String {
        format!("{}_{}", self.os, self.arch)
    }

    pub fn is_windows(&self) -> bool {
        self.os == "windows"
    }

    /// `<name>-<version>.<os>.<arch>`, plus `.exe` for Windows targets.
    pub fn binary_name(&self, package: &str, version: &str) -> String {
        let mut name = format!("{}-{}.{}.{}", package, version, self.os, self.arch);
        if self.is_windows() {
            name.push_str(".exe");
        }
        name
    }

    /// Pick the target for a binary build.
    ///
    /// An explicit target equal to `host` counts as no override.
    pub fn effective(requested: Option<&Target>, host: &Target) -> Target {
        match requested {
            Some(t) if t != host => t.clone(),
            _ => host.clone(),
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.os, self.arch)
    }
}

fn host_os_name(os: &str) -> &str {
    match os {
        "macos" => "darwin",
        other => other,
    }
}

fn host_arch_name(arch: &str) -> &str {
    match arch {
        "x86_64" => "amd64",
        "x86" => "386",
        "aarch64" => "arm64",
        "powerpc64" => "ppc64",
        other => other,
    }
}

/// Configured cross targets followed by the host, deduplicated by
/// [`Target::key`] in first-seen order.
pub fn resolve_targets(cross_targets: &[Target], host: &Target) -> Vec<Target> {
    let mut visited = HashSet::new();
    cross_targets
        .iter()
        .chain(std::iter::once(host))
        .filter(|t| visited.insert(t.key()))
        .cloned()
        .collect()
}
