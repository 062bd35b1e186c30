// src/config/model.rs

use std::path::PathBuf;

use serde::Deserialize;

use crate::engine::Target;
use crate::types::AssetKind;

/// Configuration exactly as read from `buildweb.toml`, before validation.
///
/// ```toml
/// [package]
/// name = "demo"
/// version = "1.2.0"
/// is_graceful = false
/// build_opts = ["-race"]
/// run_args = ["-port", "8080"]
///
/// [distribution]
/// build_opts = ["-ldflags", "-s -w"]
/// cross_targets = [["linux", "amd64"], ["windows", "amd64"]]
///
/// [assets]
/// public_dir = "public"
/// vendor_sets = [{ name = "bootstrap" }]
/// entries = [{ name = "app", sources = ["assets/app"] }]
///
/// [assets.compilers]
/// styles = "sassc assets/{entry}.scss public/stylesheets/{entry}.css"
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct RawProjectConfig {
    pub package: PackageSection,

    #[serde(default)]
    pub distribution: DistributionSection,

    #[serde(default)]
    pub assets: AssetsSection,

    #[serde(default)]
    pub toolchain: ToolchainSection,
}

/// Validated project configuration.
///
/// Only constructed through `TryFrom<RawProjectConfig>` (see `validate.rs`).
#[derive(Debug, Clone)]
pub struct ProjectConfig {
    pub package: PackageSection,
    pub distribution: DistributionSection,
    pub assets: AssetsSection,
    pub toolchain: ToolchainSection,
}

impl ProjectConfig {
    pub(crate) fn new_unchecked(raw: RawProjectConfig) -> Self {
        Self {
            package: raw.package,
            distribution: raw.distribution,
            assets: raw.assets,
            toolchain: raw.toolchain,
        }
    }

    /// Copy of the option list for the given mode.
    ///
    /// Always returns an owned `Vec` so later config reloads can't reach
    /// into an in-flight build.
    pub fn build_opts(&self, production: bool) -> Vec<String> {
        if production {
            self.distribution.build_opts.clone()
        } else {
            self.package.build_opts.clone()
        }
    }
}

/// `[package]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct PackageSection {
    pub name: String,
    pub version: String,

    /// The backend shuts itself down on interrupt; never force-kill it.
    #[serde(default)]
    pub is_graceful: bool,

    /// Compiler options for development builds.
    #[serde(default)]
    pub build_opts: Vec<String>,

    /// Arguments passed to the supervised binary.
    #[serde(default)]
    pub run_args: Vec<String>,
}

/// `[distribution]` section.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct DistributionSection {
    /// Compiler options for production builds.
    #[serde(default)]
    pub build_opts: Vec<String>,

    /// Extra `[os, arch]` pairs to cross-compile for, on top of the host.
    #[serde(default)]
    pub cross_targets: Vec<[String; 2]>,
}

impl DistributionSection {
    pub fn cross_targets(&self) -> Vec<Target> {
        self.cross_targets
            .iter()
            .map(|[os, arch]| Target::new(os, arch))
            .collect()
    }
}

/// One named asset source, either a vendor set or a first-party entry.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct AssetEntry {
    pub name: String,

    /// Source paths handed to the compiler as `{sources}`.
    #[serde(default)]
    pub sources: Vec<String>,
}

/// `[assets.compilers]`: one shell command template per asset kind.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct CompilersSection {
    #[serde(default)]
    pub images: Option<String>,
    #[serde(default)]
    pub styles: Option<String>,
    #[serde(default)]
    pub scripts: Option<String>,
}

/// `[assets]` section: the asset catalog.
#[derive(Debug, Clone, Deserialize)]
pub struct AssetsSection {
    #[serde(default = "default_public_dir")]
    pub public_dir: PathBuf,

    /// Third-party sets, always built before `entries`.
    #[serde(default)]
    pub vendor_sets: Vec<AssetEntry>,

    #[serde(default)]
    pub entries: Vec<AssetEntry>,

    #[serde(default)]
    pub compilers: CompilersSection,
}

fn default_public_dir() -> PathBuf {
    PathBuf::from("public")
}

impl Default for AssetsSection {
    fn default() -> Self {
        Self {
            public_dir: default_public_dir(),
            vendor_sets: Vec::new(),
            entries: Vec::new(),
            compilers: CompilersSection::default(),
        }
    }
}

impl AssetsSection {
    pub fn output_dir(&self, kind: AssetKind) -> PathBuf {
        self.public_dir.join(kind.output_dir_name())
    }

    /// All asset names in build order: vendor sets first, then entries,
    /// each in declared order.
    pub fn names_in_build_order(&self) -> Vec<String> {
        self.vendor_sets
            .iter()
            .chain(self.entries.iter())
            .map(|e| e.name.clone())
            .collect()
    }

    pub fn find(&self, name: &str) -> Option<&AssetEntry> {
        self.vendor_sets
            .iter()
            .chain(self.entries.iter())
            .find(|e| e.name == name)
    }

    pub fn compiler_command(&self, kind: AssetKind) -> Option<&str> {
        match kind {
            AssetKind::Images => self.compilers.images.as_deref(),
            AssetKind::Styles => self.compilers.styles.as_deref(),
            AssetKind::Scripts => self.compilers.scripts.as_deref(),
        }
    }
}

/// `[toolchain]` section: the backend compiler and the env vars it reads
/// its cross-compilation target from.
#[derive(Debug, Clone, Deserialize)]
pub struct ToolchainSection {
    #[serde(default = "default_program")]
    pub program: PathBuf,
    #[serde(default = "default_os_var")]
    pub os_var: String,
    #[serde(default = "default_arch_var")]
    pub arch_var: String,
    #[serde(default = "default_module_path_var")]
    pub module_path_var: String,
}

fn default_program() -> PathBuf {
    PathBuf::from("go")
}

fn default_os_var() -> String {
    "GOOS".to_string()
}

fn default_arch_var() -> String {
    "GOARCH".to_string()
}

fn default_module_path_var() -> String {
    "GOPATH".to_string()
}

impl Default for ToolchainSection {
    fn default() -> Self {
        Self {
            program: default_program(),
            os_var: default_os_var(),
            arch_var: default_arch_var(),
            module_path_var: default_module_path_var(),
        }
    }
}
