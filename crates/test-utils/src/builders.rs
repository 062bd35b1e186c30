#![allow(dead_code)]

use buildweb::config::{
    AssetEntry, AssetsSection, DistributionSection, PackageSection, ProjectConfig,
    RawProjectConfig, SharedConfig, ToolchainSection,
};

/// Builder for `ProjectConfig` to simplify test setup.
pub struct ProjectConfigBuilder {
    config: RawProjectConfig,
}

impl ProjectConfigBuilder {
    pub fn new(name: &str, version: &str) -> Self {
        Self {
            config: RawProjectConfig {
                package: PackageSection {
                    name: name.to_string(),
                    version: version.to_string(),
                    is_graceful: false,
                    build_opts: vec![],
                    run_args: vec![],
                },
                distribution: DistributionSection::default(),
                assets: AssetsSection::default(),
                toolchain: ToolchainSection::default(),
            },
        }
    }

    pub fn graceful(mut self, val: bool) -> Self {
        self.config.package.is_graceful = val;
        self
    }

    pub fn dev_opt(mut self, opt: &str) -> Self {
        self.config.package.build_opts.push(opt.to_string());
        self
    }

    pub fn dist_opt(mut self, opt: &str) -> Self {
        self.config.distribution.build_opts.push(opt.to_string());
        self
    }

    pub fn run_arg(mut self, arg: &str) -> Self {
        self.config.package.run_args.push(arg.to_string());
        self
    }

    pub fn cross_target(mut self, os: &str, arch: &str) -> Self {
        self.config
            .distribution
            .cross_targets
            .push([os.to_string(), arch.to_string()]);
        self
    }

    pub fn vendor(mut self, name: &str) -> Self {
        self.config.assets.vendor_sets.push(entry(name));
        self
    }

    pub fn entry(mut self, name: &str) -> Self {
        self.config.assets.entries.push(entry(name));
        self
    }

    pub fn public_dir(mut self, dir: &str) -> Self {
        self.config.assets.public_dir = dir.into();
        self
    }

    pub fn raw(self) -> RawProjectConfig {
        self.config
    }

    pub fn build(self) -> ProjectConfig {
        ProjectConfig::try_from(self.config).expect("Failed to build valid config from builder")
    }

    pub fn shared(self) -> SharedConfig {
        SharedConfig::new(self.build())
    }
}

fn entry(name: &str) -> AssetEntry {
    AssetEntry {
        name: name.to_string(),
        sources: vec![],
    }
}
