// src/assets/command.rs

//! Shell-command asset compilers.

use std::path::PathBuf;
use std::process::Stdio;

use anyhow::{anyhow, bail, Context, Result};
use tokio::process::Command;
use tracing::{debug, info};

use crate::config::AssetsSection;
use crate::exec::BoxFuture;
use crate::types::AssetKind;

use super::{AssetCompiler, AssetToolchain};

/// Toolchain that runs the `[assets.compilers]` command for each entry.
///
/// Placeholders in the template:
/// - `{entry}`: entry name
/// - `{sources}`: the entry's `sources`, space separated
/// - `{output}`: the kind's output directory
///
/// The same values are exported as `BUILDWEB_ENTRY`, `BUILDWEB_SOURCES` and
/// `BUILDWEB_OUTPUT_DIR`, together with `BUILDWEB_KIND` and
/// `BUILDWEB_PRODUCTION` (`1` or `0`).
#[derive(Debug, Clone, Default)]
pub struct CommandToolchain;

impl CommandToolchain {
    pub fn new() -> Self {
        Self
    }
}

impl AssetToolchain for CommandToolchain {
    fn compiler(
        &self,
        kind: AssetKind,
        assets: &AssetsSection,
        entry: &str,
    ) -> Result<Box<dyn AssetCompiler>> {
        let found = assets
            .find(entry)
            .ok_or_else(|| anyhow!("no asset entry or vendor set named '{entry}'"))?;

        let Some(template) = assets.compiler_command(kind) else {
            return Ok(Box::new(SkipCompiler {
                kind,
                entry: entry.to_string(),
            }));
        };

        Ok(Box::new(CommandCompiler {
            kind,
            entry: found.name.clone(),
            sources: found.sources.join(" "),
            output_dir: assets.output_dir(kind),
            template: template.to_string(),
        }))
    }
}

/// Used when no command is configured for a kind.
struct SkipCompiler {
    kind: AssetKind,
    entry: String,
}

impl AssetCompiler for SkipCompiler {
    fn build(&self, _production: bool) -> BoxFuture<'_, Result<()>> {
        Box::pin(async move {
            debug!(
                kind = %self.kind,
                entry = %self.entry,
                "no compiler configured for asset kind; skipping"
            );
            Ok(())
        })
    }
}

struct CommandCompiler {
    kind: AssetKind,
    entry: String,
    sources: String,
    output_dir: PathBuf,
    template: String,
}

impl CommandCompiler {
    fn render(&self) -> String {
        self.template
            .replace("{entry}", &self.entry)
            .replace("{sources}", &self.sources)
            .replace("{output}", &self.output_dir.to_string_lossy())
    }
}

impl AssetCompiler for CommandCompiler {
    fn build(&self, production: bool) -> BoxFuture<'_, Result<()>> {
        Box::pin(async move {
            let line = self.render();
            info!(kind = %self.kind, entry = %self.entry, cmd = %line, "compiling asset");

            let mut cmd = if cfg!(windows) {
                let mut c = Command::new("cmd");
                c.arg("/C").arg(&line);
                c
            } else {
                let mut c = Command::new("sh");
                c.arg("-c").arg(&line);
                c
            };

            cmd.env("BUILDWEB_ENTRY", &self.entry)
                .env("BUILDWEB_SOURCES", &self.sources)
                .env("BUILDWEB_OUTPUT_DIR", &self.output_dir)
                .env("BUILDWEB_KIND", self.kind.to_string())
                .env("BUILDWEB_PRODUCTION", if production { "1" } else { "0" })
                .stdout(Stdio::inherit())
                .stderr(Stdio::inherit())
                .kill_on_drop(true);

            let status = cmd
                .status()
                .await
                .with_context(|| format!("spawning asset compiler `{line}`"))?;

            if !status.success() {
                bail!("asset compiler `{line}` exited with {status}");
            }
            Ok(())
        })
    }
}
