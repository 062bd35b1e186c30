use std::fmt;

/// The three kinds of static assets a project builds.
///
/// Each kind owns exactly one output directory under the configured
/// `public_dir`, which is wiped and recreated before a full rebuild.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetKind {
    Images,
    Styles,
    Scripts,
}

impl AssetKind {
    pub const ALL: [AssetKind; 3] = [AssetKind::Images, AssetKind::Styles, AssetKind::Scripts];

    /// Directory name below `public_dir` that holds this kind's output.
    pub fn output_dir_name(self) -> &'static str {
        match self {
            AssetKind::Images => "images",
            AssetKind::Styles => "stylesheets",
            AssetKind::Scripts => "javascripts",
        }
    }
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AssetKind::Images => "images",
            AssetKind::Styles => "styles",
            AssetKind::Scripts => "scripts",
        };
        f.write_str(s)
    }
}

/// Which option set a build uses.
///
/// Set once per run mode: the interactive loop builds for development, a
/// distribution pass builds for production.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BuildMode {
    #[default]
    Development,
    Production,
}

impl BuildMode {
    pub fn is_production(self) -> bool {
        matches!(self, BuildMode::Production)
    }
}
