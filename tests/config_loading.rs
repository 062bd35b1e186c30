// tests/config_loading.rs

use std::io::Write;
use std::path::PathBuf;

use buildweb::config::{load_and_validate, SharedConfig};
use buildweb::engine::Target;
use buildweb::errors::BuildwebError;
use buildweb::types::AssetKind;
use tempfile::NamedTempFile;

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{}", contents).unwrap();
    file
}

#[test]
fn full_config_parses_with_all_sections() {
    let file = write_config(
        r#"
[package]
name = "demo"
version = "1.2.0"
is_graceful = true
build_opts = ["-race"]
run_args = ["-port", "8080"]

[distribution]
build_opts = ["-ldflags", "-s -w"]
cross_targets = [["linux", "amd64"], ["windows", "amd64"]]

[assets]
public_dir = "static"
vendor_sets = [{ name = "bootstrap", sources = ["vendor/bootstrap"] }]
entries = [{ name = "app", sources = ["assets/app", "assets/shared"] }]

[assets.compilers]
styles = "sassc {sources} {output}/{entry}.css"

[toolchain]
program = "/usr/local/go/bin/go"
"#,
    );

    let cfg = load_and_validate(file.path()).expect("config should load");

    assert_eq!(cfg.package.name, "demo");
    assert!(cfg.package.is_graceful);
    assert_eq!(cfg.package.run_args, vec!["-port", "8080"]);
    assert_eq!(cfg.build_opts(false), vec!["-race"]);
    assert_eq!(cfg.build_opts(true), vec!["-ldflags", "-s -w"]);
    assert_eq!(
        cfg.distribution.cross_targets(),
        vec![Target::new("linux", "amd64"), Target::new("windows", "amd64")]
    );
    assert_eq!(
        cfg.assets.output_dir(AssetKind::Styles),
        PathBuf::from("static/stylesheets")
    );
    assert_eq!(cfg.assets.names_in_build_order(), vec!["bootstrap", "app"]);
    assert_eq!(
        cfg.assets.compiler_command(AssetKind::Styles),
        Some("sassc {sources} {output}/{entry}.css")
    );
    assert_eq!(cfg.assets.compiler_command(AssetKind::Images), None);
    assert_eq!(cfg.toolchain.program, PathBuf::from("/usr/local/go/bin/go"));
    assert_eq!(cfg.toolchain.os_var, "GOOS");
}

#[test]
fn minimal_config_uses_defaults() {
    let file = write_config(
        r#"
[package]
name = "demo"
version = "0.1.0"
"#,
    );

    let cfg = load_and_validate(file.path()).unwrap();

    assert!(!cfg.package.is_graceful);
    assert!(cfg.build_opts(false).is_empty());
    assert!(cfg.distribution.cross_targets().is_empty());
    assert_eq!(cfg.assets.public_dir, PathBuf::from("public"));
    assert_eq!(
        cfg.assets.output_dir(AssetKind::Scripts),
        PathBuf::from("public/javascripts")
    );
    assert_eq!(cfg.toolchain.program, PathBuf::from("go"));
    assert_eq!(cfg.toolchain.arch_var, "GOARCH");
    assert_eq!(cfg.toolchain.module_path_var, "GOPATH");
}

#[test]
fn empty_package_name_is_config_error() {
    let file = write_config(
        r#"
[package]
name = ""
version = "0.1.0"
"#,
    );

    match load_and_validate(file.path()) {
        Err(BuildwebError::Config(msg)) => assert!(msg.contains("[package].name")),
        other => panic!("Expected Config error, got: {:?}", other),
    }
}

#[test]
fn duplicate_asset_name_across_vendor_and_entries_is_rejected() {
    let file = write_config(
        r#"
[package]
name = "demo"
version = "0.1.0"

[assets]
vendor_sets = [{ name = "app" }]
entries = [{ name = "app" }]
"#,
    );

    match load_and_validate(file.path()) {
        Err(BuildwebError::Config(msg)) => {
            assert!(msg.contains("duplicate asset name"));
            assert!(msg.contains("app"));
        }
        other => panic!("Expected Config error, got: {:?}", other),
    }
}

#[test]
fn incomplete_cross_target_is_rejected() {
    let file = write_config(
        r#"
[package]
name = "demo"
version = "0.1.0"

[distribution]
cross_targets = [["linux", ""]]
"#,
    );

    match load_and_validate(file.path()) {
        Err(BuildwebError::Config(msg)) => assert!(msg.contains("incomplete target")),
        other => panic!("Expected Config error, got: {:?}", other),
    }
}

#[test]
fn missing_package_section_is_toml_error() {
    let file = write_config(
        r#"
[assets]
public_dir = "public"
"#,
    );

    assert!(matches!(
        load_and_validate(file.path()),
        Err(BuildwebError::Toml(_))
    ));
}

#[test]
fn missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = load_and_validate(dir.path().join("nope.toml"));
    assert!(matches!(result, Err(BuildwebError::Io(_))));
}

#[tokio::test]
async fn reload_swaps_config_and_keeps_old_one_on_error() {
    let file = write_config(
        r#"
[package]
name = "demo"
version = "1.0.0"
"#,
    );
    let shared = SharedConfig::new(load_and_validate(file.path()).unwrap());

    std::fs::write(
        file.path(),
        "[package]\nname = \"demo\"\nversion = \"2.0.0\"\nis_graceful = true\n",
    )
    .unwrap();

    shared.reload(file.path()).await.expect("reload should succeed");
    let snapshot = shared.snapshot().await;
    assert_eq!(snapshot.package.version, "2.0.0");
    assert!(snapshot.package.is_graceful);

    std::fs::write(file.path(), "[package]\nname = \"\"\nversion = \"3.0.0\"\n").unwrap();
    assert!(shared.reload(file.path()).await.is_err());
    assert_eq!(shared.read().await.package.version, "2.0.0");
}
