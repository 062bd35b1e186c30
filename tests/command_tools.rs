// tests/command_tools.rs
#![cfg(unix)]

use std::fs;
use std::path::PathBuf;

use buildweb::assets::{AssetToolchain, CommandToolchain};
use buildweb::config::{AssetEntry, AssetsSection, CompilersSection};
use buildweb::exec::{BuildTool, CommandBuildTool, CompileRequest, TestRequest};
use buildweb::types::AssetKind;
use buildweb_test_utils::init_tracing;
use tempfile::tempdir;

fn catalog(public_dir: PathBuf, scripts: Option<&str>) -> AssetsSection {
    AssetsSection {
        public_dir,
        vendor_sets: vec![AssetEntry {
            name: "jquery".into(),
            sources: vec!["vendor/jquery.js".into()],
        }],
        entries: vec![AssetEntry {
            name: "app".into(),
            sources: vec!["assets/a.js".into(), "assets/b.js".into()],
        }],
        compilers: CompilersSection {
            scripts: scripts.map(str::to_string),
            ..CompilersSection::default()
        },
    }
}

#[tokio::test]
async fn command_compiler_renders_placeholders_and_exports_env() {
    init_tracing();
    let tmp = tempdir().unwrap();
    let assets = catalog(
        tmp.path().to_path_buf(),
        Some("mkdir -p {output} && echo \"{sources} $BUILDWEB_KIND $BUILDWEB_PRODUCTION\" > {output}/{entry}.txt"),
    );

    let compiler = CommandToolchain::new()
        .compiler(AssetKind::Scripts, &assets, "app")
        .unwrap();
    compiler.build(true).await.expect("command should succeed");

    let written = fs::read_to_string(tmp.path().join("javascripts").join("app.txt")).unwrap();
    assert_eq!(written.trim(), "assets/a.js assets/b.js scripts 1");
}

#[tokio::test]
async fn failing_command_is_an_error() {
    init_tracing();
    let tmp = tempdir().unwrap();
    let assets = catalog(tmp.path().to_path_buf(), Some("exit 3"));

    let compiler = CommandToolchain::new()
        .compiler(AssetKind::Scripts, &assets, "jquery")
        .unwrap();
    let err = compiler.build(false).await.unwrap_err();
    assert!(format!("{err:#}").contains("exit 3"));
}

#[tokio::test]
async fn kind_without_command_is_skipped() {
    init_tracing();
    let tmp = tempdir().unwrap();
    let assets = catalog(tmp.path().to_path_buf(), Some("exit 1"));

    let compiler = CommandToolchain::new()
        .compiler(AssetKind::Styles, &assets, "app")
        .unwrap();
    compiler.build(false).await.unwrap();
}

#[test]
fn unknown_entry_is_rejected() {
    let assets = catalog(PathBuf::from("public"), None);
    assert!(CommandToolchain::new()
        .compiler(AssetKind::Images, &assets, "nope")
        .is_err());
}

#[tokio::test]
async fn build_tool_captures_output_and_exit_status() {
    init_tracing();
    let ok = CompileRequest {
        program: PathBuf::from("echo"),
        options: vec!["-race".into()],
        output: "demo-1.2.0.linux.amd64".into(),
        env: vec![("GOOS".into(), "linux".into())],
    };
    let out = CommandBuildTool.compile(&ok).await.unwrap();
    assert!(out.success);
    assert_eq!(out.output.trim(), "build -race -o demo-1.2.0.linux.amd64");

    let failing = CompileRequest {
        program: PathBuf::from("false"),
        ..ok.clone()
    };
    assert!(!CommandBuildTool.compile(&failing).await.unwrap().success);

    let missing = CompileRequest {
        program: PathBuf::from("/definitely/not/a/compiler"),
        ..ok
    };
    assert!(CommandBuildTool.compile(&missing).await.is_err());
}

#[tokio::test]
async fn build_tool_reports_test_result() {
    init_tracing();
    let pass = TestRequest {
        program: PathBuf::from("true"),
        module: ".".into(),
    };
    let fail = TestRequest {
        program: PathBuf::from("false"),
        module: ".".into(),
    };
    assert!(CommandBuildTool.test(&pass).await.unwrap());
    assert!(!CommandBuildTool.test(&fail).await.unwrap());
}
