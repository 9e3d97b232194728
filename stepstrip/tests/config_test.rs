//! Tests for configuration loading and its effect on a run.
#![allow(clippy::unwrap_used)]

use std::fs;
use stepstrip::analyzer::MatchMode;
use stepstrip::config::Config;
use stepstrip::entry_point::run_with_args_to;
use tempfile::TempDir;

const MEMBER_SOURCE: &str = "using System.Diagnostics;
class Worker
{
    [DebuggerStepThrough]
    void Run() {}
}
";

fn run_json(dir: &TempDir) -> serde_json::Value {
    let mut out = Vec::new();
    let code = run_with_args_to(
        vec![
            dir.path().to_string_lossy().into_owned(),
            "--format".to_owned(),
            "json".to_owned(),
        ],
        &mut out,
    )
    .unwrap();
    assert_eq!(code, 0);
    serde_json::from_slice(&out).unwrap()
}

#[test]
fn test_defaults_without_file() {
    let dir = TempDir::new().unwrap();
    let config = Config::load_from_path(dir.path());
    assert!(config.config_file_path.is_none());
    let options = config.stepstrip.scan_options();
    assert_eq!(options.mode, MatchMode::Semantic);
    assert!(!options.include_members);
}

#[test]
fn test_include_members_from_config() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("Worker.cs"), MEMBER_SOURCE).unwrap();

    assert_eq!(run_json(&dir)["diagnostics"].as_array().unwrap().len(), 0);

    fs::write(
        dir.path().join(".stepstrip.toml"),
        "[stepstrip]\ninclude_members = true\n",
    )
    .unwrap();
    let report = run_json(&dir);
    assert_eq!(report["diagnostics"].as_array().unwrap().len(), 1);
    assert_eq!(
        report["diagnostics"][0]["message"],
        "Member 'Worker.Run' is decorated with DebuggerStepThrough attribute"
    );
}

#[test]
fn test_exclude_folders_from_config() {
    let dir = TempDir::new().unwrap();
    fs::create_dir_all(dir.path().join("Legacy")).unwrap();
    fs::write(
        dir.path().join("Legacy/Old.cs"),
        "using System.Diagnostics;\n[DebuggerStepThrough]\nclass Old {}\n",
    )
    .unwrap();
    fs::write(
        dir.path().join(".stepstrip.toml"),
        "[stepstrip]\nexclude_folders = [\"Legacy\"]\n",
    )
    .unwrap();

    let report = run_json(&dir);
    assert_eq!(report["files_scanned"], 0);
}

#[test]
fn test_textual_mode_and_generated_files_from_config() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("Form.Designer.cs"),
        "[DebuggerStepThrough]\nclass Form {}\n",
    )
    .unwrap();
    assert_eq!(run_json(&dir)["skipped_generated"], 1);

    fs::write(
        dir.path().join(".stepstrip.toml"),
        "[stepstrip]\nsemantic = false\ninclude_generated = true\n",
    )
    .unwrap();
    let report = run_json(&dir);
    assert_eq!(report["skipped_generated"], 0);
    assert_eq!(report["diagnostics"][0]["confidence"], "low");
}

#[test]
fn test_known_types_are_resolved() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join(".stepstrip.toml"),
        "[stepstrip]\nknown_types = [\"Acme.StepAttribute\"]\n",
    )
    .unwrap();
    let config = Config::load_from_path(dir.path());
    assert_eq!(
        config.stepstrip.known_types,
        Some(vec!["Acme.StepAttribute".to_owned()])
    );
}
