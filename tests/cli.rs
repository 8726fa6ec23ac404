use anyhow::Result;
use clap::Parser;
use playscan::cli::{Cli, OutputFormat};
use playscan::{resolve_options, run, Tolerance};
use serde_yaml::Value;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/transcripts")
        .join(name)
}

fn cli_for(args: &[&str]) -> Cli {
    let mut argv = vec!["playscan"];
    argv.extend_from_slice(args);
    Cli::try_parse_from(argv).unwrap()
}

fn path_str(path: &Path) -> &str {
    path.to_str().unwrap()
}

#[test]
fn test_run_writes_yaml_document() -> Result<()> {
    let dir = TempDir::new()?;
    let output = dir.path().join("deploy.yaml");
    let input = fixture("deploy.txt");

    run(&cli_for(&["-o", path_str(&output), path_str(&input)]))?;

    let document: Value = serde_yaml::from_str(&std::fs::read_to_string(&output)?)?;
    let keys: Vec<&str> = document
        .as_mapping()
        .unwrap()
        .iter()
        .filter_map(|(key, _)| key.as_str())
        .collect();
    assert_eq!(keys, ["playbook_header", "plays", "play_recap"]);

    let task = &document["plays"][0]["tasks"][0];
    assert_eq!(document["plays"][0]["name"].as_str(), Some("Deploy"));
    assert_eq!(task["name"].as_str(), Some("Install package"));
    assert_eq!(task["ok"][0].as_str(), Some("web1"));
    assert!(task["included"].as_mapping().unwrap().is_empty());
    assert_eq!(document["play_recap"]["web1"]["ok"].as_u64(), Some(1));
    Ok(())
}

#[test]
fn test_run_writes_json_document() -> Result<()> {
    let dir = TempDir::new()?;
    let output = dir.path().join("site.json");
    let input = fixture("site.txt");

    let cli = cli_for(&["--format", "json", "-o", path_str(&output), path_str(&input)]);
    assert_eq!(cli.format, OutputFormat::Json);
    run(&cli)?;

    let document: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&output)?)?;
    assert_eq!(document["plays"].as_array().map(Vec::len), Some(2));
    assert_eq!(
        document["plays"][0]["tasks"][2]["ok"][0]["web1"]["changed"],
        serde_json::Value::Bool(false)
    );
    assert_eq!(document["play_recap"]["db1"]["unreachable"], 1);
    Ok(())
}

#[test]
fn test_run_missing_recap_fails() -> Result<()> {
    let dir = TempDir::new()?;
    let output = dir.path().join("out.yaml");
    let input = fixture("no_recap.txt");

    let err = run(&cli_for(&["-o", path_str(&output), path_str(&input)])).unwrap_err();

    assert!(err.to_string().contains("PLAY RECAP"));
    assert!(!output.exists());
    Ok(())
}

#[test]
fn test_run_missing_transcript_file() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("missing.txt");

    assert!(run(&cli_for(&[path_str(&input)])).is_err());
}

#[test]
fn test_config_file_with_overrides() -> Result<()> {
    let dir = TempDir::new()?;
    let config = dir.path().join("playscan.yaml");
    std::fs::write(
        &config,
        "recap_marker: '== SUMMARY'\norphan_outcomes: reject\nlenient_inline_values: true\n",
    )?;

    let options = resolve_options(&cli_for(&["-c", path_str(&config)]))?;
    assert_eq!(options.recap_marker, "== SUMMARY");
    assert_eq!(options.orphan_outcomes, Tolerance::Reject);
    assert_eq!(options.unrecognized_lines, Tolerance::Ignore);
    assert!(options.lenient_inline_values);

    let options = resolve_options(&cli_for(&[
        "-c",
        path_str(&config),
        "--strict",
        "--recap-marker",
        "RECAP",
        "--task-marker",
        "STEP [",
    ]))?;
    assert_eq!(options.recap_marker, "RECAP");
    assert_eq!(options.task_marker_prefix, "STEP [");
    assert_eq!(options.unrecognized_lines, Tolerance::Reject);
    Ok(())
}

#[test]
fn test_strict_flag_rejects_noise() -> Result<()> {
    let dir = TempDir::new()?;
    let output = dir.path().join("out.yaml");
    let input = fixture("noisy.txt");

    run(&cli_for(&["-o", path_str(&output), path_str(&input)]))?;
    assert!(output.exists());

    let err = run(&cli_for(&["--strict", "-o", path_str(&output), path_str(&input)])).unwrap_err();
    assert!(err.to_string().contains("unrecognized line 4"));
    Ok(())
}

#[test]
fn test_fatal_as_failed_flag() -> Result<()> {
    let dir = TempDir::new()?;
    let output = dir.path().join("site.yaml");
    let input = fixture("site.txt");

    let cli = cli_for(&["--fatal-as-failed", "-o", path_str(&output), path_str(&input)]);
    assert!(resolve_options(&cli)?.fatal_as_failed);
    run(&cli)?;

    let document: Value = serde_yaml::from_str(&std::fs::read_to_string(&output)?)?;
    let failed = &document["plays"][1]["tasks"][0]["failed"][0]["db1"];
    assert_eq!(failed["unreachable"].as_bool(), Some(true));
    Ok(())
}
