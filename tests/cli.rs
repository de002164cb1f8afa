use assert_cmd::Command;
use corrector::analyzer::dictionary::Dictionary;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::{tempdir, TempDir};

fn workspace() -> TempDir {
    let dir = tempdir().unwrap();
    let words = vec!["the".to_string(), "cat".to_string(), "sat".to_string()];
    Dictionary::build_from_words(&words, &dir.path().join("words.dict")).unwrap();
    dir
}

fn corrector(root: &Path) -> Command {
    let mut cmd = Command::cargo_bin("corrector").unwrap();
    cmd.current_dir(root)
        .env("CORRECTOR_CONFIG_DIR", root)
        .env_remove("RUST_LOG")
        .args(["--dictionary", "words.dict", "--no-color"]);
    cmd
}

#[test]
fn corrects_a_file() {
    let dir = workspace();
    fs::write(dir.path().join("input.txt"), "teh cat sat").unwrap();

    corrector(dir.path())
        .arg("input.txt")
        .assert()
        .success()
        .stdout(predicate::str::contains("the cat sat"))
        .stderr(predicate::str::contains("1:1 teh → the"));
}

#[test]
fn corrects_stdin_into_output_file() {
    let dir = workspace();

    corrector(dir.path())
        .args(["--output", "fixed.txt"])
        .write_stdin("the cat sta")
        .assert()
        .success();

    let fixed = fs::read_to_string(dir.path().join("fixed.txt")).unwrap();
    assert_eq!(fixed, "the cat sat");
}

#[test]
fn json_output_lists_regions() {
    let dir = workspace();
    fs::write(dir.path().join("input.txt"), "teh cat").unwrap();

    let output = corrector(dir.path())
        .args(["input.txt", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["text"], "the cat");
    assert_eq!(json["regions"].as_array().unwrap().len(), 1);
    assert_eq!(json["regions"][0]["source"], "teh");
    assert_eq!(json["regions"][0]["to"], 3);
}

#[test]
fn prefs_are_clamped_and_persisted() {
    let dir = workspace();

    corrector(dir.path())
        .args(["prefs", "set", "--paragraphs", "true", "--sentences", "40"])
        .assert()
        .success()
        .stdout(predicate::str::contains("10"));

    let saved = fs::read_to_string(dir.path().join("preferences.toml")).unwrap();
    assert!(saved.contains("paragraphs_enabled = true"));
    assert!(saved.contains("sentences_per_paragraph = 10"));
}

#[test]
fn paragraphs_preference_reflows_output() {
    let dir = workspace();
    fs::write(
        dir.path().join("preferences.toml"),
        "paragraphs_enabled = true\nsentences_per_paragraph = 1\n",
    )
    .unwrap();
    fs::write(dir.path().join("input.txt"), "The cat sat. The cat sat.").unwrap();

    corrector(dir.path())
        .arg("input.txt")
        .assert()
        .success()
        .stdout(predicate::str::contains("\tThe cat sat.\n\tThe cat sat."));
}

#[test]
fn missing_dictionary_info_fails() {
    let dir = workspace();

    corrector(dir.path())
        .args(["dict", "info", "xx_XX"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not installed"));
}

#[test]
fn unchanged_text_round_trips_byte_for_byte() {
    let dir = workspace();
    fs::write(dir.path().join("input.txt"), "the cat sat\n").unwrap();

    let output = corrector(dir.path()).arg("input.txt").output().unwrap();
    assert!(output.status.success());
    assert_eq!(String::from_utf8(output.stdout).unwrap(), "the cat sat\n");

    let output = corrector(dir.path()).write_stdin("teh cat").output().unwrap();
    assert_eq!(String::from_utf8(output.stdout).unwrap(), "the cat");
}

#[test]
fn failed_analysis_still_saves_preferences() {
    let dir = workspace();
    fs::write(dir.path().join("input.txt"), "teh cat").unwrap();
    let prefs = dir.path().join("preferences.toml");
    assert!(!prefs.exists());

    corrector(dir.path())
        .args(["input.txt", "--backend", "languagetool", "--server-url", "http://127.0.0.1:9"])
        .assert()
        .failure()
        .stdout(predicate::str::is_empty());

    assert!(prefs.exists());
}
