//! CLI integration tests using assert_cmd.

use std::collections::HashMap;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// A `bolero` command isolated in `dir`: no user config, a store file inside `dir`.
fn bolero(dir: &Path) -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("bolero").unwrap();
    cmd.current_dir(dir)
        .env("HOME", dir)
        .env_remove("BOLERO_STORE")
        .env_remove("RUST_LOG")
        .arg("--store")
        .arg(dir.join("words.json"));
    cmd
}

fn add_basic_words(dir: &Path) {
    bolero(dir)
        .args(["add", "--word", "Haus", "--meaning", "house"])
        .args(["--class", "Noun", "--gender", "Neuter", "--tag", "Home"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added Das Haus = house"));
    bolero(dir)
        .args(["add", "--word", "schnell", "--meaning", "fast"])
        .args(["--class", "Adjective"])
        .assert()
        .success();
    bolero(dir)
        .args(["add", "--word", "heute", "--meaning", "today"])
        .args(["--class", "adverb"])
        .assert()
        .success();
}

const VOCABULARY: &str = r#"
[[words]]
word = "Tisch"
meaning = "table"
class = "Noun"
gender = "m"

[[words]]
word = "gehen"
meaning = "to go"
class = "Verb"
see_also = ["laufen"]
"#;

#[test]
fn help_output() {
    let dir = TempDir::new().unwrap();
    bolero(dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("German-English vocabulary trainer"));
}

#[test]
fn version_output() {
    let dir = TempDir::new().unwrap();
    bolero(dir.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("bolero"));
}

#[test]
fn init_creates_files() {
    let dir = TempDir::new().unwrap();

    bolero(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created bolero.toml"))
        .stdout(predicate::str::contains("Created vocabulary/example.toml"));

    assert!(dir.path().join("bolero.toml").exists());
    assert!(dir.path().join("vocabulary/example.toml").exists());

    // Second init should skip
    bolero(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}

#[test]
fn add_and_list() {
    let dir = TempDir::new().unwrap();
    add_basic_words(dir.path());

    bolero(dir.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("Haus"))
        .stdout(predicate::str::contains("Neuter"))
        .stdout(predicate::str::contains("3 word(s)"));
}

#[test]
fn add_duplicate_fails() {
    let dir = TempDir::new().unwrap();
    add_basic_words(dir.path());

    bolero(dir.path())
        .args(["add", "--word", "Haus", "--meaning", "home"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn add_with_partial_verb_forms_fails() {
    let dir = TempDir::new().unwrap();

    bolero(dir.path())
        .args(["add", "--word", "gehen", "--meaning", "to go", "--class", "Verb"])
        .args(["--ich", "gehe", "--du", "gehst"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("incomplete"));
    assert!(!dir.path().join("words.json").exists());
}

#[test]
fn add_with_half_example_is_rejected_by_clap() {
    let dir = TempDir::new().unwrap();

    bolero(dir.path())
        .args(["add", "--word", "Haus", "--meaning", "house"])
        .args(["--example-source", "Das Haus ist alt."])
        .assert()
        .failure();
}

#[test]
fn update_missing_word_fails() {
    let dir = TempDir::new().unwrap();

    bolero(dir.path())
        .args(["update", "Baum", "--meaning", "tree"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("word not found: Baum"));
}

#[test]
fn update_changes_fields() {
    let dir = TempDir::new().unwrap();
    add_basic_words(dir.path());

    bolero(dir.path())
        .args(["update", "Haus", "--meaning", "building", "--clear-tags"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Updated Das Haus = building"));

    let stored = std::fs::read_to_string(dir.path().join("words.json")).unwrap();
    let docs: serde_json::Value = serde_json::from_str(&stored).unwrap();
    let haus = docs
        .as_array()
        .unwrap()
        .iter()
        .find(|d| d["word"] == "Haus")
        .unwrap();
    assert_eq!(haus["meaning"], "building");
    assert_eq!(haus["tags"], serde_json::json!(["NA", "NA", "NA"]));
}

#[test]
fn validate_reports_warnings() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("words.toml");
    std::fs::write(&file, VOCABULARY).unwrap();

    bolero(dir.path())
        .args(["validate", "--file"])
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("2 words"))
        .stdout(predicate::str::contains("unknown word: laufen"))
        .stdout(predicate::str::contains("no conjugation"));
}

#[test]
fn validate_nonexistent_file() {
    let dir = TempDir::new().unwrap();
    bolero(dir.path())
        .args(["validate", "--file", "nonexistent.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn import_adds_then_skips() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("words.toml");
    std::fs::write(&file, VOCABULARY).unwrap();

    bolero(dir.path())
        .args(["import", "--file"])
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("Imported 2 new, 0 updated, 0 skipped"));

    bolero(dir.path())
        .args(["import", "--file"])
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("0 new, 0 updated, 2 skipped"));
}

#[test]
fn stats_on_empty_store() {
    let dir = TempDir::new().unwrap();
    bolero(dir.path())
        .arg("stats")
        .assert()
        .success()
        .stdout(predicate::str::contains("No words stored yet"));
}

#[test]
fn stats_json_lists_every_word() {
    let dir = TempDir::new().unwrap();
    add_basic_words(dir.path());

    let output = bolero(dir.path())
        .args(["stats", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let ranking: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(ranking["rows"].as_array().unwrap().len(), 3);
    assert_eq!(ranking["thresholds"]["difficult"], 0.0);
}

#[test]
fn report_rejects_future_start() {
    let dir = TempDir::new().unwrap();
    bolero(dir.path())
        .args(["report", "--since", "2999-01-01"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("after today"));
}

#[test]
fn report_rejects_zero_last_failures() {
    let dir = TempDir::new().unwrap();
    bolero(dir.path())
        .args(["report", "--last-failures", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--last-failures must be at least 1"));
}

#[test]
fn quiz_size_out_of_range() {
    let dir = TempDir::new().unwrap();
    add_basic_words(dir.path());

    bolero(dir.path())
        .args(["quiz", "new", "--size", "4"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("between 2 and 3"));
}

#[test]
fn quiz_with_no_candidates() {
    let dir = TempDir::new().unwrap();
    add_basic_words(dir.path());

    bolero(dir.path())
        .args(["quiz", "new", "--size", "2", "--class", "Verb"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no words match"));
}

#[test]
fn quiz_round_trip_logs_results() {
    let dir = TempDir::new().unwrap();
    add_basic_words(dir.path());
    let sheet_path = dir.path().join("quiz.json");

    bolero(dir.path())
        .args(["quiz", "new", "--size", "2", "--seed", "7", "--out"])
        .arg(&sheet_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("DE→EN"))
        .stdout(predicate::str::contains("EN→DE"));

    // Answer every question correctly
    let key: HashMap<&str, (&str, Option<&str>)> = HashMap::from([
        ("Haus", ("house", Some("Das"))),
        ("schnell", ("fast", None)),
        ("heute", ("today", None)),
    ]);
    let mut sheet: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&sheet_path).unwrap()).unwrap();
    for question in sheet["questions"].as_array_mut().unwrap() {
        let word = question["word"].as_str().unwrap().to_string();
        let (meaning, article) = key[word.as_str()];
        let answer = if question["prompt"]["kind"] == "translate" {
            serde_json::json!({ "text": meaning })
        } else {
            serde_json::json!({ "text": word, "article": article })
        };
        question["answer"] = answer;
    }
    std::fs::write(&sheet_path, serde_json::to_string_pretty(&sheet).unwrap()).unwrap();

    bolero(dir.path())
        .args(["quiz", "submit", "--sheet"])
        .arg(&sheet_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("2/2 correct"))
        .stdout(predicate::str::contains("Well done! Test passed"));

    let output = bolero(dir.path())
        .args(["report", "--since", "2000-01-01", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let dashboard: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let daily = dashboard["daily"].as_array().unwrap();
    assert_eq!(daily.len(), 1);
    assert_eq!(daily[0]["success_to_target"], 1);
    assert_eq!(daily[0]["success_to_source"], 1);
}
