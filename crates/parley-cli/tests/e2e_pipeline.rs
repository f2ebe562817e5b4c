//! E2E tests for the transcript pipeline:
//! `parley build`, `parley stats`, `parley analyze`.
//!
//! Covers: network document layout, retention, stats document schema,
//! config-file overrides, and structured errors on bad input.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

// ---------------------------------------------------------------------------
// Test harness helpers
// ---------------------------------------------------------------------------

const TRANSCRIPT: &str = "\
title,writer,pony,dialog
Episode One,Writer,Twilight Sparkle,\"Spike, take a letter.\"
Episode One,Writer,Spike,Okay!
Episode One,Writer,Twilight Sparkle,Thanks.
Episode One,Writer,Rarity,\"Darling, \"\"hello\"\".\"
Episode One,Writer,Twilight Sparkle,Hi Rarity.
Episode One,Writer,Spike,Hi!
Episode One,Writer,Other Ponies,Cheering
Episode One,Writer,Rarity,Well then.
Episode Two,Writer,Applejack,Howdy.
Episode Two,Writer,Rarity,Hello.
Episode Two,Writer,Applejack,Bye.
";

fn parley_cmd(dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("parley"));
    cmd.current_dir(dir);
    cmd.env("PARLEY_LOG", "error");
    cmd.env_remove("FORMAT");
    cmd
}

fn write_transcript(dir: &Path) -> PathBuf {
    let path = dir.join("transcript.csv");
    std::fs::write(&path, TRANSCRIPT).expect("write transcript");
    path
}

fn read_json(path: &Path) -> Value {
    let text = std::fs::read_to_string(path).expect("read output");
    serde_json::from_str(&text).expect("valid JSON")
}

// ---------------------------------------------------------------------------
// parley build
// ---------------------------------------------------------------------------

#[test]
fn build_writes_network_document() {
    let dir = TempDir::new().expect("temp dir");
    write_transcript(dir.path());

    parley_cmd(dir.path())
        .args(["build", "-i", "transcript.csv", "-o", "network.json", "--format", "text"])
        .assert()
        .success()
        .stdout(predicate::str::contains("turns=11"));

    let net = read_json(&dir.path().join("network.json"));
    // twilight → spike ×2, twilight → rarity, spike → twilight, rarity → twilight
    assert_eq!(net["twilight sparkle"]["spike"], 2);
    assert_eq!(net["twilight sparkle"]["rarity"], 1);
    assert_eq!(net["spike"]["twilight sparkle"], 1);
    assert_eq!(net["rarity"]["twilight sparkle"], 1);
    // episode two opens on applejack, which is skipped; rarity → applejack follows
    assert_eq!(net["rarity"]["applejack"], 1);
    assert!(net.get("applejack").is_none());
    // the group line broke the spike → rarity chain
    assert!(net["spike"].get("rarity").is_none());
    assert!(net.get("other ponies").is_none());
}

#[test]
fn build_without_output_prints_indented_document() {
    let dir = TempDir::new().expect("temp dir");
    write_transcript(dir.path());

    let output = parley_cmd(dir.path())
        .args(["build", "-i", "transcript.csv"])
        .output()
        .expect("build should not crash");
    assert!(output.status.success());

    let text = String::from_utf8(output.stdout).expect("utf8");
    assert!(text.starts_with("{\n    \"twilight sparkle\": {\n        \"spike\": 2"));
    let net: Value = serde_json::from_str(&text).expect("valid JSON");
    assert_eq!(net.as_object().expect("object").len(), 3);
}

#[test]
fn top_speakers_limits_sources() {
    let dir = TempDir::new().expect("temp dir");
    write_transcript(dir.path());

    parley_cmd(dir.path())
        .args(["build", "-i", "transcript.csv", "-o", "net.json", "--top-speakers", "1", "-q"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let net = read_json(&dir.path().join("net.json"));
    let sources: Vec<&String> = net.as_object().expect("object").keys().collect();
    assert_eq!(sources, vec!["twilight sparkle"]);
}

#[test]
fn config_file_changes_exclusions() {
    let dir = TempDir::new().expect("temp dir");
    write_transcript(dir.path());
    std::fs::write(
        dir.path().join("parley.toml"),
        "[inference]\nexcluded_words = [\"spike\"]\n",
    )
    .expect("write config");

    parley_cmd(dir.path())
        .args(["build", "-i", "transcript.csv", "-o", "net.json", "-q"])
        .assert()
        .success();

    let net = read_json(&dir.path().join("net.json"));
    assert!(net.get("spike").is_none());
    assert!(net.get("other ponies").is_some(), "default exclusions were replaced");
}

// ---------------------------------------------------------------------------
// parley stats
// ---------------------------------------------------------------------------

#[test]
fn stats_document_has_four_rankings() {
    let dir = TempDir::new().expect("temp dir");
    write_transcript(dir.path());

    parley_cmd(dir.path())
        .args(["build", "-i", "transcript.csv", "-o", "network.json", "-q"])
        .assert()
        .success();
    parley_cmd(dir.path())
        .args(["stats", "-i", "network.json", "-o", "stats.json", "--format", "pretty"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Most central speakers"));

    let stats = read_json(&dir.path().join("stats.json"));
    let obj = stats.as_object().expect("object");
    assert_eq!(obj.len(), 4);
    for key in ["degree", "weighted_degree", "closeness", "betweenness"] {
        let list = obj[key].as_array().expect("array");
        assert_eq!(list.len(), 3, "{key}");
    }
    assert_eq!(stats["weighted_degree"][0], "twilight sparkle");
    // twilight bridges spike → rarity, spike → applejack, rarity → spike
    assert_eq!(
        stats["betweenness"],
        serde_json::json!(["twilight sparkle", "rarity", "spike"])
    );
}

#[test]
fn stats_scores_flag_adds_tables() {
    let dir = TempDir::new().expect("temp dir");
    std::fs::write(
        dir.path().join("network.json"),
        r#"{"a": {"b": 1}, "b": {"c": 1}}"#,
    )
    .expect("write network");

    let output = parley_cmd(dir.path())
        .args(["stats", "-i", "network.json", "--scores", "--top", "1"])
        .output()
        .expect("stats should not crash");
    assert!(output.status.success());

    let stats: Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    assert_eq!(stats["betweenness"], serde_json::json!(["b"]));
    assert_eq!(stats["scores"]["betweenness"]["b"], 0.5);
    assert_eq!(stats["graph"]["edge_count"], 2);
}

#[test]
fn empty_network_gives_empty_rankings() {
    let dir = TempDir::new().expect("temp dir");
    std::fs::write(dir.path().join("network.json"), "{}").expect("write network");

    let output = parley_cmd(dir.path())
        .args(["stats", "-i", "network.json"])
        .output()
        .expect("stats should not crash");
    assert!(output.status.success());

    let stats: Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    assert_eq!(stats["degree"], serde_json::json!([]));
    assert_eq!(stats["betweenness"], serde_json::json!([]));
}

// ---------------------------------------------------------------------------
// parley analyze
// ---------------------------------------------------------------------------

#[test]
fn analyze_matches_build_then_stats() {
    let dir = TempDir::new().expect("temp dir");
    write_transcript(dir.path());

    parley_cmd(dir.path())
        .args([
            "analyze",
            "-i",
            "transcript.csv",
            "--network-out",
            "a_net.json",
            "--stats-out",
            "a_stats.json",
            "--json",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"rankings\""));

    parley_cmd(dir.path())
        .args(["build", "-i", "transcript.csv", "-o", "b_net.json", "-q"])
        .assert()
        .success();
    parley_cmd(dir.path())
        .args(["stats", "-i", "b_net.json", "-o", "b_stats.json", "-q"])
        .assert()
        .success();

    let a_net = std::fs::read_to_string(dir.path().join("a_net.json")).expect("read");
    let b_net = std::fs::read_to_string(dir.path().join("b_net.json")).expect("read");
    assert_eq!(a_net, b_net);
    assert_eq!(
        read_json(&dir.path().join("a_stats.json")),
        read_json(&dir.path().join("b_stats.json"))
    );
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[test]
fn missing_transcript_reports_input_not_found() {
    let dir = TempDir::new().expect("temp dir");

    let output = parley_cmd(dir.path())
        .args(["build", "-i", "nope.csv", "--json"])
        .output()
        .expect("build should not crash");
    assert!(!output.status.success());

    let err: Value = serde_json::from_slice(&output.stderr).expect("structured error");
    assert_eq!(err["error"]["code"], "E1002");
    assert!(
        err["error"]["message"]
            .as_str()
            .expect("message")
            .contains("nope.csv")
    );
}

#[test]
fn self_loop_network_is_rejected() {
    let dir = TempDir::new().expect("temp dir");
    std::fs::write(dir.path().join("network.json"), r#"{"a": {"a": 3}}"#).expect("write");

    parley_cmd(dir.path())
        .args(["stats", "-i", "network.json", "--format", "text"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error[E3002]"));
}

#[test]
fn short_transcript_row_is_reported_with_line() {
    let dir = TempDir::new().expect("temp dir");
    std::fs::write(dir.path().join("t.csv"), "title,writer,pony\nEp,W\n").expect("write");

    parley_cmd(dir.path())
        .args(["build", "-i", "t.csv", "--format", "text"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("E2002").and(predicate::str::contains("line 2")));
}

#[test]
fn malformed_config_is_reported() {
    let dir = TempDir::new().expect("temp dir");
    write_transcript(dir.path());
    std::fs::write(dir.path().join("parley.toml"), "[retention\n").expect("write config");

    parley_cmd(dir.path())
        .args(["build", "-i", "transcript.csv", "--format", "text"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("E1001"));
}

// ---------------------------------------------------------------------------
// parley completions
// ---------------------------------------------------------------------------

#[test]
fn completions_emit_script() {
    let dir = TempDir::new().expect("temp dir");
    parley_cmd(dir.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("parley"));
}
