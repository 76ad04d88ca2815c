//! CLI behavior tests: exit codes, output formats, subcommands.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const STRONG_ARTICLE: &str = include_str!("fixtures/strong_article.md");
const PLAIN_SENTENCE: &str = include_str!("fixtures/plain_sentence.txt");

fn aeo_cmd() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_aeo"));
    cmd.env("NO_COLOR", "1").env_remove("AEO_LOG");
    cmd
}

/// Temp project with the two fixtures under `blog/`
fn project() -> TempDir {
    let dir = TempDir::new().unwrap();
    let blog = dir.path().join("blog");
    fs::create_dir(&blog).unwrap();
    fs::write(blog.join("strong.md"), STRONG_ARTICLE).unwrap();
    fs::write(blog.join("plain.txt"), PLAIN_SENTENCE).unwrap();
    dir
}

fn json_of(output: &std::process::Output) -> serde_json::Value {
    let s = String::from_utf8_lossy(&output.stdout);
    serde_json::from_str(s.trim()).expect("valid JSON")
}

#[test]
fn no_args_returns_error_not_panic() {
    aeo_cmd()
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("PATH"));
}

#[test]
fn below_threshold_exit_1() {
    let dir = project();
    aeo_cmd()
        .arg(dir.path().join("blog/plain.txt"))
        .args(["--threshold", "60", "--no-cache", "--no-color"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("below threshold"));
}

#[test]
fn above_threshold_exit_0() {
    let dir = project();
    aeo_cmd()
        .arg(dir.path().join("blog/plain.txt"))
        .args(["--threshold", "10", "--no-cache", "--no-color"])
        .assert()
        .success()
        .stdout(predicate::str::contains("AEO Content Analysis"));
}

#[test]
fn config_threshold_applies() {
    let dir = project();
    fs::write(dir.path().join(".aeorc.json"), r#"{ "threshold": 95 }"#).unwrap();
    aeo_cmd()
        .arg(dir.path().join("blog"))
        .args(["--quiet", "--no-cache"])
        .assert()
        .code(1);
}

#[test]
fn json_output_for_single_file() {
    let dir = project();
    let output = aeo_cmd()
        .arg(dir.path().join("blog/plain.txt"))
        .args(["--json", "--no-cache", "--content-type", "faq"])
        .args(["--query", "best binder", "--query", "card storage"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let v = json_of(&output);
    assert!(v["overall_score"].is_number());
    assert_eq!(v["metadata"]["content_type"], "faq");
    assert_eq!(v["metadata"]["target_queries_count"], 2);
    assert_eq!(v["query_alignment"].as_array().unwrap().len(), 2);
}

#[test]
fn json_output_for_directory_has_summary() {
    let dir = project();
    fs::write(dir.path().join("blog/notes.rs"), "fn main() {}").unwrap();
    let output = aeo_cmd()
        .arg(dir.path().join("blog"))
        .args(["--json", "--no-cache"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let v = json_of(&output);
    let results = v["results"].as_array().unwrap();
    assert_eq!(results.len(), 2);
    // sorted by path
    assert!(results[0]["path"].as_str().unwrap().ends_with("plain.txt"));
    assert!(results[1]["path"].as_str().unwrap().ends_with("strong.md"));
    assert_eq!(v["summary"]["items_analyzed"], 2);
}

#[test]
fn markdown_output() {
    let dir = project();
    aeo_cmd()
        .arg(dir.path().join("blog/plain.txt"))
        .args(["--markdown", "--no-cache"])
        .assert()
        .success()
        .stdout(predicate::str::contains("# AEO Report:"))
        .stdout(predicate::str::contains("## Components"));
}

#[test]
fn json_and_markdown_conflict() {
    let dir = project();
    aeo_cmd()
        .arg(dir.path().join("blog/plain.txt"))
        .args(["--json", "--markdown"])
        .assert()
        .code(2);
}

#[test]
fn stdin_input() {
    let dir = TempDir::new().unwrap();
    let output = aeo_cmd()
        .current_dir(dir.path())
        .args(["-", "--json", "--query", "what is the best tcg binder"])
        .write_stdin(STRONG_ARTICLE)
        .output()
        .unwrap();
    assert!(output.status.success());
    let v = json_of(&output);
    assert_eq!(v["query_alignment"][0]["alignment"], "strong");
}

#[test]
fn empty_stdin_is_an_error() {
    let dir = TempDir::new().unwrap();
    aeo_cmd()
        .current_dir(dir.path())
        .arg("-")
        .write_stdin("   \n")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("invalid input"));
}

#[test]
fn year_flag_changes_freshness() {
    let dir = project();
    let file = dir.path().join("blog/strong.md");
    let freshness = |year: &str| {
        let output = aeo_cmd()
            .arg(&file)
            .args(["--json", "--no-cache", "--year", year])
            .output()
            .unwrap();
        json_of(&output)["component_scores"]["freshness"]["score"]
            .as_f64()
            .unwrap()
    };
    assert!(freshness("2025") > freshness("2030"));
}

#[test]
fn no_content_files_exit_2() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("main.rs"), "fn main() {}").unwrap();
    aeo_cmd()
        .arg(dir.path())
        .arg("--no-cache")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("No content files found"));
}

#[test]
fn missing_path_exit_2() {
    let dir = TempDir::new().unwrap();
    aeo_cmd()
        .arg(dir.path().join("nope"))
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Path does not exist"));
}

#[test]
fn cache_hit_on_second_run() {
    let dir = project();
    let file = dir.path().join("blog/plain.txt");
    aeo_cmd().arg(&file).arg("--json").assert().success();
    assert!(dir.path().join("blog/.aeo-cache.json").exists());

    aeo_cmd()
        .arg(&file)
        .arg("--json")
        .assert()
        .success()
        .stderr(predicate::str::contains("1 files from cache"));

    aeo_cmd()
        .arg(&file)
        .args(["--json", "--clear-cache"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Cache cleared"))
        .stderr(predicate::str::contains("from cache").not());
}

#[test]
fn quiet_mode_reports_history_delta() {
    let dir = project();
    fs::write(dir.path().join(".aeorc.json"), "{}").unwrap();
    let file = dir.path().join("blog/plain.txt");

    aeo_cmd()
        .arg(&file)
        .args(["--quiet", "--no-cache"])
        .assert()
        .success()
        .stdout(predicate::str::contains("26.5 (F)"));
    assert!(dir.path().join(".aeo-history.json").exists());

    aeo_cmd()
        .arg(&file)
        .args(["--quiet", "--no-cache"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[unchanged at 26.5]"));
}

#[test]
fn init_creates_config_once() {
    let dir = TempDir::new().unwrap();
    aeo_cmd()
        .args(["init", "--dir"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Created"));
    let written = fs::read_to_string(dir.path().join(".aeorc.json")).unwrap();
    let _: serde_json::Value = serde_json::from_str(&written).unwrap();

    aeo_cmd()
        .args(["init", "--dir"])
        .arg(dir.path())
        .assert()
        .success()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn batch_manifest_reports_each_item() {
    let dir = TempDir::new().unwrap();
    let manifest = dir.path().join("batch.json");
    let items = serde_json::json!({
        "items": [
            { "id": "strong", "content": STRONG_ARTICLE, "contentType": "guide" },
            { "id": "plain", "content": PLAIN_SENTENCE, "targetQueries": ["binder"] }
        ]
    });
    fs::write(&manifest, items.to_string()).unwrap();

    let output = aeo_cmd()
        .args(["batch", "--json"])
        .arg(&manifest)
        .output()
        .unwrap();
    assert!(output.status.success());
    let v = json_of(&output);
    let results = v["results"].as_array().unwrap();
    assert_eq!(results[0]["id"], "strong");
    assert_eq!(results[0]["result"]["metadata"]["content_type"], "guide");
    assert_eq!(results[1]["result"]["metadata"]["target_queries_count"], 1);
    assert_eq!(v["summary"]["items_analyzed"], 2);
    assert_eq!(v["summary"]["failed"], 0);
}

#[test]
fn batch_with_failed_item_exit_2() {
    let dir = TempDir::new().unwrap();
    let manifest = dir.path().join("batch.json");
    fs::write(&manifest, r#"[{"content": "A binder holds cards."}, {"content": "  "}]"#).unwrap();

    aeo_cmd()
        .arg("batch")
        .arg(&manifest)
        .assert()
        .code(2)
        .stdout(predicate::str::contains("Batch Analysis"));
}

fn save_result(dir: &Path, name: &str, content: &str) -> std::path::PathBuf {
    let source = dir.join(format!("{}.md", name));
    fs::write(&source, content).unwrap();
    let output = aeo_cmd()
        .arg(&source)
        .args(["--json", "--no-cache", "--year", "2025"])
        .output()
        .unwrap();
    let saved = dir.join(format!("{}.json", name));
    fs::write(&saved, &output.stdout).unwrap();
    saved
}

#[test]
fn compare_improvement_and_regression() {
    let dir = TempDir::new().unwrap();
    let before = save_result(dir.path(), "before", PLAIN_SENTENCE);
    let after = save_result(dir.path(), "after", STRONG_ARTICLE);

    let output = aeo_cmd()
        .args(["compare", "--json"])
        .arg(&before)
        .arg(&after)
        .output()
        .unwrap();
    assert!(output.status.success());
    let v = json_of(&output);
    assert!(v["overall_delta"].as_f64().unwrap() > 0.0);
    assert_eq!(v["grade_before"], "F");

    aeo_cmd()
        .arg("compare")
        .arg(&after)
        .arg(&before)
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Progress"));
}

#[test]
fn compare_rejects_non_result_json() {
    let dir = TempDir::new().unwrap();
    let bogus = dir.path().join("bogus.json");
    fs::write(&bogus, r#"{"hello": "world"}"#).unwrap();
    aeo_cmd()
        .arg("compare")
        .arg(&bogus)
        .arg(&bogus)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Not an analysis result"));
}

#[test]
fn content_root_resolves_against_scored_directory() {
    let dir = project();
    fs::write(dir.path().join("readme.md"), PLAIN_SENTENCE).unwrap();
    fs::write(dir.path().join(".aeorc.json"), r#"{ "contentRoot": "blog" }"#).unwrap();

    let output = aeo_cmd()
        .arg(dir.path())
        .args(["--json", "--no-cache"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let v = json_of(&output);
    let results = v["results"].as_array().unwrap();
    assert_eq!(results.len(), 2);
    assert!(results
        .iter()
        .all(|r| r["path"].as_str().unwrap().contains("blog")));
}
