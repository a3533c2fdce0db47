//! Full-pipeline tests against a local directory, with the model runtime
//! replaced by a mock.

use std::fs::{create_dir_all, File};
use std::io::Write;
use std::path::Path;

use tempfile::tempdir;

use repo_summariser::analyse::{analyse, AnalyseConfig};
use repo_summariser::model::{MockModelRunner, ModelError};
use repo_summariser::summarise::NO_OUTPUT_SENTINEL;

fn write_file(path: &Path, content: &str) {
    let mut file = File::create(path).expect("create fixture file");
    write!(file, "{content}").expect("write fixture file");
}

fn config_for(locator: &Path, work_dir: &Path) -> AnalyseConfig {
    AnalyseConfig {
        locator: locator.display().to_string(),
        model: "phi".to_string(),
        work_dir: work_dir.to_path_buf(),
    }
}

#[tokio::test]
async fn every_enumerated_file_gets_exactly_one_entry() {
    let repo = tempdir().unwrap();
    write_file(&repo.path().join("tiny.py"), "x = 1");
    write_file(&repo.path().join("larger.md"), &"# heading\n".repeat(50));
    create_dir_all(repo.path().join(".git")).unwrap();
    write_file(&repo.path().join(".git/config"), "[core]");

    let work_dir = tempdir().unwrap().path().join("clones");
    let mut runner = MockModelRunner::new();
    runner
        .expect_generate()
        .returning(|_, _| Ok("a summary".to_string()));

    let report = analyse(&config_for(repo.path(), &work_dir), &runner)
        .await
        .expect("pipeline succeeds");

    assert_eq!(report.files.len(), 2);
    // Size order: tiny.py first.
    assert!(report.files[0].0.ends_with("tiny.py"));
    assert!(report.files[1].0.ends_with("larger.md"));
    for (_, summary) in &report.files {
        assert_eq!(summary, "a summary");
    }
    assert_eq!(report.overall_summary, "a summary");

    // A local locator is used in place: no clone directory appears.
    assert!(!work_dir.exists());
}

#[tokio::test]
async fn missing_runtime_degrades_into_warnings_without_aborting() {
    let repo = tempdir().unwrap();
    write_file(&repo.path().join("one.rs"), "fn one() {}");
    write_file(&repo.path().join("two.rs"), "fn two() {} // longer file");

    let work_dir = tempdir().unwrap().path().join("clones");
    let mut runner = MockModelRunner::new();
    runner
        .expect_generate()
        .returning(|_, _| Err(ModelError::NotFound("ollama".to_string())));

    let report = analyse(&config_for(repo.path(), &work_dir), &runner)
        .await
        .expect("model failures are not fatal");

    assert_eq!(report.files.len(), 2);
    for (_, summary) in &report.files {
        assert!(summary.starts_with("Warning:"), "got: {summary}");
        assert!(summary.contains("Ollama not found"));
    }
    assert!(report.overall_summary.contains("Ollama not found"));
}

#[tokio::test]
async fn one_failing_file_leaves_the_others_intact() {
    let repo = tempdir().unwrap();
    write_file(&repo.path().join("ok.py"), "fine");
    write_file(&repo.path().join("bad.py"), "fine too, but longer");

    let work_dir = tempdir().unwrap().path().join("clones");
    let mut runner = MockModelRunner::new();
    runner.expect_generate().returning(|_, prompt| {
        if prompt.contains("fine too") {
            Err(ModelError::NotFound("ollama".to_string()))
        } else {
            Ok("summarised".to_string())
        }
    });

    let report = analyse(&config_for(repo.path(), &work_dir), &runner)
        .await
        .unwrap();

    let ok = report.files.iter().find(|(p, _)| p.ends_with("ok.py")).unwrap();
    let bad = report.files.iter().find(|(p, _)| p.ends_with("bad.py")).unwrap();
    assert_eq!(ok.1, "summarised");
    assert!(bad.1.contains("Ollama not found"));
}

#[tokio::test]
async fn empty_model_output_becomes_the_sentinel() {
    let repo = tempdir().unwrap();
    write_file(&repo.path().join("quiet.py"), "pass");

    let work_dir = tempdir().unwrap().path().join("clones");
    let mut runner = MockModelRunner::new();
    runner.expect_generate().returning(|_, _| Ok(String::new()));

    let report = analyse(&config_for(repo.path(), &work_dir), &runner)
        .await
        .unwrap();
    assert_eq!(report.files[0].1, NO_OUTPUT_SENTINEL);
    assert_eq!(report.overall_summary, NO_OUTPUT_SENTINEL);
}

#[tokio::test]
async fn markdown_sections_match_the_file_entries() {
    let repo = tempdir().unwrap();
    write_file(&repo.path().join("a.py"), "a");
    write_file(&repo.path().join("b.py"), "bb");

    let work_dir = tempdir().unwrap().path().join("clones");
    let mut runner = MockModelRunner::new();
    runner
        .expect_generate()
        .returning(|_, _| Ok("summary text".to_string()));

    let report = analyse(&config_for(repo.path(), &work_dir), &runner)
        .await
        .unwrap();

    let headings: Vec<&str> = report
        .markdown
        .lines()
        .filter(|line| line.starts_with("## "))
        .collect();
    assert_eq!(headings.len(), report.files.len() + 1);
    assert_eq!(headings.last().unwrap(), &"## Overall Summary");
    for ((path, _), heading) in report.files.iter().zip(&headings) {
        assert_eq!(*heading, format!("## {path}"));
    }
}
