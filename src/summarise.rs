//! Build prompts and run them through the model, per file and overall.

use std::path::Path;

use tracing::debug;

use crate::model::{ModelError, ModelRunner};

/// Character cap applied to file content and to the serialised summaries
/// embedded in the aggregate prompt.
pub const MAX_PROMPT_CONTENT_CHARS: usize = 4_000;
pub const TRUNCATION_MARKER: &str = "\n\n... (truncated)";
/// Substituted when the model succeeds but prints nothing.
pub const NO_OUTPUT_SENTINEL: &str = "No output received from model.";

#[derive(Debug, thiserror::Error)]
pub enum SummariseError {
    #[error("could not read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Model(#[from] ModelError),
    #[error("could not serialise file summaries: {0}")]
    Serialise(#[from] serde_json::Error),
}

/// Cap `text` at `limit` characters, appending a marker when content was cut.
pub fn truncate_chars(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        None => text.to_string(),
        Some((byte_index, _)) => {
            let mut capped = text[..byte_index].to_string();
            capped.push_str(TRUNCATION_MARKER);
            capped
        }
    }
}

fn non_empty_or_sentinel(text: String) -> String {
    if text.is_empty() {
        NO_OUTPUT_SENTINEL.to_string()
    } else {
        text
    }
}

fn file_prompt(content: &str) -> String {
    format!("Summarize what this file does:\n\n{content}")
}

fn overall_prompt(serialised_summaries: &str) -> String {
    format!(
        "Given the following file summaries, explain the overall purpose, \
         architecture, and main functionality of this project in detail:\
         \n\n{serialised_summaries}\n\nProject Summary:"
    )
}

/// Summarise one file. Content is read lossily (undecodable bytes replaced)
/// and capped before it goes into the prompt.
pub async fn summarise_file(
    runner: &dyn ModelRunner,
    path: &Path,
    model: &str,
) -> Result<String, SummariseError> {
    let raw = std::fs::read(path).map_err(|source| SummariseError::Read {
        path: path.display().to_string(),
        source,
    })?;
    let content = String::from_utf8_lossy(&raw);
    let capped = truncate_chars(&content, MAX_PROMPT_CONTENT_CHARS);
    debug!(path = %path.display(), chars = capped.len(), "Built file summary prompt");

    let response = runner.generate(model, &file_prompt(&capped)).await?;
    Ok(non_empty_or_sentinel(response))
}

/// Ask the model for an architecture-level narrative over all per-file
/// summaries, serialised as pretty JSON in processing order.
pub async fn summarise_overall(
    runner: &dyn ModelRunner,
    summaries: &[(String, String)],
    model: &str,
) -> Result<String, SummariseError> {
    let mut payload = serde_json::Map::new();
    for (path, summary) in summaries {
        payload.insert(path.clone(), serde_json::Value::String(summary.clone()));
    }
    let serialised = serde_json::to_string_pretty(&payload)?;
    let capped = truncate_chars(&serialised, MAX_PROMPT_CONTENT_CHARS);
    debug!(
        summaries = summaries.len(),
        chars = capped.len(),
        "Built overall summary prompt"
    );

    let response = runner.generate(model, &overall_prompt(&capped)).await?;
    Ok(non_empty_or_sentinel(response))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::MockModelRunner;
    use std::io::Write;

    #[test]
    fn truncation_appends_marker_only_when_capped() {
        assert_eq!(truncate_chars("short", 10), "short");
        assert_eq!(truncate_chars("exact", 5), "exact");
        let capped = truncate_chars("abcdef", 3);
        assert_eq!(capped, format!("abc{TRUNCATION_MARKER}"));
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        // Multi-byte characters must not be split mid-codepoint.
        let capped = truncate_chars("ééééé", 2);
        assert_eq!(capped, format!("éé{TRUNCATION_MARKER}"));
    }

    #[tokio::test]
    async fn file_summary_embeds_content_and_trims_to_sentinel() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "fn main() {{}}").unwrap();

        let mut runner = MockModelRunner::new();
        runner
            .expect_generate()
            .withf(|model, prompt| {
                model == "phi"
                    && prompt.starts_with("Summarize what this file does:")
                    && prompt.contains("fn main()")
            })
            .returning(|_, _| Ok(String::new()));

        let summary = summarise_file(&runner, file.path(), "phi").await.unwrap();
        assert_eq!(summary, NO_OUTPUT_SENTINEL);
    }

    #[tokio::test]
    async fn file_summary_reports_unreadable_file() {
        let runner = MockModelRunner::new();
        let missing = Path::new("definitely/not/a/file.rs");
        let err = summarise_file(&runner, missing, "phi").await.unwrap_err();
        assert!(matches!(err, SummariseError::Read { .. }));
        assert!(err.to_string().contains("could not read"));
    }

    #[tokio::test]
    async fn overall_prompt_carries_every_summary() {
        let summaries = vec![
            ("a.py".to_string(), "does a".to_string()),
            ("b.py".to_string(), "does b".to_string()),
        ];

        let mut runner = MockModelRunner::new();
        runner
            .expect_generate()
            .withf(|_, prompt| {
                prompt.contains("a.py")
                    && prompt.contains("does b")
                    && prompt.ends_with("Project Summary:")
            })
            .returning(|_, _| Ok("an overview".to_string()));

        let overall = summarise_overall(&runner, &summaries, "phi").await.unwrap();
        assert_eq!(overall, "an overview");
    }
}
