//! Assemble per-file and overall summaries into the final report.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// Final product of one analysis run.
///
/// Serialises to the result object
/// `{"files": {...}, "overall_summary": ..., "markdown": ...}` with the
/// `files` mapping in processing order.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    /// Per-file summaries, in the order the files were processed.
    #[serde(serialize_with = "entries_as_map")]
    pub files: Vec<(String, String)>,
    pub overall_summary: String,
    pub markdown: String,
}

fn entries_as_map<S: Serializer>(
    entries: &[(String, String)],
    serializer: S,
) -> Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(Some(entries.len()))?;
    for (path, summary) in entries {
        map.serialize_entry(path, summary)?;
    }
    map.end()
}

/// Render the markdown document and bundle it with its inputs.
///
/// Pure and deterministic: identical inputs produce byte-identical markdown.
pub fn assemble(entries: Vec<(String, String)>, overall_summary: String) -> Report {
    let mut markdown = String::from("# Repository Summary\n\n");
    for (path, summary) in &entries {
        markdown.push_str(&format!("## {path}\n{summary}\n\n"));
    }
    markdown.push_str(&format!("## Overall Summary\n{overall_summary}"));

    Report {
        files: entries,
        overall_summary,
        markdown,
    }
}
