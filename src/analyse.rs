//! Coordinating module for the acquire-enumerate-summarise-assemble pipeline.

use std::path::PathBuf;

use tracing::{info, warn};

use crate::acquire::{acquire, AcquireError};
use crate::enumerate::{enumerate, EnumerateError};
use crate::model::ModelRunner;
use crate::report::{assemble, Report};
use crate::summarise::{summarise_file, summarise_overall};

/// Everything one analysis run needs to know.
#[derive(Debug, Clone)]
pub struct AnalyseConfig {
    /// Repository URL or local directory path.
    pub locator: String,
    /// Model name passed to the runtime.
    pub model: String,
    /// Directory that holds clones of remote repositories.
    pub work_dir: PathBuf,
}

/// Fatal pipeline failures. Model failures never appear here: they degrade
/// into warning text inside the report instead.
#[derive(Debug, thiserror::Error)]
pub enum AnalyseError {
    #[error(transparent)]
    Acquire(#[from] AcquireError),
    #[error(transparent)]
    Enumerate(#[from] EnumerateError),
}

/// Run the full pipeline, strictly sequentially.
///
/// Every enumerated file ends up with exactly one report entry: its summary
/// on success, a `Warning: ...` string on failure. The overall summary slot
/// degrades the same way.
pub async fn analyse(
    config: &AnalyseConfig,
    runner: &dyn ModelRunner,
) -> Result<Report, AnalyseError> {
    let repo_path = acquire(&config.locator, &config.work_dir)?;
    let files = enumerate(&repo_path)?;
    info!(
        repo = %repo_path.display(),
        count = files.len(),
        model = %config.model,
        "Summarising repository files"
    );

    let mut entries: Vec<(String, String)> = Vec::with_capacity(files.len());
    for path in &files {
        let display_path = path.display().to_string();
        let summary = match summarise_file(runner, path, &config.model).await {
            Ok(text) => text,
            Err(e) => {
                warn!(path = %display_path, error = %e, "File summary failed, continuing");
                format!("Warning: {e}")
            }
        };
        entries.push((display_path, summary));
    }

    let overall = match summarise_overall(runner, &entries, &config.model).await {
        Ok(text) => text,
        Err(e) => {
            warn!(error = %e, "Overall summary failed");
            format!("Warning: {e}")
        }
    };

    info!(files = entries.len(), "Analysis pipeline completed");
    Ok(assemble(entries, overall))
}
