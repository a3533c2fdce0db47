//! Materialise a repository on local disk.
//!
//! A locator that names an existing local directory is used in place.
//! Anything else is treated as a remote URL and cloned under the work
//! directory with the `git` binary, reusing (via `git pull`) a clone from an
//! earlier run when one exists.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{debug, error, info, warn};

#[derive(Debug, thiserror::Error)]
pub enum AcquireError {
    #[error("Repository not found: {0}. Please check if the repository exists and is public.")]
    NotFound(String),
    #[error("failed to clone {url}: {detail}")]
    Clone { url: String, detail: String },
    #[error("failed to run git: {0}")]
    Git(#[source] std::io::Error),
    #[error("failed to prepare {path}: {source}")]
    WorkDir {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Clone target directory name: the URL's last path segment, with any
/// trailing slash and `.git` suffix stripped.
pub fn repo_dir_name(url: &str) -> String {
    let trimmed = url.trim_end_matches('/');
    let last = trimmed.rsplit('/').next().unwrap_or(trimmed);
    last.strip_suffix(".git").unwrap_or(last).to_string()
}

/// Resolve `locator` to a local directory of repository files.
///
/// Remote repositories land in `work_dir/<repo name>`. An existing clone is
/// refreshed with `git pull`; a failed pull means a stale or broken checkout,
/// so the directory is removed and cloned afresh.
pub fn acquire(locator: &str, work_dir: &Path) -> Result<PathBuf, AcquireError> {
    let local = Path::new(locator);
    if local.is_dir() {
        info!(path = %local.display(), "Locator is a local directory, using it in place");
        return Ok(local.to_path_buf());
    }

    fs::create_dir_all(work_dir).map_err(|source| AcquireError::WorkDir {
        path: work_dir.display().to_string(),
        source,
    })?;
    let target = work_dir.join(repo_dir_name(locator));

    if target.exists() {
        debug!(path = %target.display(), "Existing clone found, pulling latest");
        let pulled = Command::new("git")
            .arg("-C")
            .arg(&target)
            .arg("pull")
            .output()
            .map_err(AcquireError::Git)?;
        if pulled.status.success() {
            info!(path = %target.display(), "Updated existing clone");
            return Ok(target);
        }
        warn!(
            path = %target.display(),
            stderr = %String::from_utf8_lossy(&pulled.stderr).trim(),
            "Pull failed, discarding clone and starting over"
        );
        fs::remove_dir_all(&target).map_err(|source| AcquireError::WorkDir {
            path: target.display().to_string(),
            source,
        })?;
    }

    info!(url = locator, path = %target.display(), "Cloning repository");
    let cloned = Command::new("git")
        .arg("clone")
        .arg(locator)
        .arg(&target)
        .output()
        .map_err(AcquireError::Git)?;
    if cloned.status.success() {
        info!(url = locator, path = %target.display(), "Clone completed");
        return Ok(target);
    }

    let stderr = String::from_utf8_lossy(&cloned.stderr).trim().to_string();
    error!(url = locator, stderr = %stderr, "git clone failed");
    let lowered = stderr.to_lowercase();
    if lowered.contains("not found") || lowered.contains("does not exist") {
        Err(AcquireError::NotFound(locator.to_string()))
    } else {
        Err(AcquireError::Clone {
            url: locator.to_string(),
            detail: stderr,
        })
    }
}
