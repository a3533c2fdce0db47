//! Walk a repository tree and pick out the files worth summarising.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

/// Extensions recognised as summarisable text or code (compared
/// case-insensitively).
const ALLOWED_EXTENSIONS: &[&str] = &[
    "py", "js", "jsx", "ts", "java", "cpp", "c", "h", "md", "json", "yml", "yaml", "rs", "go",
    "html", "css", "txt",
];

#[derive(Debug, thiserror::Error)]
#[error("failed to walk {path}: {source}")]
pub struct EnumerateError {
    pub path: String,
    #[source]
    pub source: std::io::Error,
}

/// Recursively list recognised files under `root`, smallest first.
///
/// Hidden directories (names starting with `.`, notably `.git`) are skipped
/// entirely. Small files come out first so the cheapest prompts are sent
/// early in a run. An empty repository yields an empty list, not an error.
pub fn enumerate(root: &Path) -> Result<Vec<PathBuf>, EnumerateError> {
    let mut found: Vec<(PathBuf, u64)> = Vec::new();
    visit_dir(root, &mut found)?;
    // Stable sort keeps enumeration order for equally sized files.
    found.sort_by_key(|(_, size)| *size);

    info!(
        root = %root.display(),
        count = found.len(),
        "Enumerated summarisable files"
    );
    Ok(found.into_iter().map(|(path, _)| path).collect())
}

fn visit_dir(dir: &Path, found: &mut Vec<(PathBuf, u64)>) -> Result<(), EnumerateError> {
    let entries = fs::read_dir(dir).map_err(|source| EnumerateError {
        path: dir.display().to_string(),
        source,
    })?;
    for entry in entries {
        let entry = entry.map_err(|source| EnumerateError {
            path: dir.display().to_string(),
            source,
        })?;
        let path = entry.path();
        if path.is_dir() {
            if is_hidden(&path) {
                debug!(path = %path.display(), "Skipping hidden directory");
                continue;
            }
            visit_dir(&path, found)?;
        } else if path.is_file() && has_allowed_extension(&path) {
            let size = entry
                .metadata()
                .map_err(|source| EnumerateError {
                    path: path.display().to_string(),
                    source,
                })?
                .len();
            found.push((path, size));
        }
    }
    Ok(())
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

fn has_allowed_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let lowered = ext.to_ascii_lowercase();
            ALLOWED_EXTENSIONS.contains(&lowered.as_str())
        })
        .unwrap_or(false)
}
