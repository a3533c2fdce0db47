//! Contract and implementation for the local model runtime.
//!
//! The runtime is an external process (`ollama run <model>`) that takes the
//! prompt on stdin and writes the completion to stdout. The [`ModelRunner`]
//! trait is the seam for tests: `mockall` generates a deterministic mock so
//! the pipeline can be exercised without a running model.

use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
#[cfg(any(test, feature = "test-export-mocks"))]
use mockall::automock;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, error, info};

/// Failure modes of a single model invocation.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// The runtime executable could not be found at all.
    #[error("Ollama not found. Please check that `{0}` is installed and on PATH.")]
    NotFound(String),
    /// The runtime started but exited with a failure status.
    #[error("Ollama error (exit {status}): {stderr}")]
    Runtime {
        status: std::process::ExitStatus,
        stderr: String,
    },
    /// The bounded wait elapsed before the runtime produced a response.
    #[error("model invocation exceeded the {0:?} time limit")]
    TimedOut(Duration),
    #[error("failed to talk to the model process: {0}")]
    Io(#[from] std::io::Error),
}

/// A local text-completion runtime: one prompt in, one completion out.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait ModelRunner: Send + Sync {
    /// Run `model` on `prompt` and return the trimmed completion.
    async fn generate(&self, model: &str, prompt: &str) -> Result<String, ModelError>;
}

/// Invokes the `ollama` executable, blocking until it exits or the
/// configured time limit elapses. No limit is set by default, matching
/// long-running local inference.
pub struct OllamaRunner {
    program: String,
    timeout: Option<Duration>,
}

impl OllamaRunner {
    pub fn new() -> Self {
        Self {
            program: "ollama".to_string(),
            timeout: None,
        }
    }

    /// Use a different executable name or path for the runtime.
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    /// Bound each invocation; `None` waits indefinitely.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for OllamaRunner {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ModelRunner for OllamaRunner {
    async fn generate(&self, model: &str, prompt: &str) -> Result<String, ModelError> {
        debug!(model, prompt_chars = prompt.len(), "Invoking model runtime");

        let mut child = Command::new(&self.program)
            .arg("run")
            .arg(model)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            // A timed-out invocation drops the child; make sure it dies too.
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => ModelError::NotFound(self.program.clone()),
                _ => ModelError::Io(e),
            })?;

        let mut stdin = child.stdin.take().ok_or_else(|| {
            ModelError::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                "child stdin unavailable",
            ))
        })?;
        stdin.write_all(prompt.as_bytes()).await?;
        // Closing stdin tells the runtime the prompt is complete.
        drop(stdin);

        let wait = child.wait_with_output();
        let output = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, wait).await.map_err(|_| {
                error!(model, ?limit, "Model invocation timed out");
                ModelError::TimedOut(limit)
            })??,
            None => wait.await?,
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            error!(
                model,
                status = ?output.status,
                stderr = %stderr,
                "Model runtime exited with failure"
            );
            return Err(ModelError::Runtime {
                status: output.status,
                stderr,
            });
        }

        let text = String::from_utf8_lossy(&output.stdout).trim().to_string();
        info!(model, response_chars = text.len(), "Model invocation completed");
        Ok(text)
    }
}
