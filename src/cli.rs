//! Command-line front end: collect the locator and model choice, run the
//! pipeline, render the report.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use crate::analyse::{analyse, AnalyseConfig};
use crate::model::OllamaRunner;

/// Models advertised in the help text; any name the runtime understands
/// is accepted.
pub const SUGGESTED_MODELS: &[&str] = &["phi", "llama3", "mistral", "codellama"];

#[derive(Parser)]
#[clap(
    name = "repo-summariser",
    version,
    about = "Summarise a repository file-by-file with a local Ollama model"
)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Clone or open a repository, summarise every recognised file, and
    /// write a markdown report
    Analyse {
        /// Repository URL or local folder path
        #[clap(long)]
        repo: String,
        /// Local model to run (phi, llama3, mistral and codellama are known good)
        #[clap(long, default_value = "phi")]
        model: String,
        /// Directory that holds clones of remote repositories
        #[clap(long, default_value = "repo_workdir")]
        work_dir: PathBuf,
        /// Where to write the markdown report
        #[clap(long, default_value = "repo_summary.md")]
        output: PathBuf,
        /// Give up on a single model invocation after this many seconds
        /// (waits indefinitely when absent)
        #[clap(long)]
        timeout_secs: Option<u64>,
        /// Print the result object as JSON instead of writing the report file
        #[clap(long)]
        json: bool,
    },
}

/// Extracted async CLI logic entrypoint for integration tests and main()
pub async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Analyse {
            repo,
            model,
            work_dir,
            output,
            timeout_secs,
            json,
        } => {
            if repo.trim().is_empty() {
                eprintln!("Please enter a repository URL or local folder path before analysing.");
                anyhow::bail!("no repository given");
            }

            if !SUGGESTED_MODELS.contains(&model.as_str()) {
                tracing::debug!(model = %model, "Model is not one of the advertised defaults");
            }
            let config = AnalyseConfig {
                locator: repo,
                model,
                work_dir,
            };
            let runner = OllamaRunner::new().with_timeout(timeout_secs.map(Duration::from_secs));

            println!("Analysing {}...", config.locator);
            match analyse(&config, &runner).await {
                Ok(report) => {
                    if json {
                        println!("{}", serde_json::to_string_pretty(&report)?);
                    } else {
                        std::fs::write(&output, &report.markdown).with_context(|| {
                            format!("failed to write report to {}", output.display())
                        })?;
                        println!("Analysis complete: {} files summarised.", report.files.len());
                        println!("Report written to {}.", output.display());
                    }
                    Ok(())
                }
                Err(e) => {
                    if json {
                        println!("{}", serde_json::json!({ "error": e.to_string() }));
                    }
                    eprintln!("[ERROR] Analysis failed: {e}");
                    Err(e.into())
                }
            }
        }
    }
}
