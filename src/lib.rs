//! Summarise a repository with a locally running Ollama model.
//!
//! The pipeline is strictly sequential: acquire a local copy of the
//! repository, enumerate its recognised text files (smallest first),
//! summarise each file through the model, ask the model for an overall
//! narrative, and assemble everything into a markdown report.

pub mod acquire;
pub mod analyse;
pub mod cli;
pub mod enumerate;
pub mod model;
pub mod report;
pub mod summarise;
