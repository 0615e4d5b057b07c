use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::app::{AnalysisKind, ContentKind, MlApp, MlError};
use crate::invoker::ModelInvoker;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Task { Analyze, Generate, Insights, Code }

/// ML Application CLI
#[derive(Debug, Parser)]
#[command(name = "bedrock-ml", about = "ML Application CLI")]
pub struct Cli {
    /// Task to perform
    #[arg(long, value_enum)]
    pub task: Task,
    /// Text input for analysis or generation
    #[arg(long)]
    pub text: Option<String>,
    /// Type of analysis or generation
    #[arg(long = "type")]
    pub kind: Option<String>,
    /// File to read input from
    #[arg(long)]
    pub file: Option<PathBuf>,
    /// AWS region; overrides BEDROCK_REGION
    #[arg(long)]
    pub region: Option<String>,
}

impl Cli {
    /// `--file` wins over `--text`; `None` when neither was given.
    pub fn input(&self) -> std::io::Result<Option<String>> {
        match (&self.file, &self.text) {
            (Some(path), _) => std::fs::read_to_string(path).map(Some),
            (None, Some(text)) => Ok(Some(text.clone())),
            (None, None) => Ok(None),
        }
    }
}

pub async fn run_task<I: ModelInvoker>(app: &MlApp<I>, task: Task, input: &str, kind: Option<&str>) -> Result<String, MlError> {
    match task {
        Task::Analyze => app.analyze_text(input, AnalysisKind::parse(kind.unwrap_or("sentiment"))).await,
        Task::Generate => app.generate_content(input, ContentKind::parse(kind.unwrap_or("general"))).await,
        Task::Insights => app.data_insights(input).await,
        Task::Code => app.code_analysis(input, kind.unwrap_or("python")).await,
    }
}
