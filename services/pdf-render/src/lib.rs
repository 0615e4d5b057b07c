//! Render a local HTML file to PDF with an external renderer.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::process::Command;
use tracing::{info, instrument};

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("input file {0} does not exist")]
    MissingInput(PathBuf),
    #[error("could not read input file {path}: {source}")]
    Input { path: PathBuf, #[source] source: std::io::Error },
    #[error("could not start renderer {bin}: {source}")]
    Spawn { bin: String, #[source] source: std::io::Error },
    #[error("renderer exited with {status}: {stderr}")]
    Failed { status: std::process::ExitStatus, stderr: String },
    #[error("unknown preset {0:?}")]
    UnknownPreset(String),
}

/// Page geometry. Margins are CSS lengths (`0.5in`, `12mm`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLayout {
    pub page_size: String,
    pub margin_top: String,
    pub margin_right: String,
    pub margin_bottom: String,
    pub margin_left: String,
    pub print_background: bool,
}

impl Default for PageLayout {
    fn default() -> Self {
        let m = "0.5in".to_string();
        Self { page_size: "A4".into(), margin_top: m.clone(), margin_right: m.clone(), margin_bottom: m.clone(), margin_left: m, print_background: true }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdfJob {
    pub input: PathBuf,
    pub output: PathBuf,
    pub layout: PageLayout,
}

impl PdfJob {
    pub fn new(input: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self { input: input.into(), output: output.into(), layout: PageLayout::default() }
    }

    /// `resume` and `resume-ats`, resolved against `dir`.
    pub fn preset(name: &str, dir: &Path) -> Result<Self, RenderError> {
        let (input, output) = match name {
            "resume" => ("resume.html", "Resume.pdf"),
            "resume-ats" => ("resume_ats.html", "Resume_ATS.pdf"),
            other => return Err(RenderError::UnknownPreset(other.to_string())),
        };
        Ok(Self::new(dir.join(input), dir.join(output)))
    }
}

#[async_trait]
pub trait Renderer: Send + Sync {
    async fn render(&self, job: &PdfJob) -> Result<(), RenderError>;
}

pub struct WkhtmltopdfRenderer {
    bin: String,
}

impl WkhtmltopdfRenderer {
    pub fn new(bin: impl Into<String>) -> Self { Self { bin: bin.into() } }

    pub fn args(job: &PdfJob) -> Vec<String> {
        let l = &job.layout;
        let mut args = vec![
            "--quiet".to_string(),
            "--enable-local-file-access".to_string(),
            "--page-size".to_string(), l.page_size.clone(),
            "--margin-top".to_string(), l.margin_top.clone(),
            "--margin-right".to_string(), l.margin_right.clone(),
            "--margin-bottom".to_string(), l.margin_bottom.clone(),
            "--margin-left".to_string(), l.margin_left.clone(),
        ];
        args.push(if l.print_background { "--background" } else { "--no-background" }.to_string());
        args.push(job.input.display().to_string());
        args.push(job.output.display().to_string());
        args
    }
}

impl Default for WkhtmltopdfRenderer {
    fn default() -> Self { Self::new("wkhtmltopdf") }
}

#[async_trait]
impl Renderer for WkhtmltopdfRenderer {
    #[instrument(skip(self, job), fields(bin = %self.bin, input = %job.input.display()))]
    async fn render(&self, job: &PdfJob) -> Result<(), RenderError> {
        let out = Command::new(&self.bin)
            .args(Self::args(job))
            .output()
            .await
            .map_err(|source| RenderError::Spawn { bin: self.bin.clone(), source })?;
        if !out.status.success() {
            return Err(RenderError::Failed { status: out.status, stderr: String::from_utf8_lossy(&out.stderr).trim().to_string() });
        }
        Ok(())
    }
}

/// Check the input exists, render, and return where the PDF went.
pub async fn convert<R: Renderer + ?Sized>(renderer: &R, job: &PdfJob) -> Result<PathBuf, RenderError> {
    let exists = tokio::fs::try_exists(&job.input)
        .await
        .map_err(|source| RenderError::Input { path: job.input.clone(), source })?;
    if !exists {
        return Err(RenderError::MissingInput(job.input.clone()));
    }
    renderer.render(job).await?;
    info!(output=%job.output.display(), "pdf written");
    Ok(job.output.clone())
}
