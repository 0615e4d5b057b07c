use anyhow::Result;
use clap::Parser;
use pdf_render::{convert, PdfJob, WkhtmltopdfRenderer};
use std::path::PathBuf;

/// Convert an HTML file to PDF
#[derive(Debug, Parser)]
#[command(name = "pdf-render")]
struct Args {
    /// HTML file to render
    #[arg(long, required_unless_present = "preset", requires = "output")]
    input: Option<PathBuf>,
    /// Where to write the PDF
    #[arg(long)]
    output: Option<PathBuf>,
    /// Named job: resume or resume-ats
    #[arg(long, conflicts_with = "input")]
    preset: Option<String>,
    /// Directory presets are resolved against
    #[arg(long, default_value = ".")]
    dir: PathBuf,
    /// Renderer executable
    #[arg(long, default_value = "wkhtmltopdf", env = "PDF_RENDERER_BIN")]
    renderer_bin: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    cloudlab_core::init_logging();
    let args = Args::parse();
    let job = match (&args.preset, args.input, args.output) {
        (Some(name), _, _) => PdfJob::preset(name, &args.dir)?,
        (None, Some(input), Some(output)) => PdfJob::new(input, output),
        _ => anyhow::bail!("either --preset or --input with --output is required"),
    };
    let saved = convert(&WkhtmltopdfRenderer::new(args.renderer_bin), &job).await?;
    println!("PDF saved as: {}", saved.display());
    Ok(())
}
