//! CLI binary for pagestack.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `ConversionConfig`, runs the conversion, and writes the stacked PNG.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use pagestack::{
    convert_file, ConversionConfig, ConversionSummary, ProgressCallback, RasterProgress,
    DEFAULT_SCALE, DEFAULT_SUFFIX,
};
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: a single bar that grows to the page count once
/// the document has been opened.
struct CliProgress {
    bar: ProgressBar,
}

impl CliProgress {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new(0); // length set in on_start

        let spinner_style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        bar.set_style(spinner_style);
        bar.set_prefix("Preparing");
        bar.set_message("Opening PDF…");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self { bar })
    }
}

impl RasterProgress for CliProgress {
    fn on_start(&self, total_pages: usize) {
        let style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  [{bar:42.green/238}] {pos:>3}/{len} pages  ⏱ {elapsed_precise}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ");

        self.bar.set_length(total_pages as u64);
        self.bar.set_style(style);
        self.bar.set_prefix("Rendering");
    }

    fn on_page_rendered(&self, page_num: usize, _total_pages: usize) {
        self.bar.set_message(format!("page {page_num}"));
        self.bar.inc(1);
    }

    fn on_complete(&self, width: u32, height: u32) {
        self.bar
            .finish_with_message(format!("stacked → {width}x{height} px"));
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Stack all pages of a PDF into resume-allpages.png (current directory)
  pagestack resume.pdf

  # Write to a specific path
  pagestack resume.pdf -o previews/resume.png

  # Render at a different scale factor
  pagestack --scale 1.5 report.pdf

  # Machine-readable summary on stdout
  pagestack --json resume.pdf

ENVIRONMENT VARIABLES:
  PDFIUM_LIB_PATH     Path to an existing libpdfium; skips system lookup
  PAGESTACK_SCALE     Default render scale factor
  PAGESTACK_OUTPUT    Default output path

SETUP:
  pagestack renders through the pdfium library. Install it as a system
  library, or point PDFIUM_LIB_PATH at a downloaded copy (e.g. from
  bblanchon/pdfium-binaries).
"#;

/// Stack every page of a PDF into a single tall PNG.
#[derive(Parser, Debug)]
#[command(
    name = "pagestack",
    version,
    about = "Stack every page of a PDF into a single tall PNG",
    long_about = "Rasterise each page of a PDF at a fixed scale and stack the results \
vertically (page 1 on top) into one lossless PNG, named after the source file \
(resume.pdf → resume-allpages.png).",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Local PDF file path.
    input: PathBuf,

    /// Write the PNG to this path instead of `{stem}-allpages.png` in the
    /// current directory.
    #[arg(short, long, env = "PAGESTACK_OUTPUT")]
    output: Option<PathBuf>,

    /// Render scale applied to each page's point size.
    #[arg(long, env = "PAGESTACK_SCALE", default_value_t = DEFAULT_SCALE)]
    scale: f32,

    /// Suffix inserted between the source stem and `.png`.
    #[arg(long, env = "PAGESTACK_SUFFIX", default_value = DEFAULT_SUFFIX)]
    suffix: String,

    /// Print a JSON summary (file name, dimensions, timings) to stdout.
    #[arg(long, env = "PAGESTACK_JSON")]
    json: bool,

    /// Disable the progress bar.
    #[arg(long, env = "PAGESTACK_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "PAGESTACK_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "PAGESTACK_QUIET")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The progress bar provides the feedback that matters; suppress INFO
    // library logs while it is active unless --verbose asks for them.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_writer(io::stderr)
        .init();

    // ── Build config ─────────────────────────────────────────────────────
    let progress: Option<ProgressCallback> = if show_progress {
        Some(CliProgress::new() as Arc<dyn RasterProgress>)
    } else {
        None
    };

    let mut builder = ConversionConfig::builder()
        .scale(cli.scale)
        .output_suffix(cli.suffix.as_str());
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }
    let config = builder.build().context("Invalid configuration")?;

    // ── Run conversion ───────────────────────────────────────────────────
    let result = convert_file(&cli.input, &config).await;

    let Some(file) = result.file else {
        let cause = result
            .error
            .unwrap_or_else(|| "conversion produced no output".to_string());
        eprintln!("{} {}", red("✘"), cause);
        std::process::exit(1);
    };

    let output_path = cli.output.clone().unwrap_or_else(|| PathBuf::from(&file.name));
    tokio::fs::write(&output_path, &file.bytes)
        .await
        .with_context(|| format!("Failed to write output file {:?}", output_path))?;

    // ── Summary ──────────────────────────────────────────────────────────
    if cli.json {
        let summary = ConversionSummary {
            file_name: file.name.clone(),
            content_type: file.content_type.clone(),
            stats: result
                .stats
                .clone()
                .context("successful conversion must carry stats")?,
        };
        println!(
            "{}",
            serde_json::to_string_pretty(&summary).context("Failed to serialise summary")?
        );
    } else if !cli.quiet {
        if let Some(stats) = result.stats {
            eprintln!(
                "{}  {} pages → {}x{} px  {}  {}ms  →  {}",
                green("✔"),
                stats.page_count,
                stats.width,
                stats.height,
                dim(&format!("{:.1} KB", stats.png_bytes as f64 / 1024.0)),
                stats.total_duration_ms,
                bold(&output_path.display().to_string()),
            );
        } else {
            eprintln!("{}  wrote {}", green("✔"), output_path.display());
        }
    }

    // The transient preview is only useful to embedding applications; the CLI
    // writes the durable artefact, so the handle is dropped (and its temp
    // file deleted) here.
    drop(result.preview);

    Ok(())
}
