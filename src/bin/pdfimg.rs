//! CLI binary for pdfimg-convert.
//!
//! A thin shim over the library crate that maps subcommands and flags to
//! `JobOptions`, runs one job and prints its result.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use pdfimg_convert::pipeline::input::split_path_list;
use pdfimg_convert::{
    compress_images, images_to_pdf, pdf_to_images, split_pdf, CancelToken, ImageFormat,
    ItemOutcome, JobKind, JobOptions, JobOutcome, JobProgressCallback, JobResult,
    ProgressCallback, RasterSize,
};
use std::io;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers ──────────────────────────────────────────────────

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
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

const TICKS: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"];

// ── CLI progress callback using indicatif ────────────────────────────────

/// Live progress bar plus one log line per item.
struct CliProgressCallback {
    bar: ProgressBar,
    errors: AtomicUsize,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new(0);
        let spinner_style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(TICKS);

        bar.set_style(spinner_style);
        bar.set_prefix("Preparing");
        bar.set_message("Checking inputs…");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self {
            bar,
            errors: AtomicUsize::new(0),
        })
    }

    fn activate_bar(&self, kind: JobKind, total: usize) {
        let progress_style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {pos:>3}/{len} items  \
             ⏱ {elapsed_precise}  ETA {eta_precise}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(TICKS);

        self.bar.set_length(total as u64);
        self.bar.set_style(progress_style);
        self.bar.set_prefix(kind.to_string());
        self.bar.reset_eta();
    }
}

impl JobProgressCallback for CliProgressCallback {
    fn on_job_start(&self, kind: JobKind, total_items: usize) {
        self.activate_bar(kind, total_items);
        self.bar.println(format!(
            "{} {}",
            cyan("◆"),
            bold(&format!("{kind}: {total_items} item(s)"))
        ));
    }

    fn on_item_start(&self, _index: usize, _total_items: usize, label: &str) {
        self.bar.set_message(label.to_string());
    }

    fn on_item_complete(&self, outcome: &ItemOutcome) {
        let line = match (&outcome.skipped_reason, &outcome.output) {
            (Some(reason), _) => format!(
                "  {} {:<24}  {}",
                cyan("–"),
                outcome.label,
                dim(&format!("skipped: {reason}"))
            ),
            (None, Some(path)) => format!(
                "  {} {:<24}  {}",
                green("✓"),
                outcome.label,
                dim(&path.display().to_string())
            ),
            (None, None) => format!("  {} {}", green("✓"), outcome.label),
        };
        self.bar.println(line);
    }

    fn on_item_error(&self, _index: usize, label: &str, error: &str) {
        self.errors.fetch_add(1, Ordering::SeqCst);
        let msg = if error.chars().count() > 80 {
            format!("{}\u{2026}", error.chars().take(79).collect::<String>())
        } else {
            error.to_string()
        };
        self.bar
            .println(format!("  {} {:<24}  {}", red("✗"), label, red(&msg)));
    }

    fn on_progress(&self, update: &pdfimg_convert::ProgressUpdate) {
        self.bar.set_position(update.completed as u64);
    }

    fn on_job_complete(&self, _result: &JobResult) {
        self.bar.finish_and_clear();
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Every page of a PDF as PNG
  pdfimg to-images report.pdf -o pages/

  # JPEG pages from an encrypted PDF
  pdfimg to-images secret.pdf -o pages/ --format jpeg --password hunter2

  # Scans to one PDF (one image per A4 page)
  pdfimg from-images "scan1.png;scan2.png" scan3.jpg -o scans.pdf

  # Recompress photos as JPEG at quality 60
  pdfimg compress photos/*.png -o small/ --quality 60

  # Split chapters out of a book
  pdfimg split book.pdf -o chapters/ --pages "1-12, 13-40; 41"

  # Machine-readable result
  pdfimg --json split book.pdf -o chapters/ --pages 1-3

PAGE SYNTAX (split):
  Ranges and single pages separated by commas, semicolons or spaces.
  Out-of-range values are clamped to the document; malformed tokens and
  reversed ranges such as 8-3 are ignored.

ENVIRONMENT VARIABLES:
  PDFIUM_LIB_PATH   Directory or file of the pdfium shared library
  RUST_LOG          Log filter (overrides -v / -q)
  PDFIMG_*          Fallback for any flag, e.g. PDFIMG_QUALITY=60
"#;

/// Batch conversion between PDF documents and images.
#[derive(Parser, Debug)]
#[command(
    name = "pdfimg",
    version,
    about = "Batch PDF ⇄ image conversion: rasterise, assemble, recompress and split",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    #[command(flatten)]
    common: CommonArgs,
}

#[derive(Args, Debug)]
struct CommonArgs {
    /// Print the job result as JSON on stdout.
    #[arg(long, global = true, env = "PDFIMG_JSON")]
    json: bool,

    /// Disable the progress bar.
    #[arg(long, global = true, env = "PDFIMG_NO_PROGRESS")]
    no_progress: bool,

    /// Pause between items, in milliseconds.
    #[arg(long, global = true, env = "PDFIMG_THROTTLE_MS", default_value_t = 0)]
    throttle_ms: u64,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, global = true, env = "PDFIMG_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, global = true, env = "PDFIMG_QUIET")]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render every page of a PDF to page_{n}.{ext}.
    ToImages {
        /// Source PDF.
        input: PathBuf,

        /// Existing output folder.
        #[arg(short, long, env = "PDFIMG_OUTPUT_DIR")]
        output_dir: PathBuf,

        /// png, jpeg (jpg) or bmp.
        #[arg(long, env = "PDFIMG_FORMAT", default_value = "png")]
        format: ImageFormat,

        /// Render A4 pages at this resolution.
        #[arg(long, env = "PDFIMG_DPI", default_value_t = pdfimg_convert::config::DEFAULT_DPI,
              value_parser = clap::value_parser!(u32).range(1..))]
        dpi: u32,

        /// Exact raster width in pixels (overrides --dpi).
        #[arg(long, env = "PDFIMG_WIDTH")]
        width: Option<u32>,

        /// Exact raster height in pixels (overrides --dpi).
        #[arg(long, env = "PDFIMG_HEIGHT")]
        height: Option<u32>,

        /// PDF user password for encrypted documents.
        #[arg(long, env = "PDFIMG_PASSWORD")]
        password: Option<String>,
    },

    /// Place each image on its own A4 page of one PDF.
    FromImages {
        /// Image paths; each argument may itself be a ';'-separated list.
        #[arg(required = true)]
        images: Vec<String>,

        /// Output PDF file.
        #[arg(short, long, env = "PDFIMG_OUTPUT")]
        output: PathBuf,
    },

    /// Re-encode images as {stem}_compressed.jpg.
    Compress {
        /// Image paths; each argument may itself be a ';'-separated list.
        #[arg(required = true)]
        images: Vec<String>,

        /// Output folder (created if missing).
        #[arg(short, long, env = "PDFIMG_OUTPUT_DIR")]
        output_dir: PathBuf,

        /// JPEG quality (0–100).
        #[arg(long, env = "PDFIMG_QUALITY", default_value_t = pdfimg_convert::config::DEFAULT_QUALITY,
              value_parser = clap::value_parser!(u8).range(0..=100))]
        quality: u8,
    },

    /// Write one PDF per page range.
    Split {
        /// Source PDF.
        input: PathBuf,

        /// Output folder (created if missing).
        #[arg(short, long, env = "PDFIMG_OUTPUT_DIR")]
        output_dir: PathBuf,

        /// Ranges such as "1-3, 5; 8-9".
        #[arg(short, long, env = "PDFIMG_PAGES")]
        pages: String,

        /// PDF user password for encrypted documents.
        #[arg(long, env = "PDFIMG_PASSWORD")]
        password: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let common = &cli.common;

    // ── Logging setup ────────────────────────────────────────────────────
    // The progress bar replaces INFO logs unless -v is given.
    let show_progress = !common.quiet && !common.no_progress && !common.json;
    let filter = if common.verbose {
        "debug"
    } else if common.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Cancellation ─────────────────────────────────────────────────────
    let cancel = CancelToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                eprintln!("{} cancelling after the current item…", cyan("⚠"));
                cancel.cancel();
            }
        });
    }

    let progress_cb: Option<ProgressCallback> = if show_progress {
        Some(CliProgressCallback::new() as Arc<dyn JobProgressCallback>)
    } else {
        None
    };

    // ── Run job ──────────────────────────────────────────────────────────
    let result = match cli.command {
        Command::ToImages {
            ref input,
            ref output_dir,
            format,
            dpi,
            width,
            height,
            ref password,
        } => {
            let mut builder = base_options(common, progress_cb, cancel)
                .image_format(format)
                .dpi(dpi);
            if width.is_some() || height.is_some() {
                let a4 = RasterSize::a4_at(dpi);
                builder = builder
                    .raster_size(width.unwrap_or(a4.width), height.unwrap_or(a4.height));
            }
            if let Some(pwd) = password {
                builder = builder.password(pwd.clone());
            }
            let options = builder.build().context("Invalid options")?;
            pdf_to_images(input, output_dir, &options).await
        }
        Command::FromImages {
            ref images,
            ref output,
        } => {
            let options = base_options(common, progress_cb, cancel)
                .build()
                .context("Invalid options")?;
            images_to_pdf(expand_paths(images), output, &options).await
        }
        Command::Compress {
            ref images,
            ref output_dir,
            quality,
        } => {
            let options = base_options(common, progress_cb, cancel)
                .compression_quality(quality)
                .build()
                .context("Invalid options")?;
            compress_images(expand_paths(images), output_dir, &options).await
        }
        Command::Split {
            ref input,
            ref output_dir,
            ref pages,
            ref password,
        } => {
            let mut builder = base_options(common, progress_cb, cancel);
            if let Some(pwd) = password {
                builder = builder.password(pwd.clone());
            }
            let options = builder.build().context("Invalid options")?;
            split_pdf(input, output_dir, pages.clone(), &options).await
        }
    };

    report(&result, common)?;

    if result.outcome() == JobOutcome::Failed {
        std::process::exit(1);
    }
    Ok(())
}

fn base_options(
    common: &CommonArgs,
    progress: Option<ProgressCallback>,
    cancel: CancelToken,
) -> pdfimg_convert::JobOptionsBuilder {
    let mut builder = JobOptions::builder()
        .throttle_ms(common.throttle_ms)
        .cancel(cancel);
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }
    builder
}

/// Flatten arguments that may each hold a `;`-separated path list.
fn expand_paths(args: &[String]) -> Vec<PathBuf> {
    args.iter().flat_map(|a| split_path_list(a)).collect()
}

fn report(result: &JobResult, common: &CommonArgs) -> Result<()> {
    if common.json {
        let json = serde_json::to_string_pretty(result).context("Failed to serialise result")?;
        println!("{json}");
        return Ok(());
    }
    if common.quiet && result.outcome() != JobOutcome::Failed {
        return Ok(());
    }

    let marker = match result.outcome() {
        JobOutcome::Completed if result.items_skipped == 0 => green("✔"),
        JobOutcome::Completed | JobOutcome::NothingProduced | JobOutcome::Cancelled => cyan("⚠"),
        JobOutcome::Failed => red("✘"),
    };
    eprintln!("{marker} {}", result.summary());
    if !common.quiet {
        for path in &result.outputs {
            eprintln!("   {} {}", dim("→"), path.display());
        }
        eprintln!("   {}", dim(&format!("{}ms", result.duration_ms)));
    }
    Ok(())
}
