//! CLI binary for edgequake-doc2md.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `ConversionConfig` and prints results.

use anyhow::{bail, Context, Result};
use clap::Parser;
use edgequake_doc2md::pipeline::input::guess_content_type;
use edgequake_doc2md::{
    convert_to_file, supported_formats, ConversionConfig, Envelope, Orchestrator, Upload,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;
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

const AFTER_HELP: &str = r#"EXAMPLES:
  # Basic conversion (stdout)
  doc2md report.pdf

  # Convert to file
  doc2md budget.xlsx -o budget.md

  # Several files at once, progress bar on stderr
  doc2md notes.txt data.json feed.xml

  # Override the guessed content type
  doc2md --content-type text/csv export.dat

  # Full JSON envelope (rawMarkdown, metadata, preview, sourceFormat)
  doc2md --json photo.png > photo.json

  # List supported formats
  doc2md --formats

ENVIRONMENT VARIABLES:
  RUST_LOG                     Log filter (overrides -v / -q)
  DOC2MD_MAX_FILE_SIZE         Upload ceiling in bytes (default 20 MiB)
  DOC2MD_IMAGE_PREVIEW_LIMIT   Inline preview ceiling in bytes (default 1 MiB)
  DOC2MD_SHEET_ROW_LIMIT       Rows per worksheet (default 100)
"#;

/// Convert documents (PDF, DOCX, XLSX, HTML, CSV, JSON, XML, images, text) to Markdown.
#[derive(Parser, Debug)]
#[command(
    name = "doc2md",
    version,
    about = "Convert documents to Markdown",
    long_about = "Convert PDF, Word, Excel, HTML, CSV, JSON, XML, image and text files to \
Markdown. Unknown types are sniffed and summarised as text or binary.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Files to convert.
    #[arg(required_unless_present = "formats")]
    files: Vec<PathBuf>,

    /// Declared MIME type; guessed from the extension when omitted.
    #[arg(long, env = "DOC2MD_CONTENT_TYPE")]
    content_type: Option<String>,

    /// Write Markdown to this file instead of stdout (single input only).
    #[arg(short, long, env = "DOC2MD_OUTPUT")]
    output: Option<PathBuf>,

    /// Print the JSON response envelope instead of Markdown.
    #[arg(long, env = "DOC2MD_JSON")]
    json: bool,

    /// Print the supported-format list as JSON and exit.
    #[arg(long)]
    formats: bool,

    /// Upload ceiling in bytes.
    #[arg(long, env = "DOC2MD_MAX_FILE_SIZE")]
    max_file_size: Option<u64>,

    /// Images smaller than this many bytes get an inline preview.
    #[arg(long, env = "DOC2MD_IMAGE_PREVIEW_LIMIT")]
    image_preview_limit: Option<u64>,

    /// Table rows emitted per worksheet.
    #[arg(long, env = "DOC2MD_SHEET_ROW_LIMIT")]
    sheet_row_limit: Option<usize>,

    /// Characters of raw text echoed when JSON fails to parse.
    #[arg(long, env = "DOC2MD_JSON_EXCERPT_CHARS")]
    json_excerpt_chars: Option<usize>,

    /// Characters of an unknown text file shown in the output.
    #[arg(long, env = "DOC2MD_UNKNOWN_TEXT_CHARS")]
    unknown_text_chars: Option<usize>,

    /// Control-character fraction above which text counts as binary (0.0–1.0).
    #[arg(long, env = "DOC2MD_BINARY_CONTROL_RATIO")]
    binary_control_ratio: Option<f64>,

    /// Disable progress bar.
    #[arg(long, env = "DOC2MD_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "DOC2MD_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "DOC2MD_QUIET")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json && cli.files.len() > 1;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
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

    let config = build_config(&cli)?;

    // ── Discovery mode ───────────────────────────────────────────────────
    if cli.formats {
        let formats = supported_formats(&config);
        println!(
            "{}",
            serde_json::to_string_pretty(&formats).context("Failed to serialise formats")?
        );
        return Ok(());
    }

    // ── Single file to disk ──────────────────────────────────────────────
    if let Some(ref output_path) = cli.output {
        let [input] = cli.files.as_slice() else {
            bail!("--output takes exactly one input file (got {})", cli.files.len());
        };
        let start = Instant::now();
        let result = convert_to_file(input, output_path, cli.content_type.as_deref(), &config)
            .await
            .with_context(|| format!("Conversion of {} failed", input.display()))?;
        if !cli.quiet {
            eprintln!(
                "{}  {}  {}ms  →  {}",
                green("✔"),
                dim(&format!("{} chars", result.markdown().len())),
                start.elapsed().as_millis(),
                bold(&output_path.display().to_string()),
            );
        }
        return Ok(());
    }

    // ── Convert each input independently ─────────────────────────────────
    let orchestrator = Orchestrator::new(config);
    let bar = show_progress.then(|| progress_bar(cli.files.len()));
    let mut failed = 0usize;

    for path in &cli.files {
        let content_type = cli
            .content_type
            .clone()
            .or_else(|| guess_content_type(path));
        let envelope = respond_for_path(&orchestrator, path, content_type).await?;

        if !envelope.is_success() {
            failed += 1;
        }
        emit(&cli, path, &envelope, bar.as_ref())?;
        if let Some(ref bar) = bar {
            bar.inc(1);
        }
    }

    if let Some(bar) = bar {
        bar.finish_and_clear();
    }

    let total = cli.files.len();
    if failed > 0 {
        bail!("{failed} of {total} file(s) failed to convert");
    }
    if total > 1 && !cli.quiet {
        eprintln!("{} {} files converted", green("✔"), bold(&total.to_string()));
    }
    Ok(())
}

/// Open `path` as a seekable upload and run it through the orchestrator on
/// the blocking pool. Missing or unreadable files become error envelopes.
async fn respond_for_path(
    orchestrator: &Orchestrator,
    path: &Path,
    content_type: Option<String>,
) -> Result<Envelope> {
    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    let orchestrator = orchestrator.clone();
    let path = path.to_path_buf();

    tokio::task::spawn_blocking(move || match File::open(&path) {
        Ok(file) => {
            let mut upload = Upload::new(file, content_type.as_deref(), filename);
            orchestrator.respond(Some(&mut upload))
        }
        Err(e) => Envelope::from(edgequake_doc2md::ConvertError::Io { path, source: e }),
    })
    .await
    .context("Conversion task panicked")
}

/// Print one result: Markdown to stdout (or the envelope with `--json`),
/// errors to stderr.
fn emit(cli: &Cli, path: &Path, envelope: &Envelope, bar: Option<&ProgressBar>) -> Result<()> {
    if cli.json {
        println!("{}", envelope.to_json().context("Failed to serialise envelope")?);
        return Ok(());
    }

    match envelope {
        Envelope::Success(ok) => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            if cli.files.len() > 1 {
                writeln!(handle, "<!-- {} -->", path.display()).context("Failed to write to stdout")?;
            }
            handle
                .write_all(ok.raw_markdown.as_bytes())
                .context("Failed to write to stdout")?;
            if !ok.raw_markdown.ends_with('\n') {
                handle.write_all(b"\n").ok();
            }
            if let Some(ref bar) = bar {
                bar.println(format!("  {} {}", green("✓"), path.display()));
            }
        }
        Envelope::Error(err) => {
            let line = format!("  {} {}  {}", red("✗"), path.display(), red(&err.error));
            match bar {
                Some(bar) => bar.println(line),
                None => eprintln!("{line}"),
            }
        }
    }
    Ok(())
}

fn progress_bar(total: usize) -> ProgressBar {
    let bar = ProgressBar::new(total as u64);
    let style = ProgressStyle::with_template(
        "{spinner:.cyan} {prefix:.bold}  [{bar:42.green/238}] {pos:>3}/{len} files  ⏱ {elapsed_precise}",
    )
    .unwrap_or_else(|_| ProgressStyle::default_bar())
    .progress_chars("█▉▊▋▌▍▎▏  ");
    bar.set_style(style);
    bar.set_prefix("Converting");
    bar
}

/// Map CLI args to `ConversionConfig`.
fn build_config(cli: &Cli) -> Result<ConversionConfig> {
    let mut builder = ConversionConfig::builder();
    if let Some(bytes) = cli.max_file_size {
        builder = builder.max_file_size(bytes);
    }
    if let Some(bytes) = cli.image_preview_limit {
        builder = builder.image_preview_limit(bytes);
    }
    if let Some(rows) = cli.sheet_row_limit {
        builder = builder.sheet_row_limit(rows);
    }
    if let Some(chars) = cli.json_excerpt_chars {
        builder = builder.json_excerpt_chars(chars);
    }
    if let Some(chars) = cli.unknown_text_chars {
        builder = builder.unknown_text_chars(chars);
    }
    if let Some(ratio) = cli.binary_control_ratio {
        builder = builder.binary_control_ratio(ratio);
    }
    builder.build().context("Invalid configuration")
}
