//! shiwake - sort generated images into a category folder tree.
//!
//! Usage:
//!   shiwake --table sheet_SFW.xlsx          Sort using a metadata sheet
//!   shiwake --src ./images                  Sort by filename alone
//!   shiwake --table sheet.csv --dry-run     Show what would happen
//!   shiwake --help                          Show help

mod logging;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use color_eyre::eyre::{Context, Result, eyre};
use humansize::{DECIMAL, format_size};

use shiwake_batch::{BatchError, Sorter, back_references};
use shiwake_core::{BatchResult, ConflictPolicy, Mode, SortConfig, TracingReporter, Transfer};
use shiwake_table::{MetadataTable, discover_source_root, save_with_fallback};

/// Exit status when the metadata sheet cannot be read.
const EXIT_TABLE_LOAD: u8 = 2;

#[derive(Parser)]
#[command(
    name = "shiwake",
    version,
    about = "Sort generated images into a category folder tree",
    long_about = "shiwake files images named DATE_CONTENT_CHARACTER_FACE_..._NNNNN.ext into\n\
                  <root>/<mode>/<content>/<character>/... folders.\n\n\
                  Categories come from a metadata sheet (.csv or .xlsx) when a row's\n\
                  filename_prefix matches, otherwise from the filename itself. Placed\n\
                  paths are written back to a copy of the sheet."
)]
struct Cli {
    /// Folder holding the images (defaults to the sheet's img_dir, then its folder)
    #[arg(long)]
    src: Option<PathBuf>,

    /// Metadata sheet (.csv, .xlsx, .xlsm, .xltx, .xltm)
    #[arg(long)]
    table: Option<PathBuf>,

    /// SFW or NSFW (defaults to a guess from the sheet name, then SFW)
    #[arg(long)]
    mode: Option<Mode>,

    /// Copy instead of move
    #[arg(long)]
    copy: bool,

    /// Only report what would happen
    #[arg(long)]
    dry_run: bool,

    /// When the destination exists: dup, skip, overwrite or hash
    #[arg(long, default_value = "dup")]
    on_conflict: ConflictPolicy,

    /// Extra folder below the date folder ("now" gives HHMMSS)
    #[arg(long)]
    batch: Option<String>,

    /// Include subfolders of the source folder
    #[arg(long)]
    recurse: bool,

    /// Skip files smaller than this (e.g., "512", "1KB", "2MB")
    #[arg(long, default_value = "1")]
    min_bytes: String,

    /// Suffix added to the saved sheet's name
    #[arg(long, default_value = "画像仕分け済み")]
    out_suffix: String,

    /// Summary format
    #[arg(long, default_value = "text")]
    summary: OutputFormat,
}

#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

fn main() -> Result<ExitCode> {
    color_eyre::install()?;

    let cli = Cli::parse();
    let min_bytes = parse_size(&cli.min_bytes).wrap_err("Invalid --min-bytes")?;

    let table = match cli.table.as_deref().map(MetadataTable::load).transpose() {
        Ok(table) => table,
        Err(e) => {
            eprintln!("error: failed to load metadata sheet: {e}");
            return Ok(ExitCode::from(EXIT_TABLE_LOAD));
        }
    };

    let cwd = std::env::current_dir().context("Cannot read current directory")?;
    let image_dirs = table.as_ref().map(MetadataTable::image_dirs).unwrap_or_default();
    let root = discover_source_root(cli.src.as_deref(), cli.table.as_deref(), &image_dirs, &cwd);

    let log = logging::init(&root);
    if let Some(src) = cli.src.as_deref().filter(|p| !p.is_dir()) {
        tracing::warn!("--src is not a directory, using {} instead: {}", root.display(), src.display());
    }

    let mode = cli
        .mode
        .or_else(|| cli.table.as_deref().and_then(detect_mode))
        .unwrap_or_default();

    let config = SortConfig::builder()
        .source_dir(root.clone())
        .mode(mode)
        .transfer(if cli.copy { Transfer::Copy } else { Transfer::Move })
        .dry_run(cli.dry_run)
        .conflict_policy(cli.on_conflict)
        .recursive(cli.recurse)
        .min_bytes(min_bytes)
        .output_suffix(cli.out_suffix.clone())
        .batch_tag(cli.batch.as_deref().map(expand_batch_tag))
        .build()
        .wrap_err("Invalid configuration")?;

    tracing::info!(
        "root: {}  mode: {}  transfer: {}  on-conflict: {}  min size: {}{}",
        root.display(),
        config.mode,
        config.transfer,
        config.conflict_policy,
        format_size(config.min_bytes, DECIMAL),
        if config.dry_run { "  (dry run)" } else { "" }
    );

    let rows = table.as_ref().map(MetadataTable::rows).unwrap_or_default();
    let reporter = TracingReporter;
    let sorter = Sorter::new(&config, &reporter).with_rows(&rows);

    let result = match sorter.sort_directory() {
        Ok(result) => result,
        Err(e @ BatchError::NoEligibleFiles { .. }) => {
            tracing::warn!("{e}");
            return Ok(ExitCode::SUCCESS);
        }
        Err(e) => return Err(e).wrap_err("Cannot scan source folder"),
    };

    let saved = match table {
        Some(mut table) if !config.dry_run => write_back(&mut table, &result, &config.output_suffix),
        _ => None,
    };

    print_summary(cli.summary, &root, &result, saved.as_deref(), log.path.as_deref())?;
    Ok(ExitCode::SUCCESS)
}

/// Fill in `after_dir` / `after_filename` and save a suffixed copy.
fn write_back(table: &mut MetadataTable, result: &BatchResult, suffix: &str) -> Option<PathBuf> {
    table.ensure_after_columns();
    for backref in back_references(result, &table.rows()) {
        table.set_after(
            backref.position,
            &backref.after_dir.to_string_lossy(),
            &backref.after_filename,
        );
    }
    save_with_fallback(table, suffix, &TracingReporter)
}

fn print_summary(
    format: OutputFormat,
    root: &Path,
    result: &BatchResult,
    saved: Option<&Path>,
    log_path: Option<&Path>,
) -> Result<()> {
    match format {
        OutputFormat::Text => {
            if let Some(path) = saved {
                tracing::info!("updated sheet: {}", path.display());
            }
            if let Some(log_path) = log_path {
                tracing::info!("log: {}", log_path.display());
            }
        }
        OutputFormat::Json => {
            let report = serde_json::json!({
                "root": root,
                "counters": result.counters,
                "placed": result.placed,
                "sheet": saved,
                "log": log_path,
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }
    Ok(())
}

fn detect_mode(table: &Path) -> Option<Mode> {
    table.file_name().and_then(|n| n.to_str()).and_then(Mode::detect_from_name)
}

/// `now` becomes the local time as `HHMMSS`; anything else is kept.
fn expand_batch_tag(tag: &str) -> String {
    if tag.trim().eq_ignore_ascii_case("now") {
        chrono::Local::now().format("%H%M%S").to_string()
    } else {
        tag.to_string()
    }
}

/// Byte multipliers for `--min-bytes`, longest suffix first.
const SIZE_SUFFIXES: [(&str, u64); 5] = [("MB", 1024 * 1024), ("M", 1024 * 1024), ("KB", 1024), ("K", 1024), ("B", 1)];

/// Parse a byte count with an optional `B`, `KB` or `MB` suffix.
fn parse_size(s: &str) -> Result<u64> {
    let s = s.trim().to_ascii_uppercase();
    let (digits, multiplier) = SIZE_SUFFIXES
        .iter()
        .find_map(|&(suffix, multiplier)| s.strip_suffix(suffix).map(|rest| (rest.trim_end(), multiplier)))
        .unwrap_or((s.as_str(), 1));
    let count: u64 = digits.parse().wrap_err_with(|| format!("not a byte count: {s}"))?;
    count
        .checked_mul(multiplier)
        .ok_or_else(|| eyre!("byte count too large: {s}"))
}
