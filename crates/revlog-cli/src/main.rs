//! `revlog` — analyze a vocabulary review export from the terminal.
//!
//! # Usage
//!
//! ```text
//! revlog analyze vocabulary-reviews.json --timezone Asia/Tokyo
//! revlog analyze vocabulary-reviews.json --sort time-to-learn --limit 20
//! revlog --config ~/.config/revlog/config.toml analyze export.json --json
//! ```

mod render;

use std::{
  io::{self, Write},
  path::PathBuf,
};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use revlog_core::{SummaryColumn, analyze, parse_timezone, sort_summaries};
use serde::Deserialize;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "revlog", about = "Statistics for vocabulary review exports")]
struct Args {
  /// Path to a TOML config file (timezone, limit).
  #[arg(short, long, value_name = "FILE")]
  config: Option<PathBuf>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Replay an export and print the problem-word table.
  Analyze(AnalyzeArgs),
}

#[derive(clap::Args, Debug)]
struct AnalyzeArgs {
  /// The exported review log (JSON).
  file: PathBuf,

  /// IANA time zone used for day boundaries (default: UTC).
  #[arg(long, env = "REVLOG_TIMEZONE")]
  timezone: Option<String>,

  /// Print the full analysis as JSON instead of the table.
  #[arg(long)]
  json: bool,

  /// Column to sort the table by.
  #[arg(long, default_value_t = SummaryColumn::Relapses)]
  sort: SummaryColumn,

  /// Sort ascending instead of descending.
  #[arg(long)]
  ascending: bool,

  /// Show at most this many rows.
  #[arg(long)]
  limit: Option<usize>,
}

// ─── Config file ──────────────────────────────────────────────────────────────

/// Shape of the optional TOML config file.
#[derive(Deserialize, Default, Debug)]
struct ConfigFile {
  #[serde(default)]
  timezone: Option<String>,
  #[serde(default)]
  limit:    Option<usize>,
}

fn load_config(path: Option<&PathBuf>) -> Result<ConfigFile> {
  let Some(path) = path else {
    return Ok(ConfigFile::default());
  };
  let raw = std::fs::read_to_string(path)
    .with_context(|| format!("reading config file {}", path.display()))?;
  toml::from_str(&raw).context("parsing config file")
}

// ─── Entry point ──────────────────────────────────────────────────────────────

fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_writer(io::stderr)
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy(),
    )
    .init();

  let args = Args::parse();
  let file_cfg = load_config(args.config.as_ref())?;

  match args.command {
    Command::Analyze(cmd) => run_analyze(cmd, file_cfg),
  }
}

fn run_analyze(cmd: AnalyzeArgs, file_cfg: ConfigFile) -> Result<()> {
  // Flags (and their env fallbacks) override the config file.
  let tz_name = cmd
    .timezone
    .or(file_cfg.timezone)
    .unwrap_or_else(|| "UTC".to_string());
  let tz = parse_timezone(&tz_name)?;
  let limit = cmd.limit.or(file_cfg.limit);

  let log = revlog_export::read_file(&cmd.file)
    .with_context(|| format!("loading {}", cmd.file.display()))?;
  tracing::info!(
    items = log.items.len(),
    unreviewed = log.unreviewed,
    "loaded review log"
  );

  let mut analysis = analyze(&log.items, tz);
  sort_summaries(&mut analysis.items, cmd.sort, !cmd.ascending);
  if let Some(n) = limit {
    analysis.items.truncate(n);
  }

  let stdout = io::stdout();
  let mut out = stdout.lock();
  if cmd.json {
    writeln!(out, "{}", analysis.to_json_pretty()?)?;
  } else {
    render::write_overview(&mut out, &analysis)?;
    render::write_table(&mut out, &analysis.items)?;
  }
  Ok(())
}
