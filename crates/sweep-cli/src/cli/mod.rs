//! CLI for sweep.

mod commands;

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use sweep_core::config::{self, SweepConfig};
use sweep_core::target::{TargetSource, UrlTemplate};

use commands::run_sweep;

/// Fetch every id of the configured range (or replay a retry log) with a fixed worker pool.
#[derive(Debug, Parser)]
#[command(name = "sweep")]
#[command(about = "sweep: bounded concurrent fetcher over a dense ID space", long_about = None)]
pub struct Cli {
    /// Number of concurrent workers (default from config, 10 out of the box).
    #[arg(long, value_name = "N")]
    pub thread: Option<usize>,

    /// Replay this retry log instead of walking the id range. Empty means range mode.
    #[arg(long, value_name = "PATH", default_value = "")]
    pub retry: String,

    /// First id of the range (inclusive).
    #[arg(long, value_name = "ID")]
    pub min: Option<u64>,

    /// Last id of the range (inclusive).
    #[arg(long, value_name = "ID")]
    pub max: Option<u64>,

    /// Config file to use instead of `~/.config/sweep/config.toml`.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Where the summary and download directories are created (default: current directory).
    #[arg(long, value_name = "DIR")]
    pub output_root: Option<PathBuf>,
}

impl Cli {
    pub fn run_from_args() -> Result<()> {
        let cli = Cli::parse();

        let mut cfg = match &cli.config {
            Some(path) => config::load_from_path(path)?,
            None => config::load_or_init()?,
        };
        cli.apply_overrides(&mut cfg);
        cfg.validate().context("invalid configuration")?;
        tracing::debug!("effective config: {:?}", cfg);

        let source = cli.target_source(&cfg)?;
        let output_root = match cli.output_root {
            Some(dir) => dir,
            None => std::env::current_dir().context("current directory")?,
        };
        run_sweep(&cfg, source, output_root)
    }

    /// Command-line values win over the config file.
    pub fn apply_overrides(&self, cfg: &mut SweepConfig) {
        if let Some(n) = self.thread {
            cfg.thread_count = n;
        }
        if let Some(min) = self.min {
            cfg.id_min = min;
        }
        if let Some(max) = self.max {
            cfg.id_max = max;
        }
    }

    /// Replay mode when `--retry` is non-empty, range mode otherwise.
    pub fn target_source(&self, cfg: &SweepConfig) -> Result<TargetSource> {
        if !self.retry.is_empty() {
            return Ok(TargetSource::Replay {
                path: PathBuf::from(&self.retry),
            });
        }
        Ok(TargetSource::Range {
            template: UrlTemplate::parse(&cfg.url_template)?,
            min: cfg.id_min,
            max: cfg.id_max,
        })
    }
}
