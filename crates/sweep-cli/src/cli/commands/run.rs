//! `sweep` – run one sweep and print its summary.

use anyhow::{Context, Result};
use std::path::PathBuf;
use sweep_core::config::SweepConfig;
use sweep_core::coordinator::{self, RunOptions, RunSummary};
use sweep_core::target::TargetSource;

fn print_summary(summary: &RunSummary) {
    println!(
        "{} submitted, {} done, {} failed in {:.1}s",
        summary.submitted, summary.succeeded, summary.failed, summary.elapsed_secs
    );
    println!("  logs:      {}", summary.run_dir.display());
    println!("  artifacts: {}", summary.artifact_dir.display());
    if summary.failed > 0 {
        println!(
            "  replay failures with: sweep --retry {}",
            summary.run_dir.join(sweep_core::outcome::RETRY_LOG).display()
        );
    }
    if summary.panicked_workers > 0 || summary.abandoned > 0 {
        println!(
            "  warning: {} worker(s) panicked, {} target(s) not processed",
            summary.panicked_workers, summary.abandoned
        );
    }
}

pub fn run_sweep(cfg: &SweepConfig, source: TargetSource, output_root: PathBuf) -> Result<()> {
    let opts = RunOptions::from_config(cfg, source, output_root);
    let started = chrono::Local::now().naive_local();
    let summary = coordinator::run(&opts, started).context("run setup failed")?;
    print_summary(&summary);
    Ok(())
}
