use anyhow::{Context, Result};
use clap::Parser;
use env_logger::Env;
use log::info;
use std::time::Instant;

#[cfg(not(windows))]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use umidedup::metrics::{format_elapsed, records_per_sec};
use umidedup::{Args, run_dedup};

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let start = Instant::now();
    info!(
        "deduplicating {} -> {} (UMIs: {})",
        args.input.display(),
        args.output.display(),
        args.umis.display()
    );

    let counts = run_dedup(&args)
        .with_context(|| format!("failed to deduplicate {}", args.input.display()))?;

    let elapsed = start.elapsed();
    info!(
        "done in {} ({:.0} records/sec), {:.2}% duplication",
        format_elapsed(elapsed),
        records_per_sec(counts.total(), elapsed),
        counts.duplicate_fraction() * 100.0
    );

    println!("{counts}");

    Ok(())
}
