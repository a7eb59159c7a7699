/*!
 * Oversell Probe - Main Entry Point
 *
 * Runs the RAM overselling test once and exits.
 */

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use oversell_probe::cli::Cli;
use oversell_probe::{init_tracing, Engine, OsReclaimer, SystemSensor, TracingObserver};

#[cfg(feature = "jemalloc")]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

fn main() -> Result<()> {
    let options = match Cli::parse().into_options() {
        Ok(options) => options,
        Err(e) => {
            eprintln!("{:?}", miette::Report::new(e));
            std::process::exit(2);
        }
    };

    init_tracing();

    let config = options.config;
    let sensor = SystemSensor::new(config.metric);
    let observer = TracingObserver::new(config.progress_every);
    let mut engine = Engine::new(config, sensor, OsReclaimer::new(), observer);

    let config = engine.config();
    info!(
        intent = ?config.intent,
        chunk = %config.chunk_size,
        commit = ?config.commit,
        metric = ?config.metric,
        "Oversell probe starting"
    );

    let report = engine.run().context("RAM overselling test failed")?;

    if options.json {
        println!("{}", report.to_json().context("Failed to serialize report")?);
    }

    Ok(())
}
