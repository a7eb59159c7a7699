/*!
 * Command-Line Front End
 *
 * Flags for the `oversell-probe` binary and their conversion into a
 * [`ProbeConfig`]. Parsing is handled by clap; cross-flag rules live in
 * [`validation`].
 */

pub mod validation;

pub use validation::validate_selection;

use crate::core::errors::ConfigError;
use crate::core::limits::DEFAULT_PROGRESS_EVERY;
use crate::core::types::Megabytes;
use crate::engine::ProbeConfig;
use crate::memory::types::{ChunkSize, CommitMode, MemoryMetric};
use clap::Parser;
use std::time::Duration;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "oversell-probe",
    version,
    about = "Measure how reported free memory tracks real allocations"
)]
pub struct Cli {
    /// Run the RAM overselling test
    #[arg(long)]
    pub ram: bool,

    /// Megabytes to leave free (0 uses the default of 50)
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    pub remfree: Megabytes,

    /// Megabytes to allocate
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    pub alloc: Megabytes,

    /// Chunk size: mib, page or pages:N
    #[arg(long, default_value = "mib")]
    pub chunk: ChunkSize,

    /// Write every chunk (touch) or only reserve it
    #[arg(long, value_enum, default_value_t = CommitMode::Touch)]
    pub commit: CommitMode,

    /// OS reading used as free memory
    #[arg(long, value_enum, default_value_t = MemoryMetric::Free)]
    pub metric: MemoryMetric,

    /// Info-level progress line every N chunks, 0 to disable
    #[arg(long, default_value_t = DEFAULT_PROGRESS_EVERY)]
    pub progress_every: u64,

    /// Pause after reclaim before the final sample
    #[arg(long, default_value_t = 0)]
    pub settle_ms: u64,

    /// Print the final report as JSON on stdout
    #[arg(long)]
    pub json: bool,
}

/// Validated run options
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOptions {
    pub config: ProbeConfig,
    pub json: bool,
}

impl Cli {
    /// Validate flags and build the run configuration
    pub fn into_options(self) -> Result<RunOptions, ConfigError> {
        let intent = validate_selection(self.ram, self.remfree, self.alloc)?;

        let config = ProbeConfig {
            intent,
            ..ProbeConfig::default()
        }
        .with_chunk_size(self.chunk)
        .with_commit(self.commit)
        .with_metric(self.metric)
        .with_progress_every(self.progress_every)
        .with_settle(Duration::from_millis(self.settle_ms));

        Ok(RunOptions {
            config,
            json: self.json,
        })
    }
}
