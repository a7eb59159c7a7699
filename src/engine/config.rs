/*!
 * Probe Configuration
 *
 * Resolved settings for one run. The front end builds this after
 * validating arguments; library callers can start from a preset.
 */

use crate::core::limits::DEFAULT_PROGRESS_EVERY;
use crate::core::types::Megabytes;
use crate::memory::types::{AllocationIntent, ChunkSize, CommitMode, MemoryMetric};
use serde::Serialize;
use std::time::Duration;

/// Probe configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProbeConfig {
    /// Planner inputs
    pub intent: AllocationIntent,
    /// Size of each retained chunk
    pub chunk_size: ChunkSize,
    /// Whether chunks are written after allocation
    pub commit: CommitMode,
    /// Which OS reading counts as free memory
    pub metric: MemoryMetric,
    /// Info-level progress line every N chunks (0 disables)
    pub progress_every: u64,
    /// Pause between reclaim and the final sample
    pub settle: Duration,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            intent: AllocationIntent::default(),
            chunk_size: ChunkSize::Mebibyte,
            commit: CommitMode::Touch,
            metric: MemoryMetric::Free,
            progress_every: DEFAULT_PROGRESS_EVERY,
            settle: Duration::ZERO,
        }
    }
}

impl ProbeConfig {
    /// Allocate a fixed number of megabytes
    pub fn allocate(mb: Megabytes) -> Self {
        Self {
            intent: AllocationIntent::allocate(mb),
            ..Self::default()
        }
    }

    /// Allocate until `mb` megabytes remain free
    pub fn remain_free(mb: Megabytes) -> Self {
        Self {
            intent: AllocationIntent::remain_free(mb),
            ..Self::default()
        }
    }

    pub fn with_chunk_size(mut self, chunk_size: ChunkSize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    pub fn with_commit(mut self, commit: CommitMode) -> Self {
        self.commit = commit;
        self
    }

    pub fn with_metric(mut self, metric: MemoryMetric) -> Self {
        self.metric = metric;
        self
    }

    pub fn with_progress_every(mut self, chunks: u64) -> Self {
        self.progress_every = chunks;
        self
    }

    pub fn with_settle(mut self, settle: Duration) -> Self {
        self.settle = settle;
        self
    }
}
