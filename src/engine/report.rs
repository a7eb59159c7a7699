/*!
 * Probe Report
 * Deltas, calculation error, throughput and chunk latency for one run
 */

use crate::core::limits::BYTES_PER_GB;
use crate::core::types::{Bytes, Micros};
use crate::memory::types::{
    AllocationPlan, CommitMode, MemoryMetric, MemorySample, ReclaimOutcome, ReleaseStats,
};
use hdrhistogram::Histogram;
use serde::Serialize;
use std::time::Duration;
use uuid::Uuid;

/// Allocation versus what the OS reported
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Measurement {
    /// Bytes held by the pool
    pub total_allocated: Bytes,
    /// Drop in reported free memory (`before - after`)
    pub observed_delta: Bytes,
    /// `|total_allocated - observed_delta|`
    pub calculation_error: Bytes,
}

impl Measurement {
    pub fn compute(total_allocated: Bytes, before: &MemorySample, after: &MemorySample) -> Self {
        let observed_delta = before.free_bytes.saturating_sub(after.free_bytes);
        let calculation_error =
            Bytes::try_from(total_allocated.abs_diff(observed_delta)).unwrap_or(Bytes::MAX);
        Self {
            total_allocated,
            observed_delta,
            calculation_error,
        }
    }
}

/// How much memory came back after release
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReclaimSummary {
    /// `after_release - after`: memory returned to the OS
    pub returned: Bytes,
    /// `before - after_release`: memory still missing, ideally about zero
    pub residual: Bytes,
    pub outcome: ReclaimOutcome,
}

impl ReclaimSummary {
    pub fn compute(
        before: &MemorySample,
        after: &MemorySample,
        after_release: &MemorySample,
        outcome: ReclaimOutcome,
    ) -> Self {
        Self {
            returned: after_release.free_bytes.saturating_sub(after.free_bytes),
            residual: before.free_bytes.saturating_sub(after_release.free_bytes),
            outcome,
        }
    }
}

/// Chunk allocation latency percentiles in microseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct LatencySummary {
    pub samples: u64,
    pub p50_us: Micros,
    pub p95_us: Micros,
    pub p99_us: Micros,
    pub p999_us: Micros,
    pub max_us: Micros,
}

impl LatencySummary {
    pub fn from_histogram(histogram: &Histogram<u64>) -> Self {
        if histogram.is_empty() {
            return Self::default();
        }
        Self {
            samples: histogram.len(),
            p50_us: histogram.value_at_percentile(50.0),
            p95_us: histogram.value_at_percentile(95.0),
            p99_us: histogram.value_at_percentile(99.0),
            p999_us: histogram.value_at_percentile(99.9),
            max_us: histogram.max(),
        }
    }
}

/// Microseconds spent per GiB allocated; `None` when nothing was allocated
pub fn throughput_us_per_gib(duration: Duration, total_allocated: Bytes) -> Option<f64> {
    if total_allocated <= 0 {
        return None;
    }
    let gib = total_allocated as f64 / BYTES_PER_GB as f64;
    Some(duration.as_micros() as f64 / gib)
}

/// Everything one run measured
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProbeReport {
    pub run_id: Uuid,
    pub plan: AllocationPlan,
    pub page_size: usize,
    pub chunk_size: usize,
    pub commit: CommitMode,
    pub metric: MemoryMetric,
    pub chunks_allocated: usize,
    /// Bytes past the target allocated by the last chunk
    pub overshoot: Bytes,
    /// Pool size right after the release phase; always zero
    pub pool_bytes_after_release: Bytes,
    pub before: MemorySample,
    pub after: MemorySample,
    pub after_release: MemorySample,
    pub measurement: Measurement,
    pub released: ReleaseStats,
    pub reclaim: ReclaimSummary,
    pub allocation_duration_us: Micros,
    pub throughput_us_per_gib: Option<f64>,
    pub chunk_latency: LatencySummary,
}

impl ProbeReport {
    /// Bytes the run allocated
    pub fn total_allocated(&self) -> Bytes {
        self.measurement.total_allocated
    }

    pub fn calculation_error(&self) -> Bytes {
        self.measurement.calculation_error
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
