/*!
 * Tracing Observer
 * Renders probe events as log lines, human-readable sizes alongside raw bytes
 */

use super::events::{ProbeEvent, ProbeObserver};
use crate::core::format::format_memory;
use crate::core::types::bytes_from_usize;
use tracing::{debug, info};

/// Default observer for the binary
#[derive(Debug, Clone)]
pub struct TracingObserver {
    progress_every: u64,
}

impl TracingObserver {
    /// `progress_every` is the info-level progress interval in chunks;
    /// 0 keeps per-chunk progress at debug level only
    pub fn new(progress_every: u64) -> Self {
        Self { progress_every }
    }

    fn is_progress_line(&self, index: u64) -> bool {
        self.progress_every > 0 && index % self.progress_every == 0
    }
}

impl ProbeObserver for TracingObserver {
    fn observe(&mut self, event: &ProbeEvent) {
        match event {
            ProbeEvent::Started { run_id } => {
                info!(run_id = %run_id, "Started");
            }
            ProbeEvent::Planned {
                page_size,
                chunk_size,
                plan,
            } => {
                info!(
                    page_size,
                    chunk_size,
                    mode = %plan.mode(),
                    target_bytes = plan.target_bytes(),
                    "Page size: {}, chunk size: {}, to allocate: {}",
                    format_memory(bytes_from_usize(*page_size)),
                    format_memory(bytes_from_usize(*chunk_size)),
                    format_memory(plan.target_bytes()),
                );
            }
            ProbeEvent::ChunkAllocated {
                index,
                total_allocated,
                duration_us,
            } => {
                if self.is_progress_line(*index) {
                    info!(
                        chunk = index,
                        total_allocated,
                        duration_us,
                        "Allocated {} ({} chunks), last chunk took {}µs",
                        format_memory(*total_allocated),
                        index,
                        duration_us,
                    );
                } else {
                    debug!(chunk = index, total_allocated, duration_us, "chunk allocated");
                }
            }
            ProbeEvent::Sampled { sample } => {
                info!(
                    point = %sample.point,
                    free_bytes = sample.free_bytes,
                    "Free memory {}: {}",
                    sample.point,
                    format_memory(sample.free_bytes),
                );
            }
            ProbeEvent::Measured { measurement } => {
                info!(
                    total_allocated = measurement.total_allocated,
                    observed_delta = measurement.observed_delta,
                    calculation_error = measurement.calculation_error,
                    "Allocated: {}, diff: {}, calculation error: {}",
                    format_memory(measurement.total_allocated),
                    format_memory(measurement.observed_delta),
                    format_memory(measurement.calculation_error),
                );
            }
            ProbeEvent::Released { released, reclaim } => {
                info!(
                    chunks = released.chunks,
                    released_bytes = released.bytes,
                    returned = reclaim.returned,
                    residual = reclaim.residual,
                    reclaim = %reclaim.outcome,
                    "Released RAM, diff: {}, residual: {}",
                    format_memory(reclaim.returned),
                    format_memory(reclaim.residual),
                );
            }
            ProbeEvent::Completed {
                allocation_duration_us,
                throughput_us_per_gib,
                chunk_latency,
            } => {
                match throughput_us_per_gib {
                    Some(rate) => info!(
                        allocation_duration_us,
                        "Total test duration: {}µs, microsecs per Gb: {:.0}",
                        allocation_duration_us,
                        rate,
                    ),
                    None => info!(
                        allocation_duration_us,
                        "Total test duration: {}µs, nothing allocated", allocation_duration_us,
                    ),
                }
                if chunk_latency.samples > 0 {
                    info!(
                        "Chunk latency: p50={}µs p95={}µs p99={}µs p99.9={}µs max={}µs",
                        chunk_latency.p50_us,
                        chunk_latency.p95_us,
                        chunk_latency.p99_us,
                        chunk_latency.p999_us,
                        chunk_latency.max_us,
                    );
                }
            }
        }
    }
}
