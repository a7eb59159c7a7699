/*!
 * Probe Limits and Constants
 *
 * Centralized location for sizes, thresholds and defaults.
 */

use super::types::{Bytes, Megabytes};
use std::time::Duration;

// =============================================================================
// UNITS
// =============================================================================

pub const BYTES_PER_KB: Bytes = 1024;
pub const BYTES_PER_MB: Bytes = 1024 * BYTES_PER_KB;
pub const BYTES_PER_GB: Bytes = 1024 * BYTES_PER_MB;

// =============================================================================
// PLANNER
// =============================================================================

/// Free memory to leave when remain-free mode has no positive threshold
pub const DEFAULT_REMAIN_FREE_MB: Megabytes = 50;

// =============================================================================
// CHUNKS
// =============================================================================

/// Default chunk size (1 MiB)
pub const MEBIBYTE_CHUNK: usize = 1024 * 1024;

/// Upper bound on chunk slots reserved up front in the pool.
/// Larger runs grow the slot vector while allocating.
pub const MAX_PREALLOCATED_CHUNKS: usize = 1 << 20;

/// Byte written into committed chunks.
/// Non-zero so the allocator cannot hand out lazily zeroed pages instead.
pub const CHUNK_FILL_BYTE: u8 = 0xA5;

// =============================================================================
// RECLAIM
// =============================================================================

/// Padding left at the top of the heap when trimming
pub const MALLOC_TRIM_PAD: usize = 0;

// =============================================================================
// OBSERVABILITY
// =============================================================================

/// Info-level progress line every N chunks
pub const DEFAULT_PROGRESS_EVERY: u64 = 100;

/// A free-memory read slower than this is reported as a warning.
/// Usually means the host is swapping.
pub const SLOW_SAMPLE_THRESHOLD: Duration = Duration::from_millis(100);

/// Significant figures kept by the chunk latency histogram
pub const LATENCY_SIGFIG: u8 = 3;
