/*!
 * Memory Types
 * Plans, samples and chunk settings shared by the planner, pool and engine
 */

use crate::core::errors::{ConfigError, ProbeError, ProbeResult};
use crate::core::limits::{DEFAULT_REMAIN_FREE_MB, MEBIBYTE_CHUNK};
use crate::core::types::{Bytes, Megabytes};
use serde::Serialize;
use std::fmt;
use std::num::NonZeroUsize;
use std::str::FromStr;
use time::OffsetDateTime;

/// How the allocation target was derived
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AllocationMode {
    /// Allocate a fixed number of megabytes
    Absolute,
    /// Allocate until only the threshold would remain free
    RemainFree,
}

impl fmt::Display for AllocationMode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AllocationMode::Absolute => write!(f, "absolute"),
            AllocationMode::RemainFree => write!(f, "remain-free"),
        }
    }
}

/// Resolved operator intent handed to the planner.
///
/// At most one field is positive; the front end enforces that.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AllocationIntent {
    pub remain_free_mb: Megabytes,
    pub alloc_mb: Megabytes,
}

impl AllocationIntent {
    /// Allocate exactly `mb` megabytes
    pub const fn allocate(mb: Megabytes) -> Self {
        Self {
            remain_free_mb: 0,
            alloc_mb: mb,
        }
    }

    /// Leave `mb` megabytes free
    pub const fn remain_free(mb: Megabytes) -> Self {
        Self {
            remain_free_mb: mb,
            alloc_mb: 0,
        }
    }
}

impl Default for AllocationIntent {
    fn default() -> Self {
        Self::remain_free(DEFAULT_REMAIN_FREE_MB)
    }
}

/// Byte count a run must allocate. Immutable once planned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AllocationPlan {
    mode: AllocationMode,
    target_bytes: Bytes,
    #[serde(skip_serializing_if = "Option::is_none")]
    threshold_bytes: Option<Bytes>,
}

impl AllocationPlan {
    pub(crate) fn absolute(target_bytes: Bytes) -> Self {
        Self {
            mode: AllocationMode::Absolute,
            target_bytes: target_bytes.max(0),
            threshold_bytes: None,
        }
    }

    pub(crate) fn remain_free(target_bytes: Bytes, threshold_bytes: Bytes) -> Self {
        Self {
            mode: AllocationMode::RemainFree,
            target_bytes: target_bytes.max(0),
            threshold_bytes: Some(threshold_bytes),
        }
    }

    pub fn mode(&self) -> AllocationMode {
        self.mode
    }

    /// Bytes to allocate, never negative
    pub fn target_bytes(&self) -> Bytes {
        self.target_bytes
    }

    /// Free-memory threshold used in remain-free mode
    pub fn threshold_bytes(&self) -> Option<Bytes> {
        self.threshold_bytes
    }

    /// Number of chunks of `chunk_size` needed to cover the target
    pub fn chunks_needed(&self, chunk_size: usize) -> u64 {
        if chunk_size == 0 {
            return 0;
        }
        let target = self.target_bytes.unsigned_abs();
        target.div_ceil(chunk_size as u64)
    }
}

/// Size of each retained chunk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "kind", content = "pages", rename_all = "snake_case")]
pub enum ChunkSize {
    /// 1 MiB
    #[default]
    Mebibyte,
    /// One OS page
    Page,
    /// A multiple of the OS page size
    Pages(NonZeroUsize),
}

impl ChunkSize {
    /// Resolve to a byte count against the OS page size.
    /// A zero page size is rejected for every variant.
    pub fn bytes(&self, page_size: usize) -> ProbeResult<usize> {
        if page_size == 0 {
            return Err(ProbeError::PageSize("page size is zero".into()));
        }
        match self {
            ChunkSize::Mebibyte => Ok(MEBIBYTE_CHUNK),
            ChunkSize::Page => Ok(page_size),
            ChunkSize::Pages(pages) => {
                page_size
                    .checked_mul(pages.get())
                    .ok_or(ProbeError::ChunkOverflow {
                        pages: pages.get(),
                        page_size,
                    })
            }
        }
    }
}

impl fmt::Display for ChunkSize {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ChunkSize::Mebibyte => write!(f, "mib"),
            ChunkSize::Page => write!(f, "page"),
            ChunkSize::Pages(pages) => write!(f, "pages:{}", pages),
        }
    }
}

impl FromStr for ChunkSize {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.trim().to_ascii_lowercase();
        match value.as_str() {
            "mib" | "1mib" => Ok(ChunkSize::Mebibyte),
            "page" => Ok(ChunkSize::Page),
            _ => {
                let count = value
                    .strip_prefix("pages:")
                    .ok_or_else(|| ConfigError::InvalidChunkSize(s.to_string()))?;
                count
                    .parse::<NonZeroUsize>()
                    .map(ChunkSize::Pages)
                    .map_err(|_| ConfigError::InvalidChunkSize(s.to_string()))
            }
        }
    }
}

/// Whether chunk pages are written after allocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum CommitMode {
    /// Fill every byte so the OS must back the pages
    #[default]
    Touch,
    /// Reserve capacity only; pages stay virtual until written
    Reserve,
}

/// Which OS reading the sensor reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum MemoryMetric {
    /// Unused RAM (MemFree)
    #[default]
    Free,
    /// RAM available without swapping, including reclaimable cache (MemAvailable)
    Available,
}

/// Phase boundary at which a sample is taken
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SamplePoint {
    BeforeAllocation,
    AfterAllocation,
    AfterRelease,
}

impl fmt::Display for SamplePoint {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SamplePoint::BeforeAllocation => write!(f, "before allocation"),
            SamplePoint::AfterAllocation => write!(f, "after allocation"),
            SamplePoint::AfterRelease => write!(f, "after release"),
        }
    }
}

/// Point-in-time free-memory reading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MemorySample {
    pub point: SamplePoint,
    pub free_bytes: Bytes,
    #[serde(with = "time::serde::rfc3339")]
    pub taken_at: OffsetDateTime,
}

impl MemorySample {
    pub fn now(point: SamplePoint, free_bytes: Bytes) -> Self {
        Self {
            point,
            free_bytes,
            taken_at: OffsetDateTime::now_utc(),
        }
    }
}

/// Result of asking the allocator to return memory to the OS
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReclaimOutcome {
    /// The allocator released pages back to the OS
    Trimmed,
    /// The allocator had nothing to give back
    NothingToTrim,
    /// No trim hint exists for this allocator; dropping the chunks was all
    Unsupported,
}

impl fmt::Display for ReclaimOutcome {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ReclaimOutcome::Trimmed => write!(f, "trimmed"),
            ReclaimOutcome::NothingToTrim => write!(f, "nothing to trim"),
            ReclaimOutcome::Unsupported => write!(f, "unsupported"),
        }
    }
}

/// What a release freed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ReleaseStats {
    pub chunks: usize,
    pub bytes: Bytes,
}
