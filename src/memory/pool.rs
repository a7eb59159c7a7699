/*!
 * Retained Memory Pool
 *
 * Sole owner of every chunk allocated during a run. Chunks stay alive until
 * [`RetainedMemoryPool::release`] so that the post-allocation sample sees
 * all of them.
 *
 * ## Invariants
 *
 * - `total_bytes` only grows while allocating
 * - `total_bytes == len() * chunk_size` at all times
 * - release empties the pool exactly once; later allocations are rejected
 */

use super::types::{CommitMode, ReleaseStats};
use crate::core::errors::{ProbeError, ProbeResult};
use crate::core::limits::{CHUNK_FILL_BYTE, MAX_PREALLOCATED_CHUNKS};
use crate::core::types::{bytes_from_usize, Bytes};
use std::time::{Duration, Instant};

/// Ordered set of fixed-size blocks held for the lifetime of one run
#[derive(Debug)]
pub struct RetainedMemoryPool {
    chunks: Vec<Vec<u8>>,
    chunk_size: usize,
    commit: CommitMode,
    total_bytes: Bytes,
    released: bool,
}

impl RetainedMemoryPool {
    pub fn new(chunk_size: usize, commit: CommitMode) -> Self {
        Self {
            chunks: Vec::new(),
            chunk_size,
            commit,
            total_bytes: 0,
            released: false,
        }
    }

    /// Pool with slots reserved for `expected_chunks`, so growing the slot
    /// vector stays out of the timed allocations
    pub fn with_expected_chunks(chunk_size: usize, commit: CommitMode, expected_chunks: u64) -> Self {
        let slots = usize::try_from(expected_chunks)
            .unwrap_or(usize::MAX)
            .min(MAX_PREALLOCATED_CHUNKS);
        Self {
            chunks: Vec::with_capacity(slots),
            ..Self::new(chunk_size, commit)
        }
    }

    /// Allocate one chunk and take ownership of it.
    ///
    /// Returns how long the allocation itself took. An allocation the
    /// allocator refuses is reported as [`ProbeError::OutOfMemory`].
    pub fn allocate_chunk(&mut self) -> ProbeResult<Duration> {
        if self.released {
            return Err(ProbeError::PoolReleased);
        }

        let started = Instant::now();
        let mut chunk: Vec<u8> = Vec::new();
        chunk
            .try_reserve_exact(self.chunk_size)
            .map_err(|_| ProbeError::OutOfMemory {
                requested: bytes_from_usize(self.chunk_size),
                allocated: self.total_bytes,
                chunks: self.chunks.len(),
            })?;
        if self.commit == CommitMode::Touch {
            chunk.resize(self.chunk_size, CHUNK_FILL_BYTE);
        }
        let elapsed = started.elapsed();

        self.chunks.push(chunk);
        self.total_bytes = self
            .total_bytes
            .saturating_add(bytes_from_usize(self.chunk_size));

        Ok(elapsed)
    }

    /// Drop every chunk. Returns what was freed; a second call frees nothing.
    pub fn release(&mut self) -> ReleaseStats {
        let stats = ReleaseStats {
            chunks: self.chunks.len(),
            bytes: self.total_bytes,
        };

        self.chunks = Vec::new();
        self.total_bytes = 0;
        self.released = true;

        stats
    }

    /// Number of retained chunks
    #[inline]
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Bytes currently retained
    #[inline]
    pub fn total_bytes(&self) -> Bytes {
        self.total_bytes
    }

    #[inline]
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    #[inline]
    pub fn commit(&self) -> CommitMode {
        self.commit
    }

    #[inline]
    pub fn is_released(&self) -> bool {
        self.released
    }
}
