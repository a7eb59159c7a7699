/*!
 * OS Reclaim
 *
 * Dropping the chunks hands them back to the allocator. Whether the
 * allocator hands them back to the OS is up to it, so this asks glibc to
 * trim its heap. Large chunks served by `mmap` are unmapped on free anyway;
 * the trim covers chunks that landed in an arena.
 */

use super::traits::Reclaimer;
use super::types::ReclaimOutcome;
use tracing::debug;

/// Best-effort allocator trim
#[derive(Debug, Default, Clone, Copy)]
pub struct OsReclaimer;

impl OsReclaimer {
    pub fn new() -> Self {
        Self
    }
}

impl Reclaimer for OsReclaimer {
    fn force_reclaim(&mut self) -> ReclaimOutcome {
        let outcome = trim_heap();
        debug!(outcome = %outcome, "allocator trim requested");
        outcome
    }
}

#[cfg(all(target_os = "linux", target_env = "gnu", not(feature = "jemalloc")))]
fn trim_heap() -> ReclaimOutcome {
    use crate::core::limits::MALLOC_TRIM_PAD;

    // SAFETY: malloc_trim only walks glibc's own arenas and takes no pointers.
    let released = unsafe { libc::malloc_trim(MALLOC_TRIM_PAD) };
    if released == 1 {
        ReclaimOutcome::Trimmed
    } else {
        ReclaimOutcome::NothingToTrim
    }
}

#[cfg(not(all(target_os = "linux", target_env = "gnu", not(feature = "jemalloc"))))]
fn trim_heap() -> ReclaimOutcome {
    ReclaimOutcome::Unsupported
}
