/*!
 * Allocation Planner
 *
 * Resolves how many bytes a run allocates from one of two intents:
 *
 * - **Absolute**: `alloc_mb > 0` allocates exactly that many megabytes,
 *   whatever the host currently reports as free.
 * - **Remain-free**: otherwise the target is the distance between current
 *   free memory and the threshold (`remain_free_mb`, or 50 MB when not
 *   positive).
 *
 * ## Known quirk
 *
 * The remain-free distance is an absolute value. A host that is already
 * below the threshold still gets a positive target equal to the shortfall
 * (30 MB free, 50 MB threshold → allocate 20 MB) instead of a no-op.
 *
 * All arithmetic saturates at `i64::MAX`.
 */

use super::types::{AllocationIntent, AllocationPlan};
use crate::core::limits::{BYTES_PER_MB, DEFAULT_REMAIN_FREE_MB};
use crate::core::types::{Bytes, Megabytes};

/// Megabytes to bytes, saturating
#[inline]
pub fn mb_to_bytes(mb: Megabytes) -> Bytes {
    mb.saturating_mul(BYTES_PER_MB)
}

/// Compute the allocation plan for one run
pub fn plan(intent: AllocationIntent, free_before: Bytes) -> AllocationPlan {
    if intent.alloc_mb > 0 {
        return AllocationPlan::absolute(mb_to_bytes(intent.alloc_mb));
    }

    let remain_free_mb = if intent.remain_free_mb <= 0 {
        DEFAULT_REMAIN_FREE_MB
    } else {
        intent.remain_free_mb
    };
    let threshold = mb_to_bytes(remain_free_mb);
    let distance = Bytes::try_from(free_before.abs_diff(threshold)).unwrap_or(Bytes::MAX);

    AllocationPlan::remain_free(distance, threshold)
}
