/*!
 * Planner Property Tests
 * Invariants of the allocation planner over arbitrary inputs
 */

use oversell_probe::core::limits::BYTES_PER_MB;
use oversell_probe::memory::mb_to_bytes;
use oversell_probe::{format_memory, plan, AllocationIntent, AllocationMode, Bytes};
use proptest::prelude::*;

/// Free-memory readings up to 16 TiB
fn arb_free_bytes() -> impl Strategy<Value = Bytes> {
    0i64..(16i64 << 40)
}

/// Megabyte arguments, including zero and negatives
fn arb_megabytes() -> impl Strategy<Value = i64> {
    -1_000i64..1_000_000i64
}

proptest! {
    #[test]
    fn prop_target_never_negative(
        remain_free_mb in arb_megabytes(),
        alloc_mb in arb_megabytes(),
        free in arb_free_bytes(),
    ) {
        let resolved = plan(AllocationIntent { remain_free_mb, alloc_mb }, free);
        prop_assert!(resolved.target_bytes() >= 0);
    }

    #[test]
    fn prop_positive_alloc_ignores_free_memory(
        alloc_mb in 1i64..1_000_000i64,
        free_a in arb_free_bytes(),
        free_b in arb_free_bytes(),
    ) {
        let a = plan(AllocationIntent::allocate(alloc_mb), free_a);
        let b = plan(AllocationIntent::allocate(alloc_mb), free_b);
        prop_assert_eq!(a, b);
        prop_assert_eq!(a.mode(), AllocationMode::Absolute);
        prop_assert_eq!(a.target_bytes(), alloc_mb * BYTES_PER_MB);
    }

    #[test]
    fn prop_remain_free_is_distance_to_threshold(
        remain_free_mb in 1i64..1_000_000i64,
        free in arb_free_bytes(),
    ) {
        let resolved = plan(AllocationIntent::remain_free(remain_free_mb), free);
        let threshold = mb_to_bytes(remain_free_mb);
        prop_assert_eq!(resolved.mode(), AllocationMode::RemainFree);
        prop_assert_eq!(resolved.threshold_bytes(), Some(threshold));
        prop_assert_eq!(resolved.target_bytes(), (free - threshold).abs());
    }

    #[test]
    fn prop_non_positive_remain_free_uses_default(
        remain_free_mb in -1_000i64..=0i64,
        free in arb_free_bytes(),
    ) {
        let resolved = plan(AllocationIntent::remain_free(remain_free_mb), free);
        prop_assert_eq!(resolved.threshold_bytes(), Some(50 * BYTES_PER_MB));
    }

    #[test]
    fn prop_chunks_cover_target(
        alloc_mb in 0i64..100_000i64,
        pages in 1usize..1024usize,
    ) {
        let resolved = plan(AllocationIntent::allocate(alloc_mb), 0);
        let chunk = pages * 4096;
        let chunks = resolved.chunks_needed(chunk) as i64;
        let chunk = chunk as i64;
        prop_assert!(chunks * chunk >= resolved.target_bytes());
        prop_assert!(chunks == 0 || (chunks - 1) * chunk < resolved.target_bytes());
    }

    #[test]
    fn prop_format_keeps_sign(bytes in 1i64..i64::MAX) {
        let positive = format_memory(bytes);
        let negative = format_memory(-bytes);
        prop_assert_eq!(negative, format!("-{}", positive));
    }
}
