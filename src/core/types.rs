/*!
 * Core Types
 * Common types used across the probe
 */

/// Byte count.
///
/// Signed so that deltas between free-memory readings can go either way.
pub type Bytes = i64;

/// Megabyte count as supplied by the operator
pub type Megabytes = i64;

/// Duration in microseconds
pub type Micros = u64;

/// Convert a byte count that fits in memory into the signed byte domain
#[inline]
pub fn bytes_from_usize(value: usize) -> Bytes {
    Bytes::try_from(value).unwrap_or(Bytes::MAX)
}

/// Convert an unsigned OS reading into the signed byte domain
#[inline]
pub fn bytes_from_u64(value: u64) -> Bytes {
    Bytes::try_from(value).unwrap_or(Bytes::MAX)
}

/// Convert a duration into whole microseconds, saturating
#[inline]
pub fn micros(duration: std::time::Duration) -> Micros {
    Micros::try_from(duration.as_micros()).unwrap_or(Micros::MAX)
}
