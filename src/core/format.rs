/*!
 * Human-Readable Formatting
 */

use super::limits::{BYTES_PER_GB, BYTES_PER_KB, BYTES_PER_MB};
use super::types::Bytes;

/// Render a byte count as `x.xxx Gb`, `x.xxx Mb`, `x.xxx Kb` or a raw count.
///
/// A unit is used only when the value is strictly larger than it, so exactly
/// 1 GiB renders as `1024.000 Mb`. Negative values keep their sign.
pub fn format_memory(bytes: Bytes) -> String {
    let sign = if bytes < 0 { "-" } else { "" };
    let magnitude = bytes.unsigned_abs();

    if magnitude > BYTES_PER_GB as u64 {
        format!("{}{:.3} Gb", sign, magnitude as f64 / BYTES_PER_GB as f64)
    } else if magnitude > BYTES_PER_MB as u64 {
        format!("{}{:.3} Mb", sign, magnitude as f64 / BYTES_PER_MB as f64)
    } else if magnitude > BYTES_PER_KB as u64 {
        format!("{}{:.3} Kb", sign, magnitude as f64 / BYTES_PER_KB as f64)
    } else {
        format!("{}{}", sign, magnitude)
    }
}
