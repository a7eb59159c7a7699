/*!
 * Argument Validation
 * Turns raw flag values into a planner intent
 */

use crate::core::errors::ConfigError;
use crate::core::types::Megabytes;
use crate::memory::types::AllocationIntent;

/// Check test selection and mode flags.
///
/// `--ram` must be given. `--remfree` and `--alloc` are exclusive when both
/// are positive; zero or negative values count as "not given" and leave the
/// choice to the planner.
pub fn validate_selection(
    ram: bool,
    remain_free_mb: Megabytes,
    alloc_mb: Megabytes,
) -> Result<AllocationIntent, ConfigError> {
    if !ram {
        return Err(ConfigError::NoTestSelected);
    }
    if remain_free_mb > 0 && alloc_mb > 0 {
        return Err(ConfigError::ConflictingModes {
            remain_free_mb,
            alloc_mb,
        });
    }

    Ok(AllocationIntent {
        remain_free_mb,
        alloc_mb,
    })
}
