/*!
 * Memory Module
 * Allocation planning, retained chunks and OS memory adapters
 */

pub mod planner;
pub mod pool;
pub mod reclaim;
pub mod sensor;
pub mod traits;
pub mod types;

// Re-export for convenience
pub use planner::{mb_to_bytes, plan};
pub use pool::RetainedMemoryPool;
pub use reclaim::OsReclaimer;
pub use sensor::{page_size, SystemSensor};
pub use traits::*;
pub use types::*;
