/*!
 * Memory Traits
 * Seams between the engine and the operating system
 */

use super::types::{MemorySample, ReclaimOutcome, SamplePoint};
use crate::core::types::Bytes;

/// OS free-memory sensor.
///
/// Reads are synchronous, cheap and trusted. Reading never changes the
/// allocation state of the run.
pub trait FreeMemorySensor {
    /// Current OS-reported free memory in bytes
    fn free_memory_bytes(&mut self) -> Bytes;

    /// Take a timestamped sample at a phase boundary
    fn sample(&mut self, point: SamplePoint) -> MemorySample {
        MemorySample::now(point, self.free_memory_bytes())
    }
}

/// Returns unreferenced memory to the OS.
///
/// Must finish before returning so the next sample sees its effect.
pub trait Reclaimer {
    fn force_reclaim(&mut self) -> ReclaimOutcome;
}

impl<T: FreeMemorySensor + ?Sized> FreeMemorySensor for &mut T {
    fn free_memory_bytes(&mut self) -> Bytes {
        (**self).free_memory_bytes()
    }

    fn sample(&mut self, point: SamplePoint) -> MemorySample {
        (**self).sample(point)
    }
}

impl<T: Reclaimer + ?Sized> Reclaimer for &mut T {
    fn force_reclaim(&mut self) -> ReclaimOutcome {
        (**self).force_reclaim()
    }
}
