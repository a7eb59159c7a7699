/*!
 * System Memory Sensor
 * Free-memory readings and page size from the host OS
 */

use super::traits::FreeMemorySensor;
use super::types::MemoryMetric;
use crate::core::errors::{ProbeError, ProbeResult};
use crate::core::types::{bytes_from_u64, Bytes};
use nix::unistd::{sysconf, SysconfVar};
use sysinfo::System;

/// Reads free memory through `sysinfo`, refreshing on every read
pub struct SystemSensor {
    system: System,
    metric: MemoryMetric,
}

impl SystemSensor {
    pub fn new(metric: MemoryMetric) -> Self {
        Self {
            system: System::new(),
            metric,
        }
    }

    pub fn metric(&self) -> MemoryMetric {
        self.metric
    }
}

impl Default for SystemSensor {
    fn default() -> Self {
        Self::new(MemoryMetric::default())
    }
}

impl FreeMemorySensor for SystemSensor {
    fn free_memory_bytes(&mut self) -> Bytes {
        self.system.refresh_memory();
        let raw = match self.metric {
            MemoryMetric::Free => self.system.free_memory(),
            MemoryMetric::Available => self.system.available_memory(),
        };
        bytes_from_u64(raw)
    }
}

/// OS page size in bytes
pub fn page_size() -> ProbeResult<usize> {
    match sysconf(SysconfVar::PAGE_SIZE) {
        Ok(Some(size)) if size > 0 => {
            usize::try_from(size).map_err(|e| ProbeError::PageSize(e.to_string()))
        }
        Ok(_) => Err(ProbeError::PageSize("sysconf returned no value".into())),
        Err(errno) => Err(ProbeError::PageSize(errno.to_string())),
    }
}
