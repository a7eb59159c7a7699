/*!
 * Oversell Probe Library
 *
 * Allocates a planned amount of memory, watches how the OS-reported free
 * memory responds, and reports the gap between the two. A large gap points
 * at a host that oversells memory.
 */

pub mod cli;
pub mod core;
pub mod engine;
pub mod memory;
pub mod monitoring;

// Re-exports
pub use crate::core::{format_memory, Bytes, ConfigError, Megabytes, ProbeError, ProbeResult};
pub use engine::{Engine, Phase, ProbeConfig, ProbeReport};
pub use memory::{
    plan, AllocationIntent, AllocationMode, AllocationPlan, ChunkSize, CommitMode,
    FreeMemorySensor, MemoryMetric, OsReclaimer, Reclaimer, RetainedMemoryPool, SystemSensor,
};
pub use monitoring::{init_tracing, EventLog, ProbeEvent, ProbeObserver, TracingObserver};
