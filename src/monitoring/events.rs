/*!
 * Probe Events
 *
 * Structured observations a run emits, in order:
 * start, plan, per-chunk progress, three samples, measurement, release,
 * completion.
 */

use crate::core::types::{Bytes, Micros};
use crate::engine::report::{LatencySummary, Measurement, ReclaimSummary};
use crate::memory::types::{AllocationPlan, MemorySample, ReleaseStats};
use serde::Serialize;
use uuid::Uuid;

/// A single observation from a probe run
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ProbeEvent {
    Started {
        run_id: Uuid,
    },
    Planned {
        page_size: usize,
        chunk_size: usize,
        plan: AllocationPlan,
    },
    ChunkAllocated {
        /// 1-based chunk number
        index: u64,
        total_allocated: Bytes,
        duration_us: Micros,
    },
    Sampled {
        sample: MemorySample,
    },
    Measured {
        measurement: Measurement,
    },
    Released {
        released: ReleaseStats,
        reclaim: ReclaimSummary,
    },
    Completed {
        allocation_duration_us: Micros,
        throughput_us_per_gib: Option<f64>,
        chunk_latency: LatencySummary,
    },
}

impl ProbeEvent {
    /// Short event name, matches the serialized tag
    pub fn name(&self) -> &'static str {
        match self {
            ProbeEvent::Started { .. } => "started",
            ProbeEvent::Planned { .. } => "planned",
            ProbeEvent::ChunkAllocated { .. } => "chunk_allocated",
            ProbeEvent::Sampled { .. } => "sampled",
            ProbeEvent::Measured { .. } => "measured",
            ProbeEvent::Released { .. } => "released",
            ProbeEvent::Completed { .. } => "completed",
        }
    }
}

/// Consumer of probe events
pub trait ProbeObserver {
    fn observe(&mut self, event: &ProbeEvent);
}

impl<T: ProbeObserver + ?Sized> ProbeObserver for &mut T {
    fn observe(&mut self, event: &ProbeEvent) {
        (**self).observe(event)
    }
}

/// Observer that keeps every event in memory
#[derive(Debug, Default, Clone)]
pub struct EventLog {
    events: Vec<ProbeEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[ProbeEvent] {
        &self.events
    }

    /// Event names in emission order
    pub fn names(&self) -> Vec<&'static str> {
        self.events.iter().map(ProbeEvent::name).collect()
    }

    /// Per-chunk progress events
    pub fn chunk_events(&self) -> impl Iterator<Item = &ProbeEvent> {
        self.events
            .iter()
            .filter(|e| matches!(e, ProbeEvent::ChunkAllocated { .. }))
    }

    pub fn samples(&self) -> Vec<MemorySample> {
        self.events
            .iter()
            .filter_map(|e| match e {
                ProbeEvent::Sampled { sample } => Some(*sample),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl ProbeObserver for EventLog {
    fn observe(&mut self, event: &ProbeEvent) {
        self.events.push(event.clone());
    }
}
