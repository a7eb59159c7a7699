/*!
 * Run Phases
 * Linear state machine for one probe run
 */

use crate::core::errors::{ProbeError, ProbeResult};
use serde::Serialize;
use std::fmt;

/// Phase of a probe run. Runs move forward one step at a time and never
/// branch back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Idle,
    SamplingBefore,
    Allocating,
    SamplingAfter,
    Releasing,
    SamplingFinal,
    Done,
}

impl Phase {
    /// Every phase in run order
    pub const ORDER: [Phase; 7] = [
        Phase::Idle,
        Phase::SamplingBefore,
        Phase::Allocating,
        Phase::SamplingAfter,
        Phase::Releasing,
        Phase::SamplingFinal,
        Phase::Done,
    ];

    /// The only phase that may follow this one
    pub const fn next(self) -> Option<Phase> {
        match self {
            Phase::Idle => Some(Phase::SamplingBefore),
            Phase::SamplingBefore => Some(Phase::Allocating),
            Phase::Allocating => Some(Phase::SamplingAfter),
            Phase::SamplingAfter => Some(Phase::Releasing),
            Phase::Releasing => Some(Phase::SamplingFinal),
            Phase::SamplingFinal => Some(Phase::Done),
            Phase::Done => None,
        }
    }

    /// Move to `to`, rejecting anything but the next phase
    pub fn advance(self, to: Phase) -> ProbeResult<Phase> {
        match self.next() {
            Some(next) if next == to => Ok(to),
            _ => Err(ProbeError::PhaseOrder { from: self, to }),
        }
    }

    pub const fn is_sampling(self) -> bool {
        matches!(
            self,
            Phase::SamplingBefore | Phase::SamplingAfter | Phase::SamplingFinal
        )
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::SamplingBefore => "sampling_before",
            Phase::Allocating => "allocating",
            Phase::SamplingAfter => "sampling_after",
            Phase::Releasing => "releasing",
            Phase::SamplingFinal => "sampling_final",
            Phase::Done => "done",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
