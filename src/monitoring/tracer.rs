/*!
 * Structured Tracing
 * Subscriber setup and per-phase spans for probe runs
 *
 * Features:
 * - Run ID on every span for correlating repeated runs
 * - JSON-formatted logs for structured parsing
 * - Phase spans that record their duration on close
 * - Slow sensor reads reported as warnings
 */

use crate::core::limits::SLOW_SAMPLE_THRESHOLD;
use crate::core::types::micros;
use crate::engine::Phase;
use crate::memory::types::SamplePoint;
use std::time::{Duration, Instant};
use tracing::span::EnteredSpan;
use tracing::{debug, span, warn, Level, Span};
use tracing_subscriber::{
    fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};
use uuid::Uuid;

/// Initialize structured tracing
///
/// Environment variables:
/// - RUST_LOG: Set log level (default: info)
/// - PROBE_TRACE_JSON: Enable JSON output (default: false)
pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let use_json = std::env::var("PROBE_TRACE_JSON")
        .map(|v| v == "1" || v == "true")
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(env_filter);

    if use_json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_current_span(true)
                    .with_span_list(true)
                    .with_span_events(FmtSpan::CLOSE),
            )
            .init();
        debug!("Structured tracing initialized with JSON output");
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_span_events(FmtSpan::NONE)
                    .compact(),
            )
            .init();
        debug!("Structured tracing initialized");
    }
}

/// Generate a unique run ID
pub fn generate_run_id() -> Uuid {
    Uuid::new_v4()
}

/// Span covering one whole run
pub fn span_run(run_id: Uuid) -> Span {
    span!(Level::INFO, "probe_run", run_id = %run_id)
}

/// Span for one phase of a run. Entered on creation and exited on drop,
/// so everything logged during the phase nests under it.
pub struct PhaseSpan {
    span: EnteredSpan,
    start: Instant,
    phase: Phase,
}

impl PhaseSpan {
    pub fn new(phase: Phase) -> Self {
        let span = span!(
            Level::DEBUG,
            "probe_phase",
            phase = phase.as_str(),
            duration_us = tracing::field::Empty,
        )
        .entered();
        debug!(phase = phase.as_str(), "phase started");

        Self {
            span,
            start: Instant::now(),
            phase,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }
}

impl Drop for PhaseSpan {
    fn drop(&mut self) {
        let duration = self.start.elapsed();
        self.span.record("duration_us", micros(duration));
        debug!(
            phase = self.phase.as_str(),
            duration_us = micros(duration),
            "phase completed"
        );
    }
}

/// Helper to create a phase span
#[inline]
pub fn span_phase(phase: Phase) -> PhaseSpan {
    PhaseSpan::new(phase)
}

/// Warn when a single sensor read took longer than
/// [`SLOW_SAMPLE_THRESHOLD`]. Returns whether it warned.
pub fn warn_if_slow_sample(point: SamplePoint, elapsed: Duration) -> bool {
    if elapsed <= SLOW_SAMPLE_THRESHOLD {
        return false;
    }
    warn!(
        point = %point,
        duration_ms = elapsed.as_millis() as u64,
        slow = true,
        "slow free-memory read, host may be swapping"
    );
    true
}
