/*!
 * Monitoring
 * Probe events, observers and structured tracing
 */

#[cfg(test)]
pub(crate) mod capture;
pub mod events;
pub mod observer;
pub mod tracer;

pub use events::{EventLog, ProbeEvent, ProbeObserver};
pub use observer::TracingObserver;
pub use tracer::{
    generate_run_id, init_tracing, span_phase, span_run, warn_if_slow_sample, PhaseSpan,
};
