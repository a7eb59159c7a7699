/*!
 * Allocation & Measurement Engine
 *
 * Executes one probe run against a free-memory sensor and a reclaimer:
 *
 * ```text
 * Idle → SamplingBefore → Allocating → SamplingAfter → Releasing → SamplingFinal → Done
 * ```
 *
 * The free-memory sample taken before allocation also feeds the planner.
 * Every chunk stays owned by the run's pool until the release phase, so the
 * after-allocation sample sees all of them. Release drops every chunk and
 * then asks the reclaimer to hand memory back before the final sample.
 *
 * A chunk the allocator refuses ends the run with
 * [`ProbeError::OutOfMemory`](crate::core::ProbeError::OutOfMemory); no
 * partial report is produced.
 *
 * Each call to [`Engine::run`] builds a fresh [`RunContext`], so runs are
 * independent and an engine can be run repeatedly.
 */

pub mod config;
pub mod phase;
pub mod report;

pub use config::ProbeConfig;
pub use phase::Phase;
pub use report::{LatencySummary, Measurement, ProbeReport, ReclaimSummary};

use crate::core::errors::ProbeResult;
use crate::core::limits::LATENCY_SIGFIG;
use crate::core::types::{bytes_from_usize, micros, Bytes};
use crate::memory::planner;
use crate::memory::pool::RetainedMemoryPool;
use crate::memory::sensor::page_size;
use crate::memory::traits::{FreeMemorySensor, Reclaimer};
use crate::memory::types::{AllocationPlan, MemorySample, SamplePoint};
use crate::monitoring::events::{ProbeEvent, ProbeObserver};
use crate::monitoring::tracer::{
    generate_run_id, span_phase, span_run, warn_if_slow_sample, PhaseSpan,
};
use hdrhistogram::Histogram;
use std::time::{Duration, Instant};
use uuid::Uuid;

/// Mutable state of a single run. Owned by [`Engine::run`] and dropped
/// when the run ends.
pub struct RunContext {
    run_id: Uuid,
    phase: Phase,
    phase_span: Option<PhaseSpan>,
    pool: RetainedMemoryPool,
    latencies: Histogram<u64>,
}

impl RunContext {
    fn new(run_id: Uuid, pool: RetainedMemoryPool) -> ProbeResult<Self> {
        Ok(Self {
            run_id,
            phase: Phase::Idle,
            phase_span: None,
            pool,
            latencies: Histogram::new(LATENCY_SIGFIG)?,
        })
    }

    /// Step to the next phase, closing the previous phase's span
    fn advance(&mut self, to: Phase) -> ProbeResult<()> {
        self.phase = self.phase.advance(to)?;
        self.phase_span = None;
        if to != Phase::Done {
            self.phase_span = Some(span_phase(to));
        }
        Ok(())
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn pool(&self) -> &RetainedMemoryPool {
        &self.pool
    }
}

/// Probe engine
pub struct Engine<S, R, O> {
    config: ProbeConfig,
    sensor: S,
    reclaimer: R,
    observer: O,
    page_size: Option<usize>,
}

impl<S, R, O> Engine<S, R, O>
where
    S: FreeMemorySensor,
    R: Reclaimer,
    O: ProbeObserver,
{
    pub fn new(config: ProbeConfig, sensor: S, reclaimer: R, observer: O) -> Self {
        Self {
            config,
            sensor,
            reclaimer,
            observer,
            page_size: None,
        }
    }

    /// Use a fixed page size instead of asking the OS
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = Some(page_size);
        self
    }

    pub fn config(&self) -> &ProbeConfig {
        &self.config
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    /// Consume the engine, returning its collaborators
    pub fn into_parts(self) -> (S, R, O) {
        (self.sensor, self.reclaimer, self.observer)
    }

    /// Execute one full run
    pub fn run(&mut self) -> ProbeResult<ProbeReport> {
        let run_id = generate_run_id();
        let run_span = span_run(run_id);
        let _entered = run_span.enter();

        let page_size = match self.page_size {
            Some(size) => size,
            None => page_size()?,
        };
        let chunk_size = self.config.chunk_size.bytes(page_size)?;

        // Pool slots are sized once the plan is known
        let mut ctx = RunContext::new(
            run_id,
            RetainedMemoryPool::new(chunk_size, self.config.commit),
        )?;
        self.observer.observe(&ProbeEvent::Started {
            run_id: ctx.run_id(),
        });

        ctx.advance(Phase::SamplingBefore)?;
        let before = self.take_sample(&ctx, SamplePoint::BeforeAllocation);
        let plan = planner::plan(self.config.intent, before.free_bytes);
        self.observer.observe(&ProbeEvent::Planned {
            page_size,
            chunk_size,
            plan,
        });

        ctx.advance(Phase::Allocating)?;
        let allocation_duration = self.allocate(&mut ctx, &plan)?;
        let total_allocated = ctx.pool.total_bytes();
        let chunks_allocated = ctx.pool.len();

        ctx.advance(Phase::SamplingAfter)?;
        let after = self.take_sample(&ctx, SamplePoint::AfterAllocation);
        let measurement = Measurement::compute(total_allocated, &before, &after);
        self.observer.observe(&ProbeEvent::Measured { measurement });

        ctx.advance(Phase::Releasing)?;
        let released = ctx.pool.release();
        let outcome = self.reclaimer.force_reclaim();
        if !self.config.settle.is_zero() {
            std::thread::sleep(self.config.settle);
        }
        let pool_bytes_after_release = ctx.pool.total_bytes();

        ctx.advance(Phase::SamplingFinal)?;
        let after_release = self.take_sample(&ctx, SamplePoint::AfterRelease);
        let reclaim = ReclaimSummary::compute(&before, &after, &after_release, outcome);
        self.observer
            .observe(&ProbeEvent::Released { released, reclaim });

        ctx.advance(Phase::Done)?;
        let throughput = report::throughput_us_per_gib(allocation_duration, total_allocated);
        let chunk_latency = LatencySummary::from_histogram(&ctx.latencies);
        self.observer.observe(&ProbeEvent::Completed {
            allocation_duration_us: micros(allocation_duration),
            throughput_us_per_gib: throughput,
            chunk_latency,
        });

        Ok(ProbeReport {
            run_id: ctx.run_id(),
            plan,
            page_size,
            chunk_size,
            commit: self.config.commit,
            metric: self.config.metric,
            chunks_allocated,
            overshoot: total_allocated.saturating_sub(plan.target_bytes()),
            pool_bytes_after_release,
            before,
            after,
            after_release,
            measurement,
            released,
            reclaim,
            allocation_duration_us: micros(allocation_duration),
            throughput_us_per_gib: throughput,
            chunk_latency,
        })
    }

    /// Allocate chunks until the plan's target is covered.
    /// Returns total wall-clock time spent in the loop.
    fn allocate(&mut self, ctx: &mut RunContext, plan: &AllocationPlan) -> ProbeResult<Duration> {
        let chunk_size = ctx.pool.chunk_size();
        ctx.pool = RetainedMemoryPool::with_expected_chunks(
            chunk_size,
            ctx.pool.commit(),
            plan.chunks_needed(chunk_size),
        );

        let target: Bytes = plan.target_bytes();
        let started = Instant::now();
        let mut index: u64 = 0;

        while ctx.pool.total_bytes() < target {
            let elapsed = ctx.pool.allocate_chunk()?;
            index += 1;

            let duration_us = micros(elapsed);
            ctx.latencies.saturating_record(duration_us);
            self.observer.observe(&ProbeEvent::ChunkAllocated {
                index,
                total_allocated: ctx.pool.total_bytes(),
                duration_us,
            });
        }

        let elapsed = started.elapsed();
        debug_assert_eq!(
            ctx.pool.total_bytes(),
            bytes_from_usize(ctx.pool.len()).saturating_mul(bytes_from_usize(chunk_size))
        );
        Ok(elapsed)
    }

    /// Read the sensor once. Only the read itself is timed.
    fn take_sample(&mut self, ctx: &RunContext, point: SamplePoint) -> MemorySample {
        debug_assert!(ctx.phase().is_sampling());

        let started = Instant::now();
        let sample = self.sensor.sample(point);
        warn_if_slow_sample(point, started.elapsed());

        self.observer.observe(&ProbeEvent::Sampled { sample });
        sample
    }
}
