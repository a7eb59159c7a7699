/*!
 * Engine Run Tests
 * Full probe runs against scripted sensors and reclaimers
 */

use mockall::{mock, Sequence};
use oversell_probe::core::limits::BYTES_PER_MB;
use oversell_probe::memory::{ReclaimOutcome, SamplePoint};
use oversell_probe::{
    AllocationMode, Bytes, ChunkSize, CommitMode, Engine, EventLog, FreeMemorySensor, ProbeConfig,
    ProbeEvent, Reclaimer,
};
use pretty_assertions::assert_eq;
use std::num::NonZeroUsize;

const MB: Bytes = BYTES_PER_MB;
const PAGE: usize = 4096;

mock! {
    pub Sensor {}
    impl FreeMemorySensor for Sensor {
        fn free_memory_bytes(&mut self) -> Bytes;
    }
}

mock! {
    pub Reclaim {}
    impl Reclaimer for Reclaim {
        fn force_reclaim(&mut self) -> ReclaimOutcome;
    }
}

/// Sensor returning `readings` in order, one per sample
fn scripted_sensor(readings: &[Bytes]) -> MockSensor {
    let mut sensor = MockSensor::new();
    let mut seq = Sequence::new();
    for &value in readings {
        sensor
            .expect_free_memory_bytes()
            .times(1)
            .in_sequence(&mut seq)
            .return_const(value);
    }
    sensor
}

fn reclaimer_called_once() -> MockReclaim {
    let mut reclaimer = MockReclaim::new();
    reclaimer
        .expect_force_reclaim()
        .times(1)
        .return_const(ReclaimOutcome::Trimmed);
    reclaimer
}

fn engine(
    config: ProbeConfig,
    readings: &[Bytes],
) -> Engine<MockSensor, MockReclaim, EventLog> {
    Engine::new(
        config.with_commit(CommitMode::Reserve),
        scripted_sensor(readings),
        reclaimer_called_once(),
        EventLog::new(),
    )
    .with_page_size(PAGE)
}

#[test]
fn test_absolute_hundred_megabytes() {
    let mut engine = engine(ProbeConfig::allocate(100), &[2000 * MB, 1900 * MB, 1998 * MB]);
    let report = engine.run().unwrap();

    assert_eq!(report.plan.mode(), AllocationMode::Absolute);
    assert_eq!(report.plan.target_bytes(), 104_857_600);
    assert_eq!(report.chunk_size, 1 << 20);
    assert_eq!(report.chunks_allocated, 100);
    assert_eq!(report.total_allocated(), 104_857_600);
    assert_eq!(report.released.chunks, 100);
    assert_eq!(report.pool_bytes_after_release, 0);
    assert_eq!(report.measurement.observed_delta, 100 * MB);
    assert_eq!(report.calculation_error(), 0);
    assert_eq!(report.reclaim.returned, 98 * MB);
    assert_eq!(report.reclaim.residual, 2 * MB);
    assert_eq!(report.reclaim.outcome, ReclaimOutcome::Trimmed);
}

#[test]
fn test_remain_free_allocates_down_to_threshold() {
    let mut engine = engine(ProbeConfig::remain_free(0), &[500 * MB, 50 * MB, 500 * MB]);
    let report = engine.run().unwrap();

    assert_eq!(report.plan.mode(), AllocationMode::RemainFree);
    assert_eq!(report.plan.threshold_bytes(), Some(50 * MB));
    assert_eq!(report.plan.target_bytes(), 450 * MB);
    assert_eq!(report.chunks_allocated, 450);
    assert_eq!(report.calculation_error(), 0);
}

#[test]
fn test_remain_free_below_threshold_allocates_shortfall() {
    // 30 MB free against the default 50 MB threshold
    let mut engine = engine(ProbeConfig::remain_free(0), &[30 * MB, 10 * MB, 30 * MB]);
    let report = engine.run().unwrap();

    assert_eq!(report.plan.threshold_bytes(), Some(50 * MB));
    assert_eq!(report.plan.target_bytes(), 20 * MB);
    assert_eq!(report.chunks_allocated, 20);
}

#[test]
fn test_calculation_error_when_host_hides_allocation() {
    let mut engine = engine(ProbeConfig::allocate(100), &[500 * MB, 480 * MB, 500 * MB]);
    let report = engine.run().unwrap();

    assert_eq!(report.measurement.observed_delta, 20 * MB);
    assert_eq!(report.calculation_error(), 80 * MB);
}

#[test]
fn test_overshoot_is_less_than_one_chunk() {
    let chunk = ChunkSize::Pages(NonZeroUsize::new(7).unwrap());
    for mb in [1, 3, 10] {
        let mut engine = engine(
            ProbeConfig::allocate(mb).with_chunk_size(chunk),
            &[500 * MB, 400 * MB, 500 * MB],
        );
        let report = engine.run().unwrap();

        let target = report.plan.target_bytes();
        let chunk_bytes = (7 * PAGE) as Bytes;
        assert!(report.total_allocated() >= target);
        assert!(report.total_allocated() < target + chunk_bytes);
        assert_eq!(report.overshoot, report.total_allocated() - target);
    }
}

#[test]
fn test_samples_bracket_allocation_and_release() {
    let mut engine = engine(ProbeConfig::allocate(4), &[500 * MB, 496 * MB, 500 * MB]);
    let report = engine.run().unwrap();
    let log = engine.observer();

    let names = log.names();
    let first_chunk = names.iter().position(|n| *n == "chunk_allocated").unwrap();
    let last_chunk = names.iter().rposition(|n| *n == "chunk_allocated").unwrap();
    let sample_positions: Vec<usize> = names
        .iter()
        .enumerate()
        .filter(|(_, n)| **n == "sampled")
        .map(|(i, _)| i)
        .collect();

    assert_eq!(sample_positions.len(), 3);
    assert!(sample_positions[0] < first_chunk);
    assert!(sample_positions[1] > last_chunk);
    assert!(sample_positions[2] > names.iter().position(|n| *n == "measured").unwrap());
    assert_eq!(names.last(), Some(&"completed"));

    assert_eq!(report.before.point, SamplePoint::BeforeAllocation);
    assert_eq!(report.after.point, SamplePoint::AfterAllocation);
    assert_eq!(report.after_release.point, SamplePoint::AfterRelease);
    assert!(report.before.taken_at <= report.after.taken_at);
    assert!(report.after.taken_at <= report.after_release.taken_at);
}

#[test]
fn test_chunk_progress_is_cumulative() {
    let mut engine = engine(ProbeConfig::allocate(5), &[500 * MB, 495 * MB, 500 * MB]);
    engine.run().unwrap();

    let totals: Vec<(u64, Bytes)> = engine
        .observer()
        .chunk_events()
        .map(|e| match e {
            ProbeEvent::ChunkAllocated {
                index,
                total_allocated,
                ..
            } => (*index, *total_allocated),
            other => panic!("unexpected event {:?}", other),
        })
        .collect();

    assert_eq!(
        totals,
        (1..=5).map(|i| (i as u64, i * MB)).collect::<Vec<_>>()
    );
}

#[test]
fn test_latency_histogram_counts_every_chunk() {
    let mut engine = engine(ProbeConfig::allocate(12), &[500 * MB, 488 * MB, 500 * MB]);
    let report = engine.run().unwrap();

    assert_eq!(report.chunk_latency.samples, 12);
    assert!(report.chunk_latency.p50_us <= report.chunk_latency.max_us);
    assert!(report.throughput_us_per_gib.is_some());
}

#[test]
fn test_report_serializes() {
    let mut engine = engine(ProbeConfig::allocate(1), &[500 * MB, 499 * MB, 500 * MB]);
    let report = engine.run().unwrap();

    let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
    assert_eq!(json["chunks_allocated"], 1);
    assert_eq!(json["measurement"]["total_allocated"], MB);
    assert_eq!(json["plan"]["mode"], "absolute");
    assert_eq!(json["before"]["point"], "before_allocation");
    assert_eq!(json["run_id"], report.run_id.to_string());
}
