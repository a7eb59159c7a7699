/*!
 * Host Memory Tests
 * Real allocations and readings against the running OS
 */

use oversell_probe::core::limits::BYTES_PER_MB;
use oversell_probe::memory::{page_size, SamplePoint};
use oversell_probe::{
    CommitMode, Engine, EventLog, FreeMemorySensor, MemoryMetric, OsReclaimer, ProbeConfig,
    Reclaimer, RetainedMemoryPool, SystemSensor,
};
use pretty_assertions::assert_eq;
use serial_test::serial;

#[test]
fn test_page_size_is_power_of_two() {
    let size = page_size().unwrap();
    assert!(size >= 4096);
    assert!(size.is_power_of_two());
}

#[test]
#[serial]
fn test_sensor_reports_positive_free_memory() {
    for metric in [MemoryMetric::Free, MemoryMetric::Available] {
        let mut sensor = SystemSensor::new(metric);
        let sample = sensor.sample(SamplePoint::BeforeAllocation);
        assert!(sample.free_bytes > 0, "{:?} reading was {}", metric, sample.free_bytes);
        assert_eq!(sample.point, SamplePoint::BeforeAllocation);
    }
}

#[test]
#[serial]
fn test_touched_pool_holds_and_releases() {
    let mut pool = RetainedMemoryPool::with_expected_chunks(1 << 20, CommitMode::Touch, 16);
    for _ in 0..16 {
        pool.allocate_chunk().unwrap();
    }
    assert_eq!(pool.total_bytes(), 16 * BYTES_PER_MB);

    let released = pool.release();
    assert_eq!(released.chunks, 16);
    assert_eq!(pool.total_bytes(), 0);
    assert!(pool.is_released());

    // Best effort; any outcome is acceptable
    let _ = OsReclaimer::new().force_reclaim();
}

#[test]
#[serial]
fn test_small_run_against_host() {
    let mut engine = Engine::new(
        ProbeConfig::allocate(8),
        SystemSensor::new(MemoryMetric::Available),
        OsReclaimer::new(),
        EventLog::new(),
    );
    let report = engine.run().unwrap();

    assert_eq!(report.chunks_allocated, 8);
    assert_eq!(report.total_allocated(), 8 * BYTES_PER_MB);
    assert_eq!(report.released.bytes, 8 * BYTES_PER_MB);
    assert_eq!(report.pool_bytes_after_release, 0);
    assert!(report.calculation_error() >= 0);
    assert_eq!(engine.observer().samples().len(), 3);
}
