/*!
 * Sensor Pipeline Tests
 * End-to-end runs with scripted readings and explicit shutdown
 */

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use sync_pipelines::core::types::Temperature;
use sync_pipelines::{BufferError, SensorConfig, SensorEvent, SensorPipeline};

fn fast_config() -> SensorConfig {
    SensorConfig {
        generators: 4,
        capacity: 256,
        cycles: 2,
        report_interval_ms: 50,
        generator_period_ms: 1,
        ..Default::default()
    }
}

#[test]
fn test_reports_rank_scripted_readings() {
    // Sensor N always reads N * 10
    let source = Arc::new(|sensor: usize| sensor as Temperature * 10);

    let mut reports = Vec::new();
    let summary = SensorPipeline::with_source(fast_config(), source)
        .run(|event| {
            if let SensorEvent::Report(report) = event {
                reports.push(report);
            }
        })
        .unwrap();

    assert_eq!(summary.reports_compiled, 2);
    for report in &reports {
        assert!(report.sample_count >= 4);
        assert_eq!(report.highest[0].temperature(), 40);
        assert_eq!(report.lowest[0].temperature(), 10);
        assert!(report
            .highest
            .windows(2)
            .all(|w| w[0].temperature() >= w[1].temperature()));
        assert!(report
            .lowest
            .windows(2)
            .all(|w| w[0].temperature() <= w[1].temperature()));

        if report.sample_count > 10 {
            let delta = report.largest_delta.expect("window delta");
            assert!(delta.delta <= 30);
            assert_eq!(delta.end_index - delta.start_index, 10);
        }
    }
}

#[test]
fn test_full_buffer_does_not_deadlock_shutdown() {
    // Tiny buffer and a long interval: generators park on a full buffer
    let config = SensorConfig {
        capacity: 4,
        cycles: 10,
        report_interval_ms: 60_000,
        ..fast_config()
    };

    let running = SensorPipeline::new(config).start().unwrap();
    thread::sleep(Duration::from_millis(50));
    assert_eq!(running.buffer().len(), 4);

    let start = Instant::now();
    let summary = running.shutdown().unwrap();
    assert!(start.elapsed() < Duration::from_secs(5));
    assert_eq!(summary.samples_written, 4);
    assert_eq!(summary.samples_unreported, 4);
}

#[test]
fn test_drop_without_join_stops_generators() {
    let running = SensorPipeline::new(fast_config()).start().unwrap();
    let buffer = running.buffer().clone();

    drop(running);
    assert!(buffer.is_closed());
    assert_eq!(
        buffer.write_timeout(
            sync_pipelines::core::types::Sample::now(0),
            Duration::from_millis(10)
        ),
        Err(BufferError::Closed)
    );
}

#[test]
fn test_events_arrive_in_cycle_order() {
    let running = SensorPipeline::new(fast_config()).start().unwrap();

    let events: Vec<String> = running
        .events()
        .iter()
        .map(|event| match event {
            SensorEvent::Compiling { cycle } => format!("compiling {}", cycle),
            SensorEvent::Report(report) => format!("report {}", report.cycle),
        })
        .collect();

    assert_eq!(
        events,
        vec!["compiling 1", "report 1", "compiling 2", "report 2"]
    );
    assert_eq!(running.join().unwrap().reports_compiled, 2);
}
