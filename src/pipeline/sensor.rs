/*!
 * Sensor Pipeline
 *
 * A fixed pool of generator threads writes timestamped samples into a shared
 * `BoundedRingBuffer`. One report thread wakes once per interval, drains the
 * whole buffer and compiles a `Report` from the snapshot.
 *
 * # Graceful-with-Fallback Shutdown
 *
 * 1. **Preferred:** `join()` waits for the report cycles to run out, then
 *    raises the stop signal, closes the buffer and joins every generator.
 *    `shutdown()` does the same without waiting for the remaining cycles.
 * 2. **Fallback:** dropping `RunningSensors` raises the stop signal and
 *    closes the buffer without joining, and logs a warning.
 *
 * Generators observe the stop signal between readings and pause on it, so
 * they exit within one write of it being raised. Closing the buffer releases
 * any generator blocked on a full buffer.
 */

use super::analysis::Report;
use super::source::{TemperatureSource, UniformTemperature};
use crate::core::config::SensorConfig;
use crate::core::errors::{BufferError, PipelineError, PipelineResult};
use crate::core::sync::StopSignal;
use crate::core::types::Sample;
use crate::monitoring::PipelineSpan;
use crate::ring::BoundedRingBuffer;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tracing::{debug, info, warn};

/// Progress of the report thread, delivered in order
#[derive(Debug, Clone)]
pub enum SensorEvent {
    /// Cycle `cycle` started; its report follows after the interval
    Compiling { cycle: usize },
    /// Report for one cycle
    Report(Report),
}

/// Totals after a joined run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SensorSummary {
    pub reports_compiled: usize,
    /// Samples written by all generators
    pub samples_written: u64,
    /// Samples handed to reports
    pub samples_reported: u64,
    /// Samples still buffered at shutdown
    pub samples_unreported: usize,
}

/// Generator pool plus report thread over one ring buffer
pub struct SensorPipeline {
    config: SensorConfig,
    source: Arc<dyn TemperatureSource>,
}

impl SensorPipeline {
    /// Pipeline with uniformly random readings over the configured range
    pub fn new(config: SensorConfig) -> Self {
        let source = Arc::new(UniformTemperature::new(config.temperature_range()));
        Self::with_source(config, source)
    }

    pub fn with_source(config: SensorConfig, source: Arc<dyn TemperatureSource>) -> Self {
        Self { config, source }
    }

    /// Spawn the report thread and every generator
    pub fn start(self) -> PipelineResult<RunningSensors> {
        self.config.validate()?;
        let buffer = Arc::new(BoundedRingBuffer::new(self.config.capacity)?);
        let stop = StopSignal::new();
        let (events_tx, events_rx) = flume::unbounded();

        info!(
            generators = self.config.generators,
            capacity = self.config.capacity,
            cycles = self.config.cycles,
            interval_ms = self.config.report_interval_ms,
            "Sensor pipeline starting"
        );

        let mut running = RunningSensors {
            buffer: buffer.clone(),
            stop: stop.clone(),
            events: events_rx,
            generators: Vec::with_capacity(self.config.generators),
            reporter: None,
            finished: false,
        };

        let reporter = {
            let config = self.config.clone();
            let buffer = buffer.clone();
            let stop = stop.clone();
            spawn_named("report".to_string(), move || {
                compile_reports(&config, &buffer, &stop, &events_tx)
            })
        };
        match reporter {
            Ok(handle) => running.reporter = Some(handle),
            Err(e) => {
                running.abort();
                return Err(e);
            }
        }

        for sensor in 1..=self.config.generators {
            let name = format!("sensor-{}", sensor);
            let source = self.source.clone();
            let buffer = buffer.clone();
            let stop = stop.clone();
            let period = self.config.generator_period();

            match spawn_named(name.clone(), move || {
                generate(sensor, source.as_ref(), &buffer, &stop, period)
            }) {
                Ok(handle) => running.generators.push((name, handle)),
                Err(e) => {
                    running.abort();
                    return Err(e);
                }
            }
        }

        Ok(running)
    }

    /// Start, feed every event to `on_event`, then join
    pub fn run(self, mut on_event: impl FnMut(SensorEvent)) -> PipelineResult<SensorSummary> {
        let running = self.start()?;
        for event in running.events().iter() {
            on_event(event);
        }
        running.join()
    }
}

/// Handle to a started sensor pipeline
pub struct RunningSensors {
    buffer: Arc<BoundedRingBuffer<Sample>>,
    stop: StopSignal,
    events: flume::Receiver<SensorEvent>,
    generators: Vec<(String, JoinHandle<u64>)>,
    reporter: Option<JoinHandle<PipelineResult<usize>>>,
    /// Set once `join` or `shutdown` took over
    finished: bool,
}

impl RunningSensors {
    /// Report events; the channel disconnects when the report thread exits
    pub fn events(&self) -> &flume::Receiver<SensorEvent> {
        &self.events
    }

    pub fn buffer(&self) -> &Arc<BoundedRingBuffer<Sample>> {
        &self.buffer
    }

    /// Wait for every report cycle, then stop and join the generators
    pub fn join(mut self) -> PipelineResult<SensorSummary> {
        self.finished = true;
        let reports = self.join_reporter();
        self.stop_generators();
        self.finish(reports)
    }

    /// Stop now, skipping any remaining report cycles
    pub fn shutdown(mut self) -> PipelineResult<SensorSummary> {
        self.finished = true;
        info!("Sensor pipeline shutdown requested");
        self.stop_generators();
        let reports = self.join_reporter();
        self.finish(reports)
    }

    fn stop_generators(&self) {
        self.stop.trigger();
        self.buffer.close();
    }

    fn join_reporter(&mut self) -> PipelineResult<usize> {
        match self.reporter.take() {
            Some(handle) => handle
                .join()
                .map_err(|_| PipelineError::WorkerPanicked("report".to_string()))?,
            None => Ok(0),
        }
    }

    fn finish(&mut self, reports: PipelineResult<usize>) -> PipelineResult<SensorSummary> {
        let mut samples_written = 0;
        let mut panicked = None;

        for (name, handle) in self.generators.drain(..) {
            match handle.join() {
                Ok(written) => samples_written += written,
                Err(_) => panicked = Some(name),
            }
        }

        let reports_compiled = reports?;
        if let Some(name) = panicked {
            return Err(PipelineError::WorkerPanicked(name));
        }

        let stats = self.buffer.stats();
        let summary = SensorSummary {
            reports_compiled,
            samples_written,
            samples_reported: stats.drained,
            samples_unreported: stats.buffered,
        };
        info!(?summary, "Sensor pipeline joined");
        Ok(summary)
    }

    /// Tear down after a failed start
    fn abort(&mut self) {
        self.finished = true;
        self.stop_generators();
        let _ = self.join_reporter();
        let _ = self.finish(Ok(0));
    }
}

impl Drop for RunningSensors {
    fn drop(&mut self) {
        if !self.finished {
            warn!("RunningSensors dropped without join() or shutdown(), stopping threads unjoined");
            self.stop_generators();
        }
    }
}

fn spawn_named<T, F>(name: String, f: F) -> PipelineResult<JoinHandle<T>>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    thread::Builder::new()
        .name(name.clone())
        .spawn(f)
        .map_err(|source| PipelineError::Spawn { name, source })
}

/// Generator loop: one reading per period until stopped
fn generate(
    sensor: usize,
    source: &dyn TemperatureSource,
    buffer: &BoundedRingBuffer<Sample>,
    stop: &StopSignal,
    period: std::time::Duration,
) -> u64 {
    let mut written = 0;

    while !stop.is_triggered() {
        let sample = Sample::now(source.read(sensor));
        match buffer.write(sample) {
            Ok(()) => written += 1,
            Err(BufferError::Closed) => break,
            Err(e) => {
                warn!(sensor, error = %e, "Generator write failed");
                break;
            }
        }

        if stop.wait_timeout(period) {
            break;
        }
    }

    debug!(sensor, written, "Generator stopped");
    written
}

/// Report loop: sleep, drain, compile, publish
fn compile_reports(
    config: &SensorConfig,
    buffer: &BoundedRingBuffer<Sample>,
    stop: &StopSignal,
    events: &flume::Sender<SensorEvent>,
) -> PipelineResult<usize> {
    let mut compiled = 0;

    for cycle in 1..=config.cycles {
        // A dropped receiver only means nobody is listening
        let _ = events.send(SensorEvent::Compiling { cycle });

        if stop.wait_timeout(config.report_interval()) {
            debug!(cycle, "Report thread stopped during interval");
            break;
        }

        let span = PipelineSpan::new("report");
        let snapshot = match buffer.drain_all() {
            Ok(snapshot) => snapshot,
            Err(BufferError::Closed) => break,
            Err(e) => return Err(e.into()),
        };

        let report = Report::compile(
            cycle,
            snapshot,
            config.rank_count,
            config.window_width,
            config.utc_offset,
        );
        span.record_items_processed(report.sample_count);
        info!(cycle, samples = report.sample_count, "Report compiled");

        compiled += 1;
        let _ = events.send(SensorEvent::Report(report));
    }

    Ok(compiled)
}
