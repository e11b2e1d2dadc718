/*!
 * Sensors - Entry Point
 *
 * Runs the sensor pipeline for the configured number of report cycles,
 * printing each report as it is compiled, then stops and joins every
 * generator before exiting.
 */

use anyhow::Context;
use sync_pipelines::{init_tracing, SensorConfig, SensorEvent, SensorPipeline};
use tracing::info;

fn main() -> anyhow::Result<()> {
    init_tracing();

    // The local offset is only available while the process is single-threaded
    let config = SensorConfig::from_env()
        .context("Failed to load sensor config")?
        .with_local_offset();

    let summary = SensorPipeline::new(config)
        .run(|event| match event {
            SensorEvent::Compiling { cycle } => println!("Compiling report {}....", cycle),
            SensorEvent::Report(report) => print!("{}", report),
        })
        .context("Sensor pipeline failed")?;

    info!(
        reports = summary.reports_compiled,
        written = summary.samples_written,
        unreported = summary.samples_unreported,
        "All generators joined"
    );
    Ok(())
}
