/*!
 * Acknowledge - Entry Point
 *
 * Runs the acknowledgment pipeline once over the configured item count and
 * prints whether every item was acknowledged exactly once.
 */

use anyhow::Context;
use sync_pipelines::{init_tracing, AckConfig, AckPipeline};
use tracing::error;

fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = AckConfig::from_env().context("Failed to load acknowledgment config")?;
    let report = AckPipeline::new(config)
        .run()
        .context("Acknowledgment pipeline failed")?;

    let verdict = report.verdict();
    if !verdict.is_consistent() {
        error!(
            submitted = report.submitted,
            acknowledged = report.acknowledged(),
            "Acknowledgment count does not match submitted items"
        );
    }

    println!("{}", verdict);
    Ok(())
}
