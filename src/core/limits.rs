/*!
 * Pipeline Limits and Constants
 *
 * Centralized location for pipeline sizes, periods, and report parameters.
 * Organized by pipeline so each default has exactly one home.
 */

use std::time::Duration;

// =============================================================================
// ACKNOWLEDGMENT PIPELINE
// =============================================================================

/// Worker tasks draining the pending FIFO
pub const DEFAULT_ACK_WORKERS: usize = 4;

/// Items pre-loaded into the pending FIFO before workers start
pub const DEFAULT_PENDING_ITEMS: usize = 500_000;

/// Prefix for worker thread names ("Servant 1", "Servant 2", ...)
pub const ACK_WORKER_PREFIX: &str = "Servant";

// =============================================================================
// SENSOR PIPELINE
// =============================================================================

/// Generator tasks writing samples into the ring buffer
pub const DEFAULT_SENSOR_GENERATORS: usize = 8;

/// Readings each generator is expected to produce per report interval
pub const READINGS_PER_HOUR: usize = 60;

/// Report cycles before the pipeline finishes
pub const DEFAULT_REPORT_CYCLES: usize = 5;

/// Ring buffer capacity: enough for every generator over every cycle
pub const DEFAULT_BUFFER_CAPACITY: usize =
    READINGS_PER_HOUR * DEFAULT_REPORT_CYCLES * DEFAULT_SENSOR_GENERATORS;

/// Pause between report cycles (one simulated "hour")
pub const DEFAULT_REPORT_INTERVAL: Duration = Duration::from_secs(1);

/// Pause between two readings of the same generator
pub const DEFAULT_GENERATOR_PERIOD: Duration = Duration::from_millis(100);

/// Lowest synthesized reading, Fahrenheit
pub const MIN_TEMPERATURE: i32 = -100;

/// Highest synthesized reading, Fahrenheit
pub const MAX_TEMPERATURE: i32 = 70;

/// Entries listed in each of the highest/lowest rankings
pub const RANK_COUNT: usize = 5;

/// Index span of the maximum-delta scan
pub const WINDOW_WIDTH: usize = 10;
