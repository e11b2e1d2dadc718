/*!
 * Sync Pipelines Library
 *
 * Two concurrent data structures and the producer/consumer protocols built
 * on them:
 * - `OrderedRegistry`: coarse-locked, tag-ordered registry
 * - `BoundedRingBuffer`: blocking ring buffer with atomic drain-all
 * - `AckPipeline`: worker pool acknowledging items through the registry
 * - `SensorPipeline`: generator pool feeding a periodically drained buffer
 */

pub mod core;
pub mod monitoring;
pub mod pipeline;
pub mod registry;
pub mod ring;

// Re-exports
pub use crate::core::errors::*;
pub use crate::core::{AckConfig, SensorConfig};
pub use monitoring::init_tracing;
pub use pipeline::{
    AckPipeline, AckReport, AckVerdict, Report, RunningSensors, SensorEvent, SensorPipeline,
    SensorSummary, TemperatureSource, UniformTemperature,
};
pub use registry::OrderedRegistry;
pub use ring::{BoundedRingBuffer, RingStats};
