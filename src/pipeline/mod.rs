/*!
 * Pipeline Module
 *
 * Producer/consumer protocols built on the registry and the ring buffer:
 * - Acknowledgment: worker pool over a static FIFO, tracked in the registry
 * - Sensor: generator pool feeding a periodically drained ring buffer
 */

pub mod ack;
pub mod analysis;
pub mod sensor;
pub mod source;

// Re-export public API
pub use ack::{AckPipeline, AckReport, AckVerdict, WorkerTally};
pub use analysis::{Report, WindowDelta};
pub use sensor::{RunningSensors, SensorEvent, SensorPipeline, SensorSummary};
pub use source::{TemperatureSource, UniformTemperature};
