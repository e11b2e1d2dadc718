/*!
 * Monitoring Module
 * Structured tracing setup and timed pipeline spans
 */

pub mod tracer;

pub use tracer::{init_tracing, PipelineSpan};
