/*!
 * Ring Module
 * Bounded blocking ring buffer shared by writers and a draining reader
 */

pub mod buffer;
pub mod types;

// Re-export public API
pub use buffer::BoundedRingBuffer;
pub use types::RingStats;
