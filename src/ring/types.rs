/*!
 * Ring Buffer Types
 */

use serde::{Deserialize, Serialize};

/// Ring buffer statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RingStats {
    pub capacity: usize,
    pub buffered: usize,
    /// Total successful writes
    pub written: u64,
    /// Total elements handed out by drains
    pub drained: u64,
    pub closed: bool,
}
