/*!
 * Bounded Ring Buffer
 * Fixed-capacity blocking buffer with atomic drain-all reads
 */

use super::types::RingStats;
use crate::core::errors::{BufferError, BufferResult};
use parking_lot::{Condvar, Mutex};
use ringbuf::{traits::*, HeapRb};
use std::time::{Duration, Instant};
use tracing::trace;

struct RingState<T> {
    slots: HeapRb<T>,
    closed: bool,
    written: u64,
    drained: u64,
}

/// Multi-writer ring buffer drained as a whole
///
/// One mutex covers the slots; `not_full` parks writers and `not_empty`
/// parks drainers. A drain copies out every buffered element in write order
/// and frees all slots in the same critical section, so no writer can
/// observe a half-drained buffer.
///
/// # Example
///
/// ```
/// use sync_pipelines::BoundedRingBuffer;
///
/// let buffer = BoundedRingBuffer::new(4).unwrap();
/// buffer.write(1).unwrap();
/// buffer.write(2).unwrap();
/// assert_eq!(buffer.drain_all().unwrap(), vec![1, 2]);
/// assert!(buffer.is_empty());
/// ```
pub struct BoundedRingBuffer<T> {
    state: Mutex<RingState<T>>,
    not_full: Condvar,
    not_empty: Condvar,
    capacity: usize,
}

impl<T> std::fmt::Debug for BoundedRingBuffer<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("BoundedRingBuffer")
            .field("capacity", &self.capacity)
            .field("buffered", &state.slots.occupied_len())
            .field("closed", &state.closed)
            .finish()
    }
}

impl<T> BoundedRingBuffer<T> {
    pub fn new(capacity: usize) -> BufferResult<Self> {
        if capacity == 0 {
            return Err(BufferError::InvalidCapacity(capacity));
        }

        Ok(Self {
            state: Mutex::new(RingState {
                slots: HeapRb::new(capacity),
                closed: false,
                written: 0,
                drained: 0,
            }),
            not_full: Condvar::new(),
            not_empty: Condvar::new(),
            capacity,
        })
    }

    /// Store `item`, blocking while the buffer is full
    pub fn write(&self, item: T) -> BufferResult<()> {
        self.write_inner(item, None)
    }

    /// Store `item`, blocking at most `timeout` while the buffer is full
    pub fn write_timeout(&self, item: T, timeout: Duration) -> BufferResult<()> {
        self.write_inner(item, Some(timeout))
    }

    /// Take every buffered element, blocking while the buffer is empty
    ///
    /// After `close`, remaining elements are still returned; once the buffer
    /// is empty the call fails with `BufferError::Closed`.
    pub fn drain_all(&self) -> BufferResult<Vec<T>> {
        self.drain_inner(None)
    }

    /// Take every buffered element, blocking at most `timeout` while empty
    pub fn drain_all_timeout(&self, timeout: Duration) -> BufferResult<Vec<T>> {
        self.drain_inner(Some(timeout))
    }

    /// Refuse further writes and wake every blocked writer and drainer
    ///
    /// Returns `true` for the call that actually closed the buffer.
    pub fn close(&self) -> bool {
        let mut state = self.state.lock();
        if state.closed {
            return false;
        }
        state.closed = true;
        self.not_full.notify_all();
        self.not_empty.notify_all();
        true
    }

    pub fn is_closed(&self) -> bool {
        self.state.lock().closed
    }

    pub fn len(&self) -> usize {
        self.state.lock().slots.occupied_len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn stats(&self) -> RingStats {
        let state = self.state.lock();
        RingStats {
            capacity: self.capacity,
            buffered: state.slots.occupied_len(),
            written: state.written,
            drained: state.drained,
            closed: state.closed,
        }
    }

    fn write_inner(&self, mut item: T, timeout: Option<Duration>) -> BufferResult<()> {
        let start = Instant::now();
        let mut state = self.state.lock();

        loop {
            if state.closed {
                return Err(BufferError::Closed);
            }

            match state.slots.try_push(item) {
                Ok(()) => break,
                Err(rejected) => {
                    item = rejected;
                    match timeout {
                        None => self.not_full.wait(&mut state),
                        Some(timeout) => {
                            let elapsed = start.elapsed();
                            if elapsed >= timeout {
                                return Err(timed_out(elapsed, timeout));
                            }
                            self.not_full.wait_for(&mut state, timeout - elapsed);
                        }
                    }
                }
            }
        }

        state.written += 1;
        self.not_empty.notify_all();
        Ok(())
    }

    fn drain_inner(&self, timeout: Option<Duration>) -> BufferResult<Vec<T>> {
        let start = Instant::now();
        let mut state = self.state.lock();

        while state.slots.is_empty() {
            if state.closed {
                return Err(BufferError::Closed);
            }
            match timeout {
                None => self.not_empty.wait(&mut state),
                Some(timeout) => {
                    let elapsed = start.elapsed();
                    if elapsed >= timeout {
                        return Err(timed_out(elapsed, timeout));
                    }
                    self.not_empty.wait_for(&mut state, timeout - elapsed);
                }
            }
        }

        let mut drained = Vec::with_capacity(state.slots.occupied_len());
        while let Some(item) = state.slots.try_pop() {
            drained.push(item);
        }
        state.drained += drained.len() as u64;
        self.not_full.notify_all();

        trace!(count = drained.len(), "Ring buffer drained");
        Ok(drained)
    }
}

fn timed_out(elapsed: Duration, timeout: Duration) -> BufferError {
    BufferError::Timeout {
        elapsed_ms: elapsed.as_millis() as u64,
        timeout_ms: timeout.as_millis() as u64,
    }
}
