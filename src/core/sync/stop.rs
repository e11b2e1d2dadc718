/*!
 * Stop Signal
 *
 * One-shot cancellation signal shared by a pool of long-running threads.
 * Threads check it at every iteration boundary and sleep on it instead of
 * `thread::sleep`, so triggering the signal also cuts pauses short.
 */

use parking_lot::{Condvar, Mutex};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

struct StopState {
    /// Lock-free fast path for `is_triggered`
    triggered: AtomicBool,
    mutex: Mutex<bool>,
    condvar: Condvar,
}

/// Cloneable handle to a shared stop flag
///
/// # Example
///
/// ```
/// use sync_pipelines::core::sync::StopSignal;
/// use std::time::Duration;
///
/// let stop = StopSignal::new();
/// let observer = stop.clone();
///
/// assert!(!observer.wait_timeout(Duration::from_millis(1)));
/// stop.trigger();
/// assert!(observer.wait_timeout(Duration::from_secs(60)));
/// ```
#[derive(Clone)]
pub struct StopSignal {
    state: Arc<StopState>,
}

impl StopSignal {
    pub fn new() -> Self {
        Self {
            state: Arc::new(StopState {
                triggered: AtomicBool::new(false),
                mutex: Mutex::new(false),
                condvar: Condvar::new(),
            }),
        }
    }

    /// Raise the signal and wake every waiter
    ///
    /// Returns `true` for the call that actually raised it.
    pub fn trigger(&self) -> bool {
        let mut stopped = self.state.mutex.lock();
        if *stopped {
            return false;
        }
        *stopped = true;
        self.state.triggered.store(true, Ordering::Release);
        self.state.condvar.notify_all();
        true
    }

    #[inline]
    pub fn is_triggered(&self) -> bool {
        self.state.triggered.load(Ordering::Acquire)
    }

    /// Sleep for `timeout` unless the signal is raised first
    ///
    /// Returns `true` if the signal is raised.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let mut stopped = self.state.mutex.lock();
        while !*stopped {
            if self
                .state
                .condvar
                .wait_until(&mut stopped, deadline)
                .timed_out()
            {
                break;
            }
        }
        *stopped
    }
}

impl Default for StopSignal {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for StopSignal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StopSignal")
            .field("triggered", &self.is_triggered())
            .finish()
    }
}
