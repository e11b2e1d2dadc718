/*!
 * Acknowledgment Pipeline
 *
 * A fixed pool of workers drains a pre-populated FIFO of items. Each item is
 * registered in the `OrderedRegistry`, acknowledged in a shared log, then
 * removed from the registry again.
 *
 * # Locking
 *
 * The pending FIFO, the acknowledgment log and the registry each own one
 * lock, and no lock is held while another is taken. Workers never block on
 * an empty FIFO: the FIFO is never refilled, so observing it empty means the
 * worker's job is done.
 */

use crate::core::config::AckConfig;
use crate::core::errors::{ConfigError, PipelineError, PipelineResult};
use crate::core::limits::ACK_WORKER_PREFIX;
use crate::core::types::{Acknowledgment, Item, Tag, WorkerName};
use crate::monitoring::PipelineSpan;
use crate::registry::OrderedRegistry;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::{HashSet, VecDeque};
use std::fmt;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tracing::{debug, info, warn};

/// Outcome of comparing the acknowledgment log against the submitted items
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AckVerdict {
    /// One acknowledgment per submitted item
    AllAcknowledged,
    /// Fewer acknowledgments than items
    Missing,
    /// More acknowledgments than items
    Surplus,
}

impl AckVerdict {
    pub fn from_counts(submitted: usize, acknowledged: usize) -> Self {
        match acknowledged.cmp(&submitted) {
            std::cmp::Ordering::Equal => Self::AllAcknowledged,
            std::cmp::Ordering::Less => Self::Missing,
            std::cmp::Ordering::Greater => Self::Surplus,
        }
    }

    #[inline]
    pub fn is_consistent(&self) -> bool {
        matches!(self, Self::AllAcknowledged)
    }
}

impl fmt::Display for AckVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::AllAcknowledged => {
                "All presents have been properly acknowledged with thank you notes."
            }
            Self::Missing => "Oops! More presents than thank you notes.",
            Self::Surplus => "error",
        })
    }
}

/// Items processed by one worker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerTally {
    pub worker: WorkerName,
    pub processed: usize,
}

/// Result of one pipeline run
#[derive(Debug, Clone)]
pub struct AckReport {
    pub submitted: usize,
    /// Log in append order
    pub acknowledgments: Vec<Acknowledgment>,
    pub per_worker: Vec<WorkerTally>,
    /// Items still registered once every worker exited
    pub registry_remaining: usize,
}

impl AckReport {
    #[inline]
    pub fn acknowledged(&self) -> usize {
        self.acknowledgments.len()
    }

    pub fn verdict(&self) -> AckVerdict {
        AckVerdict::from_counts(self.submitted, self.acknowledged())
    }
}

/// State shared by every worker
struct AckShared {
    pending: Mutex<VecDeque<Item>>,
    log: Mutex<Vec<Acknowledgment>>,
    registry: OrderedRegistry,
}

impl AckShared {
    /// Pop under the pending lock only; the guard is released on return
    fn next_pending(&self) -> Option<Item> {
        self.pending.lock().pop_front()
    }

    fn acknowledge(&self, worker: &WorkerName, tag: Tag) {
        self.log.lock().push(Acknowledgment::new(worker.clone(), tag));
    }
}

/// Fixed worker pool over a static FIFO of items
pub struct AckPipeline {
    config: AckConfig,
    submitted: usize,
    shared: Arc<AckShared>,
}

impl AckPipeline {
    /// Pipeline over tags `0..config.items`
    pub fn new(config: AckConfig) -> Self {
        let pending = (0..config.items as Tag).map(Item::new).collect();
        Self::from_pending(config, pending)
    }

    /// Pipeline over caller-supplied items
    ///
    /// Fails with `ConfigError::Invalid` if a tag appears more than once.
    pub fn with_items(
        config: AckConfig,
        items: impl IntoIterator<Item = Item>,
    ) -> PipelineResult<Self> {
        let pending: VecDeque<Item> = items.into_iter().collect();

        let mut seen = HashSet::with_capacity(pending.len());
        if let Some(item) = pending.iter().find(|item| !seen.insert(item.tag)) {
            return Err(ConfigError::Invalid {
                field: "items",
                reason: format!("duplicate tag {}", item.tag),
            }
            .into());
        }

        Ok(Self::from_pending(config, pending))
    }

    fn from_pending(config: AckConfig, pending: VecDeque<Item>) -> Self {
        let submitted = pending.len();

        Self {
            config,
            submitted,
            shared: Arc::new(AckShared {
                log: Mutex::new(Vec::with_capacity(submitted)),
                pending: Mutex::new(pending),
                registry: OrderedRegistry::new(),
            }),
        }
    }

    #[inline]
    pub fn submitted(&self) -> usize {
        self.submitted
    }

    /// Run every worker to completion and collect the log
    pub fn run(self) -> PipelineResult<AckReport> {
        let span = PipelineSpan::new("acknowledge");
        let _entered = span.enter();
        info!(
            workers = self.config.workers,
            items = self.submitted,
            "Acknowledgment pipeline starting"
        );

        let mut handles: Vec<(WorkerName, JoinHandle<usize>)> =
            Vec::with_capacity(self.config.workers);

        for index in 1..=self.config.workers {
            let name: WorkerName = format!("{} {}", ACK_WORKER_PREFIX, index).into();
            let shared = self.shared.clone();
            let worker = name.clone();

            let spawned = thread::Builder::new()
                .name(name.to_string())
                .spawn(move || serve(&worker, &shared));

            match spawned {
                Ok(handle) => handles.push((name, handle)),
                Err(source) => {
                    // Workers already running still drain the FIFO; wait for them
                    join_all(handles)?;
                    return Err(PipelineError::Spawn {
                        name: name.to_string(),
                        source,
                    });
                }
            }
        }

        let per_worker = join_all(handles)?;

        let acknowledgments = std::mem::take(&mut *self.shared.log.lock());
        span.record_items_processed(acknowledgments.len());
        let report = AckReport {
            submitted: self.submitted,
            acknowledgments,
            per_worker,
            registry_remaining: self.shared.registry.len(),
        };

        info!(
            acknowledged = report.acknowledged(),
            submitted = report.submitted,
            verdict = ?report.verdict(),
            "Acknowledgment pipeline finished"
        );
        Ok(report)
    }
}

/// Worker loop: exits the first time the FIFO is observed empty
fn serve(worker: &WorkerName, shared: &AckShared) -> usize {
    let mut processed = 0;

    while let Some(item) = shared.next_pending() {
        let registered = shared.registry.insert(item);
        if !registered {
            warn!(worker = %worker, tag = item.tag, "Duplicate tag already registered");
        }

        shared.acknowledge(worker, item.tag);

        if registered {
            shared.registry.remove(item.tag);
        }
        processed += 1;
    }

    debug!(worker = %worker, processed, "Worker found no pending items, exiting");
    processed
}

fn join_all(handles: Vec<(WorkerName, JoinHandle<usize>)>) -> PipelineResult<Vec<WorkerTally>> {
    let mut tallies = Vec::with_capacity(handles.len());
    let mut panicked = None;

    for (worker, handle) in handles {
        match handle.join() {
            Ok(processed) => tallies.push(WorkerTally { worker, processed }),
            Err(_) => panicked = Some(worker),
        }
    }

    match panicked {
        Some(worker) => Err(PipelineError::WorkerPanicked(worker.to_string())),
        None => Ok(tallies),
    }
}
