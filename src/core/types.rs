/*!
 * Core Types
 * Values shared by the registry, the ring buffer, and both pipelines
 */

use serde::{Deserialize, Serialize};
use smartstring::alias::String as SmartString;
use std::fmt;
use time::OffsetDateTime;

/// Unique identity of an item within one pipeline run
pub type Tag = i64;

/// Reading in whole degrees Fahrenheit
pub type Temperature = i32;

/// Worker names are short ("Servant 12") and stay inline
pub type WorkerName = SmartString;

/// Item flowing through the acknowledgment pipeline. Identity is the tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Item {
    pub tag: Tag,
}

impl Item {
    #[inline]
    pub const fn new(tag: Tag) -> Self {
        Self { tag }
    }
}

impl From<Tag> for Item {
    fn from(tag: Tag) -> Self {
        Self::new(tag)
    }
}

/// Proof that `worker` processed the item tagged `tag`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Acknowledgment {
    pub worker: WorkerName,
    pub tag: Tag,
}

impl Acknowledgment {
    pub fn new(worker: impl Into<WorkerName>, tag: Tag) -> Self {
        Self {
            worker: worker.into(),
            tag,
        }
    }
}

/// Timestamped sensor reading. Immutable once created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sample {
    temperature: Temperature,
    timestamp: OffsetDateTime,
}

impl Sample {
    /// Stamp a reading with the current instant
    pub fn now(temperature: Temperature) -> Self {
        Self::at(temperature, OffsetDateTime::now_utc())
    }

    pub const fn at(temperature: Temperature, timestamp: OffsetDateTime) -> Self {
        Self {
            temperature,
            timestamp,
        }
    }

    #[inline(always)]
    pub const fn temperature(&self) -> Temperature {
        self.temperature
    }

    #[inline(always)]
    pub const fn timestamp(&self) -> OffsetDateTime {
        self.timestamp
    }
}

impl fmt::Display for Sample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}F @ {}", self.temperature, self.timestamp)
    }
}
