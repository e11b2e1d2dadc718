/*!
 * Report Analysis
 *
 * Pure computations over one drained snapshot: highest/lowest rankings and
 * the largest delta across a fixed index window.
 *
 * Both run over the snapshot sorted ascending by temperature, not over
 * arrival order. The window scan therefore measures numeric spread between
 * readings `window` ranks apart, with the timestamps of those two readings.
 */

use crate::core::types::{Sample, Temperature};
use serde::{Deserialize, Serialize};
use std::fmt;
use time::macros::format_description;
use time::{OffsetDateTime, UtcOffset};

/// Largest windowed delta in a snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowDelta {
    pub delta: Temperature,
    pub start_index: usize,
    pub end_index: usize,
    pub start: OffsetDateTime,
    pub end: OffsetDateTime,
}

/// One compiled report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    /// 1-based cycle number
    pub cycle: usize,
    /// Samples drained for this report
    pub sample_count: usize,
    /// Highest readings, descending
    pub highest: Vec<Sample>,
    /// Lowest readings, ascending
    pub lowest: Vec<Sample>,
    /// Present only when the snapshot is longer than the window
    pub largest_delta: Option<WindowDelta>,
    #[serde(skip, default = "utc")]
    pub utc_offset: UtcOffset,
}

impl Report {
    /// Sort `snapshot` by temperature and compute every section
    pub fn compile(
        cycle: usize,
        mut snapshot: Vec<Sample>,
        rank_count: usize,
        window: usize,
        utc_offset: UtcOffset,
    ) -> Self {
        sort_by_temperature(&mut snapshot);
        let (highest, lowest) = rank_extremes(&snapshot, rank_count);

        Self {
            cycle,
            sample_count: snapshot.len(),
            highest,
            lowest,
            largest_delta: max_window_delta(&snapshot, window),
            utc_offset,
        }
    }
}

/// Stable sort, ascending by temperature
pub fn sort_by_temperature(samples: &mut [Sample]) {
    samples.sort_by_key(Sample::temperature);
}

/// Top `count` descending and bottom `count` ascending of a sorted slice
///
/// With fewer than `count` samples each list holds every sample once.
pub fn rank_extremes(sorted: &[Sample], count: usize) -> (Vec<Sample>, Vec<Sample>) {
    let highest = sorted.iter().rev().take(count).copied().collect();
    let lowest = sorted.iter().take(count).copied().collect();
    (highest, lowest)
}

/// Maximum of `sorted[i + window] - sorted[i]` over every valid `i`
///
/// Returns `None` unless the slice holds more than `window` samples. Ties keep
/// the earliest index.
pub fn max_window_delta(sorted: &[Sample], window: usize) -> Option<WindowDelta> {
    if window == 0 || sorted.len() <= window {
        return None;
    }

    sorted
        .windows(window + 1)
        .enumerate()
        .map(|(i, span)| {
            let (first, last) = (span[0], span[window]);
            WindowDelta {
                delta: last.temperature() - first.temperature(),
                start_index: i,
                end_index: i + window,
                start: first.timestamp(),
                end: last.timestamp(),
            }
        })
        .reduce(|best, next| if next.delta > best.delta { next } else { best })
}

/// `YYYY-MM-DD HH:MM:SS` in the given offset
pub fn format_timestamp(timestamp: OffsetDateTime, offset: UtcOffset) -> String {
    timestamp
        .to_offset(offset)
        .format(format_description!(
            "[year]-[month]-[day] [hour]:[minute]:[second]"
        ))
        .unwrap_or_else(|_| timestamp.to_string())
}

fn utc() -> UtcOffset {
    UtcOffset::UTC
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stamp = |t: OffsetDateTime| format_timestamp(t, self.utc_offset);

        writeln!(f, "Top {} highest temperatures of the hour:", self.highest.len())?;
        for sample in &self.highest {
            writeln!(
                f,
                "Temperature: {}F, Timestamp: {}",
                sample.temperature(),
                stamp(sample.timestamp())
            )?;
        }

        writeln!(f, "Top {} lowest temperatures of the hour:", self.lowest.len())?;
        for sample in &self.lowest {
            writeln!(
                f,
                "Temperature: {}F, Timestamp: {}",
                sample.temperature(),
                stamp(sample.timestamp())
            )?;
        }

        if let Some(delta) = &self.largest_delta {
            writeln!(
                f,
                "Largest temperature difference observed over a 10-minute interval: {}F",
                delta.delta
            )?;
            writeln!(f, "Start Time: {}", stamp(delta.start))?;
            writeln!(f, "End Time: {}", stamp(delta.end))?;
        }
        Ok(())
    }
}
