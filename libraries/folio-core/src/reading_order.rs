//! Reading order index
//!
//! Precomputed duration table over a publication's reading order, used to
//! place a position of one track on the timeline of the whole publication.

use crate::types::Link;
use std::time::Duration;

/// Duration table of a reading order
///
/// Missing, zero, negative or non-finite durations are stored as unknown.
/// Unknown durations count as zero for cumulative starts, and make the total
/// unknown.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ReadingOrderIndex {
    /// Href of each resource, in reading order
    hrefs: Vec<String>,

    /// Known duration of each resource, parallel to `hrefs`
    durations: Vec<Option<Duration>>,

    /// Start offset of each resource on the publication timeline
    starts: Vec<Duration>,

    /// Sum of every known duration, saturated at `Duration::MAX`
    end: Duration,

    /// Sum of all durations, only when every duration is known and the sum fits
    total: Option<Duration>,
}

impl ReadingOrderIndex {
    /// Build the index for a reading order
    pub fn new(reading_order: &[Link]) -> Self {
        let hrefs = reading_order.iter().map(|link| link.href.clone()).collect();
        let durations: Vec<Option<Duration>> = reading_order
            .iter()
            .map(|link| link.duration.and_then(positive_duration))
            .collect();

        let mut starts = Vec::with_capacity(durations.len());
        let mut end = Duration::ZERO;
        let mut overflowed = false;
        for duration in &durations {
            starts.push(end);
            match end.checked_add(duration.unwrap_or_default()) {
                Some(next) => end = next,
                None => {
                    overflowed = true;
                    end = Duration::MAX;
                }
            }
        }

        let total = if !overflowed && !durations.is_empty() && durations.iter().all(Option::is_some)
        {
            Some(end)
        } else {
            None
        };

        Self {
            hrefs,
            durations,
            starts,
            end,
            total,
        }
    }

    /// Number of resources
    pub fn len(&self) -> usize {
        self.hrefs.len()
    }

    /// Check if the reading order is empty
    pub fn is_empty(&self) -> bool {
        self.hrefs.is_empty()
    }

    /// Index of the first resource with this href
    pub fn index_of(&self, href: &str) -> Option<usize> {
        self.hrefs.iter().position(|h| h == href)
    }

    /// Offset of a resource on the publication timeline
    ///
    /// An index past the end yields the sum of every known duration. Offsets
    /// saturate at `Duration::MAX`.
    pub fn cumulative_start(&self, index: usize) -> Duration {
        self.starts.get(index).copied().unwrap_or(self.end)
    }

    /// Known duration of a resource
    pub fn duration_of(&self, index: usize) -> Option<Duration> {
        self.durations.get(index).copied().flatten()
    }

    /// Duration of the whole publication, if every resource duration is known
    pub fn total(&self) -> Option<Duration> {
        self.total
    }
}

fn positive_duration(seconds: f64) -> Option<Duration> {
    if seconds > 0.0 {
        Duration::try_from_secs_f64(seconds).ok()
    } else {
        None
    }
}
