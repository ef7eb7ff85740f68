//! Locator translation
//!
//! Converts between a (track index, position in track) pair and a
//! publication-relative [`Locator`].

use crate::{
    error::{FolioError, Result},
    reading_order::ReadingOrderIndex,
    types::{Link, Locations, Locator},
};
use std::time::Duration;

/// Translates playback positions to locators and back
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LocatorTranslator {
    reading_order: Vec<Link>,
    index: ReadingOrderIndex,
}

impl LocatorTranslator {
    /// Create a translator over a reading order
    pub fn new(reading_order: Vec<Link>) -> Self {
        let index = ReadingOrderIndex::new(&reading_order);
        Self {
            reading_order,
            index,
        }
    }

    /// Reading order this translator works on
    pub fn reading_order(&self) -> &[Link] {
        &self.reading_order
    }

    /// Precomputed duration table
    pub fn index(&self) -> &ReadingOrderIndex {
        &self.index
    }

    /// Index of the first reading order resource with this href
    pub fn index_of(&self, href: &str) -> Option<usize> {
        self.index.index_of(href)
    }

    /// Build the locator of a position inside a reading order resource
    ///
    /// Without a position the locator only points at the resource. The
    /// position is not clamped: a value past the track duration yields a
    /// progression above 1.0.
    pub fn to_locator(&self, index: usize, position: Option<Duration>) -> Result<Locator> {
        let link = self.reading_order.get(index).ok_or(FolioError::InvalidIndex {
            index,
            len: self.reading_order.len(),
        })?;
        let locator = link.to_locator();

        let Some(position) = position else {
            return Ok(locator);
        };

        let progression = self
            .index
            .duration_of(index)
            .filter(|duration| !duration.is_zero())
            .map(|duration| position.as_secs_f64() / duration.as_secs_f64());

        let total_progression = self
            .index
            .total()
            .filter(|total| !total.is_zero())
            .and_then(|total| {
                let elapsed = self.index.cumulative_start(index).checked_add(position)?;
                Some(elapsed.as_secs_f64() / total.as_secs_f64())
            });

        Ok(locator.with_locations(Locations {
            fragment: Some(Locations::time_fragment(position)),
            progression,
            total_progression,
        }))
    }

    /// Locator of the start of a reading order resource
    pub fn locator_for_link(&self, link: &Link) -> Result<Locator> {
        let index = self
            .index_of(&link.href)
            .ok_or_else(|| FolioError::HrefNotFound(link.href.clone()))?;
        self.to_locator(index, Some(Duration::ZERO))
    }

    /// Resolve a locator to a reading order index and a position in that track
    ///
    /// The position comes from a `t=` fragment, or from `progression` when the
    /// track duration is known. A malformed fragment only drops the position.
    pub fn from_locator(&self, locator: &Locator) -> Result<(usize, Option<Duration>)> {
        let index = self
            .index_of(&locator.href)
            .ok_or_else(|| FolioError::HrefNotFound(locator.href.clone()))?;

        let position = locator.locations.time().or_else(|| {
            let progression = locator.locations.progression?;
            let duration = self.index.duration_of(index)?;
            scale(duration, progression)
        });

        Ok((index, position))
    }
}

fn scale(duration: Duration, factor: f64) -> Option<Duration> {
    if factor < 0.0 {
        return None;
    }
    Duration::try_from_secs_f64(duration.as_secs_f64() * factor).ok()
}
