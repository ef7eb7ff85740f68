//! Session side playback preparation
//!
//! Helpers for the component that owns the media session: building session
//! metadata for reading order resources, and turning a `play_from_media_id`
//! request back into a track index and a start position.

use crate::types::MediaMetadata;
use folio_core::{
    FolioError, Link, Locator, LocatorTranslator, MediaId, Publication, PublicationId, Result,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Relation of the publication cover link
const COVER_REL: &str = "cover";

/// Where playback should start after a `play_from_media_id` request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeekTarget {
    /// Reading order index of the track to load
    pub index: usize,

    /// Position in that track
    pub position: Duration,
}

/// Prepares the media session of one publication
#[derive(Debug, Clone)]
pub struct PlaybackPreparer {
    publication: Arc<Publication>,
    publication_id: PublicationId,
    translator: LocatorTranslator,
}

impl PlaybackPreparer {
    /// Create a preparer for a publication
    pub fn new(publication: Arc<Publication>, publication_id: PublicationId) -> Self {
        let translator = LocatorTranslator::new(publication.reading_order.clone());
        Self {
            publication,
            publication_id,
            translator,
        }
    }

    /// Media ID of a resource of this publication
    pub fn media_id(&self, link: &Link) -> MediaId {
        MediaId::new(self.publication_id.clone(), link.href.clone())
    }

    /// Session metadata of the reading order resource at `index`
    ///
    /// Untitled resources fall back to the publication title.
    pub fn media_metadata(&self, index: usize) -> Result<MediaMetadata> {
        let reading_order = &self.publication.reading_order;
        let link = reading_order.get(index).ok_or(FolioError::InvalidIndex {
            index,
            len: reading_order.len(),
        })?;

        Ok(MediaMetadata {
            media_id: Some(self.media_id(link).to_string()),
            title: link
                .title
                .clone()
                .or_else(|| Some(self.publication.metadata.title.clone())),
            icon_uri: self
                .publication
                .link_with_rel(COVER_REL)
                .map(|cover| cover.href.clone()),
        })
    }

    /// Session metadata of every reading order resource, in order
    pub fn queue(&self) -> Vec<MediaMetadata> {
        (0..self.publication.reading_order.len())
            .filter_map(|index| self.media_metadata(index).ok())
            .collect()
    }

    /// Locator to start from for a `play_from_media_id` request
    ///
    /// The locator sent along with the request wins; otherwise playback starts
    /// at the beginning of the resource named by the media ID.
    pub fn locator_from_media_id(
        &self,
        media_id: &MediaId,
        payload: Option<Locator>,
    ) -> Option<Locator> {
        if *media_id.publication_id() != self.publication_id {
            debug!(%media_id, "Media ID belongs to another publication");
            return None;
        }
        if let Some(locator) = payload {
            return Some(locator);
        }
        let link = self
            .translator
            .reading_order()
            .iter()
            .find(|link| link.href == media_id.href())?;
        self.translator.locator_for_link(link).ok()
    }

    /// Track and position to seek to for a locator
    ///
    /// An href outside the reading order starts the first track; a locator
    /// without usable position starts at the beginning of its track.
    pub fn seek_target(&self, locator: &Locator) -> SeekTarget {
        match self.translator.from_locator(locator) {
            Ok((index, position)) => SeekTarget {
                index,
                position: position.unwrap_or_default(),
            },
            Err(e) => {
                debug!(error = %e, "Starting from the first track");
                SeekTarget {
                    index: 0,
                    position: Duration::ZERO,
                }
            }
        }
    }
}
