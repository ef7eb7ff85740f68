//! Folio Core
//!
//! Publication model and reading-order position math for Folio.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `Publication`, `Link`, `Locator`, `PublicationId`, `MediaId`
//! - **Reading order index**: cumulative track offsets and total duration
//! - **Locator translation**: (track, position) to `Locator` and back
//! - **Error Handling**: Unified `FolioError` and `Result` types
//!
//! # Example
//!
//! ```rust
//! use folio_core::{Link, LocatorTranslator};
//! use std::time::Duration;
//!
//! let translator = LocatorTranslator::new(vec![
//!     Link::new("c1.mp3").with_duration(100.0),
//!     Link::new("c2.mp3").with_duration(200.0),
//! ]);
//!
//! let locator = translator.to_locator(1, Some(Duration::from_secs(50))).unwrap();
//! assert_eq!(locator.locations.progression, Some(0.25));
//! assert_eq!(locator.locations.total_progression, Some(0.5));
//! ```

#![forbid(unsafe_code)]

pub mod error;
pub mod reading_order;
pub mod translator;
pub mod types;

// Re-export commonly used types
pub use error::{FolioError, Result};
pub use reading_order::ReadingOrderIndex;
pub use translator::LocatorTranslator;
pub use types::{Link, Locations, Locator, MediaId, Metadata, Publication, PublicationId};
