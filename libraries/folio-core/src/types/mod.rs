mod ids;
mod link;
mod locator;
mod publication;

pub use ids::{MediaId, PublicationId};
pub use link::Link;
pub use locator::{Locations, Locator};
pub use publication::{Metadata, Publication};
