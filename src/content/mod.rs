//! Ad content model and identifiers.
//!
//! ## Contents
//! - [`AdContent`] immutable snapshot of one loaded ad
//! - [`AdField`] names of the optional fields, for presence checks
//! - [`AdImage`], [`MediaContent`] nested asset descriptions
//! - [`PlacementKey`], [`AdUnitId`] opaque identifiers

mod ad;
mod ids;

pub use ad::{AdContent, AdField, AdImage, MediaContent};
pub use ids::{AdUnitId, PlacementKey};
