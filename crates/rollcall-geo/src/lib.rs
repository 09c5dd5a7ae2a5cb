//! Geofence verification for Rollcall.
//!
//! Two pure functions carry the whole correctness load:
//!
//! 1. [`distance_meters`] — great-circle distance (haversine) between
//!    two coordinates
//! 2. [`Geofence::is_within`] — plain `distance <= radius`
//!
//! plus the [`LocationSource`] trait, the seam where the platform's
//! geolocation API is injected. The math never touches I/O and the
//! trait never touches math.

#![allow(async_fn_in_trait)]

mod error;
mod fence;
mod source;

pub use error::GeoError;
pub use fence::{distance_meters, Geofence};
pub use source::LocationSource;

pub use rollcall_types::Coordinates;
