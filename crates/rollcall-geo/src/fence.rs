//! Haversine distance and the circular geofence check.

use rollcall_types::Coordinates;

use crate::GeoError;

/// Mean Earth radius in meters (IUGG value).
const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Validates a coordinate pair before any math touches it.
///
/// Rejects NaN and infinities explicitly: haversine of a NaN yields
/// NaN, and `NaN <= radius` is `false` — which *happens* to fail safe
/// for the fence check, but we refuse to rely on float comparison
/// semantics for a correctness property.
fn validate(c: Coordinates) -> Result<(), GeoError> {
    let ok = c.lat.is_finite()
        && c.lng.is_finite()
        && (-90.0..=90.0).contains(&c.lat)
        && (-180.0..=180.0).contains(&c.lng);
    if ok {
        Ok(())
    } else {
        Err(GeoError::InvalidCoordinates { lat: c.lat, lng: c.lng })
    }
}

/// Great-circle distance between two points, in meters.
///
/// Haversine formula over a spherical Earth. Accurate to ~0.5% versus
/// an ellipsoidal model, which is far below the tens-of-meters radii
/// this system fences with.
///
/// # Errors
/// [`GeoError::InvalidCoordinates`] if either point fails validation.
pub fn distance_meters(a: Coordinates, b: Coordinates) -> Result<f64, GeoError> {
    validate(a)?;
    validate(b)?;

    let phi1 = a.lat.to_radians();
    let phi2 = b.lat.to_radians();
    let d_phi = (b.lat - a.lat).to_radians();
    let d_lambda = (b.lng - a.lng).to_radians();

    let h = (d_phi / 2.0).sin().powi(2)
        + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);

    // asin form; h is clamped against rounding pushing it past 1.0
    // for near-antipodal points.
    Ok(2.0 * EARTH_RADIUS_M * h.sqrt().min(1.0).asin())
}

/// The circular region a scan must originate from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Geofence {
    pub center: Coordinates,
    pub radius_meters: f64,
}

impl Geofence {
    pub fn new(center: Coordinates, radius_meters: f64) -> Self {
        Self {
            center,
            radius_meters,
        }
    }

    /// Whether a point at `distance` meters from the center is inside.
    ///
    /// Inclusive comparison: `distance <= radius`. Radius 0 therefore
    /// passes only exact coincidence.
    pub fn is_within(&self, distance: f64) -> bool {
        distance <= self.radius_meters
    }

    /// Distance from the fence center to `point`, in meters.
    pub fn distance_to(&self, point: Coordinates) -> Result<f64, GeoError> {
        distance_meters(self.center, point)
    }

    /// Full check: distance plus the inclusive radius comparison.
    pub fn contains(&self, point: Coordinates) -> Result<bool, GeoError> {
        Ok(self.is_within(self.distance_to(point)?))
    }
}
