//! Error types for the geo layer.

/// Errors from coordinate validation and location acquisition.
#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum GeoError {
    /// A coordinate was NaN, infinite, or outside the valid
    /// latitude/longitude range. Never silently treated as in-range.
    #[error("invalid coordinates: lat={lat}, lng={lng}")]
    InvalidCoordinates { lat: f64, lng: f64 },

    /// The platform could not provide a position fix (permission
    /// denied, no GPS, timeout). A stale or cached fix must not be
    /// substituted.
    #[error("location unavailable: {0}")]
    LocationUnavailable(String),
}
