//! Unified error type for the Rollcall client core.

use rollcall_attendance::AttendanceError;
use rollcall_auth::AuthError;
use rollcall_geo::GeoError;
use rollcall_session::SessionError;
use rollcall_types::ScanError;

/// Top-level error that wraps all crate-specific errors.
///
/// When using the `rollcall` meta-crate, you deal with this single
/// error type instead of importing errors from each sub-crate.
/// The `#[from]` attribute on each variant auto-generates `From` impls,
/// so the `?` operator converts sub-crate errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum RollcallError {
    /// A geolocation error (no fix, invalid coordinates).
    #[error(transparent)]
    Geo(#[from] GeoError),

    /// A session-level error (not found, store failure, stopped).
    #[error(transparent)]
    Session(#[from] SessionError),

    /// An attendance error (rejection or store failure).
    #[error(transparent)]
    Attendance(#[from] AttendanceError),

    /// An auth error (sign-in, role lookup).
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// A scan payload that isn't a valid attendance URL.
    #[error(transparent)]
    Scan(#[from] ScanError),
}
