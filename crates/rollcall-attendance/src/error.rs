//! Error types for attendance recording.

use rollcall_geo::GeoError;
use rollcall_types::{AttendanceRecord, SessionId, StoreError};

/// Errors from one attendance attempt.
///
/// The first five variants are **rejections**: expected, user-visible
/// outcomes the scanner screen renders as a plain status message. The
/// last two are infrastructure failures.
#[derive(Debug, thiserror::Error)]
pub enum AttendanceError {
    /// No session document exists for the scanned id.
    #[error("session {0} not found")]
    SessionNotFound(SessionId),

    /// The session exists but has been stopped.
    #[error("session {0} is no longer active")]
    SessionInactive(SessionId),

    /// The scanned token is not the session's current token. Either
    /// rotation moved on mid-flight (re-scan the live QR) or this is a
    /// stale screenshot of an old frame.
    #[error("token no longer current for session {0}")]
    TokenExpired(SessionId),

    /// The student's verified position is outside the geofence.
    #[error("out of range: {distance_meters:.0} m away, limit is {allowed_radius_meters:.0} m")]
    OutOfRange {
        distance_meters: f64,
        allowed_radius_meters: f64,
    },

    /// Attendance was already marked for this (session, student).
    /// Carries the prior record so repeated scans report the earlier
    /// success instead of erroring loudly.
    #[error("attendance already marked for this session")]
    AlreadyMarked(Box<AttendanceRecord>),

    /// Location fix failed or coordinates were unusable.
    #[error(transparent)]
    Geo(#[from] GeoError),

    /// The persistence collaborator failed after retries.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl AttendanceError {
    /// Whether this is an expected user-visible rejection (render a
    /// status message) rather than an infrastructure fault (log it,
    /// offer retry).
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            AttendanceError::SessionNotFound(_)
                | AttendanceError::SessionInactive(_)
                | AttendanceError::TokenExpired(_)
                | AttendanceError::OutOfRange { .. }
                | AttendanceError::AlreadyMarked(_)
        )
    }
}
