//! Error types for the session layer.

use rollcall_geo::GeoError;
use rollcall_types::{SessionId, StoreError};

/// Errors from starting, rotating, or stopping a session.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Location fix failed or the fix was unusable. Starting a session
    /// without a valid center point is never allowed.
    #[error(transparent)]
    Geo(#[from] GeoError),

    /// No session exists with this id.
    #[error("session {0} not found")]
    NotFound(SessionId),

    /// The persistence collaborator failed (includes bounded-timeout
    /// expiry as [`StoreError::Timeout`]).
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The runner for this session has already shut down; the handle
    /// can no longer answer queries. Stopping in this state is a no-op,
    /// not an error.
    #[error("session runner is no longer running")]
    Stopped,
}
