//! The session persistence collaborator.
//!
//! Rollcall contains no storage engine — sessions live in a remote
//! managed document store. This trait is the seam where that store is
//! injected: a hosted document database in production, in-memory in
//! tests (the `rollcall` meta crate ships one).

use chrono::{DateTime, Utc};
use rollcall_types::{ClassId, Coordinates, Session, SessionId, StoreError};

/// Fields the client supplies when creating a session. Timestamps are
/// store-assigned, never taken from the device clock.
#[derive(Debug, Clone)]
pub struct NewSession {
    pub id: SessionId,
    pub class_id: ClassId,
    pub center: Coordinates,
    pub radius_meters: f64,
    pub initial_token: String,
}

/// Document-store operations the session layer needs.
///
/// Every method is expected to be an individual remote call; callers
/// wrap each in a bounded timeout and decide retry policy themselves.
pub trait SessionStore: Send + Sync + 'static {
    /// Persists a new active session and returns it with store-assigned
    /// timestamps.
    fn create(
        &self,
        new: NewSession,
    ) -> impl std::future::Future<Output = Result<Session, StoreError>> + Send;

    /// Fetches a session by id. `Ok(None)` means no such document.
    fn fetch(
        &self,
        id: &SessionId,
    ) -> impl std::future::Future<Output = Result<Option<Session>, StoreError>> + Send;

    /// Finds the currently active session for a class, if any.
    fn find_active(
        &self,
        class_id: &ClassId,
    ) -> impl std::future::Future<Output = Result<Option<Session>, StoreError>> + Send;

    /// Replaces the session's current token. Returns the store-assigned
    /// rotation timestamp; the in-memory session only adopts the new
    /// token once this acks.
    fn update_token(
        &self,
        id: &SessionId,
        token: &str,
    ) -> impl std::future::Future<Output = Result<DateTime<Utc>, StoreError>> + Send;

    /// Sets `active = false`. Idempotent — deactivating an already
    /// inactive session must succeed.
    fn deactivate(
        &self,
        id: &SessionId,
    ) -> impl std::future::Future<Output = Result<(), StoreError>> + Send;
}
