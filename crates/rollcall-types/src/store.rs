//! Error surface shared by every persistence collaborator.

/// Errors a remote document store can return.
///
/// The store collaborators (`SessionStore`, `AttendanceStore`,
/// `RoleStore`) all speak this one error type; the layers above decide
/// which failures are retryable and which are terminal.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum StoreError {
    /// The store rejected or failed the call (network, auth, quota).
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// The call exceeded its bounded deadline. Applied by callers via
    /// `tokio::time::timeout` — no store operation may hang forever.
    #[error("store operation timed out")]
    Timeout,

    /// A conditional insert hit an existing document with the same key.
    /// For attendance records this IS the at-most-once guarantee firing,
    /// not a fault.
    #[error("document already exists")]
    Conflict,
}

impl StoreError {
    /// Whether a *read* of this failure is worth retrying.
    /// Writes are only retried when the caller's key is idempotent.
    pub fn is_retryable(&self) -> bool {
        matches!(self, StoreError::Unavailable(_) | StoreError::Timeout)
    }
}
