//! Error types for the auth layer.

use rollcall_types::StoreError;

/// Errors from sign-in and role resolution.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The identity provider rejected or aborted the sign-in.
    #[error("sign-in failed: {0}")]
    SignInFailed(String),

    /// The role document could not be read or written.
    ///
    /// Callers that can't propagate this should degrade to the least
    /// privilege via [`RoleResolver::resolve_or_default`](crate::RoleResolver::resolve_or_default),
    /// never guess upward.
    #[error("role lookup failed: {0}")]
    RoleLookupFailed(#[from] StoreError),
}
