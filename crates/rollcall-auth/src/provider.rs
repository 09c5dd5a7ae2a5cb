//! The identity provider seam.

use rollcall_types::Identity;
use tokio::sync::mpsc;

use crate::AuthError;

/// A change in the authenticated identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthEvent {
    SignedIn(Identity),
    SignedOut,
}

/// The hosted sign-in service.
///
/// Implementations wrap whatever the platform offers (an OAuth popup,
/// a system account picker). The provider owns the current identity;
/// this layer only reacts to its events.
pub trait IdentityProvider: Send + Sync + 'static {
    /// Runs the interactive sign-in flow to completion.
    fn sign_in(
        &self,
    ) -> impl std::future::Future<Output = Result<Identity, AuthError>> + Send;

    /// Ends the current session with the provider.
    fn sign_out(&self) -> impl std::future::Future<Output = Result<(), AuthError>> + Send;

    /// Subscribes to identity changes after this call. Dropping the
    /// receiver ends the subscription.
    fn subscribe(
        &self,
    ) -> impl std::future::Future<Output = mpsc::Receiver<AuthEvent>> + Send;
}
