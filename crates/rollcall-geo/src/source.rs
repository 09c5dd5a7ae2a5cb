//! The location collaborator trait.
//!
//! Rollcall never talks to a GPS or browser geolocation API directly —
//! the host platform implements [`LocationSource`] and the session and
//! attendance layers call it at the moments a *fresh* fix is required:
//! once when an admin starts a session (to pin the fence center) and
//! once per scan (to verify the student's position).

use rollcall_types::Coordinates;

use crate::GeoError;

/// Supplies the device's current position.
///
/// `Send + Sync + 'static` so implementations can be shared across the
/// async tasks that need a fix.
pub trait LocationSource: Send + Sync + 'static {
    /// Acquires a fresh position fix.
    ///
    /// # Errors
    /// [`GeoError::LocationUnavailable`] when the platform denies or
    /// cannot produce one. Implementations must not fall back to a
    /// cached fix — verification decisions depend on where the device
    /// is *now*.
    fn current_position(
        &self,
    ) -> impl std::future::Future<Output = Result<Coordinates, GeoError>> + Send;
}
