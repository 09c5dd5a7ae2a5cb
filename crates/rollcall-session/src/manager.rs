//! The session manager: the admin-facing entry point.

use std::sync::Arc;
use std::time::Duration;

use rollcall_geo::LocationSource;
use rollcall_rotation::next_token;
use rollcall_types::{ClassId, SessionId, StoreError};
use tracing::{info, warn};

use crate::runner::spawn_runner;
use crate::{NewSession, SessionConfig, SessionError, SessionHandle, SessionStore};

/// Starts and stops attendance sessions.
///
/// One manager per client instance. Each started session gets its own
/// runner task (see [`crate::runner`]); the manager itself holds no
/// per-session state.
pub struct SessionManager<S, L> {
    store: Arc<S>,
    location: Arc<L>,
    config: SessionConfig,
}

impl<S: SessionStore, L: LocationSource> SessionManager<S, L> {
    pub fn new(store: Arc<S>, location: Arc<L>, config: SessionConfig) -> Self {
        Self {
            store,
            location,
            config: config.validated(),
        }
    }

    /// Starts a new attendance session for a class.
    ///
    /// Acquires a fresh location fix for the fence center (failing
    /// with [`GeoError::LocationUnavailable`](rollcall_geo::GeoError)
    /// if the platform can't produce one), then **supersedes** any
    /// session already active for this class: the old one is
    /// deactivated before the new one is created. At most one session
    /// per class is active at a time.
    ///
    /// The returned [`SessionHandle`] owns the rotation runner; drop it
    /// (or call [`SessionHandle::stop`]) and rotation halts.
    pub async fn start(
        &self,
        class_id: ClassId,
        radius_meters: f64,
    ) -> Result<SessionHandle, SessionError> {
        let center = self.location.current_position().await?;

        if let Some(prev) = bounded(
            self.config.store_timeout,
            self.store.find_active(&class_id),
        )
        .await?
        {
            warn!(
                session_id = %prev.id,
                class_id = %class_id,
                "superseding already-active session"
            );
            bounded(self.config.store_timeout, self.store.deactivate(&prev.id))
                .await?;
        }

        let new = NewSession {
            id: SessionId::generate(),
            class_id: class_id.clone(),
            center,
            radius_meters,
            initial_token: next_token(),
        };
        let session =
            bounded(self.config.store_timeout, self.store.create(new)).await?;

        info!(
            session_id = %session.id,
            class_id = %class_id,
            radius_m = radius_meters,
            "attendance session started"
        );

        Ok(spawn_runner(
            session,
            Arc::clone(&self.store),
            self.config.clone(),
        ))
    }
}

/// Applies the layer's bounded-timeout policy to one store call.
pub(crate) async fn bounded<T>(
    limit: Duration,
    call: impl std::future::Future<Output = Result<T, StoreError>>,
) -> Result<T, StoreError> {
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result,
        Err(_) => Err(StoreError::Timeout),
    }
}
