//! Session layer configuration.

use std::time::Duration;

use rollcall_rotation::RotationConfig;
use tracing::warn;

/// Configuration for session behavior.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Token rotation timing.
    pub rotation: RotationConfig,

    /// Bound on every individual store call. A call that hasn't
    /// resolved by then fails with `StoreError::Timeout` — nothing in
    /// this layer is allowed to hang.
    ///
    /// Default: 10 seconds.
    pub store_timeout: Duration,

    /// How many attempts a rotation write gets before the runner
    /// declares itself degraded and keeps the last acknowledged token.
    ///
    /// Default: 3.
    pub persist_attempts: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            rotation: RotationConfig::default(),
            store_timeout: Duration::from_secs(10),
            persist_attempts: 3,
        }
    }
}

impl SessionConfig {
    /// Clamps out-of-range values so the config is safe to use.
    pub fn validated(mut self) -> Self {
        self.rotation = self.rotation.validated();
        if self.persist_attempts == 0 {
            warn!("persist_attempts of 0 raised to 1");
            self.persist_attempts = 1;
        }
        if self.store_timeout.is_zero() {
            warn!("store_timeout of 0 raised to 1s");
            self.store_timeout = Duration::from_secs(1);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = SessionConfig::default();
        assert_eq!(cfg.rotation.interval_secs, 11);
        assert_eq!(cfg.store_timeout, Duration::from_secs(10));
        assert_eq!(cfg.persist_attempts, 3);
    }

    #[test]
    fn test_validated_raises_zero_attempts() {
        let cfg = SessionConfig {
            persist_attempts: 0,
            ..SessionConfig::default()
        }
        .validated();
        assert_eq!(cfg.persist_attempts, 1);
    }

    #[test]
    fn test_validated_raises_zero_timeout() {
        let cfg = SessionConfig {
            store_timeout: Duration::ZERO,
            ..SessionConfig::default()
        }
        .validated();
        assert_eq!(cfg.store_timeout, Duration::from_secs(1));
    }
}
