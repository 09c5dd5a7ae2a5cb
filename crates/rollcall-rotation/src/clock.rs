//! The rotation countdown clock.
//!
//! Fires once per second. Every tick either decrements the visible
//! countdown or, at zero, reports that the token must rotate and
//! resets the countdown. The clock itself never generates tokens or
//! touches storage — it only decides when.

use std::time::Duration;

use tokio::time::{self, Instant as TokioInstant};
use tracing::{debug, trace, warn};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Rotation timing configuration.
#[derive(Debug, Clone)]
pub struct RotationConfig {
    /// Seconds between token rotations. Default: 11 — the cadence the
    /// admin QR screen has always displayed.
    pub interval_secs: u32,
}

impl Default for RotationConfig {
    fn default() -> Self {
        Self { interval_secs: 11 }
    }
}

impl RotationConfig {
    /// Maximum supported rotation interval.
    pub const MAX_INTERVAL_SECS: u32 = 300;

    /// Clamps out-of-range values so the config is safe to use.
    ///
    /// Called automatically by [`RotationClock::new`]. Rules:
    /// - `interval_secs` of 0 is raised to 1 (a zero interval would
    ///   rotate on every tick and never show a countdown).
    /// - Capped at [`Self::MAX_INTERVAL_SECS`].
    pub fn validated(mut self) -> Self {
        if self.interval_secs == 0 {
            warn!("rotation interval of 0s raised to 1s");
            self.interval_secs = 1;
        }
        if self.interval_secs > Self::MAX_INTERVAL_SECS {
            warn!(
                interval = self.interval_secs,
                max = Self::MAX_INTERVAL_SECS,
                "rotation interval exceeds maximum, clamping"
            );
            self.interval_secs = Self::MAX_INTERVAL_SECS;
        }
        self
    }

    /// The rotation period as a `Duration`.
    pub fn interval(&self) -> Duration {
        Duration::from_secs(u64::from(self.interval_secs))
    }
}

// ---------------------------------------------------------------------------
// Clock
// ---------------------------------------------------------------------------

/// What a single clock tick means.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockTick {
    /// One second elapsed; `remaining` seconds until the next rotation.
    Countdown { remaining: u32 },
    /// The countdown reached zero. Rotate now; the countdown has been
    /// reset to the full interval.
    Rotate,
}

/// One-second countdown timer driving token rotation.
///
/// One clock per active session; it lives inside the session runner
/// task and stops when that task does.
pub struct RotationClock {
    config: RotationConfig,
    remaining: u32,
    next_tick: TokioInstant,
    rotations: u64,
}

impl RotationClock {
    const TICK: Duration = Duration::from_secs(1);

    pub fn new(config: RotationConfig) -> Self {
        let config = config.validated();
        debug!(interval_secs = config.interval_secs, "rotation clock created");
        Self {
            remaining: config.interval_secs,
            next_tick: TokioInstant::now() + Self::TICK,
            rotations: 0,
            config,
        }
    }

    /// Waits until the next one-second tick is due.
    ///
    /// If the task wakes up late (the executor was stalled), the next
    /// tick is scheduled from *now* — the countdown stretches rather
    /// than firing a catch-up burst of rotations.
    pub async fn wait_for_tick(&mut self) -> ClockTick {
        time::sleep_until(self.next_tick).await;

        let now = TokioInstant::now();
        let late_by = now.saturating_duration_since(self.next_tick);
        if late_by > Self::TICK {
            warn!(
                late_ms = late_by.as_millis() as u64,
                "rotation tick fired late, rescheduling from now"
            );
        }
        self.next_tick = now + Self::TICK;

        self.remaining -= 1;
        if self.remaining == 0 {
            self.remaining = self.config.interval_secs;
            self.rotations += 1;
            trace!(rotation = self.rotations, "rotation due");
            ClockTick::Rotate
        } else {
            trace!(remaining = self.remaining, "countdown tick");
            ClockTick::Countdown {
                remaining: self.remaining,
            }
        }
    }

    /// Seconds left until the next rotation.
    pub fn seconds_remaining(&self) -> u32 {
        self.remaining
    }

    /// Total rotations signalled so far.
    pub fn rotations(&self) -> u64 {
        self.rotations
    }

    /// The clamped configuration in effect.
    pub fn config(&self) -> &RotationConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_interval_is_eleven_seconds() {
        let cfg = RotationConfig::default();
        assert_eq!(cfg.interval_secs, 11);
        assert_eq!(cfg.interval(), Duration::from_secs(11));
    }

    #[test]
    fn test_validated_raises_zero_interval() {
        let cfg = RotationConfig { interval_secs: 0 }.validated();
        assert_eq!(cfg.interval_secs, 1);
    }

    #[test]
    fn test_validated_clamps_huge_interval() {
        let cfg = RotationConfig {
            interval_secs: 10_000,
        }
        .validated();
        assert_eq!(cfg.interval_secs, RotationConfig::MAX_INTERVAL_SECS);
    }

    #[tokio::test(start_paused = true)]
    async fn test_counts_down_then_rotates() {
        let mut clock = RotationClock::new(RotationConfig { interval_secs: 3 });
        assert_eq!(clock.seconds_remaining(), 3);

        assert_eq!(
            clock.wait_for_tick().await,
            ClockTick::Countdown { remaining: 2 }
        );
        assert_eq!(
            clock.wait_for_tick().await,
            ClockTick::Countdown { remaining: 1 }
        );
        assert_eq!(clock.wait_for_tick().await, ClockTick::Rotate);
        assert_eq!(clock.rotations(), 1);

        // Countdown resets to the full interval after a rotation.
        assert_eq!(clock.seconds_remaining(), 3);
        assert_eq!(
            clock.wait_for_tick().await,
            ClockTick::Countdown { remaining: 2 }
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_interval_of_one_rotates_every_tick() {
        let mut clock = RotationClock::new(RotationConfig { interval_secs: 1 });
        assert_eq!(clock.wait_for_tick().await, ClockTick::Rotate);
        assert_eq!(clock.wait_for_tick().await, ClockTick::Rotate);
        assert_eq!(clock.rotations(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_eleven_second_cadence() {
        // The default config rotates exactly once per 11 ticks.
        let mut clock = RotationClock::new(RotationConfig::default());
        let mut rotations = 0;
        for _ in 0..22 {
            if clock.wait_for_tick().await == ClockTick::Rotate {
                rotations += 1;
            }
        }
        assert_eq!(rotations, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_catchup_burst_after_stall() {
        let mut clock = RotationClock::new(RotationConfig { interval_secs: 5 });

        // Simulate the executor stalling for several seconds.
        tokio::time::advance(Duration::from_secs(30)).await;

        // The first tick after the stall is a single tick, not a burst
        // of queued rotations.
        assert_eq!(
            clock.wait_for_tick().await,
            ClockTick::Countdown { remaining: 4 }
        );
        assert_eq!(clock.rotations(), 0);
    }
}
