//! Token rotation for Rollcall.
//!
//! Two pieces, both storage-agnostic:
//!
//! 1. [`next_token`] — generates the opaque value a QR frame carries
//! 2. [`RotationClock`] — the countdown timer that decides *when* the
//!    next frame replaces the current one
//!
//! # Integration
//!
//! The clock is designed to sit inside the session runner's
//! `tokio::select!` loop:
//!
//! ```ignore
//! loop {
//!     tokio::select! {
//!         Some(cmd) = cmd_rx.recv() => { /* handle commands */ }
//!         tick = clock.wait_for_tick() => match tick {
//!             ClockTick::Countdown { remaining } => update_countdown(remaining),
//!             ClockTick::Rotate => rotate_token().await,
//!         }
//!     }
//! }
//! ```
//!
//! Dropping the clock (with the loop that owns it) is the only stop
//! mechanism — there is no leaked background task to chase.

mod clock;
mod token;

pub use clock::{ClockTick, RotationClock, RotationConfig};
pub use token::{next_token, TOKEN_LEN};
