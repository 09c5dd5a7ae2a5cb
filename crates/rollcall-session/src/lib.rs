//! Attendance session lifecycle for Rollcall.
//!
//! This crate owns everything between "admin presses start" and "admin
//! presses stop":
//!
//! 1. **Starting** — acquire a location fix, supersede any session
//!    already active for the class, persist the new one
//!    ([`SessionManager::start`])
//! 2. **Rotating** — a per-session runner task generates a fresh token
//!    on the configured cadence and persists it before serving it
//! 3. **Stopping** — deactivate and halt the runner deterministically,
//!    whether by an explicit [`SessionHandle::stop`] or by dropping the
//!    handle (navigating away never leaks a timer)
//!
//! # How it fits in the stack
//!
//! ```text
//! Admin UI (above)       ← holds a SessionHandle, renders the QR view
//!     ↕
//! Session layer (this crate)
//!     ↕
//! SessionStore / LocationSource collaborators (injected)
//! ```

#![allow(async_fn_in_trait)]

mod config;
mod error;
mod manager;
mod runner;
mod store;

pub use config::SessionConfig;
pub use error::SessionError;
pub use manager::SessionManager;
pub use runner::{SessionHandle, SessionView};
pub use store::{NewSession, SessionStore};
