//! Attendance recording and reporting for Rollcall.
//!
//! The student-facing half of the system:
//!
//! 1. **Recording** — [`AttendanceRecorder::record`] takes a scanned
//!    (session, token) pair and a student identity, re-verifies the
//!    token against the session's *current* value, checks the geofence,
//!    and writes exactly one record per (session, student)
//! 2. **Reporting** — [`report`] aggregates records into per-student
//!    summaries and renders the CSV projection the report view exports
//!
//! # How it fits in the stack
//!
//! ```text
//! Scanner UI (above)   ← decodes the QR URL, calls record()
//!     ↕
//! Attendance layer (this crate)
//!     ↕
//! SessionStore / AttendanceStore / LocationSource collaborators (injected)
//! ```

#![allow(async_fn_in_trait)]

mod error;
mod recorder;
pub mod report;
mod store;

pub use error::AttendanceError;
pub use recorder::{AttendanceRecorder, RecorderConfig};
pub use store::{AttendanceStore, NewAttendanceRecord};
