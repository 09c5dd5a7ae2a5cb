//! Core data model for Rollcall.
//!
//! This crate defines every type the rest of the workspace agrees on:
//!
//! 1. **Identifiers** — newtype ids for sessions, students, classes,
//!    and attendance records ([`SessionId`], [`StudentId`], [`ClassId`],
//!    [`RecordId`])
//! 2. **Records** — the persisted shapes ([`Session`],
//!    [`AttendanceRecord`], [`Identity`])
//! 3. **Scan payload** — the value encoded into the QR code and parsed
//!    back out on the student's device ([`ScanPayload`])
//! 4. **Store errors** — the error surface every persistence
//!    collaborator speaks ([`StoreError`])
//!
//! # How it fits in the stack
//!
//! ```text
//! Session / Attendance / Auth layers (above)  ← operate on these types
//!     ↕
//! Types layer (this crate)  ← pure data, no I/O
//! ```

mod identity;
mod ids;
mod record;
mod scan;
mod session;
mod store;

pub use identity::{Identity, Role};
pub use ids::{ClassId, RecordId, SessionId, StudentId};
pub use record::{AttendanceRecord, AttendanceStatus};
pub use scan::{ScanError, ScanPayload};
pub use session::{Coordinates, Session};
pub use store::StoreError;
