//! # Rollcall
//!
//! Client core for geofenced QR-code attendance.
//!
//! An admin starts a session anchored to their physical location; the
//! session's QR code rotates on a short cadence; students scan it and
//! are marked present only if the token is current and a fresh location
//! fix places them inside the geofence. At most one record exists per
//! (session, student) pair, enforced at the storage layer.
//!
//! This meta-crate re-exports the sub-crates behind one dependency and
//! ships [`MemoryStore`], an in-memory implementation of every
//! persistence collaborator, for tests and demos.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use rollcall::prelude::*;
//!
//! # async fn demo() -> Result<(), RollcallError> {
//! let store = Arc::new(MemoryStore::new());
//! let here = Arc::new(FixedLocation::new(Coordinates::new(12.9716, 77.5946)));
//!
//! let manager = SessionManager::new(Arc::clone(&store), Arc::clone(&here), SessionConfig::default());
//! let handle = manager.start(ClassId("CS101".into()), 100.0).await?;
//!
//! let recorder = AttendanceRecorder::new(
//!     Arc::clone(&store),
//!     Arc::clone(&store),
//!     here,
//!     RecorderConfig::default(),
//! );
//! let view = handle.view().borrow().clone();
//! let scan = ScanPayload { session_id: view.session_id, token: view.token };
//! let student = Identity::new(StudentId("u1".into()), "asha@example.edu", "Asha K");
//! let record = recorder.record(&scan, &student, "21BCS042").await?;
//! # Ok(())
//! # }
//! ```

mod error;
mod memory;

pub use error::RollcallError;
pub use memory::{FixedLocation, MemoryStore, StaticIdentityProvider};

pub use rollcall_attendance::{
    report, AttendanceError, AttendanceRecorder, AttendanceStore, NewAttendanceRecord,
    RecorderConfig,
};
pub use rollcall_auth::{
    decide, AccessDecision, AdminAllowList, AuthError, AuthEvent, IdentityProvider,
    RoleResolver, RoleStore, RouteSpec, SIGN_IN_PATH, UNAUTHORIZED_PATH,
};
pub use rollcall_geo::{distance_meters, GeoError, Geofence, LocationSource};
pub use rollcall_rotation::{next_token, ClockTick, RotationClock, RotationConfig, TOKEN_LEN};
pub use rollcall_session::{
    NewSession, SessionConfig, SessionError, SessionHandle, SessionManager, SessionStore,
    SessionView,
};
pub use rollcall_types::{
    AttendanceRecord, AttendanceStatus, ClassId, Coordinates, Identity, RecordId, Role,
    ScanError, ScanPayload, Session, SessionId, StoreError, StudentId,
};

/// One-line import for applications.
pub mod prelude {
    pub use crate::{
        decide, report, AccessDecision, AdminAllowList, AttendanceError, AttendanceRecord,
        AttendanceRecorder, AuthEvent, ClassId, Coordinates, FixedLocation, Geofence, Identity,
        MemoryStore, RecorderConfig, RollcallError, Role, RoleResolver, RouteSpec, ScanPayload,
        SessionConfig, SessionHandle, SessionId, SessionManager, SessionView,
        StaticIdentityProvider, StudentId,
    };
}
