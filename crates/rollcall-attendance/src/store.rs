//! The attendance persistence collaborator.
//!
//! Same seam as the session store: a trait standing in for a remote
//! document collection, injected by the caller. The store's single
//! non-negotiable duty is **key uniqueness** — [`insert_new`] must
//! reject a second record with an id that already exists, because the
//! record id is derived from the (session, student) pair and that
//! rejection is what enforces at-most-one-record-per-student.
//!
//! [`insert_new`]: AttendanceStore::insert_new

use rollcall_types::{AttendanceRecord, ClassId, RecordId, SessionId, StoreError, StudentId};
use tokio::sync::mpsc;

/// Fields the client supplies for a new record. The id is derived, the
/// timestamp is store-assigned, the status is always `Present`.
#[derive(Debug, Clone)]
pub struct NewAttendanceRecord {
    pub session_id: SessionId,
    pub class_id: ClassId,
    pub student_id: StudentId,
    pub student_name: String,
    pub roll_no: String,
    pub distance_meters: f64,
}

impl NewAttendanceRecord {
    /// The deterministic id this record will be stored under.
    pub fn record_id(&self) -> RecordId {
        RecordId::for_attendance(&self.session_id, &self.student_id)
    }
}

/// Document-store operations the attendance layer needs.
pub trait AttendanceStore: Send + Sync + 'static {
    /// Fetches a record by id. `Ok(None)` means no such document.
    fn find_record(
        &self,
        id: &RecordId,
    ) -> impl std::future::Future<Output = Result<Option<AttendanceRecord>, StoreError>> + Send;

    /// Inserts a record under its derived id, failing with
    /// [`StoreError::Conflict`] if a record with that id already
    /// exists. Returns the persisted record with its store-assigned
    /// timestamp.
    fn insert_new(
        &self,
        new: NewAttendanceRecord,
    ) -> impl std::future::Future<Output = Result<AttendanceRecord, StoreError>> + Send;

    /// All records for a class, newest first.
    fn records_for_class(
        &self,
        class_id: &ClassId,
    ) -> impl std::future::Future<Output = Result<Vec<AttendanceRecord>, StoreError>> + Send;

    /// Subscribes to records inserted for a session after the call.
    /// The admin dashboard drains this to show arrivals live; dropping
    /// the receiver ends the subscription.
    fn subscribe(
        &self,
        session_id: &SessionId,
    ) -> impl std::future::Future<Output = Result<mpsc::Receiver<AttendanceRecord>, StoreError>> + Send;
}
