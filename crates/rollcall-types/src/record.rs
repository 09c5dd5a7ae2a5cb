//! The persisted attendance record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{ClassId, RecordId, SessionId, StudentId};

/// Attendance outcome stored on a record.
///
/// Only `Present` exists today — absences are derived, never stored
/// (a student with no record for a session was absent).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttendanceStatus {
    Present,
}

/// One student's verified attendance for one session.
///
/// Created at most once per (session, student) pair — the
/// [`RecordId`](crate::RecordId) is derived from exactly that pair, so
/// the store's key uniqueness enforces the invariant even under racing
/// writes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    pub id: RecordId,
    pub session_id: SessionId,
    pub class_id: ClassId,
    pub student_id: StudentId,
    pub student_name: String,
    pub roll_no: String,
    /// Store-assigned timestamp, never the scanning device's clock.
    pub timestamp: DateTime<Utc>,
    /// Verified distance from the session center at scan time.
    pub distance_meters: f64,
    pub status: AttendanceStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> AttendanceRecord {
        let session = SessionId("s1".into());
        let student = StudentId("u1".into());
        AttendanceRecord {
            id: RecordId::for_attendance(&session, &student),
            session_id: session,
            class_id: ClassId("CS101".into()),
            student_id: student,
            student_name: "Asha K".into(),
            roll_no: "21BCS042".into(),
            timestamp: Utc::now(),
            distance_meters: 12.4,
            status: AttendanceStatus::Present,
        }
    }

    #[test]
    fn test_record_round_trips_through_json() {
        let record = sample();
        let json = serde_json::to_string(&record).unwrap();
        let decoded: AttendanceRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(record, decoded);
    }

    #[test]
    fn test_status_serializes_as_present() {
        let json = serde_json::to_value(AttendanceStatus::Present).unwrap();
        assert_eq!(json, "Present");
    }
}
