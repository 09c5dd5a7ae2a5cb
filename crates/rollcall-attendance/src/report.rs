//! Per-student attendance summaries and CSV export.
//!
//! Absences are derived, not stored: a student with records for 7 of a
//! class's 10 sessions has 3 absences. The caller supplies the total
//! session count; this module only folds records.

use std::collections::BTreeMap;

use rollcall_types::{AttendanceRecord, StudentId};

/// Absence count at which a student's standing flips to `Critical`.
pub const CRITICAL_ABSENCES: u32 = 4;

/// Where a student stands for the reporting period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Standing {
    Good,
    Critical,
}

impl Standing {
    fn for_absences(absences: u32) -> Self {
        if absences >= CRITICAL_ABSENCES {
            Standing::Critical
        } else {
            Standing::Good
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Standing::Good => "Good",
            Standing::Critical => "Critical",
        }
    }
}

/// One student's attendance over a reporting period.
#[derive(Debug, Clone, PartialEq)]
pub struct StudentSummary {
    pub student_id: StudentId,
    pub student_name: String,
    pub roll_no: String,
    pub sessions_attended: u32,
    pub absences: u32,
    /// Percentage of sessions attended, 0.0 when there were none.
    pub attendance_percent: f64,
    pub standing: Standing,
}

/// Folds a class's records into per-student summaries.
///
/// `total_sessions` is the number of sessions held in the period.
/// Records beyond that count (shouldn't happen, but a student can't
/// attend more sessions than were held) are clamped. Output is sorted
/// by roll number, then name, so the report is stable across runs.
pub fn summarize(records: &[AttendanceRecord], total_sessions: u32) -> Vec<StudentSummary> {
    struct Acc {
        name: String,
        roll_no: String,
        attended: u32,
    }

    let mut by_student: BTreeMap<String, Acc> = BTreeMap::new();
    for record in records {
        by_student
            .entry(record.student_id.0.clone())
            .and_modify(|acc| acc.attended += 1)
            .or_insert_with(|| Acc {
                name: record.student_name.clone(),
                roll_no: record.roll_no.clone(),
                attended: 1,
            });
    }

    let mut summaries: Vec<StudentSummary> = by_student
        .into_iter()
        .map(|(id, acc)| {
            let attended = acc.attended.min(total_sessions);
            let absences = total_sessions - attended;
            let percent = if total_sessions == 0 {
                0.0
            } else {
                f64::from(attended) / f64::from(total_sessions) * 100.0
            };
            StudentSummary {
                student_id: StudentId(id),
                student_name: acc.name,
                roll_no: acc.roll_no,
                sessions_attended: attended,
                absences,
                attendance_percent: percent,
                standing: Standing::for_absences(absences),
            }
        })
        .collect();

    summaries.sort_by(|a, b| {
        a.roll_no
            .cmp(&b.roll_no)
            .then_with(|| a.student_name.cmp(&b.student_name))
    });
    summaries
}

/// Renders summaries as CSV with a fixed header row. Percentages are
/// printed with one decimal place.
pub fn to_csv(summaries: &[StudentSummary]) -> String {
    let mut out = String::from("Name,Roll No,Attendance %,Absences,Status\n");
    for s in summaries {
        out.push_str(&csv_field(&s.student_name));
        out.push(',');
        out.push_str(&csv_field(&s.roll_no));
        out.push(',');
        out.push_str(&format!("{:.1}", s.attendance_percent));
        out.push(',');
        out.push_str(&s.absences.to_string());
        out.push(',');
        out.push_str(s.standing.as_str());
        out.push('\n');
    }
    out
}

/// Quotes a field if it contains a comma, quote, or newline.
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use rollcall_types::{
        AttendanceStatus, ClassId, RecordId, SessionId,
    };

    use super::*;

    fn record(session: &str, student: &str, name: &str, roll: &str) -> AttendanceRecord {
        let session_id = SessionId(session.into());
        let student_id = StudentId(student.into());
        AttendanceRecord {
            id: RecordId::for_attendance(&session_id, &student_id),
            session_id,
            class_id: ClassId("CS101".into()),
            student_id,
            student_name: name.into(),
            roll_no: roll.into(),
            timestamp: Utc::now(),
            distance_meters: 5.0,
            status: AttendanceStatus::Present,
        }
    }

    // =====================================================================
    // summarize()
    // =====================================================================

    #[test]
    fn test_summarize_counts_per_student() {
        let records = vec![
            record("s1", "u1", "Asha K", "01"),
            record("s2", "u1", "Asha K", "01"),
            record("s1", "u2", "Ben T", "02"),
        ];
        let summaries = summarize(&records, 2);
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].roll_no, "01");
        assert_eq!(summaries[0].sessions_attended, 2);
        assert_eq!(summaries[0].absences, 0);
        assert_eq!(summaries[1].sessions_attended, 1);
        assert_eq!(summaries[1].absences, 1);
    }

    #[test]
    fn test_summarize_percentage() {
        let records = vec![
            record("s1", "u1", "Asha K", "01"),
            record("s2", "u1", "Asha K", "01"),
            record("s3", "u1", "Asha K", "01"),
        ];
        let summaries = summarize(&records, 4);
        assert_eq!(summaries[0].attendance_percent, 75.0);
    }

    #[test]
    fn test_summarize_standing_flips_at_four_absences() {
        let three = summarize(&[record("s1", "u1", "A", "01")], 4);
        assert_eq!(three[0].absences, 3);
        assert_eq!(three[0].standing, Standing::Good);

        let four = summarize(&[record("s1", "u1", "A", "01")], 5);
        assert_eq!(four[0].absences, 4);
        assert_eq!(four[0].standing, Standing::Critical);
    }

    #[test]
    fn test_summarize_zero_sessions_is_zero_percent() {
        let summaries = summarize(&[], 0);
        assert!(summaries.is_empty());
    }

    #[test]
    fn test_summarize_clamps_attended_to_total() {
        let records = vec![
            record("s1", "u1", "A", "01"),
            record("s2", "u1", "A", "01"),
        ];
        let summaries = summarize(&records, 1);
        assert_eq!(summaries[0].sessions_attended, 1);
        assert_eq!(summaries[0].absences, 0);
    }

    #[test]
    fn test_summarize_sorted_by_roll_no() {
        let records = vec![
            record("s1", "u2", "Zed", "09"),
            record("s1", "u1", "Asha", "02"),
        ];
        let summaries = summarize(&records, 1);
        assert_eq!(summaries[0].roll_no, "02");
        assert_eq!(summaries[1].roll_no, "09");
    }

    // =====================================================================
    // to_csv()
    // =====================================================================

    #[test]
    fn test_csv_header_and_rows() {
        let records = vec![
            record("s1", "u1", "Asha K", "01"),
            record("s2", "u1", "Asha K", "01"),
            record("s1", "u2", "Ben T", "02"),
        ];
        let csv = to_csv(&summarize(&records, 2));
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "Name,Roll No,Attendance %,Absences,Status");
        assert_eq!(lines[1], "Asha K,01,100.0,0,Good");
        assert_eq!(lines[2], "Ben T,02,50.0,1,Good");
    }

    #[test]
    fn test_csv_critical_row() {
        let csv = to_csv(&summarize(&[record("s1", "u1", "Asha K", "01")], 6));
        assert!(csv.contains("Asha K,01,16.7,5,Critical"));
    }

    #[test]
    fn test_csv_escapes_commas_and_quotes() {
        let csv = to_csv(&summarize(
            &[record("s1", "u1", "K, Asha \"AK\"", "01")],
            1,
        ));
        assert!(csv.contains("\"K, Asha \"\"AK\"\"\",01,100.0,0,Good"));
    }
}
