//! End-to-end workflows over the in-memory store: the full
//! start → rotate → scan → report path, with paused Tokio time.

use std::sync::Arc;

use rollcall::prelude::*;
use rollcall::{
    AccessDecision, AttendanceStore, FixedLocation, RecorderConfig, RotationConfig,
    SessionConfig, UNAUTHORIZED_PATH,
};
use rollcall_types::StoreError;

/// Meters per degree of latitude on the spherical model.
const METERS_PER_DEG_LAT: f64 = 6_371_000.0 * std::f64::consts::PI / 180.0;

const CENTER: Coordinates = Coordinates {
    lat: 12.9716,
    lng: 77.5946,
};

fn config() -> SessionConfig {
    SessionConfig {
        rotation: RotationConfig { interval_secs: 11 },
        ..SessionConfig::default()
    }
}

fn offset_north(meters: f64) -> Coordinates {
    Coordinates::new(CENTER.lat + meters / METERS_PER_DEG_LAT, CENTER.lng)
}

fn student(id: &str, name: &str) -> Identity {
    Identity::new(StudentId(id.into()), format!("{id}@example.edu"), name)
}

fn recorder_at(
    store: &Arc<MemoryStore>,
    at: Coordinates,
) -> AttendanceRecorder<MemoryStore, MemoryStore, FixedLocation> {
    AttendanceRecorder::new(
        Arc::clone(store),
        Arc::clone(store),
        Arc::new(FixedLocation::new(at)),
        RecorderConfig::default(),
    )
}

async fn start_session(store: &Arc<MemoryStore>) -> SessionHandle {
    let manager = SessionManager::new(
        Arc::clone(store),
        Arc::new(FixedLocation::new(CENTER)),
        config(),
    );
    manager.start(ClassId("CS101".into()), 100.0).await.unwrap()
}

fn current_scan(handle: &SessionHandle) -> ScanPayload {
    let view = handle.view().borrow().clone();
    ScanPayload::new(view.session_id, view.token)
}

/// Waits for the next rotation, returning the fresh token.
async fn next_rotation(handle: &SessionHandle) -> String {
    let mut view = handle.view();
    let from = view.borrow().token.clone();
    loop {
        view.changed().await.expect("runner gone");
        let current = view.borrow().token.clone();
        if current != from {
            return current;
        }
    }
}

// =========================================================================
// Scan outcomes
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_in_range_scan_with_current_token_marks_present() {
    let store = Arc::new(MemoryStore::new());
    let handle = start_session(&store).await;

    let record = recorder_at(&store, offset_north(20.0))
        .record(&current_scan(&handle), &student("u1", "Asha K"), "01")
        .await
        .unwrap();

    assert_eq!(&record.session_id, handle.session_id());
    assert!(record.distance_meters < 100.0);
    assert_eq!(store.record_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_token_scanned_before_rotation_fails_verification_after_it() {
    let store = Arc::new(MemoryStore::new());
    let handle = start_session(&store).await;

    // Scan captured at t=0; verification arrives after the 11 s rotation.
    let stale = current_scan(&handle);
    let fresh_token = next_rotation(&handle).await;
    assert_ne!(stale.token, fresh_token);

    let recorder = recorder_at(&store, offset_north(20.0));
    let err = recorder
        .record(&stale, &student("u1", "Asha K"), "01")
        .await
        .unwrap_err();
    assert!(matches!(err, AttendanceError::TokenExpired(_)));

    // Re-scanning the live frame succeeds.
    recorder
        .record(&current_scan(&handle), &student("u1", "Asha K"), "01")
        .await
        .unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_out_of_range_scan_rejected() {
    let store = Arc::new(MemoryStore::new());
    let handle = start_session(&store).await;

    let err = recorder_at(&store, offset_north(150.0))
        .record(&current_scan(&handle), &student("u1", "Asha K"), "01")
        .await
        .unwrap_err();

    match err {
        AttendanceError::OutOfRange {
            distance_meters,
            allowed_radius_meters,
        } => {
            assert!((distance_meters - 150.0).abs() < 1.0);
            assert_eq!(allowed_radius_meters, 100.0);
        }
        other => panic!("expected OutOfRange, got {other:?}"),
    }
    assert_eq!(store.record_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_repeat_scan_reports_already_marked() {
    let store = Arc::new(MemoryStore::new());
    let handle = start_session(&store).await;
    let recorder = recorder_at(&store, offset_north(20.0));

    let first = recorder
        .record(&current_scan(&handle), &student("u1", "Asha K"), "01")
        .await
        .unwrap();
    let err = recorder
        .record(&current_scan(&handle), &student("u1", "Asha K"), "01")
        .await
        .unwrap_err();

    match err {
        AttendanceError::AlreadyMarked(prior) => assert_eq!(*prior, first),
        other => panic!("expected AlreadyMarked, got {other:?}"),
    }
    assert_eq!(store.record_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_scan_after_stop_is_rejected_as_inactive() {
    let store = Arc::new(MemoryStore::new());
    let handle = start_session(&store).await;
    let scan = current_scan(&handle);

    handle.stop().await.unwrap();

    let err = recorder_at(&store, offset_north(20.0))
        .record(&scan, &student("u1", "Asha K"), "01")
        .await
        .unwrap_err();
    assert!(matches!(err, AttendanceError::SessionInactive(_)));
}

#[tokio::test(start_paused = true)]
async fn test_superseded_session_rejects_scans() {
    let store = Arc::new(MemoryStore::new());
    let first = start_session(&store).await;
    let old_scan = current_scan(&first);

    // A second start for the same class deactivates the first session.
    let second = start_session(&store).await;
    assert_ne!(first.session_id(), second.session_id());

    let err = recorder_at(&store, offset_north(20.0))
        .record(&old_scan, &student("u1", "Asha K"), "01")
        .await
        .unwrap_err();
    assert!(matches!(err, AttendanceError::SessionInactive(_)));
}

#[tokio::test(start_paused = true)]
async fn test_unknown_session_rejected() {
    let store = Arc::new(MemoryStore::new());
    let scan = ScanPayload::new(SessionId("never-created".into()), "tok");

    let err = recorder_at(&store, offset_north(20.0))
        .record(&scan, &student("u1", "Asha K"), "01")
        .await
        .unwrap_err();
    assert!(matches!(err, AttendanceError::SessionNotFound(_)));
}

// =========================================================================
// QR URL round trip
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_scanned_url_feeds_the_recorder() {
    let store = Arc::new(MemoryStore::new());
    let handle = start_session(&store).await;

    let url = current_scan(&handle).to_url("https://rollcall.example.edu");
    let scan = ScanPayload::parse_url(&url).unwrap();

    recorder_at(&store, offset_north(20.0))
        .record(&scan, &student("u1", "Asha K"), "01")
        .await
        .unwrap();
}

// =========================================================================
// Live feed and reporting
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_admin_feed_sees_arrivals_live() {
    let store = Arc::new(MemoryStore::new());
    let handle = start_session(&store).await;
    let mut feed = store.subscribe(handle.session_id()).await.unwrap();

    recorder_at(&store, offset_north(20.0))
        .record(&current_scan(&handle), &student("u1", "Asha K"), "01")
        .await
        .unwrap();

    let arrival = feed.recv().await.unwrap();
    assert_eq!(arrival.student_name, "Asha K");
}

#[tokio::test(start_paused = true)]
async fn test_report_over_recorded_sessions() {
    let store = Arc::new(MemoryStore::new());
    let asha = student("u1", "Asha K");
    let ben = student("u2", "Ben T");

    // Two sessions; Asha attends both, Ben only the first.
    for attendees in [vec![(&asha, "01"), (&ben, "02")], vec![(&asha, "01")]] {
        let handle = start_session(&store).await;
        let recorder = recorder_at(&store, offset_north(20.0));
        for (who, roll) in attendees {
            recorder
                .record(&current_scan(&handle), who, roll)
                .await
                .unwrap();
        }
        handle.stop().await.unwrap();
    }

    let records = store
        .records_for_class(&ClassId("CS101".into()))
        .await
        .unwrap();
    let csv = report::to_csv(&report::summarize(&records, 2));
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines[0], "Name,Roll No,Attendance %,Absences,Status");
    assert_eq!(lines[1], "Asha K,01,100.0,0,Good");
    assert_eq!(lines[2], "Ben T,02,50.0,1,Good");
}

// =========================================================================
// Roles and routing
// =========================================================================

#[tokio::test]
async fn test_admin_role_assigned_once_and_kept() {
    let store = Arc::new(MemoryStore::new());
    let prof = student("prof", "Prof P");

    let listed = RoleResolver::new(
        Arc::clone(&store),
        AdminAllowList::new(["prof@example.edu"]),
    );
    assert_eq!(listed.resolve(&prof).await.unwrap(), Role::Admin);

    // The allow-list changes; the stored role does not.
    let delisted = RoleResolver::new(Arc::clone(&store), AdminAllowList::default());
    assert_eq!(delisted.resolve(&prof).await.unwrap(), Role::Admin);
}

#[tokio::test]
async fn test_role_gate_routes_by_resolved_role() {
    let store = Arc::new(MemoryStore::new());
    let resolver = RoleResolver::new(
        Arc::clone(&store),
        AdminAllowList::new(["prof@example.edu"]),
    );
    let admin_route = RouteSpec::role_gated("/admin", Role::Admin);

    let prof = student("prof", "Prof P");
    let prof_role = resolver.resolve(&prof).await.unwrap();
    assert_eq!(
        decide(&admin_route, Some(&prof), prof_role, false, None),
        AccessDecision::Allow
    );

    let asha = student("u1", "Asha K");
    let asha_role = resolver.resolve(&asha).await.unwrap();
    assert_eq!(
        decide(&admin_route, Some(&asha), asha_role, false, None),
        AccessDecision::RedirectTo(UNAUTHORIZED_PATH.to_string())
    );
}

// =========================================================================
// Store fault surfaces
// =========================================================================

#[tokio::test]
async fn test_role_store_error_surfaces_as_rollcall_error() {
    // The meta error type converts sub-crate errors via `?`.
    fn as_rollcall(err: rollcall::AuthError) -> RollcallError {
        err.into()
    }
    let err = as_rollcall(rollcall::AuthError::RoleLookupFailed(StoreError::Timeout));
    assert!(matches!(err, RollcallError::Auth(_)));
}
