//! A complete classroom run against the in-memory store: start a
//! session, watch the QR token rotate, scan from inside and outside the
//! fence, then print the attendance report.
//!
//! Run with `RUST_LOG=rollcall=debug` to watch the rotation runner.

use std::sync::Arc;
use std::time::Duration;

use rollcall::prelude::*;
use rollcall::{AttendanceStore, IdentityProvider, RotationConfig, SessionConfig};
use tracing_subscriber::EnvFilter;

/// One degree of latitude in meters (spherical model).
const METERS_PER_DEG_LAT: f64 = 6_371_000.0 * std::f64::consts::PI / 180.0;

const LECTURE_HALL: Coordinates = Coordinates {
    lat: 12.9716,
    lng: 77.5946,
};

fn seats_away(meters: f64) -> Coordinates {
    Coordinates::new(LECTURE_HALL.lat + meters / METERS_PER_DEG_LAT, LECTURE_HALL.lng)
}

async fn scan(
    store: &Arc<MemoryStore>,
    handle: &SessionHandle,
    from: Coordinates,
    who: &Identity,
    roll: &str,
) -> Result<AttendanceRecord, AttendanceError> {
    let view = handle.view().borrow().clone();
    let url = ScanPayload::new(view.session_id, view.token).to_url("https://rollcall.example.edu");
    println!("  {} scans {url}", who.display_name);

    let recorder = AttendanceRecorder::new(
        Arc::clone(store),
        Arc::clone(store),
        Arc::new(FixedLocation::new(from)),
        RecorderConfig::default(),
    );
    let parsed = ScanPayload::parse_url(&url).expect("we rendered this URL");
    recorder.record(&parsed, who, roll).await
}

#[tokio::main]
async fn main() -> Result<(), RollcallError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let store = Arc::new(MemoryStore::new());

    // Sign in as the professor; the allow-list makes them admin.
    let provider = StaticIdentityProvider::new(Identity::new(
        StudentId("prof-1".into()),
        "prof@example.edu",
        "Prof. Rao",
    ));
    let prof = provider.sign_in().await?;
    let resolver = RoleResolver::new(
        Arc::clone(&store),
        AdminAllowList::new(["prof@example.edu"]),
    );
    let role = resolver.resolve(&prof).await?;
    println!("{} signed in as {role}", prof.display_name);

    // Fast rotation so the demo doesn't sit on an 11 s timer.
    let manager = SessionManager::new(
        Arc::clone(&store),
        Arc::new(FixedLocation::new(LECTURE_HALL)),
        SessionConfig {
            rotation: RotationConfig { interval_secs: 2 },
            ..SessionConfig::default()
        },
    );
    let handle = manager.start(ClassId("CS101".into()), 100.0).await?;
    println!("session {} started, fence radius 100 m", handle.session_id());

    let mut arrivals = store.subscribe(handle.session_id()).await
        .map_err(rollcall::SessionError::from)?;

    let asha = Identity::new(StudentId("u1".into()), "asha@example.edu", "Asha K");
    let ben = Identity::new(StudentId("u2".into()), "ben@example.edu", "Ben T");

    // Asha is in the third row; Ben is in the cafeteria.
    let record = scan(&store, &handle, seats_away(15.0), &asha, "21BCS042").await?;
    println!("  marked present at {:.0} m", record.distance_meters);
    match scan(&store, &handle, seats_away(250.0), &ben, "21BCS077").await {
        Err(err) => println!("  rejected: {err}"),
        Ok(_) => unreachable!("250 m is outside the fence"),
    }

    // Asha tries again after the token rotates: first the old frame is
    // rejected as expired, then the duplicate check catches her.
    let stale = {
        let view = handle.view().borrow().clone();
        ScanPayload::new(view.session_id, view.token)
    };
    tokio::time::sleep(Duration::from_secs(3)).await;
    let recorder = AttendanceRecorder::new(
        Arc::clone(&store),
        Arc::clone(&store),
        Arc::new(FixedLocation::new(seats_away(15.0))),
        RecorderConfig::default(),
    );
    match recorder.record(&stale, &asha, "21BCS042").await {
        Err(err) => println!("  stale frame: {err}"),
        Ok(_) => unreachable!("the token rotated"),
    }
    match scan(&store, &handle, seats_away(15.0), &asha, "21BCS042").await {
        Err(err) => println!("  repeat scan: {err}"),
        Ok(_) => unreachable!("already marked"),
    }

    if let Some(arrival) = arrivals.recv().await {
        println!("live feed: {} ({})", arrival.student_name, arrival.roll_no);
    }

    handle.stop().await?;
    println!("session stopped");

    let records = store.records_for_class(&ClassId("CS101".into())).await
        .map_err(rollcall::SessionError::from)?;
    let csv = report::to_csv(&report::summarize(&records, 1));
    println!("\nmonthly report:\n{csv}");

    provider.sign_out().await?;
    Ok(())
}
