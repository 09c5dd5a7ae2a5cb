//! The attendance recorder: the student-facing entry point.

use std::sync::Arc;
use std::time::Duration;

use rollcall_geo::{distance_meters, Geofence, LocationSource};
use rollcall_session::SessionStore;
use rollcall_types::{AttendanceRecord, Identity, ScanPayload, Session, StoreError};
use tracing::{info, warn};

use crate::store::{AttendanceStore, NewAttendanceRecord};
use crate::AttendanceError;

/// Configuration for attendance recording.
#[derive(Debug, Clone)]
pub struct RecorderConfig {
    /// Bound on every individual store call.
    ///
    /// Default: 10 seconds.
    pub store_timeout: Duration,

    /// Extra attempts a failed store *read* gets. Reads are safe to
    /// retry blindly; the final insert is never retried here — a
    /// conflict on retry would be indistinguishable from a real
    /// duplicate.
    ///
    /// Default: 2.
    pub max_read_retries: u32,
}

impl Default for RecorderConfig {
    fn default() -> Self {
        Self {
            store_timeout: Duration::from_secs(10),
            max_read_retries: 2,
        }
    }
}

impl RecorderConfig {
    /// Clamps out-of-range values so the config is safe to use.
    pub fn validated(mut self) -> Self {
        if self.store_timeout.is_zero() {
            warn!("store_timeout of 0 raised to 1s");
            self.store_timeout = Duration::from_secs(1);
        }
        self
    }
}

/// Verifies a scan and records attendance.
///
/// The checks run in rejection-priority order, cheapest first, each one
/// against **fresh** state:
///
/// 1. session exists and is active,
/// 2. the scanned token is the session's *current* token (re-fetched,
///    not the one baked into the QR at render time),
/// 3. a fresh location fix falls inside the geofence,
/// 4. no record exists yet for this (session, student).
///
/// Step 4 is advisory — the real guarantee is the store's key
/// uniqueness on the derived record id, which turns a racing duplicate
/// into [`StoreError::Conflict`] and from there into
/// [`AttendanceError::AlreadyMarked`].
pub struct AttendanceRecorder<SS, AS, L> {
    sessions: Arc<SS>,
    records: Arc<AS>,
    location: Arc<L>,
    config: RecorderConfig,
}

impl<SS, AS, L> AttendanceRecorder<SS, AS, L>
where
    SS: SessionStore,
    AS: AttendanceStore,
    L: LocationSource,
{
    pub fn new(
        sessions: Arc<SS>,
        records: Arc<AS>,
        location: Arc<L>,
        config: RecorderConfig,
    ) -> Self {
        Self {
            sessions,
            records,
            location,
            config: config.validated(),
        }
    }

    /// Records attendance for one scan.
    ///
    /// On success the persisted record (with its store-assigned
    /// timestamp) is returned. Every rejection path is reported through
    /// [`AttendanceError`]; see [`AttendanceError::is_rejection`] for
    /// which variants are expected outcomes versus faults.
    pub async fn record(
        &self,
        scan: &ScanPayload,
        identity: &Identity,
        roll_no: &str,
    ) -> Result<AttendanceRecord, AttendanceError> {
        let session = self.fetch_session(scan).await?;

        if !session.active {
            return Err(AttendanceError::SessionInactive(session.id));
        }
        if session.current_token != scan.token {
            return Err(AttendanceError::TokenExpired(session.id));
        }

        // Location is acquired only after the cheap checks pass — a
        // fix can take seconds and prompts the user for permission.
        let position = self.location.current_position().await?;
        let fence = Geofence::new(session.center, session.radius_meters);
        let distance = distance_meters(position, fence.center)?;
        if !fence.is_within(distance) {
            info!(
                session_id = %session.id,
                student_id = %identity.id,
                distance_m = distance,
                radius_m = session.radius_meters,
                "scan rejected: out of range"
            );
            return Err(AttendanceError::OutOfRange {
                distance_meters: distance,
                allowed_radius_meters: session.radius_meters,
            });
        }

        let new = NewAttendanceRecord {
            session_id: session.id.clone(),
            class_id: session.class_id.clone(),
            student_id: identity.id.clone(),
            student_name: identity.display_name.clone(),
            roll_no: roll_no.to_string(),
            distance_meters: distance,
        };
        let record_id = new.record_id();

        // Pre-check for the common repeat-scan case, so it reads its
        // own earlier record instead of bouncing off a conflict.
        if let Some(prior) = self
            .retried_read(|| self.records.find_record(&record_id))
            .await?
        {
            return Err(AttendanceError::AlreadyMarked(Box::new(prior)));
        }

        match bounded(self.config.store_timeout, self.records.insert_new(new)).await {
            Ok(record) => {
                info!(
                    session_id = %record.session_id,
                    student_id = %record.student_id,
                    distance_m = record.distance_meters,
                    "attendance recorded"
                );
                Ok(record)
            }
            // Lost a race with another write for the same pair. The
            // prior record is authoritative; surface it.
            Err(StoreError::Conflict) => {
                let prior = self
                    .retried_read(|| self.records.find_record(&record_id))
                    .await?
                    .ok_or(StoreError::Conflict)?;
                Err(AttendanceError::AlreadyMarked(Box::new(prior)))
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Fetches the scanned session, retrying transient read failures.
    async fn fetch_session(&self, scan: &ScanPayload) -> Result<Session, AttendanceError> {
        self.retried_read(|| self.sessions.fetch(&scan.session_id))
            .await?
            .ok_or_else(|| AttendanceError::SessionNotFound(scan.session_id.clone()))
    }

    /// Runs one bounded store read, retrying retryable failures up to
    /// `max_read_retries` extra times.
    async fn retried_read<T, F, Fut>(&self, mut call: F) -> Result<T, StoreError>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = Result<T, StoreError>>,
    {
        let mut attempt = 0;
        loop {
            match bounded(self.config.store_timeout, call()).await {
                Ok(value) => return Ok(value),
                Err(err) if err.is_retryable() && attempt < self.config.max_read_retries => {
                    attempt += 1;
                    warn!(%err, attempt, "store read failed, retrying");
                }
                Err(err) => return Err(err),
            }
        }
    }
}

/// Applies the layer's bounded-timeout policy to one store call.
async fn bounded<T>(
    limit: Duration,
    call: impl std::future::Future<Output = Result<T, StoreError>>,
) -> Result<T, StoreError> {
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result,
        Err(_) => Err(StoreError::Timeout),
    }
}
