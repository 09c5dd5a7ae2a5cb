//! In-memory implementations of every collaborator seam.
//!
//! [`MemoryStore`] stands in for the remote document store in tests and
//! demos. It honors the same contracts production stores must: assigned
//! timestamps come from the store side, deactivation is idempotent, and
//! [`insert_new`](AttendanceStore::insert_new) enforces key uniqueness
//! under a single lock, so racing duplicate writes genuinely conflict.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use rollcall_attendance::{AttendanceStore, NewAttendanceRecord};
use rollcall_auth::{AuthError, AuthEvent, IdentityProvider, RoleStore};
use rollcall_geo::{GeoError, LocationSource};
use rollcall_session::{NewSession, SessionStore};
use rollcall_types::{
    AttendanceRecord, AttendanceStatus, ClassId, Coordinates, Identity, RecordId, Role, Session,
    SessionId, StoreError, StudentId,
};
use tokio::sync::mpsc;

#[derive(Default)]
struct Inner {
    sessions: HashMap<SessionId, Session>,
    records: HashMap<RecordId, AttendanceRecord>,
    roles: HashMap<StudentId, Role>,
    watchers: HashMap<SessionId, Vec<mpsc::Sender<AttendanceRecord>>>,
}

/// An in-memory document store implementing [`SessionStore`],
/// [`AttendanceStore`], and [`RoleStore`].
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of a stored session, for assertions.
    pub fn session(&self, id: &SessionId) -> Option<Session> {
        self.inner.lock().unwrap().sessions.get(id).cloned()
    }

    /// Number of stored attendance records.
    pub fn record_count(&self) -> usize {
        self.inner.lock().unwrap().records.len()
    }
}

impl SessionStore for MemoryStore {
    async fn create(&self, new: NewSession) -> Result<Session, StoreError> {
        let now = Utc::now();
        let session = Session {
            id: new.id.clone(),
            class_id: new.class_id,
            active: true,
            current_token: new.initial_token,
            center: new.center,
            radius_meters: new.radius_meters,
            created_at: now,
            last_rotation_at: now,
        };
        self.inner
            .lock()
            .unwrap()
            .sessions
            .insert(new.id, session.clone());
        Ok(session)
    }

    async fn fetch(&self, id: &SessionId) -> Result<Option<Session>, StoreError> {
        Ok(self.inner.lock().unwrap().sessions.get(id).cloned())
    }

    async fn find_active(&self, class_id: &ClassId) -> Result<Option<Session>, StoreError> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .sessions
            .values()
            .find(|s| s.active && &s.class_id == class_id)
            .cloned())
    }

    async fn update_token(
        &self,
        id: &SessionId,
        token: &str,
    ) -> Result<DateTime<Utc>, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        let session = inner
            .sessions
            .get_mut(id)
            .ok_or_else(|| StoreError::Unavailable(format!("no session {id}")))?;
        session.current_token = token.to_string();
        let now = Utc::now();
        session.last_rotation_at = now;
        Ok(now)
    }

    async fn deactivate(&self, id: &SessionId) -> Result<(), StoreError> {
        if let Some(session) = self.inner.lock().unwrap().sessions.get_mut(id) {
            session.active = false;
        }
        Ok(())
    }
}

impl AttendanceStore for MemoryStore {
    async fn find_record(&self, id: &RecordId) -> Result<Option<AttendanceRecord>, StoreError> {
        Ok(self.inner.lock().unwrap().records.get(id).cloned())
    }

    async fn insert_new(&self, new: NewAttendanceRecord) -> Result<AttendanceRecord, StoreError> {
        let record = AttendanceRecord {
            id: new.record_id(),
            session_id: new.session_id,
            class_id: new.class_id,
            student_id: new.student_id,
            student_name: new.student_name,
            roll_no: new.roll_no,
            timestamp: Utc::now(),
            distance_meters: new.distance_meters,
            status: AttendanceStatus::Present,
        };

        let mut inner = self.inner.lock().unwrap();
        if inner.records.contains_key(&record.id) {
            return Err(StoreError::Conflict);
        }
        inner.records.insert(record.id.clone(), record.clone());

        // Fan out to live watchers; closed or full receivers are dropped.
        if let Some(watchers) = inner.watchers.get_mut(&record.session_id) {
            watchers.retain(|tx| tx.try_send(record.clone()).is_ok());
        }
        Ok(record)
    }

    async fn records_for_class(
        &self,
        class_id: &ClassId,
    ) -> Result<Vec<AttendanceRecord>, StoreError> {
        let mut records: Vec<AttendanceRecord> = self
            .inner
            .lock()
            .unwrap()
            .records
            .values()
            .filter(|r| &r.class_id == class_id)
            .cloned()
            .collect();
        records.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(records)
    }

    async fn subscribe(
        &self,
        session_id: &SessionId,
    ) -> Result<mpsc::Receiver<AttendanceRecord>, StoreError> {
        let (tx, rx) = mpsc::channel(64);
        self.inner
            .lock()
            .unwrap()
            .watchers
            .entry(session_id.clone())
            .or_default()
            .push(tx);
        Ok(rx)
    }
}

impl RoleStore for MemoryStore {
    async fn fetch_role(&self, id: &StudentId) -> Result<Option<Role>, StoreError> {
        Ok(self.inner.lock().unwrap().roles.get(id).copied())
    }

    async fn assign_role(&self, id: &StudentId, role: Role) -> Result<(), StoreError> {
        self.inner.lock().unwrap().roles.insert(id.clone(), role);
        Ok(())
    }
}

/// A location source that always reports the same position.
pub struct FixedLocation {
    position: Coordinates,
}

impl FixedLocation {
    pub fn new(position: Coordinates) -> Self {
        Self { position }
    }
}

impl LocationSource for FixedLocation {
    async fn current_position(&self) -> Result<Coordinates, GeoError> {
        Ok(self.position)
    }
}

/// An identity provider with one fixed identity, signed in on demand.
pub struct StaticIdentityProvider {
    identity: Identity,
    subscribers: Mutex<Vec<mpsc::Sender<AuthEvent>>>,
}

impl StaticIdentityProvider {
    pub fn new(identity: Identity) -> Self {
        Self {
            identity,
            subscribers: Mutex::new(Vec::new()),
        }
    }

    fn broadcast(&self, event: AuthEvent) {
        self.subscribers
            .lock()
            .unwrap()
            .retain(|tx| tx.try_send(event.clone()).is_ok());
    }
}

impl IdentityProvider for StaticIdentityProvider {
    async fn sign_in(&self) -> Result<Identity, AuthError> {
        self.broadcast(AuthEvent::SignedIn(self.identity.clone()));
        Ok(self.identity.clone())
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        self.broadcast(AuthEvent::SignedOut);
        Ok(())
    }

    async fn subscribe(&self) -> mpsc::Receiver<AuthEvent> {
        let (tx, rx) = mpsc::channel(16);
        self.subscribers.lock().unwrap().push(tx);
        rx
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_record(session: &str, student: &str) -> NewAttendanceRecord {
        NewAttendanceRecord {
            session_id: SessionId(session.into()),
            class_id: ClassId("CS101".into()),
            student_id: StudentId(student.into()),
            student_name: "Asha K".into(),
            roll_no: "01".into(),
            distance_meters: 5.0,
        }
    }

    #[tokio::test]
    async fn test_insert_new_conflicts_on_duplicate_pair() {
        let store = MemoryStore::new();
        store.insert_new(new_record("s1", "u1")).await.unwrap();
        let err = store.insert_new(new_record("s1", "u1")).await.unwrap_err();
        assert_eq!(err, StoreError::Conflict);
        assert_eq!(store.record_count(), 1);
    }

    #[tokio::test]
    async fn test_insert_new_allows_other_pairs() {
        let store = MemoryStore::new();
        store.insert_new(new_record("s1", "u1")).await.unwrap();
        store.insert_new(new_record("s1", "u2")).await.unwrap();
        store.insert_new(new_record("s2", "u1")).await.unwrap();
        assert_eq!(store.record_count(), 3);
    }

    #[tokio::test]
    async fn test_subscribe_sees_later_inserts() {
        let store = MemoryStore::new();
        let mut feed = store.subscribe(&SessionId("s1".into())).await.unwrap();

        store.insert_new(new_record("s1", "u1")).await.unwrap();
        store.insert_new(new_record("s2", "u2")).await.unwrap();

        let seen = feed.recv().await.unwrap();
        assert_eq!(seen.student_id, StudentId("u1".into()));
        // The s2 insert went to a different session's watchers.
        assert!(feed.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_deactivate_missing_session_is_ok() {
        let store = MemoryStore::new();
        store.deactivate(&SessionId("ghost".into())).await.unwrap();
    }

    #[tokio::test]
    async fn test_static_provider_emits_events() {
        let provider = StaticIdentityProvider::new(Identity::new(
            StudentId("u1".into()),
            "asha@example.edu",
            "Asha K",
        ));
        let mut events = provider.subscribe().await;

        provider.sign_in().await.unwrap();
        provider.sign_out().await.unwrap();

        assert!(matches!(events.recv().await, Some(AuthEvent::SignedIn(_))));
        assert_eq!(events.recv().await, Some(AuthEvent::SignedOut));
    }
}
