//! The attendance session record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{ClassId, SessionId};

/// A geographic point (decimal degrees).
///
/// Plain data here; validation and distance math live in
/// `rollcall-geo`, which is the only place allowed to decide whether a
/// coordinate pair is usable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// An admin-initiated, time-bounded attendance window tied to one class
/// and one geographic center/radius.
///
/// Lifecycle:
///
/// ```text
///   start() ──→ Active(token) ──(rotate)──→ Active(token') ──(stop)──→ Stopped
///                    ↑                           │
///                    └────────── self-loop ──────┘
/// ```
///
/// Sessions are never deleted, only deactivated — `active = false` is
/// terminal. A stopped class needs a brand-new session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub id: SessionId,
    pub class_id: ClassId,
    pub active: bool,
    /// The rotating token. Only this exact value is accepted at
    /// verification time; anything older is a replay.
    pub current_token: String,
    pub center: Coordinates,
    pub radius_meters: f64,
    /// Store-assigned creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Store-assigned timestamp of the last acknowledged rotation.
    pub last_rotation_at: DateTime<Utc>,
}

impl Session {
    pub fn is_active(&self) -> bool {
        self.active
    }
}
