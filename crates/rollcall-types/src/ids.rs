//! Identifier newtypes.
//!
//! Each id wraps a `String` so a `SessionId` can never be passed where
//! a `StudentId` is expected. `#[serde(transparent)]` keeps the JSON
//! representation a plain string, matching what the document store sees.

use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Unique identifier for an attendance session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub String);

impl SessionId {
    /// Generates a fresh random session id (32 hex chars, 128 bits).
    pub fn generate() -> Self {
        Self(random_hex::<16>())
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "S-{}", self.0)
    }
}

/// Unique identifier for a student (assigned by the identity provider).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StudentId(pub String);

impl fmt::Display for StudentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "U-{}", self.0)
    }
}

/// Identifier for a class (e.g. "CS101").
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClassId(pub String);

impl fmt::Display for ClassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for an attendance record.
///
/// Attendance record ids are **deterministic**: the same
/// (session, student) pair always hashes to the same id. This is what
/// turns "at most one record per student per session" from a hopeful
/// client-side check into a storage-level uniqueness guarantee — two
/// racing writes collide on the same key and the store rejects the
/// second one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub String);

impl RecordId {
    /// Derives the record id for a (session, student) pair.
    ///
    /// SHA-256 over both ids with a length prefix between them, so
    /// ("ab", "c") and ("a", "bc") can never collide.
    pub fn for_attendance(session: &SessionId, student: &StudentId) -> Self {
        let mut hasher = Sha256::new();
        hasher.update((session.0.len() as u64).to_be_bytes());
        hasher.update(session.0.as_bytes());
        hasher.update(student.0.as_bytes());
        Self(hex::encode(hasher.finalize()))
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "A-{}", self.0)
    }
}

/// Generates `N` random bytes formatted as lowercase hex.
fn random_hex<const N: usize>() -> String {
    use rand::Rng;
    let mut rng = rand::rng();
    let bytes: [u8; N] = rng.random();
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}
