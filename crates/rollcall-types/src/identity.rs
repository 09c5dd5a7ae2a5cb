//! Authenticated identity and role tier.

use serde::{Deserialize, Serialize};

use crate::StudentId;

/// The capability tier assigned to an identity.
///
/// Assigned once, the first time an identity is seen, and persisted.
/// `Unknown` means the role document hasn't been resolved yet — access
/// decisions treat it as "not authorized" for role-gated routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Student,
    Unknown,
}

impl Role {
    /// The home path for an identity of this role after sign-in.
    pub fn home_path(self) -> &'static str {
        match self {
            Role::Admin => "/admin",
            Role::Student => "/student",
            // First-run identities have no role document yet; the admin
            // dashboard is where setup happens.
            Role::Unknown => "/admin",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Admin => write!(f, "admin"),
            Role::Student => write!(f, "student"),
            Role::Unknown => write!(f, "unknown"),
        }
    }
}

/// An authenticated identity as supplied by the identity provider,
/// merged with its stored profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: StudentId,
    pub email: String,
    pub display_name: String,
    pub role: Role,
}

impl Identity {
    pub fn new(id: StudentId, email: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id,
            email: email.into(),
            display_name: display_name.into(),
            role: Role::Unknown,
        }
    }

    /// Resolves the name to record on an attendance entry.
    ///
    /// Field precedence, in order: the stored profile name, the stored
    /// profile display name, the provider's display name, then the
    /// "Unknown Student" placeholder. This is the single place that
    /// ordering lives — callers must not re-implement it with their
    /// own fallback chains.
    pub fn resolve_student_name(
        profile_name: Option<&str>,
        profile_display_name: Option<&str>,
        provider_display_name: Option<&str>,
    ) -> String {
        [profile_name, profile_display_name, provider_display_name]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|s| !s.is_empty())
            .unwrap_or("Unknown Student")
            .to_string()
    }

    /// Resolves the roll number to record, defaulting to `"N/A"`.
    pub fn resolve_roll_no(profile_roll_no: Option<&str>) -> String {
        profile_roll_no
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or("N/A")
            .to_string()
    }
}
