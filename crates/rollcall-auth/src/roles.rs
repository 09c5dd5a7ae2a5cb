//! Role resolution: allow-list derivation, one-time persistence.

use std::sync::Arc;

use rollcall_types::{Identity, Role, StoreError, StudentId};
use tracing::{info, warn};

use crate::AuthError;

/// Emails that resolve to [`Role::Admin`] on first sight.
///
/// Matching is case-insensitive on the whole address. The list only
/// matters the first time an identity is seen; after that the stored
/// role document is authoritative, even if the list changes.
#[derive(Debug, Clone, Default)]
pub struct AdminAllowList {
    emails: Vec<String>,
}

impl AdminAllowList {
    pub fn new<I, S>(emails: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            emails: emails
                .into_iter()
                .map(|e| e.into().trim().to_lowercase())
                .collect(),
        }
    }

    /// Whether this email is on the list.
    pub fn contains(&self, email: &str) -> bool {
        let needle = email.trim().to_lowercase();
        self.emails.iter().any(|e| e == &needle)
    }

    /// The role a first-seen identity with this email gets.
    pub fn derive_role(&self, email: &str) -> Role {
        if self.contains(email) {
            Role::Admin
        } else {
            Role::Student
        }
    }
}

/// The role document store.
pub trait RoleStore: Send + Sync + 'static {
    /// Fetches the stored role for an identity. `Ok(None)` means the
    /// identity has never been seen.
    fn fetch_role(
        &self,
        id: &StudentId,
    ) -> impl std::future::Future<Output = Result<Option<Role>, StoreError>> + Send;

    /// Persists an identity's role document.
    fn assign_role(
        &self,
        id: &StudentId,
        role: Role,
    ) -> impl std::future::Future<Output = Result<(), StoreError>> + Send;
}

/// Resolves an identity's role.
///
/// The contract is **stability**: a role is derived from the allow-list
/// exactly once, the first time the identity is seen, and persisted.
/// Every later resolution returns the stored role verbatim — removing
/// an email from the allow-list does not demote an existing admin, and
/// adding one does not promote an existing student.
pub struct RoleResolver<R> {
    store: Arc<R>,
    allow_list: AdminAllowList,
}

impl<R: RoleStore> RoleResolver<R> {
    pub fn new(store: Arc<R>, allow_list: AdminAllowList) -> Self {
        Self { store, allow_list }
    }

    /// Resolves the role for a signed-in identity.
    pub async fn resolve(&self, identity: &Identity) -> Result<Role, AuthError> {
        if let Some(stored) = self.store.fetch_role(&identity.id).await? {
            return Ok(stored);
        }

        let derived = self.allow_list.derive_role(&identity.email);
        self.store.assign_role(&identity.id, derived).await?;
        info!(
            student_id = %identity.id,
            role = %derived,
            "assigned role on first sign-in"
        );
        Ok(derived)
    }

    /// Like [`resolve`](Self::resolve), but degrades a failed lookup to
    /// [`Role::Student`] — the least privilege — instead of erroring.
    /// The failure is logged; the degraded role is **not** persisted,
    /// so the next resolution retries the lookup.
    pub async fn resolve_or_default(&self, identity: &Identity) -> Role {
        match self.resolve(identity).await {
            Ok(role) => role,
            Err(err) => {
                warn!(
                    student_id = %identity.id,
                    %err,
                    "role resolution failed, defaulting to student"
                );
                Role::Student
            }
        }
    }
}
