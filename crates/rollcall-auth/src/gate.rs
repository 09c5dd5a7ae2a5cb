//! Route access decisions.
//!
//! [`decide`] is a pure function of the route, the auth state, the
//! loading flag, and the remembered origin. The app shell calls it on
//! every navigation; nothing here does I/O, so the shell can re-run it
//! freely as state changes.

use rollcall_types::{Identity, Role};

/// Where unauthenticated users are sent.
pub const SIGN_IN_PATH: &str = "/login";

/// Where signed-in users with the wrong role are sent.
pub const UNAUTHORIZED_PATH: &str = "/unauthorized";

/// What a route requires of the visitor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteSpec {
    pub path: &'static str,
    /// `Some(role)` gates the route to that role; `None` only requires
    /// being signed in.
    pub required_role: Option<Role>,
    /// Public-only routes (the sign-in page) bounce signed-in users
    /// away instead of rendering.
    pub public_only: bool,
}

impl RouteSpec {
    /// A route any signed-in identity may visit.
    pub fn protected(path: &'static str) -> Self {
        Self {
            path,
            required_role: None,
            public_only: false,
        }
    }

    /// A route gated to one role.
    pub fn role_gated(path: &'static str, role: Role) -> Self {
        Self {
            path,
            required_role: Some(role),
            public_only: false,
        }
    }

    /// A route only signed-out visitors should see.
    pub fn public_only(path: &'static str) -> Self {
        Self {
            path,
            required_role: None,
            public_only: true,
        }
    }
}

/// The verdict for one (route, auth state) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessDecision {
    /// Auth state is still resolving; render nothing yet. Redirecting
    /// here would bounce a signed-in user off their own page for the
    /// duration of one network round-trip.
    Pending,
    /// Render the route.
    Allow,
    /// Navigate to the sign-in page; the shell stores `return_to` so a
    /// successful login can resume where the visitor was headed.
    RedirectToSignIn { return_to: String },
    /// Navigate elsewhere.
    RedirectTo(String),
}

/// Decides access to `route` for the current auth state.
///
/// `role` is the resolved role for `identity` (callers pass
/// [`Role::Unknown`] while resolution is in flight or failed —
/// `Unknown` never satisfies a role gate). `origin` is the path the
/// shell remembered from an earlier [`AccessDecision::RedirectToSignIn`],
/// if any.
pub fn decide(
    route: &RouteSpec,
    identity: Option<&Identity>,
    role: Role,
    loading: bool,
    origin: Option<&str>,
) -> AccessDecision {
    if loading {
        return AccessDecision::Pending;
    }

    match identity {
        None => {
            if route.public_only {
                AccessDecision::Allow
            } else {
                AccessDecision::RedirectToSignIn {
                    return_to: route.path.to_string(),
                }
            }
        }
        Some(_) => {
            if route.public_only {
                // Back to where the visitor was headed before sign-in,
                // or to their role's home.
                let target = origin.unwrap_or(role.home_path());
                return AccessDecision::RedirectTo(target.to_string());
            }
            match route.required_role {
                Some(required) if role != required => {
                    AccessDecision::RedirectTo(UNAUTHORIZED_PATH.to_string())
                }
                _ => AccessDecision::Allow,
            }
        }
    }
}
