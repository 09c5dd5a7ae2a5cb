//! Identity, roles, and access decisions for Rollcall.
//!
//! Three concerns live here:
//!
//! 1. **Identity** — [`IdentityProvider`] is the seam for the hosted
//!    sign-in service (Google-style OAuth in production, a static
//!    provider in tests)
//! 2. **Roles** — [`RoleResolver`] decides an identity's role once, on
//!    first sight, from the [`AdminAllowList`], persists it, and honors
//!    the stored role verbatim forever after
//! 3. **Routing** — [`decide`] is the pure function the shell calls to
//!    gate every route: allow, redirect, or hold while loading
//!
//! # How it fits in the stack
//!
//! ```text
//! App shell (above)      ← subscribes to auth events, calls decide()
//!     ↕
//! Auth layer (this crate)
//!     ↕
//! IdentityProvider / RoleStore collaborators (injected)
//! ```

#![allow(async_fn_in_trait)]

mod error;
mod gate;
mod provider;
mod roles;

pub use error::AuthError;
pub use gate::{decide, AccessDecision, RouteSpec, SIGN_IN_PATH, UNAUTHORIZED_PATH};
pub use provider::{AuthEvent, IdentityProvider};
pub use roles::{AdminAllowList, RoleResolver, RoleStore};
