//! Route gating.
//!
//! The gate holds no state of its own: it is recomputed from the current
//! snapshot on every navigation, so it can be tested without any UI.

use crate::store::AuthSnapshot;

/// Where a gated navigation should land.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectTarget {
    Login,
    VerifyEmail,
}

/// Outcome of gating a protected view against the current snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteDecision {
    Allow,
    RedirectTo(RedirectTarget),
}

/// Decide whether a protected view may render.
///
/// Checked in strict order: unauthenticated visitors go to login,
/// authenticated-but-unverified accounts go to the verification prompt,
/// everyone else is allowed through.
pub fn decide(snapshot: &AuthSnapshot) -> RouteDecision {
    match &snapshot.identity {
        None => RouteDecision::RedirectTo(RedirectTarget::Login),
        Some(identity) if !identity.verified => {
            RouteDecision::RedirectTo(RedirectTarget::VerifyEmail)
        }
        Some(_) => RouteDecision::Allow,
    }
}
