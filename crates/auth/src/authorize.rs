use serde::Serialize;
use thiserror::Error;

use crate::{AuthorizationPolicy, Identity};

/// Why the gate refused a request.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Denial {
    /// No identity reached the gate (verifier did not run or did not attach one).
    #[error("unauthenticated")]
    Unauthenticated,

    /// The identity carries no role claim.
    #[error("no role found")]
    NoRole,

    /// The identity's role is not listed by the policy.
    #[error("insufficient role")]
    InsufficientRole,
}

/// Outcome of a gate evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny(Denial),
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allow)
    }

    pub fn into_result(self) -> Result<(), Denial> {
        match self {
            Decision::Allow => Ok(()),
            Decision::Deny(denial) => Err(denial),
        }
    }
}

/// Decide whether `identity` may access a route guarded by `policy`.
///
/// `route_subject_id` is the route's `id` path segment, if it has one.
///
/// - No IO
/// - No panics
/// - Self-access is checked before the role, so a subject without any role
///   can still reach its own resource when the policy allows it.
pub fn authorize(
    policy: &AuthorizationPolicy,
    identity: Option<&Identity>,
    route_subject_id: Option<&str>,
) -> Decision {
    let Some(identity) = identity else {
        return Decision::Deny(Denial::Unauthenticated);
    };

    if policy.allows_same_user()
        && route_subject_id.is_some_and(|id| identity.subject_id().as_str() == id)
    {
        return Decision::Allow;
    }

    match identity.role() {
        None => Decision::Deny(Denial::NoRole),
        Some(role) if policy.admits_role(role) => Decision::Allow,
        Some(_) => Decision::Deny(Denial::InsufficientRole),
    }
}
