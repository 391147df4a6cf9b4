//! Route guarding: attach the authenticate → authorize chain to a handler.
//!
//! Every protected route declares its [`AuthorizationPolicy`] here at
//! registration time; the policy never changes afterwards.

use axum::middleware::from_fn_with_state;
use axum::routing::MethodRouter;

use loangate_auth::AuthorizationPolicy;

use crate::middleware::{self, AuthState, GateState};

/// Wrap `route` so it only runs for callers admitted by `policy`.
///
/// `route_layer` runs the last-added layer first, so authentication is added
/// after the gate.
pub fn protect(route: MethodRouter, auth: &AuthState, policy: AuthorizationPolicy) -> MethodRouter {
    route
        .route_layer(from_fn_with_state(GateState::new(policy), middleware::authorize))
        .route_layer(from_fn_with_state(auth.clone(), middleware::authenticate))
}
