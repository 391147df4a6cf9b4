//! The two pipeline stages as axum middleware: authenticate, then authorize.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Path, Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};

use loangate_auth::{authorize as gate, AuthorizationPolicy, CredentialVerifier, Decision};

use crate::app::errors::ApiError;
use crate::context::IdentityContext;

/// Path parameter compared against the caller's subject id for self-access.
pub const ROUTE_SUBJECT_PARAM: &str = "id";

#[derive(Clone)]
pub struct AuthState {
    pub verifier: CredentialVerifier,
}

/// Verify the bearer credential and attach the caller's identity.
///
/// Failure is terminal: the request never reaches the gate or the handler.
pub async fn authenticate(
    State(state): State<AuthState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let identity = state
        .verifier
        .verify(authorization_header(req.headers()))
        .await
        .inspect_err(|e| tracing::warn!(error = %e, "credential verification failed"))?;

    req.extensions_mut().insert(IdentityContext::new(identity));

    Ok(next.run(req).await)
}

fn authorization_header(headers: &HeaderMap) -> Option<&str> {
    headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok())
}

/// Per-route gate state: the route's static policy.
#[derive(Clone)]
pub struct GateState {
    policy: Arc<AuthorizationPolicy>,
}

impl GateState {
    pub fn new(policy: AuthorizationPolicy) -> Self {
        Self {
            policy: Arc::new(policy),
        }
    }

    pub fn policy(&self) -> &AuthorizationPolicy {
        &self.policy
    }
}

/// Evaluate the route policy against the identity attached by [`authenticate`].
pub async fn authorize(
    State(state): State<GateState>,
    params: Option<Path<HashMap<String, String>>>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let identity = req.extensions().get::<IdentityContext>().map(IdentityContext::identity);
    let route_subject = params
        .as_ref()
        .and_then(|Path(p)| p.get(ROUTE_SUBJECT_PARAM))
        .map(String::as_str);

    match gate(state.policy(), identity, route_subject) {
        Decision::Allow => {
            tracing::debug!(
                uid = identity.map(|i| i.subject_id().as_str()),
                route_subject,
                "access granted"
            );
        }
        Decision::Deny(denial) => {
            tracing::warn!(
                uid = identity.map(|i| i.subject_id().as_str()),
                role = identity.and_then(|i| i.role()).map(|r| r.as_str()),
                route_subject,
                %denial,
                "access denied"
            );
            return Err(denial.into());
        }
    }

    Ok(next.run(req).await)
}
