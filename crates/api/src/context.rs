use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use loangate_auth::{Identity, Role, VerificationError};
use loangate_core::SubjectId;

use crate::app::errors::ApiError;

/// Identity context for a request.
///
/// Inserted once by the authentication middleware and immutable afterwards;
/// the gate and handlers only ever read it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityContext {
    identity: Identity,
}

impl IdentityContext {
    pub fn new(identity: Identity) -> Self {
        Self { identity }
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn subject_id(&self) -> &SubjectId {
        self.identity.subject_id()
    }

    pub fn role(&self) -> Option<Role> {
        self.identity.role()
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for IdentityContext
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<IdentityContext>()
            .cloned()
            .ok_or(ApiError::Unauthorized(VerificationError::MissingCredential))
    }
}
