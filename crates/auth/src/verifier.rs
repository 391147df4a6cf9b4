//! Credential verification: bearer header → provider → [`Identity`].

use std::sync::Arc;

use thiserror::Error;

use crate::{Identity, IdentityProvider, ProviderError, Role};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum VerificationError {
    /// No `authorization` header, no `Bearer ` prefix, or an empty token.
    #[error("No token provided")]
    MissingCredential,

    /// The provider refused the token; carries its diagnostic text.
    #[error("{0}")]
    InvalidCredential(String),

    /// The provider could not answer.
    #[error("{0}")]
    ProviderUnavailable(String),
}

impl From<ProviderError> for VerificationError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::Rejected(msg) | ProviderError::NotFound(msg) => Self::InvalidCredential(msg),
            unavailable @ ProviderError::Unavailable(_) => {
                Self::ProviderUnavailable(unavailable.to_string())
            }
        }
    }
}

/// Extract the token from an `authorization` header value (`"Bearer <token>"`).
///
/// The token is the space-delimited word right after `Bearer `; extra
/// padding leaves that word empty and counts as no token.
pub fn extract_bearer(header: Option<&str>) -> Result<&str, VerificationError> {
    let token = header
        .and_then(|h| h.strip_prefix("Bearer "))
        .and_then(|rest| rest.split(' ').next())
        .ok_or(VerificationError::MissingCredential)?;

    if token.is_empty() {
        return Err(VerificationError::MissingCredential);
    }

    Ok(token)
}

/// First pipeline stage. Never looks at route policies.
#[derive(Clone)]
pub struct CredentialVerifier {
    provider: Arc<dyn IdentityProvider>,
}

impl CredentialVerifier {
    pub fn new(provider: Arc<dyn IdentityProvider>) -> Self {
        Self { provider }
    }

    /// Resolve the caller behind an `authorization` header value.
    ///
    /// A missing credential fails without contacting the provider.
    pub async fn verify(&self, authorization: Option<&str>) -> Result<Identity, VerificationError> {
        let token = extract_bearer(authorization)?;
        let claims = self.provider.verify_token(token).await?;

        let role = match claims.role.as_deref() {
            None => None,
            Some(raw) => match raw.parse::<Role>() {
                Ok(role) => Some(role),
                Err(e) => {
                    tracing::warn!(uid = %claims.subject_id, error = %e, "ignoring unrecognized role claim");
                    None
                }
            },
        };

        Ok(Identity::new(claims.subject_id, role))
    }
}
