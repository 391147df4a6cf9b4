use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use loangate_core::SubjectId;

use crate::{Role, VerifiedClaims};

/// Failure reported by an identity provider.
///
/// Every variant carries a human-readable message that may be surfaced to
/// callers; provider internals stay behind it.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProviderError {
    /// Credential or write refused (bad signature, expired, malformed).
    #[error("{0}")]
    Rejected(String),

    /// The subject is unknown to the provider.
    #[error("{0}")]
    NotFound(String),

    /// The provider could not be reached or did not answer in time.
    #[error("identity provider unavailable: {0}")]
    Unavailable(String),
}

/// Custom claims stored by the provider for a subject.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CustomClaims {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}

/// Provider-owned account view of a subject.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub uid: SubjectId,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,

    #[serde(default)]
    pub custom_claims: CustomClaims,

    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl UserRecord {
    pub fn new(uid: SubjectId) -> Self {
        Self {
            uid,
            email: None,
            display_name: None,
            custom_claims: CustomClaims::default(),
            created_at: Utc::now(),
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    pub fn with_role(mut self, role: Role) -> Self {
        self.custom_claims.role = Some(role);
        self
    }
}

/// External identity provider consumed by the auth pipeline.
///
/// All operations may suspend on network I/O and are awaited to completion
/// before the pipeline proceeds.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Verify a raw bearer token and return its decoded claims.
    async fn verify_token(&self, token: &str) -> Result<VerifiedClaims, ProviderError>;

    /// Replace (not merge) the `role` custom claim of `subject_id`.
    async fn set_role_claim(&self, subject_id: &SubjectId, role: Role) -> Result<(), ProviderError>;

    /// Look up the provider's account record for `subject_id`.
    async fn get_user(&self, subject_id: &SubjectId) -> Result<UserRecord, ProviderError>;
}
