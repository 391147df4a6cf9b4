//! Outbound identity-provider boundary.
//!
//! The provider is the system of record for credentials and custom claims.
//! This module defines the contract the verifier and the role-assignment
//! service depend on, plus the implementations the API binary can wire in.

pub mod directory;
pub mod in_memory;
pub mod jwt;
pub mod r#trait;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use loangate_core::SubjectId;

pub use directory::{DirectoryError, UserDirectory};
pub use in_memory::InMemoryIdentityProvider;
pub use jwt::JwtIdentityProvider;
pub use r#trait::{CustomClaims, IdentityProvider, ProviderError, UserRecord};

use crate::{Role, VerifiedClaims};

/// Adapter that bounds every provider call with a deadline.
///
/// An expired deadline surfaces as [`ProviderError::Unavailable`]; the call is
/// dropped, never retried.
pub struct TimeoutProvider {
    inner: Arc<dyn IdentityProvider>,
    deadline: Duration,
}

impl TimeoutProvider {
    pub fn new(inner: Arc<dyn IdentityProvider>, deadline: Duration) -> Self {
        Self { inner, deadline }
    }

    async fn bounded<T>(
        &self,
        op: &'static str,
        fut: impl core::future::Future<Output = Result<T, ProviderError>> + Send,
    ) -> Result<T, ProviderError> {
        match tokio::time::timeout(self.deadline, fut).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(op, deadline_ms = self.deadline.as_millis() as u64, "identity provider call timed out");
                Err(ProviderError::Unavailable(format!(
                    "{op} timed out after {}ms",
                    self.deadline.as_millis()
                )))
            }
        }
    }
}

#[async_trait]
impl IdentityProvider for TimeoutProvider {
    async fn verify_token(&self, token: &str) -> Result<VerifiedClaims, ProviderError> {
        self.bounded("verify_token", self.inner.verify_token(token)).await
    }

    async fn set_role_claim(&self, subject_id: &SubjectId, role: Role) -> Result<(), ProviderError> {
        self.bounded("set_role_claim", self.inner.set_role_claim(subject_id, role))
            .await
    }

    async fn get_user(&self, subject_id: &SubjectId) -> Result<UserRecord, ProviderError> {
        self.bounded("get_user", self.inner.get_user(subject_id)).await
    }
}
