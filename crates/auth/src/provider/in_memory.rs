use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use loangate_core::SubjectId;

use super::directory::UserDirectory;
use super::r#trait::{IdentityProvider, ProviderError, UserRecord};
use crate::{Role, VerifiedClaims};

/// In-memory identity provider.
///
/// Opaque tokens map to subjects; the role claim is read from the user
/// directory at verification time, so a role write shows up in the next
/// verification. Intended for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryIdentityProvider {
    tokens: RwLock<HashMap<String, SubjectId>>,
    directory: Arc<UserDirectory>,
    unavailable: AtomicBool,
}

impl InMemoryIdentityProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_directory(directory: Arc<UserDirectory>) -> Self {
        Self {
            directory,
            ..Self::default()
        }
    }

    /// Register a user record.
    pub fn with_user(self, record: UserRecord) -> Self {
        if let Err(e) = self.directory.insert(record) {
            tracing::warn!(error = %e, "failed to register in-memory user");
        }
        self
    }

    /// Make `token` verify as `subject_id`.
    pub fn with_token(self, token: impl Into<String>, subject_id: SubjectId) -> Self {
        if let Ok(mut tokens) = self.tokens.write() {
            tokens.insert(token.into(), subject_id);
        }
        self
    }

    /// Simulate an outage: every call fails with [`ProviderError::Unavailable`].
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub fn directory(&self) -> &Arc<UserDirectory> {
        &self.directory
    }

    fn ensure_available(&self) -> Result<(), ProviderError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(ProviderError::Unavailable("in-memory provider is offline".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl IdentityProvider for InMemoryIdentityProvider {
    async fn verify_token(&self, token: &str) -> Result<VerifiedClaims, ProviderError> {
        self.ensure_available()?;

        let subject_id = {
            let tokens = self
                .tokens
                .read()
                .map_err(|_| ProviderError::Unavailable("token table lock poisoned".to_string()))?;
            tokens
                .get(token)
                .cloned()
                .ok_or_else(|| ProviderError::Rejected("Decoding token failed: unknown token".to_string()))?
        };

        let record = self.directory.get(&subject_id).map_err(|e| match e {
            ProviderError::NotFound(msg) => ProviderError::Rejected(msg),
            other => other,
        })?;

        Ok(VerifiedClaims {
            subject_id,
            role: record.custom_claims.role.map(|r| r.as_str().to_string()),
        })
    }

    async fn set_role_claim(&self, subject_id: &SubjectId, role: Role) -> Result<(), ProviderError> {
        self.ensure_available()?;
        self.directory.set_role(subject_id, role)
    }

    async fn get_user(&self, subject_id: &SubjectId) -> Result<UserRecord, ProviderError> {
        self.ensure_available()?;
        self.directory.get(subject_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uid(s: &str) -> SubjectId {
        SubjectId::parse(s).unwrap()
    }

    fn provider() -> InMemoryIdentityProvider {
        InMemoryIdentityProvider::new()
            .with_user(UserRecord::new(uid("m1")).with_role(Role::Manager))
            .with_user(UserRecord::new(uid("fresh")))
            .with_token("manager-token", uid("m1"))
            .with_token("fresh-token", uid("fresh"))
            .with_token("orphan-token", uid("deleted"))
    }

    #[tokio::test]
    async fn verifies_known_tokens() {
        let p = provider();
        let claims = p.verify_token("manager-token").await.unwrap();
        assert_eq!(claims.subject_id, uid("m1"));
        assert_eq!(claims.role.as_deref(), Some("manager"));

        let claims = p.verify_token("fresh-token").await.unwrap();
        assert_eq!(claims.role, None);
    }

    #[tokio::test]
    async fn rejects_unknown_tokens_and_deleted_subjects() {
        let p = provider();
        assert!(matches!(p.verify_token("nope").await, Err(ProviderError::Rejected(_))));
        assert!(matches!(
            p.verify_token("orphan-token").await,
            Err(ProviderError::Rejected(msg)) if msg.contains("deleted")
        ));
    }

    #[tokio::test]
    async fn role_write_is_seen_by_later_verifications() {
        let p = provider();
        p.set_role_claim(&uid("fresh"), Role::Officer).await.unwrap();
        let claims = p.verify_token("fresh-token").await.unwrap();
        assert_eq!(claims.role.as_deref(), Some("officer"));
    }

    #[tokio::test]
    async fn outage_fails_every_operation() {
        let p = provider();
        p.set_unavailable(true);
        assert!(matches!(p.verify_token("manager-token").await, Err(ProviderError::Unavailable(_))));
        assert!(matches!(p.get_user(&uid("m1")).await, Err(ProviderError::Unavailable(_))));
        assert!(matches!(
            p.set_role_claim(&uid("m1"), Role::User).await,
            Err(ProviderError::Unavailable(_))
        ));

        p.set_unavailable(false);
        assert!(p.get_user(&uid("m1")).await.is_ok());
    }
}
