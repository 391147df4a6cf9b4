use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};

use loangate_core::SubjectId;

use super::directory::UserDirectory;
use super::r#trait::{IdentityProvider, ProviderError, UserRecord};
use crate::{Role, TokenClaims, VerifiedClaims};

/// Identity provider that verifies HS256-signed JWTs locally.
///
/// The `role` claim is taken from the token itself, so a role write through
/// [`IdentityProvider::set_role_claim`] only becomes visible in tokens issued
/// after it. Writes and lookups go to the shared [`UserDirectory`].
pub struct JwtIdentityProvider {
    decoding_key: DecodingKey,
    validation: Validation,
    directory: Arc<UserDirectory>,
}

impl JwtIdentityProvider {
    pub fn new(secret: &[u8], directory: Arc<UserDirectory>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Time window is checked by `TokenClaims::validate_at`.
        validation.validate_exp = false;

        Self {
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            directory,
        }
    }

    pub fn directory(&self) -> &Arc<UserDirectory> {
        &self.directory
    }
}

#[async_trait]
impl IdentityProvider for JwtIdentityProvider {
    async fn verify_token(&self, token: &str) -> Result<VerifiedClaims, ProviderError> {
        let data = decode::<TokenClaims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| ProviderError::Rejected(format!("Decoding token failed: {e}")))?;
        let claims = data.claims;

        claims
            .validate_at(Utc::now())
            .map_err(|e| ProviderError::Rejected(e.to_string()))?;

        let subject_id = SubjectId::parse(claims.sub)
            .map_err(|e| ProviderError::Rejected(format!("token subject rejected: {e}")))?;

        Ok(VerifiedClaims {
            subject_id,
            role: claims.role,
        })
    }

    async fn set_role_claim(&self, subject_id: &SubjectId, role: Role) -> Result<(), ProviderError> {
        self.directory.set_role(subject_id, role)
    }

    async fn get_user(&self, subject_id: &SubjectId) -> Result<UserRecord, ProviderError> {
        self.directory.get(subject_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use jsonwebtoken::{encode, EncodingKey, Header};

    const SECRET: &[u8] = b"test-secret";

    fn mint(secret: &[u8], sub: &str, role: Option<&str>, lifetime: Duration) -> String {
        let now = Utc::now();
        let claims = TokenClaims {
            sub: sub.to_string(),
            role: role.map(str::to_string),
            iat: (now - Duration::seconds(5)).timestamp(),
            exp: (now + lifetime).timestamp(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &EncodingKey::from_secret(secret)).unwrap()
    }

    fn provider() -> JwtIdentityProvider {
        let directory = UserDirectory::from_records([UserRecord::new(SubjectId::parse("u1").unwrap())]).unwrap();
        JwtIdentityProvider::new(SECRET, Arc::new(directory))
    }

    #[tokio::test]
    async fn verifies_signed_token_with_role() {
        let token = mint(SECRET, "u1", Some("officer"), Duration::minutes(10));
        let claims = provider().verify_token(&token).await.unwrap();
        assert_eq!(claims.subject_id.as_str(), "u1");
        assert_eq!(claims.role.as_deref(), Some("officer"));
    }

    #[tokio::test]
    async fn verifies_token_without_role() {
        let token = mint(SECRET, "u1", None, Duration::minutes(10));
        let claims = provider().verify_token(&token).await.unwrap();
        assert_eq!(claims.role, None);
    }

    #[tokio::test]
    async fn rejects_wrong_signature() {
        let token = mint(b"other-secret", "u1", Some("manager"), Duration::minutes(10));
        let err = provider().verify_token(&token).await.unwrap_err();
        assert!(matches!(err, ProviderError::Rejected(msg) if msg.contains("InvalidSignature")));
    }

    #[tokio::test]
    async fn rejects_expired_token() {
        let token = mint(SECRET, "u1", Some("manager"), Duration::seconds(-1));
        let err = provider().verify_token(&token).await.unwrap_err();
        assert_eq!(err, ProviderError::Rejected("token has expired".to_string()));
    }

    #[tokio::test]
    async fn rejects_garbage() {
        let err = provider().verify_token("not-a-jwt").await.unwrap_err();
        assert!(matches!(err, ProviderError::Rejected(msg) if msg.starts_with("Decoding token failed")));
    }

    #[tokio::test]
    async fn role_write_does_not_change_existing_tokens() {
        let p = provider();
        let token = mint(SECRET, "u1", Some("user"), Duration::minutes(10));
        let uid = SubjectId::parse("u1").unwrap();

        p.set_role_claim(&uid, Role::Manager).await.unwrap();

        assert_eq!(p.verify_token(&token).await.unwrap().role.as_deref(), Some("user"));
        assert_eq!(p.get_user(&uid).await.unwrap().custom_claims.role, Some(Role::Manager));
        assert_eq!(p.directory().get(&uid).unwrap().custom_claims.role, Some(Role::Manager));
    }
}
