use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use loangate_core::SubjectId;

/// Decoded claim set returned by an identity provider after verification.
///
/// `role` is the raw custom claim; turning it into a [`crate::Role`] is the
/// verifier's job, so providers never have to know the role taxonomy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifiedClaims {
    pub subject_id: SubjectId,
    pub role: Option<String>,
}

/// Wire payload of a signed bearer token (JWT body).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject / provider uid.
    pub sub: String,

    /// Custom role claim, if one has been assigned.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,

    /// Issued-at, seconds since the epoch.
    pub iat: i64,

    /// Expiration, seconds since the epoch.
    pub exp: i64,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenValidationError {
    #[error("token has expired")]
    Expired,

    #[error("token not yet valid (issued in the future)")]
    NotYetValid,

    #[error("invalid token time window (exp <= iat)")]
    InvalidTimeWindow,

    #[error("token timestamp out of range")]
    OutOfRange,
}

impl TokenClaims {
    pub fn issued_at(&self) -> Result<DateTime<Utc>, TokenValidationError> {
        Utc.timestamp_opt(self.iat, 0)
            .single()
            .ok_or(TokenValidationError::OutOfRange)
    }

    pub fn expires_at(&self) -> Result<DateTime<Utc>, TokenValidationError> {
        Utc.timestamp_opt(self.exp, 0)
            .single()
            .ok_or(TokenValidationError::OutOfRange)
    }

    /// Deterministically validate the token's time window against `now`.
    ///
    /// Signature verification happens before this, in the provider.
    pub fn validate_at(&self, now: DateTime<Utc>) -> Result<(), TokenValidationError> {
        let issued_at = self.issued_at()?;
        let expires_at = self.expires_at()?;

        if expires_at <= issued_at {
            return Err(TokenValidationError::InvalidTimeWindow);
        }
        if now < issued_at {
            return Err(TokenValidationError::NotYetValid);
        }
        if now >= expires_at {
            return Err(TokenValidationError::Expired);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn claims(iat: DateTime<Utc>, exp: DateTime<Utc>) -> TokenClaims {
        TokenClaims {
            sub: "u1".to_string(),
            role: Some("user".to_string()),
            iat: iat.timestamp(),
            exp: exp.timestamp(),
        }
    }

    #[test]
    fn accepts_current_window() {
        let now = Utc::now();
        let c = claims(now - Duration::minutes(1), now + Duration::minutes(10));
        assert_eq!(c.validate_at(now), Ok(()));
    }

    #[test]
    fn rejects_expired() {
        let now = Utc::now();
        let c = claims(now - Duration::hours(2), now - Duration::hours(1));
        assert_eq!(c.validate_at(now), Err(TokenValidationError::Expired));
    }

    #[test]
    fn rejects_future_issue() {
        let now = Utc::now();
        let c = claims(now + Duration::minutes(5), now + Duration::minutes(10));
        assert_eq!(c.validate_at(now), Err(TokenValidationError::NotYetValid));
    }

    #[test]
    fn rejects_inverted_window() {
        let now = Utc::now();
        let c = claims(now, now - Duration::seconds(1));
        assert_eq!(c.validate_at(now), Err(TokenValidationError::InvalidTimeWindow));
    }

    #[test]
    fn role_claim_is_optional_on_the_wire() {
        let c: TokenClaims = serde_json::from_str(r#"{"sub":"u1","iat":1,"exp":2}"#).unwrap();
        assert_eq!(c.role, None);
        assert!(!serde_json::to_string(&c).unwrap().contains("role"));
    }
}
