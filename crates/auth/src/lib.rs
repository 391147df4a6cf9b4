//! `loangate-auth`: authentication/authorization boundary for the loan API.
//!
//! This crate is intentionally decoupled from HTTP: the API layer hands it a
//! raw `authorization` header value and route path parameters, and gets back
//! identities, gate decisions and typed errors.

pub mod assignment;
pub mod authorize;
pub mod claims;
pub mod identity;
pub mod policy;
pub mod provider;
pub mod roles;
pub mod verifier;

pub use assignment::{AssignmentError, RoleAssignment, RoleAssignmentService};
pub use authorize::{authorize, Decision, Denial};
pub use claims::{TokenClaims, TokenValidationError, VerifiedClaims};
pub use identity::Identity;
pub use policy::AuthorizationPolicy;
pub use provider::{
    CustomClaims, DirectoryError, IdentityProvider, InMemoryIdentityProvider, JwtIdentityProvider, ProviderError,
    TimeoutProvider, UserDirectory, UserRecord,
};
pub use roles::{Role, UnknownRole};
pub use verifier::{extract_bearer, CredentialVerifier, VerificationError};
