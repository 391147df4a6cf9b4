//! Role administration: write a subject's role claim through the provider.

use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;

use loangate_core::{DomainError, SubjectId};

use crate::{authorize, AuthorizationPolicy, Denial, Identity, IdentityProvider, Role};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AssignmentError {
    /// The actor did not pass the manager-only gate.
    #[error("forbidden: {0}")]
    Forbidden(Denial),

    /// The requested role is not part of the role taxonomy.
    #[error("Invalid role")]
    InvalidRole(String),

    /// The target uid is not a well-formed subject id.
    #[error(transparent)]
    InvalidTarget(DomainError),

    /// The provider refused or failed the claim write.
    #[error("role assignment failed: {0}")]
    AssignmentFailed(String),
}

/// Confirmation of a role write. Echoes the request, nothing more.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoleAssignment {
    pub subject_id: SubjectId,
    pub role: Role,
}

impl RoleAssignment {
    pub fn message(&self) -> String {
        format!("Role {} assigned to user {}", self.role, self.subject_id)
    }
}

/// Role-assignment operation, composed behind the manager-only gate.
#[derive(Clone)]
pub struct RoleAssignmentService {
    provider: Arc<dyn IdentityProvider>,
    policy: AuthorizationPolicy,
}

impl RoleAssignmentService {
    pub fn new(provider: Arc<dyn IdentityProvider>) -> Self {
        Self {
            provider,
            policy: AuthorizationPolicy::managers_only(),
        }
    }

    /// Policy the HTTP route must be registered with.
    pub fn policy(&self) -> &AuthorizationPolicy {
        &self.policy
    }

    /// Replace `target`'s role claim with `new_role`.
    ///
    /// The gate runs again here so the operation is safe to call outside the
    /// HTTP pipeline. Checks run in order: gate, role, target uid, so an
    /// unknown role is reported whatever the uid looks like. Nothing reaches
    /// the provider until all three pass.
    pub async fn assign_role(
        &self,
        actor: &Identity,
        target: &str,
        new_role: &str,
    ) -> Result<RoleAssignment, AssignmentError> {
        authorize(&self.policy, Some(actor), None)
            .into_result()
            .map_err(AssignmentError::Forbidden)?;

        let role: Role = new_role
            .parse()
            .map_err(|_| AssignmentError::InvalidRole(new_role.to_string()))?;

        let target = SubjectId::parse(target).map_err(AssignmentError::InvalidTarget)?;

        self.provider
            .set_role_claim(&target, role)
            .await
            .map_err(|e| AssignmentError::AssignmentFailed(e.to_string()))?;

        tracing::info!(actor = %actor.subject_id(), target = %target, %role, "role assigned");

        Ok(RoleAssignment {
            subject_id: target,
            role,
        })
    }
}
