//! Identity endpoints: user lookup and role administration.

use axum::{
    extract::{rejection::JsonRejection, Extension, Path},
    routing::{get, post},
    Json, Router,
};

use loangate_auth::{AuthorizationPolicy, Role};
use loangate_core::SubjectId;

use crate::app::dto::{MessageResponse, SetRoleRequest, UserResponse};
use crate::app::errors::ApiError;
use crate::app::services::AppServices;
use crate::authz::protect;
use crate::context::IdentityContext;

pub fn router(services: &AppServices) -> Router {
    let auth = services.auth_state();

    Router::new()
        // Owners may read their own record even before a role is assigned.
        .route(
            "/user/:id",
            protect(
                get(get_user_details),
                &auth,
                AuthorizationPolicy::roles([Role::Manager, Role::Officer, Role::User]).allow_same_user(),
            ),
        )
        .route(
            "/admin/set-role",
            protect(
                post(set_user_role),
                &auth,
                services.role_assignment.policy().clone(),
            ),
        )
}

/// GET /auth/user/:id - Fetch the provider's record for a subject
pub async fn get_user_details(
    Extension(services): Extension<AppServices>,
    Path(id): Path<String>,
) -> Result<Json<UserResponse>, ApiError> {
    let uid = SubjectId::parse(id)?;
    let user = services
        .provider
        .get_user(&uid)
        .await
        .map_err(|e| ApiError::UserLookupFailed(e.to_string()))?;

    Ok(Json(UserResponse { user }))
}

/// POST /auth/admin/set-role - Replace a subject's role claim (managers only)
pub async fn set_user_role(
    Extension(services): Extension<AppServices>,
    actor: IdentityContext,
    body: Result<Json<SetRoleRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let Json(body) = body.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;

    let assignment = services
        .role_assignment
        .assign_role(actor.identity(), body.uid.as_deref().unwrap_or_default(), &body.role_text())
        .await?;

    Ok(Json(MessageResponse::new(assignment.message())))
}
