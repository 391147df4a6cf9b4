//! Loan-application endpoints.
//!
//! These are stubs: the gate in front of them is the product, the handlers
//! only acknowledge the call.

use axum::{
    extract::Path,
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};

use loangate_auth::{AuthorizationPolicy, Role};
use loangate_core::LoanId;

use crate::app::dto::MessageResponse;
use crate::app::errors::ApiError;
use crate::app::services::AppServices;
use crate::authz::protect;

pub fn router(services: &AppServices) -> Router {
    let auth = services.auth_state();

    Router::new()
        .route(
            "/",
            protect(post(create_loan), &auth, AuthorizationPolicy::roles([Role::User])).merge(protect(
                get(list_loans),
                &auth,
                AuthorizationPolicy::roles([Role::Officer, Role::Manager]),
            )),
        )
        .route(
            "/:id/review",
            protect(put(review_loan), &auth, AuthorizationPolicy::roles([Role::Officer])),
        )
        .route(
            "/:id/approve",
            protect(put(approve_loan), &auth, AuthorizationPolicy::roles([Role::Manager])),
        )
}

/// POST /loans - Submit a loan application
pub async fn create_loan() -> (StatusCode, Json<MessageResponse>) {
    (
        StatusCode::CREATED,
        Json(MessageResponse::new("Loan application created")),
    )
}

/// GET /loans - List loan applications
pub async fn list_loans() -> Json<MessageResponse> {
    Json(MessageResponse::new("Fetched all loan applications"))
}

/// PUT /loans/:id/review - Review a loan application
pub async fn review_loan(Path(id): Path<String>) -> Result<Json<MessageResponse>, ApiError> {
    let id = LoanId::parse(id)?;
    Ok(Json(MessageResponse::new(format!("Loan application {id} reviewed"))))
}

/// PUT /loans/:id/approve - Approve a loan application
pub async fn approve_loan(Path(id): Path<String>) -> Result<Json<MessageResponse>, ApiError> {
    let id = LoanId::parse(id)?;
    Ok(Json(MessageResponse::new(format!("Loan application {id} approved"))))
}
