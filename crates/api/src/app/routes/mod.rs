use axum::Router;

use crate::app::services::AppServices;

pub mod auth;
pub mod loans;
pub mod system;

/// Router for all authenticated endpoints, mounted under `/api/v1`.
pub fn router(services: &AppServices) -> Router {
    Router::new()
        .nest("/loans", loans::router(services))
        .nest("/auth", auth::router(services))
}
