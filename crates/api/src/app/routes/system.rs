use axum::http::StatusCode;

use crate::app::errors::ApiError;

pub const BANNER: &str = "High-Risk Loan Application Monitoring System API";

pub async fn index() -> &'static str {
    BANNER
}

pub async fn health() -> StatusCode {
    StatusCode::OK
}

pub async fn not_found() -> ApiError {
    ApiError::NotFound
}
