//! Admin login/logout/identity handlers.

use axum::{
    Router,
    extract::State,
    http::header,
    response::IntoResponse,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::middleware::RequireAdminAuth;
use crate::models::CurrentAdmin;
use crate::services::AdminAuthService;
use crate::state::AppState;

use super::{ApiJson, success, success_message};

/// Build the admin auth router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/admin/login", post(login))
        .route("/api/admin/logout", post(logout))
        .route("/api/admin/me", get(me))
}

/// Login request body.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
    pub password: String,
}

#[derive(Debug, Serialize)]
struct AdminData {
    admin: CurrentAdmin,
}

/// Authenticate with the shared password and set the session cookie.
async fn login(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<LoginRequest>,
) -> Result<impl IntoResponse> {
    if body.password.is_empty() {
        return Err(AppError::Validation("Password is required".to_string()));
    }

    let admin = AdminAuthService::new(state.config())
        .authenticate(&body.password)
        .ok_or_else(|| AppError::Unauthorized("Incorrect password".to_string()))?;

    let cookie = state
        .sessions()
        .issue_cookie(&admin)
        .map_err(|e| AppError::Internal(format!("failed to issue session: {e}")))?;

    tracing::info!("admin logged in");
    Ok(([(header::SET_COOKIE, cookie)], success(AdminData { admin })))
}

/// Clear the session cookie.
async fn logout(State(state): State<AppState>) -> impl IntoResponse {
    (
        [(header::SET_COOKIE, state.sessions().clear_cookie())],
        success_message("Logged out"),
    )
}

/// Return the current admin identity (401 without a valid session).
async fn me(RequireAdminAuth(admin): RequireAdminAuth) -> impl IntoResponse {
    success(AdminData { admin })
}
