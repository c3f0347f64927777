use axum::{extract::State, http::StatusCode, Extension, Json};

use super::{ApiResponse, AppState};
use crate::error::Result;
use crate::models::{AuthContext, AuthRequest, LoginResponse};
use crate::validators::validate_auth_request;

// An absent or unparseable body is validated as empty fields
fn body_or_default(body: Option<Json<AuthRequest>>) -> AuthRequest {
    body.map(|Json(req)| req).unwrap_or_default()
}

/// POST /v1/auth/register
pub(super) async fn register(
    State(state): State<AppState>,
    body: Option<Json<AuthRequest>>,
) -> Result<ApiResponse> {
    let credentials = validate_auth_request(body_or_default(body))?;
    state.identity.register(credentials).await?;

    Ok(ApiResponse::success("registration success", None).with_status(StatusCode::CREATED))
}

/// POST /v1/auth/login
pub(super) async fn login(
    State(state): State<AppState>,
    body: Option<Json<AuthRequest>>,
) -> Result<ApiResponse<LoginResponse>> {
    let credentials = validate_auth_request(body_or_default(body))?;
    let outcome = state.identity.login(credentials).await?;

    Ok(ApiResponse::success(
        "login success",
        Some(LoginResponse::from(outcome)),
    ))
}

/// PATCH /v1/auth/role
pub(super) async fn update_role(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthContext>,
) -> Result<ApiResponse> {
    state.identity.promote_to_merchant(&caller).await?;

    Ok(ApiResponse::success("update role success", None))
}
