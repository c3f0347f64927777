use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::{IntoResponse, Response},
};
use crypto_core::jwt::extract_bearer_token;
use tracing::debug;

use super::AppState;
use crate::error::IdentityError;
use crate::models::AuthContext;

/// Verify `Authorization: Bearer <token>` and attach the caller's
/// `AuthContext` to the request.
///
/// Only the signature is checked; the session cache is not consulted.
pub(super) async fn require_bearer(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(extract_bearer_token)
        .map(str::to_owned);

    let Some(token) = token else {
        debug!(path = %request.uri().path(), "Missing or malformed bearer token");
        return IdentityError::Unauthorized.into_response();
    };

    let claims = match state.tokens.parse(&token) {
        Ok(claims) => claims,
        Err(err) => return err.into_response(),
    };

    request.extensions_mut().insert(AuthContext::from(claims));
    next.run(request).await
}
