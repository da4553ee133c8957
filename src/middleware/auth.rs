//! Bearer authentication middleware
//!
//! Guards the `/api` routes. A missing token is 401, an invalid or expired one
//! is 403. On success the caller's `AuthenticatedUser` is added to the request
//! extensions.

use crate::auth::{bearer_token, verify_token};
use crate::error::AppError;
use crate::handlers::AppState;
use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};

/// Reject requests without a valid bearer token
pub async fn require_bearer(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(bearer_token)
        .ok_or(AppError::MissingToken)?;

    let user = verify_token(&state.config().auth.jwt_secret, token)?;
    request.extensions_mut().insert(user);

    Ok(next.run(request).await)
}
