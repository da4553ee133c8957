//! Bearer token issuing and verification
//!
//! Tokens are HS256 JWTs carrying the user id. Issuing lives here (login is
//! handled by another service in production; the CLI uses it for local tokens).

use crate::error::{AppError, AppResult};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

/// JWT claims
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    #[serde(rename = "userId")]
    pub user_id: i64,
    pub iat: u64,
    pub exp: u64,
}

/// Caller identity, inserted into request extensions by the auth middleware
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: i64,
}

/// Mint a token for `user_id` valid for `ttl_seconds`
pub fn issue_token(secret: &str, user_id: i64, ttl_seconds: u64) -> AppResult<String> {
    let now = jsonwebtoken::get_current_timestamp();
    let claims = Claims {
        user_id,
        iat: now,
        exp: now.saturating_add(ttl_seconds),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(format!("Failed to sign token: {}", e)))
}

/// Verify a token's signature and expiry
///
/// # Errors
///
/// Returns `AppError::InvalidToken` for any bad signature, malformed token,
/// or expired token.
pub fn verify_token(secret: &str, token: &str) -> AppResult<AuthenticatedUser> {
    let mut validation = Validation::default();
    validation.leeway = 0;

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map(|data| AuthenticatedUser {
        user_id: data.claims.user_id,
    })
    .map_err(|e| {
        tracing::debug!(error = %e, "Bearer token rejected");
        AppError::InvalidToken
    })
}

/// Pull the token out of an `Authorization: Bearer <token>` header value
///
/// Returns `None` when the header has no second segment.
pub fn bearer_token(header_value: &str) -> Option<&str> {
    header_value
        .split(' ')
        .nth(1)
        .filter(|token| !token.is_empty())
}
