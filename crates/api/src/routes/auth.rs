//! Login and token-refresh endpoints.

use axum::Json;
use axum::extract::State;

use pokeshop_core::{Credential, Email};

use crate::db::UserRepository;
use crate::error::AppError;
use crate::services::auth::{self, AuthError};
use crate::services::TokenPair;
use crate::state::AppState;

/// Login body. The credential rides in a [`Credential`] so a logged
/// request can never print it.
#[derive(Debug, serde::Deserialize)]
pub struct LoginRequest {
    pub email: Email,
    pub password: Credential,
}

#[derive(Debug, serde::Deserialize)]
pub struct RefreshRequest {
    pub refresh: String,
}

/// `POST /auth/login`
///
/// Returns a `{refresh, access}` token pair, or 401 with a single
/// undifferentiated message for both unknown emails and wrong passwords.
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<TokenPair>, AppError> {
    // Deserialization only ever yields plaintext credentials.
    let password = body
        .password
        .expose_plaintext()
        .ok_or(AppError::Auth(AuthError::InvalidCredentials))?;

    let users = UserRepository::new(state.pool());
    let (_user, pair) = auth::login(&users, state.tokens(), &body.email, password).await?;
    Ok(Json(pair))
}

/// `POST /auth/refresh`
///
/// Exchanges a valid refresh token for a fresh `{refresh, access}` pair.
/// The user must still exist; a deleted account cannot keep refreshing.
pub async fn refresh(
    State(state): State<AppState>,
    Json(body): Json<RefreshRequest>,
) -> Result<Json<TokenPair>, AppError> {
    let user_id = state
        .tokens()
        .verify_refresh(&body.refresh)
        .map_err(|_| AppError::Unauthorized("Token invalide ou expiré".to_owned()))?;

    let user = UserRepository::new(state.pool())
        .get(user_id)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Token invalide ou expiré".to_owned()))?;

    let pair = state.tokens().issue_pair(user.id).map_err(AuthError::from)?;
    Ok(Json(pair))
}
