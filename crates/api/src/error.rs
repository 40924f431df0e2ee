//! Application-level error type and its HTTP mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::db::RepositoryError;
use crate::services::AuthError;
use crate::services::token::TokenError;
use crate::stripe::StripeError;

/// Errors a request handler can surface.
///
/// Each variant maps to one HTTP status; internal details never leak into
/// the response body.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Stripe(#[from] StripeError),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),
}

impl AppError {
    fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            Self::Repository(RepositoryError::NotFound) => {
                (StatusCode::NOT_FOUND, "Ressource non trouvée".to_owned())
            }
            Self::Repository(RepositoryError::Conflict(message)) => {
                (StatusCode::CONFLICT, message.clone())
            }
            Self::Repository(err) => {
                tracing::error!(error = %err, "database error");
                internal()
            }
            Self::Auth(AuthError::InvalidCredentials) => (
                StatusCode::UNAUTHORIZED,
                AuthError::InvalidCredentials.to_string(),
            ),
            Self::Auth(AuthError::Token(TokenError::Invalid | TokenError::WrongUse)) => (
                StatusCode::UNAUTHORIZED,
                "Token invalide ou expiré".to_owned(),
            ),
            Self::Auth(err) => {
                tracing::error!(error = %err, "authentication error");
                internal()
            }
            // Stripe refusals surface to the caller; transport failures don't.
            Self::Stripe(err @ (StripeError::Api { .. } | StripeError::InvalidAmount(_))) => {
                (StatusCode::BAD_REQUEST, err.to_string())
            }
            Self::Stripe(err) => {
                tracing::error!(error = %err, "stripe request failed");
                internal()
            }
            Self::BadRequest(message) => (StatusCode::BAD_REQUEST, message.clone()),
            Self::Unauthorized(message) => (StatusCode::UNAUTHORIZED, message.clone()),
            Self::Forbidden(message) => (StatusCode::FORBIDDEN, message.clone()),
            Self::NotFound(message) => (StatusCode::NOT_FOUND, message.clone()),
            Self::Conflict(message) => (StatusCode::CONFLICT, message.clone()),
        }
    }
}

fn internal() -> (StatusCode, String) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "Internal server error".to_owned(),
    )
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();
        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_maps_to_404() {
        let (status, message) =
            AppError::NotFound("Commande non trouvée".to_owned()).status_and_message();
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(message, "Commande non trouvée");
    }

    #[test]
    fn test_repository_not_found_maps_to_404() {
        let (status, _) = AppError::Repository(RepositoryError::NotFound).status_and_message();
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_invalid_credentials_maps_to_401_with_french_message() {
        let (status, message) =
            AppError::Auth(AuthError::InvalidCredentials).status_and_message();
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(message, "Email ou mot de passe incorrect");
    }

    #[test]
    fn test_database_details_are_hidden() {
        let err = AppError::Repository(RepositoryError::DataCorruption(
            "password column is garbage".to_owned(),
        ));
        let (status, message) = err.status_and_message();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!message.contains("password"));
    }

    #[test]
    fn test_conflict_maps_to_409() {
        let err = AppError::Repository(RepositoryError::Conflict(
            "transaction_id already exists".to_owned(),
        ));
        let (status, _) = err.status_and_message();
        assert_eq!(status, StatusCode::CONFLICT);
    }
}
