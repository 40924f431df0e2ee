//! JWT issuance and verification.
//!
//! Tokens come in pairs: a short-lived access token sent as a bearer header
//! on every authenticated request, and a longer-lived refresh token the
//! client exchanges for a fresh pair. Both are HS256-signed with the
//! configured secret.

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use pokeshop_core::UserId;

/// Access token lifetime.
const ACCESS_TOKEN_LIFETIME_MINUTES: i64 = 15;

/// Refresh token lifetime.
const REFRESH_TOKEN_LIFETIME_DAYS: i64 = 7;

/// Errors from token issuance or verification.
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("failed to encode token: {0}")]
    Encode(#[source] jsonwebtoken::errors::Error),

    #[error("invalid or expired token")]
    Invalid,

    #[error("wrong token type for this operation")]
    WrongUse,
}

/// What a token is good for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenUse {
    Access,
    Refresh,
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: i32,
    iat: i64,
    exp: i64,
    token_use: TokenUse,
}

/// An access/refresh token pair, serialized with the field names clients
/// expect from the login endpoint.
#[derive(Debug, Serialize)]
pub struct TokenPair {
    pub refresh: String,
    pub access: String,
}

/// Signs and verifies JWTs with a single HS256 secret.
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl TokenService {
    /// Build a token service from the shared signing secret.
    #[must_use]
    pub fn new(secret: &SecretString) -> Self {
        let bytes = secret.expose_secret().as_bytes();
        Self {
            encoding: EncodingKey::from_secret(bytes),
            decoding: DecodingKey::from_secret(bytes),
        }
    }

    /// Issue a fresh access/refresh pair for a user.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Encode` if signing fails.
    pub fn issue_pair(&self, user_id: UserId) -> Result<TokenPair, TokenError> {
        Ok(TokenPair {
            refresh: self.issue(user_id, TokenUse::Refresh)?,
            access: self.issue(user_id, TokenUse::Access)?,
        })
    }

    fn issue(&self, user_id: UserId, token_use: TokenUse) -> Result<String, TokenError> {
        let now = Utc::now();
        let lifetime = match token_use {
            TokenUse::Access => Duration::minutes(ACCESS_TOKEN_LIFETIME_MINUTES),
            TokenUse::Refresh => Duration::days(REFRESH_TOKEN_LIFETIME_DAYS),
        };
        let claims = Claims {
            sub: user_id.as_i32(),
            iat: now.timestamp(),
            exp: (now + lifetime).timestamp(),
            token_use,
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(TokenError::Encode)
    }

    /// Verify an access token and return the user it was issued to.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Invalid` for malformed, mis-signed, or expired
    /// tokens, and `TokenError::WrongUse` for a refresh token presented as
    /// an access token.
    pub fn verify_access(&self, token: &str) -> Result<UserId, TokenError> {
        self.verify(token, TokenUse::Access)
    }

    /// Verify a refresh token and return the user it was issued to.
    ///
    /// # Errors
    ///
    /// Same as [`Self::verify_access`], with the token uses swapped.
    pub fn verify_refresh(&self, token: &str) -> Result<UserId, TokenError> {
        self.verify(token, TokenUse::Refresh)
    }

    fn verify(&self, token: &str, expected_use: TokenUse) -> Result<UserId, TokenError> {
        let validation = Validation::new(Algorithm::HS256);
        let data = decode::<Claims>(token, &self.decoding, &validation)
            .map_err(|_| TokenError::Invalid)?;
        if data.claims.token_use != expected_use {
            return Err(TokenError::WrongUse);
        }
        Ok(UserId::new(data.claims.sub))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn service() -> TokenService {
        TokenService::new(&SecretString::from(
            "test-secret-long-enough-for-hs256-use",
        ))
    }

    #[test]
    fn test_issued_access_token_verifies() {
        let service = service();
        let pair = service.issue_pair(UserId::new(42)).unwrap();
        assert_eq!(service.verify_access(&pair.access).unwrap(), UserId::new(42));
        assert_eq!(
            service.verify_refresh(&pair.refresh).unwrap(),
            UserId::new(42)
        );
    }

    #[test]
    fn test_refresh_token_rejected_as_access() {
        let service = service();
        let pair = service.issue_pair(UserId::new(7)).unwrap();
        assert!(matches!(
            service.verify_access(&pair.refresh),
            Err(TokenError::WrongUse)
        ));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let pair = service().issue_pair(UserId::new(1)).unwrap();
        let other = TokenService::new(&SecretString::from(
            "another-secret-entirely-different-one",
        ));
        assert!(matches!(
            other.verify_access(&pair.access),
            Err(TokenError::Invalid)
        ));
    }

    #[test]
    fn test_garbage_token_rejected() {
        assert!(matches!(
            service().verify_access("not.a.jwt"),
            Err(TokenError::Invalid)
        ));
    }

    #[test]
    fn test_pair_serializes_refresh_and_access() {
        let pair = service().issue_pair(UserId::new(3)).unwrap();
        let json: serde_json::Value = serde_json::to_value(&pair).unwrap();
        assert!(json["refresh"].is_string());
        assert!(json["access"].is_string());
    }
}
