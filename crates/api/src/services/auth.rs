//! Credential hashing and login.

use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};

use pokeshop_core::{Credential, Email};

use crate::db::{RepositoryError, UserRepository};
use crate::models::User;
use crate::services::token::{TokenError, TokenPair, TokenService};

/// Errors from authentication operations.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Unknown email or wrong password. Deliberately a single variant so
    /// the response can't be used to probe which emails exist.
    #[error("Email ou mot de passe incorrect")]
    InvalidCredentials,

    #[error("failed to hash credential")]
    Hashing,

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Hash a credential with argon2id, unless it is already hashed.
///
/// # Errors
///
/// Returns `AuthError::Hashing` if argon2 fails.
pub fn hash_credential(credential: Credential) -> Result<Credential, AuthError> {
    credential.into_hashed(|plaintext| {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(plaintext.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|_| AuthError::Hashing)
    })
}

/// Verify a plaintext password against a stored argon2 hash.
#[must_use]
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(stored_hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

/// Check a user's credentials and issue a token pair.
///
/// # Errors
///
/// Returns `AuthError::InvalidCredentials` whether the email is unknown or
/// the password doesn't match.
pub async fn login(
    users: &UserRepository<'_>,
    tokens: &TokenService,
    email: &Email,
    password: &str,
) -> Result<(User, TokenPair), AuthError> {
    let user = users
        .get_by_email(email)
        .await?
        .ok_or(AuthError::InvalidCredentials)?;

    if !verify_password(password, &user.password_hash) {
        return Err(AuthError::InvalidCredentials);
    }

    let pair = tokens.issue_pair(user.id)?;
    Ok((user, pair))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_then_verify() {
        let hashed = hash_credential(Credential::plaintext("pikachu25")).unwrap();
        let hash = hashed.as_hash().unwrap();
        assert!(verify_password("pikachu25", hash));
        assert!(!verify_password("raichu26", hash));
    }

    #[test]
    fn test_already_hashed_passes_through() {
        let hashed = hash_credential(Credential::plaintext("dracofeu")).unwrap();
        let hash = hashed.as_hash().unwrap().to_owned();
        let again = hash_credential(hashed.clone()).unwrap();
        assert_eq!(again.as_hash().unwrap(), hash);
    }

    #[test]
    fn test_verify_rejects_malformed_hash() {
        assert!(!verify_password("whatever", "not-a-phc-string"));
    }
}
