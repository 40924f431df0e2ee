//! User row model.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

use pokeshop_core::{Email, Role, UserId};

/// A user row from the `utilisateurs` table.
///
/// The stored credential is an argon2 hash; responses go through
/// [`UserProfile`], which carries no credential material.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: UserId,
    #[sqlx(rename = "nom")]
    pub name: String,
    pub email: Email,
    #[sqlx(rename = "mot_de_passe")]
    pub password_hash: String,
    pub role: Role,
    #[sqlx(rename = "date_creation")]
    pub created_at: DateTime<Utc>,
}

/// Fields for inserting a new user. The credential must already be hashed.
#[derive(Debug)]
pub struct NewUser {
    pub name: String,
    pub email: Email,
    pub password_hash: String,
    pub role: Role,
}

/// Partial update of a user row. `None` fields are left untouched.
///
/// `password_hash` carries a freshly hashed credential when the request
/// supplied one; the stored hash is kept otherwise.
#[derive(Debug, Default)]
pub struct UserUpdate {
    pub name: Option<String>,
    pub email: Option<Email>,
    pub password_hash: Option<String>,
    pub role: Option<Role>,
}

/// Serializable public view of a user (no credential material).
#[derive(Debug, Clone, Serialize)]
pub struct UserProfile {
    pub id: UserId,
    pub nom: String,
    pub email: Email,
    pub role: Role,
    pub date_creation: DateTime<Utc>,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            nom: user.name,
            email: user.email,
            role: user.role,
            date_creation: user.created_at,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_never_contains_hash() {
        let user = User {
            id: UserId::new(1),
            name: "Sacha".to_owned(),
            email: Email::parse("sacha@pokeshop.fr").unwrap(),
            password_hash: "$argon2id$v=19$m=19456,t=2,p=1$abc$def".to_owned(),
            role: Role::Client,
            created_at: Utc::now(),
        };

        let json = serde_json::to_string(&UserProfile::from(user)).unwrap();
        assert!(!json.contains("argon2"));
        assert!(json.contains("\"nom\":\"Sacha\""));
        assert!(json.contains("\"role\":\"client\""));
    }
}
