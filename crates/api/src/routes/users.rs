//! User management endpoints.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;

use pokeshop_core::{Credential, Email, Role, UserId};

use crate::db::{OrderRepository, UserRepository};
use crate::error::AppError;
use crate::models::{NewUser, UserProfile, UserUpdate};
use crate::services::auth::hash_credential;
use crate::state::AppState;

use super::orders::{OrderResponse, order_responses};

#[derive(Debug, serde::Deserialize)]
pub struct CreateUserRequest {
    pub nom: String,
    pub email: Email,
    pub mot_de_passe: Credential,
    #[serde(default)]
    pub role: Option<Role>,
}

#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct UpdateUserRequest {
    pub nom: Option<String>,
    pub email: Option<Email>,
    pub mot_de_passe: Option<Credential>,
    pub role: Option<Role>,
}

/// `POST /utilisateurs`
///
/// Registration. The credential is hashed before it reaches the
/// repository; the response carries no credential material.
pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserProfile>), AppError> {
    let hashed = hash_credential(body.mot_de_passe)?;
    let password_hash = hashed
        .as_hash()
        .ok_or_else(|| AppError::BadRequest("Mot de passe invalide".to_owned()))?
        .to_owned();

    let user = UserRepository::new(state.pool())
        .create(&NewUser {
            name: body.nom,
            email: body.email,
            password_hash,
            role: body.role.unwrap_or(Role::Client),
        })
        .await?;

    Ok((StatusCode::CREATED, Json(UserProfile::from(user))))
}

/// `GET /utilisateurs`
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<UserProfile>>, AppError> {
    let users = UserRepository::new(state.pool()).list().await?;
    Ok(Json(users.into_iter().map(UserProfile::from).collect()))
}

/// `GET /utilisateurs/{id}`
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<UserId>,
) -> Result<Json<UserProfile>, AppError> {
    let user = UserRepository::new(state.pool())
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Utilisateur non trouvé".to_owned()))?;
    Ok(Json(UserProfile::from(user)))
}

/// `PUT /utilisateurs/{id}`
///
/// Partial update: absent fields keep their stored value. A supplied
/// credential is hashed exactly once before persistence.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<UserId>,
    Json(body): Json<UpdateUserRequest>,
) -> Result<Json<UserProfile>, AppError> {
    let password_hash = match body.mot_de_passe {
        Some(credential) => {
            let hashed = hash_credential(credential)?;
            Some(
                hashed
                    .as_hash()
                    .ok_or_else(|| AppError::BadRequest("Mot de passe invalide".to_owned()))?
                    .to_owned(),
            )
        }
        None => None,
    };

    let user = UserRepository::new(state.pool())
        .update(
            id,
            &UserUpdate {
                name: body.nom,
                email: body.email,
                password_hash,
                role: body.role,
            },
        )
        .await?;

    Ok(Json(UserProfile::from(user)))
}

/// `DELETE /utilisateurs/{id}`
pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<UserId>,
) -> Result<StatusCode, AppError> {
    if UserRepository::new(state.pool()).delete(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound("Utilisateur non trouvé".to_owned()))
    }
}

/// `GET /utilisateurs/{id}/commandes`
///
/// A user's order history, by path parameter.
pub async fn orders(
    State(state): State<AppState>,
    Path(id): Path<UserId>,
) -> Result<Json<Vec<OrderResponse>>, AppError> {
    let users = UserRepository::new(state.pool());
    if users.get(id).await?.is_none() {
        return Err(AppError::NotFound("Utilisateur non trouvé".to_owned()));
    }

    let orders = OrderRepository::new(state.pool()).list_for_user(id).await?;
    Ok(Json(order_responses(state.pool(), orders).await?))
}
