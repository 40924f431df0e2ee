//! Product review endpoints.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde_json::json;

use pokeshop_core::{ProductId, ReviewId};

use crate::db::{CatalogRepository, OrderRepository, ReviewRepository};
use crate::error::AppError;
use crate::middleware::{AdminUser, AuthUser};
use crate::models::Review;
use crate::state::AppState;

#[derive(Debug, serde::Deserialize)]
pub struct CreateReviewRequest {
    pub note: i32,
    #[serde(default)]
    pub commentaire: String,
}

/// `GET /pokedex/{id}/avis`
pub async fn list_for_product(
    State(state): State<AppState>,
    Path(product_id): Path<ProductId>,
) -> Result<Json<Vec<Review>>, AppError> {
    if CatalogRepository::new(state.pool())
        .get(product_id)
        .await?
        .is_none()
    {
        return Err(AppError::NotFound("Produit non trouvé".to_owned()));
    }

    let reviews = ReviewRepository::new(state.pool())
        .list_for_product(product_id)
        .await?;
    Ok(Json(reviews))
}

/// `POST /pokedex/{id}/avis`
///
/// Only a user with a delivered order containing the product may review
/// it; anyone else gets a 403 and no row is written.
pub async fn create(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(product_id): Path<ProductId>,
    Json(body): Json<CreateReviewRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>), AppError> {
    if CatalogRepository::new(state.pool())
        .get(product_id)
        .await?
        .is_none()
    {
        return Err(AppError::NotFound("Produit non trouvé".to_owned()));
    }

    let qualifies = OrderRepository::new(state.pool())
        .contains_delivered_product(user.id, product_id)
        .await?;
    if !qualifies {
        return Err(AppError::Forbidden(
            "Vous devez acheter ce produit pour laisser un avis".to_owned(),
        ));
    }

    let review = ReviewRepository::new(state.pool())
        .create(user.id, product_id, body.note, &body.commentaire)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Avis ajouté avec succès",
            "avis": review,
        })),
    ))
}

/// `DELETE /avis/{id}`
///
/// Admin only.
pub async fn remove(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Path(id): Path<ReviewId>,
) -> Result<StatusCode, AppError> {
    if ReviewRepository::new(state.pool()).delete(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound("Avis non trouvé".to_owned()))
    }
}
