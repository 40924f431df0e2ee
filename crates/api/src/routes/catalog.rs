//! Catalog ("Pokedex") endpoints, including the stock actions.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde_json::json;

use pokeshop_core::ProductId;

use crate::db::{CatalogRepository, StockDecrement};
use crate::error::AppError;
use crate::models::{CatalogItem, CatalogItemUpdate, NewCatalogItem};
use crate::state::AppState;

#[derive(Debug, serde::Deserialize)]
pub struct StockUpdateRequest {
    #[serde(default)]
    pub quantite: i32,
}

/// `POST /pokedex`
pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<NewCatalogItem>,
) -> Result<(StatusCode, Json<CatalogItem>), AppError> {
    let item = CatalogRepository::new(state.pool()).create(&body).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

/// `GET /pokedex`
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<CatalogItem>>, AppError> {
    let items = CatalogRepository::new(state.pool()).list().await?;
    Ok(Json(items))
}

/// `GET /pokedex/stock`
///
/// Only items with stock remaining.
pub async fn in_stock(State(state): State<AppState>) -> Result<Json<Vec<CatalogItem>>, AppError> {
    let items = CatalogRepository::new(state.pool()).list_in_stock().await?;
    Ok(Json(items))
}

/// `GET /pokedex/{id}`
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<Json<CatalogItem>, AppError> {
    let item = CatalogRepository::new(state.pool())
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Produit non trouvé".to_owned()))?;
    Ok(Json(item))
}

/// `PATCH /pokedex/{id}`
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
    Json(body): Json<CatalogItemUpdate>,
) -> Result<Json<CatalogItem>, AppError> {
    let item = CatalogRepository::new(state.pool())
        .update(id, &body)
        .await
        .map_err(|err| match err {
            crate::db::RepositoryError::NotFound => {
                AppError::NotFound("Produit non trouvé".to_owned())
            }
            other => AppError::Repository(other),
        })?;
    Ok(Json(item))
}

/// `DELETE /pokedex/{id}`
pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<StatusCode, AppError> {
    if CatalogRepository::new(state.pool()).delete(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound("Produit non trouvé".to_owned()))
    }
}

/// `POST /pokedex/{id}/update-stock`
///
/// Decrements stock by the ordered quantity, refusing to go negative. The
/// check and the write are a single conditional `UPDATE`, so concurrent
/// calls cannot oversell.
pub async fn update_stock(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
    Json(body): Json<StockUpdateRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    if body.quantite < 0 {
        return Err(AppError::BadRequest(
            "La quantité doit être un entier positif".to_owned(),
        ));
    }

    match CatalogRepository::new(state.pool())
        .decrement_stock(id, body.quantite)
        .await?
    {
        StockDecrement::Applied => Ok(Json(json!({
            "message": "Stock mis à jour avec succès"
        }))),
        StockDecrement::Insufficient => Err(AppError::BadRequest(
            "Quantité insuffisante en stock".to_owned(),
        )),
        StockDecrement::NotFound => Err(AppError::NotFound("Produit non trouvé".to_owned())),
    }
}
