//! Order endpoints: creation with nested lines, delivery tracking and
//! updates, and the bulk product-append action.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use rand::Rng;
use rust_decimal::Decimal;
use serde_json::json;
use sqlx::PgPool;

use pokeshop_core::{OrderId, OrderStatus, ProductId, UserId};

use crate::db::{AppendLinesError, OrderRepository, RepositoryError};
use crate::error::AppError;
use crate::middleware::AuthUser;
use crate::models::{DeliveryUpdate, NewOrder, NewOrderLine, Order, OrderLineDetail};
use crate::state::AppState;

/// An order plus its lines, the shape every order read returns.
#[derive(Debug, serde::Serialize)]
pub struct OrderResponse {
    #[serde(flatten)]
    pub order: Order,
    pub details: Vec<OrderLineDetail>,
}

#[derive(Debug, serde::Deserialize)]
pub struct CreateOrderRequest {
    pub utilisateur: UserId,
    pub adresse_livraison: String,
    pub ville: String,
    pub code_postal: String,
    pub total: Decimal,
    pub numero_commande: Option<String>,
    pub statut: Option<OrderStatus>,
    #[serde(default)]
    pub details: Vec<OrderLineRequest>,
}

#[derive(Debug, serde::Deserialize)]
pub struct OrderLineRequest {
    pub produit: ProductId,
    pub quantite: Option<i32>,
}

#[derive(Debug, serde::Deserialize)]
pub struct AppendProductsRequest {
    #[serde(default)]
    pub produits: Vec<AppendProductRequest>,
}

#[derive(Debug, serde::Deserialize)]
pub struct AppendProductRequest {
    pub produit_id: ProductId,
    pub quantite: Option<i32>,
}

#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct DeliveryUpdateRequest {
    pub adresse_livraison: Option<String>,
    pub ville: Option<String>,
    pub code_postal: Option<String>,
    pub statut: Option<OrderStatus>,
}

/// Attach line details to each order.
pub(super) async fn order_responses(
    pool: &PgPool,
    orders: Vec<Order>,
) -> Result<Vec<OrderResponse>, RepositoryError> {
    let repo = OrderRepository::new(pool);
    let mut responses = Vec::with_capacity(orders.len());
    for order in orders {
        let details = repo.lines_with_product_names(order.id).await?;
        responses.push(OrderResponse { order, details });
    }
    Ok(responses)
}

fn to_lines(
    requests: impl IntoIterator<Item = (ProductId, Option<i32>)>,
) -> Result<Vec<NewOrderLine>, AppError> {
    requests
        .into_iter()
        .map(|(product_id, quantity)| {
            let quantity = quantity.unwrap_or(1);
            if quantity < 1 {
                return Err(AppError::BadRequest(
                    "La quantité doit être un entier positif".to_owned(),
                ));
            }
            Ok(NewOrderLine {
                product_id,
                quantity,
            })
        })
        .collect()
}

fn generate_order_number() -> String {
    let n = rand::thread_rng().gen_range(1000..10000);
    format!("CMD-{n}")
}

/// `POST /commandes`
///
/// Creates the order and all its lines in one transaction. An absent
/// `numero_commande` is generated; absent line quantities default to 1.
pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<CreateOrderRequest>,
) -> Result<(StatusCode, Json<OrderResponse>), AppError> {
    let lines = to_lines(body.details.into_iter().map(|d| (d.produit, d.quantite)))?;

    let new_order = NewOrder {
        user_id: body.utilisateur,
        delivery_address: body.adresse_livraison,
        city: body.ville,
        postal_code: body.code_postal,
        total: body.total,
        order_number: body.numero_commande.unwrap_or_else(generate_order_number),
        status: body.statut.unwrap_or(OrderStatus::Pending),
    };

    let repo = OrderRepository::new(state.pool());
    let order = repo.create(&new_order, &lines).await?;
    let details = repo.lines_with_product_names(order.id).await?;

    Ok((
        StatusCode::CREATED,
        Json(OrderResponse { order, details }),
    ))
}

/// `GET /commandes`
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<OrderResponse>>, AppError> {
    let orders = OrderRepository::new(state.pool()).list().await?;
    Ok(Json(order_responses(state.pool(), orders).await?))
}

/// `GET /commandes/{id}`
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<OrderId>,
) -> Result<Json<OrderResponse>, AppError> {
    let repo = OrderRepository::new(state.pool());
    let order = repo
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Commande non trouvée".to_owned()))?;
    let details = repo.lines_with_product_names(order.id).await?;
    Ok(Json(OrderResponse { order, details }))
}

/// `GET /mes-commandes`
///
/// The caller's own order history, resolved from the bearer token.
pub async fn mine(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<Vec<OrderResponse>>, AppError> {
    let orders = OrderRepository::new(state.pool())
        .list_for_user(user.id)
        .await?;
    Ok(Json(order_responses(state.pool(), orders).await?))
}

/// `GET /commandes/{id}/suivi-livraison`
///
/// Read-only delivery view: a subset of the order's fields.
pub async fn delivery_tracking(
    State(state): State<AppState>,
    Path(id): Path<OrderId>,
) -> Result<Json<serde_json::Value>, AppError> {
    let order = OrderRepository::new(state.pool())
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Commande non trouvée".to_owned()))?;

    Ok(Json(json!({
        "numero_commande": order.order_number,
        "statut": order.status,
        "adresse_livraison": order.delivery_address,
        "ville": order.city,
        "code_postal": order.postal_code,
    })))
}

/// `PATCH /commandes/{id}/livraison`
///
/// Overwrites only the supplied delivery fields; a body carrying none of
/// them is rejected rather than silently doing nothing.
pub async fn update_delivery(
    State(state): State<AppState>,
    Path(id): Path<OrderId>,
    Json(body): Json<DeliveryUpdateRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let update = DeliveryUpdate {
        delivery_address: body.adresse_livraison,
        city: body.ville,
        postal_code: body.code_postal,
        status: body.statut,
    };
    if update.is_empty() {
        return Err(AppError::BadRequest(
            "Aucune information de livraison fournie".to_owned(),
        ));
    }

    let order = OrderRepository::new(state.pool())
        .update_delivery(id, &update)
        .await
        .map_err(|err| match err {
            RepositoryError::NotFound => AppError::NotFound("Commande non trouvée".to_owned()),
            other => AppError::Repository(other),
        })?;

    Ok(Json(json!({
        "message": "Les informations de livraison ont été mises à jour.",
        "adresse_livraison": order.delivery_address,
        "ville": order.city,
        "code_postal": order.postal_code,
        "statut": order.status,
    })))
}

/// `POST /commandes/{id}/produits`
///
/// Appends the listed products as order lines, all-or-nothing: a single
/// unknown product id rejects the whole batch and nothing is written.
pub async fn add_products(
    State(state): State<AppState>,
    Path(id): Path<OrderId>,
    Json(body): Json<AppendProductsRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let repo = OrderRepository::new(state.pool());
    if repo.get(id).await?.is_none() {
        return Err(AppError::NotFound("Commande non trouvée".to_owned()));
    }

    let lines = to_lines(body.produits.into_iter().map(|p| (p.produit_id, p.quantite)))?;

    repo.append_lines(id, &lines).await.map_err(|err| match err {
        AppendLinesError::ProductNotFound(product_id) => {
            AppError::NotFound(format!("Produit avec id {product_id} non trouvé"))
        }
        AppendLinesError::Repository(other) => AppError::Repository(other),
    })?;

    Ok(Json(json!({
        "message": "Produits ajoutés à la commande avec succès"
    })))
}
