//! Payment initiation and status endpoints.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use rust_decimal::Decimal;
use serde_json::json;

use pokeshop_core::OrderId;

use crate::db::{OrderRepository, PaymentRepository};
use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, serde::Deserialize)]
pub struct InitiatePaymentRequest {
    pub commande_id: OrderId,
    pub montant: Decimal,
}

/// `POST /paiements`
///
/// Creates a hosted checkout session for the order, persists a pending
/// payment keyed by the session id, and returns the redirect URL. The
/// payment row exists before the caller ever sees the session, so any
/// webhook for it will find a row to update.
pub async fn initiate(
    State(state): State<AppState>,
    Json(body): Json<InitiatePaymentRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>), AppError> {
    let order = OrderRepository::new(state.pool())
        .get(body.commande_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Commande non trouvée".to_owned()))?;

    let session = state
        .stripe()
        .create_checkout_session(&order.order_number, body.montant)
        .await?;

    let payment = PaymentRepository::new(state.pool())
        .create(order.id, &session.id, body.montant)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "session_id": session.id,
            "paiement": payment,
            "stripe_url": session.url,
        })),
    ))
}

/// `GET /paiements/{transaction_id}`
pub async fn status(
    State(state): State<AppState>,
    Path(transaction_id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let payment = PaymentRepository::new(state.pool())
        .get_by_transaction(&transaction_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Paiement non trouvé".to_owned()))?;

    Ok(Json(json!({
        "transaction_id": payment.transaction_id,
        "statut": payment.status,
        "montant": payment.amount,
        "date_creation": payment.created_at,
    })))
}
