//! Stripe webhook endpoint.

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderMap;
use chrono::Utc;
use serde_json::json;

use crate::db::{PaymentRepository, RepositoryError};
use crate::error::AppError;
use crate::state::AppState;
use crate::stripe::WebhookEvent;

const SIGNATURE_HEADER: &str = "stripe-signature";

/// `POST /webhooks/stripe`
///
/// Verifies the delivery signature over the raw body, then reconciles
/// `checkout.session.completed` events against stored payments. Event
/// types the shop doesn't track are acknowledged without processing, so
/// Stripe stops retrying them.
pub async fn stripe(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<serde_json::Value>, AppError> {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| AppError::BadRequest("Invalid signature".to_owned()))?;

    state
        .webhook()
        .verify(signature, &body, Utc::now().timestamp())
        .map_err(|err| {
            tracing::warn!(error = %err, "rejected webhook delivery");
            AppError::BadRequest("Invalid signature".to_owned())
        })?;

    let event: WebhookEvent = serde_json::from_slice(&body)
        .map_err(|_| AppError::BadRequest("Invalid payload".to_owned()))?;

    if event.event_type == "checkout.session.completed" {
        let transaction_id = event.data.object.id;
        tracing::info!(%transaction_id, "checkout session completed");

        PaymentRepository::new(state.pool())
            .mark_validated(&transaction_id)
            .await
            .map_err(|err| match err {
                RepositoryError::NotFound => AppError::NotFound(format!(
                    "Aucun paiement trouvé avec transaction_id : {transaction_id}"
                )),
                other => AppError::Repository(other),
            })?;
    }

    Ok(Json(json!({ "status": "success" })))
}
