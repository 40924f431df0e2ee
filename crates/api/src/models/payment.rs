//! Payment row model.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;

use pokeshop_core::{OrderId, PaymentId, PaymentStatus};

/// A payment row from the `paiements` table.
///
/// `transaction_id` is the Stripe checkout-session id and is UNIQUE: it
/// identifies at most one payment attempt, and the webhook uses it to find
/// the row to validate.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Payment {
    pub id: PaymentId,
    #[sqlx(rename = "commande_id")]
    #[serde(rename = "commande_id")]
    pub order_id: OrderId,
    pub transaction_id: String,
    #[sqlx(rename = "montant")]
    #[serde(rename = "montant", with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    #[sqlx(rename = "statut")]
    #[serde(rename = "statut")]
    pub status: PaymentStatus,
    #[sqlx(rename = "date_creation")]
    #[serde(rename = "date_creation")]
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_payment_serializes_french_field_names() {
        let payment = Payment {
            id: PaymentId::new(1),
            order_id: OrderId::new(7),
            transaction_id: "cs_test_a1b2c3".to_owned(),
            amount: Decimal::new(4990, 2),
            status: PaymentStatus::Pending,
            created_at: Utc::now(),
        };

        let json: serde_json::Value = serde_json::to_value(&payment).unwrap();
        assert_eq!(json["commande_id"], 7);
        assert_eq!(json["transaction_id"], "cs_test_a1b2c3");
        // Amounts go over the wire as numbers, never as strings.
        assert!(json["montant"].is_number());
        assert_eq!(json["montant"], 49.90);
        assert_eq!(json["statut"], "en_attente");
    }
}
