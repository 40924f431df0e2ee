//! Order and order-line row models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;

use pokeshop_core::{OrderId, OrderStatus, ProductId, UserId};

/// An order row from the `commandes` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Order {
    pub id: OrderId,
    #[sqlx(rename = "utilisateur_id")]
    #[serde(rename = "utilisateur")]
    pub user_id: UserId,
    #[sqlx(rename = "adresse_livraison")]
    #[serde(rename = "adresse_livraison")]
    pub delivery_address: String,
    #[sqlx(rename = "ville")]
    #[serde(rename = "ville")]
    pub city: String,
    #[sqlx(rename = "code_postal")]
    #[serde(rename = "code_postal")]
    pub postal_code: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
    #[sqlx(rename = "numero_commande")]
    #[serde(rename = "numero_commande")]
    pub order_number: String,
    #[sqlx(rename = "statut")]
    #[serde(rename = "statut")]
    pub status: OrderStatus,
    #[sqlx(rename = "date_creation")]
    #[serde(rename = "date_creation")]
    pub created_at: DateTime<Utc>,
}

/// An order line joined with its product name, for serialization inside an
/// order response.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct OrderLineDetail {
    #[sqlx(rename = "produit_nom")]
    pub produit_nom: String,
    pub quantite: i32,
}

/// Fields for inserting a new order.
#[derive(Debug)]
pub struct NewOrder {
    pub user_id: UserId,
    pub delivery_address: String,
    pub city: String,
    pub postal_code: String,
    pub total: Decimal,
    pub order_number: String,
    pub status: OrderStatus,
}

/// A line to attach to an order being created or appended to.
#[derive(Debug, Clone, Copy)]
pub struct NewOrderLine {
    pub product_id: ProductId,
    pub quantity: i32,
}

/// Partial update of the delivery fields. `None` fields are left untouched.
#[derive(Debug, Default)]
pub struct DeliveryUpdate {
    pub delivery_address: Option<String>,
    pub city: Option<String>,
    pub postal_code: Option<String>,
    pub status: Option<OrderStatus>,
}

impl DeliveryUpdate {
    /// Whether the update carries at least one field.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.delivery_address.is_none()
            && self.city.is_none()
            && self.postal_code.is_none()
            && self.status.is_none()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_order_serializes_french_field_names() {
        let order = Order {
            id: OrderId::new(3),
            user_id: UserId::new(1),
            delivery_address: "12 rue des Lilas".to_owned(),
            city: "Nantes".to_owned(),
            postal_code: "44000".to_owned(),
            total: Decimal::new(4990, 2),
            order_number: "CMD-1001".to_owned(),
            status: OrderStatus::Pending,
            created_at: Utc::now(),
        };

        let json: serde_json::Value = serde_json::to_value(&order).unwrap();
        assert_eq!(json["utilisateur"], 1);
        assert_eq!(json["adresse_livraison"], "12 rue des Lilas");
        assert_eq!(json["code_postal"], "44000");
        assert_eq!(json["numero_commande"], "CMD-1001");
        assert_eq!(json["statut"], "en_attente");
        // Amounts go over the wire as numbers, never as strings.
        assert!(json["total"].is_number());
        assert_eq!(json["total"], 49.90);
    }

    #[test]
    fn test_delivery_update_is_empty() {
        assert!(DeliveryUpdate::default().is_empty());
        let update = DeliveryUpdate {
            city: Some("Lille".to_owned()),
            ..DeliveryUpdate::default()
        };
        assert!(!update.is_empty());
    }
}
