//! Catalog ("Pokedex") row model.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use pokeshop_core::ProductId;

/// A catalog item row from the `pokedex` table.
///
/// `stock` is kept non-negative by the conditional decrement in
/// [`crate::db::catalog::CatalogRepository::decrement_stock`], not by a
/// database constraint.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CatalogItem {
    pub id: ProductId,
    #[sqlx(rename = "nom")]
    #[serde(rename = "nom")]
    pub name: String,
    pub description: String,
    #[sqlx(rename = "type_pokemon")]
    #[serde(rename = "type_pokemon")]
    pub kind: String,
    #[sqlx(rename = "prix")]
    #[serde(rename = "prix", with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[sqlx(rename = "quantite")]
    #[serde(rename = "quantite")]
    pub stock: i32,
}

/// Fields for inserting a new catalog item.
#[derive(Debug, Deserialize)]
pub struct NewCatalogItem {
    #[serde(rename = "nom")]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type_pokemon", default)]
    pub kind: String,
    #[serde(rename = "prix")]
    pub price: Decimal,
    #[serde(rename = "quantite", default)]
    pub stock: i32,
}

/// Partial update of a catalog item. `None` fields are left untouched.
#[derive(Debug, Default, Deserialize)]
pub struct CatalogItemUpdate {
    #[serde(rename = "nom")]
    pub name: Option<String>,
    pub description: Option<String>,
    #[serde(rename = "type_pokemon")]
    pub kind: Option<String>,
    #[serde(rename = "prix")]
    pub price: Option<Decimal>,
    #[serde(rename = "quantite")]
    pub stock: Option<i32>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_item_serializes_french_field_names() {
        let item = CatalogItem {
            id: ProductId::new(25),
            name: "Pikachu".to_owned(),
            description: "Souris electrique".to_owned(),
            kind: "electrik".to_owned(),
            price: Decimal::new(1999, 2),
            stock: 10,
        };

        let json: serde_json::Value = serde_json::to_value(&item).unwrap();
        assert_eq!(json["nom"], "Pikachu");
        assert_eq!(json["type_pokemon"], "electrik");
        // Amounts go over the wire as numbers, never as strings.
        assert!(json["prix"].is_number());
        assert_eq!(json["prix"], 19.99);
        assert_eq!(json["quantite"], 10);
    }

    #[test]
    fn test_new_item_defaults() {
        let item: NewCatalogItem =
            serde_json::from_str(r#"{"nom": "Salameche", "prix": 12.5}"#).unwrap();
        assert_eq!(item.name, "Salameche");
        assert_eq!(item.stock, 0);
        assert!(item.description.is_empty());
    }
}
