//! Review row model.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

use pokeshop_core::ReviewId;

/// A review joined with the author and product names, as served to clients.
///
/// `rating` is stored verbatim from the request; no range validation is
/// applied.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Review {
    pub id: ReviewId,
    #[sqlx(rename = "utilisateur")]
    #[serde(rename = "utilisateur")]
    pub user_name: String,
    #[sqlx(rename = "produit")]
    #[serde(rename = "produit")]
    pub product_name: String,
    #[sqlx(rename = "note")]
    #[serde(rename = "note")]
    pub rating: i32,
    #[sqlx(rename = "commentaire")]
    #[serde(rename = "commentaire")]
    pub comment: String,
    #[sqlx(rename = "date_creation")]
    #[serde(rename = "date_creation")]
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_review_serializes_french_field_names() {
        let review = Review {
            id: ReviewId::new(4),
            user_name: "Ondine".to_owned(),
            product_name: "Stari".to_owned(),
            rating: 5,
            comment: "Parfait".to_owned(),
            created_at: Utc::now(),
        };

        let json: serde_json::Value = serde_json::to_value(&review).unwrap();
        assert_eq!(json["utilisateur"], "Ondine");
        assert_eq!(json["produit"], "Stari");
        assert_eq!(json["note"], 5);
        assert_eq!(json["commentaire"], "Parfait");
    }
}
