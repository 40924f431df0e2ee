//! Review repository.

use sqlx::PgPool;

use pokeshop_core::{ProductId, ReviewId, UserId};

use super::RepositoryError;
use crate::models::Review;

/// Repository for review database operations.
pub struct ReviewRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ReviewRepository<'a> {
    /// Create a new review repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert a review and return it joined with user and product names.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(
        &self,
        user_id: UserId,
        product_id: ProductId,
        rating: i32,
        comment: &str,
    ) -> Result<Review, RepositoryError> {
        let id: ReviewId = sqlx::query_scalar(
            "INSERT INTO avis (utilisateur_id, produit_id, note, commentaire)
             VALUES ($1, $2, $3, $4)
             RETURNING id",
        )
        .bind(user_id)
        .bind(product_id)
        .bind(rating)
        .bind(comment)
        .fetch_one(self.pool)
        .await?;

        let review = sqlx::query_as::<_, Review>(
            "SELECT a.id, u.nom AS utilisateur, p.nom AS produit,
                    a.note, a.commentaire, a.date_creation
             FROM avis a
             JOIN utilisateurs u ON u.id = a.utilisateur_id
             JOIN pokedex p ON p.id = a.produit_id
             WHERE a.id = $1",
        )
        .bind(id)
        .fetch_one(self.pool)
        .await?;
        Ok(review)
    }

    /// List a product's reviews joined with user and product names, newest
    /// first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_product(
        &self,
        product_id: ProductId,
    ) -> Result<Vec<Review>, RepositoryError> {
        let reviews = sqlx::query_as::<_, Review>(
            "SELECT a.id, u.nom AS utilisateur, p.nom AS produit,
                    a.note, a.commentaire, a.date_creation
             FROM avis a
             JOIN utilisateurs u ON u.id = a.utilisateur_id
             JOIN pokedex p ON p.id = a.produit_id
             WHERE a.produit_id = $1
             ORDER BY a.date_creation DESC",
        )
        .bind(product_id)
        .fetch_all(self.pool)
        .await?;
        Ok(reviews)
    }

    /// Delete a review.
    ///
    /// # Returns
    ///
    /// Returns `true` if the review was deleted, `false` if it didn't exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, id: ReviewId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM avis WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
