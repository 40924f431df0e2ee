//! Catalog (Pokedex) repository.

use sqlx::PgPool;

use pokeshop_core::ProductId;

use super::RepositoryError;
use crate::models::{CatalogItem, CatalogItemUpdate, NewCatalogItem};

const ITEM_COLUMNS: &str = "id, nom, description, type_pokemon, prix, quantite";

/// Outcome of a conditional stock decrement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockDecrement {
    /// Stock was decremented.
    Applied,
    /// The item exists but doesn't hold enough stock.
    Insufficient,
    /// No item with that id.
    NotFound,
}

/// Repository for catalog database operations.
pub struct CatalogRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CatalogRepository<'a> {
    /// Create a new catalog repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new catalog item.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(&self, item: &NewCatalogItem) -> Result<CatalogItem, RepositoryError> {
        let item = sqlx::query_as::<_, CatalogItem>(
            "INSERT INTO pokedex (nom, description, type_pokemon, prix, quantite)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING id, nom, description, type_pokemon, prix, quantite",
        )
        .bind(&item.name)
        .bind(&item.description)
        .bind(&item.kind)
        .bind(item.price)
        .bind(item.stock)
        .fetch_one(self.pool)
        .await?;
        Ok(item)
    }

    /// Get a catalog item by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: ProductId) -> Result<Option<CatalogItem>, RepositoryError> {
        let item = sqlx::query_as::<_, CatalogItem>(&format!(
            "SELECT {ITEM_COLUMNS} FROM pokedex WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;
        Ok(item)
    }

    /// List all catalog items.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<CatalogItem>, RepositoryError> {
        let items = sqlx::query_as::<_, CatalogItem>(&format!(
            "SELECT {ITEM_COLUMNS} FROM pokedex ORDER BY id"
        ))
        .fetch_all(self.pool)
        .await?;
        Ok(items)
    }

    /// List catalog items with stock remaining.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_in_stock(&self) -> Result<Vec<CatalogItem>, RepositoryError> {
        let items = sqlx::query_as::<_, CatalogItem>(&format!(
            "SELECT {ITEM_COLUMNS} FROM pokedex WHERE quantite > 0 ORDER BY id"
        ))
        .fetch_all(self.pool)
        .await?;
        Ok(items)
    }

    /// Apply a partial update; `None` fields keep their stored value.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the item doesn't exist.
    pub async fn update(
        &self,
        id: ProductId,
        update: &CatalogItemUpdate,
    ) -> Result<CatalogItem, RepositoryError> {
        sqlx::query_as::<_, CatalogItem>(
            "UPDATE pokedex
             SET nom = COALESCE($2, nom),
                 description = COALESCE($3, description),
                 type_pokemon = COALESCE($4, type_pokemon),
                 prix = COALESCE($5, prix),
                 quantite = COALESCE($6, quantite)
             WHERE id = $1
             RETURNING id, nom, description, type_pokemon, prix, quantite",
        )
        .bind(id)
        .bind(update.name.as_deref())
        .bind(update.description.as_deref())
        .bind(update.kind.as_deref())
        .bind(update.price)
        .bind(update.stock)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)
    }

    /// Delete a catalog item.
    ///
    /// # Returns
    ///
    /// Returns `true` if the item was deleted, `false` if it didn't exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, id: ProductId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM pokedex WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Decrement stock by `quantity`, only if enough remains.
    ///
    /// The guard lives in the `WHERE` clause, so two concurrent decrements
    /// can never drive the stock negative.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn decrement_stock(
        &self,
        id: ProductId,
        quantity: i32,
    ) -> Result<StockDecrement, RepositoryError> {
        let result = sqlx::query(
            "UPDATE pokedex SET quantite = quantite - $2 WHERE id = $1 AND quantite >= $2",
        )
        .bind(id)
        .bind(quantity)
        .execute(self.pool)
        .await?;

        if result.rows_affected() > 0 {
            return Ok(StockDecrement::Applied);
        }

        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM pokedex WHERE id = $1)")
            .bind(id)
            .fetch_one(self.pool)
            .await?;
        if exists {
            Ok(StockDecrement::Insufficient)
        } else {
            Ok(StockDecrement::NotFound)
        }
    }
}
