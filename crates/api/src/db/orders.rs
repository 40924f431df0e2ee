//! Order repository.

use sqlx::PgPool;

use pokeshop_core::{OrderId, ProductId, UserId};

use super::RepositoryError;
use crate::models::{DeliveryUpdate, NewOrder, NewOrderLine, Order, OrderLineDetail};

const ORDER_COLUMNS: &str =
    "id, utilisateur_id, adresse_livraison, ville, code_postal, total, numero_commande, statut, date_creation";

/// Error returned when appending lines to an order.
#[derive(Debug, thiserror::Error)]
pub enum AppendLinesError {
    /// One of the referenced products doesn't exist; nothing was written.
    #[error("product {0} not found")]
    ProductNotFound(ProductId),

    /// Underlying repository error.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl From<sqlx::Error> for AppendLinesError {
    fn from(err: sqlx::Error) -> Self {
        Self::Repository(RepositoryError::Database(err))
    }
}

/// Repository for order database operations.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert an order and its lines in a single transaction.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any statement fails; the
    /// transaction is rolled back and nothing is written.
    pub async fn create(
        &self,
        new_order: &NewOrder,
        lines: &[NewOrderLine],
    ) -> Result<Order, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let order = sqlx::query_as::<_, Order>(
            "INSERT INTO commandes
                 (utilisateur_id, adresse_livraison, ville, code_postal, total, numero_commande, statut)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING id, utilisateur_id, adresse_livraison, ville, code_postal, total,
                       numero_commande, statut, date_creation",
        )
        .bind(new_order.user_id)
        .bind(&new_order.delivery_address)
        .bind(&new_order.city)
        .bind(&new_order.postal_code)
        .bind(new_order.total)
        .bind(&new_order.order_number)
        .bind(new_order.status)
        .fetch_one(&mut *tx)
        .await?;

        for line in lines {
            sqlx::query(
                "INSERT INTO commande_produits (commande_id, produit_id, quantite)
                 VALUES ($1, $2, $3)",
            )
            .bind(order.id)
            .bind(line.product_id)
            .bind(line.quantity)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(order)
    }

    /// Get an order by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: OrderId) -> Result<Option<Order>, RepositoryError> {
        let order = sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS} FROM commandes WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;
        Ok(order)
    }

    /// List all orders, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<Order>, RepositoryError> {
        let orders = sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS} FROM commandes ORDER BY date_creation DESC"
        ))
        .fetch_all(self.pool)
        .await?;
        Ok(orders)
    }

    /// List a user's orders, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Order>, RepositoryError> {
        let orders = sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS} FROM commandes
             WHERE utilisateur_id = $1
             ORDER BY date_creation DESC"
        ))
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;
        Ok(orders)
    }

    /// Fetch an order's lines joined with product names.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn lines_with_product_names(
        &self,
        order_id: OrderId,
    ) -> Result<Vec<OrderLineDetail>, RepositoryError> {
        let lines = sqlx::query_as::<_, OrderLineDetail>(
            "SELECT p.nom AS produit_nom, cp.quantite
             FROM commande_produits cp
             JOIN pokedex p ON p.id = cp.produit_id
             WHERE cp.commande_id = $1
             ORDER BY cp.id",
        )
        .bind(order_id)
        .fetch_all(self.pool)
        .await?;
        Ok(lines)
    }

    /// Apply a partial delivery update; `None` fields keep their stored value.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order doesn't exist.
    pub async fn update_delivery(
        &self,
        id: OrderId,
        update: &DeliveryUpdate,
    ) -> Result<Order, RepositoryError> {
        sqlx::query_as::<_, Order>(
            "UPDATE commandes
             SET adresse_livraison = COALESCE($2, adresse_livraison),
                 ville = COALESCE($3, ville),
                 code_postal = COALESCE($4, code_postal),
                 statut = COALESCE($5, statut)
             WHERE id = $1
             RETURNING id, utilisateur_id, adresse_livraison, ville, code_postal, total,
                       numero_commande, statut, date_creation",
        )
        .bind(id)
        .bind(update.delivery_address.as_deref())
        .bind(update.city.as_deref())
        .bind(update.postal_code.as_deref())
        .bind(update.status)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)
    }

    /// Append lines to an existing order, all-or-nothing.
    ///
    /// Every referenced product is checked inside the transaction; if any
    /// is missing, the whole batch is rolled back.
    ///
    /// # Errors
    ///
    /// Returns `AppendLinesError::ProductNotFound` naming the first missing
    /// product. Returns `AppendLinesError::Repository` for database errors.
    pub async fn append_lines(
        &self,
        order_id: OrderId,
        lines: &[NewOrderLine],
    ) -> Result<(), AppendLinesError> {
        let mut tx = self.pool.begin().await?;

        for line in lines {
            let exists: bool =
                sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM pokedex WHERE id = $1)")
                    .bind(line.product_id)
                    .fetch_one(&mut *tx)
                    .await?;
            if !exists {
                return Err(AppendLinesError::ProductNotFound(line.product_id));
            }

            sqlx::query(
                "INSERT INTO commande_produits (commande_id, produit_id, quantite)
                 VALUES ($1, $2, $3)",
            )
            .bind(order_id)
            .bind(line.product_id)
            .bind(line.quantity)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    /// Whether the user has a delivered order containing the product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn contains_delivered_product(
        &self,
        user_id: UserId,
        product_id: ProductId,
    ) -> Result<bool, RepositoryError> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(
                 SELECT 1
                 FROM commande_produits cp
                 JOIN commandes c ON c.id = cp.commande_id
                 WHERE c.utilisateur_id = $1
                   AND cp.produit_id = $2
                   AND c.statut = 'livree'
             )",
        )
        .bind(user_id)
        .bind(product_id)
        .fetch_one(self.pool)
        .await?;
        Ok(exists)
    }
}
