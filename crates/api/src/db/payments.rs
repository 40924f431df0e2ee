//! Payment repository.

use rust_decimal::Decimal;
use sqlx::PgPool;

use pokeshop_core::OrderId;

use super::{RepositoryError, map_unique_violation};
use crate::models::Payment;

const PAYMENT_COLUMNS: &str = "id, commande_id, transaction_id, montant, statut, date_creation";

/// Repository for payment database operations.
pub struct PaymentRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> PaymentRepository<'a> {
    /// Create a new payment repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Record a pending payment for an order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if a payment with the same
    /// transaction id already exists.
    pub async fn create(
        &self,
        order_id: OrderId,
        transaction_id: &str,
        amount: Decimal,
    ) -> Result<Payment, RepositoryError> {
        sqlx::query_as::<_, Payment>(
            "INSERT INTO paiements (commande_id, transaction_id, montant, statut)
             VALUES ($1, $2, $3, 'en_attente')
             RETURNING id, commande_id, transaction_id, montant, statut, date_creation",
        )
        .bind(order_id)
        .bind(transaction_id)
        .bind(amount)
        .fetch_one(self.pool)
        .await
        .map_err(|e| map_unique_violation(e, "transaction_id already exists"))
    }

    /// Get a payment by its Stripe transaction id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_transaction(
        &self,
        transaction_id: &str,
    ) -> Result<Option<Payment>, RepositoryError> {
        let payment = sqlx::query_as::<_, Payment>(&format!(
            "SELECT {PAYMENT_COLUMNS} FROM paiements WHERE transaction_id = $1"
        ))
        .bind(transaction_id)
        .fetch_optional(self.pool)
        .await?;
        Ok(payment)
    }

    /// Mark a payment as validated. Idempotent: a payment already validated
    /// is returned unchanged.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no payment carries that
    /// transaction id.
    pub async fn mark_validated(&self, transaction_id: &str) -> Result<Payment, RepositoryError> {
        sqlx::query_as::<_, Payment>(
            "UPDATE paiements
             SET statut = 'valide'
             WHERE transaction_id = $1
             RETURNING id, commande_id, transaction_id, montant, statut, date_creation",
        )
        .bind(transaction_id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)
    }
}
