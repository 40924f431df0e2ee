//! Minimal Stripe checkout client and webhook verification.
//!
//! Only the two calls the shop needs are implemented: creating a hosted
//! checkout session at payment initiation, and verifying webhook deliveries
//! when Stripe reports the session completed.

pub mod error;
pub mod webhook;

pub use error::{StripeError, WebhookError};
pub use webhook::{WebhookEvent, WebhookVerifier};

use reqwest::Client;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::config::StripeConfig;

const CHECKOUT_SESSIONS_URL: &str = "https://api.stripe.com/v1/checkout/sessions";

/// A created checkout session. `url` is the hosted payment page the client
/// is redirected to; `id` is the transaction id recorded against the
/// payment row.
#[derive(Debug, Deserialize)]
pub struct CheckoutSession {
    pub id: String,
    pub url: String,
}

/// Client for the Stripe REST API.
pub struct StripeClient {
    http: Client,
    secret_key: SecretString,
    success_url: String,
    cancel_url: String,
}

impl StripeClient {
    /// Build a client from the Stripe section of the configuration.
    #[must_use]
    pub fn new(config: &StripeConfig) -> Self {
        Self {
            http: Client::new(),
            secret_key: config.secret_key.clone(),
            success_url: config.success_url.clone(),
            cancel_url: config.cancel_url.clone(),
        }
    }

    /// Create a hosted checkout session for one order.
    ///
    /// The whole order is charged as a single EUR line item named after the
    /// order number.
    ///
    /// # Errors
    ///
    /// Returns `StripeError::InvalidAmount` if the amount doesn't convert
    /// to a whole number of cents, `StripeError::Api` for a non-2xx Stripe
    /// response, and `StripeError::Http` for transport failures.
    pub async fn create_checkout_session(
        &self,
        order_number: &str,
        amount: Decimal,
    ) -> Result<CheckoutSession, StripeError> {
        let cents = amount_to_cents(amount).ok_or(StripeError::InvalidAmount(amount))?;
        let product_name = format!("Commande {order_number}");
        let cents = cents.to_string();

        let params: &[(&str, &str)] = &[
            ("payment_method_types[0]", "card"),
            ("line_items[0][price_data][currency]", "eur"),
            ("line_items[0][price_data][product_data][name]", &product_name),
            ("line_items[0][price_data][unit_amount]", &cents),
            ("line_items[0][quantity]", "1"),
            ("mode", "payment"),
            ("success_url", &self.success_url),
            ("cancel_url", &self.cancel_url),
        ];

        let response = self
            .http
            .post(CHECKOUT_SESSIONS_URL)
            .bearer_auth(self.secret_key.expose_secret())
            .form(params)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StripeError::Api { status, body });
        }

        Ok(response.json::<CheckoutSession>().await?)
    }
}

/// Convert a decimal EUR amount to integer cents, truncating beyond two
/// decimal places. `None` when the multiplication overflows or the result
/// doesn't fit an `i64`.
fn amount_to_cents(amount: Decimal) -> Option<i64> {
    amount.checked_mul(Decimal::from(100))?.trunc().to_i64()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_amount_to_cents() {
        assert_eq!(amount_to_cents(Decimal::new(4990, 2)), Some(4990));
        assert_eq!(amount_to_cents(Decimal::new(10, 0)), Some(1000));
        assert_eq!(amount_to_cents(Decimal::new(9999, 4)), Some(99));
        assert_eq!(amount_to_cents(Decimal::ZERO), Some(0));
    }

    #[test]
    fn test_amount_to_cents_overflow_is_none() {
        assert_eq!(amount_to_cents(Decimal::MAX), None);
    }

    #[test]
    fn test_checkout_session_deserializes() {
        let session: CheckoutSession = serde_json::from_str(
            r#"{"id":"cs_test_abc","url":"https://checkout.stripe.com/pay/cs_test_abc","object":"checkout.session"}"#,
        )
        .unwrap();
        assert_eq!(session.id, "cs_test_abc");
        assert!(session.url.starts_with("https://checkout.stripe.com/"));
    }
}
