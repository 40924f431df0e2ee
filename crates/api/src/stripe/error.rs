//! Stripe client and webhook errors.

/// Errors from calls to the Stripe API.
#[derive(Debug, thiserror::Error)]
pub enum StripeError {
    #[error("stripe request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("stripe returned {status}: {body}")]
    Api {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("amount {0} cannot be converted to cents")]
    InvalidAmount(rust_decimal::Decimal),
}

/// Reasons a webhook delivery is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum WebhookError {
    /// The `Stripe-Signature` header is missing or doesn't parse.
    #[error("malformed signature header")]
    MalformedHeader,

    /// The signature doesn't match the payload.
    #[error("signature mismatch")]
    BadSignature,

    /// The signed timestamp is outside the accepted window.
    #[error("timestamp outside tolerance")]
    Expired,
}
