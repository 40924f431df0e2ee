//! Shared application state.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::Config;
use crate::services::TokenService;
use crate::stripe::{StripeClient, WebhookVerifier};

/// Shared state handed to every request handler.
///
/// Cheap to clone; all fields live behind one `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<Inner>,
}

struct Inner {
    config: Config,
    pool: PgPool,
    stripe: StripeClient,
    webhook: WebhookVerifier,
    tokens: TokenService,
}

impl AppState {
    /// Assemble the application state from loaded configuration and an
    /// established database pool.
    #[must_use]
    pub fn new(config: Config, pool: PgPool) -> Self {
        let stripe = StripeClient::new(&config.stripe);
        let webhook = WebhookVerifier::new(config.stripe.webhook_secret.clone());
        let tokens = TokenService::new(&config.jwt_secret);
        Self {
            inner: Arc::new(Inner {
                config,
                pool,
                stripe,
                webhook,
                tokens,
            }),
        }
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    #[must_use]
    pub fn stripe(&self) -> &StripeClient {
        &self.inner.stripe
    }

    #[must_use]
    pub fn webhook(&self) -> &WebhookVerifier {
        &self.inner.webhook
    }

    #[must_use]
    pub fn tokens(&self) -> &TokenService {
        &self.inner.tokens
    }
}
