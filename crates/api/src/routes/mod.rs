//! HTTP route table.

pub mod auth;
pub mod catalog;
pub mod orders;
pub mod payments;
pub mod reviews;
pub mod users;
pub mod webhooks;

use axum::Router;
use axum::routing::{delete, get, patch, post};

use crate::state::AppState;

/// All API routes, to be nested under `/api` by the binary.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(auth::login))
        .route("/auth/refresh", post(auth::refresh))
        .route("/utilisateurs", post(users::create).get(users::list))
        .route(
            "/utilisateurs/{id}",
            get(users::get).put(users::update).delete(users::remove),
        )
        .route("/utilisateurs/{id}/commandes", get(users::orders))
        .route("/mes-commandes", get(orders::mine))
        .route("/commandes", post(orders::create).get(orders::list))
        .route("/commandes/{id}", get(orders::get))
        .route("/commandes/{id}/suivi-livraison", get(orders::delivery_tracking))
        .route("/commandes/{id}/livraison", patch(orders::update_delivery))
        .route("/commandes/{id}/produits", post(orders::add_products))
        .route("/pokedex", get(catalog::list).post(catalog::create))
        .route("/pokedex/stock", get(catalog::in_stock))
        .route(
            "/pokedex/{id}",
            get(catalog::get).patch(catalog::update).delete(catalog::remove),
        )
        .route("/pokedex/{id}/update-stock", post(catalog::update_stock))
        .route(
            "/pokedex/{id}/avis",
            get(reviews::list_for_product).post(reviews::create),
        )
        .route("/avis/{id}", delete(reviews::remove))
        .route("/paiements", post(payments::initiate))
        .route("/paiements/{transaction_id}", get(payments::status))
        .route("/webhooks/stripe", post(webhooks::stripe))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use secrecy::SecretString;
    use tower::ServiceExt;

    use crate::config::{Config, StripeConfig};
    use crate::state::AppState;

    use super::router;

    /// State backed by a lazy pool: no connection is made until a query
    /// runs, so anything rejected before the database is testable.
    fn test_state() -> AppState {
        let config = Config {
            database_url: SecretString::from("postgres://localhost/unused"),
            host: "127.0.0.1".parse().unwrap(),
            port: 3000,
            jwt_secret: SecretString::from("x".repeat(32)),
            stripe: StripeConfig {
                secret_key: SecretString::from("sk_test_xxx"),
                webhook_secret: SecretString::from("whsec_test"),
                success_url: "https://example.com/success".to_owned(),
                cancel_url: "https://example.com/cancel".to_owned(),
            },
        };
        let pool = sqlx::postgres::PgPoolOptions::new()
            .connect_lazy("postgres://localhost/unused")
            .unwrap();
        AppState::new(config, pool)
    }

    fn app() -> axum::Router {
        router().with_state(test_state())
    }

    #[tokio::test]
    async fn test_unknown_route_is_404() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/nonexistent")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_webhook_without_signature_is_400() {
        let response = app()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/webhooks/stripe")
                    .body(Body::from("{}"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "Invalid signature");
    }

    #[tokio::test]
    async fn test_webhook_with_bad_signature_is_400() {
        let response = app()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/webhooks/stripe")
                    .header("stripe-signature", "t=1700000000,v1=deadbeef")
                    .body(Body::from("{}"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_protected_route_without_token_is_401() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/mes-commandes")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_stock_update_with_negative_quantity_is_400() {
        let response = app()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/pokedex/1/update-stock")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"quantite": -3}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_empty_delivery_update_is_400() {
        let response = app()
            .oneshot(
                Request::builder()
                    .method("PATCH")
                    .uri("/commandes/1/livraison")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from("{}"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_refresh_with_invalid_token_is_401() {
        let response = app()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/auth/refresh")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"refresh": "not.a.jwt"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_refresh_rejects_access_token() {
        // An access token must not be usable as a refresh token.
        let state = test_state();
        let pair = state
            .tokens()
            .issue_pair(pokeshop_core::UserId::new(1))
            .unwrap();
        let body = format!(r#"{{"refresh": "{}"}}"#, pair.access);

        let response = router()
            .with_state(state)
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/auth/refresh")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_delete_order_route_not_exposed() {
        let response = app()
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri("/commandes/1")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }
}
