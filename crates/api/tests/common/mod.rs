//! Shared test harness: in-process app construction with fake outbound
//! services, plus request/response helpers.

use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use atelier_api::auth::jwt::{generate_access_token, JwtConfig};
use atelier_api::config::{GatewayConfig, ServerConfig, StorageConfig};
use atelier_api::payments::{CheckoutRequest, CheckoutSession, PaymentGateway};
use atelier_api::router::build_app_router;
use atelier_api::state::AppState;
use atelier_api::storage::BlobStore;
use atelier_core::error::CoreError;
use atelier_core::types::DbId;

pub const TEST_JWT_SECRET: &str = "test-jwt-secret";
pub const TEST_WEBHOOK_SECRET: &str = "test-webhook-secret";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        jwt: JwtConfig {
            secret: TEST_JWT_SECRET.to_string(),
            access_token_expiry_mins: 60,
        },
        gateway: GatewayConfig {
            api_base: "https://gateway.invalid".to_string(),
            secret_key: "sk_test".to_string(),
            webhook_secret: TEST_WEBHOOK_SECRET.to_string(),
            currency: "usd".to_string(),
            success_url: "http://localhost:5173/invoices?paid=1".to_string(),
            cancel_url: "http://localhost:5173/invoices".to_string(),
        },
        storage: StorageConfig {
            api_base: "https://storage.invalid".to_string(),
            bucket: "project-documents".to_string(),
            service_key: "svc_test".to_string(),
            signed_url_ttl_secs: 300,
        },
    }
}

/// In-process gateway fake: returns a deterministic session and records
/// every request it sees.
#[derive(Default)]
pub struct MockGateway {
    pub requests: Mutex<Vec<CheckoutRequest>>,
}

#[async_trait]
impl PaymentGateway for MockGateway {
    async fn create_checkout_session(
        &self,
        request: &CheckoutRequest,
    ) -> Result<CheckoutSession, CoreError> {
        self.requests.lock().unwrap().push(request.clone());
        Ok(CheckoutSession {
            id: "cs_test_1".to_string(),
            url: "https://pay.test/session/cs_test_1".to_string(),
        })
    }
}

/// In-process blob store fake: signs deterministically, records deletes.
#[derive(Default)]
pub struct MockBlobStore {
    pub deleted: Mutex<Vec<String>>,
}

#[async_trait]
impl BlobStore for MockBlobStore {
    async fn signed_url(&self, path: &str) -> Result<String, CoreError> {
        Ok(format!("https://blob.test/sign/{path}"))
    }

    async fn delete(&self, path: &str) -> Result<(), CoreError> {
        self.deleted.lock().unwrap().push(path.to_string());
        Ok(())
    }
}

/// Build the application with the production middleware stack and fake
/// outbound services.
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with(pool, Arc::new(MockGateway::default()), Arc::new(MockBlobStore::default()))
}

pub fn build_test_app_with(
    pool: PgPool,
    gateway: Arc<MockGateway>,
    blob_store: Arc<MockBlobStore>,
) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        gateway,
        blob_store,
    };
    build_app_router(state, &config)
}

/// Mint a bearer token the same way the login handler does.
pub fn token_for(user_id: DbId, role: &str) -> String {
    let jwt = JwtConfig {
        secret: TEST_JWT_SECRET.to_string(),
        access_token_expiry_mins: 60,
    };
    generate_access_token(user_id, role, &jwt).expect("token generation should succeed")
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    let request = Request::builder()
        .uri(uri)
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .header("authorization", format!("Bearer {token}"))
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    let request = Request::builder()
        .method("PUT")
        .uri(uri)
        .header("content-type", "application/json")
        .header("authorization", format!("Bearer {token}"))
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    let request = Request::builder()
        .method("DELETE")
        .uri(uri)
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Deserialize a response body as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Send a webhook with a freshly computed valid signature.
pub async fn post_webhook(app: Router, body: &str) -> Response<Body> {
    let now = chrono::Utc::now().timestamp();
    let header = atelier_core::signature::signature_header(TEST_WEBHOOK_SECRET, now, body.as_bytes());
    post_webhook_signed(app, body, &header).await
}

pub async fn post_webhook_signed(app: Router, body: &str, header: &str) -> Response<Body> {
    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/webhooks/payments")
        .header("content-type", "application/json")
        .header("gateway-signature", header)
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Assert the standard error envelope shape.
pub async fn assert_error_code(response: Response<Body>, status: StatusCode, code: &str) {
    assert_eq!(response.status(), status);
    let json = body_json(response).await;
    assert_eq!(json["code"], code);
    assert!(json["error"].is_string());
}
