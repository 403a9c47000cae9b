//! HTTP-level integration tests for the invoice lifecycle: creation,
//! sending, hosted checkout, and webhook settlement.

mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use common::{
    assert_error_code, body_json, delete_auth, get_auth, post_json_auth, post_webhook,
    post_webhook_signed, token_for, MockBlobStore, MockGateway, TEST_WEBHOOK_SECRET,
};
use sqlx::PgPool;

use atelier_core::roles::{ROLE_ADMIN, ROLE_CLIENT};
use atelier_core::signature::signature_header;
use atelier_db::models::project::CreateProject;
use atelier_db::repositories::{InvoiceRepo, ProfileRepo, ProjectRepo};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn seed_client_project(pool: &PgPool, price_cents: Option<i64>) -> (i64, i64) {
    let client = ProfileRepo::create_identity(pool, "client@acme.test", ROLE_CLIENT, None, None)
        .await
        .unwrap();
    let project = ProjectRepo::create(
        pool,
        &CreateProject {
            name: "Site Build".to_string(),
            client_id: Some(client.id),
            price_cents,
            deposit_percent: None,
            brief_content: None,
        },
    )
    .await
    .unwrap();
    (client.id, project.id)
}

fn admin_token() -> String {
    token_for(1_000_000, ROLE_ADMIN)
}

async fn create_invoice_via_api(pool: &PgPool, body: serde_json::Value) -> serde_json::Value {
    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/invoices",
        &admin_token(),
        body,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await
}

fn completed_event(invoice_id: i64) -> String {
    serde_json::json!({
        "type": "checkout.session.completed",
        "data": { "object": {
            "id": "cs_test_1",
            "payment_intent": "pi_test_9",
            "metadata": { "invoice_id": invoice_id.to_string() },
        }},
    })
    .to_string()
}

// ---------------------------------------------------------------------------
// Creation
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_create_derives_deposit_amount(pool: PgPool) {
    let (client_id, project_id) = seed_client_project(&pool, Some(10_000)).await;

    let json = create_invoice_via_api(
        &pool,
        serde_json::json!({ "project_id": project_id, "is_deposit": true }),
    )
    .await;
    // Default deposit percentage is 50.
    assert_eq!(json["data"]["amount_cents"], 5_000);
    assert_eq!(json["data"]["status"], "draft");
    assert_eq!(json["data"]["deposit_percent_used"], 50);
    assert_eq!(json["data"]["project_total_cents"], 10_000);
    assert_eq!(json["data"]["client_id"], client_id);
    assert_eq!(json["data"]["bill_to_email"], "client@acme.test");
    assert!(json["data"]["invoice_number"].is_null());

    // A full invoice bills the whole price.
    let json = create_invoice_via_api(&pool, serde_json::json!({ "project_id": project_id })).await;
    assert_eq!(json["data"]["amount_cents"], 10_000);
    assert!(json["data"]["deposit_percent_used"].is_null());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_create_without_price_requires_override(pool: PgPool) {
    let (_, project_id) = seed_client_project(&pool, None).await;

    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/invoices",
        &admin_token(),
        serde_json::json!({ "project_id": project_id }),
    )
    .await;
    assert_error_code(response, StatusCode::BAD_REQUEST, "VALIDATION_ERROR").await;

    let json = create_invoice_via_api(
        &pool,
        serde_json::json!({ "project_id": project_id, "amount_override_cents": 7_500 }),
    )
    .await;
    assert_eq!(json["data"]["amount_cents"], 7_500);
}

// ---------------------------------------------------------------------------
// Sending
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_send_assigns_number_once(pool: PgPool) {
    let (_, project_id) = seed_client_project(&pool, Some(10_000)).await;
    let json = create_invoice_via_api(&pool, serde_json::json!({ "project_id": project_id })).await;
    let id = json["data"]["id"].as_i64().unwrap();
    let token = admin_token();

    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/invoices/{id}/send"),
        &token,
        serde_json::json!({}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "sent");
    assert_eq!(json["data"]["invoice_number"], format!("INV-{id:04}"));

    // Sending twice is an invalid transition.
    let response = post_json_auth(
        common::build_test_app(pool),
        &format!("/api/v1/invoices/{id}/send"),
        &token,
        serde_json::json!({}),
    )
    .await;
    assert_error_code(response, StatusCode::BAD_REQUEST, "INVALID_STATE").await;
}

// ---------------------------------------------------------------------------
// Checkout
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_checkout_opens_session_and_sends_draft(pool: PgPool) {
    let (client_id, project_id) = seed_client_project(&pool, Some(10_000)).await;
    let json = create_invoice_via_api(
        &pool,
        serde_json::json!({ "project_id": project_id, "is_deposit": true }),
    )
    .await;
    let id = json["data"]["id"].as_i64().unwrap();

    let gateway = Arc::new(MockGateway::default());
    let app = common::build_test_app_with(
        pool.clone(),
        Arc::clone(&gateway),
        Arc::new(MockBlobStore::default()),
    );

    // Checkout from a draft: the admin opens the session on the client's
    // behalf; the invoice is sent as a side effect.
    let response = post_json_auth(
        app,
        &format!("/api/v1/invoices/{id}/checkout"),
        &admin_token(),
        serde_json::json!({}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["checkout_url"], "https://pay.test/session/cs_test_1");

    let requests = gateway.requests.lock().unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].invoice_id, id);
    assert_eq!(requests[0].amount_cents, 5_000);
    assert_eq!(requests[0].description, format!("INV-{id:04} (deposit)"));
    drop(requests);

    let invoice = InvoiceRepo::find_by_id(&pool, id).await.unwrap().unwrap();
    assert_eq!(invoice.status, "sent");
    assert_eq!(invoice.checkout_session_id.as_deref(), Some("cs_test_1"));

    // The invoice is now visible to its client, who can also check out.
    let client = token_for(client_id, ROLE_CLIENT);
    let response = get_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/invoices/{id}"),
        &client,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
}

// ---------------------------------------------------------------------------
// Webhook settlement
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_webhook_settles_invoice(pool: PgPool) {
    let (_, project_id) = seed_client_project(&pool, Some(10_000)).await;
    let json = create_invoice_via_api(&pool, serde_json::json!({ "project_id": project_id })).await;
    let id = json["data"]["id"].as_i64().unwrap();

    let response = post_webhook(common::build_test_app(pool.clone()), &completed_event(id)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["received"], true);

    let invoice = InvoiceRepo::find_by_id(&pool, id).await.unwrap().unwrap();
    assert_eq!(invoice.status, "paid");
    assert_eq!(invoice.payment_intent_id.as_deref(), Some("pi_test_9"));
    let first_paid_at = invoice.paid_at.unwrap();

    // Redelivery acknowledges without touching the settlement timestamp.
    let response = post_webhook(common::build_test_app(pool.clone()), &completed_event(id)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let invoice = InvoiceRepo::find_by_id(&pool, id).await.unwrap().unwrap();
    assert_eq!(invoice.paid_at.unwrap(), first_paid_at);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_webhook_rejects_bad_signature(pool: PgPool) {
    let (_, project_id) = seed_client_project(&pool, Some(10_000)).await;
    let json = create_invoice_via_api(&pool, serde_json::json!({ "project_id": project_id })).await;
    let id = json["data"]["id"].as_i64().unwrap();
    let body = completed_event(id);

    // Wrong secret.
    let now = chrono::Utc::now().timestamp();
    let forged = signature_header("not-the-secret", now, body.as_bytes());
    let response =
        post_webhook_signed(common::build_test_app(pool.clone()), &body, &forged).await;
    assert_error_code(response, StatusCode::BAD_REQUEST, "INVALID_SIGNATURE").await;

    // Stale timestamp outside the tolerance window.
    let stale = signature_header(TEST_WEBHOOK_SECRET, now - 3_600, body.as_bytes());
    let response = post_webhook_signed(common::build_test_app(pool.clone()), &body, &stale).await;
    assert_error_code(response, StatusCode::BAD_REQUEST, "INVALID_SIGNATURE").await;

    // Missing header entirely.
    let request = axum::http::Request::builder()
        .method("POST")
        .uri("/api/v1/webhooks/payments")
        .header("content-type", "application/json")
        .body(axum::body::Body::from(body.clone()))
        .unwrap();
    let response = tower::ServiceExt::oneshot(common::build_test_app(pool.clone()), request)
        .await
        .unwrap();
    assert_error_code(response, StatusCode::BAD_REQUEST, "INVALID_SIGNATURE").await;

    // None of the rejected deliveries settled the invoice.
    let invoice = InvoiceRepo::find_by_id(&pool, id).await.unwrap().unwrap();
    assert_eq!(invoice.status, "draft");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_webhook_ignores_other_event_types(pool: PgPool) {
    let body = serde_json::json!({
        "type": "checkout.session.expired",
        "data": { "object": { "id": "cs_x", "metadata": {} } },
    })
    .to_string();
    let response = post_webhook(common::build_test_app(pool.clone()), &body).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["received"], true);

    // Ignored event types may carry any object shape at all.
    let body = serde_json::json!({
        "type": "payout.updated",
        "data": { "object": { "amount": 1 } },
    })
    .to_string();
    let response = post_webhook(common::build_test_app(pool), &body).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["received"], true);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_webhook_acks_settlement_without_invoice_metadata(pool: PgPool) {
    let (_, project_id) = seed_client_project(&pool, Some(10_000)).await;
    let json = create_invoice_via_api(&pool, serde_json::json!({ "project_id": project_id })).await;
    let id = json["data"]["id"].as_i64().unwrap();

    // A verified settlement event this service cannot attribute is a
    // successful no-op, not an error the gateway would retry.
    let body = serde_json::json!({
        "type": "checkout.session.completed",
        "data": { "object": { "id": "cs_unattributed" } },
    })
    .to_string();
    let response = post_webhook(common::build_test_app(pool.clone()), &body).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["received"], true);

    let invoice = InvoiceRepo::find_by_id(&pool, id).await.unwrap().unwrap();
    assert_eq!(invoice.status, "draft");
}

// ---------------------------------------------------------------------------
// Client visibility and deletion
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_client_listing_hides_drafts(pool: PgPool) {
    let (client_id, project_id) = seed_client_project(&pool, Some(10_000)).await;
    let draft =
        create_invoice_via_api(&pool, serde_json::json!({ "project_id": project_id })).await;
    let draft_id = draft["data"]["id"].as_i64().unwrap();
    let sent = create_invoice_via_api(
        &pool,
        serde_json::json!({ "project_id": project_id, "is_deposit": true }),
    )
    .await;
    let sent_id = sent["data"]["id"].as_i64().unwrap();

    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/invoices/{sent_id}/send"),
        &admin_token(),
        serde_json::json!({}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let client = token_for(client_id, ROLE_CLIENT);
    let response = get_auth(common::build_test_app(pool.clone()), "/api/v1/invoices/mine", &client).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let mine = json["data"].as_array().unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0]["id"], sent_id);

    // Fetching the draft directly does not confirm it exists.
    let response = get_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/invoices/{draft_id}"),
        &client,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // The admin listing sees both, with the joined project name.
    let response = get_auth(common::build_test_app(pool), "/api/v1/invoices", &admin_token()).await;
    let json = body_json(response).await;
    let all = json["data"].as_array().unwrap();
    assert_eq!(all.len(), 2);
    assert!(all.iter().all(|i| i["project_name"] == "Site Build"));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_paid_invoice_cannot_be_deleted(pool: PgPool) {
    let (_, project_id) = seed_client_project(&pool, Some(10_000)).await;
    let json = create_invoice_via_api(&pool, serde_json::json!({ "project_id": project_id })).await;
    let id = json["data"]["id"].as_i64().unwrap();

    let response = post_webhook(common::build_test_app(pool.clone()), &completed_event(id)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = delete_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/invoices/{id}"),
        &admin_token(),
    )
    .await;
    assert_error_code(response, StatusCode::BAD_REQUEST, "INVALID_STATE").await;

    let invoice = InvoiceRepo::find_by_id(&pool, id).await.unwrap().unwrap();
    assert_eq!(invoice.status, "paid");
}
