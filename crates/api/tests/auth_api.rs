//! HTTP-level integration tests for auth and client provisioning.

mod common;

use axum::http::StatusCode;
use common::{assert_error_code, body_json, get, get_auth, post_json, post_json_auth, token_for};
use sqlx::PgPool;

use atelier_api::auth::password::hash_password;
use atelier_core::roles::{ROLE_ADMIN, ROLE_CLIENT};
use atelier_db::repositories::ProfileRepo;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn create_admin(pool: &PgPool) -> i64 {
    let hash = hash_password("admin_password_1").expect("hashing should succeed");
    ProfileRepo::create_identity(pool, "admin@studio.test", ROLE_ADMIN, Some(&hash), None)
        .await
        .expect("admin creation should succeed")
        .id
}

// ---------------------------------------------------------------------------
// Login
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_login_success(pool: PgPool) {
    let admin_id = create_admin(&pool).await;
    let app = common::build_test_app(pool);

    let body = serde_json::json!({ "email": "admin@studio.test", "password": "admin_password_1" });
    let response = post_json(app, "/api/v1/auth/login", body).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert!(json["data"]["access_token"].is_string());
    assert_eq!(json["data"]["profile"]["id"], admin_id);
    assert_eq!(json["data"]["profile"]["role"], "admin");
    // Secrets never serialize.
    assert!(json["data"]["profile"].get("password_hash").is_none());
    assert!(json["data"]["profile"].get("invite_token").is_none());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_login_wrong_password(pool: PgPool) {
    create_admin(&pool).await;
    let app = common::build_test_app(pool);

    let body = serde_json::json!({ "email": "admin@studio.test", "password": "nope" });
    let response = post_json(app, "/api/v1/auth/login", body).await;
    assert_error_code(response, StatusCode::UNAUTHORIZED, "UNAUTHORIZED").await;
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_me_requires_token(pool: PgPool) {
    let admin_id = create_admin(&pool).await;
    let app = common::build_test_app(pool.clone());

    let response = get(app, "/api/v1/auth/me").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let app = common::build_test_app(pool);
    let token = token_for(admin_id, ROLE_ADMIN);
    let response = get_auth(app, "/api/v1/auth/me", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["id"], admin_id);
}

// ---------------------------------------------------------------------------
// Provisioning
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_provision_with_temp_password(pool: PgPool) {
    let admin_id = create_admin(&pool).await;
    let token = token_for(admin_id, ROLE_ADMIN);

    let body = serde_json::json!({
        "email": "client@acme.test",
        "temp_password": "hunter22",
        "name": "Ada Acme",
        "business_name": "Acme Co",
    });
    let response =
        post_json_auth(common::build_test_app(pool.clone()), "/api/v1/admin/clients", &token, body)
            .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert!(json["data"]["id"].is_number());
    assert!(json["data"]["invite_token"].is_null());

    // The new client can log in straight away.
    let body = serde_json::json!({ "email": "client@acme.test", "password": "hunter22" });
    let response = post_json(common::build_test_app(pool), "/api/v1/auth/login", body).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_provision_without_password_invites(pool: PgPool) {
    let admin_id = create_admin(&pool).await;
    let token = token_for(admin_id, ROLE_ADMIN);

    let body = serde_json::json!({ "email": "invited@acme.test" });
    let response =
        post_json_auth(common::build_test_app(pool.clone()), "/api/v1/admin/clients", &token, body)
            .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    let invite_token = json["data"]["invite_token"].as_str().unwrap().to_string();

    // No password yet: login refused.
    let body = serde_json::json!({ "email": "invited@acme.test", "password": "anything1" });
    let response = post_json(common::build_test_app(pool.clone()), "/api/v1/auth/login", body).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // Redeem the invitation, then login works.
    let body = serde_json::json!({ "invite_token": invite_token, "password": "fresh-pass-1" });
    let response =
        post_json(common::build_test_app(pool.clone()), "/api/v1/auth/activate", body).await;
    assert_eq!(response.status(), StatusCode::OK);

    // The token is single-use.
    let body = serde_json::json!({ "invite_token": json["data"]["invite_token"], "password": "another-1" });
    let response =
        post_json(common::build_test_app(pool.clone()), "/api/v1/auth/activate", body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = serde_json::json!({ "email": "invited@acme.test", "password": "fresh-pass-1" });
    let response = post_json(common::build_test_app(pool), "/api/v1/auth/login", body).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_client_detail_includes_contacts(pool: PgPool) {
    let admin_id = create_admin(&pool).await;
    let token = token_for(admin_id, ROLE_ADMIN);

    let body = serde_json::json!({
        "email": "client@acme.test",
        "name": "Ada Acme",
        "business_name": "Acme Co",
        "position": "Founder",
    });
    let response =
        post_json_auth(common::build_test_app(pool.clone()), "/api/v1/admin/clients", &token, body)
            .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let client_id = body_json(response).await["data"]["id"].as_i64().unwrap();

    let response = get_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/admin/clients/{client_id}"),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["business_name"], "Acme Co");

    // Provisioning created the primary contact from the profile fields.
    let contacts = json["data"]["contacts"].as_array().unwrap();
    assert_eq!(contacts.len(), 1);
    assert_eq!(contacts[0]["is_primary"], true);
    assert_eq!(contacts[0]["name"], "Ada Acme");
    assert_eq!(contacts[0]["email"], "client@acme.test");

    // The admin's own profile is not a client.
    let response = get_auth(
        common::build_test_app(pool),
        &format!("/api/v1/admin/clients/{admin_id}"),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_provision_validation_and_rbac(pool: PgPool) {
    let admin_id = create_admin(&pool).await;
    let token = token_for(admin_id, ROLE_ADMIN);

    // Missing email.
    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/admin/clients",
        &token,
        serde_json::json!({ "email": "  " }),
    )
    .await;
    assert_error_code(response, StatusCode::BAD_REQUEST, "VALIDATION_ERROR").await;

    // Short temp password.
    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/admin/clients",
        &token,
        serde_json::json!({ "email": "x@y.test", "temp_password": "abc" }),
    )
    .await;
    assert_error_code(response, StatusCode::BAD_REQUEST, "VALIDATION_ERROR").await;

    // Duplicate email conflicts.
    let body = serde_json::json!({ "email": "dup@acme.test" });
    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/admin/clients",
        &token,
        body.clone(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/admin/clients",
        &token,
        body,
    )
    .await;
    assert_error_code(response, StatusCode::CONFLICT, "CONFLICT").await;

    // Clients may not provision.
    let client_token = token_for(9999, ROLE_CLIENT);
    let response = post_json_auth(
        common::build_test_app(pool),
        "/api/v1/admin/clients",
        &client_token,
        serde_json::json!({ "email": "sneaky@acme.test" }),
    )
    .await;
    assert_error_code(response, StatusCode::FORBIDDEN, "FORBIDDEN").await;
}
