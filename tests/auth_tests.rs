mod common;

use common::*;
use rukun::models::UserRole;
use rukun::Error;
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn token_response(uid: &str, token: &str) -> serde_json::Value {
    json!({
        "access_token": token,
        "refresh_token": format!("{}-refresh", token),
        "token_type": "bearer",
        "expires_in": 3600,
        "user": {
            "id": uid,
            "email": format!("{}@contoh.com", uid),
            "role": "authenticated"
        }
    })
}

fn profile_row(uid: &str, role: &str) -> serde_json::Value {
    json!({
        "uid": uid,
        "email": format!("{}@contoh.com", uid),
        "display_name": format!("User {}", uid),
        "role": role,
        "created_at": 1_700_000_000_000_i64
    })
}

#[tokio::test]
async fn sign_in_resolves_profile_and_role() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .and(query_param("grant_type", "password"))
        .and(body_partial_json(json!({
            "email": "admin-1@contoh.com",
            "password": "secret"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_response("admin-1", "tok-1")))
        .mount(&mock_server)
        .await;

    // the profile lookup must run as the freshly signed-in user
    Mock::given(method("GET"))
        .and(path("/rest/v1/users"))
        .and(query_param("uid", "eq.admin-1"))
        .and(header("Authorization", "Bearer tok-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([profile_row("admin-1", "admin")])))
        .mount(&mock_server)
        .await;

    let portal = portal(&mock_server.uri());
    let ctx = portal
        .auth()
        .sign_in("admin-1@contoh.com", "secret")
        .await
        .unwrap();

    assert_eq!(ctx.uid(), "admin-1");
    assert_eq!(ctx.role(), UserRole::Admin);
    assert_eq!(ctx.session.access_token, "tok-1");
    assert!(ctx.require_admin().is_ok());
}

#[tokio::test]
async fn sign_in_with_wrong_password_is_classified() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "invalid_grant",
            "error_description": "Invalid login credentials"
        })))
        .mount(&mock_server)
        .await;

    let portal = portal(&mock_server.uri());
    let result = portal.auth().sign_in("admin-1@contoh.com", "wrong").await;

    assert!(matches!(result, Err(Error::InvalidCredentials)));
}

#[tokio::test]
async fn sign_in_other_failures_stay_generic() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .respond_with(ResponseTemplate::new(503).set_body_string("upstream down"))
        .mount(&mock_server)
        .await;

    let portal = portal(&mock_server.uri());
    let result = portal.auth().sign_in("admin-1@contoh.com", "secret").await;

    assert!(matches!(result, Err(Error::Auth(_))));
}

#[tokio::test]
async fn sign_in_without_profile_document_is_rejected() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_response("ghost", "tok-2")))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    let portal = portal(&mock_server.uri());
    let result = portal.auth().sign_in("ghost@contoh.com", "secret").await;

    assert!(matches!(result, Err(Error::Auth(_))));
}

#[tokio::test]
async fn sign_out_revokes_the_callers_token() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/v1/logout"))
        .and(header("Authorization", "Bearer admin-token"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;

    let portal = portal(&mock_server.uri());
    let ctx = admin_context();

    portal.auth().sign_out(&ctx).await.unwrap();
}

#[tokio::test]
async fn refresh_exchanges_token_and_keeps_profile() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .and(query_param("grant_type", "refresh_token"))
        .and(body_partial_json(json!({ "refresh_token": "admin-token-refresh" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_response("admin-1", "tok-new")))
        .mount(&mock_server)
        .await;

    let portal = portal(&mock_server.uri());
    let ctx = admin_context();

    let refreshed = portal.auth().refresh(&ctx).await.unwrap();

    assert_eq!(refreshed.session.access_token, "tok-new");
    assert_eq!(refreshed.profile, ctx.profile);
}
