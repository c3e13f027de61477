//! Auth module tests.

use super::guard::{AuthRejection, extract_token, require_auth};
use super::state::{AuthConfig, AuthState};
use super::utils::{hash_password, normalize_email, now_unix_seconds, valid_email, verify_password};
use crate::users::{MemoryUserStore, Role, UserRecord};
use anyhow::Result;
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::IntoResponse;
use secrecy::SecretString;
use uuid::Uuid;

const TEST_SECRET: &str = "test-signing-secret-not-for-production";

fn auth_state() -> AuthState {
    AuthState::new(AuthConfig::new(
        SecretString::from(TEST_SECRET.to_string()),
        "http://localhost:3000".to_string(),
    ))
}

fn user_record(role: Role, is_active: bool) -> UserRecord {
    UserRecord {
        id: Uuid::new_v4(),
        name: "Ada".to_string(),
        email: "ada@example.com".to_string(),
        password_hash: "unused".to_string(),
        role,
        is_active,
    }
}

fn bearer(token: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        axum::http::header::AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {token}")).expect("header value"),
    );
    headers
}

fn issue_for(subject: &str, ttl_seconds: i64) -> String {
    session_token::issue_hs256(
        TEST_SECRET.as_bytes(),
        subject,
        ttl_seconds,
        now_unix_seconds(),
    )
    .expect("issue token")
}

#[test]
fn extract_token_prefers_authorization_header() {
    let mut headers = bearer("header-token");
    headers.insert(
        axum::http::header::COOKIE,
        HeaderValue::from_static("token=cookie-token"),
    );
    assert_eq!(extract_token(&headers), Some("header-token".to_string()));
}

#[test]
fn extract_token_falls_back_to_cookie() {
    let mut headers = HeaderMap::new();
    headers.insert(
        axum::http::header::COOKIE,
        HeaderValue::from_static("theme=dark; token=cookie-token; lang=en"),
    );
    assert_eq!(extract_token(&headers), Some("cookie-token".to_string()));
}

#[test]
fn extract_token_ignores_empty_values() {
    let mut headers = HeaderMap::new();
    headers.insert(
        axum::http::header::AUTHORIZATION,
        HeaderValue::from_static("Bearer "),
    );
    headers.insert(
        axum::http::header::COOKIE,
        HeaderValue::from_static("token="),
    );
    assert_eq!(extract_token(&headers), None);
    assert_eq!(extract_token(&HeaderMap::new()), None);
}

#[test]
fn extract_token_skips_malformed_cookie_segments() {
    let mut headers = HeaderMap::new();
    headers.insert(
        axum::http::header::COOKIE,
        HeaderValue::from_static("flag; token=cookie-token"),
    );
    assert_eq!(extract_token(&headers), Some("cookie-token".to_string()));

    let mut headers = HeaderMap::new();
    headers.insert(
        axum::http::header::COOKIE,
        HeaderValue::from_static("flag; theme=dark"),
    );
    assert_eq!(extract_token(&headers), None);
}

#[test]
fn extract_token_accepts_lowercase_bearer() {
    let mut headers = HeaderMap::new();
    headers.insert(
        axum::http::header::AUTHORIZATION,
        HeaderValue::from_static("bearer abc"),
    );
    assert_eq!(extract_token(&headers), Some("abc".to_string()));
}

#[tokio::test]
async fn require_auth_attaches_active_user() -> Result<()> {
    let state = auth_state();
    let store = MemoryUserStore::new();
    let record = user_record(Role::Customer, true);
    store.seed(record.clone()).await;

    let headers = bearer(&issue_for(&record.id.to_string(), 3600));
    let principal = require_auth(&headers, &state, &store)
        .await
        .expect("active user authenticates");
    assert_eq!(principal.user.id, record.id);
    assert_eq!(principal.user.email, record.email);
    Ok(())
}

#[tokio::test]
async fn require_auth_rejects_missing_token() {
    let state = auth_state();
    let store = MemoryUserStore::new();
    let result = require_auth(&HeaderMap::new(), &state, &store).await;
    assert_eq!(result.unwrap_err(), AuthRejection::TokenMissing);
}

#[tokio::test]
async fn require_auth_rejects_garbage_token() {
    let state = auth_state();
    let store = MemoryUserStore::new();
    let result = require_auth(&bearer("not-a-jwt"), &state, &store).await;
    assert_eq!(result.unwrap_err(), AuthRejection::TokenInvalid);
}

#[tokio::test]
async fn require_auth_rejects_expired_token() {
    let state = auth_state();
    let store = MemoryUserStore::new();
    let record = user_record(Role::Customer, true);
    store.seed(record.clone()).await;

    let expired = session_token::issue_hs256(
        TEST_SECRET.as_bytes(),
        &record.id.to_string(),
        60,
        now_unix_seconds() - 3600,
    )
    .expect("issue token");
    let result = require_auth(&bearer(&expired), &state, &store).await;
    assert_eq!(result.unwrap_err(), AuthRejection::TokenInvalid);
}

#[tokio::test]
async fn require_auth_rejects_foreign_signature() {
    let state = auth_state();
    let store = MemoryUserStore::new();
    let record = user_record(Role::Customer, true);
    store.seed(record.clone()).await;

    let foreign = session_token::issue_hs256(
        b"a-different-signing-secret",
        &record.id.to_string(),
        3600,
        now_unix_seconds(),
    )
    .expect("issue token");
    let result = require_auth(&bearer(&foreign), &state, &store).await;
    assert_eq!(result.unwrap_err(), AuthRejection::TokenInvalid);
}

#[tokio::test]
async fn require_auth_rejects_non_uuid_subject() {
    let state = auth_state();
    let store = MemoryUserStore::new();
    let result = require_auth(&bearer(&issue_for("not-a-uuid", 3600)), &state, &store).await;
    assert_eq!(result.unwrap_err(), AuthRejection::TokenInvalid);
}

#[tokio::test]
async fn require_auth_rejects_unknown_subject() {
    let state = auth_state();
    let store = MemoryUserStore::new();
    let headers = bearer(&issue_for(&Uuid::new_v4().to_string(), 3600));
    let result = require_auth(&headers, &state, &store).await;
    assert_eq!(result.unwrap_err(), AuthRejection::NotAuthorized);
}

#[tokio::test]
async fn require_auth_rejects_inactive_user() {
    let state = auth_state();
    let store = MemoryUserStore::new();
    let record = user_record(Role::Customer, false);
    store.seed(record.clone()).await;

    let headers = bearer(&issue_for(&record.id.to_string(), 3600));
    let result = require_auth(&headers, &state, &store).await;
    assert_eq!(result.unwrap_err(), AuthRejection::NotAuthorized);
}

#[tokio::test]
async fn require_auth_accepts_cookie_token() -> Result<()> {
    let state = auth_state();
    let store = MemoryUserStore::new();
    let record = user_record(Role::Admin, true);
    store.seed(record.clone()).await;

    let mut headers = HeaderMap::new();
    let token = issue_for(&record.id.to_string(), 3600);
    headers.insert(
        axum::http::header::COOKIE,
        HeaderValue::from_str(&format!("token={token}"))?,
    );
    let principal = require_auth(&headers, &state, &store).await.expect("cookie auth");
    assert_eq!(principal.user.role, Role::Admin);
    Ok(())
}

#[tokio::test]
async fn require_role_gates_on_membership() {
    let state = auth_state();
    let store = MemoryUserStore::new();
    let record = user_record(Role::Customer, true);
    store.seed(record.clone()).await;

    let headers = bearer(&issue_for(&record.id.to_string(), 3600));
    let principal = require_auth(&headers, &state, &store).await.expect("auth");

    assert!(principal.require_role(&[Role::Customer]).is_ok());
    assert!(principal.require_role(&[Role::Customer, Role::Admin]).is_ok());
    assert_eq!(
        principal.require_role(&[Role::Admin]).unwrap_err(),
        AuthRejection::Forbidden
    );
    assert_eq!(
        principal.require_role(&[]).unwrap_err(),
        AuthRejection::Forbidden
    );
}

#[tokio::test]
async fn rejection_bodies_match_the_contract() -> Result<()> {
    let cases = [
        (
            AuthRejection::TokenMissing,
            StatusCode::UNAUTHORIZED,
            "Not authorized, token missing",
        ),
        (
            AuthRejection::TokenInvalid,
            StatusCode::UNAUTHORIZED,
            "Not authorized, token invalid",
        ),
        (
            AuthRejection::NotAuthorized,
            StatusCode::UNAUTHORIZED,
            "Not authorized",
        ),
        (AuthRejection::Forbidden, StatusCode::FORBIDDEN, "Forbidden"),
    ];

    for (rejection, status, message) in cases {
        let response = rejection.into_response();
        assert_eq!(response.status(), status);
        let bytes = axum::body::to_bytes(response.into_body(), 1024).await?;
        let body: serde_json::Value = serde_json::from_slice(&bytes)?;
        assert_eq!(body["success"], serde_json::json!(false));
        assert_eq!(body["message"], serde_json::json!(message));
    }
    Ok(())
}

#[test]
fn normalize_email_trims_and_lowercases() {
    assert_eq!(normalize_email(" Alice@Example.COM "), "alice@example.com");
}

#[test]
fn valid_email_accepts_basic_format() {
    assert!(valid_email("a@example.com"));
    assert!(!valid_email("not-an-email"));
    assert!(!valid_email("missing-domain@"));
}

#[test]
fn password_hash_round_trip() -> Result<()> {
    let hash = hash_password("correct horse battery staple")?;
    assert!(hash.starts_with("$argon2"));
    assert!(verify_password("correct horse battery staple", &hash));
    assert!(!verify_password("wrong password", &hash));
    assert!(!verify_password("anything", "not-a-phc-hash"));
    Ok(())
}
