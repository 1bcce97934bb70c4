//! # Integration Tests for verifycert-api
//!
//! Drives the full router with `tower::ServiceExt::oneshot`: certificate
//! lifecycle, issuer administration, transfer refusal, error mapping,
//! authentication, ledger persistence, and OpenAPI generation.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use verifycert_api::state::{AppConfig, AppState};
use verifycert_core::AccountId;
use verifycert_registry::CertificateRegistry;

const OWNER: &str = "0x00000000000000000000000000000000000000a0";
const ISSUER: &str = "0x00000000000000000000000000000000000000b1";
const RECIPIENT: &str = "0x00000000000000000000000000000000000000c2";
const STRANGER: &str = "0x00000000000000000000000000000000000000d3";
const NULL: &str = "0x0000000000000000000000000000000000000000";

/// Helper: development-mode app with a fresh registry owned by OWNER.
fn test_app() -> axum::Router {
    verifycert_api::app(test_state(AppConfig::default()))
}

fn test_state(config: AppConfig) -> AppState {
    let owner = AccountId::parse(OWNER).unwrap();
    AppState::new(CertificateRegistry::new(owner).unwrap(), config)
}

/// Helper: send a request as `caller` (dev-mode token) and decode the JSON body.
async fn call(
    app: &axum::Router,
    method: &str,
    uri: &str,
    caller: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(caller) = caller {
        builder = builder.header("Authorization", format!("Bearer {caller}"));
    }
    let body = match body {
        Some(v) => {
            builder = builder.header("content-type", "application/json");
            Body::from(serde_json::to_vec(&v).unwrap())
        }
        None => Body::empty(),
    };
    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into()))
    };
    (status, value)
}

fn issue_body(recipient: &str) -> Value {
    json!({
        "recipient": recipient,
        "recipient_name": "Jane Doe",
        "course_name": "Course X",
        "institution_name": "Inst Y",
        "metadata_uri": "uri://1"
    })
}

/// Helper: app with ISSUER authorized and certificate 1 issued to RECIPIENT.
async fn app_with_certificate() -> axum::Router {
    let app = test_app();
    let (status, _) = call(&app, "PUT", &format!("/v1/issuers/{ISSUER}"), Some(OWNER), None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = call(&app, "POST", "/v1/certificates", Some(ISSUER), Some(issue_body(RECIPIENT))).await;
    assert_eq!(status, StatusCode::CREATED);
    app
}

// -- Health Probes ------------------------------------------------------------

#[tokio::test]
async fn test_health_probes() {
    let app = test_app();
    let (status, body) = call(&app, "GET", "/health/liveness", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "ok");
    let (status, body) = call(&app, "GET", "/health/readiness", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "ready");
}

// -- Issuance -----------------------------------------------------------------

#[tokio::test]
async fn test_authorized_issuer_issues_certificate() {
    let app = test_app();
    call(&app, "PUT", &format!("/v1/issuers/{ISSUER}"), Some(OWNER), None).await;

    let (status, body) = call(&app, "POST", "/v1/certificates", Some(ISSUER), Some(issue_body(RECIPIENT))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["id"], 1);
    assert_eq!(body["issuer"], ISSUER);
    assert_eq!(body["recipient"], RECIPIENT);
    assert_eq!(body["recipient_name"], "Jane Doe");
    assert_eq!(body["is_valid"], true);
    assert!(body["digest"].as_str().unwrap().starts_with("sha256:"));

    let (status, body) = call(&app, "GET", "/v1/certificates/1/verify", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"id": 1, "valid": true}));
}

#[tokio::test]
async fn test_unauthorized_issuer_rejected_and_id_not_consumed() {
    let app = test_app();
    let (status, body) = call(&app, "POST", "/v1/certificates", Some(STRANGER), Some(issue_body(RECIPIENT))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"]["code"], "UNAUTHORIZED_ISSUER");

    let (_, info) = call(&app, "GET", "/v1/registry", None, None).await;
    assert_eq!(info["next_id"], 1);
    assert_eq!(info["total_supply"], 0);
}

#[tokio::test]
async fn test_owner_issues_without_allow_listing() {
    let app = test_app();
    let (status, body) = call(&app, "POST", "/v1/certificates", Some(OWNER), Some(issue_body(RECIPIENT))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["issuer"], OWNER);
}

#[tokio::test]
async fn test_null_recipient_is_422() {
    let app = test_app();
    let (status, body) = call(&app, "POST", "/v1/certificates", Some(OWNER), Some(issue_body(NULL))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["code"], "INVALID_RECIPIENT");
}

#[tokio::test]
async fn test_malformed_recipient_is_422() {
    let app = test_app();
    let (status, body) = call(&app, "POST", "/v1/certificates", Some(OWNER), Some(issue_body("bob"))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_oversized_field_is_422() {
    let app = test_app();
    let mut body = issue_body(RECIPIENT);
    body["course_name"] = Value::String("x".repeat(4097));
    let (status, body) = call(&app, "POST", "/v1/certificates", Some(OWNER), Some(body)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"]["message"].as_str().unwrap().contains("course_name"));
}

#[tokio::test]
async fn test_unauthorized_issuer_with_oversized_field_is_403() {
    let app = test_app();
    let mut body = issue_body("bob");
    body["course_name"] = Value::String("x".repeat(4097));
    let (status, body) = call(&app, "POST", "/v1/certificates", Some(STRANGER), Some(body)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"]["code"], "UNAUTHORIZED_ISSUER");
}

#[tokio::test]
async fn test_malformed_json_is_400() {
    let app = test_app();
    let (status, body) = call(&app, "POST", "/v1/certificates", Some(OWNER), Some(json!({"recipient": 5}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_anonymous_issue_is_401() {
    let app = test_app();
    let (status, body) = call(&app, "POST", "/v1/certificates", None, Some(issue_body(RECIPIENT))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "UNAUTHORIZED");
}

// -- Lookup -------------------------------------------------------------------

#[tokio::test]
async fn test_unknown_certificate() {
    let app = test_app();
    let (status, body) = call(&app, "GET", "/v1/certificates/42", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "CERTIFICATE_NOT_FOUND");

    let (status, body) = call(&app, "GET", "/v1/certificates/42/verify", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["valid"], false);
}

#[tokio::test]
async fn test_non_numeric_id_is_400() {
    let app = test_app();
    let (status, _) = call(&app, "GET", "/v1/certificates/abc", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// -- Revocation ---------------------------------------------------------------

#[tokio::test]
async fn test_revocation_lifecycle() {
    let app = app_with_certificate().await;

    let (status, body) = call(&app, "POST", "/v1/certificates/1/revoke", Some(STRANGER), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"]["code"], "UNAUTHORIZED_ISSUER");

    let (status, body) = call(&app, "POST", "/v1/certificates/1/revoke", Some(OWNER), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["is_valid"], false);

    let (_, body) = call(&app, "GET", "/v1/certificates/1/verify", None, None).await;
    assert_eq!(body["valid"], false);

    let (status, body) = call(&app, "POST", "/v1/certificates/1/revoke", Some(ISSUER), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "CERTIFICATE_ALREADY_REVOKED");
}

#[tokio::test]
async fn test_revoke_unknown_is_404() {
    let app = test_app();
    let (status, _) = call(&app, "POST", "/v1/certificates/9/revoke", Some(OWNER), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_digest_survives_revocation() {
    let app = app_with_certificate().await;
    let (_, before) = call(&app, "GET", "/v1/certificates/1", None, None).await;
    call(&app, "POST", "/v1/certificates/1/revoke", Some(ISSUER), None).await;
    let (_, after) = call(&app, "GET", "/v1/certificates/1", None, None).await;
    assert_eq!(before["digest"], after["digest"]);
    assert_ne!(before["is_valid"], after["is_valid"]);
}

// -- Transfers ----------------------------------------------------------------

#[tokio::test]
async fn test_transfers_always_refused() {
    let app = app_with_certificate().await;
    call(&app, "POST", "/v1/certificates/1/revoke", Some(OWNER), None).await;

    for caller in [OWNER, ISSUER, RECIPIENT, STRANGER] {
        let (status, body) = call(
            &app,
            "POST",
            "/v1/certificates/1/transfer",
            Some(caller),
            Some(json!({"from": RECIPIENT, "to": STRANGER})),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["error"]["code"], "TRANSFER_NOT_ALLOWED");
    }

    let (status, _) = call(&app, "POST", "/v1/certificates/1/approve", Some(RECIPIENT), Some(json!({"approved": STRANGER}))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = call(&app, "POST", "/v1/approvals", Some(RECIPIENT), Some(json!({"operator": STRANGER, "approved": true}))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (_, account) = call(&app, "GET", &format!("/v1/accounts/{RECIPIENT}"), None, None).await;
    assert_eq!(account["held"], json!([1]));
}

#[tokio::test]
async fn test_malformed_transfer_still_403() {
    let app = test_app();
    let (status, _) = call(&app, "POST", "/v1/certificates/999/transfer", Some(STRANGER), Some(json!({"garbage": true}))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_anonymous_transfer_still_403() {
    let app = app_with_certificate().await;

    let (status, body) = call(
        &app,
        "POST",
        "/v1/certificates/1/transfer",
        None,
        Some(json!({"from": RECIPIENT, "to": STRANGER})),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"]["code"], "TRANSFER_NOT_ALLOWED");

    let (status, body) = call(&app, "POST", "/v1/certificates/1/approve", None, Some(json!({"approved": STRANGER}))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"]["code"], "TRANSFER_NOT_ALLOWED");

    let (status, body) = call(&app, "POST", "/v1/approvals", None, Some(json!({"operator": STRANGER, "approved": true}))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"]["code"], "TRANSFER_NOT_ALLOWED");
}

// -- Issuers & ownership ------------------------------------------------------

#[tokio::test]
async fn test_issuer_administration() {
    let app = test_app();

    let (status, body) = call(&app, "PUT", &format!("/v1/issuers/{ISSUER}"), Some(STRANGER), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"]["code"], "NOT_OWNER");

    let (status, body) = call(&app, "PUT", &format!("/v1/issuers/{ISSUER}"), Some(OWNER), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["authorized"], true);

    let (_, list) = call(&app, "GET", "/v1/issuers", None, None).await;
    assert_eq!(list["issuers"], json!([ISSUER]));
    assert_eq!(list["owner"], OWNER);

    let (status, _) = call(&app, "DELETE", &format!("/v1/issuers/{ISSUER}"), Some(OWNER), None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = call(&app, "POST", "/v1/certificates", Some(ISSUER), Some(issue_body(RECIPIENT))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = call(&app, "PUT", &format!("/v1/issuers/{NULL}"), Some(OWNER), None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["code"], "INVALID_ACCOUNT");
}

#[tokio::test]
async fn test_ownership_transfer() {
    let app = test_app();
    let (status, body) = call(&app, "PUT", "/v1/registry/owner", Some(OWNER), Some(json!({"new_owner": STRANGER}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["owner"], STRANGER);

    let (status, _) = call(&app, "PUT", &format!("/v1/issuers/{ISSUER}"), Some(OWNER), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_account_summary() {
    let app = app_with_certificate().await;
    let (status, body) = call(&app, "GET", &format!("/v1/accounts/{ISSUER}"), None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["issued"], json!([1]));
    assert_eq!(body["balance"], 0);
    assert_eq!(body["is_authorized_issuer"], true);

    let (status, _) = call(&app, "GET", &format!("/v1/accounts/{NULL}"), None, None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

// -- Events -------------------------------------------------------------------

#[tokio::test]
async fn test_event_feed() {
    let app = app_with_certificate().await;
    call(&app, "POST", "/v1/certificates/1/revoke", Some(OWNER), None).await;

    let (status, body) = call(&app, "GET", "/v1/events", None, None).await;
    assert_eq!(status, StatusCode::OK);
    let events: Vec<&str> = body["entries"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["event"]["event"].as_str().unwrap())
        .collect();
    assert_eq!(
        events,
        vec!["RegistryCreated", "IssuerAuthorized", "CertificateIssued", "CertificateRevoked"]
    );
    assert_eq!(body["head_sequence"], 4);

    let (_, body) = call(&app, "GET", "/v1/events?since=3", None, None).await;
    assert_eq!(body["entries"].as_array().unwrap().len(), 1);

    let (_, body) = call(&app, "GET", "/v1/events/integrity", None, None).await;
    assert_eq!(body, json!({"total_entries": 4, "broken_links": 0, "valid": true}));
}

// -- Authentication -----------------------------------------------------------

#[tokio::test]
async fn test_secured_mode_requires_secret() {
    let app = verifycert_api::app(test_state(AppConfig {
        auth_token: Some("s3cret".into()),
        ..AppConfig::default()
    }));

    let (status, _) = call(&app, "GET", "/v1/registry", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = call(&app, "GET", "/v1/registry", Some(OWNER), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = call(&app, "GET", "/v1/registry", Some(&format!("{OWNER}:s3cret")), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = call(&app, "GET", "/health/liveness", None, None).await;
    assert_eq!(status, StatusCode::OK);
}

// -- Persistence --------------------------------------------------------------

#[tokio::test]
async fn test_mutations_persist_to_ledger() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ledger.json");
    let config = AppConfig {
        registry_owner: Some(AccountId::parse(OWNER).unwrap()),
        ledger_path: Some(path.clone()),
        ..AppConfig::default()
    };

    let app = verifycert_api::app(AppState::open(config.clone()).unwrap());
    call(&app, "POST", "/v1/certificates", Some(OWNER), Some(issue_body(RECIPIENT))).await;

    let reloaded = verifycert_api::app(AppState::open(config).unwrap());
    let (status, body) = call(&reloaded, "GET", "/v1/certificates/1", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["recipient"], RECIPIENT);
}

#[tokio::test]
async fn test_failed_persist_returns_500_and_rolls_back() {
    let dir = tempfile::tempdir().unwrap();
    let app = verifycert_api::app(test_state(AppConfig {
        ledger_path: Some(dir.path().join("absent").join("ledger.json")),
        ..AppConfig::default()
    }));

    let (status, body) = call(&app, "POST", "/v1/certificates", Some(OWNER), Some(issue_body(RECIPIENT))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"]["message"], "An internal error occurred");

    let (_, info) = call(&app, "GET", "/v1/registry", None, None).await;
    assert_eq!(info["total_supply"], 0);
    assert_eq!(info["events"], 1);
}

// -- OpenAPI ------------------------------------------------------------------

#[tokio::test]
async fn test_openapi_spec_lists_paths() {
    let app = test_app();
    let (status, body) = call(&app, "GET", "/openapi.json", None, None).await;
    assert_eq!(status, StatusCode::OK);
    let paths = body["paths"].as_object().unwrap();
    assert!(paths.contains_key("/v1/certificates"));
    assert!(paths.contains_key("/v1/certificates/{id}/verify"));
    assert!(paths.contains_key("/v1/issuers/{account}"));
    assert!(paths.contains_key("/v1/events"));
}
