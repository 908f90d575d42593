//! End-to-end tests for the mockauth service.
//!
//! These drive a YAML configuration through loading, endpoint compilation
//! and the axum router, then exercise the endpoints with real requests.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use mockauth_config::{ServiceConfig, TEMPLATE, write_template};
use mockauth_core::LogLevel;
use mockauth_gateway::{CompileContext, EndpointRouter, register_all};
use mockauth_security::SecretRegistry;
use mockauth_telemetry::{FileSink, LogSink, Logger, LoggerConfig, MemorySink};
use mockauth_tokens::SigningSecret;
use serde_json::Value;
use tower::ServiceExt;

const SECRET: &str = "e2e-signing-secret";

// ── Harness ──────────────────────────────────────────────────────────────

struct Service {
    router: Router,
    log: Arc<MemorySink>,
}

/// Load `yaml` from disk, compile it, and build the router.
async fn service_from_yaml(yaml: &str) -> Service {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.yml");
    std::fs::write(&path, yaml).unwrap();
    let config = ServiceConfig::load_from(&path).unwrap();

    let registry = Arc::new(SecretRegistry::new());
    let secret = Arc::new(SigningSecret::new(SECRET, &registry).unwrap());
    let log = Arc::new(MemorySink::new());
    let logger = Arc::new(Logger::new(
        LoggerConfig::new("e2e", vec![log.clone()]),
        registry,
    ));

    let ctx = CompileContext {
        default_expiry_hours: config.token_expiry_hours_or(2.5),
        default_payload: config.default_payload.clone(),
        secret,
        logger,
    };
    let mut registrar = EndpointRouter::new();
    register_all(&config.endpoints, &ctx, &mut registrar).await;

    Service {
        router: registrar.into_router(),
        log,
    }
}

struct Reply {
    status: StatusCode,
    headers: axum::http::HeaderMap,
    body: String,
}

impl Reply {
    fn json(&self) -> Value {
        serde_json::from_str(&self.body).unwrap()
    }
}

async fn call(service: &Service, method: &str, uri: &str, bearer: Option<&str>, body: &str) -> Reply {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = bearer {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let req = builder.body(Body::from(body.to_string())).unwrap();

    let response = service.router.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    Reply {
        status,
        headers,
        body: String::from_utf8(bytes.to_vec()).unwrap(),
    }
}

/// Replace one character in the signature segment.
fn flip_one_char(token: &str) -> String {
    let at = token.rfind('.').unwrap() + 3;
    let mut bytes = token.as_bytes().to_vec();
    bytes[at] = if bytes[at] == b'x' { b'y' } else { b'x' };
    String::from_utf8(bytes).unwrap()
}

const LOGIN_AND_VERIFY: &str = r#"
endpoints:
  - path: /login
    method: POST
    behavior: ISSUE
    tokenExpiryHours: 1
    defaultPayload:
      role: admin
  - path: /verify
    method: GET
    behavior: VERIFY
  - path: /decode
    method: GET
    behavior: DECODE
"#;

// ── Token lifecycle ──────────────────────────────────────────────────────

#[tokio::test]
async fn e2e_issue_verify_and_tamper() {
    let service = service_from_yaml(LOGIN_AND_VERIFY).await;

    let issued = call(&service, "POST", "/login", None, "").await;
    assert_eq!(issued.status, StatusCode::OK);
    let token = issued.body;

    let verified = call(&service, "GET", "/verify", Some(&token), "").await;
    assert_eq!(verified.status, StatusCode::OK);
    let claims = verified.json();
    assert_eq!(claims["role"], "admin");
    let iat = claims["iat"].as_i64().unwrap();
    let exp = claims["exp"].as_i64().unwrap();
    assert_eq!(exp - iat, 3600);
    assert_eq!(claims.as_object().unwrap().len(), 3);

    let tampered = call(&service, "GET", "/verify", Some(&flip_one_char(&token)), "").await;
    assert_eq!(tampered.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn e2e_verify_without_bearer_is_bad_request() {
    let service = service_from_yaml(LOGIN_AND_VERIFY).await;

    let reply = call(&service, "GET", "/verify", None, "").await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(reply.body, "Bad token");
}

#[tokio::test]
async fn e2e_decode_reads_tampered_token_but_never_vouches() {
    let service = service_from_yaml(LOGIN_AND_VERIFY).await;
    let token = call(&service, "POST", "/login", None, "").await.body;

    let decoded = call(&service, "GET", "/decode", Some(&flip_one_char(&token)), "").await;
    assert_eq!(decoded.status, StatusCode::OK);
    assert_eq!(decoded.headers["x-token-verified"], "false");
    assert_eq!(decoded.json()["role"], "admin");

    let missing = call(&service, "GET", "/decode", None, "").await;
    assert_eq!(missing.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn e2e_service_wide_defaults_apply() {
    let service = service_from_yaml(
        r#"
tokenExpiryHours: 3
defaultPayload:
  sub: everyone
endpoints:
  - {path: /token, method: GET, behavior: ISSUE}
  - {path: /verify, method: GET, behavior: VERIFY}
"#,
    )
    .await;

    let token = call(&service, "GET", "/token", None, "").await.body;
    let claims = call(&service, "GET", "/verify", Some(&token), "").await.json();
    assert_eq!(claims["sub"], "everyone");
    let lifetime = claims["exp"].as_i64().unwrap() - claims["iat"].as_i64().unwrap();
    assert_eq!(lifetime, 3 * 3600);
}

#[tokio::test]
async fn e2e_post_body_becomes_claims() {
    let service = service_from_yaml(
        r#"
endpoints:
  - path: /token
    method: POST
    behavior: ISSUE
    usePostBodyForJwtPayload: true
  - path: /verify
    method: GET
    behavior: VERIFY
"#,
    )
    .await;

    let token = call(&service, "POST", "/token", None, r#"{"sub": "carol", "scope": ["read"]}"#)
        .await
        .body;
    let claims = call(&service, "GET", "/verify", Some(&token), "").await.json();
    assert_eq!(claims["sub"], "carol");
    assert_eq!(claims["scope"][0], "read");

    let bad = call(&service, "POST", "/token", None, "\"just a string\"").await;
    assert_eq!(bad.status, StatusCode::BAD_REQUEST);
    assert_eq!(bad.body, "Bad payload");
}

// ── Configuration handling ───────────────────────────────────────────────

#[tokio::test]
async fn e2e_invalid_entries_are_skipped_not_fatal() {
    let service = service_from_yaml(
        r#"
endpoints:
  - {path: /ok, method: GET, behavior: RETURN_OK}
  - {method: GET, behavior: RETURN_OK}
  - {path: /nomethod, behavior: RETURN_OK}
  - {path: /nobehavior, method: GET}
  - {path: /deny, method: GET, behavior: RETURN_NOT_AUTHENTICATED}
"#,
    )
    .await;

    assert_eq!(call(&service, "GET", "/ok", None, "").await.status, StatusCode::OK);
    assert_eq!(
        call(&service, "GET", "/deny", None, "").await.status,
        StatusCode::UNAUTHORIZED
    );
    assert_eq!(
        call(&service, "GET", "/nomethod", None, "").await.status,
        StatusCode::NOT_FOUND
    );
    assert_eq!(service.log.records_at(LogLevel::Warning).len(), 3);
}

#[tokio::test]
async fn e2e_template_serves_out_of_the_box() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.yml");
    assert!(write_template(&path).unwrap());
    assert_eq!(std::fs::read_to_string(&path).unwrap(), TEMPLATE);

    let service = service_from_yaml(TEMPLATE).await;
    assert!(service.log.records_at(LogLevel::Warning).is_empty());

    let token = call(&service, "GET", "/auth/token", None, "").await.body;
    let verified = call(&service, "GET", "/auth/verify", Some(&token), "").await;
    assert_eq!(verified.status, StatusCode::OK);
    assert_eq!(verified.json()["sub"], "mock-user");

    assert_eq!(
        call(&service, "GET", "/health", None, "").await.status,
        StatusCode::OK
    );
}

// ── Logging ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn e2e_secret_is_scrubbed_from_every_sink() {
    let dir = tempfile::tempdir().unwrap();
    let log_path = dir.path().join("service.log");

    let registry = Arc::new(SecretRegistry::new());
    let memory = Arc::new(MemorySink::new());
    let file = Arc::new(FileSink::create(&log_path).await.unwrap());
    let sinks: Vec<Arc<dyn LogSink>> = vec![memory.clone(), file];
    let logger = Logger::new(LoggerConfig::new("e2e", sinks), registry.clone());

    let _secret = SigningSecret::new(SECRET, &registry).unwrap();
    logger
        .warning(["configured with ".into(), SECRET.into()])
        .await;

    assert!(!memory.contains(SECRET));
    let written = std::fs::read_to_string(&log_path).unwrap();
    assert!(!written.contains(SECRET));
    assert!(written.contains("configured with [REDACTED]"));
}

#[tokio::test]
async fn e2e_numeric_secret_is_scrubbed_from_structured_args() {
    let registry = Arc::new(SecretRegistry::new());
    let memory = Arc::new(MemorySink::new());
    let logger = Logger::new(LoggerConfig::new("e2e", vec![memory.clone()]), registry.clone());

    let _secret = SigningSecret::new("98765432", &registry).unwrap();
    logger
        .info(["Created JWT payload:  ".into(), serde_json::json!({"pin": 98765432}).into()])
        .await;

    assert!(!memory.contains("98765432"));
    assert!(memory.contains("\"pin\": \"[REDACTED]\""));
}

#[tokio::test]
async fn e2e_two_runs_keep_two_log_files() {
    let dir = tempfile::tempdir().unwrap();
    let log_path = dir.path().join("mockauth.log");

    for run in ["first run", "second run"] {
        let sink: Arc<dyn LogSink> = Arc::new(FileSink::create(&log_path).await.unwrap());
        let logger = Logger::new(
            LoggerConfig::new("e2e", vec![sink]),
            Arc::new(SecretRegistry::new()),
        );
        logger.info([run.into()]).await;
    }

    let files: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .collect();
    assert_eq!(files.len(), 2);

    let contents: Vec<String> = files
        .iter()
        .map(|p| std::fs::read_to_string(p).unwrap())
        .collect();
    assert!(contents.iter().any(|c| c.contains("first run") && !c.contains("second run")));
    assert!(contents.iter().any(|c| c.contains("second run") && !c.contains("first run")));
}
