//! Endpoint compilation: one configuration entry in, one request handler out.

use std::sync::Arc;

use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use mockauth_config::{EndpointConfig, EndpointSpec};
use mockauth_core::{Behavior, Claims, Method};
use mockauth_telemetry::{LogArg, Logger};
use mockauth_tokens::{
    SigningSecret, bearer_token, build_payload, decode_unverified, now_epoch_seconds,
    parse_overlay, resolve_expiry_hours,
};

/// Body of the 400 sent when the bearer token is missing or unreadable.
pub const BAD_TOKEN: &str = "Bad token";

/// Body of the 400 sent when an ISSUE body is not a JSON object.
pub const BAD_PAYLOAD: &str = "Bad payload";

/// Set to `false` on every DECODE response.
pub const TOKEN_VERIFIED_HEADER: &str = "x-token-verified";

/// What every compiled endpoint shares.
#[derive(Debug, Clone)]
pub struct CompileContext {
    /// Token lifetime for endpoints that do not set their own.
    pub default_expiry_hours: f64,
    /// Claims for ISSUE endpoints that do not set their own.
    pub default_payload: Option<Claims>,
    pub secret: Arc<SigningSecret>,
    pub logger: Arc<Logger>,
}

/// A validated endpoint bound to the shared secret and logger.
#[derive(Debug)]
pub struct CompiledEndpoint {
    spec: EndpointSpec,
    expiry_hours: f64,
    payload: Option<Claims>,
    secret: Arc<SigningSecret>,
    logger: Arc<Logger>,
}

/// Validate `config` and bind it to `ctx`.
///
/// An entry that fails validation is logged as a warning, naming the entry,
/// and yields `None`. The caller skips it and carries on.
pub async fn compile(config: &EndpointConfig, ctx: &CompileContext) -> Option<CompiledEndpoint> {
    match config.validate() {
        Ok(spec) => Some(CompiledEndpoint::new(spec, ctx)),
        Err(e) => {
            ctx.logger
                .warning([
                    LogArg::from(format!("Skipping endpoint config:  {e}.  ")),
                    "Endpoint config:  ".into(),
                    LogArg::json(config),
                ])
                .await;
            None
        }
    }
}

impl CompiledEndpoint {
    pub fn new(spec: EndpointSpec, ctx: &CompileContext) -> Self {
        let expiry_hours =
            resolve_expiry_hours(spec.token_expiry_hours, Some(ctx.default_expiry_hours));
        let payload = spec
            .default_payload
            .clone()
            .or_else(|| ctx.default_payload.clone());

        Self {
            spec,
            expiry_hours,
            payload,
            secret: Arc::clone(&ctx.secret),
            logger: Arc::clone(&ctx.logger),
        }
    }

    pub fn path(&self) -> &str {
        &self.spec.path
    }

    pub fn method(&self) -> Method {
        self.spec.method
    }

    pub fn behavior(&self) -> Behavior {
        self.spec.behavior
    }

    /// Lifetime of tokens issued here, after falling back to the service
    /// default.
    pub fn expiry_hours(&self) -> f64 {
        self.expiry_hours
    }

    /// Answer one request. Never fails: every outcome is a response.
    pub async fn handle(&self, headers: &HeaderMap, body: &[u8]) -> Response {
        match self.spec.behavior {
            Behavior::ReturnOk => StatusCode::OK.into_response(),
            Behavior::ReturnNotAuthenticated => StatusCode::UNAUTHORIZED.into_response(),
            Behavior::Issue => self.issue(body).await,
            Behavior::Verify => self.verify(headers).await,
            Behavior::Decode => self.decode(headers).await,
        }
    }

    async fn issue(&self, body: &[u8]) -> Response {
        let body_claims;
        let overlay = if self.spec.use_post_body_for_jwt_payload {
            body_claims = match parse_overlay(body) {
                Ok(claims) => claims,
                Err(e) => {
                    self.logger
                        .warning([format!("Rejected token request on {}:  {e}", self.spec.path).into()])
                        .await;
                    return (StatusCode::BAD_REQUEST, BAD_PAYLOAD).into_response();
                }
            };
            body_claims.as_ref()
        } else {
            self.payload.as_ref()
        };

        let issued = build_payload(now_epoch_seconds(), self.expiry_hours, overlay);
        if !issued.overridden.is_empty() {
            self.logger
                .warning([format!(
                    "Token payload for {} replaces computed claims:  {}",
                    self.spec.path,
                    issued.overridden.join(", ")
                )
                .into()])
                .await;
        }
        self.logger
            .info(["Created JWT payload:  ".into(), LogArg::json(&issued.claims)])
            .await;

        match self.secret.sign(&issued.claims) {
            Ok(token) => token.into_response(),
            Err(e) => {
                self.logger
                    .error([format!("Failed to issue token:  {e}").into()])
                    .await;
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        }
    }

    async fn verify(&self, headers: &HeaderMap) -> Response {
        let Some(token) = authorization_token(headers) else {
            return bad_token();
        };

        match self.secret.verify(token) {
            Ok(claims) => Json(claims).into_response(),
            Err(e) => {
                self.logger
                    .verbose([format!("Token rejected on {}:  {e}", self.spec.path).into()])
                    .await;
                (StatusCode::UNAUTHORIZED, e.to_string()).into_response()
            }
        }
    }

    async fn decode(&self, headers: &HeaderMap) -> Response {
        let Some(token) = authorization_token(headers) else {
            return bad_token();
        };

        match decode_unverified(token) {
            Ok(claims) => (
                [(TOKEN_VERIFIED_HEADER, "false")],
                Json(claims),
            )
                .into_response(),
            Err(e) => {
                self.logger
                    .verbose([format!("Undecodable token on {}:  {e}", self.spec.path).into()])
                    .await;
                bad_token()
            }
        }
    }
}

fn authorization_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(bearer_token)
}

fn bad_token() -> Response {
    (StatusCode::BAD_REQUEST, BAD_TOKEN).into_response()
}
