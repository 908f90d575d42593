//! Registration of compiled endpoints into an axum [`Router`].

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::Router;
use axum::body::Bytes;
use axum::extract::DefaultBodyLimit;
use axum::http::HeaderMap;
use axum::routing::{MethodFilter, MethodRouter};
use mockauth_config::EndpointConfig;
use mockauth_core::Method;
use tower_http::trace::TraceLayer;

use crate::compiler::{CompileContext, CompiledEndpoint, compile};

/// Largest request body any endpoint accepts.
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Collects compiled endpoints in registration order.
///
/// A second registration for the same method and path replaces the first.
#[derive(Debug, Default)]
pub struct EndpointRouter {
    endpoints: Vec<Arc<CompiledEndpoint>>,
}

impl EndpointRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `endpoint`, returning the one it displaced, if any.
    pub fn register(&mut self, endpoint: CompiledEndpoint) -> Option<Arc<CompiledEndpoint>> {
        let endpoint = Arc::new(endpoint);
        let existing = self
            .endpoints
            .iter()
            .position(|e| e.method() == endpoint.method() && e.path() == endpoint.path());

        match existing {
            Some(index) => Some(std::mem::replace(&mut self.endpoints[index], endpoint)),
            None => {
                self.endpoints.push(endpoint);
                None
            }
        }
    }

    /// Registered endpoints, in the order they were first registered.
    pub fn endpoints(&self) -> impl Iterator<Item = &CompiledEndpoint> {
        self.endpoints.iter().map(Arc::as_ref)
    }

    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }

    /// Build the router, with the body limit and request tracing applied.
    pub fn into_router(self) -> Router {
        let mut routes: BTreeMap<String, MethodRouter> = BTreeMap::new();

        for endpoint in self.endpoints {
            let path = endpoint.path().to_string();
            let filter = method_filter(endpoint.method());
            let handler = move |headers: HeaderMap, body: Bytes| async move {
                endpoint.handle(&headers, &body).await
            };

            let method_router = routes.remove(&path).unwrap_or_else(MethodRouter::new);
            routes.insert(path, method_router.on(filter, handler));
        }

        routes
            .into_iter()
            .fold(Router::new(), |router, (path, method_router)| {
                router.route(&path, method_router)
            })
            .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
            .layer(TraceLayer::new_for_http())
    }
}

fn method_filter(method: Method) -> MethodFilter {
    match method {
        Method::Get => MethodFilter::GET,
        Method::Post => MethodFilter::POST,
    }
}

/// Compile each entry in list order and register the ones that validate.
///
/// Returns how many entries were registered. Entries that replace an
/// earlier registration are reported as warnings.
pub async fn register_all(
    configs: &[EndpointConfig],
    ctx: &CompileContext,
    router: &mut EndpointRouter,
) -> usize {
    let mut registered = 0;
    for config in configs {
        let Some(endpoint) = compile(config, ctx).await else {
            continue;
        };
        let (method, path) = (endpoint.method(), endpoint.path().to_string());
        if router.register(endpoint).is_some() {
            ctx.logger
                .warning([format!(
                    "Endpoint {method} {path} configured more than once; the later entry wins"
                )
                .into()])
                .await;
        }
        registered += 1;
    }
    registered
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use mockauth_core::{Behavior, LogLevel};
    use mockauth_security::SecretRegistry;
    use mockauth_telemetry::{Logger, LoggerConfig, MemorySink};
    use mockauth_tokens::SigningSecret;
    use tower::ServiceExt;

    fn context(log: Arc<MemorySink>) -> CompileContext {
        let registry = Arc::new(SecretRegistry::new());
        CompileContext {
            default_expiry_hours: 1.0,
            default_payload: None,
            secret: Arc::new(SigningSecret::new("router-secret", &registry).unwrap()),
            logger: Arc::new(Logger::new(LoggerConfig::new("test", vec![log]), registry)),
        }
    }

    fn entries(json: &str) -> Vec<EndpointConfig> {
        serde_json::from_str(json).unwrap()
    }

    async fn send(router: &Router, method: &str, uri: &str, body: &str) -> (StatusCode, String) {
        let req = Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::from(body.to_string()))
            .unwrap();
        let response = router.clone().oneshot(req).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn skips_invalid_entries_and_keeps_order() {
        let log = Arc::new(MemorySink::new());
        let ctx = context(log.clone());
        let mut registrar = EndpointRouter::new();

        let count = register_all(
            &entries(
                r#"[
                    {"path": "/b", "method": "GET", "behavior": "RETURN_OK"},
                    {"path": "/broken", "behavior": "RETURN_OK"},
                    {"path": "/a", "method": "POST", "behavior": "ISSUE"}
                ]"#,
            ),
            &ctx,
            &mut registrar,
        )
        .await;

        assert_eq!(count, 2);
        let paths: Vec<&str> = registrar.endpoints().map(|e| e.path()).collect();
        assert_eq!(paths, vec!["/b", "/a"]);
        assert_eq!(log.records_at(LogLevel::Warning).len(), 1);
    }

    #[tokio::test]
    async fn later_registration_wins() {
        let log = Arc::new(MemorySink::new());
        let ctx = context(log.clone());
        let mut registrar = EndpointRouter::new();

        register_all(
            &entries(
                r#"[
                    {"path": "/x", "method": "GET", "behavior": "RETURN_OK"},
                    {"path": "/x", "method": "GET", "behavior": "RETURN_NOT_AUTHENTICATED"}
                ]"#,
            ),
            &ctx,
            &mut registrar,
        )
        .await;

        assert_eq!(registrar.len(), 1);
        assert_eq!(
            registrar.endpoints().next().unwrap().behavior(),
            Behavior::ReturnNotAuthenticated
        );
        assert!(log.contains("configured more than once"));

        let router = registrar.into_router();
        assert_eq!(send(&router, "GET", "/x", "").await.0, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn methods_share_a_path() {
        let ctx = context(Arc::new(MemorySink::new()));
        let mut registrar = EndpointRouter::new();
        register_all(
            &entries(
                r#"[
                    {"path": "/auth", "method": "GET", "behavior": "RETURN_OK"},
                    {"path": "/auth", "method": "POST", "behavior": "RETURN_NOT_AUTHENTICATED"}
                ]"#,
            ),
            &ctx,
            &mut registrar,
        )
        .await;
        let router = registrar.into_router();

        assert_eq!(send(&router, "GET", "/auth", "").await.0, StatusCode::OK);
        assert_eq!(
            send(&router, "POST", "/auth", "").await.0,
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            send(&router, "DELETE", "/auth", "").await.0,
            StatusCode::METHOD_NOT_ALLOWED
        );
        assert_eq!(
            send(&router, "GET", "/elsewhere", "").await.0,
            StatusCode::NOT_FOUND
        );
    }

    #[tokio::test]
    async fn oversized_body_is_refused() {
        let ctx = context(Arc::new(MemorySink::new()));
        let mut registrar = EndpointRouter::new();
        register_all(
            &entries(
                r#"[{"path": "/t", "method": "POST", "behavior": "ISSUE", "usePostBodyForJwtPayload": true}]"#,
            ),
            &ctx,
            &mut registrar,
        )
        .await;
        let router = registrar.into_router();

        let padding = "x".repeat(MAX_BODY_BYTES + 1);
        let body = format!(r#"{{"pad": "{padding}"}}"#);
        let (status, _) = send(&router, "POST", "/t", &body).await;
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn empty_router_answers_not_found() {
        let router = EndpointRouter::new().into_router();
        assert_eq!(send(&router, "GET", "/", "").await.0, StatusCode::NOT_FOUND);
    }
}
