//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the discovery route and the dispatch fallback
//! - Wire up middleware (request ID, tracing, timeout)
//! - Read request bodies under the configured limit
//! - Run synchronous handlers off the async executor
//! - Bind server to listener and shut down gracefully

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::{validate_config, ConfigError, ServantConfig};
use crate::error::DispatchError;
use crate::http::request::{request_span, MakeRequestUuidV4};
use crate::http::response::json_document;
use crate::observability::metrics::{self, NO_HANDLER};
use crate::routing::DispatchRequest;
use crate::servant::Registry;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<Registry>,
    pub max_body_size: usize,
}

/// HTTP server for a servant.
pub struct HttpServer {
    router: Router,
    config: ServantConfig,
}

impl HttpServer {
    /// Create a new HTTP server serving `registry`.
    ///
    /// The registry is frozen from here on. A non-empty `role.role_url` in
    /// the config replaces the one the registry was built with. The config is
    /// validated first, so a bad protocol path is an error rather than a
    /// routing panic.
    pub fn new(config: ServantConfig, mut registry: Registry) -> Result<Self, ConfigError> {
        validate_config(&config).map_err(ConfigError::Validation)?;

        if !config.role.role_url.is_empty() {
            registry.set_role_url(config.role.role_url.clone());
        }

        let state = AppState {
            registry: Arc::new(registry),
            max_body_size: config.limits.max_body_size,
        };

        let router = Self::build_router(&config, state);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &ServantConfig, state: AppState) -> Router {
        Router::new()
            .route(&config.role.protocol_path, any(serve_discovery))
            .fallback(serve_dispatch)
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http().make_span_with(request_span))
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV4))
    }

    /// The router, for serving in-process.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            protocol_path = %self.config.role.protocol_path,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Serve the role document, whatever the method.
pub async fn serve_discovery(State(state): State<AppState>) -> Response {
    match state.registry.report_roles() {
        Ok(document) => json_document(document),
        Err(e) => {
            tracing::error!(error = %e, "Failed to serialize role document");
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}

/// Route a request through the dispatch engine.
pub async fn serve_dispatch(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start_time = Instant::now();
    let (parts, body) = request.into_parts();
    let method = parts.method.as_str().to_string();
    let path = parts.uri.path().to_string();

    let body = match axum::body::to_bytes(body, state.max_body_size).await {
        Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
        Err(e) => {
            tracing::error!(method = %method, path = %path, error = %e, "Failed to read request body");
            let err = DispatchError::RequestRead(e.to_string());
            metrics::record_dispatch(NO_HANDLER, err.status_code(), start_time);
            return err.into_response();
        }
    };

    let registry = state.registry.clone();
    let result = tokio::task::spawn_blocking(move || {
        registry.call_handler(&DispatchRequest::new(&method, &path, &body))
    })
    .await
    .unwrap_or_else(|e| {
        tracing::error!(error = %e, "Dispatch task failed");
        Err(DispatchError::HandlerPanicked { handler: None })
    });

    match result {
        Ok(dispatched) => {
            metrics::record_dispatch(&dispatched.handler, 200, start_time);
            dispatched.into_response()
        }
        Err(err) => {
            metrics::record_dispatch(
                err.handler().unwrap_or(NO_HANDLER),
                err.status_code(),
                start_time,
            );
            err.into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::servant::HandlerDescriptor;
    use axum::http::header;
    use tower::ServiceExt;

    fn test_server(config: ServantConfig) -> HttpServer {
        let mut registry = Registry::new();
        registry.set_role_url("https://example.com/foo");
        registry
            .register_handler(HandlerDescriptor::new("test 1", "GET", "/test1/$(arg 1)"), |a: String| a)
            .unwrap();
        registry
            .register_handler(
                HandlerDescriptor::new("test 2", "POST", "/test2/$(arg 1)").with_data("$(arg 2)"),
                |a: String, b: String| format!("{a}:{b}"),
            )
            .unwrap();
        registry
            .register_handler(HandlerDescriptor::new("panics", "GET", "/panic"), || -> String {
                panic!("handler blew up")
            })
            .unwrap();
        HttpServer::new(config, registry).unwrap()
    }

    async fn send(router: Router, request: Request<Body>) -> (StatusCode, String) {
        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    fn request(method: &str, uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_discovery_any_method() {
        let server = test_server(ServantConfig::default());
        for method in ["GET", "POST", "DELETE"] {
            let response = server
                .router()
                .oneshot(request(method, "/protocol", ""))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
            assert_eq!(
                response.headers().get(header::CONTENT_TYPE).unwrap(),
                "application/json"
            );
        }
    }

    #[tokio::test]
    async fn test_discovery_document() {
        let server = test_server(ServantConfig::default());
        let (status, body) = send(server.router(), request("GET", "/protocol", "")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            "{\"roles\":[{\"role_url\":\"https://example.com/foo\",\
             \"handlers\":[{\"name\":\"test 1\",\"method\":\"GET\",\"path\":\"/test1/$(arg 1)\"},\
             {\"name\":\"test 2\",\"method\":\"POST\",\"path\":\"/test2/$(arg 1)\",\"data\":\"$(arg 2)\"},\
             {\"name\":\"panics\",\"method\":\"GET\",\"path\":\"/panic\"}]}]}"
        );
    }

    #[tokio::test]
    async fn test_config_role_url_overrides() {
        let mut config = ServantConfig::default();
        config.role.role_url = "http://example.com/override".into();
        config.role.protocol_path = "/discovery".into();
        let server = test_server(config);

        let (status, body) = send(server.router(), request("GET", "/discovery", "")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("\"role_url\":\"http://example.com/override\""));

        let (status, _) = send(server.router(), request("GET", "/protocol", "")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_dispatch_path_and_body() {
        let server = test_server(ServantConfig::default());
        let (status, body) = send(server.router(), request("GET", "/test1/argumentReceived", "")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "argumentReceived");

        let (status, body) = send(server.router(), request("POST", "/test2/left", "right")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "left:right");
    }

    #[tokio::test]
    async fn test_dispatch_ignores_query_string() {
        let server = test_server(ServantConfig::default());
        let (status, body) = send(server.router(), request("GET", "/test1/x?verbose=1", "")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "x");
    }

    #[tokio::test]
    async fn test_path_is_not_percent_decoded() {
        let server = test_server(ServantConfig::default());
        let (status, body) = send(server.router(), request("GET", "/test1/a%20b", "")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "a%20b");
    }

    #[tokio::test]
    async fn test_non_utf8_body_is_lossy() {
        let mut registry = Registry::new();
        registry
            .register_handler(HandlerDescriptor::new("raw", "POST", "/raw").with_data("$(x)"), |x: String| x)
            .unwrap();
        let server = HttpServer::new(ServantConfig::default(), registry).unwrap();

        let request = Request::builder()
            .method("POST")
            .uri("/raw")
            .body(Body::from(vec![0x61, 0xff, 0x62]))
            .unwrap();
        let (status, body) = send(server.router(), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "a\u{FFFD}b");
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let mut config = ServantConfig::default();
        config.role.protocol_path = "protocol".into();

        match HttpServer::new(config, Registry::new()) {
            Err(ConfigError::Validation(errors)) => assert_eq!(errors.len(), 1),
            Err(e) => panic!("unexpected error: {e}"),
            Ok(_) => panic!("invalid protocol path was accepted"),
        }
    }

    #[tokio::test]
    async fn test_no_handler_found() {
        let server = test_server(ServantConfig::default());
        let (status, body) = send(server.router(), request("GET", "/notatest", "")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, "No handler found");
    }

    #[tokio::test]
    async fn test_body_over_limit_is_read_error() {
        let mut config = ServantConfig::default();
        config.limits.max_body_size = 4;
        let server = test_server(config);

        let (status, body) = send(server.router(), request("POST", "/test2/a", "far too long")).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!body.is_empty());
        assert_ne!(body, "No handler found");
    }

    #[tokio::test]
    async fn test_panicking_handler() {
        let server = test_server(ServantConfig::default());
        let (status, body) = send(server.router(), request("GET", "/panic", "")).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, "Handler panicked");
    }

    #[tokio::test]
    async fn test_request_id_is_set_and_propagated() {
        let server = test_server(ServantConfig::default());
        let response = server
            .router()
            .oneshot(request("GET", "/test1/x", ""))
            .await
            .unwrap();
        assert!(response.headers().contains_key("x-request-id"));

        let mut with_id = request("GET", "/test1/x", "");
        with_id
            .headers_mut()
            .insert("x-request-id", "caller-chosen".parse().unwrap());
        let response = server.router().oneshot(with_id).await.unwrap();
        assert_eq!(response.headers().get("x-request-id").unwrap(), "caller-chosen");
    }
}
