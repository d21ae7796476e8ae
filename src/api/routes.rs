//! API Routes
//!
//! Configures the Axum router with all pastebin endpoints.

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use super::console::ensure_trailing_newline;
use super::handlers::{
    create_handler, delete_handler, function_handler, get_handler, not_found_handler,
    usage_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /` - Manual (HTML for browsers)
/// - `POST /` - Create a paste from the `text` or `file` field
/// - `GET /-f`, `/-function`, `/--function` - Shell helper functions
/// - `GET /:id` - Fetch a paste
/// - `DELETE /:id`, `POST /:id/delete` - Delete a paste
///
/// # Middleware
/// - Body limit: `max_body_size` from the configuration
/// - Trailing newline on every response body
/// - Tracing: logs all requests
pub fn create_router(state: AppState) -> Router {
    let body_limit = state.config.max_body_size;

    Router::new()
        .route("/", get(usage_handler).post(create_handler))
        .route("/-f", get(function_handler))
        .route("/-function", get(function_handler))
        .route("/--function", get(function_handler))
        .route("/:id", get(get_handler).delete(delete_handler))
        .route("/:id/delete", post(delete_handler))
        .fallback(not_found_handler)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(middleware::map_response(ensure_trailing_newline))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::store::MemoryStore;
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use tower::util::ServiceExt;

    fn create_test_app() -> Router {
        let state = AppState::new(Config::default(), MemoryStore::new(1024 * 1024, 300));
        create_router(state)
    }

    async fn send(app: Router, method: &str, uri: &str) -> (StatusCode, String) {
        let response = app
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri(uri)
                    .header("host", "paste.test")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_usage_endpoint() {
        let (status, body) = send(create_test_app(), "GET", "/").await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("curl -F 'text=<-' http://paste.test/"));
    }

    #[tokio::test]
    async fn test_function_endpoints() {
        for path in ["/-f", "/-function", "/--function"] {
            let (status, body) = send(create_test_app(), "GET", path).await;

            assert_eq!(status, StatusCode::OK, "{path}");
            assert!(body.starts_with("netcopy() {"), "{path}");
            assert!(body.contains("netpaste() { curl \"http://paste.test/$1\"; }"));
        }
    }

    #[tokio::test]
    async fn test_get_not_found() {
        let (status, body) = send(create_test_app(), "GET", "/nonexistent").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, "Not Found\n");
    }

    #[tokio::test]
    async fn test_delete_not_found() {
        let (status, body) = send(create_test_app(), "DELETE", "/nonexistent").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, "Not Found\n");

        let (status, _) = send(create_test_app(), "POST", "/nonexistent/delete").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_unknown_path() {
        let (status, body) = send(create_test_app(), "GET", "/a/b/c").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, "Not Found\n");
    }
}
