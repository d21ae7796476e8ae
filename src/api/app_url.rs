//! Public base URL of the service, as seen by the client.

use axum::{
    extract::{FromRequestParts, Host},
    http::request::Parts,
};

use super::AppState;
use crate::error::ApiError;

/// Base URL without a trailing slash, e.g. `http://localhost:3000`.
///
/// Taken from `BASE_URL` when configured, otherwise built from the request's
/// `X-Forwarded-Proto` (default `http`) and host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppUrl(String);

impl AppUrl {
    pub fn new(base: impl Into<String>) -> Self {
        let base = base.into();
        Self(base.trim_end_matches('/').to_string())
    }

    /// Full URL of `path` under this base.
    pub fn join(&self, path: &str) -> String {
        format!("{}/{}", self.0, path)
    }
}

#[axum::async_trait]
impl FromRequestParts<AppState> for AppUrl {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, ApiError> {
        if let Some(base) = &state.config.base_url {
            return Ok(AppUrl::new(base.as_str()));
        }

        let scheme = parts
            .headers
            .get("x-forwarded-proto")
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.split(',').next())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .unwrap_or("http")
            .to_string();

        let Host(host) = Host::from_request_parts(parts, state)
            .await
            .map_err(|rejection| ApiError::Rejected {
                status: rejection.status(),
                message: rejection.body_text(),
            })?;

        Ok(AppUrl::new(format!("{scheme}://{host}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::Config, store::MemoryStore};
    use axum::http::Request;

    async fn extract(config: Config, request: Request<()>) -> Result<AppUrl, ApiError> {
        let state = AppState::new(config, MemoryStore::new(1024, 60));
        let (mut parts, _) = request.into_parts();
        AppUrl::from_request_parts(&mut parts, &state).await
    }

    #[test]
    fn test_join() {
        let app = AppUrl::new("http://paste.test/");
        assert_eq!(app.join(""), "http://paste.test/");
        assert_eq!(app.join("FoO"), "http://paste.test/FoO");
    }

    #[tokio::test]
    async fn test_from_host_header() {
        let request = Request::builder()
            .uri("/")
            .header("host", "localhost:3000")
            .body(())
            .unwrap();

        let app = extract(Config::default(), request).await.unwrap();

        assert_eq!(app, AppUrl::new("http://localhost:3000"));
    }

    #[tokio::test]
    async fn test_forwarded_proto() {
        let request = Request::builder()
            .uri("/")
            .header("host", "paste.example.org")
            .header("x-forwarded-proto", "https, http")
            .body(())
            .unwrap();

        let app = extract(Config::default(), request).await.unwrap();

        assert_eq!(app, AppUrl::new("https://paste.example.org"));
    }

    #[tokio::test]
    async fn test_configured_base_url_wins() {
        let config = Config {
            base_url: Some("https://vapor.example".to_string()),
            ..Config::default()
        };
        let request = Request::builder()
            .uri("/")
            .header("host", "internal:3000")
            .body(())
            .unwrap();

        let app = extract(config, request).await.unwrap();

        assert_eq!(app.join("FoO"), "https://vapor.example/FoO");
    }
}
