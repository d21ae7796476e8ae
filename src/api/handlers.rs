//! API Handlers
//!
//! HTTP request handlers for each pastebin endpoint.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{Html, IntoResponse, Response},
};
use tracing::info;

use super::render::{function_snippet, html_page, is_browser, usage_text};
use super::{AppUrl, Submission};
use crate::config::Config;
use crate::error::{ApiError, Result};
use crate::id::IdGenerator;
use crate::store::PasteStore;

const TEXT_PLAIN: &str = "text/plain; charset=utf-8";

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Where paste bodies live
    pub store: Arc<dyn PasteStore>,
    /// Identifier source for new pastes
    pub ids: Arc<IdGenerator>,
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates state around `store`, with an entropy-seeded identifier
    /// generator following the configured policy.
    pub fn new(config: Config, store: impl PasteStore + 'static) -> Self {
        let ids = IdGenerator::new(config.id_policy);
        Self {
            store: Arc::new(store),
            ids: Arc::new(ids),
            config: Arc::new(config),
        }
    }

    /// Replaces the identifier generator, e.g. with a seeded one.
    pub fn with_id_generator(mut self, ids: IdGenerator) -> Self {
        self.ids = Arc::new(ids);
        self
    }
}

/// Handler for GET /
///
/// The manual, as HTML for browsers and plain text for everything else.
pub async fn usage_handler(headers: HeaderMap, app: AppUrl) -> Response {
    let text = usage_text(&app);
    let user_agent = headers
        .get(header::USER_AGENT)
        .and_then(|value| value.to_str().ok());

    if is_browser(user_agent) {
        Html(html_page(&text)).into_response()
    } else {
        text.into_response()
    }
}

/// Handler for GET /-f, /-function and /--function
pub async fn function_handler(app: AppUrl) -> String {
    function_snippet(&app)
}

/// Handler for GET /:id
pub async fn get_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let content = state.store.get(&id).await?.ok_or(ApiError::NotFound)?;
    Ok(([(header::CONTENT_TYPE, TEXT_PLAIN)], content))
}

/// Handler for POST /
///
/// Stores the submitted `text` (or `file`) and answers with its URL.
pub async fn create_handler(
    State(state): State<AppState>,
    app: AppUrl,
    submission: std::result::Result<Submission, ApiError>,
) -> Result<(StatusCode, String)> {
    let limit = state.config.max_paste_size;

    let content: Bytes = submission
        .map_err(|err| err.payload_limited(limit))?
        .into_content()
        .ok_or(ApiError::MissingContent)?;

    if content.len() > limit {
        return Err(ApiError::PayloadTooLarge { limit });
    }

    let id = state
        .ids
        .generate(state.store.as_ref())
        .await?
        .ok_or(ApiError::Overwhelmed)?;

    info!("new paste: id='{id}', size={size}", size = content.len());
    state.store.set(&id, content).await?;

    Ok((StatusCode::CREATED, app.join(&id)))
}

/// Handler for DELETE /:id and POST /:id/delete
pub async fn delete_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<&'static str> {
    if state.store.delete(&id).await? {
        info!("deleted paste: id='{id}'");
        Ok("Deleted")
    } else {
        Err(ApiError::NotFound)
    }
}

/// Fallback for every unrouted request.
pub async fn not_found_handler() -> ApiError {
    ApiError::NotFound
}
