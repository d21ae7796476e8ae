//! API Module
//!
//! HTTP handlers and routing for the pastebin.
//!
//! # Endpoints
//! - `GET /` - Manual
//! - `POST /` - Create a paste
//! - `GET /--function` - Shell helper functions
//! - `GET /:id` - Fetch a paste
//! - `DELETE /:id` - Delete a paste

mod app_url;
mod console;
pub mod handlers;
pub mod render;
pub mod routes;
mod submission;

pub use app_url::AppUrl;
pub use handlers::AppState;
pub use routes::create_router;
pub use submission::Submission;
