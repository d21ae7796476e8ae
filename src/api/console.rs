//! Response filter keeping terminal output tidy.

use axum::{
    body::{to_bytes, Body},
    http::{header::CONTENT_LENGTH, StatusCode},
    response::{IntoResponse, Response},
};
use bytes::{BufMut, BytesMut};
use tracing::warn;

/// Appends `\n` to every response body that does not already end with one,
/// so shells print the prompt on a fresh line.
pub async fn ensure_trailing_newline(response: Response) -> Response {
    let (mut parts, body) = response.into_parts();

    let bytes = match to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(err) => {
            warn!("failed to buffer response body: {err}");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    if bytes.ends_with(b"\n") {
        return Response::from_parts(parts, Body::from(bytes));
    }

    let mut buf = BytesMut::with_capacity(bytes.len() + 1);
    buf.put_slice(&bytes);
    buf.put_u8(b'\n');

    parts.headers.remove(CONTENT_LENGTH);
    Response::from_parts(parts, Body::from(buf.freeze()))
}
