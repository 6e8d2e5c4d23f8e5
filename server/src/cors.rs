//! The extension calls both endpoints cross-origin, so every response (JSON
//! and HTML relay alike, errors included) carries the permissive header trio,
//! and OPTIONS preflights short-circuit before any configuration check.

use axum::extract::Request;
use axum::http::{header, HeaderValue, StatusCode};
use axum::middleware::Next;
use axum::response::Response;

pub const ALLOW_ORIGIN: &str = "*";
pub const ALLOW_HEADERS: &str = "Content-Type";
pub const ALLOW_METHODS: &str = "GET, POST, OPTIONS";

/// Handler for OPTIONS on both endpoints: 200, empty body. The middleware
/// below adds the CORS headers.
pub async fn preflight() -> StatusCode {
    StatusCode::OK
}

pub async fn apply_headers(request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;
    let headers = response.headers_mut();
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static(ALLOW_ORIGIN),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static(ALLOW_HEADERS),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(ALLOW_METHODS),
    );
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::response::IntoResponse;

    #[tokio::test]
    async fn preflight_is_an_empty_200() {
        let response = preflight().await.into_response();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
