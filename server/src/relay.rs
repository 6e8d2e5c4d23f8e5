//! The HTML shim returned to the OAuth popup. The page hands the outcome to
//! the extension via `window.opener.postMessage` and closes itself.
//!
//! The payload is a typed struct serialized with serde and escaped so the
//! resulting literal is inert inside a `<script>` element; token and error
//! strings are never spliced into markup directly.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use maud::{html, Markup, PreEscaped, DOCTYPE};
use serde::Serialize;

use crate::pinterest::TokenResponse;

#[derive(Debug, Serialize)]
pub struct RelayPayload {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(rename = "refreshToken", skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(rename = "expiresIn", skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RelayPayload {
    pub fn success(tokens: TokenResponse, user: serde_json::Value) -> Self {
        Self {
            success: true,
            token: Some(tokens.access_token),
            refresh_token: tokens.refresh_token,
            expires_in: tokens.expires_in,
            user: Some(user),
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            token: None,
            refresh_token: None,
            expires_in: None,
            user: None,
            error: Some(error.into()),
        }
    }
}

/// Serialize the payload as a JavaScript expression that cannot terminate the
/// surrounding script element or be reparsed as markup.
fn script_literal(payload: &RelayPayload) -> String {
    // The payload is built from infallible Serialize impls.
    let json = serde_json::to_string(payload).unwrap_or_else(|_| "null".to_string());
    json.replace('&', "\\u0026")
        .replace('<', "\\u003c")
        .replace('>', "\\u003e")
        .replace('\u{2028}', "\\u2028")
        .replace('\u{2029}', "\\u2029")
}

fn relay_page(payload: &RelayPayload) -> Markup {
    let script = format!(
        "var payload = {};\n\
         if (window.opener) {{ window.opener.postMessage(payload, \"*\"); }}\n\
         window.close();",
        script_literal(payload)
    );

    html! {
        (DOCTYPE)
        html {
            head {
                meta charset="utf-8";
                title { "Pinterest authorization" }
            }
            body {
                script { (PreEscaped(script)) }
            }
        }
    }
}

pub fn success_page(tokens: TokenResponse, user: serde_json::Value) -> Response {
    relay_page(&RelayPayload::success(tokens, user)).into_response()
}

pub fn failure_page(status: StatusCode, error: &str) -> Response {
    (status, relay_page(&RelayPayload::failure(error))).into_response()
}
