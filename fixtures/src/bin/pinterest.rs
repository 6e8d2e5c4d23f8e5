use std::collections::HashMap;

use axum::{
    extract::Query,
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use clap::Parser;
use fixtures::{run_server, FixtureArgs};
use serde::Serialize;
use serde_json::json;
use tracing::info;

/// Mock Pinterest server: the consent screen, both token grants, and the
/// three resource endpoints the broker proxies.
#[derive(Parser, Debug)]
#[clap(name = "pinterest-fixture")]
struct Cli {
    #[clap(flatten)]
    common: FixtureArgs,
}

/// The one authorization code this fixture ever issues.
const FIXTURE_AUTH_CODE: &str = "fixture_auth_code";
const FIXTURE_REFRESH_TOKEN: &str = "fixture-refresh-token";

#[derive(Serialize)]
struct OAuthRedirectParams<'a> {
    code: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    state: Option<&'a str>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    let app = Router::new()
        // Consent screen: auto-approves and redirects back with a code
        .route("/oauth/", get(authorize))
        // Token endpoint, both grants
        .route("/v5/oauth/token", post(token))
        // Resource endpoints
        .route("/v5/user_account", get(user_account))
        .route("/v5/boards", get(boards))
        .route("/v5/pins", post(create_pin));

    run_server(args.common, app).await
}

// The authorization endpoint is what the browser gets redirected to. A real
// Pinterest shows a consent screen; the fixture auto-approves.
async fn authorize(Query(params): Query<HashMap<String, String>>) -> impl IntoResponse {
    let redirect_uri = params
        .get("redirect_uri")
        .cloned()
        .unwrap_or_else(|| "http://localhost:3000/token".to_string());

    info!("Pinterest: auto-approving consent, redirecting to {redirect_uri}");

    let redirect_params = OAuthRedirectParams {
        code: FIXTURE_AUTH_CODE,
        state: params.get("state").map(String::as_str),
    };
    let query_string = serde_urlencoded::to_string(&redirect_params).unwrap(); // SAFETY: We are in fixtures so a panic is fine
    let redirect_url = format!("{redirect_uri}?{query_string}");

    axum::response::Redirect::to(&redirect_url).into_response()
}

// The token endpoint, handling both the authorization_code and refresh_token
// grants.
async fn token(
    headers: HeaderMap,
    axum::extract::Form(params): axum::extract::Form<HashMap<String, String>>,
) -> impl IntoResponse {
    let grant_type = params.get("grant_type").cloned().unwrap_or_default();
    info!("Pinterest: token request, grant_type={grant_type}");

    match grant_type.as_str() {
        "authorization_code" => {
            // The code exchange must be authenticated with Basic app_id:secret
            let authorized = headers
                .get(header::AUTHORIZATION)
                .and_then(|v| v.to_str().ok())
                .map(|v| v.starts_with("Basic "))
                .unwrap_or(false);
            if !authorized {
                return error_response(StatusCode::UNAUTHORIZED, 2, "Authentication failed");
            }

            let code = params.get("code").cloned().unwrap_or_default();
            if code != FIXTURE_AUTH_CODE {
                return error_response(
                    StatusCode::BAD_REQUEST,
                    283,
                    "Invalid authorization code",
                );
            }

            (
                StatusCode::OK,
                Json(json!({
                    "access_token": fixture_token("access"),
                    "refresh_token": FIXTURE_REFRESH_TOKEN,
                    "token_type": "bearer",
                    "expires_in": 3600,
                    "refresh_token_expires_in": 31536000,
                    "scope": "boards:read boards:write pins:read pins:write user_accounts:read",
                })),
            )
                .into_response()
        }

        "refresh_token" => {
            let refresh_token = params.get("refresh_token").cloned().unwrap_or_default();
            let has_credentials =
                params.contains_key("client_id") && params.contains_key("client_secret");
            if refresh_token != FIXTURE_REFRESH_TOKEN || !has_credentials {
                return error_response(StatusCode::UNAUTHORIZED, 2, "Invalid refresh token");
            }

            // Pinterest does not rotate the refresh token on this grant
            (
                StatusCode::OK,
                Json(json!({
                    "access_token": fixture_token("refreshed"),
                    "token_type": "bearer",
                    "expires_in": 3600,
                    "scope": "boards:read boards:write pins:read pins:write user_accounts:read",
                })),
            )
                .into_response()
        }

        _ => error_response(StatusCode::BAD_REQUEST, 1, "Invalid grant_type"),
    }
}

async fn user_account(headers: HeaderMap) -> impl IntoResponse {
    if !bearer_present(&headers) {
        return error_response(StatusCode::UNAUTHORIZED, 2, "Authentication failed");
    }

    Json(json!({
        "id": "914901226987654321",
        "username": "fixture-user",
        "account_type": "BUSINESS",
        "profile_image": "https://i.pinimg.com/600x600_R/fixture.jpg",
        "website_url": "https://fixture.example",
    }))
    .into_response()
}

async fn boards(headers: HeaderMap) -> impl IntoResponse {
    if !bearer_present(&headers) {
        return error_response(StatusCode::UNAUTHORIZED, 2, "Authentication failed");
    }

    // Boards carry more fields than the broker reports; the extras exercise
    // the projection
    Json(json!({
        "items": [
            {
                "id": "9876543210",
                "name": "Recipes",
                "description": "Dinner ideas",
                "privacy": "PUBLIC",
                "pin_count": 42,
                "owner": {"username": "fixture-user"},
            },
            {
                "id": "9876543211",
                "name": "Travel",
                "description": null,
                "privacy": "SECRET",
                "pin_count": 7,
                "owner": {"username": "fixture-user"},
            },
        ],
        "bookmark": null,
    }))
    .into_response()
}

async fn create_pin(
    headers: HeaderMap,
    Json(body): Json<serde_json::Value>,
) -> impl IntoResponse {
    if !bearer_present(&headers) {
        return error_response(StatusCode::UNAUTHORIZED, 2, "Authentication failed");
    }

    let board_id = body.get("board_id").cloned().unwrap_or(json!(null));
    if board_id.is_null() {
        return error_response(StatusCode::BAD_REQUEST, 80, "board_id is required");
    }

    info!("Pinterest: creating pin on board {board_id}");

    (
        StatusCode::CREATED,
        Json(json!({
            "id": "813744226987654321",
            "board_id": board_id,
            "title": body.get("title").cloned().unwrap_or(json!("")),
            "description": body.get("description").cloned().unwrap_or(json!("")),
            "media": {"media_type": "image"},
            "created_at": "2024-01-01T00:00:00",
        })),
    )
        .into_response()
}

fn bearer_present(headers: &HeaderMap) -> bool {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.starts_with("Bearer ") && v.len() > "Bearer ".len())
        .unwrap_or(false)
}

fn error_response(status: StatusCode, code: u32, message: &str) -> axum::response::Response {
    (
        status,
        Json(json!({
            "code": code,
            "message": message,
        })),
    )
        .into_response()
}

/// Produce a recognizable opaque token, vaguely shaped like Pinterest's
/// `pina_...` values.
fn fixture_token(kind: &str) -> String {
    format!(
        "pina_{}",
        URL_SAFE_NO_PAD.encode(format!("fixture-{kind}-token"))
    )
}
