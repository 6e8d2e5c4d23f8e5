//! Thin client for the Pinterest v5 API: the two token grants plus the three
//! proxied resource calls. Nothing here is cached or persisted; every function
//! is a single request against the configured API host.

use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

use crate::errors::ApiError;
use crate::state::{ClientCredentials, PinterestConfig};

/// Title used when the extension does not supply one.
pub const DEFAULT_PIN_TITLE: &str = "Pinned via Pin It Your Way";

const PROVIDER_ERROR_FALLBACK: &str = "Pinterest API error";

#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_in: Option<u64>,
}

/// A board as we report it to the extension. Pinterest returns a much richer
/// object; everything but these three fields is dropped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Board {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Deserialize)]
struct BoardsPage {
    items: Vec<Board>,
}

#[derive(Serialize)]
pub struct MediaSource<'a> {
    pub source_type: &'static str,
    pub url: &'a str,
}

#[derive(Serialize)]
pub struct PinRequest<'a> {
    pub board_id: &'a str,
    pub media_source: MediaSource<'a>,
    pub title: &'a str,
    pub description: &'a str,
}

impl<'a> PinRequest<'a> {
    pub fn new(
        board_id: &'a str,
        image_url: &'a str,
        title: Option<&'a str>,
        description: Option<&'a str>,
    ) -> Self {
        Self {
            board_id,
            media_source: MediaSource {
                source_type: "image_url",
                url: image_url,
            },
            title: title.unwrap_or(DEFAULT_PIN_TITLE),
            description: description.unwrap_or(""),
        }
    }
}

#[derive(Serialize)]
struct AuthorizationCodeGrant<'a> {
    grant_type: &'static str,
    code: &'a str,
    redirect_uri: &'a str,
}

#[derive(Serialize)]
struct RefreshTokenGrant<'a> {
    grant_type: &'static str,
    refresh_token: &'a str,
    client_id: &'a str,
    client_secret: &'a str,
}

/// Exchange an authorization code for a token set. Credentials go in a Basic
/// auth header; the grant parameters in the form body.
pub async fn exchange_code(
    http: &reqwest::Client,
    config: &PinterestConfig,
    credentials: ClientCredentials<'_>,
    code: &str,
) -> Result<TokenResponse, ApiError> {
    let response = http
        .post(config.token_endpoint())
        .basic_auth(credentials.app_id, Some(credentials.app_secret))
        .form(&AuthorizationCodeGrant {
            grant_type: "authorization_code",
            code,
            redirect_uri: credentials.redirect_uri,
        })
        .send()
        .await?;

    parse(response).await
}

/// Obtain a fresh access token from a refresh token. Pinterest accepts the
/// client credentials in the form body for this grant.
pub async fn refresh_token(
    http: &reqwest::Client,
    config: &PinterestConfig,
    credentials: ClientCredentials<'_>,
    refresh_token: &str,
) -> Result<TokenResponse, ApiError> {
    let response = http
        .post(config.token_endpoint())
        .form(&RefreshTokenGrant {
            grant_type: "refresh_token",
            refresh_token,
            client_id: credentials.app_id,
            client_secret: credentials.app_secret,
        })
        .send()
        .await?;

    parse(response).await
}

/// Fetch the authenticated user's account profile, passed through unmodified.
pub async fn user_account(
    http: &reqwest::Client,
    config: &PinterestConfig,
    token: &str,
) -> Result<serde_json::Value, ApiError> {
    let response = http
        .get(config.user_account_endpoint())
        .bearer_auth(token)
        .send()
        .await?;

    parse(response).await
}

/// List the user's boards, projected down to the fields the extension shows.
pub async fn boards(
    http: &reqwest::Client,
    config: &PinterestConfig,
    token: &str,
) -> Result<Vec<Board>, ApiError> {
    let response = http
        .get(config.boards_endpoint())
        .bearer_auth(token)
        .send()
        .await?;

    let page: BoardsPage = parse(response).await?;
    Ok(page.items)
}

pub async fn create_pin(
    http: &reqwest::Client,
    config: &PinterestConfig,
    token: &str,
    pin: &PinRequest<'_>,
) -> Result<serde_json::Value, ApiError> {
    let response = http
        .post(config.pins_endpoint())
        .bearer_auth(token)
        .json(pin)
        .send()
        .await?;

    parse(response).await
}

/// Decode a provider response, mapping non-success statuses to
/// `ApiError::Provider`. The raw error body is logged for diagnosis; success
/// bodies (which carry tokens) are not.
async fn parse<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json().await?);
    }

    let body = response.text().await.unwrap_or_default();
    tracing::error!(status = %status, body = %body, "Pinterest API error");

    let message = serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(String::from))
        .unwrap_or_else(|| PROVIDER_ERROR_FALLBACK.to_string());

    Err(ApiError::Provider {
        status: StatusCode::from_u16(status.as_u16())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        message,
    })
}
