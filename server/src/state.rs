use std::env;
use std::time::Duration;

use crate::errors::ApiError;

/// Pinterest application configuration, read from the environment once at
/// startup. Individual credentials may be absent; each handler validates the
/// fields it needs before making any network call, so a misconfigured broker
/// still starts and still answers CORS preflights.
#[derive(Clone, Debug)]
pub struct PinterestConfig {
    pub app_id: Option<String>,
    pub app_secret: Option<String>,
    pub redirect_uri: Option<String>,
    /// Base URL of the consent-screen host (`https://www.pinterest.com`).
    pub oauth_url: String,
    /// Base URL of the API host (`https://api.pinterest.com`).
    pub api_url: String,
    /// Deadline applied to every outbound call to Pinterest.
    pub timeout: Duration,
}

/// The full credential set required by the token exchange and refresh grants.
#[derive(Clone, Copy)]
pub struct ClientCredentials<'a> {
    pub app_id: &'a str,
    pub app_secret: &'a str,
    pub redirect_uri: &'a str,
}

const DEFAULT_OAUTH_URL: &str = "https://www.pinterest.com";
const DEFAULT_API_URL: &str = "https://api.pinterest.com";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

impl PinterestConfig {
    pub fn from_env() -> Self {
        let timeout_secs = env::var("PINTEREST_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        Self {
            app_id: env::var("PINTEREST_APP_ID").ok(),
            app_secret: env::var("PINTEREST_APP_SECRET").ok(),
            redirect_uri: env::var("PINTEREST_REDIRECT_URI").ok(),
            oauth_url: env::var("PINTEREST_OAUTH_URL")
                .unwrap_or_else(|_| DEFAULT_OAUTH_URL.to_string()),
            api_url: env::var("PINTEREST_API_URL")
                .unwrap_or_else(|_| DEFAULT_API_URL.to_string()),
            timeout: Duration::from_secs(timeout_secs),
        }
    }

    /// Credentials needed to build the authorization URL. The app secret is
    /// deliberately not required here.
    pub fn authorization_credentials(&self) -> Result<(&str, &str), ApiError> {
        match (self.app_id.as_deref(), self.redirect_uri.as_deref()) {
            (Some(app_id), Some(redirect_uri)) => Ok((app_id, redirect_uri)),
            _ => Err(ApiError::Configuration),
        }
    }

    pub fn client_credentials(&self) -> Result<ClientCredentials<'_>, ApiError> {
        match (
            self.app_id.as_deref(),
            self.app_secret.as_deref(),
            self.redirect_uri.as_deref(),
        ) {
            (Some(app_id), Some(app_secret), Some(redirect_uri)) => Ok(ClientCredentials {
                app_id,
                app_secret,
                redirect_uri,
            }),
            _ => Err(ApiError::Configuration),
        }
    }

    pub fn authorization_endpoint(&self) -> String {
        format!("{}/oauth/", self.oauth_url)
    }

    pub fn token_endpoint(&self) -> String {
        format!("{}/v5/oauth/token", self.api_url)
    }

    pub fn user_account_endpoint(&self) -> String {
        format!("{}/v5/user_account", self.api_url)
    }

    pub fn boards_endpoint(&self) -> String {
        format!("{}/v5/boards", self.api_url)
    }

    pub fn pins_endpoint(&self) -> String {
        format!("{}/v5/pins", self.api_url)
    }
}

#[derive(Clone)]
pub struct AppState {
    pub pinterest: PinterestConfig,
    pub http: reqwest::Client,
}

impl AppState {
    pub fn new(pinterest: PinterestConfig) -> color_eyre::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(pinterest.timeout)
            .use_rustls_tls()
            .build()?;

        Ok(Self { pinterest, http })
    }

    pub fn from_env() -> color_eyre::Result<Self> {
        Self::new(PinterestConfig::from_env())
    }
}
