//! OAuth2 token acquisition for OpenEMR.
//!
//! Password grant first; refresh-token grant once a refresh token is held, falling
//! back to the password grant when the refresh is rejected. Tokens are reused until
//! 30 seconds before `expires_in`.

use std::time::{Duration, Instant};

use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::{info, warn};

use super::RecordsError;

pub(crate) const TOKEN_PATH: &str = "/oauth2/default/token";
const EXPIRY_BUFFER: Duration = Duration::from_secs(30);
const DEFAULT_EXPIRES_IN: u64 = 3600;

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    expires_in: Option<u64>,
}

#[derive(Debug, Default)]
struct TokenState {
    access_token: Option<String>,
    refresh_token: Option<String>,
    expires_at: Option<Instant>,
}

impl TokenState {
    fn valid_access_token(&self) -> Option<&str> {
        match (&self.access_token, self.expires_at) {
            (Some(token), Some(at)) if Instant::now() < at => Some(token),
            _ => None,
        }
    }

    fn store(&mut self, response: TokenResponse) -> String {
        let expires_in = response.expires_in.unwrap_or(DEFAULT_EXPIRES_IN);
        self.expires_at =
            Some(Instant::now() + Duration::from_secs(expires_in).saturating_sub(EXPIRY_BUFFER));
        if response.refresh_token.is_some() {
            self.refresh_token = response.refresh_token;
        }
        self.access_token = Some(response.access_token.clone());
        response.access_token
    }
}

/// Holds OAuth2 credentials and the cached token pair.
pub struct OAuthAuthenticator {
    http: reqwest::Client,
    token_url: String,
    client_id: String,
    client_secret: String,
    username: String,
    password: String,
    scopes: String,
    state: Mutex<TokenState>,
}

impl OAuthAuthenticator {
    pub fn new(
        http: reqwest::Client,
        base_url: &str,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
        scopes: impl Into<String>,
    ) -> Self {
        Self {
            http,
            token_url: format!("{}{}", base_url.trim_end_matches('/'), TOKEN_PATH),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            username: username.into(),
            password: password.into(),
            scopes: scopes.into(),
            state: Mutex::new(TokenState::default()),
        }
    }

    /// Returns a valid access token, refreshing or acquiring one as needed.
    pub async fn ensure_token(&self) -> Result<String, RecordsError> {
        let mut state = self.state.lock().await;
        if let Some(token) = state.valid_access_token() {
            return Ok(token.to_string());
        }

        if let Some(refresh_token) = state.refresh_token.clone() {
            match self.refresh_grant(&refresh_token).await {
                Ok(response) => {
                    info!("refreshed records access token");
                    return Ok(state.store(response));
                }
                Err(e) => warn!(error = %e, "token refresh failed, using password grant"),
            }
        }

        let response = self.password_grant().await?;
        info!("obtained records access token via password grant");
        Ok(state.store(response))
    }

    /// Drops both tokens so the next call performs a fresh password grant.
    pub async fn invalidate(&self) {
        *self.state.lock().await = TokenState::default();
    }

    async fn password_grant(&self) -> Result<TokenResponse, RecordsError> {
        if self.client_id.is_empty() {
            return Err(RecordsError::MissingClientId);
        }
        let form = [
            ("grant_type", "password"),
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("scope", self.scopes.as_str()),
            ("user_role", "users"),
            ("username", self.username.as_str()),
            ("password", self.password.as_str()),
        ];
        self.token_request(&form).await
    }

    async fn refresh_grant(&self, refresh_token: &str) -> Result<TokenResponse, RecordsError> {
        let form = [
            ("grant_type", "refresh_token"),
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("refresh_token", refresh_token),
        ];
        self.token_request(&form).await
    }

    async fn token_request(&self, form: &[(&str, &str)]) -> Result<TokenResponse, RecordsError> {
        let res = self.http.post(&self.token_url).form(form).send().await?;
        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            return Err(RecordsError::Auth(format!("HTTP {}: {}", status.as_u16(), body)));
        }
        res.json::<TokenResponse>()
            .await
            .map_err(|e| RecordsError::Auth(format!("token response: {}", e)))
    }
}
