//! Authenticated JSON GETs against the OpenEMR REST and FHIR APIs.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, warn};

use super::auth::OAuthAuthenticator;
use super::RecordsError;

/// Read access to the records backend.
///
/// **Interaction**: Implemented by [`RecordsClient`]; the patient and allergy tools
/// hold an `Arc<dyn RecordsApi>`.
#[async_trait]
pub trait RecordsApi: Send + Sync {
    /// GET `path` (relative to the backend base URL) with `query`, returning the JSON body.
    async fn get_json(&self, path: &str, query: &[(&str, &str)]) -> Result<Value, RecordsError>;
}

/// Connection settings for [`RecordsClient`].
#[derive(Debug, Clone)]
pub struct RecordsConfig {
    pub base_url: String,
    pub client_id: String,
    pub client_secret: String,
    pub username: String,
    pub password: String,
    pub scopes: String,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Accept self-signed certificates (local OpenEMR containers).
    pub accept_invalid_certs: bool,
}

impl Default for RecordsConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8300".to_string(),
            client_id: String::new(),
            client_secret: String::new(),
            username: "admin".to_string(),
            password: "pass".to_string(),
            scopes: "openid api:oemr api:fhir user/patient.read user/allergy.read".to_string(),
            timeout: Duration::from_secs(10),
            accept_invalid_certs: false,
        }
    }
}

/// OpenEMR HTTP client with OAuth2 and a single retry on 401.
pub struct RecordsClient {
    http: reqwest::Client,
    base_url: String,
    auth: OAuthAuthenticator,
}

impl RecordsClient {
    pub fn new(config: RecordsConfig) -> Result<Self, RecordsError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()?;
        let base_url = config.base_url.trim_end_matches('/').to_string();
        let auth = OAuthAuthenticator::new(
            http.clone(),
            &base_url,
            config.client_id,
            config.client_secret,
            config.username,
            config.password,
            config.scopes,
        );
        Ok(Self {
            http,
            base_url,
            auth,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn send_get(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<reqwest::Response, RecordsError> {
        let token = self.auth.ensure_token().await?;
        let url = format!("{}{}", self.base_url, path);
        debug!(url = %url, "records GET");
        Ok(self
            .http
            .get(url)
            .bearer_auth(token)
            .query(query)
            .send()
            .await?)
    }
}

#[async_trait]
impl RecordsApi for RecordsClient {
    async fn get_json(&self, path: &str, query: &[(&str, &str)]) -> Result<Value, RecordsError> {
        let mut res = self.send_get(path, query).await?;
        if res.status() == reqwest::StatusCode::UNAUTHORIZED {
            warn!(path = %path, "records API returned 401, re-authenticating");
            self.auth.invalidate().await;
            res = self.send_get(path, query).await?;
        }
        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            return Err(RecordsError::Http {
                status: status.as_u16(),
                body,
            });
        }
        res.json::<Value>()
            .await
            .map_err(|e| RecordsError::Decode(e.to_string()))
    }
}
