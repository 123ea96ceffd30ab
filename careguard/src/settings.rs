//! Typed settings read from the environment, and the wiring that turns them into a
//! running [`Conversation`].
//!
//! Call `config::load_and_apply("careguard", None)` first so `.env` and
//! `config.toml` values are visible here.

use std::sync::Arc;
use std::time::Duration;

use crate::agent::ReactEngine;
use crate::conversation::Conversation;
use crate::graph::CompilationError;
use crate::llm::{
    ChatAnthropic, LlmClient, MockLlm, DEFAULT_ANTHROPIC_BASE_URL, DEFAULT_MAX_TOKENS,
    DEFAULT_MODEL,
};
use crate::records::{RecordsClient, RecordsConfig, RecordsError};
use crate::tools::{
    clinical_tools, PublicDrugApis, ToolRegistry, DEFAULT_OPENFDA_BASE_URL,
    DEFAULT_RXNORM_BASE_URL,
};

/// Reply of the offline mock model.
pub const MOCK_REPLY: &str =
    "Mock mode: no reasoning backend is configured, so this request was not processed.";

const DEFAULT_SERVE_ADDR: &str = "127.0.0.1:8000";

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("ANTHROPIC_API_KEY is not set")]
    MissingApiKey,
    #[error("http client: {0}")]
    Http(#[from] reqwest::Error),
    #[error("records client: {0}")]
    Records(#[from] RecordsError),
    #[error("conversation graph: {0}")]
    Compilation(#[from] CompilationError),
}

/// All runtime settings.
#[derive(Clone, Debug)]
pub struct Settings {
    pub anthropic_api_key: Option<String>,
    pub anthropic_model: String,
    pub anthropic_base_url: String,
    pub anthropic_max_tokens: u32,
    pub records: RecordsConfig,
    pub rxnorm_base_url: String,
    pub openfda_base_url: String,
    pub reasoning_timeout: Duration,
    pub http_timeout: Duration,
    pub serve_addr: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

impl Settings {
    /// Builds settings from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds settings from any key lookup; unset or empty keys use defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let secs = |key: &str, default: u64| {
            get(key)
                .and_then(|s| s.trim().parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(Duration::from_secs(default))
        };
        let http_timeout = secs("CAREGUARD_HTTP_TIMEOUT_SECS", 10);
        let defaults = RecordsConfig::default();
        Self {
            anthropic_api_key: get("ANTHROPIC_API_KEY"),
            anthropic_model: get("ANTHROPIC_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            anthropic_base_url: get("ANTHROPIC_BASE_URL")
                .unwrap_or_else(|| DEFAULT_ANTHROPIC_BASE_URL.to_string()),
            anthropic_max_tokens: get("ANTHROPIC_MAX_TOKENS")
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(DEFAULT_MAX_TOKENS),
            records: RecordsConfig {
                base_url: get("OPENEMR_BASE_URL").unwrap_or(defaults.base_url),
                client_id: get("OPENEMR_CLIENT_ID").unwrap_or(defaults.client_id),
                client_secret: get("OPENEMR_CLIENT_SECRET").unwrap_or(defaults.client_secret),
                username: get("OPENEMR_USERNAME").unwrap_or(defaults.username),
                password: get("OPENEMR_PASSWORD").unwrap_or(defaults.password),
                scopes: get("OPENEMR_SCOPES").unwrap_or(defaults.scopes),
                timeout: http_timeout,
                accept_invalid_certs: get("OPENEMR_ACCEPT_INVALID_CERTS")
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(defaults.accept_invalid_certs),
            },
            rxnorm_base_url: get("RXNORM_BASE_URL")
                .unwrap_or_else(|| DEFAULT_RXNORM_BASE_URL.to_string()),
            openfda_base_url: get("OPENFDA_BASE_URL")
                .unwrap_or_else(|| DEFAULT_OPENFDA_BASE_URL.to_string()),
            reasoning_timeout: secs("CAREGUARD_REASONING_TIMEOUT_SECS", 120),
            http_timeout,
            serve_addr: get("SERVE_ADDR").unwrap_or_else(|| DEFAULT_SERVE_ADDR.to_string()),
        }
    }

    /// The three clinical tools wired to OpenEMR, RxNorm and openFDA.
    pub fn clinical_tools(&self) -> Result<ToolRegistry, SettingsError> {
        let records = RecordsClient::new(self.records.clone())?;
        let drugs = PublicDrugApis::new(reqwest::Client::new())
            .with_base_urls(&self.rxnorm_base_url, &self.openfda_base_url)
            .with_timeout(self.http_timeout);
        Ok(clinical_tools(Arc::new(records), Arc::new(drugs)))
    }

    /// The Anthropic client; fails when no API key is configured.
    ///
    /// Each request is bounded by the reasoning timeout.
    pub fn anthropic(&self) -> Result<ChatAnthropic, SettingsError> {
        let key = self
            .anthropic_api_key
            .as_deref()
            .ok_or(SettingsError::MissingApiKey)?;
        let http = reqwest::Client::builder()
            .timeout(self.reasoning_timeout)
            .build()?;
        Ok(ChatAnthropic::new(key, &self.anthropic_model)
            .with_base_url(&self.anthropic_base_url)
            .with_max_tokens(self.anthropic_max_tokens)
            .with_client(http))
    }

    /// Conversation backed by Claude and the clinical tools, or by [`MockLlm`] and no
    /// tools when `mock` is set.
    pub fn conversation(&self, mock: bool) -> Result<Conversation, SettingsError> {
        let (llm, tools): (Arc<dyn LlmClient>, ToolRegistry) = if mock {
            (Arc::new(MockLlm::with_no_tool_calls(MOCK_REPLY)), ToolRegistry::new())
        } else {
            (Arc::new(self.anthropic()?), self.clinical_tools()?)
        };
        let conversation = Conversation::builder(Arc::new(ReactEngine::new(llm)), Arc::new(tools))
            .reasoning_timeout(self.reasoning_timeout)
            .build()?;
        Ok(conversation)
    }
}
