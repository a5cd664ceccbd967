//! Client for the JSON-schema constrained model endpoint.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, info, warn};

use glossa_core::{Error, JsonGenerator, Result};

use crate::types::{
    ResponsesErrorEnvelope, ResponsesRequest, ResponsesResponse, TextFormat, TextOptions,
};

/// Default API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Default generation model.
pub const DEFAULT_MODEL: &str = "gpt-4o";

/// Default timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Configuration for the responses client.
#[derive(Debug, Clone)]
pub struct ResponsesConfig {
    /// Base URL for the API endpoint.
    pub base_url: String,
    /// API key for authentication (optional for local endpoints).
    pub api_key: Option<String>,
    /// Model to use for generation.
    pub model: String,
    /// Request timeout in seconds.
    pub timeout_seconds: u64,
}

impl Default for ResponsesConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            timeout_seconds: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// Client for an OpenAI-compatible responses endpoint in JSON-schema mode.
pub struct ResponsesClient {
    client: Client,
    config: ResponsesConfig,
}

impl ResponsesClient {
    /// Create a new client with the given configuration.
    pub fn new(config: ResponsesConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;

        info!(
            subsystem = "inference",
            component = "responses_client",
            model = %config.model,
            base_url = %config.base_url,
            "Initializing responses client"
        );

        Ok(Self { client, config })
    }

    /// Create from environment variables.
    ///
    /// | Variable | Default |
    /// |----------|---------|
    /// | `OPENAI_BASE_URL` | `https://api.openai.com/v1` |
    /// | `OPENAI_API_KEY` | none |
    /// | `OPENAI_GEN_MODEL` | `gpt-4o` |
    /// | `OPENAI_TIMEOUT` | `300` |
    pub fn from_env() -> Result<Self> {
        let config = ResponsesConfig {
            base_url: std::env::var("OPENAI_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            api_key: std::env::var("OPENAI_API_KEY").ok(),
            model: std::env::var("OPENAI_GEN_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            timeout_seconds: std::env::var("OPENAI_TIMEOUT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_TIMEOUT_SECS),
        };

        Self::new(config)
    }

    /// Get the current configuration.
    pub fn config(&self) -> &ResponsesConfig {
        &self.config
    }

    /// Build a POST request with authentication if configured.
    fn build_request(&self, endpoint: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.config.base_url.trim_end_matches('/'), endpoint);
        let mut req = self.client.post(&url);

        if let Some(ref api_key) = self.config.api_key {
            req = req.header("Authorization", format!("Bearer {}", api_key));
        }

        req.header("Content-Type", "application/json")
    }

    /// Check if the endpoint is available and responding.
    pub async fn health_check(&self) -> Result<bool> {
        let url = format!("{}/models", self.config.base_url.trim_end_matches('/'));
        let mut req = self.client.get(&url).timeout(Duration::from_secs(5));
        if let Some(ref api_key) = self.config.api_key {
            req = req.header("Authorization", format!("Bearer {}", api_key));
        }

        match req.send().await {
            Ok(resp) if resp.status().is_success() => Ok(true),
            Ok(resp) => {
                warn!(
                    subsystem = "inference",
                    component = "responses_client",
                    status = %resp.status(),
                    "Model endpoint health check failed"
                );
                Ok(false)
            }
            Err(e) => {
                warn!(
                    subsystem = "inference",
                    component = "responses_client",
                    error = %e,
                    "Model endpoint health check error"
                );
                Ok(false)
            }
        }
    }
}

#[async_trait]
impl JsonGenerator for ResponsesClient {
    async fn request_json(
        &self,
        input: &str,
        schema_name: &str,
        schema: &Value,
    ) -> Result<String> {
        debug!(
            subsystem = "inference",
            component = "responses_client",
            op = "request_json",
            model = %self.config.model,
            schema_name = schema_name,
            prompt_len = input.len(),
            "Requesting schema-constrained generation"
        );

        let request = ResponsesRequest {
            model: self.config.model.clone(),
            input: input.to_string(),
            text: TextOptions {
                format: TextFormat::json_schema(schema_name, schema.clone()),
            },
        };

        let response = self
            .build_request("/responses")
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::Upstream(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let message = response
                .json::<ResponsesErrorEnvelope>()
                .await
                .map(|envelope| envelope.error.message)
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(Error::Upstream(format!(
                "Model endpoint returned {}: {}",
                status, message
            )));
        }

        let envelope: ResponsesResponse = response
            .json()
            .await
            .map_err(|e| Error::Upstream(format!("Failed to parse response: {}", e)))?;

        let text = envelope
            .extract_text()
            .ok_or_else(|| Error::Upstream("empty response".to_string()))?;

        debug!(
            subsystem = "inference",
            component = "responses_client",
            op = "request_json",
            schema_name = schema_name,
            response_len = text.len(),
            "Generation complete"
        );
        Ok(text)
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}
