use async_trait::async_trait;
use reqwest::Client;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

use super::types::{GenerateContentRequest, GenerateContentResponse};
use crate::backend::{GenerationRequest, GenerativeBackend};
use crate::config::{GeminiConfig, RequestConfig};
use crate::error::{BackendError, BackendResult};

/// Client for the Gemini `generateContent` endpoint
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
    timeout_ms: u64,
}

impl GeminiClient {
    /// Create a new Gemini client
    pub fn new(config: &GeminiConfig, request_config: &RequestConfig) -> BackendResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(request_config.timeout_ms))
            .build()
            .map_err(BackendError::Http)?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            timeout_ms: request_config.timeout_ms,
        })
    }

    /// Send one `generateContent` request
    pub async fn generate_content(
        &self,
        request: &GenerateContentRequest,
    ) -> BackendResult<GenerateContentResponse> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );

        debug!(
            model = %self.model,
            temperature = ?request.generation_config.temperature,
            "Calling Gemini generateContent"
        );

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    BackendError::Timeout {
                        timeout_ms: self.timeout_ms,
                    }
                } else {
                    BackendError::Http(e)
                }
            })?;

        let status = response.status();

        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(BackendError::Api {
                status: status.as_u16(),
                message: error_body,
            });
        }

        response
            .json()
            .await
            .map_err(|e| BackendError::malformed(format!("Failed to parse response: {}", e)))
    }

    /// Get the base URL (for testing)
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Model identifier sent with every request
    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl GenerativeBackend for GeminiClient {
    async fn generate(&self, request: GenerationRequest) -> BackendResult<String> {
        let mut body = GenerateContentRequest::json(request.prompt).with_schema(request.schema);
        if let Some(temperature) = request.temperature {
            body = body.with_temperature(temperature);
        }

        let start = Instant::now();
        let result = self.generate_content(&body).await;
        let latency = start.elapsed();

        let response = match result {
            Ok(r) => r,
            Err(e) => {
                error!(
                    model = %self.model,
                    error = %e,
                    latency_ms = latency.as_millis(),
                    "Gemini call failed"
                );
                return Err(e);
            }
        };

        match response.text() {
            Some(text) => {
                info!(
                    model = %self.model,
                    latency_ms = latency.as_millis(),
                    tokens = ?response.usage_metadata.as_ref().and_then(|u| u.total_token_count),
                    "Gemini call succeeded"
                );
                Ok(text)
            }
            None => {
                warn!(
                    model = %self.model,
                    block_reason = ?response.block_reason(),
                    latency_ms = latency.as_millis(),
                    "Gemini returned no text"
                );
                Err(BackendError::EmptyResponse)
            }
        }
    }
}
