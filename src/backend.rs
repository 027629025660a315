//! Narrow capability interface over the generation backend.
//!
//! Everything above this seam (retry, normalization, schema checks) is
//! written against [`GenerativeBackend`] so it can run against a mock.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::BackendResult;

/// A single schema-constrained generation call.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    /// Natural-language instruction.
    pub prompt: String,
    /// Output schema the backend must follow.
    pub schema: Value,
    /// Creativity override; backend default when `None`.
    pub temperature: Option<f64>,
}

impl GenerationRequest {
    /// Create a request with the backend's default temperature.
    pub fn new(prompt: impl Into<String>, schema: Value) -> Self {
        Self {
            prompt: prompt.into(),
            schema,
            temperature: None,
        }
    }

    /// Set temperature
    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }
}

/// Something that turns a prompt and schema into response text.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GenerativeBackend: Send + Sync {
    /// Issue exactly one request. Returns the raw response text.
    async fn generate(&self, request: GenerationRequest) -> BackendResult<String>;
}
