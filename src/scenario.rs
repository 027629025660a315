//! Scenario generation client.

use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::backend::{GenerationRequest, GenerativeBackend};
use crate::config::{Config, FailurePolicy};
use crate::error::{BackendResult, GenerationError};
use crate::fallback::fallback_scenario;
use crate::model::{Difficulty, Scenario, TrackId};
use crate::prompts::{scenario_prompt, temperature_for};
use crate::retry::{with_retry, RetryPolicy};
use crate::schema::{parse_scenario, scenario_schema, ScenarioPayload};

/// Generates trolley-problem scenarios through a [`GenerativeBackend`].
#[derive(Clone)]
pub struct ScenarioGenerator {
    backend: Arc<dyn GenerativeBackend>,
    retry: RetryPolicy,
    failure_policy: FailurePolicy,
    language: String,
}

impl ScenarioGenerator {
    /// Create a generator that writes in English.
    pub fn new(
        backend: Arc<dyn GenerativeBackend>,
        retry: RetryPolicy,
        failure_policy: FailurePolicy,
    ) -> Self {
        Self {
            backend,
            retry,
            failure_policy,
            language: "English".to_string(),
        }
    }

    /// Create a generator from application configuration.
    pub fn from_config(backend: Arc<dyn GenerativeBackend>, config: &Config) -> Self {
        Self::new(
            backend,
            RetryPolicy::from_config(&config.request),
            config.game.failure_policy,
        )
        .with_language(&config.game.output_language)
    }

    /// Set the language scenario text is written in.
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Generate a fresh scenario for `difficulty`.
    ///
    /// Each attempt issues one backend request; failed attempts are retried
    /// under the configured [`RetryPolicy`]. Once the budget is spent the
    /// result depends on the [`FailurePolicy`]: an error, or the fixed
    /// fallback scenario.
    pub async fn generate_scenario(&self, difficulty: Difficulty) -> Result<Scenario, GenerationError> {
        let request = GenerationRequest::new(
            scenario_prompt(difficulty, &self.language),
            scenario_schema(),
        )
        .with_temperature(temperature_for(difficulty));

        debug!(
            difficulty = %difficulty,
            temperature = ?request.temperature,
            "Generating scenario"
        );

        match with_retry(&self.retry, "generate_scenario", || self.attempt(&request)).await {
            Ok(scenario) => {
                info!(
                    scenario_id = %scenario.id,
                    difficulty = %difficulty,
                    "Scenario generated"
                );
                Ok(scenario)
            }
            Err(source) => match self.failure_policy {
                FailurePolicy::Raise => Err(GenerationError::Exhausted {
                    attempts: self.retry.max_attempts,
                    source,
                }),
                FailurePolicy::Fallback => {
                    warn!(error = %source, "Using fallback scenario");
                    Ok(fallback_scenario())
                }
            },
        }
    }

    async fn attempt(&self, request: &GenerationRequest) -> BackendResult<Scenario> {
        let text = self.backend.generate(request.clone()).await?;
        let payload = parse_scenario(&text)?;
        Ok(normalize_scenario(payload))
    }
}

/// Give a parsed payload a fresh id and pin each track to its slot.
pub fn normalize_scenario(payload: ScenarioPayload) -> Scenario {
    Scenario {
        id: Uuid::new_v4().to_string(),
        title: payload.title,
        context: payload.context,
        track_a: payload.track_a.into_option(TrackId::TrackA),
        track_b: payload.track_b.into_option(TrackId::TrackB),
    }
}
