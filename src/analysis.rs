//! Decision analysis client.

use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::backend::{GenerationRequest, GenerativeBackend};
use crate::config::{Config, FailurePolicy};
use crate::error::{AnalysisError, BackendResult};
use crate::fallback::fallback_analysis;
use crate::model::{AnalysisResult, Scenario, TrackId};
use crate::prompts::analysis_prompt;
use crate::retry::{with_retry, RetryPolicy};
use crate::schema::{analysis_schema, parse_analysis};

/// Judges a user's decision through a [`GenerativeBackend`].
#[derive(Clone)]
pub struct DecisionAnalyzer {
    backend: Arc<dyn GenerativeBackend>,
    retry: RetryPolicy,
    failure_policy: FailurePolicy,
    language: String,
}

impl DecisionAnalyzer {
    /// Create an analyzer that writes in English.
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

    /// Create an analyzer from application configuration.
    pub fn from_config(backend: Arc<dyn GenerativeBackend>, config: &Config) -> Self {
        Self::new(
            backend,
            RetryPolicy::from_config(&config.request),
            config.game.failure_policy,
        )
        .with_language(&config.game.output_language)
    }

    /// Set the language analysis text is written in.
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Analyze `choice` against `scenario`.
    ///
    /// The returned `ai_choice` is the simulated judge's own pick and may
    /// differ from `choice`.
    pub async fn analyze_decision(
        &self,
        scenario: &Scenario,
        choice: TrackId,
    ) -> Result<AnalysisResult, AnalysisError> {
        // Analysis runs at the backend's default temperature.
        let request = GenerationRequest::new(
            analysis_prompt(scenario, choice, &self.language),
            analysis_schema(),
        );

        debug!(scenario_id = %scenario.id, choice = %choice, "Analyzing decision");

        match with_retry(&self.retry, "analyze_decision", || self.attempt(&request)).await {
            Ok(analysis) => {
                info!(
                    scenario_id = %scenario.id,
                    choice = %choice,
                    ai_choice = %analysis.ai_choice,
                    "Decision analyzed"
                );
                Ok(analysis)
            }
            Err(source) => match self.failure_policy {
                FailurePolicy::Raise => Err(AnalysisError::Exhausted {
                    attempts: self.retry.max_attempts,
                    source,
                }),
                FailurePolicy::Fallback => {
                    warn!(error = %source, "Using fallback analysis");
                    Ok(fallback_analysis())
                }
            },
        }
    }

    async fn attempt(&self, request: &GenerationRequest) -> BackendResult<AnalysisResult> {
        let text = self.backend.generate(request.clone()).await?;
        parse_analysis(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MockGenerativeBackend;
    use crate::error::BackendError;
    use crate::fallback::fallback_scenario;
    use serde_json::json;
    use std::time::Duration;

    fn analysis_json(ai_choice: &str) -> String {
        json!({
            "philosophicalPerspective": "Utilitarian calculus against a duty not to kill.",
            "similarityToClassics": "Close to Foot's original switch case.",
            "globalComparison": "Most respondents pull the lever.",
            "tags": ["Utilitarianism", "Switch"],
            "aiChoice": ai_choice,
            "aiReasoning": "Fewer lives lost.",
            "confidence": 0.9,
            "extra": {"nested": true}
        })
        .to_string()
    }

    fn analyzer(mock: MockGenerativeBackend, policy: FailurePolicy) -> DecisionAnalyzer {
        DecisionAnalyzer::new(Arc::new(mock), RetryPolicy::new(2, Duration::ZERO), policy)
    }

    #[tokio::test]
    async fn test_analyze_ignores_extra_fields() {
        let mut mock = MockGenerativeBackend::new();
        mock.expect_generate()
            .withf(|req| req.schema == analysis_schema() && req.temperature.is_none())
            .times(1)
            .returning(|_| Ok(analysis_json("track_b")));

        let analysis = analyzer(mock, FailurePolicy::Raise)
            .analyze_decision(&fallback_scenario(), TrackId::TrackA)
            .await
            .unwrap();

        assert_eq!(analysis.ai_choice, TrackId::TrackB);
        assert_eq!(analysis.tags, vec!["Utilitarianism", "Switch"]);
        assert!(!analysis.agrees_with(TrackId::TrackA));
    }

    #[tokio::test]
    async fn test_prompt_names_user_action() {
        let mut mock = MockGenerativeBackend::new();
        mock.expect_generate()
            .withf(|req| req.prompt.contains("User's choice: intervention"))
            .times(1)
            .returning(|_| Ok(analysis_json("track_a")));

        assert!(analyzer(mock, FailurePolicy::Raise)
            .analyze_decision(&fallback_scenario(), TrackId::TrackB)
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_invalid_ai_choice_is_retried() {
        let mut mock = MockGenerativeBackend::new();
        let mut calls = 0;
        mock.expect_generate().times(2).returning(move |_| {
            calls += 1;
            if calls == 1 {
                Ok(analysis_json("both"))
            } else {
                Ok(analysis_json("track_a"))
            }
        });

        let analysis = analyzer(mock, FailurePolicy::Raise)
            .analyze_decision(&fallback_scenario(), TrackId::TrackA)
            .await
            .unwrap();
        assert_eq!(analysis.ai_choice, TrackId::TrackA);
    }

    #[tokio::test]
    async fn test_exhausted_raises() {
        let mut mock = MockGenerativeBackend::new();
        mock.expect_generate()
            .times(2)
            .returning(|_| Err(BackendError::Timeout { timeout_ms: 10 }));

        let err = analyzer(mock, FailurePolicy::Raise)
            .analyze_decision(&fallback_scenario(), TrackId::TrackB)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            AnalysisError::Exhausted {
                attempts: 2,
                source: BackendError::Timeout { .. }
            }
        ));
    }

    #[tokio::test]
    async fn test_exhausted_falls_back_when_configured() {
        let mut mock = MockGenerativeBackend::new();
        mock.expect_generate()
            .times(2)
            .returning(|_| Err(BackendError::EmptyResponse));

        let analysis = analyzer(mock, FailurePolicy::Fallback)
            .analyze_decision(&fallback_scenario(), TrackId::TrackB)
            .await
            .unwrap();

        assert_eq!(analysis, fallback_analysis());
    }
}
