use chrono::Utc;
use std::sync::Arc;
use tracing::{info, warn};

use super::state::GameState;
use crate::analysis::DecisionAnalyzer;
use crate::error::StorageResult;
use crate::model::{Difficulty, HistoryItem, TrackId};
use crate::scenario::ScenarioGenerator;
use crate::storage::HistoryStore;

/// Shown when no scenario could be produced.
pub const GENERATION_FAILED_MESSAGE: &str =
    "Something went wrong while building the scenario. Maybe the AI got stuck in a moral dilemma... Please try again.";

/// Shown when the decision could not be analyzed.
pub const ANALYSIS_FAILED_MESSAGE: &str = "Failed to analyze your decision.";

/// Drives one player's session: calls the clients, applies transitions and
/// keeps the stored history in step with the in-memory list.
pub struct Game {
    state: GameState,
    generator: ScenarioGenerator,
    analyzer: DecisionAnalyzer,
    store: Arc<dyn HistoryStore>,
}

impl Game {
    /// Read the saved history once and start on the welcome screen.
    pub async fn load(
        generator: ScenarioGenerator,
        analyzer: DecisionAnalyzer,
        store: Arc<dyn HistoryStore>,
    ) -> StorageResult<Self> {
        let history = store.load_history().await?;
        info!(rounds = history.len(), "Game session loaded");

        Ok(Self {
            state: GameState::new(history),
            generator,
            analyzer,
            store,
        })
    }

    /// Current state.
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Completed rounds, most recent first.
    pub fn history(&self) -> &[HistoryItem] {
        self.state.history()
    }

    /// Pick the difficulty for the next scenario.
    pub fn select_difficulty(&mut self, difficulty: Difficulty) {
        self.state = std::mem::take(&mut self.state).select_difficulty(difficulty);
    }

    /// Generate a new scenario at the selected difficulty.
    pub async fn start_game(&mut self) -> &GameState {
        let (state, ticket) = std::mem::take(&mut self.state).begin_generation();
        let difficulty = state.scenario_difficulty();
        self.state = state;

        self.state = match self.generator.generate_scenario(difficulty).await {
            Ok(scenario) => std::mem::take(&mut self.state).scenario_ready(ticket, scenario),
            Err(e) => {
                warn!(error = %e, "Scenario generation failed");
                std::mem::take(&mut self.state).generation_failed(ticket, GENERATION_FAILED_MESSAGE)
            }
        };
        &self.state
    }

    /// Submit the user's decision, analyze it and record the round.
    ///
    /// The history is saved right after a round is recorded. Nothing happens
    /// unless a scenario is currently being played.
    ///
    /// A failed save is returned as an error but the round stays in the
    /// in-memory history; every save writes the whole list, so the next
    /// successful one persists it.
    pub async fn decide(&mut self, choice: TrackId) -> StorageResult<&GameState> {
        let (state, ticket) = std::mem::take(&mut self.state).begin_analysis(choice);
        self.state = state;
        let Some(ticket) = ticket else {
            return Ok(&self.state);
        };

        let Some(scenario) = self.state.scenario().cloned() else {
            return Ok(&self.state);
        };

        match self.analyzer.analyze_decision(&scenario, choice).await {
            Ok(analysis) => {
                let (state, item) =
                    std::mem::take(&mut self.state).analysis_ready(ticket, analysis, Utc::now());
                self.state = state;
                if let Some(item) = item {
                    info!(
                        history_id = %item.id,
                        scenario_id = %item.scenario.id,
                        choice = %choice,
                        "Round recorded"
                    );
                    if let Err(e) = self.store.save_history(self.state.history()).await {
                        warn!(error = %e, "Failed to save history");
                        return Err(e);
                    }
                }
            }
            Err(e) => {
                warn!(error = %e, "Decision analysis failed");
                self.state =
                    std::mem::take(&mut self.state).analysis_failed(ticket, ANALYSIS_FAILED_MESSAGE);
            }
        }

        Ok(&self.state)
    }

    /// Flip between the analysis and the scenario replay.
    pub fn toggle_review(&mut self) {
        self.state = std::mem::take(&mut self.state).toggle_review();
    }

    /// Open the history screen.
    pub fn show_history(&mut self) {
        self.state = std::mem::take(&mut self.state).show_history();
    }

    /// Back to the welcome screen.
    pub fn go_home(&mut self) {
        self.state = std::mem::take(&mut self.state).go_home();
    }

    /// Drop every round, in memory and in storage.
    pub async fn clear_history(&mut self) -> StorageResult<()> {
        self.state = std::mem::take(&mut self.state).clear_history();
        self.store.save_history(self.state.history()).await?;
        info!("History cleared");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{GenerativeBackend, MockGenerativeBackend};
    use crate::config::FailurePolicy;
    use crate::error::BackendError;
    use crate::game::Phase;
    use crate::error::StorageError;
    use crate::retry::RetryPolicy;
    use crate::storage::{MemoryStore, MockHistoryStore};
    use serde_json::json;
    use std::time::Duration;

    fn scenario_text() -> String {
        json!({
            "title": "Bridge of Sighs",
            "context": "A tram rolls toward a crowded footbridge.",
            "trackA": {"description": "five tourists", "summary": "5 tourists", "victimCount": 5, "label": "Main"},
            "trackB": {"description": "one gondolier", "summary": "1 gondolier", "victimCount": 1, "label": "Spur"}
        })
        .to_string()
    }

    fn analysis_text() -> String {
        json!({
            "philosophicalPerspective": "p",
            "similarityToClassics": "s",
            "globalComparison": "g",
            "tags": ["Utilitarian"],
            "aiChoice": "track_b",
            "aiReasoning": "r"
        })
        .to_string()
    }

    fn scripted_backend() -> MockGenerativeBackend {
        let mut mock = MockGenerativeBackend::new();
        mock.expect_generate().returning(|req| {
            if req.prompt.contains("User's choice") {
                Ok(analysis_text())
            } else {
                Ok(scenario_text())
            }
        });
        mock
    }

    async fn game_with(backend: MockGenerativeBackend, store: Arc<dyn HistoryStore>) -> Game {
        let backend: Arc<dyn GenerativeBackend> = Arc::new(backend);
        let retry = RetryPolicy::new(1, Duration::ZERO);
        Game::load(
            ScenarioGenerator::new(backend.clone(), retry, FailurePolicy::Raise),
            DecisionAnalyzer::new(backend, retry, FailurePolicy::Raise),
            store,
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_full_round_is_persisted() {
        let store = Arc::new(MemoryStore::new());
        let mut game = game_with(scripted_backend(), store.clone()).await;

        game.select_difficulty(Difficulty::Easy);
        assert_eq!(game.start_game().await.phase(), Phase::Playing);

        let state = game.decide(TrackId::TrackA).await.unwrap();
        assert_eq!(state.phase(), Phase::Result);
        assert_eq!(state.analysis().unwrap().ai_choice, TrackId::TrackB);

        let saved = store.load_history().await.unwrap();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].user_choice, TrackId::TrackA);
        assert_eq!(saved[0].difficulty, Difficulty::Easy);
    }

    #[tokio::test]
    async fn test_generation_failure_shows_error() {
        let mut mock = MockGenerativeBackend::new();
        mock.expect_generate()
            .returning(|_| Err(BackendError::EmptyResponse));
        let mut game = game_with(mock, Arc::new(MemoryStore::new())).await;

        let state = game.start_game().await;
        assert_eq!(state.phase(), Phase::Error);
        assert_eq!(state.error_message(), Some(GENERATION_FAILED_MESSAGE));
    }

    #[tokio::test]
    async fn test_failed_analysis_is_not_persisted() {
        let mut mock = MockGenerativeBackend::new();
        mock.expect_generate().returning(|req| {
            if req.prompt.contains("User's choice") {
                Err(BackendError::malformed("nope"))
            } else {
                Ok(scenario_text())
            }
        });
        let store = Arc::new(MemoryStore::new());
        let mut game = game_with(mock, store.clone()).await;

        game.start_game().await;
        let state = game.decide(TrackId::TrackB).await.unwrap();
        assert_eq!(state.phase(), Phase::Error);
        assert!(state.history().is_empty());
        assert!(store.raw().await.is_none());
    }

    #[tokio::test]
    async fn test_decide_without_scenario_is_noop() {
        let mut mock = MockGenerativeBackend::new();
        mock.expect_generate().never();
        let mut game = game_with(mock, Arc::new(MemoryStore::new())).await;

        let state = game.decide(TrackId::TrackA).await.unwrap();
        assert_eq!(state.phase(), Phase::Idle);
    }

    #[tokio::test]
    async fn test_clear_history_empties_store() {
        let store = Arc::new(MemoryStore::new());
        let mut game = game_with(scripted_backend(), store.clone()).await;
        game.start_game().await;
        game.decide(TrackId::TrackA).await.unwrap();

        game.clear_history().await.unwrap();
        assert!(game.history().is_empty());
        assert!(store.load_history().await.unwrap().is_empty());
        assert_eq!(store.raw().await.as_deref(), Some("[]"));
    }

    #[tokio::test]
    async fn test_round_keeps_difficulty_it_was_generated_at() {
        let store = Arc::new(MemoryStore::new());
        let mut game = game_with(scripted_backend(), store.clone()).await;

        game.select_difficulty(Difficulty::Easy);
        game.start_game().await;
        game.select_difficulty(Difficulty::Chaos);
        game.decide(TrackId::TrackA).await.unwrap();

        assert_eq!(game.history()[0].difficulty, Difficulty::Easy);
        assert_eq!(
            store.load_history().await.unwrap()[0].difficulty,
            Difficulty::Easy
        );
    }

    #[tokio::test]
    async fn test_retry_after_generation_failure() {
        let mut mock = MockGenerativeBackend::new();
        let mut calls = 0;
        mock.expect_generate().times(2).returning(move |_| {
            calls += 1;
            if calls == 1 {
                Err(BackendError::Timeout { timeout_ms: 10 })
            } else {
                Ok(scenario_text())
            }
        });
        let mut game = game_with(mock, Arc::new(MemoryStore::new())).await;

        assert_eq!(game.start_game().await.phase(), Phase::Error);

        let state = game.start_game().await;
        assert_eq!(state.phase(), Phase::Playing);
        assert!(state.error_message().is_none());
        assert_eq!(state.scenario().unwrap().title, "Bridge of Sighs");
    }

    #[tokio::test]
    async fn test_abandoned_round_cannot_be_decided() {
        let mut mock = MockGenerativeBackend::new();
        mock.expect_generate()
            .withf(|req| !req.prompt.contains("User's choice"))
            .times(1)
            .returning(|_| Ok(scenario_text()));
        let store = Arc::new(MemoryStore::new());
        let mut game = game_with(mock, store.clone()).await;

        game.start_game().await;
        game.show_history();

        let state = game.decide(TrackId::TrackB).await.unwrap();
        assert_eq!(state.phase(), Phase::History);
        assert!(game.history().is_empty());
        assert!(store.raw().await.is_none());
    }

    #[tokio::test]
    async fn test_failed_save_keeps_round_until_next_save() {
        let mut store = MockHistoryStore::new();
        store.expect_load_history().returning(|| Ok(Vec::new()));
        store
            .expect_save_history()
            .withf(|items| items.len() == 1)
            .times(1)
            .returning(|_| {
                Err(StorageError::Query {
                    message: "disk full".to_string(),
                })
            });
        store
            .expect_save_history()
            .withf(|items| items.len() == 2)
            .times(1)
            .returning(|_| Ok(()));
        let mut game = game_with(scripted_backend(), Arc::new(store)).await;

        game.start_game().await;
        let err = game.decide(TrackId::TrackA).await.unwrap_err();
        assert!(matches!(err, StorageError::Query { .. }));
        assert_eq!(game.state().phase(), Phase::Result);
        assert_eq!(game.history().len(), 1);

        game.start_game().await;
        assert!(game.decide(TrackId::TrackB).await.is_ok());
        assert_eq!(game.history().len(), 2);
    }
}
