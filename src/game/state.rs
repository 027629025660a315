use chrono::{DateTime, Utc};
use tracing::debug;

use crate::model::{AnalysisResult, Difficulty, HistoryItem, Scenario, TrackId};

/// Which screen the game is on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Phase {
    /// Welcome screen, difficulty selection.
    #[default]
    Idle,
    /// Waiting for a scenario.
    Generating,
    /// Scenario shown, waiting for the user's decision.
    Playing,
    /// Waiting for the analysis of the decision.
    Analyzing,
    /// Analysis shown.
    Result,
    /// A request failed; the user may retry.
    Error,
    /// Browsing past rounds.
    History,
}

impl Phase {
    /// Whether a backend request is in flight.
    pub fn is_busy(&self) -> bool {
        matches!(self, Phase::Generating | Phase::Analyzing)
    }
}

/// Handle for one in-flight request. Results carrying a ticket that no longer
/// matches the current interaction are discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

/// Whole application state. Transitions consume the state and return the
/// next one; nothing here performs I/O.
#[derive(Debug, Clone, Default)]
pub struct GameState {
    phase: Phase,
    difficulty: Difficulty,
    scenario_difficulty: Difficulty,
    scenario: Option<Scenario>,
    user_choice: Option<TrackId>,
    analysis: Option<AnalysisResult>,
    error_message: Option<String>,
    reviewing: bool,
    history: Vec<HistoryItem>,
    interaction: u64,
}

impl GameState {
    /// Start on the welcome screen with previously saved history.
    pub fn new(history: Vec<HistoryItem>) -> Self {
        Self {
            history,
            ..Self::default()
        }
    }

    /// Current screen.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Difficulty the next scenario will be generated at.
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    /// Difficulty the current (or in-flight) scenario was requested at.
    pub fn scenario_difficulty(&self) -> Difficulty {
        self.scenario_difficulty
    }

    /// Scenario of the current round, if one has arrived.
    pub fn scenario(&self) -> Option<&Scenario> {
        self.scenario.as_ref()
    }

    /// Track the user picked this round.
    pub fn user_choice(&self) -> Option<TrackId> {
        self.user_choice
    }

    /// Analysis of the current round, once it has arrived.
    pub fn analysis(&self) -> Option<&AnalysisResult> {
        self.analysis.as_ref()
    }

    /// User-facing message while in [`Phase::Error`].
    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    /// Whether the result screen is showing the scenario replay.
    pub fn is_reviewing(&self) -> bool {
        self.reviewing
    }

    /// Completed rounds, most recent first.
    pub fn history(&self) -> &[HistoryItem] {
        &self.history
    }

    fn next_ticket(&mut self) -> Ticket {
        self.interaction += 1;
        Ticket(self.interaction)
    }

    fn accepts(&self, ticket: Ticket, phase: Phase) -> bool {
        let current = ticket.0 == self.interaction && self.phase == phase;
        if !current {
            debug!(
                ticket = ticket.0,
                interaction = self.interaction,
                phase = ?self.phase,
                "Discarding stale result"
            );
        }
        current
    }

    /// Pick the difficulty for the next scenario. Ignored mid-round, that is
    /// while a request is in flight or a scenario awaits a decision.
    pub fn select_difficulty(mut self, difficulty: Difficulty) -> Self {
        if !self.phase.is_busy() && self.phase != Phase::Playing {
            self.difficulty = difficulty;
        }
        self
    }

    /// Start (or restart) a round.
    pub fn begin_generation(mut self) -> (Self, Ticket) {
        let ticket = self.next_ticket();
        self.scenario_difficulty = self.difficulty;
        self.phase = Phase::Generating;
        self.error_message = None;
        self.reviewing = false;
        (self, ticket)
    }

    /// A scenario arrived.
    pub fn scenario_ready(mut self, ticket: Ticket, scenario: Scenario) -> Self {
        if !self.accepts(ticket, Phase::Generating) {
            return self;
        }
        self.scenario = Some(scenario);
        self.user_choice = None;
        self.analysis = None;
        self.phase = Phase::Playing;
        self
    }

    /// Generation gave up.
    pub fn generation_failed(mut self, ticket: Ticket, message: impl Into<String>) -> Self {
        if !self.accepts(ticket, Phase::Generating) {
            return self;
        }
        self.error_message = Some(message.into());
        self.phase = Phase::Error;
        self
    }

    /// The user pulled (or left) the lever. Only valid while a scenario is
    /// being played; otherwise no ticket is issued.
    pub fn begin_analysis(mut self, choice: TrackId) -> (Self, Option<Ticket>) {
        if self.phase != Phase::Playing || self.scenario.is_none() {
            return (self, None);
        }
        let ticket = self.next_ticket();
        self.user_choice = Some(choice);
        self.phase = Phase::Analyzing;
        (self, Some(ticket))
    }

    /// The analysis arrived. Records the round at the front of the history
    /// and returns the new record.
    pub fn analysis_ready(
        mut self,
        ticket: Ticket,
        analysis: AnalysisResult,
        now: DateTime<Utc>,
    ) -> (Self, Option<HistoryItem>) {
        if !self.accepts(ticket, Phase::Analyzing) {
            return (self, None);
        }
        let (Some(scenario), Some(choice)) = (self.scenario.clone(), self.user_choice) else {
            return (self, None);
        };

        let item = HistoryItem::new(
            scenario,
            choice,
            analysis.clone(),
            self.scenario_difficulty,
            now,
        );
        self.history.insert(0, item.clone());
        self.analysis = Some(analysis);
        self.phase = Phase::Result;
        (self, Some(item))
    }

    /// Analysis gave up. Nothing is recorded.
    pub fn analysis_failed(mut self, ticket: Ticket, message: impl Into<String>) -> Self {
        if !self.accepts(ticket, Phase::Analyzing) {
            return self;
        }
        self.error_message = Some(message.into());
        self.phase = Phase::Error;
        self
    }

    /// Flip between the analysis and a read-only replay of the scenario.
    pub fn toggle_review(mut self) -> Self {
        if self.phase == Phase::Result {
            self.reviewing = !self.reviewing;
        }
        self
    }

    /// Open the history screen. Any in-flight result becomes stale.
    pub fn show_history(mut self) -> Self {
        self.next_ticket();
        self.phase = Phase::History;
        self
    }

    /// Back to the welcome screen. Any in-flight result becomes stale.
    pub fn go_home(mut self) -> Self {
        self.next_ticket();
        self.phase = Phase::Idle;
        self.reviewing = false;
        self
    }

    /// Drop every recorded round.
    pub fn clear_history(mut self) -> Self {
        self.history.clear();
        self
    }
}
