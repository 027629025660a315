//! Command-line front end: subcommands and plain-text rendering.

use chrono::Local;
use clap::Subcommand;

use crate::model::{AnalysisResult, Difficulty, HistoryItem, Scenario, TrackId, TrackOption};

/// Top-level subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Play interactive rounds
    Play {
        /// Difficulty: EASY, MEDIUM, HARD, EXTREME or CHAOS
        #[arg(long, short, default_value_t = Difficulty::Medium)]
        difficulty: Difficulty,

        /// Number of rounds to play
        #[arg(long, default_value = "1")]
        rounds: u32,
    },

    /// Generate one scenario and print it as JSON
    Generate {
        /// Difficulty: EASY, MEDIUM, HARD, EXTREME or CHAOS
        #[arg(long, short, default_value_t = Difficulty::Medium)]
        difficulty: Difficulty,
    },

    /// List past rounds, most recent first
    History {
        /// Maximum number of rounds to show
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Delete every recorded round
    ClearHistory {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

const RULE: &str = "═══════════════════════════════════════════════════════════════════════════════";

fn render_track(out: &mut String, key: &str, heading: &str, track: &TrackOption) {
    out.push_str(&format!(
        "[{}] {} - {}: {} ({} x {})\n    {}\n",
        key,
        heading,
        track.label,
        track.summary,
        track.victim_count,
        track.victim_type,
        track.description
    ));
}

/// Scenario screen.
pub fn render_scenario(scenario: &Scenario, difficulty: Difficulty) -> String {
    let short_id: String = scenario.id.chars().take(8).collect();
    let mut out = String::new();

    out.push_str(&format!("\nID: {}  [{}]\n", short_id.to_uppercase(), difficulty));
    out.push_str(RULE);
    out.push('\n');
    out.push_str(&format!("{}\n\n{}\n\n", scenario.title, scenario.context));
    render_track(&mut out, "a", "Do nothing", &scenario.track_a);
    render_track(&mut out, "b", "Pull the lever", &scenario.track_b);
    out
}

/// Analysis screen.
pub fn render_analysis(analysis: &AnalysisResult, scenario: &Scenario, choice: TrackId) -> String {
    let mut out = String::new();

    out.push_str(&format!("\nYou chose: {} -> {}\n", choice.action(), scenario.track(choice).summary));
    out.push_str(RULE);
    out.push('\n');
    out.push_str(&format!("Perspective:  {}\n\n", analysis.philosophical_perspective));
    out.push_str(&format!("Motives:      {}\n\n", analysis.similarity_to_classics));
    out.push_str(&format!("Around world: {}\n\n", analysis.global_comparison));
    if !analysis.tags.is_empty() {
        out.push_str(&format!("Tags: {}\n\n", analysis.tags.join(" · ")));
    }

    let verdict = if analysis.agrees_with(choice) {
        "The AI would have done the same"
    } else {
        "The AI would have chosen differently"
    };
    out.push_str(&format!(
        "{}: {}\n    {}\n",
        verdict,
        analysis.ai_choice.action(),
        analysis.ai_reasoning
    ));
    out
}

/// Characters of the AI's reasoning quoted in the share text.
pub const SHARE_REASONING_CHARS: usize = 60;

/// Short shareable summary of a round.
pub fn render_share(analysis: &AnalysisResult, scenario: &Scenario, choice: TrackId) -> String {
    let action = match choice {
        TrackId::TrackA => "do nothing",
        TrackId::TrackB => "pull the lever",
    };
    let excerpt: String = analysis
        .ai_reasoning
        .chars()
        .take(SHARE_REASONING_CHARS)
        .collect();

    format!(
        "\n--- Share: Moral Tracks ---\n\
         I faced \"{}\" on the trolley tracks.\n\
         I chose to {}.\n\
         The AI thinks: {}...\n\n\
         Your turn?\n",
        scenario.title, action, excerpt
    )
}

/// History listing.
pub fn render_history(history: &[HistoryItem], limit: Option<usize>) -> String {
    if history.is_empty() {
        return "\nNo history yet. Go make some hard decisions; they will be kept here.\n"
            .to_string();
    }

    let mut out = String::new();
    out.push_str(&format!("\nDecision Archive ({} rounds)\n", history.len()));
    out.push_str(RULE);
    out.push('\n');

    for item in history.iter().take(limit.unwrap_or(usize::MAX)) {
        let when = item.timestamp.with_timezone(&Local).format("%b %d %H:%M");
        let agreed = if item.analysis.agrees_with(item.user_choice) {
            "AI agreed"
        } else {
            "AI disagreed"
        };
        out.push_str(&format!(
            "{}  [{}] {}\n    you: {} ({})  ·  {}\n",
            when,
            item.difficulty,
            item.scenario.title,
            item.user_choice.action(),
            item.scenario.track(item.user_choice).summary,
            agreed
        ));
    }
    out
}
