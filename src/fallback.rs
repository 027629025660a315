//! Canned payloads substituted when the backend stays unreachable and the
//! failure policy is [`FailurePolicy::Fallback`](crate::config::FailurePolicy).
//!
//! The text is fixed and deterministic so callers and tests can compare it
//! verbatim.

use crate::model::{AnalysisResult, Scenario, TrackId, TrackOption, VictimType};

/// Id carried by the fallback scenario in place of a generated one.
pub const FALLBACK_SCENARIO_ID: &str = "fallback-connection-lost";

const FALLBACK_TITLE: &str = "Connection Lost";
const FALLBACK_CONTEXT: &str = "The switchyard's link to the moral-dilemma server has gone dark. \
A tram idles on the tracks while the signal lamps blink an error code nobody can read.";

const FALLBACK_TRACK_A_DESCRIPTION: &str =
    "Do nothing and wait indefinitely for the connection to come back.";
const FALLBACK_TRACK_A_SUMMARY: &str = "Wait indefinitely";
const FALLBACK_TRACK_A_LABEL: &str = "Wait";

const FALLBACK_TRACK_B_DESCRIPTION: &str =
    "Pull the lever and reload, sacrificing the loading spinner robot.";
const FALLBACK_TRACK_B_SUMMARY: &str = "Reload";
const FALLBACK_TRACK_B_LABEL: &str = "Reload";

const FALLBACK_PERSPECTIVE: &str =
    "The analysis engine could not be reached, so no philosophical reading is available.";
const FALLBACK_SIMILARITY: &str =
    "Without a connection there is nothing to compare this choice against.";
const FALLBACK_COMPARISON: &str = "Global comparison data is unavailable.";
const FALLBACK_REASONING: &str =
    "Insufficient information: when nothing is known, the safest course is inaction.";
const FALLBACK_TAGS: [&str; 2] = ["Error", "Glitch"];

/// Scenario shown when generation keeps failing.
pub fn fallback_scenario() -> Scenario {
    Scenario {
        id: FALLBACK_SCENARIO_ID.to_string(),
        title: FALLBACK_TITLE.to_string(),
        context: FALLBACK_CONTEXT.to_string(),
        track_a: TrackOption {
            description: FALLBACK_TRACK_A_DESCRIPTION.to_string(),
            summary: FALLBACK_TRACK_A_SUMMARY.to_string(),
            victim_count: 1,
            label: FALLBACK_TRACK_A_LABEL.to_string(),
            victim_type: VictimType::Object,
            id: TrackId::TrackA,
        },
        track_b: TrackOption {
            description: FALLBACK_TRACK_B_DESCRIPTION.to_string(),
            summary: FALLBACK_TRACK_B_SUMMARY.to_string(),
            victim_count: 0,
            label: FALLBACK_TRACK_B_LABEL.to_string(),
            victim_type: VictimType::Robot,
            id: TrackId::TrackB,
        },
    }
}

/// Analysis reported when analysis keeps failing. Always picks track A.
pub fn fallback_analysis() -> AnalysisResult {
    AnalysisResult {
        philosophical_perspective: FALLBACK_PERSPECTIVE.to_string(),
        similarity_to_classics: FALLBACK_SIMILARITY.to_string(),
        global_comparison: FALLBACK_COMPARISON.to_string(),
        tags: FALLBACK_TAGS.iter().map(|t| t.to_string()).collect(),
        ai_choice: TrackId::TrackA,
        ai_reasoning: FALLBACK_REASONING.to_string(),
    }
}
