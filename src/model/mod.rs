//! Game data model: scenarios, tracks, analyses and history records.
//!
//! Field names serialize in camelCase so persisted history and backend
//! payloads share one JSON vocabulary.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Category of whatever is tied to a track.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum VictimType {
    /// People (the common case).
    #[default]
    Human,
    /// Pets, livestock, rare species.
    Animal,
    /// Robots, servers, synthetic minds.
    Robot,
    /// Rare plants, sacred trees.
    Plant,
    /// Artifacts, data, food and other things.
    Object,
}

impl VictimType {
    /// All variants, in schema order.
    pub const ALL: [VictimType; 5] = [
        VictimType::Human,
        VictimType::Animal,
        VictimType::Robot,
        VictimType::Plant,
        VictimType::Object,
    ];

    /// Wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            VictimType::Human => "HUMAN",
            VictimType::Animal => "ANIMAL",
            VictimType::Robot => "ROBOT",
            VictimType::Plant => "PLANT",
            VictimType::Object => "OBJECT",
        }
    }
}

impl std::fmt::Display for VictimType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for VictimType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "HUMAN" => Ok(VictimType::Human),
            "ANIMAL" => Ok(VictimType::Animal),
            "ROBOT" => Ok(VictimType::Robot),
            "PLANT" => Ok(VictimType::Plant),
            "OBJECT" => Ok(VictimType::Object),
            _ => Err(format!("Unknown victim type: {}", s)),
        }
    }
}

/// Which branch of the dilemma.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrackId {
    /// Default branch: the lever is left alone.
    #[serde(rename = "track_a")]
    TrackA,
    /// Intervention branch: the lever is pulled.
    #[serde(rename = "track_b")]
    TrackB,
}

impl TrackId {
    /// Wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            TrackId::TrackA => "track_a",
            TrackId::TrackB => "track_b",
        }
    }

    /// Human-readable action that leads to this track.
    pub fn action(&self) -> &'static str {
        match self {
            TrackId::TrackA => "no intervention",
            TrackId::TrackB => "intervention",
        }
    }

    /// The other track.
    pub fn other(&self) -> TrackId {
        match self {
            TrackId::TrackA => TrackId::TrackB,
            TrackId::TrackB => TrackId::TrackA,
        }
    }
}

impl std::fmt::Display for TrackId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for TrackId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "track_a" | "a" | "wait" => Ok(TrackId::TrackA),
            "track_b" | "b" | "pull" => Ok(TrackId::TrackB),
            _ => Err(format!("Unknown track: {}", s)),
        }
    }
}

/// Difficulty tier, ordered by escalating ambiguity.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum Difficulty {
    /// Clear numbers, obvious stakes.
    Easy,
    /// Some moral weight on each side.
    #[default]
    Medium,
    /// Competing duties, no clean answer.
    Hard,
    /// Painful trade-offs.
    Extreme,
    /// Absurd or surreal dilemmas.
    Chaos,
}

impl Difficulty {
    /// All tiers from mildest to wildest.
    pub const ALL: [Difficulty; 5] = [
        Difficulty::Easy,
        Difficulty::Medium,
        Difficulty::Hard,
        Difficulty::Extreme,
        Difficulty::Chaos,
    ];

    /// Wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "EASY",
            Difficulty::Medium => "MEDIUM",
            Difficulty::Hard => "HARD",
            Difficulty::Extreme => "EXTREME",
            Difficulty::Chaos => "CHAOS",
        }
    }

    /// Whether this is the top tier.
    pub fn is_most_extreme(&self) -> bool {
        *self == Difficulty::Chaos
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "EASY" => Ok(Difficulty::Easy),
            "MEDIUM" => Ok(Difficulty::Medium),
            "HARD" => Ok(Difficulty::Hard),
            "EXTREME" => Ok(Difficulty::Extreme),
            "CHAOS" => Ok(Difficulty::Chaos),
            _ => Err(format!("Unknown difficulty: {}", s)),
        }
    }
}

/// One of the two consequences in a scenario.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackOption {
    /// Detailed description of who or what is on the track.
    pub description: String,
    /// Short display label, e.g. "5 tired doctors".
    pub summary: String,
    /// Estimated number of affected entities.
    pub victim_count: u32,
    /// Track name.
    pub label: String,
    /// What kind of entity is on the track.
    #[serde(default)]
    pub victim_type: VictimType,
    /// Always matches the slot the option sits in.
    pub id: TrackId,
}

/// One generated two-branch dilemma.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scenario {
    /// Unique id assigned on receipt.
    pub id: String,
    /// Short headline.
    pub title: String,
    /// Setup narrative.
    pub context: String,
    /// Where the trolley goes if nobody acts.
    pub track_a: TrackOption,
    /// Where the trolley goes if the lever is pulled.
    pub track_b: TrackOption,
}

impl Scenario {
    /// The option sitting on the given track.
    pub fn track(&self, id: TrackId) -> &TrackOption {
        match id {
            TrackId::TrackA => &self.track_a,
            TrackId::TrackB => &self.track_b,
        }
    }
}

/// Judgement of a user's decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    /// Utilitarian vs. deontological reading of the choice.
    pub philosophical_perspective: String,
    /// Psychological-motive narrative relating the choice to classic cases.
    pub similarity_to_classics: String,
    /// How people worldwide would tend to choose.
    pub global_comparison: String,
    /// Most relevant first.
    pub tags: Vec<String>,
    /// What a simulated judge would have picked. May differ from the user.
    pub ai_choice: TrackId,
    /// Why the judge picked `ai_choice`.
    pub ai_reasoning: String,
}

impl AnalysisResult {
    /// Whether the simulated judge picked the same track.
    pub fn agrees_with(&self, choice: TrackId) -> bool {
        self.ai_choice == choice
    }
}

/// Persisted record of one completed round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryItem {
    /// Unique record id.
    pub id: String,
    /// When the round completed; stored as epoch milliseconds.
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
    /// The scenario played.
    pub scenario: Scenario,
    /// Track the user picked.
    pub user_choice: TrackId,
    /// Analysis of the decision.
    pub analysis: AnalysisResult,
    /// Difficulty the scenario was generated at.
    pub difficulty: Difficulty,
}

impl HistoryItem {
    /// Record a completed round with a fresh id.
    pub fn new(
        scenario: Scenario,
        user_choice: TrackId,
        analysis: AnalysisResult,
        difficulty: Difficulty,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            timestamp,
            scenario,
            user_choice,
            analysis,
            difficulty,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn sample_track(id: TrackId) -> TrackOption {
        TrackOption {
            description: "a sleeping clown holding a balloon".to_string(),
            summary: "1 clown".to_string(),
            victim_count: 1,
            label: "Main line".to_string(),
            victim_type: VictimType::Human,
            id,
        }
    }

    fn sample_scenario() -> Scenario {
        Scenario {
            id: "scn-1".to_string(),
            title: "The Circus Junction".to_string(),
            context: "A runaway tram approaches the big top.".to_string(),
            track_a: sample_track(TrackId::TrackA),
            track_b: sample_track(TrackId::TrackB),
        }
    }

    #[test]
    fn test_track_id_wire_format() {
        assert_eq!(serde_json::to_value(TrackId::TrackA).unwrap(), json!("track_a"));
        assert_eq!(serde_json::to_value(TrackId::TrackB).unwrap(), json!("track_b"));
        assert!(serde_json::from_value::<TrackId>(json!("track_c")).is_err());
    }

    #[test]
    fn test_track_id_from_str_accepts_shortcuts() {
        assert_eq!("a".parse::<TrackId>().unwrap(), TrackId::TrackA);
        assert_eq!(" Pull ".parse::<TrackId>().unwrap(), TrackId::TrackB);
        assert_eq!("track_b".parse::<TrackId>().unwrap(), TrackId::TrackB);
        assert!("left".parse::<TrackId>().is_err());
    }

    #[test]
    fn test_track_id_action_text() {
        assert_eq!(TrackId::TrackA.action(), "no intervention");
        assert_eq!(TrackId::TrackB.action(), "intervention");
        assert_eq!(TrackId::TrackA.other(), TrackId::TrackB);
    }

    #[test]
    fn test_difficulty_ordering() {
        assert!(Difficulty::Easy < Difficulty::Medium);
        assert!(Difficulty::Extreme < Difficulty::Chaos);
        assert_eq!(Difficulty::ALL.iter().max(), Some(&Difficulty::Chaos));
        assert!(Difficulty::Chaos.is_most_extreme());
        assert!(!Difficulty::Extreme.is_most_extreme());
        assert_eq!(Difficulty::default(), Difficulty::Medium);
    }

    #[test]
    fn test_difficulty_from_str() {
        assert_eq!("chaos".parse::<Difficulty>().unwrap(), Difficulty::Chaos);
        assert_eq!("HARD".parse::<Difficulty>().unwrap(), Difficulty::Hard);
        assert!("nightmare".parse::<Difficulty>().is_err());
    }

    #[test]
    fn test_victim_type_defaults_to_human_when_absent() {
        let track: TrackOption = serde_json::from_value(json!({
            "description": "d",
            "summary": "s",
            "victimCount": 2,
            "label": "L",
            "id": "track_b"
        }))
        .unwrap();
        assert_eq!(track.victim_type, VictimType::Human);
        assert_eq!(track.id, TrackId::TrackB);
    }

    #[test]
    fn test_scenario_serializes_camel_case() {
        let value = serde_json::to_value(sample_scenario()).unwrap();
        assert!(value.get("trackA").is_some());
        assert_eq!(value["trackB"]["victimCount"], json!(1));
        assert_eq!(value["trackB"]["victimType"], json!("HUMAN"));
        assert_eq!(value["trackB"]["id"], json!("track_b"));
    }

    #[test]
    fn test_scenario_track_lookup() {
        let scenario = sample_scenario();
        assert_eq!(scenario.track(TrackId::TrackB).id, TrackId::TrackB);
        assert_eq!(scenario.track(TrackId::TrackA).id, TrackId::TrackA);
    }

    #[test]
    fn test_history_item_timestamp_is_epoch_millis() {
        let analysis = AnalysisResult {
            philosophical_perspective: "p".to_string(),
            similarity_to_classics: "s".to_string(),
            global_comparison: "g".to_string(),
            tags: vec!["Utilitarian".to_string()],
            ai_choice: TrackId::TrackB,
            ai_reasoning: "r".to_string(),
        };
        let timestamp = DateTime::from_timestamp_millis(1_700_000_000_123).unwrap();
        let item = HistoryItem::new(
            sample_scenario(),
            TrackId::TrackA,
            analysis,
            Difficulty::Hard,
            timestamp,
        );

        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(value["timestamp"], json!(1_700_000_000_123_i64));
        assert_eq!(value["userChoice"], json!("track_a"));
        assert_eq!(value["difficulty"], json!("HARD"));

        let back: HistoryItem = serde_json::from_value(value).unwrap();
        assert_eq!(back, item);
        assert!(!back.analysis.agrees_with(TrackId::TrackA));
    }
}
