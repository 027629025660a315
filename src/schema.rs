//! Output schemas sent to the generation backend, and the payload types the
//! returned JSON is checked against.
//!
//! The schemas use the backend's OpenAPI-style dialect (`OBJECT`, `STRING`,
//! `INTEGER`, `ARRAY`). Parsing is the enforcement point: a payload that does
//! not deserialize into the types below is a malformed response.

use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::{BackendError, BackendResult};
use crate::model::{AnalysisResult, TrackId, TrackOption, VictimType};

fn victim_type_enum() -> Vec<&'static str> {
    VictimType::ALL.iter().map(|v| v.as_str()).collect()
}

fn track_schema(description: &str) -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "description": {
                "type": "STRING",
                "description": description
            },
            "summary": {
                "type": "STRING",
                "description": "Very short summary (2-5 words), e.g. '1 furious clown'"
            },
            "victimCount": {
                "type": "INTEGER",
                "description": "Estimated number of victims"
            },
            "label": {
                "type": "STRING",
                "description": "Track label"
            },
            "victimType": {
                "type": "STRING",
                "enum": victim_type_enum(),
                "description": "Target category: HUMAN, ANIMAL, ROBOT, PLANT or OBJECT (objects and virtual things)"
            }
        },
        "required": ["description", "summary", "victimCount", "label", "victimType"]
    })
}

/// Schema for a generated scenario.
pub fn scenario_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "title": { "type": "STRING", "description": "Scenario title" },
            "context": { "type": "STRING", "description": "Background story, under 100 words" },
            "trackA": track_schema(
                "Detailed description of who is on the default track, including age, occupation and temperament"
            ),
            "trackB": track_schema(
                "Detailed description of who is on the track the lever diverts to"
            )
        },
        "required": ["title", "context", "trackA", "trackB"]
    })
}

/// Schema for a decision analysis.
pub fn analysis_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "philosophicalPerspective": { "type": "STRING" },
            "similarityToClassics": { "type": "STRING" },
            "globalComparison": { "type": "STRING" },
            "tags": { "type": "ARRAY", "items": { "type": "STRING" } },
            "aiChoice": {
                "type": "STRING",
                "enum": [TrackId::TrackA.as_str(), TrackId::TrackB.as_str()]
            },
            "aiReasoning": { "type": "STRING" }
        },
        "required": [
            "philosophicalPerspective",
            "similarityToClassics",
            "globalComparison",
            "tags",
            "aiChoice",
            "aiReasoning"
        ]
    })
}

/// Track as returned by the backend. Any `id` it sends is ignored.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackPayload {
    /// Who or what is on the track.
    pub description: String,
    /// Two-to-five word summary.
    pub summary: String,
    /// Estimated number of victims.
    pub victim_count: u32,
    /// Track label.
    pub label: String,
    /// Missing or `null` means [`VictimType::Human`].
    #[serde(default)]
    pub victim_type: Option<VictimType>,
}

impl TrackPayload {
    /// Pin the option to its slot.
    pub fn into_option(self, id: TrackId) -> TrackOption {
        TrackOption {
            description: self.description,
            summary: self.summary,
            victim_count: self.victim_count,
            label: self.label,
            victim_type: self.victim_type.unwrap_or_default(),
            id,
        }
    }
}

/// Scenario as returned by the backend, before normalization.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioPayload {
    /// Scenario title. Must not be blank.
    pub title: String,
    /// Background story.
    pub context: String,
    /// Default track, the lever left alone.
    pub track_a: TrackPayload,
    /// Track the lever diverts to.
    pub track_b: TrackPayload,
}

/// Drop a markdown code fence if the backend wrapped its JSON in one.
fn strip_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

/// Parse backend text into a scenario payload.
pub fn parse_scenario(text: &str) -> BackendResult<ScenarioPayload> {
    let payload: ScenarioPayload = serde_json::from_str(strip_fence(text))
        .map_err(|e| BackendError::malformed(format!("scenario: {}", e)))?;

    if payload.title.trim().is_empty() {
        return Err(BackendError::malformed("scenario: empty title"));
    }

    Ok(payload)
}

/// Parse backend text into an analysis. Unknown fields are ignored;
/// `aiChoice` outside the two tracks is rejected.
pub fn parse_analysis(text: &str) -> BackendResult<AnalysisResult> {
    serde_json::from_str(strip_fence(text))
        .map_err(|e| BackendError::malformed(format!("analysis: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BackendErrorKind;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_scenario_schema_requires_both_tracks() {
        let schema = scenario_schema();
        assert_eq!(schema["type"], "OBJECT");
        assert_eq!(
            schema["required"],
            json!(["title", "context", "trackA", "trackB"])
        );
        for slot in ["trackA", "trackB"] {
            let track = &schema["properties"][slot];
            assert_eq!(track["type"], "OBJECT");
            assert_eq!(
                track["properties"]["victimType"]["enum"],
                json!(["HUMAN", "ANIMAL", "ROBOT", "PLANT", "OBJECT"])
            );
            assert_eq!(track["required"].as_array().unwrap().len(), 5);
        }
    }

    #[test]
    fn test_analysis_schema_enumerates_ai_choice() {
        let schema = analysis_schema();
        assert_eq!(
            schema["properties"]["aiChoice"]["enum"],
            json!(["track_a", "track_b"])
        );
        assert_eq!(schema["properties"]["tags"]["type"], "ARRAY");
        assert_eq!(schema["required"].as_array().unwrap().len(), 6);
    }

    #[test]
    fn test_parse_scenario_ignores_backend_ids() {
        let text = r#"{
            "title": "T", "context": "C",
            "trackA": {"description":"d1","summary":"s1","victimCount":1,"label":"L1","victimType":"ANIMAL","id":"track_b"},
            "trackB": {"description":"d2","summary":"s2","victimCount":5,"label":"L2"}
        }"#;
        let payload = parse_scenario(text).unwrap();
        let a = payload.track_a.into_option(TrackId::TrackA);
        let b = payload.track_b.into_option(TrackId::TrackB);
        assert_eq!(a.id, TrackId::TrackA);
        assert_eq!(a.victim_type, VictimType::Animal);
        assert_eq!(b.id, TrackId::TrackB);
        assert_eq!(b.victim_type, VictimType::Human);
        assert_eq!(b.victim_count, 5);
    }

    #[test]
    fn test_parse_scenario_null_victim_type_is_human() {
        let text = r#"{
            "title": "T", "context": "C",
            "trackA": {"description":"d1","summary":"s1","victimCount":1,"label":"L1","victimType":null},
            "trackB": {"description":"d2","summary":"s2","victimCount":2,"label":"L2","victimType":"ROBOT"}
        }"#;
        let payload = parse_scenario(text).unwrap();
        assert_eq!(
            payload.track_a.into_option(TrackId::TrackA).victim_type,
            VictimType::Human
        );
        assert_eq!(
            payload.track_b.into_option(TrackId::TrackB).victim_type,
            VictimType::Robot
        );
    }

    #[test]
    fn test_parse_scenario_accepts_code_fence() {
        let text = "```json\n{\"title\":\"T\",\"context\":\"C\",\
            \"trackA\":{\"description\":\"d\",\"summary\":\"s\",\"victimCount\":0,\"label\":\"L\"},\
            \"trackB\":{\"description\":\"d\",\"summary\":\"s\",\"victimCount\":0,\"label\":\"L\"}}\n```";
        assert!(parse_scenario(text).is_ok());
    }

    #[test]
    fn test_parse_scenario_rejects_missing_track() {
        let err = parse_scenario(r#"{"title":"T","context":"C","trackA":{}}"#).unwrap_err();
        assert_eq!(err.kind(), BackendErrorKind::MalformedResponse);
    }

    #[test]
    fn test_parse_scenario_rejects_negative_count() {
        let text = r#"{"title":"T","context":"C",
            "trackA":{"description":"d","summary":"s","victimCount":-1,"label":"L"},
            "trackB":{"description":"d","summary":"s","victimCount":1,"label":"L"}}"#;
        assert!(parse_scenario(text).is_err());
    }

    #[test]
    fn test_parse_scenario_rejects_non_json() {
        let err = parse_scenario("Sorry, I cannot help with that.").unwrap_err();
        assert_eq!(err.kind(), BackendErrorKind::MalformedResponse);
    }

    #[test]
    fn test_parse_analysis_rejects_unknown_choice() {
        let text = r#"{"philosophicalPerspective":"p","similarityToClassics":"s",
            "globalComparison":"g","tags":[],"aiChoice":"track_c","aiReasoning":"r"}"#;
        assert!(parse_analysis(text).is_err());
    }

    #[test]
    fn test_parse_analysis_keeps_tag_order() {
        let text = r#"{"philosophicalPerspective":"p","similarityToClassics":"s",
            "globalComparison":"g","tags":["Deontology","Guilt","Numbers"],
            "aiChoice":"track_b","aiReasoning":"r","confidence":0.4}"#;
        let analysis = parse_analysis(text).unwrap();
        assert_eq!(analysis.tags, vec!["Deontology", "Guilt", "Numbers"]);
        assert_eq!(analysis.ai_choice, TrackId::TrackB);
    }
}
