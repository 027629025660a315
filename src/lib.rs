//! # Moral Tracks
//!
//! A trolley-problem generator. Scenarios and decision analyses are produced
//! by a generative-AI backend under a strict output schema; this crate builds
//! the prompts, checks and normalizes what comes back, retries failed calls
//! and keeps a durable history of played rounds.
//!
//! ## Architecture
//!
//! ```text
//! Front end (CLI) → Game (state machine) → ScenarioGenerator / DecisionAnalyzer
//!                        ↓                          ↓ retry + fallback
//!                  HistoryStore (SQLite)     GenerativeBackend (Gemini HTTP)
//! ```
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use moral_tracks::{Config, DecisionAnalyzer, ScenarioGenerator};
//! use moral_tracks::gemini::GeminiClient;
//! use moral_tracks::model::{Difficulty, TrackId};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_env()?;
//!     let backend = Arc::new(GeminiClient::new(&config.gemini, &config.request)?);
//!     let generator = ScenarioGenerator::from_config(backend.clone(), &config);
//!     let analyzer = DecisionAnalyzer::from_config(backend, &config);
//!
//!     let scenario = generator.generate_scenario(Difficulty::Hard).await?;
//!     let analysis = analyzer.analyze_decision(&scenario, TrackId::TrackB).await?;
//!     println!("{}", analysis.ai_reasoning);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]

/// Decision analysis client.
pub mod analysis;
/// Capability interface over the generation backend.
pub mod backend;
/// Command-line subcommands and text rendering.
pub mod cli;
/// Configuration management.
pub mod config;
/// Error types and result aliases for the application.
pub mod error;
/// Canned payloads used when the backend stays unreachable.
pub mod fallback;
/// Application state machine and session orchestration.
pub mod game;
/// Gemini API client and types.
pub mod gemini;
/// Game data model.
pub mod model;
/// Prompt construction.
pub mod prompts;
/// Bounded retry with a flat delay.
pub mod retry;
/// Scenario generation client.
pub mod scenario;
/// Output schemas and payload validation.
pub mod schema;
/// History persistence.
pub mod storage;

pub use analysis::DecisionAnalyzer;
pub use config::Config;
pub use error::{AppError, AppResult};
pub use scenario::ScenarioGenerator;
