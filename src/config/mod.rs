use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::AppError;
use crate::retry::{DEFAULT_MAX_ATTEMPTS, DEFAULT_RETRY_DELAY_MS};

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Gemini API settings.
    pub gemini: GeminiConfig,
    /// History database settings.
    pub database: DatabaseConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
    /// HTTP timeout and retry settings.
    pub request: RequestConfig,
    /// Game content settings.
    pub game: GameConfig,
}

/// Gemini API configuration
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// API key sent as the `x-goog-api-key` header.
    pub api_key: String,
    /// Base URL of the API, without a trailing path.
    pub base_url: String,
    /// Model name, e.g. `gemini-2.5-flash`.
    pub model: String,
}

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file.
    pub path: PathBuf,
    /// Maximum pool connections.
    pub max_connections: u32,
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Default filter level when `RUST_LOG` is unset.
    pub level: String,
    /// Output format.
    pub format: LogFormat,
}

/// Log output format
#[derive(Debug, Clone, PartialEq)]
pub enum LogFormat {
    /// Human-readable output.
    Pretty,
    /// One JSON object per line.
    Json,
}

/// HTTP request and retry configuration
#[derive(Debug, Clone)]
pub struct RequestConfig {
    /// Per-request timeout in milliseconds. Never zero.
    pub timeout_ms: u64,
    /// Total attempts per operation, first call included.
    pub max_attempts: u32,
    /// Flat delay between attempts in milliseconds.
    pub retry_delay_ms: u64,
}

/// What a client does once its retry budget is spent
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Surface a typed error to the caller.
    #[default]
    Raise,
    /// Substitute the canned fallback payload.
    Fallback,
}

/// Game content configuration
#[derive(Debug, Clone)]
pub struct GameConfig {
    /// Behavior once a client's retries are exhausted.
    pub failure_policy: FailurePolicy,
    /// Language the model is asked to write in.
    pub output_language: String,
}

/// Default Gemini API base URL.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
/// Default Gemini model.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, AppError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let api_key = env::var("GEMINI_API_KEY")
            .or_else(|_| env::var("API_KEY"))
            .map_err(|_| AppError::Config {
                message: "GEMINI_API_KEY is required".to_string(),
            })?;

        let gemini = GeminiConfig {
            api_key,
            base_url: env::var("GEMINI_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            model: env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
        };

        let database = DatabaseConfig {
            path: PathBuf::from(
                env::var("DATABASE_PATH").unwrap_or_else(|_| "./data/moral_tracks.db".to_string()),
            ),
            max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(5),
        };

        let logging = LoggingConfig {
            level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            format: match env::var("LOG_FORMAT")
                .unwrap_or_else(|_| "pretty".to_string())
                .to_lowercase()
                .as_str()
            {
                "json" => LogFormat::Json,
                _ => LogFormat::Pretty,
            },
        };

        let request = RequestConfig {
            timeout_ms: env::var("REQUEST_TIMEOUT_MS")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|n: &u64| *n > 0)
                .unwrap_or(30000),
            max_attempts: env::var("MAX_ATTEMPTS")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|n: &u32| *n > 0)
                .unwrap_or(DEFAULT_MAX_ATTEMPTS),
            retry_delay_ms: env::var("RETRY_DELAY_MS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_RETRY_DELAY_MS),
        };

        let game = GameConfig {
            failure_policy: match env::var("FAILURE_POLICY") {
                Ok(value) if !value.trim().is_empty() => {
                    value.parse().map_err(|message| AppError::Config { message })?
                }
                _ => FailurePolicy::default(),
            },
            output_language: env::var("OUTPUT_LANGUAGE")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| "English".to_string()),
        };

        Ok(Config {
            gemini,
            database,
            logging,
            request,
            game,
        })
    }
}

impl FromStr for FailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "raise" => Ok(FailurePolicy::Raise),
            "fallback" => Ok(FailurePolicy::Fallback),
            other => Err(format!(
                "FAILURE_POLICY must be 'raise' or 'fallback', got '{}'",
                other
            )),
        }
    }
}

impl Default for RequestConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 30000,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            retry_delay_ms: DEFAULT_RETRY_DELAY_MS,
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            failure_policy: FailurePolicy::default(),
            output_language: "English".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_config_default_uses_retry_constants() {
        let config = RequestConfig::default();
        assert_eq!(config.max_attempts, DEFAULT_MAX_ATTEMPTS);
        assert_eq!(config.retry_delay_ms, DEFAULT_RETRY_DELAY_MS);
        assert_eq!(config.timeout_ms, 30000);
    }

    #[test]
    fn test_failure_policy_from_str() {
        assert_eq!("Fallback".parse(), Ok(FailurePolicy::Fallback));
        assert_eq!(" raise ".parse(), Ok(FailurePolicy::Raise));

        let err = "fallbak".parse::<FailurePolicy>().unwrap_err();
        assert!(err.contains("fallbak"));
    }

    #[test]
    fn test_failure_policy_defaults_to_raise() {
        assert_eq!(FailurePolicy::default(), FailurePolicy::Raise);
        assert_eq!(GameConfig::default().failure_policy, FailurePolicy::Raise);
    }
}
