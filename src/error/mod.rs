use thiserror::Error;

/// Application-level errors
#[derive(Debug, Error)]
pub enum AppError {
    /// Missing or invalid configuration.
    #[error("Configuration error: {message}")]
    Config {
        /// What was wrong.
        message: String,
    },

    /// History could not be loaded or saved.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Scenario generation gave up.
    #[error("Generation error: {0}")]
    Generation(#[from] GenerationError),

    /// Decision analysis gave up.
    #[error("Analysis error: {0}")]
    Analysis(#[from] AnalysisError),

    /// Anything else.
    #[error("Internal error: {message}")]
    Internal {
        /// Error message.
        message: String,
    },
}

/// Storage layer errors
#[derive(Debug, Error)]
pub enum StorageError {
    /// Could not open the database.
    #[error("Database connection failed: {message}")]
    Connection {
        /// Error message.
        message: String,
    },

    /// A statement failed.
    #[error("Query failed: {message}")]
    Query {
        /// Error message.
        message: String,
    },

    /// Schema migration failed.
    #[error("Migration failed: {message}")]
    Migration {
        /// Error message.
        message: String,
    },

    /// History could not be encoded.
    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Error from the SQLx driver.
    #[error("SQLx error: {0}")]
    Sqlx(#[from] sqlx::Error),
}

/// Coarse classification of a backend failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendErrorKind {
    /// Request failed, was rejected, or timed out.
    NetworkOrBackend,
    /// Text came back but is not JSON of the declared shape.
    MalformedResponse,
    /// The backend returned no text at all.
    EmptyResponse,
}

/// Errors from a single call to the generation backend
#[derive(Debug, Error)]
pub enum BackendError {
    /// Non-success HTTP status.
    #[error("API error: {status} - {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Response body.
        message: String,
    },

    /// The request did not finish in time.
    #[error("Request timeout after {timeout_ms}ms")]
    Timeout {
        /// Configured timeout.
        timeout_ms: u64,
    },

    /// Transport failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response text did not match the declared schema.
    #[error("Malformed response: {message}")]
    MalformedResponse {
        /// What failed to parse.
        message: String,
    },

    /// No text in the response.
    #[error("Empty response from backend")]
    EmptyResponse,
}

impl BackendError {
    /// Classify this error. Every kind is retried the same way.
    pub fn kind(&self) -> BackendErrorKind {
        match self {
            BackendError::Api { .. } | BackendError::Timeout { .. } | BackendError::Http(_) => {
                BackendErrorKind::NetworkOrBackend
            }
            BackendError::MalformedResponse { .. } => BackendErrorKind::MalformedResponse,
            BackendError::EmptyResponse => BackendErrorKind::EmptyResponse,
        }
    }

    pub(crate) fn malformed(message: impl Into<String>) -> Self {
        BackendError::MalformedResponse {
            message: message.into(),
        }
    }
}

/// Scenario generation failed after the retry budget was spent
#[derive(Debug, Error)]
pub enum GenerationError {
    /// Every attempt failed.
    #[error("scenario generation failed after {attempts} attempts: {source}")]
    Exhausted {
        /// Attempts made.
        attempts: u32,
        /// Failure of the final attempt.
        #[source]
        source: BackendError,
    },
}

/// Decision analysis failed after the retry budget was spent
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// Every attempt failed.
    #[error("decision analysis failed after {attempts} attempts: {source}")]
    Exhausted {
        /// Attempts made.
        attempts: u32,
        /// Failure of the final attempt.
        #[source]
        source: BackendError,
    },
}

impl GenerationError {
    /// The failure of the final attempt.
    pub fn last_error(&self) -> &BackendError {
        match self {
            GenerationError::Exhausted { source, .. } => source,
        }
    }
}

impl AnalysisError {
    /// The failure of the final attempt.
    pub fn last_error(&self) -> &BackendError {
        match self {
            AnalysisError::Exhausted { source, .. } => source,
        }
    }
}

/// Result type alias for application errors
pub type AppResult<T> = Result<T, AppError>;

/// Result type alias for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Result type alias for backend calls
pub type BackendResult<T> = Result<T, BackendError>;
