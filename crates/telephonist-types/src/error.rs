use thiserror::Error;

/// Errors from the LLM chat-completion client.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("provider error: {message}")]
    Provider { message: String },

    #[error("deserialization error: {0}")]
    Deserialization(String),

    #[error("rate limited")]
    RateLimited,

    #[error("authentication failed")]
    AuthenticationFailed,

    /// The reply is too short to hold the echoed priming fragment.
    #[error("reply of {reply_len} bytes cannot carry a {primer_len}-byte primer")]
    PrimerMismatch { primer_len: usize, reply_len: usize },
}

/// Errors from the batch translator.
#[derive(Debug, Error)]
pub enum TranslateError {
    #[error("nothing to translate")]
    EmptyInput,

    #[error("translator request failed: {0}")]
    Transport(String),

    #[error("translator responded with status {0}")]
    Status(u16),

    #[error("deserialization error: {0}")]
    Deserialization(String),

    #[error("translator returned {actual} texts for {expected} inputs")]
    LengthMismatch { expected: usize, actual: usize },
}

/// Errors from dialog store operations (used by trait definitions in telephonist-core).
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),

    #[error("dialog has no messages")]
    EmptyDialog,

    #[error("dialog has no id")]
    MissingId,

    #[error("dialog not found")]
    NotFound,
}

/// Errors while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {message}")]
    Read { path: String, message: String },

    #[error("failed to parse {path}: {message}")]
    Parse { path: String, message: String },
}
