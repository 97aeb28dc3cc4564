//! Error types for the engine binary.
//!
//! [`EngineError`] covers every way startup or a replay can fail before the
//! interaction core takes over. Once the core is running nothing fails:
//! bad events are logged and ignored.

/// Top-level error for the engine binary.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading or validation failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: smashpad_core::config::ConfigError,
    },

    /// The input script could not be read.
    #[error("failed to read script: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// A script line is not a valid event.
    #[error("script line {line}: {source}")]
    Script {
        /// 1-based line number.
        line: usize,
        /// The underlying JSON error.
        source: serde_json::Error,
    },

    /// Bad command-line arguments.
    #[error("usage error: {message}")]
    Usage {
        /// Description of the problem.
        message: String,
    },
}
