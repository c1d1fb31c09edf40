//! Error types for the sim binary.
//!
//! [`SimError`] wraps every failure mode of startup and the host loop so
//! `main` can propagate with `?`.

/// Top-level error for the sim binary.
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: blockquest_core::ConfigError,
    },

    /// The engine could not be built.
    #[error("engine error: {source}")]
    Engine {
        /// The underlying engine error.
        #[from]
        source: blockquest_core::EngineError,
    },

    /// Writing the save failed.
    #[error("store error: {source}")]
    Store {
        /// The underlying store error.
        #[from]
        source: blockquest_core::StoreError,
    },

    /// Rendering the snapshot failed.
    #[error("snapshot error: {source}")]
    Json {
        /// The underlying serializer error.
        #[from]
        source: serde_json::Error,
    },

    /// An environment setting could not be parsed.
    #[error("invalid setting {name}: {message}")]
    Setting {
        /// Environment variable name.
        name: &'static str,
        /// Description of the problem.
        message: String,
    },
}
