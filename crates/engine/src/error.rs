/// Errors raised while building or talking to the engine.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] serde_json::Error),

    #[error("Engine driver stopped")]
    DriverStopped,
}

/// Result alias for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;
