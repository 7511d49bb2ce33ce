//! Error types for configuration, engine mutation and the runner thread.

use thiserror::Error;

/// Rejected configuration values, reported when an engine is constructed.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("`{field}` must be positive (got {value})")]
    NonPositive { field: &'static str, value: f64 },
    #[error("`{field}` must not be negative (got {value})")]
    Negative { field: &'static str, value: f64 },
    #[error("`{field}` must be finite")]
    NotFinite { field: &'static str },
    #[error("configuration produces a grid without cells")]
    EmptyGrid,
    #[error("`region_index_bucket` must be at least one cell")]
    ZeroBucket,
    #[error("malformed configuration: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors raised by explicit engine operations.
#[derive(Debug, Error)]
pub enum SimError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("no territory cell at ({x}, {y})")]
    NoCell { x: i64, y: i64 },
    #[error("unknown turret {0}")]
    UnknownTurret(u32),
}

/// Errors raised while starting or stopping the simulation thread.
#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("simulation thread is already running")]
    AlreadyRunning,
    #[error("simulation thread is not running")]
    NotRunning,
    #[error("failed to spawn simulation thread: {0}")]
    Spawn(#[from] std::io::Error),
    #[error("simulation thread panicked")]
    Panicked,
}
