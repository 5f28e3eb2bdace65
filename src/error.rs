use thiserror::Error;

/// Top-level error type for the cut-path geometry core.
///
/// Only invalid input supplied before processing starts is an error.
/// Degenerate geometry met during processing is reported through
/// [`crate::diagnostics::Warning`] instead.
#[derive(Debug, Error)]
pub enum CutpathError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Operation(#[from] OperationError),
}

/// Errors related to per-call configuration values.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} must be finite and positive, got {value}")]
    NonPositive { name: &'static str, value: f64 },

    #[error("{name} must be finite and non-negative, got {value}")]
    Negative { name: &'static str, value: f64 },

    #[error("offset distance must be finite, got {0}")]
    InvalidDistance(f64),

    #[error("self-intersection split depth must be at least 1")]
    ZeroSplitDepth,
}

/// Errors related to geometric construction.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("degenerate geometry: {0}")]
    Degenerate(String),

    #[error("non-finite coordinate in {0}")]
    NonFinite(&'static str),
}

/// Errors related to core operations.
#[derive(Debug, Error)]
pub enum OperationError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("{kind} shapes must be decomposed into lines and arcs before intersection")]
    NotDecomposed { kind: &'static str },
}

/// Convenience type alias for results using [`CutpathError`].
pub type Result<T> = std::result::Result<T, CutpathError>;
