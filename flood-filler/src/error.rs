use thiserror::Error;

/// Errors the engine can hand back to a caller.
///
/// Running out of paths or out of roomy candidates is not an error, those come back as `None`
/// or empty results and the selector branches on them.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("{0:?} is not one of up, down, left or right")]
    InvalidDirection(String),
    #[error("move oracle unavailable: {0}")]
    OracleUnavailable(String),
}
