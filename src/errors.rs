use thiserror::Error;

/// Errors surfaced by the decision engine.
///
/// Guard failures are not errors: they end up in `Decision::reasons`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("invalid preferences: {0}")]
    InvalidPreferences(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("unit allocation failed: {0}")]
    UnitAllocation(String),

    #[error("arithmetic overflow in {0}")]
    Overflow(&'static str),
}

pub type EngineResult<T> = Result<T, EngineError>;
