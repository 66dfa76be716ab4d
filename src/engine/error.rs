use thiserror::Error;

/// Failures raised by the month-table engine and the session around it.
/// None of them are fatal: callers report them and keep the last valid table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub(crate) enum EngineError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Not delivered days for {month} must be between 0 and {days}, got {value}")]
    OutOfRangeInput {
        month: String,
        value: i64,
        days: u32,
    },
    #[error("Persistence failure: {0}")]
    PersistenceFailure(String),
}

impl EngineError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub(crate) fn persistence(err: &anyhow::Error) -> Self {
        Self::PersistenceFailure(format!("{err:#}"))
    }
}

pub(crate) type EngineResult<T> = std::result::Result<T, EngineError>;
