use thiserror::Error;

/// Errors raised by the due-date scheduler before any date is computed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScheduleError {
    /// Scheduling parameters that would make the calendar walk meaningless
    /// (no working day, non-positive daily capacity).
    #[error("invalid scheduling configuration: {0}")]
    InvalidConfig(String),
}

impl ScheduleError {
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig(message.into())
    }
}

pub type ScheduleResult<T> = Result<T, ScheduleError>;
