use thiserror::Error;

/// Errors raised by the sequencing state machines.
///
/// Both classes point at a caller or configuration bug, never at a runtime
/// fault; nothing in the sequencing core performs I/O.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SequenceError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("invalid state: {0}")]
    InvalidState(String),
}

impl SequenceError {
    pub(crate) fn input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    pub(crate) fn state(message: impl Into<String>) -> Self {
        Self::InvalidState(message.into())
    }

    #[must_use]
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidInput(_))
    }

    #[must_use]
    pub fn is_invalid_state(&self) -> bool {
        matches!(self, Self::InvalidState(_))
    }
}
