use thiserror::Error;

#[derive(Debug, Error)]
#[error(transparent)]
pub struct Error(Box<ErrorKind>);

impl Error {
    pub fn kind(&self) -> &ErrorKind {
        self.0.as_ref()
    }

    pub fn into_kind(self) -> ErrorKind {
        *self.0
    }

    pub fn invalid_arg(name: impl Into<String>, message: impl Into<String>) -> Error {
        Error(
            ErrorKind::InvalidArgument {
                name: name.into(),
                message: message.into(),
            }
            .into(),
        )
    }

    /// A write was pushed at `position`, before the end of the previously
    /// pending write.
    pub fn order_violation(position: impl Into<String>, previous_end: impl Into<String>) -> Error {
        Error(
            ErrorKind::OrderViolation {
                position: position.into(),
                previous_end: previous_end.into(),
            }
            .into(),
        )
    }

    pub fn invalid_range(begin: impl Into<String>, end: impl Into<String>) -> Error {
        Error(
            ErrorKind::InvalidRange {
                begin: begin.into(),
                end: end.into(),
            }
            .into(),
        )
    }

    pub fn misaligned(position: impl Into<String>, discretization: impl Into<String>) -> Error {
        Error(
            ErrorKind::Misaligned {
                position: position.into(),
                discretization: discretization.into(),
            }
            .into(),
        )
    }

    pub fn invalid_state(state: impl Into<String>, operation: impl Into<String>) -> Error {
        Error(
            ErrorKind::InvalidState {
                state: state.into(),
                operation: operation.into(),
            }
            .into(),
        )
    }

    pub fn unbounded(operation: impl Into<String>) -> Error {
        Error(
            ErrorKind::Unbounded {
                operation: operation.into(),
            }
            .into(),
        )
    }

    pub fn is_order_violation(&self) -> bool {
        matches!(self.kind(), ErrorKind::OrderViolation { .. })
    }

    pub fn is_invalid_range(&self) -> bool {
        matches!(self.kind(), ErrorKind::InvalidRange { .. })
    }

    pub fn is_misaligned(&self) -> bool {
        matches!(self.kind(), ErrorKind::Misaligned { .. })
    }

    pub fn is_invalid_state(&self) -> bool {
        matches!(self.kind(), ErrorKind::InvalidState { .. })
    }

    pub fn is_unbounded(&self) -> bool {
        matches!(self.kind(), ErrorKind::Unbounded { .. })
    }
}

#[derive(Debug, Error)]
pub enum ErrorKind {
    #[error("invalid argument {name}: {message}")]
    InvalidArgument { name: String, message: String },

    #[error("out of order write at {position}: previous write ends at {previous_end}")]
    OrderViolation {
        position: String,
        previous_end: String,
    },

    #[error("invalid range [{begin}, {end})")]
    InvalidRange { begin: String, end: String },

    #[error("position {position} is not aligned to discretization {discretization}")]
    Misaligned {
        position: String,
        discretization: String,
    },

    #[error("cannot {operation}: inserter is {state}")]
    InvalidState { state: String, operation: String },

    #[error("{operation} requires a bounded extent")]
    Unbounded { operation: String },
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Error(kind.into())
    }
}
