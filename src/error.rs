use std::fmt;

/// The main error type for facility operations.
///
/// Variants correspond to the error kinds the engine can report. Business
/// conditions (capacity full, already parked, no plan to renew) are always
/// returned as values, never panicked.
#[derive(Debug, thiserror::Error)]
pub enum FacilityError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Capacity exhausted: {0}")]
    CapacityExhausted(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unavailable: {0}")]
    Unavailable(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

impl FacilityError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn capacity_exhausted(msg: impl Into<String>) -> Self {
        Self::CapacityExhausted(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Check if this error was caused by the caller (bad input or a state
    /// conflict the caller can resolve by calling a different operation).
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::Validation(_)
                | Self::Conflict(_)
                | Self::CapacityExhausted(_)
                | Self::NotFound(_)
        )
    }
}

/// Result type alias for facility operations.
pub type Result<T> = std::result::Result<T, FacilityError>;

/// Kind discriminant for reporting and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Conflict,
    CapacityExhausted,
    NotFound,
    Unavailable,
    Internal,
}

impl FacilityError {
    /// Get the kind discriminant for this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::Conflict(_) => ErrorKind::Conflict,
            Self::CapacityExhausted(_) => ErrorKind::CapacityExhausted,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Unavailable(_) => ErrorKind::Unavailable,
            Self::Internal(_) | Self::Anyhow(_) => ErrorKind::Internal,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Validation => "validation",
            Self::Conflict => "conflict",
            Self::CapacityExhausted => "capacity_exhausted",
            Self::NotFound => "not_found",
            Self::Unavailable => "unavailable",
            Self::Internal => "internal",
        };
        write!(f, "{}", s)
    }
}
