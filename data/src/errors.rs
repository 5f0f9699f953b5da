use std::fmt;

/// Typed failures of shape and spec validation.
///
/// These are returned as-is by the pure validation functions, and travel
/// inside a `DlError` everywhere else: callers that need to tell them apart
/// can `downcast_ref::<ValidationError>()`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ValidationError {
    /// Text does not match the shape grammar, or a dimension overflows.
    Format { text: String, partial_allowed: bool },
    /// Parsed rank outside of the declared bounds.
    RankViolation { rank: usize, min_rank: usize, max_rank: Option<usize> },
    /// A structurally valid shape that the declaration can not accept.
    ConstraintInfeasible(String),
    /// Caller broke a precondition.
    InvalidArgument(String),
    /// Another execution context already claimed this identifier.
    DuplicateIdentifier(String),
}

impl ValidationError {
    pub fn invalid_argument(msg: impl Into<String>) -> ValidationError {
        ValidationError::InvalidArgument(msg.into())
    }

    pub fn is_format(&self) -> bool {
        matches!(self, ValidationError::Format { .. })
    }

    pub fn is_rank_violation(&self) -> bool {
        matches!(self, ValidationError::RankViolation { .. })
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ValidationError::Format { text, partial_allowed } => {
                write!(f, "Invalid tuple format: '{text}' Must be digits")?;
                if *partial_allowed {
                    write!(f, " or a question mark")?;
                }
                write!(f, " separated by a comma.")
            }
            ValidationError::RankViolation { rank, min_rank, max_rank: Some(max) }
                if min_rank == max =>
            {
                write!(f, "Expected exactly {min_rank} dimension(s), got {rank}.")
            }
            ValidationError::RankViolation { rank, min_rank, max_rank: Some(max) } => {
                write!(f, "Expected between {min_rank} and {max} dimensions, got {rank}.")
            }
            ValidationError::RankViolation { rank, min_rank, max_rank: None } => {
                write!(f, "Expected at least {min_rank} dimension(s), got {rank}.")
            }
            ValidationError::ConstraintInfeasible(msg) => write!(f, "{msg}"),
            ValidationError::InvalidArgument(msg) => write!(f, "Invalid argument: {msg}"),
            ValidationError::DuplicateIdentifier(id) => {
                write!(f, "An execution context with identifier {id:?} is already registered")
            }
        }
    }
}

impl std::error::Error for ValidationError {}
