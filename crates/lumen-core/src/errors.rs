/// Failures reported at the boundary of the engine.
///
/// Nothing here is retryable: every failure comes from local, deterministic
/// work, so callers surface it and move on.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum LumenError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("capacity exceeded: {active} sessions running (limit {limit})")]
    CapacityExceeded { active: usize, limit: usize },

    #[error("catalog error: {0}")]
    Catalog(String),
}

impl LumenError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Short classification string for logging.
    pub fn error_kind(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "invalid_input",
            Self::NotFound(_) => "not_found",
            Self::CapacityExceeded { .. } => "capacity_exceeded",
            Self::Catalog(_) => "catalog",
        }
    }

    /// HTTP status the boundary should answer with.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::InvalidInput(_) => 400,
            Self::NotFound(_) => 404,
            Self::CapacityExceeded { .. } => 503,
            Self::Catalog(_) => 500,
        }
    }
}
