use thiserror::Error;

/// Everything that can go wrong between the adapter and an external engine.
///
/// None of these ever reach the caller of the dispatcher as an error; they are
/// folded into fallback payloads by [`crate::fallback`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EngineError {
    #[error("engine '{0}' is not available")]
    NotFound(String),

    #[error("engine unreachable: {0}")]
    Unavailable(String),

    #[error("engine has no attribute '{0}'")]
    MethodMissing(String),

    #[error("{0}")]
    Invocation(String),

    #[error("unexpected engine response: {0}")]
    InvalidResponse(String),
}

pub type EngineResult<T> = Result<T, EngineError>;

impl From<reqwest::Error> for EngineError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_connect() || err.is_timeout() {
            EngineError::Unavailable(err.to_string())
        } else if err.is_decode() {
            EngineError::InvalidResponse(err.to_string())
        } else {
            EngineError::Invocation(err.to_string())
        }
    }
}
