use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ShelfError {
    #[error("Network failure: {0}")]
    NetworkFailure(String),

    #[error("{0}")]
    ValidationFailure(String),

    /// A response arrived for a panel that has since moved on. Never shown to the user.
    #[error("Stale response")]
    StaleResponse,
}

impl From<reqwest::Error> for ShelfError {
    fn from(err: reqwest::Error) -> Self {
        ShelfError::NetworkFailure(err.to_string())
    }
}
