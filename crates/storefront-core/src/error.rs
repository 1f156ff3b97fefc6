use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Request failed: {0}")]
    Transport(String),

    #[error("Unexpected status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error("Operation failed: {0}")]
    Operation(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Network-side failures. The session recovers from all of these; none is fatal.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Error::Transport(_) | Error::Status { .. } | Error::Decode(_) | Error::NotFound(_)
        )
    }
}

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Error::InvalidConfig(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
