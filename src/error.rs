use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid image: {0}")]
    InvalidImage(String),
    #[error("Invalid threshold {0}: expected a value between 0 and 255")]
    InvalidThreshold(i64),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to encode image: {0}")]
    Encode(String),
}

impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Error::InvalidImage(s.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
