use thiserror::Error;

#[derive(Error, Debug)]
pub enum StudioError {
    #[error("Bot error: {0}")]
    Bot(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("File unavailable: {0}")]
    FileUnavailable(String),
}

pub type Result<T> = std::result::Result<T, StudioError>;
