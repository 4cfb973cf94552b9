use thiserror::Error;

#[derive(Error, Debug)]
pub enum BannerError {
    #[error("DOM error: {0}")]
    Dom(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Event error: {0}")]
    Events(String),

    #[error("Timer error: {0}")]
    Timer(String),

    #[error("Invalid banner options: {0}")]
    Options(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, BannerError>;
