use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] minreq::Error),

    #[error("{locator} returned status {code}")]
    Status { code: i32, locator: String },

    #[error("Invalid theme: {0:?}")]
    InvalidTheme(String),

    #[error("Slide error: {0}")]
    Slide(String),

    #[error("Config error: {0}")]
    Config(String),
}

/// Convenience type alias for Results with AppError
pub type Result<T> = std::result::Result<T, AppError>;
