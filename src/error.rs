#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Failed to fetch data: {0}")]
    FetchError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("{0}")]
    UsageError(String),

    #[error("Failed to render chart: {0}")]
    RenderError(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::FetchError(err.to_string())
    }
}

impl From<printpdf::Error> for AppError {
    fn from(err: printpdf::Error) -> Self {
        AppError::RenderError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

/// Why a single remote lookup produced no usable answer.
///
/// These never abort a run; the pipeline drops the affected movie or actor.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LookupError {
    #[error("request failed: {0}")]
    Transport(String),

    #[error("unexpected HTTP status {0}")]
    Status(u16),

    #[error("malformed response: {0}")]
    Malformed(String),

    #[error("not found")]
    NotFound,

    #[error("no birth date in article")]
    NoBirthDate,
}

impl From<reqwest::Error> for LookupError {
    fn from(err: reqwest::Error) -> Self {
        LookupError::Transport(err.to_string())
    }
}
