use thiserror::Error;

#[derive(Error, Debug)]
pub enum FilipError {
    /// Input does not follow the Simple Query Language grammar.
    #[error("format error: {0}")]
    Format(String),
    /// A value was well formed but semantically invalid.
    #[error("validation error: {0}")]
    Validation(String),
    #[error("invalid operator: {0}")]
    InvalidOperator(String),
    #[error("not found: {0}")]
    NotFound(String),
    /// Input that cannot be normalized into the requested shape.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("unknown unit: {0}")]
    UnknownUnit(String),
    #[error("config error: {0}")]
    Config(String),
    #[error("url error: {0}")]
    Url(#[from] url::ParseError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl From<std::convert::Infallible> for FilipError {
    fn from(never: std::convert::Infallible) -> Self {
        match never {}
    }
}

pub type Result<T> = std::result::Result<T, FilipError>;
