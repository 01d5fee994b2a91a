use thiserror::Error;

#[derive(Error, Debug)]
pub enum GramevoError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Grammar error: {0}")]
    Grammar(String),

    #[error("Generation error: {0}")]
    Generation(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serde error: {0}")]
    Serde(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, GramevoError>;
