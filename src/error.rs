use thiserror::Error;

/// Failures raised while loading a knowledge base or building an engine.
///
/// Queries never fail; every variant here is a startup-time condition.
#[derive(Debug, Error)]
pub enum FaqError {
    #[error("knowledge base is empty")]
    EmptyKnowledgeBase,

    #[error("no knowledge base question produced a usable term ({entries} entries checked)")]
    EmptyVocabulary { entries: usize },

    #[error("similarity threshold must be a finite value in [0, 1], got {0}")]
    InvalidThreshold(f64),

    #[error("minimum token length must be at least 1")]
    InvalidTokenLength,

    #[error("invalid knowledge base: {0}")]
    InvalidKnowledgeBase(String),

    #[error("user interface error: {0}")]
    Interface(String),

    #[error("linguistic resources unavailable: {0}")]
    Linguistics(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, FaqError>;
