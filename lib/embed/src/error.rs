use thiserror::Error;

pub type Result<T> = std::result::Result<T, EmbedError>;

#[derive(Debug, Error)]
pub enum EmbedError {
    #[error("Embedding failed for {text:?}: {cause}")]
    Provider { text: String, cause: String },

    #[error("HTTP transport error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Provider returned an unusable vector for {text:?}")]
    UnusableVector { text: String },

    #[error("Invalid embedding dimension: expected {expected}, got {actual}")]
    InvalidDimension { expected: usize, actual: usize },

    #[error("Malformed provider response: {0}")]
    Malformed(String),

    #[error("Missing API key")]
    MissingApiKey,
}

impl EmbedError {
    /// Attach the offending text to a transport/shape failure so batch
    /// callers can report which description broke the run
    #[must_use]
    pub fn for_text(self, text: &str) -> Self {
        match self {
            EmbedError::Provider { .. } | EmbedError::UnusableVector { .. } => self,
            other => EmbedError::Provider {
                text: text.to_string(),
                cause: other.to_string(),
            },
        }
    }
}
