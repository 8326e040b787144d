use thiserror::Error;

pub type Result<T> = std::result::Result<T, PipelineError>;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Core(#[from] partx_core::Error),

    #[error(transparent)]
    Embed(#[from] partx_embed::EmbedError),

    #[error("CSV error: {0}")]
    Csv(String),
}
