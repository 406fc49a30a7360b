use std::path::PathBuf;
use thiserror::Error;

pub type TemplateResult<T> = Result<T, TemplateError>;

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("Template image not found: {path:?}")]
    Missing { path: PathBuf },

    #[error("Failed to load template {path:?}: {source}")]
    Decode {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("Failed to read template directory {path:?}: {source}")]
    Directory {
        path: PathBuf,
        source: std::io::Error,
    },
}
