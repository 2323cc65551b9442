use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CompileError {
    #[error("No stored content for dataset '{0}'")]
    MissingDatasetContent(String),

    #[error("Image block '{0}' has an unreadable data URL")]
    InvalidDataUrl(String),

    #[error("Content store error: {0}")]
    Store(#[from] folio_model::StoreError),
}
