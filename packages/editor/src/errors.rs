//! Error types for the editor

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("Load error: {0}")]
    Load(#[from] LoadError),

    #[error("Content store error: {0}")]
    Store(#[from] folio_model::StoreError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Rejections raised while validating a persisted report.
/// A load that fails never touches the live document.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LoadError {
    #[error("Invalid JSON: {0}")]
    InvalidJson(String),

    #[error("Invalid configuration file: 'blocks' is missing or invalid")]
    MissingBlocks,

    #[error("Invalid configuration file: 'metadata' is missing")]
    MissingMetadata,

    #[error("Invalid block: missing or invalid 'id'")]
    InvalidBlockId,

    #[error("Invalid block type: '{0}'")]
    InvalidBlockType(String),

    #[error("Invalid block content for block '{0}'")]
    InvalidContent(String),

    #[error("Invalid columns for layout block '{0}'")]
    InvalidColumns(String),

    #[error("Duplicate id: '{0}'")]
    DuplicateId(String),

    #[error("Invalid format: '{0}'")]
    InvalidFormat(String),

    #[error("Malformed report: {0}")]
    Malformed(String),
}
