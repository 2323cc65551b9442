//! # Report Files
//!
//! Serializable record `{ version, timestamp, metadata, blocks }` written by
//! "save" and read back by "load".
//!
//! Loading is all-or-nothing: the raw JSON is validated in full before any
//! typed value is produced, and any violation is reported as a [`LoadError`].

use crate::errors::{EditorError, LoadError};
use folio_model::{Block, BlockType, OutputFormat, ReportMetadata};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;

pub const CONFIG_VERSION: &str = "1.0";

const MIN_COLUMN_WIDTH: u64 = 1;
const MAX_COLUMN_WIDTH: u64 = 100;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportConfig {
    #[serde(default)]
    pub version: String,

    /// RFC 3339 time of the save
    #[serde(default)]
    pub timestamp: String,

    pub metadata: ReportMetadata,
    pub blocks: Vec<Block>,
}

impl ReportConfig {
    pub fn new(blocks: &[Block], metadata: &ReportMetadata) -> Self {
        Self {
            version: CONFIG_VERSION.to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            metadata: metadata.clone(),
            blocks: blocks.to_vec(),
        }
    }

    pub fn to_json(&self) -> Result<String, EditorError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse and validate a saved report
    pub fn from_json(json: &str) -> Result<Self, LoadError> {
        let value: Value = serde_json::from_str(json).map_err(|e| LoadError::InvalidJson(e.to_string()))?;
        validate_config(&value)?;
        serde_json::from_value(value).map_err(|e| LoadError::Malformed(e.to_string()))
    }
}

/// Serialize the document for download
pub fn save_configuration(blocks: &[Block], metadata: &ReportMetadata) -> Result<String, EditorError> {
    ReportConfig::new(blocks, metadata).to_json()
}

/// Parse a saved document into the pair accepted by `load_report`
pub fn load_configuration(json: &str) -> Result<(Vec<Block>, ReportMetadata), LoadError> {
    let config = ReportConfig::from_json(json)?;
    Ok((config.blocks, config.metadata))
}

/// Default download name, e.g. `report-config-2024-10-01.json`
pub fn suggested_file_name() -> String {
    format!("report-config-{}.json", chrono::Local::now().format("%Y-%m-%d"))
}

/// Check the `blocks` and `metadata` sections of any saved record
pub(crate) fn validate_config(value: &Value) -> Result<(), LoadError> {
    let blocks = value
        .get("blocks")
        .and_then(Value::as_array)
        .ok_or(LoadError::MissingBlocks)?;
    let metadata = value
        .get("metadata")
        .filter(|m| m.is_object())
        .ok_or(LoadError::MissingMetadata)?;

    let mut seen = HashSet::new();
    validate_blocks(blocks, &mut seen)?;

    let format = metadata.get("format").and_then(Value::as_str);
    match format.and_then(OutputFormat::parse) {
        Some(_) => Ok(()),
        None => Err(LoadError::InvalidFormat(describe(metadata.get("format")))),
    }
}

fn validate_blocks(blocks: &[Value], seen: &mut HashSet<String>) -> Result<(), LoadError> {
    for block in blocks {
        let id = block
            .get("id")
            .and_then(Value::as_str)
            .filter(|id| !id.is_empty())
            .ok_or(LoadError::InvalidBlockId)?;

        let ty = block.get("type");
        let block_type = ty
            .and_then(Value::as_str)
            .and_then(BlockType::parse)
            .ok_or_else(|| LoadError::InvalidBlockType(describe(ty)))?;

        if !block.get("content").is_some_and(Value::is_string) {
            return Err(LoadError::InvalidContent(id.to_string()));
        }
        if !seen.insert(id.to_string()) {
            return Err(LoadError::DuplicateId(id.to_string()));
        }

        if block_type == BlockType::Layout {
            validate_columns(id, block.get("columns"), seen)?;
        }
    }
    Ok(())
}

fn validate_columns(layout_id: &str, columns: Option<&Value>, seen: &mut HashSet<String>) -> Result<(), LoadError> {
    let invalid = || LoadError::InvalidColumns(layout_id.to_string());
    let columns = columns.and_then(Value::as_array).filter(|c| !c.is_empty()).ok_or_else(invalid)?;

    for column in columns {
        let id = column.get("id").and_then(Value::as_str).ok_or_else(invalid)?;
        let blocks = column.get("blocks").and_then(Value::as_array).ok_or_else(invalid)?;
        let width = column.get("width").and_then(Value::as_u64).ok_or_else(invalid)?;
        if !(MIN_COLUMN_WIDTH..=MAX_COLUMN_WIDTH).contains(&width) {
            return Err(invalid());
        }
        if !seen.insert(id.to_string()) {
            return Err(LoadError::DuplicateId(id.to_string()));
        }
        validate_blocks(blocks, seen)?;
    }
    Ok(())
}

fn describe(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => "undefined".to_string(),
    }
}
