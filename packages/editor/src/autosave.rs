//! Periodic snapshots of the live report for crash recovery.
//!
//! The [`Autosaver`] runs its own quiet period, separate from history: every
//! change pushes the deadline back, and once it passes [`Autosaver::poll`]
//! hands out an [`AutosaveData`] for the host to write wherever it keeps
//! drafts. Restoring goes through `load_report`, exactly like a manual load.

use crate::clock::{Clock, SystemClock};
use crate::config::AutosaveConfig;
use crate::document::DocumentState;
use crate::errors::EditorError;
use crate::persistence;
use folio_model::{Block, Dataset, ReportMetadata};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

pub const AUTOSAVE_FILE_NAME: &str = "folio.autosave.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutosaveData {
    pub blocks: Vec<Block>,
    pub metadata: ReportMetadata,
    #[serde(default)]
    pub datasets: Vec<Dataset>,
    pub timestamp: String,
}

impl AutosaveData {
    pub fn capture(state: &DocumentState) -> Self {
        Self {
            blocks: state.blocks().to_vec(),
            metadata: state.metadata().clone(),
            datasets: state.datasets().to_vec(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn to_json(&self) -> Result<String, EditorError> {
        Ok(serde_json::to_string(self)?)
    }

    /// A draft that can't be read, or that would not pass a manual load, is
    /// treated as absent
    pub fn from_json(json: &str) -> Option<Self> {
        match Self::parse(json) {
            Ok(data) => Some(data),
            Err(e) => {
                tracing::warn!("ignoring unreadable autosave: {}", e);
                None
            }
        }
    }

    fn parse(json: &str) -> Result<Self, EditorError> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        persistence::validate_config(&value)?;
        Ok(serde_json::from_value(value)?)
    }

    /// Replace the live report with this draft. History starts over.
    pub fn restore(self, state: &mut DocumentState) {
        tracing::debug!("restoring autosave from {}", self.timestamp);
        state.load_report(self.blocks, self.metadata);
        state.restore_datasets(self.datasets);
    }

    pub fn write_to(&self, dir: impl AsRef<Path>) -> Result<(), EditorError> {
        let path = dir.as_ref().join(AUTOSAVE_FILE_NAME);
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// Read the draft in `dir`, if there is a readable one
    pub fn read_from(dir: impl AsRef<Path>) -> Option<Self> {
        let path = dir.as_ref().join(AUTOSAVE_FILE_NAME);
        let content = std::fs::read_to_string(path).ok()?;
        Self::from_json(&content)
    }
}

#[derive(Debug)]
pub struct Autosaver {
    config: AutosaveConfig,
    clock: Arc<dyn Clock>,
    deadline: Option<Instant>,
    last_version: Option<u64>,
}

impl Autosaver {
    pub fn new(config: AutosaveConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: AutosaveConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            config,
            clock,
            deadline: None,
            last_version: None,
        }
    }

    /// Restart the quiet period
    pub fn mark_changed(&mut self) {
        self.deadline = Some(self.clock.now() + self.config.debounce());
    }

    pub fn is_due(&self) -> bool {
        self.deadline.map_or(false, |deadline| self.clock.now() >= deadline)
    }

    /// Capture the document once the quiet period has passed. Versions that
    /// were already captured are skipped.
    pub fn poll(&mut self, state: &DocumentState) -> Option<AutosaveData> {
        if !self.is_due() {
            return None;
        }
        self.deadline = None;

        if self.last_version == Some(state.version()) {
            return None;
        }
        self.last_version = Some(state.version());
        Some(AutosaveData::capture(state))
    }

    /// Watch the document version and restart the quiet period when it moves
    pub fn observe(&mut self, state: &DocumentState) {
        if self.last_version != Some(state.version()) {
            self.mark_changed();
        }
    }
}
