//! # Folio Editor
//!
//! Editing engine for block-based reports.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ UI: toolbar, block editors, drag handles    │
//! └─────────────────────────────────────────────┘
//!                     ↓ Mutation
//! ┌─────────────────────────────────────────────┐
//! │ DocumentState                               │
//! │  - owns blocks, metadata, datasets          │
//! │  - runs pure tree operations (tree.rs)      │
//! │  - records snapshots in History             │
//! └─────────────────────────────────────────────┘
//!          ↓ &[Block]            ↓ snapshot
//! ┌──────────────────────┐ ┌────────────────────┐
//! │ preview / export     │ │ autosave / save    │
//! └──────────────────────┘ └────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **Single owner**: only `DocumentState` mutates the live tree
//! 2. **Pure tree operations**: each takes a tree and returns a new one
//! 3. **No-ops are silent**: a missing id leaves the tree as it was and
//!    records nothing in history
//! 4. **Snapshots are copies**: history never aliases the live document
//!
//! ## Usage
//!
//! ```rust,ignore
//! use folio_editor::{BlockPatch, DocumentState, EditorConfig};
//! use folio_model::BlockType;
//!
//! let mut state = DocumentState::new(EditorConfig::load(".")?);
//!
//! let id = state.add_block(BlockType::Text, None).unwrap();
//! state.update_block(&id, BlockPatch::content("# Quarterly numbers"));
//!
//! // Host event loop
//! state.poll();
//!
//! state.undo();
//! let json = state.save_json()?;
//! ```

mod autosave;
mod clock;
mod config;
mod document;
mod errors;
mod history;
mod mutations;
mod outline;
mod persistence;
mod templates;
pub mod tree;

pub use autosave::{AutosaveData, Autosaver, AUTOSAVE_FILE_NAME};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{AutosaveConfig, EditorConfig, HistoryConfig, DEFAULT_CONFIG_NAME};
pub use document::{DatasetUpload, DocumentState};
pub use errors::{EditorError, LoadError};
pub use history::{History, HistoryEntry};
pub use mutations::{
    BlockPatch, ColumnDirection, ColumnRef, Direction, MetadataPatch, Mutation, MutationResult,
};
pub use outline::{label, outline, search, OutlineEntry};
pub use persistence::{
    load_configuration, save_configuration, suggested_file_name, ReportConfig, CONFIG_VERSION,
};
pub use templates::{find_template, templates, ReportTemplate};
