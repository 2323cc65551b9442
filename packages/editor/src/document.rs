//! # Document State
//!
//! The single owner of one live report: its block tree, metadata and
//! dataset registry, plus the undo history recorded from them.
//!
//! Every change goes through [`DocumentState::apply`] (or one of the thin
//! wrappers around it), which runs the matching tree operation, swaps in
//! the result and records it in history. Readers get shared references;
//! nothing outside this type can mutate the live tree.
//!
//! ## Lifecycle
//!
//! ```text
//! new/load ─→ apply(mutation)* ─→ undo/redo ─→ reset
//!                  │                   ↑
//!                  └── History ────────┘
//! ```

use crate::clock::{Clock, SystemClock};
use crate::config::EditorConfig;
use crate::errors::EditorError;
use crate::history::History;
use crate::mutations::{BlockPatch, ColumnDirection, ColumnRef, Direction, MetadataPatch, Mutation, MutationResult};
use crate::persistence;
use crate::templates;
use crate::tree;
use folio_model::{
    Block, BlockKind, BlockType, Column, Dataset, DatasetContentStore, DatasetKind, IdGenerator, MemoryContentStore,
    ReportMetadata,
};
use std::collections::HashSet;
use std::sync::Arc;

const WELCOME_TEXT: &str = "# Welcome to Folio\n\nStart editing your report by adding blocks below.";

/// A file picked for upload, before it is split into record and content
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetUpload {
    pub name: String,
    pub content: Vec<u8>,
    /// First rows, already parsed by the caller
    pub preview: Vec<serde_json::Value>,
}

pub struct DocumentState {
    blocks: Vec<Block>,
    metadata: ReportMetadata,
    datasets: Vec<Dataset>,
    history: History,
    ids: IdGenerator,
    store: Box<dyn DatasetContentStore>,
    config: EditorConfig,

    /// Increments on every accepted change, including undo/redo and loads
    version: u64,
}

impl std::fmt::Debug for DocumentState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentState")
            .field("blocks", &self.blocks.len())
            .field("datasets", &self.datasets.len())
            .field("version", &self.version)
            .field("history", &self.history.len())
            .finish()
    }
}

impl DocumentState {
    /// Empty report with untitled metadata
    pub fn new(config: EditorConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: EditorConfig, clock: Arc<dyn Clock>) -> Self {
        let metadata = ReportMetadata::untitled();
        let history = History::with_clock(&[], &metadata, config.history, clock);
        Self {
            blocks: Vec::new(),
            metadata,
            datasets: Vec::new(),
            history,
            ids: IdGenerator::for_session(),
            store: Box::new(MemoryContentStore::new()),
            config,
            version: 0,
        }
    }

    /// Report opened fresh in the editor: one introductory text block
    pub fn welcome(config: EditorConfig) -> Self {
        let mut state = Self::new(config);
        let id = state.mint_id();
        let blocks = vec![Block::text(id, WELCOME_TEXT)];
        let metadata = state.metadata.clone();
        state.load_report(blocks, metadata);
        state
    }

    /// Swap the dataset content store
    pub fn with_store(mut self, store: Box<dyn DatasetContentStore>) -> Self {
        self.store = store;
        self
    }

    pub fn with_id_generator(mut self, ids: IdGenerator) -> Self {
        self.ids = ids;
        self
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn metadata(&self) -> &ReportMetadata {
        &self.metadata
    }

    pub fn datasets(&self) -> &[Dataset] {
        &self.datasets
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn content_store(&self) -> &dyn DatasetContentStore {
        self.store.as_ref()
    }

    pub fn find_block(&self, id: &str) -> Option<&Block> {
        tree::find(&self.blocks, id)
    }

    /// Apply a mutation and record it in history. Mutations that leave the
    /// report unchanged (missing ids, rejected guards) are not recorded.
    pub fn apply(&mut self, mutation: Mutation) -> MutationResult {
        let debounce = mutation.is_debounced();
        let name = mutation.name();
        let mut created_id = None;

        let applied = match mutation {
            Mutation::UpdateMetadata { patch } => {
                let mut metadata = self.metadata.clone();
                patch.apply_to(&mut metadata);
                self.replace_metadata(metadata)
            }
            structural => {
                let (next, created) = self.run_tree_operation(structural);
                let applied = self.replace_blocks(next);
                if applied {
                    created_id = created;
                }
                applied
            }
        };

        if applied {
            self.version += 1;
            self.history.push_state(&self.blocks, &self.metadata, debounce);
            tracing::debug!("[{}] applied, version={}", name, self.version);
        } else {
            tracing::trace!("[{}] no change", name);
        }

        MutationResult {
            version: self.version,
            applied,
            created_id,
        }
    }

    fn run_tree_operation(&mut self, mutation: Mutation) -> (Vec<Block>, Option<String>) {
        let blocks = self.blocks.clone();
        match mutation {
            Mutation::AddBlock { block_type, parent } => {
                let block = self.new_block(block_type);
                let id = block.id.clone();
                (tree::insert(blocks, block, parent.as_ref()), Some(id))
            }
            Mutation::UpdateBlock { block_id, patch } => (tree::update(blocks, &block_id, &patch), None),
            Mutation::RemoveBlock { block_id } => (tree::remove(blocks, &block_id), None),
            Mutation::MoveBlock { block_id, direction } => (tree::move_vertical(blocks, &block_id, direction), None),
            Mutation::DuplicateBlock { block_id } => tree::duplicate(blocks, &block_id, &mut self.ids),
            Mutation::ReorderBlocks { blocks: order } => (tree::reorder_top_level(blocks, order), None),
            Mutation::AddColumn { layout_id } => tree::add_column(blocks, &layout_id, &mut self.ids),
            Mutation::RemoveColumn { layout_id, column_id } => {
                (tree::remove_column(blocks, &ColumnRef::new(layout_id, column_id)), None)
            }
            Mutation::ResizeColumn {
                layout_id,
                column_id,
                width,
            } => (tree::resize_column(blocks, &ColumnRef::new(layout_id, column_id), width), None),
            Mutation::MoveColumn {
                layout_id,
                column_id,
                direction,
            } => (tree::move_column(blocks, &ColumnRef::new(layout_id, column_id), direction), None),
            Mutation::UpdateMetadata { .. } => (blocks, None),
        }
    }

    fn replace_blocks(&mut self, next: Vec<Block>) -> bool {
        if next == self.blocks {
            return false;
        }
        self.blocks = next;
        true
    }

    fn replace_metadata(&mut self, next: ReportMetadata) -> bool {
        if next == self.metadata {
            return false;
        }
        self.metadata = next;
        true
    }

    fn taken_ids(&self) -> HashSet<String> {
        let mut taken = tree::collect_ids(&self.blocks);
        taken.extend(self.datasets.iter().map(|d| d.id.clone()));
        taken
    }

    fn mint_id(&mut self) -> String {
        let mut taken = self.taken_ids();
        self.ids.new_id_excluding(&mut taken)
    }

    /// Block of the given variant with its defaults: code gets the configured
    /// language, layout gets two 50/50 columns
    fn new_block(&mut self, block_type: BlockType) -> Block {
        let mut taken = self.taken_ids();
        let id = self.ids.new_id_excluding(&mut taken);
        let kind = match block_type {
            BlockType::Text => BlockKind::Text,
            BlockType::Code => BlockKind::Code {
                language: self.config.default_code_language.clone(),
            },
            BlockType::Image => BlockKind::Image,
            BlockType::Html => BlockKind::Html,
            BlockType::Layout => BlockKind::Layout {
                columns: vec![
                    Column::new(self.ids.new_id_excluding(&mut taken), 50),
                    Column::new(self.ids.new_id_excluding(&mut taken), 50),
                ],
            },
            BlockType::PageBreak => BlockKind::PageBreak,
        };
        Block::new(id, kind)
    }

    /// Append a new block; returns its id unless the target column is missing
    pub fn add_block(&mut self, block_type: BlockType, parent: Option<ColumnRef>) -> Option<String> {
        self.apply(Mutation::AddBlock { block_type, parent }).created_id
    }

    pub fn update_block(&mut self, block_id: &str, patch: BlockPatch) -> bool {
        self.apply(Mutation::UpdateBlock {
            block_id: block_id.to_string(),
            patch,
        })
        .applied
    }

    pub fn remove_block(&mut self, block_id: &str) -> bool {
        self.apply(Mutation::RemoveBlock {
            block_id: block_id.to_string(),
        })
        .applied
    }

    pub fn move_block(&mut self, block_id: &str, direction: Direction) -> bool {
        self.apply(Mutation::MoveBlock {
            block_id: block_id.to_string(),
            direction,
        })
        .applied
    }

    /// Returns the id of the copy
    pub fn duplicate_block(&mut self, block_id: &str) -> Option<String> {
        self.apply(Mutation::DuplicateBlock {
            block_id: block_id.to_string(),
        })
        .created_id
    }

    pub fn update_block_order(&mut self, blocks: Vec<Block>) -> bool {
        self.apply(Mutation::ReorderBlocks { blocks }).applied
    }

    /// Returns the id of the new column
    pub fn add_column(&mut self, layout_id: &str) -> Option<String> {
        self.apply(Mutation::AddColumn {
            layout_id: layout_id.to_string(),
        })
        .created_id
    }

    pub fn remove_column(&mut self, layout_id: &str, column_id: &str) -> bool {
        self.apply(Mutation::RemoveColumn {
            layout_id: layout_id.to_string(),
            column_id: column_id.to_string(),
        })
        .applied
    }

    pub fn resize_column(&mut self, layout_id: &str, column_id: &str, width: u32) -> bool {
        self.apply(Mutation::ResizeColumn {
            layout_id: layout_id.to_string(),
            column_id: column_id.to_string(),
            width,
        })
        .applied
    }

    pub fn move_column(&mut self, layout_id: &str, column_id: &str, direction: ColumnDirection) -> bool {
        self.apply(Mutation::MoveColumn {
            layout_id: layout_id.to_string(),
            column_id: column_id.to_string(),
            direction,
        })
        .applied
    }

    pub fn update_metadata(&mut self, patch: MetadataPatch) -> bool {
        self.apply(Mutation::UpdateMetadata { patch }).applied
    }

    /// Replace the live report and start a fresh history at this state.
    /// Undo never crosses a load.
    pub fn load_report(&mut self, blocks: Vec<Block>, metadata: ReportMetadata) {
        self.blocks = blocks;
        self.metadata = metadata;
        self.history.reset(&self.blocks, &self.metadata);
        self.version += 1;
        tracing::debug!("loaded report with {} top-level blocks", self.blocks.len());
    }

    /// Validate a saved report and load it. Nothing changes if validation fails.
    pub fn load_json(&mut self, json: &str) -> Result<(), EditorError> {
        let (blocks, metadata) = persistence::load_configuration(json)?;
        self.load_report(blocks, metadata);
        Ok(())
    }

    /// Load one of the bundled starter reports. Unknown ids change nothing.
    pub fn load_template(&mut self, id: &str) -> bool {
        let Some(template) = templates::find_template(id) else {
            tracing::debug!("no template named {}", id);
            return false;
        };
        let (blocks, metadata) = template.build();
        self.load_report(blocks, metadata);
        true
    }

    pub fn save_json(&self) -> Result<String, EditorError> {
        persistence::save_configuration(&self.blocks, &self.metadata)
    }

    /// Empty document, blank metadata, no datasets, fresh history
    pub fn reset_report(&mut self) {
        for dataset in std::mem::take(&mut self.datasets) {
            tracing::trace!("dropping dataset {}", dataset.id);
        }
        if let Err(e) = self.store.clear() {
            tracing::warn!("failed to clear dataset content: {}", e);
        }
        self.load_report(Vec::new(), ReportMetadata::default());
    }

    /// Restore the previous snapshot. Returns false when there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        match self.history.undo() {
            Some(entry) => {
                self.blocks = entry.blocks;
                self.metadata = entry.metadata;
                self.version += 1;
                true
            }
            None => false,
        }
    }

    pub fn redo(&mut self) -> bool {
        match self.history.redo() {
            Some(entry) => {
                self.blocks = entry.blocks;
                self.metadata = entry.metadata;
                self.version += 1;
                true
            }
            None => false,
        }
    }

    /// Drive the debounce timer; call from the host event loop
    pub fn poll(&mut self) -> bool {
        self.history.poll()
    }

    /// Commit any pending content edit now
    pub fn flush_history(&mut self) -> bool {
        self.history.flush()
    }

    /// Register an uploaded dataset. The bytes go to the content store; only
    /// the metadata record is kept here.
    pub fn add_dataset(&mut self, upload: DatasetUpload) -> String {
        let id = self.mint_id();
        let dataset = Dataset {
            id: id.clone(),
            kind: DatasetKind::from_file_name(&upload.name),
            name: upload.name,
            size: upload.content.len() as u64,
            preview: upload.preview,
        };

        if let Err(e) = self.store.put(&id, upload.content) {
            tracing::warn!("failed to store content for dataset {}: {}", id, e);
        }
        tracing::debug!("added dataset {} ({})", dataset.name, id);
        self.datasets.push(dataset);
        id
    }

    pub fn remove_dataset(&mut self, id: &str) -> bool {
        let before = self.datasets.len();
        self.datasets.retain(|d| d.id != id);
        if self.datasets.len() == before {
            return false;
        }
        if let Err(e) = self.store.delete(id) {
            tracing::warn!("failed to delete content for dataset {}: {}", id, e);
        }
        true
    }

    /// Re-register dataset records whose content already sits in the store
    pub fn restore_datasets(&mut self, datasets: Vec<Dataset>) {
        self.datasets = datasets;
    }

    pub fn dataset_content(&self, id: &str) -> Option<Vec<u8>> {
        match self.store.get(id) {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!("failed to read content for dataset {}: {}", id, e);
                None
            }
        }
    }
}

impl Default for DocumentState {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}
