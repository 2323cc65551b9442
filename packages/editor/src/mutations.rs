//! # Report Mutations
//!
//! Semantic operations on a report, as submitted by the presentation layer.
//!
//! ## Mutation Semantics
//!
//! ### Structural (`AddBlock`, `RemoveBlock`, `MoveBlock`, `DuplicateBlock`,
//! `ReorderBlocks`, column operations)
//! - Committed to history immediately
//! - A missing target id is a silent no-op, never an error
//!
//! ### Content (`UpdateBlock` touching only `content`, `UpdateMetadata`)
//! - Committed to history after the edit burst settles (debounced)
//! - Atomic replacement, last write wins
//!
//! Block ids are never changed by a mutation. `DuplicateBlock` mints new
//! ids for every cloned block and column.

use folio_model::{Block, BlockKind, BlockOptions, BlockType, OutputFormat, ReportMetadata, Styling};
use serde::{Deserialize, Serialize};

/// Semantic mutations (intent-preserving operations)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Mutation {
    /// Append a new block with variant defaults, at top level or into a column
    AddBlock {
        block_type: BlockType,
        parent: Option<ColumnRef>,
    },

    /// Shallow-merge fields into a block
    UpdateBlock { block_id: String, patch: BlockPatch },

    /// Remove a block and everything it owns
    RemoveBlock { block_id: String },

    /// Swap a block with its neighbour in the same sibling list
    MoveBlock {
        block_id: String,
        direction: Direction,
    },

    /// Deep-clone a block next to the original, with fresh ids
    DuplicateBlock { block_id: String },

    /// Replace the top-level order wholesale (drag and drop)
    ReorderBlocks { blocks: Vec<Block> },

    /// Append an empty column to a layout and rebalance widths
    AddColumn { layout_id: String },

    /// Remove a column; rejected for the last one
    RemoveColumn { layout_id: String, column_id: String },

    /// Set one column's width and redistribute the rest
    ResizeColumn {
        layout_id: String,
        column_id: String,
        width: u32,
    },

    /// Swap a column with its left or right neighbour
    MoveColumn {
        layout_id: String,
        column_id: String,
        direction: ColumnDirection,
    },

    /// Shallow-merge fields into the report metadata
    UpdateMetadata { patch: MetadataPatch },
}

impl Mutation {
    /// Whether the history commit for this mutation should be coalesced
    pub fn is_debounced(&self) -> bool {
        match self {
            Mutation::UpdateBlock { patch, .. } => patch.is_content_only(),
            Mutation::UpdateMetadata { .. } => true,
            _ => false,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Mutation::AddBlock { .. } => "AddBlock",
            Mutation::UpdateBlock { .. } => "UpdateBlock",
            Mutation::RemoveBlock { .. } => "RemoveBlock",
            Mutation::MoveBlock { .. } => "MoveBlock",
            Mutation::DuplicateBlock { .. } => "DuplicateBlock",
            Mutation::ReorderBlocks { .. } => "ReorderBlocks",
            Mutation::AddColumn { .. } => "AddColumn",
            Mutation::RemoveColumn { .. } => "RemoveColumn",
            Mutation::ResizeColumn { .. } => "ResizeColumn",
            Mutation::MoveColumn { .. } => "MoveColumn",
            Mutation::UpdateMetadata { .. } => "UpdateMetadata",
        }
    }
}

/// A column addressed by its owning layout
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnRef {
    pub layout_id: String,
    pub column_id: String,
}

impl ColumnRef {
    pub fn new(layout_id: impl Into<String>, column_id: impl Into<String>) -> Self {
        Self {
            layout_id: layout_id.into(),
            column_id: column_id.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnDirection {
    Left,
    Right,
}

/// Partial block update. Absent fields are left alone; present ones replace
/// the old value outright (`options` is not deep-merged).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Ignored for anything but code blocks
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<BlockOptions>,
}

impl BlockPatch {
    pub fn content(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Self::default()
        }
    }

    pub fn language(language: impl Into<String>) -> Self {
        Self {
            language: Some(language.into()),
            ..Self::default()
        }
    }

    pub fn options(options: BlockOptions) -> Self {
        Self {
            options: Some(options),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_none() && self.language.is_none() && self.options.is_none()
    }

    /// Only `content` is set
    pub fn is_content_only(&self) -> bool {
        self.content.is_some() && self.language.is_none() && self.options.is_none()
    }

    pub fn apply_to(&self, block: &mut Block) {
        if let Some(content) = &self.content {
            // layout and page break blocks carry no payload
            if !matches!(block.kind, BlockKind::Layout { .. } | BlockKind::PageBreak) {
                block.content = content.clone();
            }
        }
        if let (Some(new_language), BlockKind::Code { language }) = (&self.language, &mut block.kind) {
            *language = new_language.clone();
        }
        if let Some(options) = &self.options {
            block.options = options.clone();
        }
    }
}

/// Partial metadata update, merged field by field
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetadataPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<OutputFormat>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub styling: Option<Styling>,
}

impl MetadataPatch {
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    pub fn format(format: OutputFormat) -> Self {
        Self {
            format: Some(format),
            ..Self::default()
        }
    }

    pub fn apply_to(&self, metadata: &mut ReportMetadata) {
        if let Some(title) = &self.title {
            metadata.title = title.clone();
        }
        if let Some(author) = &self.author {
            metadata.author = author.clone();
        }
        if let Some(date) = &self.date {
            metadata.date = date.clone();
        }
        if let Some(format) = self.format {
            metadata.format = format;
        }
        if let Some(styling) = &self.styling {
            metadata.styling = styling.clone();
        }
    }
}

/// Result of applying a mutation
#[derive(Debug, Clone, PartialEq)]
pub struct MutationResult {
    /// Document version after the call
    pub version: u64,

    /// False when the mutation was a no-op (missing target, rejected guard)
    pub applied: bool,

    /// Id of the block created by `AddBlock` or `DuplicateBlock`
    pub created_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_model::ChunkOptions;

    #[test]
    fn test_mutation_serialization() {
        let mutation = Mutation::UpdateBlock {
            block_id: "b-1".to_string(),
            patch: BlockPatch::content("Hello World"),
        };

        let json = serde_json::to_string(&mutation).unwrap();
        let deserialized: Mutation = serde_json::from_str(&json).unwrap();

        assert_eq!(mutation, deserialized);
    }

    #[test]
    fn test_debounce_classification() {
        let content = Mutation::UpdateBlock {
            block_id: "b".to_string(),
            patch: BlockPatch::content("x"),
        };
        let language = Mutation::UpdateBlock {
            block_id: "b".to_string(),
            patch: BlockPatch::language("r"),
        };
        let remove = Mutation::RemoveBlock {
            block_id: "b".to_string(),
        };
        let meta = Mutation::UpdateMetadata {
            patch: MetadataPatch::format(OutputFormat::Pdf),
        };

        assert!(content.is_debounced());
        assert!(!language.is_debounced());
        assert!(!remove.is_debounced());
        assert!(meta.is_debounced());
    }

    #[test]
    fn test_patch_replaces_options_wholesale() {
        let mut block = Block::code("c", "r", "x <- 1").with_options(BlockOptions {
            caption: Some("old".to_string()),
            chunk: Some(ChunkOptions {
                echo: Some(true),
                ..ChunkOptions::default()
            }),
            ..BlockOptions::default()
        });

        let patch = BlockPatch::options(BlockOptions::with_chunk(ChunkOptions {
            output: Some(false),
            ..ChunkOptions::default()
        }));
        patch.apply_to(&mut block);

        assert_eq!(block.options.caption, None);
        assert_eq!(block.options.chunk.unwrap().echo, None);
        assert_eq!(block.options.chunk.unwrap().output, Some(false));
        assert_eq!(block.content, "x <- 1");
    }

    #[test]
    fn test_language_patch_ignored_for_text() {
        let mut block = Block::text("t", "hi");
        BlockPatch::language("r").apply_to(&mut block);
        assert_eq!(block.language(), None);

        let mut code = Block::code("c", "python", "");
        BlockPatch::language("r").apply_to(&mut code);
        assert_eq!(code.language(), Some("r"));
    }

    #[test]
    fn test_metadata_patch_merges_fields() {
        let mut meta = ReportMetadata::untitled();
        let author = meta.author.clone();
        MetadataPatch::title("Quarterly").apply_to(&mut meta);
        assert_eq!(meta.title, "Quarterly");
        assert_eq!(meta.author, author);
    }
}
