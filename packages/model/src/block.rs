use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Language assigned to code blocks when none is given
pub const DEFAULT_CODE_LANGUAGE: &str = "python";

/// Closed set of block variants, without payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockType {
    Text,
    Code,
    Image,
    Html,
    Layout,
    PageBreak,
}

impl BlockType {
    pub const ALL: [BlockType; 6] = [
        BlockType::Text,
        BlockType::Code,
        BlockType::Image,
        BlockType::Html,
        BlockType::Layout,
        BlockType::PageBreak,
    ];

    /// Wire name used in persisted documents
    pub fn as_str(&self) -> &'static str {
        match self {
            BlockType::Text => "text",
            BlockType::Code => "code",
            BlockType::Image => "image",
            BlockType::Html => "html",
            BlockType::Layout => "layout",
            BlockType::PageBreak => "pagebreak",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|ty| ty.as_str() == name)
    }
}

impl std::fmt::Display for BlockType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One content unit in the report tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub id: String,

    #[serde(flatten)]
    pub kind: BlockKind,

    /// Markdown, code, image reference or raw markup depending on the variant.
    /// Always empty for layout and page break blocks.
    #[serde(default)]
    pub content: String,

    #[serde(rename = "metadata", default, skip_serializing_if = "BlockOptions::is_empty")]
    pub options: BlockOptions,
}

/// Variant payload. Only `Code` carries a language and only `Layout` owns columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum BlockKind {
    Text,
    Code {
        #[serde(default = "default_language")]
        language: String,
    },
    Image,
    Html,
    Layout {
        #[serde(default)]
        columns: Vec<Column>,
    },
    PageBreak,
}

fn default_language() -> String {
    DEFAULT_CODE_LANGUAGE.to_string()
}

impl BlockKind {
    pub fn block_type(&self) -> BlockType {
        match self {
            BlockKind::Text => BlockType::Text,
            BlockKind::Code { .. } => BlockType::Code,
            BlockKind::Image => BlockType::Image,
            BlockKind::Html => BlockType::Html,
            BlockKind::Layout { .. } => BlockType::Layout,
            BlockKind::PageBreak => BlockType::PageBreak,
        }
    }
}

/// A lane inside a layout block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub id: String,

    /// Percentage of the layout width. Siblings sum to 100.
    #[serde(default)]
    pub width: u32,

    #[serde(default)]
    pub blocks: Vec<Block>,
}

impl Column {
    pub fn new(id: impl Into<String>, width: u32) -> Self {
        Self {
            id: id.into(),
            width,
            blocks: Vec::new(),
        }
    }
}

/// Per-variant rendering and execution flags
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BlockOptions {
    /// Image caption
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,

    #[serde(rename = "blockOptions", default, skip_serializing_if = "Option::is_none")]
    pub chunk: Option<ChunkOptions>,

    /// Unrecognized keys are carried through untouched
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl BlockOptions {
    pub fn is_empty(&self) -> bool {
        self.caption.is_none() && self.chunk.is_none() && self.extra.is_empty()
    }

    pub fn with_caption(caption: impl Into<String>) -> Self {
        Self {
            caption: Some(caption.into()),
            ..Self::default()
        }
    }

    pub fn with_chunk(chunk: ChunkOptions) -> Self {
        Self {
            chunk: Some(chunk),
            ..Self::default()
        }
    }
}

/// Execution flags for code and html blocks. Unset flags fall back to the defaults below.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub echo: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<bool>,
}

impl ChunkOptions {
    pub fn echo(&self) -> bool {
        self.echo.unwrap_or(false)
    }

    pub fn message(&self) -> bool {
        self.message.unwrap_or(true)
    }

    pub fn warning(&self) -> bool {
        self.warning.unwrap_or(true)
    }

    pub fn output(&self) -> bool {
        self.output.unwrap_or(true)
    }
}

impl Block {
    pub fn new(id: impl Into<String>, kind: BlockKind) -> Self {
        Self {
            id: id.into(),
            kind,
            content: String::new(),
            options: BlockOptions::default(),
        }
    }

    pub fn text(id: impl Into<String>, content: impl Into<String>) -> Self {
        Self::new(id, BlockKind::Text).with_content(content)
    }

    pub fn code(id: impl Into<String>, language: impl Into<String>, content: impl Into<String>) -> Self {
        Self::new(
            id,
            BlockKind::Code {
                language: language.into(),
            },
        )
        .with_content(content)
    }

    pub fn layout(id: impl Into<String>, columns: Vec<Column>) -> Self {
        Self::new(id, BlockKind::Layout { columns })
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    pub fn with_options(mut self, options: BlockOptions) -> Self {
        self.options = options;
        self
    }

    pub fn block_type(&self) -> BlockType {
        self.kind.block_type()
    }

    pub fn is_layout(&self) -> bool {
        matches!(self.kind, BlockKind::Layout { .. })
    }

    pub fn language(&self) -> Option<&str> {
        match &self.kind {
            BlockKind::Code { language } => Some(language),
            _ => None,
        }
    }

    pub fn columns(&self) -> Option<&[Column]> {
        match &self.kind {
            BlockKind::Layout { columns } => Some(columns),
            _ => None,
        }
    }

    pub fn columns_mut(&mut self) -> Option<&mut Vec<Column>> {
        match &mut self.kind {
            BlockKind::Layout { columns } => Some(columns),
            _ => None,
        }
    }

    pub fn column(&self, column_id: &str) -> Option<&Column> {
        self.columns()?.iter().find(|c| c.id == column_id)
    }
}
