//! # Folio Model
//!
//! Data types for block-based reports: the recursive block tree, report
//! metadata, dataset records and the side store that holds dataset bytes.
//!
//! ```text
//! Vec<Block>
//!   ├─ Block { text | code | image | html | pagebreak }
//!   └─ Block { layout }
//!        └─ Column { width, blocks: Vec<Block> }  (recursion)
//! ```
//!
//! This crate has no editing logic. Mutation and history live in
//! `folio-editor`; export lives in `folio-compiler-qmd`.

pub mod block;
pub mod content_store;
pub mod dataset;
pub mod id_generator;
pub mod metadata;
pub mod visitor;

pub use block::{Block, BlockKind, BlockOptions, BlockType, ChunkOptions, Column, DEFAULT_CODE_LANGUAGE};
pub use content_store::{DatasetContentStore, MemoryContentStore, StoreError, StoreResult};
pub use dataset::{Dataset, DatasetKind};
pub use id_generator::{get_seed, IdGenerator};
pub use metadata::{HtmlStyling, OutputFormat, PdfStyling, ReportMetadata, Styling};
pub use visitor::{
    walk_block, walk_block_mut, walk_blocks, walk_blocks_mut, walk_column, walk_column_mut,
    IdCollector, Visitor, VisitorMut,
};
