//! Flattened views of the block tree for side panels: an outline with one
//! labelled row per block, and a plain-text search over block content.

use folio_model::{walk_block, Block, BlockKind, Visitor};

const LABEL_LIMIT: usize = 60;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutlineEntry {
    pub id: String,
    /// Number of layouts enclosing the block
    pub depth: usize,
    pub label: String,
}

/// Every block in pre-order, nested blocks right after their layout
pub fn outline(blocks: &[Block]) -> Vec<OutlineEntry> {
    let mut builder = OutlineBuilder::default();
    builder.visit_blocks(blocks, 0);
    builder.entries
}

/// Ids of blocks whose content contains `needle`, ignoring case, in pre-order
pub fn search(blocks: &[Block], needle: &str) -> Vec<String> {
    let needle = needle.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }
    let mut matcher = Matcher {
        needle,
        hits: Vec::new(),
    };
    matcher.visit_blocks(blocks, 0);
    matcher.hits
}

pub fn label(block: &Block) -> String {
    match &block.kind {
        BlockKind::Layout { columns } => format!("Layout ({} columns)", columns.len()),
        BlockKind::PageBreak => "Page break".to_string(),
        BlockKind::Image => match &block.options.caption {
            Some(caption) if !caption.is_empty() => format!("Image: {}", truncate(caption)),
            _ => "Image".to_string(),
        },
        BlockKind::Code { language } => match first_line(&block.content) {
            Some(line) => format!("{}: {}", language, truncate(line)),
            None => format!("Empty {} chunk", language),
        },
        BlockKind::Text => match first_line(&block.content) {
            Some(line) => truncate(line.trim_start_matches('#').trim()),
            None => "Empty text".to_string(),
        },
        BlockKind::Html => match first_line(&block.content) {
            Some(line) => format!("HTML: {}", truncate(line)),
            None => "Empty HTML".to_string(),
        },
    }
}

fn first_line(content: &str) -> Option<&str> {
    content.lines().map(str::trim).find(|line| !line.is_empty())
}

fn truncate(line: &str) -> String {
    if line.chars().count() <= LABEL_LIMIT {
        return line.to_string();
    }
    let mut short: String = line.chars().take(LABEL_LIMIT).collect();
    short.push('…');
    short
}

#[derive(Default)]
struct OutlineBuilder {
    entries: Vec<OutlineEntry>,
}

impl Visitor for OutlineBuilder {
    fn visit_block(&mut self, block: &Block, depth: usize) {
        self.entries.push(OutlineEntry {
            id: block.id.clone(),
            depth,
            label: label(block),
        });
        walk_block(self, block, depth);
    }
}

struct Matcher {
    needle: String,
    hits: Vec<String>,
}

impl Visitor for Matcher {
    fn visit_block(&mut self, block: &Block, depth: usize) {
        let caption = block.options.caption.as_deref().unwrap_or_default();
        if block.content.to_lowercase().contains(&self.needle) || caption.to_lowercase().contains(&self.needle) {
            self.hits.push(block.id.clone());
        }
        walk_block(self, block, depth);
    }
}
