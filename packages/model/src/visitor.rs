use crate::block::{Block, Column};

/// Visitor pattern for traversing the block tree immutably
///
/// Default implementations walk the whole tree in pre-order: each block is
/// visited before the columns it owns, and columns are visited in order.
/// `depth` counts how many layouts enclose the block (0 at top level).
pub trait Visitor: Sized {
    fn visit_blocks(&mut self, blocks: &[Block], depth: usize) {
        walk_blocks(self, blocks, depth);
    }

    fn visit_block(&mut self, block: &Block, depth: usize) {
        walk_block(self, block, depth);
    }

    fn visit_column(&mut self, _layout: &Block, column: &Column, depth: usize) {
        walk_column(self, column, depth);
    }
}

/// Mutable visitor for transforming blocks in place during traversal
pub trait VisitorMut: Sized {
    fn visit_blocks_mut(&mut self, blocks: &mut Vec<Block>, depth: usize) {
        walk_blocks_mut(self, blocks, depth);
    }

    fn visit_block_mut(&mut self, block: &mut Block, depth: usize) {
        walk_block_mut(self, block, depth);
    }

    fn visit_column_mut(&mut self, column: &mut Column, depth: usize) {
        walk_column_mut(self, column, depth);
    }
}

pub fn walk_blocks<V: Visitor>(visitor: &mut V, blocks: &[Block], depth: usize) {
    for block in blocks {
        visitor.visit_block(block, depth);
    }
}

pub fn walk_block<V: Visitor>(visitor: &mut V, block: &Block, depth: usize) {
    if let Some(columns) = block.columns() {
        for column in columns {
            visitor.visit_column(block, column, depth);
        }
    }
}

pub fn walk_column<V: Visitor>(visitor: &mut V, column: &Column, depth: usize) {
    visitor.visit_blocks(&column.blocks, depth + 1);
}

pub fn walk_blocks_mut<V: VisitorMut>(visitor: &mut V, blocks: &mut Vec<Block>, depth: usize) {
    for block in blocks.iter_mut() {
        visitor.visit_block_mut(block, depth);
    }
}

pub fn walk_block_mut<V: VisitorMut>(visitor: &mut V, block: &mut Block, depth: usize) {
    if let Some(columns) = block.columns_mut() {
        for column in columns.iter_mut() {
            visitor.visit_column_mut(column, depth);
        }
    }
}

pub fn walk_column_mut<V: VisitorMut>(visitor: &mut V, column: &mut Column, depth: usize) {
    visitor.visit_blocks_mut(&mut column.blocks, depth + 1);
}

/// Collects every block and column id in the tree
#[derive(Debug, Default)]
pub struct IdCollector {
    pub block_ids: Vec<String>,
    pub column_ids: Vec<String>,
}

impl IdCollector {
    pub fn collect(blocks: &[Block]) -> Self {
        let mut collector = Self::default();
        collector.visit_blocks(blocks, 0);
        collector
    }

    /// Block and column ids together
    pub fn all_ids(&self) -> impl Iterator<Item = &String> {
        self.block_ids.iter().chain(self.column_ids.iter())
    }
}

impl Visitor for IdCollector {
    fn visit_block(&mut self, block: &Block, depth: usize) {
        self.block_ids.push(block.id.clone());
        walk_block(self, block, depth);
    }

    fn visit_column(&mut self, _layout: &Block, column: &Column, depth: usize) {
        self.column_ids.push(column.id.clone());
        walk_column(self, column, depth);
    }
}
