//! # Tree Operations
//!
//! Pure transformations of the block tree. Every operation takes the whole
//! top-level sequence by value and hands back the resulting sequence; the
//! caller's tree is never modified behind its back.
//!
//! Lookups recurse into `columns[].blocks` wherever the target is not found
//! at the current level. A missing id, parent or column is not an error:
//! the input comes back unchanged.

use crate::mutations::{BlockPatch, ColumnDirection, ColumnRef, Direction};
use folio_model::{walk_block_mut, walk_column_mut, Block, Column, IdCollector, IdGenerator, VisitorMut};
use std::collections::HashSet;

/// Position of a block in the tree: the columns enclosing it, outermost
/// first, and its index in the innermost sibling list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockPath {
    pub ancestors: Vec<ColumnRef>,
    pub index: usize,
}

impl BlockPath {
    /// Column directly containing the block, `None` at top level
    pub fn parent(&self) -> Option<&ColumnRef> {
        self.ancestors.last()
    }

    pub fn depth(&self) -> usize {
        self.ancestors.len()
    }
}

/// Depth-first search for `id`
pub fn locate(blocks: &[Block], id: &str) -> Option<BlockPath> {
    let mut ancestors = Vec::new();
    locate_in(blocks, id, &mut ancestors).map(|index| BlockPath { ancestors, index })
}

fn locate_in(blocks: &[Block], id: &str, ancestors: &mut Vec<ColumnRef>) -> Option<usize> {
    for (index, block) in blocks.iter().enumerate() {
        if block.id == id {
            return Some(index);
        }
        for column in block.columns().unwrap_or_default() {
            ancestors.push(ColumnRef::new(&block.id, &column.id));
            if let Some(found) = locate_in(&column.blocks, id, ancestors) {
                return Some(found);
            }
            ancestors.pop();
        }
    }
    None
}

/// Block with `id`, anywhere in the tree
pub fn find<'a>(blocks: &'a [Block], id: &str) -> Option<&'a Block> {
    for block in blocks {
        if block.id == id {
            return Some(block);
        }
        for column in block.columns().unwrap_or_default() {
            if let Some(found) = find(&column.blocks, id) {
                return Some(found);
            }
        }
    }
    None
}

pub fn find_mut<'a>(blocks: &'a mut [Block], id: &str) -> Option<&'a mut Block> {
    for block in blocks.iter_mut() {
        if block.id == id {
            return Some(block);
        }
        if let Some(columns) = block.columns_mut() {
            for column in columns.iter_mut() {
                if let Some(found) = find_mut(&mut column.blocks, id) {
                    return Some(found);
                }
            }
        }
    }
    None
}

/// Column `column_id` of layout `layout_id`
pub fn find_column<'a>(blocks: &'a [Block], target: &ColumnRef) -> Option<&'a Column> {
    find(blocks, &target.layout_id)?.column(&target.column_id)
}

/// The sibling list holding `id`, and its index there
fn siblings_mut<'a>(blocks: &'a mut Vec<Block>, id: &str) -> Option<(&'a mut Vec<Block>, usize)> {
    if let Some(index) = blocks.iter().position(|b| b.id == id) {
        return Some((blocks, index));
    }
    for block in blocks.iter_mut() {
        if let Some(columns) = block.columns_mut() {
            for column in columns.iter_mut() {
                if let Some(found) = siblings_mut(&mut column.blocks, id) {
                    return Some(found);
                }
            }
        }
    }
    None
}

fn layout_columns_mut<'a>(blocks: &'a mut [Block], layout_id: &str) -> Option<&'a mut Vec<Column>> {
    find_mut(blocks, layout_id)?.columns_mut()
}

/// Every block and column id currently in use
pub fn collect_ids(blocks: &[Block]) -> HashSet<String> {
    IdCollector::collect(blocks).all_ids().cloned().collect()
}

/// Append `block` to the top level, or to the given column
pub fn insert(mut blocks: Vec<Block>, block: Block, parent: Option<&ColumnRef>) -> Vec<Block> {
    let Some(target) = parent else {
        blocks.push(block);
        return blocks;
    };

    let column = layout_columns_mut(&mut blocks, &target.layout_id)
        .and_then(|columns| columns.iter_mut().find(|c| c.id == target.column_id));

    match column {
        Some(column) => column.blocks.push(block),
        None => tracing::trace!(
            "insert: no column {}/{}, tree unchanged",
            target.layout_id,
            target.column_id
        ),
    }
    blocks
}

/// Merge `patch` into the block with `id`
pub fn update(mut blocks: Vec<Block>, id: &str, patch: &BlockPatch) -> Vec<Block> {
    match find_mut(&mut blocks, id) {
        Some(block) => patch.apply_to(block),
        None => tracing::trace!("update: block {} not found", id),
    }
    blocks
}

/// Remove the block with `id` from whichever sequence holds it. A layout
/// takes its whole column subtree with it.
pub fn remove(mut blocks: Vec<Block>, id: &str) -> Vec<Block> {
    match siblings_mut(&mut blocks, id) {
        Some((siblings, index)) => {
            siblings.remove(index);
        }
        None => tracing::trace!("remove: block {} not found", id),
    }
    blocks
}

/// Swap the block with its neighbour inside its own sibling list. Blocks never
/// cross into a parent or neighbouring column.
pub fn move_vertical(mut blocks: Vec<Block>, id: &str, direction: Direction) -> Vec<Block> {
    if let Some((siblings, index)) = siblings_mut(&mut blocks, id) {
        let neighbour = match direction {
            Direction::Up => index.checked_sub(1),
            Direction::Down => Some(index + 1).filter(|&i| i < siblings.len()),
        };
        if let Some(neighbour) = neighbour {
            siblings.swap(index, neighbour);
        }
    }
    blocks
}

/// Deep-clone the subtree rooted at `id` and insert the copy right after it.
/// Every cloned block and column gets a fresh id.
pub fn duplicate(mut blocks: Vec<Block>, id: &str, ids: &mut IdGenerator) -> (Vec<Block>, Option<String>) {
    let mut taken = collect_ids(&blocks);
    let created = match siblings_mut(&mut blocks, id) {
        Some((siblings, index)) => {
            let copy = clone_with_fresh_ids(&siblings[index], ids, &mut taken);
            let copy_id = copy.id.clone();
            siblings.insert(index + 1, copy);
            Some(copy_id)
        }
        None => None,
    };
    (blocks, created)
}

/// Re-mints every block and column id it walks over
struct FreshIds<'a> {
    ids: &'a mut IdGenerator,
    taken: &'a mut HashSet<String>,
}

impl VisitorMut for FreshIds<'_> {
    fn visit_block_mut(&mut self, block: &mut Block, depth: usize) {
        block.id = self.ids.new_id_excluding(self.taken);
        walk_block_mut(self, block, depth);
    }

    fn visit_column_mut(&mut self, column: &mut Column, depth: usize) {
        column.id = self.ids.new_id_excluding(self.taken);
        walk_column_mut(self, column, depth);
    }
}

/// Structural copy of `block` where every block and column id is newly minted
pub fn clone_with_fresh_ids(block: &Block, ids: &mut IdGenerator, taken: &mut HashSet<String>) -> Block {
    let mut copy = block.clone();
    FreshIds { ids, taken }.visit_block_mut(&mut copy, 0);
    copy
}

/// Replace the top-level sequence. Accepted only when `order` holds exactly
/// the current top-level ids; nested columns are untouched either way.
pub fn reorder_top_level(blocks: Vec<Block>, order: Vec<Block>) -> Vec<Block> {
    let current: HashSet<&str> = blocks.iter().map(|b| b.id.as_str()).collect();
    let proposed: HashSet<&str> = order.iter().map(|b| b.id.as_str()).collect();

    if order.len() != blocks.len() || current != proposed {
        tracing::debug!("reorder: proposed order does not match current blocks, ignoring");
        return blocks;
    }
    order
}

/// Append an empty column to a layout and split widths evenly
pub fn add_column(mut blocks: Vec<Block>, layout_id: &str, ids: &mut IdGenerator) -> (Vec<Block>, Option<String>) {
    let mut taken = collect_ids(&blocks);
    let Some(columns) = layout_columns_mut(&mut blocks, layout_id) else {
        return (blocks, None);
    };

    let column_id = ids.new_id_excluding(&mut taken);
    columns.push(Column::new(column_id.clone(), 0));
    distribute_evenly(columns);
    (blocks, Some(column_id))
}

/// Remove a column. The last column of a layout can never be removed; the
/// freed width goes to the survivors in proportion to their widths.
pub fn remove_column(mut blocks: Vec<Block>, target: &ColumnRef) -> Vec<Block> {
    let Some(columns) = layout_columns_mut(&mut blocks, &target.layout_id) else {
        return blocks;
    };
    let Some(index) = columns.iter().position(|c| c.id == target.column_id) else {
        return blocks;
    };
    if columns.len() <= 1 {
        tracing::debug!("remove_column: refusing to remove last column of {}", target.layout_id);
        return blocks;
    }

    columns.remove(index);
    let total: u64 = columns.iter().map(|c| u64::from(c.width)).sum();
    if total == 0 {
        distribute_evenly(columns);
    } else {
        let shares: Vec<u32> = columns
            .iter()
            .map(|c| (u64::from(c.width) * 100 / total) as u32)
            .collect();
        for (column, share) in columns.iter_mut().zip(shares) {
            column.width = share;
        }
        settle_remainder(columns, None);
    }
    blocks
}

/// Set one column's width and redistribute what is left across the others
/// in proportion to their current widths.
///
/// `width` is clamped so that every other column keeps at least 1%. The
/// rounding remainder lands on the last other column, so the layout always
/// sums to exactly 100. A single-column layout cannot be resized.
pub fn resize_column(mut blocks: Vec<Block>, target: &ColumnRef, width: u32) -> Vec<Block> {
    let Some(columns) = layout_columns_mut(&mut blocks, &target.layout_id) else {
        return blocks;
    };
    let Some(index) = columns.iter().position(|c| c.id == target.column_id) else {
        return blocks;
    };
    let others = columns.len() as u32 - 1;
    if others == 0 {
        return blocks;
    }

    let width = width.clamp(1, 100u32.saturating_sub(others).max(1));
    let remaining = 100 - width;
    let others_total: u64 = columns
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != index)
        .map(|(_, c)| u64::from(c.width))
        .sum();

    for (i, column) in columns.iter_mut().enumerate() {
        column.width = if i == index {
            width
        } else if others_total == 0 {
            remaining / others
        } else {
            (u64::from(column.width) * u64::from(remaining) / others_total) as u32
        };
    }
    settle_remainder(columns, Some(index));
    blocks
}

/// Swap a column with its neighbour
pub fn move_column(mut blocks: Vec<Block>, target: &ColumnRef, direction: ColumnDirection) -> Vec<Block> {
    let Some(columns) = layout_columns_mut(&mut blocks, &target.layout_id) else {
        return blocks;
    };
    if let Some(index) = columns.iter().position(|c| c.id == target.column_id) {
        let neighbour = match direction {
            ColumnDirection::Left => index.checked_sub(1),
            ColumnDirection::Right => Some(index + 1).filter(|&i| i < columns.len()),
        };
        if let Some(neighbour) = neighbour {
            columns.swap(index, neighbour);
        }
    }
    blocks
}

/// `floor(100 / n)` each, remainder to the last column
fn distribute_evenly(columns: &mut [Column]) {
    if columns.is_empty() {
        return;
    }
    let share = 100 / columns.len() as u32;
    for column in columns.iter_mut() {
        column.width = share;
    }
    settle_remainder(columns, None);
}

/// Give the rounding remainder to the last column other than `fixed`, then
/// lift any column that rounded down to 0 by taking from the widest one.
fn settle_remainder(columns: &mut [Column], fixed: Option<usize>) {
    // Widths may come straight from a loaded file, so sum wide
    let total: u64 = columns.iter().map(|c| u64::from(c.width)).sum();
    let Some(last) = (0..columns.len()).rev().find(|&i| Some(i) != fixed) else {
        return;
    };
    if total < 100 {
        columns[last].width += (100 - total) as u32;
    } else if total > 100 {
        let excess = u32::try_from(total - 100).unwrap_or(u32::MAX);
        columns[last].width = columns[last].width.saturating_sub(excess);
    }

    while let Some(starved) = (0..columns.len()).find(|&i| Some(i) != fixed && columns[i].width == 0) {
        let Some(donor) = (0..columns.len())
            .filter(|&i| Some(i) != fixed && columns[i].width > 1)
            .max_by_key(|&i| columns[i].width)
        else {
            break;
        };
        columns[donor].width -= 1;
        columns[starved].width = 1;
    }
}
