use criterion::{black_box, criterion_group, criterion_main, Criterion};
use folio_editor::{tree, BlockPatch, ColumnRef, Direction};
use folio_model::{Block, Column, IdGenerator};

/// 200 top-level blocks, every fifth one a three-column layout holding a
/// nested layout of its own
fn large_report() -> Vec<Block> {
    let mut blocks = Vec::new();
    for i in 0..200 {
        if i % 5 == 0 {
            let columns = (0..3)
                .map(|c| {
                    let mut column = Column::new(format!("l{}-c{}", i, c), if c == 2 { 34 } else { 33 });
                    column.blocks.push(Block::text(format!("l{}-c{}-t", i, c), "nested"));
                    column.blocks.push(Block::layout(
                        format!("l{}-c{}-inner", i, c),
                        vec![Column::new(format!("l{}-c{}-inner-a", i, c), 50), Column::new(format!("l{}-c{}-inner-b", i, c), 50)],
                    ));
                    column
                })
                .collect();
            blocks.push(Block::layout(format!("l{}", i), columns));
        } else {
            blocks.push(Block::code(format!("b{}", i), "python", "print('hello')"));
        }
    }
    blocks
}

fn update_deep_block(c: &mut Criterion) {
    let blocks = large_report();
    let patch = BlockPatch::content("edited");

    c.bench_function("update_deep_block", |b| {
        b.iter(|| tree::update(black_box(blocks.clone()), "l195-c2-t", &patch))
    });
}

fn duplicate_layout(c: &mut Criterion) {
    let blocks = large_report();

    c.bench_function("duplicate_layout", |b| {
        b.iter(|| {
            let mut ids = IdGenerator::new("bench");
            tree::duplicate(black_box(blocks.clone()), "l100", &mut ids)
        })
    });
}

fn resize_nested_column(c: &mut Criterion) {
    let blocks = large_report();
    let target = ColumnRef::new("l150-c1-inner", "l150-c1-inner-a");

    c.bench_function("resize_nested_column", |b| {
        b.iter(|| tree::resize_column(black_box(blocks.clone()), &target, 70))
    });
}

fn move_last_block(c: &mut Criterion) {
    let blocks = large_report();

    c.bench_function("move_last_block", |b| {
        b.iter(|| tree::move_vertical(black_box(blocks.clone()), "b199", Direction::Up))
    });
}

criterion_group!(
    benches,
    update_deep_block,
    duplicate_layout,
    resize_nested_column,
    move_last_block
);
criterion_main!(benches);
