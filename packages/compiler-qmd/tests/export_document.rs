//! Exporting a document built through the editing API

use folio_compiler_qmd::{compile_to_qmd, AssetContent, CompileOptions};
use folio_editor::{BlockPatch, ColumnRef, DatasetUpload, DocumentState, EditorConfig, MetadataPatch};
use folio_model::BlockType;

#[test]
fn test_export_edited_document() -> anyhow::Result<()> {
    let mut state = DocumentState::new(EditorConfig::default());
    state.update_metadata(MetadataPatch::title("Weekly"));

    let intro = state.add_block(BlockType::Text, None).unwrap();
    state.update_block(&intro, BlockPatch::content("Numbers for the week."));

    let layout = state.add_block(BlockType::Layout, None).unwrap();
    let columns: Vec<String> = state
        .find_block(&layout)
        .and_then(|b| b.columns())
        .map(|cols| cols.iter().map(|c| c.id.clone()).collect())
        .unwrap_or_default();
    let chart = state
        .add_block(BlockType::Code, Some(ColumnRef::new(&layout, &columns[0])))
        .unwrap();
    state.update_block(&chart, BlockPatch::content("df.plot()"));
    state.resize_column(&layout, &columns[0], 65);

    state.add_dataset(DatasetUpload {
        name: "week.csv".to_string(),
        content: b"day,total\nmon,3\n".to_vec(),
        preview: Vec::new(),
    });

    let bundle = compile_to_qmd(
        state.blocks(),
        state.metadata(),
        state.datasets(),
        state.content_store(),
        CompileOptions::default(),
    )?;

    assert!(bundle.source.starts_with("---\ntitle: \"Weekly\"\n"));
    assert!(bundle.source.contains("\nNumbers for the week.\n"));
    assert!(bundle.source.contains("::: {.column width=\"65%\"}\n\n```{python}\ndf.plot()\n```\n"));
    assert!(bundle.source.contains("::: {.column width=\"35%\"}"));
    assert_eq!(
        bundle.asset("data/week.csv").map(|a| &a.content),
        Some(&AssetContent::Bytes(b"day,total\nmon,3\n".to_vec()))
    );
    Ok(())
}
