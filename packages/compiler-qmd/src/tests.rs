use crate::{compile_to_qmd, generate_front_matter, AssetContent, CompileError, CompileOptions, ExportBundle};
use folio_model::{
    Block, BlockKind, BlockOptions, ChunkOptions, Column, Dataset, DatasetContentStore, DatasetKind, HtmlStyling,
    MemoryContentStore, OutputFormat, PdfStyling, ReportMetadata, Styling,
};

fn metadata(format: OutputFormat) -> ReportMetadata {
    ReportMetadata {
        title: "Fleet Report".to_string(),
        author: "Ops".to_string(),
        date: "2024-10-01".to_string(),
        format,
        styling: Styling::default(),
    }
}

fn compile(blocks: &[Block]) -> ExportBundle {
    compile_to_qmd(
        blocks,
        &metadata(OutputFormat::Html),
        &[],
        &MemoryContentStore::new(),
        CompileOptions::default(),
    )
    .expect("Failed to compile")
}

#[test]
fn test_front_matter() {
    let yaml = generate_front_matter(&metadata(OutputFormat::Docx));
    assert_eq!(
        yaml,
        "---\ntitle: \"Fleet Report\"\nauthor: \"Ops\"\ndate: \"2024-10-01\"\nformat: docx\n---\n"
    );
}

#[test]
fn test_front_matter_escapes_quotes() {
    let mut meta = metadata(OutputFormat::Html);
    meta.title = "The \"best\" report".to_string();
    assert!(generate_front_matter(&meta).contains("title: \"The \\\"best\\\" report\"\n"));
}

#[test]
fn test_pdf_options() {
    let mut meta = metadata(OutputFormat::Pdf);
    meta.styling.pdf = Some(PdfStyling {
        toc: Some(true),
        number_sections: Some(false),
        margin: Some("1in".to_string()),
    });

    let yaml = generate_front_matter(&meta);
    println!("Generated front matter:\n{}", yaml);
    assert!(yaml.contains("format:\n  pdf:\n    toc: true\n    geometry: \"margin=1in\"\n"));
    assert!(!yaml.contains("number-sections"));
}

#[test]
fn test_custom_css_becomes_stylesheet() {
    let mut meta = metadata(OutputFormat::Html);
    meta.styling.html = Some(HtmlStyling {
        css_content: Some("h1 { color: navy; }".to_string()),
    });

    let bundle = compile_to_qmd(&[], &meta, &[], &MemoryContentStore::new(), CompileOptions::default()).unwrap();
    assert!(bundle.source.contains("format:\n  html:\n    css: styles.css\n"));
    assert_eq!(
        bundle.asset("styles.css").unwrap().content,
        AssetContent::Text("h1 { color: navy; }".to_string())
    );
}

#[test]
fn test_css_ignored_for_other_formats() {
    let mut meta = metadata(OutputFormat::Docx);
    meta.styling.html = Some(HtmlStyling {
        css_content: Some("p {}".to_string()),
    });

    let bundle = compile_to_qmd(&[], &meta, &[], &MemoryContentStore::new(), CompileOptions::default()).unwrap();
    assert!(bundle.assets.is_empty());
    assert!(bundle.source.contains("format: docx\n"));
}

#[test]
fn test_block_variants() {
    let blocks = vec![
        Block::text("t", "## Summary"),
        Block::code("k", "r", "plot(cars)"),
        Block::new("h", BlockKind::Html).with_content("<div>hi</div>"),
        Block::new("p", BlockKind::PageBreak),
        Block::new("i", BlockKind::Image)
            .with_content("https://example.com/chart.png")
            .with_options(BlockOptions::with_caption("Chart")),
        Block::new("empty", BlockKind::Image),
    ];

    let bundle = compile(&blocks);
    println!("Generated source:\n{}", bundle.source);

    let body = bundle.source.split("---\n").nth(2).unwrap();
    assert_eq!(
        body,
        "\n## Summary\n\n```{r}\nplot(cars)\n```\n\n```{=html}\n<div>hi</div>\n```\n\n{{< pagebreak >}}\n\n![Chart](https://example.com/chart.png)\n"
    );
    assert_eq!(bundle.source_name, "report.qmd");
}

#[test]
fn test_chunk_options() {
    let block = Block::code("k", "python", "print(1)").with_options(BlockOptions::with_chunk(ChunkOptions {
        echo: Some(false),
        warning: Some(false),
        ..ChunkOptions::default()
    }));

    let bundle = compile(std::slice::from_ref(&block));
    assert!(bundle
        .source
        .contains("```{python}\n#| echo: false\n#| warning: false\nprint(1)\n```\n"));

    let options = CompileOptions {
        include_chunk_options: false,
        ..CompileOptions::default()
    };
    let plain = compile_to_qmd(&[block], &metadata(OutputFormat::Html), &[], &MemoryContentStore::new(), options).unwrap();
    assert!(!plain.source.contains("#|"));
}

#[test]
fn test_nested_layout() {
    let mut left = Column::new("c1", 60);
    left.blocks.push(Block::text("a", "left side"));
    let mut right = Column::new("c2", 40);
    right
        .blocks
        .push(Block::layout("inner", vec![Column::new("c3", 100)]));

    let bundle = compile(&[Block::layout("l", vec![left, right])]);
    let body = bundle.source.split("---\n").nth(2).unwrap();
    assert_eq!(
        body,
        concat!(
            "\n::::: {.columns}\n",
            "\n::: {.column width=\"60%\"}\n",
            "\nleft side\n",
            "\n:::\n",
            "\n::: {.column width=\"40%\"}\n",
            "\n::::: {.columns}\n",
            "\n::: {.column width=\"100%\"}\n",
            "\n:::\n",
            "\n:::::\n",
            "\n:::\n",
            "\n:::::\n",
        )
    );
}

#[test]
fn test_data_url_image_becomes_asset() {
    let block = Block::new("img1", BlockKind::Image)
        .with_content("data:image/jpeg;base64,/9j/4AAQSkZJRg==")
        .with_options(BlockOptions::with_caption("Photo"));

    let bundle = compile(&[block]);
    assert!(bundle.source.contains("![Photo](images/image-img1.jpg)"));
    assert_eq!(
        bundle.asset("images/image-img1.jpg").unwrap().content,
        AssetContent::Base64("/9j/4AAQSkZJRg==".to_string())
    );
}

#[test]
fn test_malformed_data_url_is_an_error() {
    let block = Block::new("img1", BlockKind::Image).with_content("data:image/png;base64,%%%");
    let result = compile_to_qmd(
        &[block],
        &metadata(OutputFormat::Html),
        &[],
        &MemoryContentStore::new(),
        CompileOptions::default(),
    );
    assert_eq!(result, Err(CompileError::InvalidDataUrl("img1".to_string())));
}

fn dataset(id: &str, name: &str) -> Dataset {
    Dataset {
        id: id.to_string(),
        name: name.to_string(),
        kind: DatasetKind::from_file_name(name),
        size: 0,
        preview: Vec::new(),
    }
}

#[test]
fn test_datasets_come_from_store() -> anyhow::Result<()> {
    let mut store = MemoryContentStore::new();
    store.put("d1", b"a,b\n1,2\n".to_vec())?;

    let bundle = compile_to_qmd(
        &[],
        &metadata(OutputFormat::Html),
        &[dataset("d1", "values.csv")],
        &store,
        CompileOptions::default(),
    )?;
    assert_eq!(
        bundle.asset("data/values.csv").unwrap().content,
        AssetContent::Bytes(b"a,b\n1,2\n".to_vec())
    );
    Ok(())
}

#[test]
fn test_missing_dataset_content() {
    let result = compile_to_qmd(
        &[],
        &metadata(OutputFormat::Html),
        &[dataset("d9", "gone.json")],
        &MemoryContentStore::new(),
        CompileOptions::default(),
    );
    assert_eq!(result, Err(CompileError::MissingDatasetContent("gone.json".to_string())));
}
