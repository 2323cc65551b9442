use crate::context::{AssetContent, CompileOptions, CompilerContext, ExportBundle};
use crate::errors::CompileError;
use crate::front_matter::{compile_stylesheet, generate_front_matter};
use folio_model::{Block, BlockKind, ChunkOptions, Column, Dataset, DatasetContentStore, ReportMetadata};

/// Compile a report to Quarto source. Dataset bytes are read from `store`
/// by dataset id and shipped under `data/`.
pub fn compile_to_qmd(
    blocks: &[Block],
    metadata: &ReportMetadata,
    datasets: &[Dataset],
    store: &dyn DatasetContentStore,
    options: CompileOptions,
) -> Result<ExportBundle, CompileError> {
    let ctx = CompilerContext::new(options);

    ctx.add(&generate_front_matter(metadata));
    compile_stylesheet(metadata, &ctx);

    for dataset in datasets {
        compile_dataset(dataset, store, &ctx)?;
    }

    compile_blocks(blocks, &ctx)?;

    let bundle = ctx.into_bundle();
    tracing::debug!(
        "compiled {} top-level blocks into {} bytes and {} assets",
        blocks.len(),
        bundle.source.len(),
        bundle.assets.len()
    );
    Ok(bundle)
}

fn compile_dataset(dataset: &Dataset, store: &dyn DatasetContentStore, ctx: &CompilerContext) -> Result<(), CompileError> {
    let content = store
        .get(&dataset.id)?
        .ok_or_else(|| CompileError::MissingDatasetContent(dataset.name.clone()))?;
    ctx.add_asset(format!("data/{}", dataset.name), AssetContent::Bytes(content));
    Ok(())
}

fn compile_blocks(blocks: &[Block], ctx: &CompilerContext) -> Result<(), CompileError> {
    for block in blocks {
        compile_block(block, ctx)?;
    }
    Ok(())
}

fn compile_block(block: &Block, ctx: &CompilerContext) -> Result<(), CompileError> {
    match &block.kind {
        BlockKind::Text => ctx.add_section(&block.content),
        BlockKind::Code { language } => compile_code(block, language, ctx),
        BlockKind::Image => compile_image(block, ctx)?,
        BlockKind::Html => {
            ctx.add_section("```{=html}");
            ctx.add_line(&block.content);
            ctx.add_line("```");
        }
        BlockKind::PageBreak => ctx.add_section("{{< pagebreak >}}"),
        BlockKind::Layout { columns } => {
            ctx.add_section("::::: {.columns}");
            for column in columns {
                compile_column(column, ctx)?;
            }
            ctx.add_section(":::::");
        }
    }
    Ok(())
}

fn compile_column(column: &Column, ctx: &CompilerContext) -> Result<(), CompileError> {
    ctx.add_section(&format!("::: {{.column width=\"{}%\"}}", column.width));
    compile_blocks(&column.blocks, ctx)?;
    ctx.add_section(":::");
    Ok(())
}

fn compile_code(block: &Block, language: &str, ctx: &CompilerContext) {
    ctx.add_section(&format!("```{{{}}}", language));
    if ctx.options.include_chunk_options {
        if let Some(chunk) = &block.options.chunk {
            compile_chunk_options(chunk, ctx);
        }
    }
    ctx.add_line(&block.content);
    ctx.add_line("```");
}

/// Only flags the author set explicitly; Quarto supplies the rest
fn compile_chunk_options(chunk: &ChunkOptions, ctx: &CompilerContext) {
    let flags = [
        ("echo", chunk.echo),
        ("message", chunk.message),
        ("warning", chunk.warning),
        ("output", chunk.output),
    ];
    for (name, value) in flags {
        if let Some(value) = value {
            ctx.add_line(&format!("#| {}: {}", name, value));
        }
    }
}

fn compile_image(block: &Block, ctx: &CompilerContext) -> Result<(), CompileError> {
    let source = block.content.trim();
    if source.is_empty() {
        return Ok(());
    }
    let caption = block.options.caption.as_deref().unwrap_or_default();

    let target = if source.starts_with("data:image") {
        let (extension, data) =
            parse_image_data_url(source).ok_or_else(|| CompileError::InvalidDataUrl(block.id.clone()))?;
        let path = format!("images/image-{}.{}", block.id, extension);
        ctx.add_asset(path.clone(), AssetContent::Base64(data.to_string()));
        path
    } else {
        source.to_string()
    };

    ctx.add_section(&format!("![{}]({})", caption, target));
    Ok(())
}

/// Split `data:image/<type>;base64,<payload>` into a file extension and the
/// payload
fn parse_image_data_url(url: &str) -> Option<(String, &str)> {
    let rest = url.strip_prefix("data:image/")?;
    let (mime, data) = rest.split_once(";base64,")?;

    let subtype = mime.split('+').next().unwrap_or_default();
    if subtype.is_empty() || !subtype.chars().all(|c| c.is_ascii_alphanumeric()) {
        return None;
    }
    let valid_payload = data
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '/' | '='));
    if data.is_empty() || !valid_payload {
        return None;
    }

    let extension = match subtype.to_ascii_lowercase().as_str() {
        "jpeg" => "jpg".to_string(),
        other => other.to_string(),
    };
    Some((extension, data))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_data_url() {
        assert_eq!(
            parse_image_data_url("data:image/png;base64,iVBORw0KGgo="),
            Some(("png".to_string(), "iVBORw0KGgo="))
        );
        assert_eq!(
            parse_image_data_url("data:image/jpeg;base64,/9j/4AAQ"),
            Some(("jpg".to_string(), "/9j/4AAQ"))
        );
        assert_eq!(
            parse_image_data_url("data:image/svg+xml;base64,PHN2Zz4="),
            Some(("svg".to_string(), "PHN2Zz4="))
        );
    }

    #[test]
    fn test_rejects_bad_data_urls() {
        assert_eq!(parse_image_data_url("data:image/png,rawbytes"), None);
        assert_eq!(parse_image_data_url("data:image/;base64,AAAA"), None);
        assert_eq!(parse_image_data_url("data:image/png;base64,"), None);
        assert_eq!(parse_image_data_url("data:image/png;base64,not base64!"), None);
    }
}
