use crate::context::{AssetContent, CompilerContext};
use folio_model::{OutputFormat, ReportMetadata};

pub const STYLESHEET_PATH: &str = "styles.css";

/// YAML header for the report. Custom CSS is referenced by path only; the
/// stylesheet itself is added as an asset by the compiler.
pub fn generate_front_matter(metadata: &ReportMetadata) -> String {
    let mut yaml = String::from("---\n");
    yaml.push_str(&format!("title: \"{}\"\n", escape(&metadata.title)));
    yaml.push_str(&format!("author: \"{}\"\n", escape(&metadata.author)));
    yaml.push_str(&format!("date: \"{}\"\n", escape(&metadata.date)));

    let options = format_options(metadata);
    if options.is_empty() {
        yaml.push_str(&format!("format: {}\n", metadata.format));
    } else {
        yaml.push_str("format:\n");
        yaml.push_str(&format!("  {}:\n", metadata.format));
        for option in options {
            yaml.push_str(&format!("    {}\n", option));
        }
    }

    yaml.push_str("---\n");
    yaml
}

fn format_options(metadata: &ReportMetadata) -> Vec<String> {
    let mut options = Vec::new();
    match metadata.format {
        OutputFormat::Pdf => {
            if let Some(pdf) = &metadata.styling.pdf {
                if pdf.toc == Some(true) {
                    options.push("toc: true".to_string());
                }
                if pdf.number_sections == Some(true) {
                    options.push("number-sections: true".to_string());
                }
                if let Some(margin) = pdf.margin.as_deref().filter(|m| !m.trim().is_empty()) {
                    options.push(format!("geometry: \"margin={}\"", escape(margin.trim())));
                }
            }
        }
        OutputFormat::Html => {
            if custom_css(metadata).is_some() {
                options.push(format!("css: {}", STYLESHEET_PATH));
            }
        }
        OutputFormat::Docx => {}
    }
    options
}

pub(crate) fn custom_css(metadata: &ReportMetadata) -> Option<&str> {
    if metadata.format != OutputFormat::Html {
        return None;
    }
    metadata
        .styling
        .html
        .as_ref()
        .and_then(|html| html.css_content.as_deref())
        .filter(|css| !css.trim().is_empty())
}

pub(crate) fn compile_stylesheet(metadata: &ReportMetadata, ctx: &CompilerContext) {
    if let Some(css) = custom_css(metadata) {
        ctx.add_asset(STYLESHEET_PATH, AssetContent::Text(css.to_string()));
    }
}

fn escape(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}
