use serde::{Deserialize, Serialize};

/// Target format handed to the document compiler
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Html,
    Pdf,
    Docx,
}

impl OutputFormat {
    pub const ALL: [OutputFormat; 3] = [OutputFormat::Html, OutputFormat::Pdf, OutputFormat::Docx];

    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Html => "html",
            OutputFormat::Pdf => "pdf",
            OutputFormat::Docx => "docx",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.as_str() == name)
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Document-level settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportMetadata {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub author: String,
    /// ISO date (`YYYY-MM-DD`)
    #[serde(default)]
    pub date: String,
    pub format: OutputFormat,
    #[serde(default, skip_serializing_if = "Styling::is_empty")]
    pub styling: Styling,
}

impl ReportMetadata {
    /// Metadata for a freshly opened editor, dated today
    pub fn untitled() -> Self {
        Self {
            title: "Untitled Report".to_string(),
            author: "Anonymous".to_string(),
            date: chrono::Local::now().format("%Y-%m-%d").to_string(),
            format: OutputFormat::Html,
            styling: Styling::default(),
        }
    }
}

/// Per-format styling options
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Styling {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html: Option<HtmlStyling>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pdf: Option<PdfStyling>,
}

impl Styling {
    pub fn is_empty(&self) -> bool {
        self.html.is_none() && self.pdf.is_none()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HtmlStyling {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub css_content: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PdfStyling {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub toc: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number_sections: Option<bool>,
    /// CSS-style length, e.g. `1in`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub margin: Option<String>,
}
