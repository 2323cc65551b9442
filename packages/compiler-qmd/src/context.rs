use serde::{Deserialize, Serialize};
use std::cell::RefCell;

/// Options for QMD compilation
#[derive(Debug, Clone)]
pub struct CompileOptions {
    /// File name of the generated source inside the bundle
    pub source_name: String,
    /// Whether to emit `#|` execution options on code chunks
    pub include_chunk_options: bool,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            source_name: "report.qmd".to_string(),
            include_chunk_options: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "encoding", content = "data", rename_all = "lowercase")]
pub enum AssetContent {
    Text(String),
    Bytes(Vec<u8>),
    /// Still base64 encoded, as lifted out of a data URL
    Base64(String),
}

/// A file that ships next to the generated source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportAsset {
    /// Path relative to the source file, e.g. `images/image-b1.png`
    pub path: String,
    pub content: AssetContent,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportBundle {
    pub source_name: String,
    pub source: String,
    pub assets: Vec<ExportAsset>,
}

impl ExportBundle {
    pub fn asset(&self, path: &str) -> Option<&ExportAsset> {
        self.assets.iter().find(|a| a.path == path)
    }
}

/// Compilation context for managing state during code generation
pub struct CompilerContext {
    buffer: RefCell<String>,
    assets: RefCell<Vec<ExportAsset>>,
    pub options: CompileOptions,
}

impl CompilerContext {
    pub fn new(options: CompileOptions) -> Self {
        Self {
            buffer: RefCell::new(String::new()),
            assets: RefCell::new(Vec::new()),
            options,
        }
    }

    pub fn add(&self, text: &str) {
        self.buffer.borrow_mut().push_str(text);
    }

    pub fn add_line(&self, text: &str) {
        self.add(text);
        self.add("\n");
    }

    /// Content surrounded by blank lines, so adjacent blocks never run together
    pub fn add_section(&self, text: &str) {
        self.add("\n");
        self.add_line(text);
    }

    pub fn add_asset(&self, path: impl Into<String>, content: AssetContent) {
        let path = path.into();
        let mut assets = self.assets.borrow_mut();
        if let Some(existing) = assets.iter_mut().find(|a| a.path == path) {
            tracing::debug!("asset {} written twice, keeping the latest", path);
            existing.content = content;
        } else {
            assets.push(ExportAsset { path, content });
        }
    }

    pub fn get_output(&self) -> String {
        self.buffer.borrow().clone()
    }

    pub fn into_bundle(self) -> ExportBundle {
        ExportBundle {
            source_name: self.options.source_name,
            source: self.buffer.into_inner(),
            assets: self.assets.into_inner(),
        }
    }
}
