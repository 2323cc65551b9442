use serde::{Deserialize, Serialize};

/// Tabular file format of an uploaded dataset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatasetKind {
    Csv,
    Excel,
    Tsv,
    Json,
}

impl DatasetKind {
    /// Infer the kind from an uploaded file name. Anything unrecognized is treated as JSON.
    pub fn from_file_name(name: &str) -> Self {
        let lower = name.to_ascii_lowercase();
        if lower.ends_with(".csv") {
            DatasetKind::Csv
        } else if lower.ends_with(".xlsx") {
            DatasetKind::Excel
        } else if lower.ends_with(".tsv") {
            DatasetKind::Tsv
        } else {
            DatasetKind::Json
        }
    }

    /// Whether uploads of this kind are binary rather than text
    pub fn is_binary(&self) -> bool {
        matches!(self, DatasetKind::Excel)
    }
}

/// Metadata record for an uploaded dataset.
///
/// Raw bytes never live here; they are kept in a
/// [`DatasetContentStore`](crate::DatasetContentStore) keyed by `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub id: String,
    /// File name, e.g. `data.csv`
    pub name: String,
    #[serde(rename = "type")]
    pub kind: DatasetKind,
    /// Byte size of the stored content
    pub size: u64,
    /// First few rows, for display only
    #[serde(default)]
    pub preview: Vec<serde_json::Value>,
}
