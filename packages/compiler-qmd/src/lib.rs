//! # Folio QMD Compiler
//!
//! Turns a report into Quarto source plus the files it references.
//!
//! ```text
//! (blocks, metadata, datasets) ─→ compile_to_qmd ─→ ExportBundle
//!                                                     ├─ source   report.qmd text
//!                                                     └─ assets   images/…, data/…, styles.css
//! ```
//!
//! Packing the bundle into an archive is left to the caller.

mod compiler;
mod context;
mod errors;
mod front_matter;

pub use compiler::compile_to_qmd;
pub use context::{AssetContent, CompileOptions, CompilerContext, ExportAsset, ExportBundle};
pub use errors::CompileError;
pub use front_matter::generate_front_matter;

#[cfg(test)]
mod tests;
