// ABOUTME: Library crate for mdb2sqlite
// ABOUTME: Exports the source boundary, the exporter, and the error taxonomy

pub mod error;
pub mod export;
pub mod source;

pub use error::{ExportError, Result};
pub use export::Exporter;
pub use source::json::JsonDatabase;
