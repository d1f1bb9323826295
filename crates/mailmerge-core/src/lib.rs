//! mailmerge-core: Library for batch-personalizing messages from tabular data
//!
//! This library provides functionality to:
//! - Validate and parse uploaded CSV text into a header-indexed row set
//! - Compile message templates with `{{name}}` placeholders into resolvers
//! - Merge a compiled template against every row, one message per recipient
//! - Dispatch the rendered batch to output sinks (plain-text bundle,
//!   paginated PDF document, per-recipient files, single-row preview)

pub mod error;
pub mod ingest;
pub mod merge;
pub mod parser;
pub mod rowset;
pub mod sink;
pub mod template;

pub use error::{Error, Result};
pub use ingest::ingest;
pub use merge::{merge, render_one, RenderedMessage, RECIPIENT_FIELD};
pub use parser::parse_csv;
pub use rowset::{Row, RowSet, RowView};
pub use sink::{
    bundle_text, deliver_each, document_bytes, write_document, write_text_bundle,
    DeliveryFailure, DeliveryReport, BUNDLE_SEPARATOR, DOCUMENT_FILENAME, TEXT_BUNDLE_FILENAME,
};
pub use template::{compile, CompiledTemplate};
