//! Merge engine: bind one compiled template to every row of a RowSet

use crate::rowset::{RowSet, RowView};
use crate::template::CompiledTemplate;
use serde::{Deserialize, Serialize};

/// Reserved header supplying the recipient key when present
pub const RECIPIENT_FIELD: &str = "email";

/// One row's final substituted output, paired with its recipient key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedMessage {
    /// Value of the reserved `email` field, or the row's positional index
    pub recipient: String,
    /// Rendered message body
    pub content: String,
    /// Placeholder names that had no matching header (non-fatal)
    pub unresolved: Vec<String>,
}

/// Render every row of the RowSet, preserving RowSet order.
///
/// Pure and total: the output always has exactly one message per row.
/// Callers with no selected template compile the empty string, which renders
/// an empty body per row.
pub fn merge(rows: &RowSet, template: &CompiledTemplate) -> Vec<RenderedMessage> {
    rows.iter()
        .enumerate()
        .map(|(index, row)| render_row(index, &row, template))
        .collect()
}

/// Render a single row by index: the preview sink's lookup.
///
/// Shares the batch path, so the result agrees byte-for-byte with the
/// message `merge` produces for the same row.
pub fn render_one(
    rows: &RowSet,
    index: usize,
    template: &CompiledTemplate,
) -> Option<RenderedMessage> {
    rows.row(index).map(|row| render_row(index, &row, template))
}

fn render_row(index: usize, row: &RowView<'_>, template: &CompiledTemplate) -> RenderedMessage {
    let (content, unresolved) = template.render_traced(row);
    let recipient = match row.get(RECIPIENT_FIELD) {
        Some(value) => value.to_string(),
        None => index.to_string(),
    };

    RenderedMessage {
        recipient,
        content,
        unresolved,
    }
}
