//! Output sinks: route a rendered batch to an export strategy
//!
//! Every sink consumes the full message list as a snapshot and preserves its
//! order. The sinks are one-shot and stateless; per-recipient delivery
//! failures are collected into a report instead of aborting the batch.

use crate::error::{Error, Result};
use crate::merge::RenderedMessage;
use printpdf::{BuiltinFont, Mm, PdfDocument, PdfDocumentReference};
use serde::Serialize;
use std::fs;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

/// Separator between messages in the plain-text bundle. Fixed rather than
/// inferred, so in-content blank lines never shift message boundaries.
pub const BUNDLE_SEPARATOR: &str = "\n\n";

/// Default artifact name for the plain-text bundle (`text/plain`)
pub const TEXT_BUNDLE_FILENAME: &str = "generated_emails.txt";

/// Default artifact name for the paginated document (`application/pdf`)
pub const DOCUMENT_FILENAME: &str = "generated_emails.pdf";

/// Concatenate all message bodies in batch order
pub fn bundle_text(messages: &[RenderedMessage]) -> String {
    messages
        .iter()
        .map(|m| m.content.as_str())
        .collect::<Vec<_>>()
        .join(BUNDLE_SEPARATOR)
}

/// Write the plain-text bundle to one artifact
pub fn write_text_bundle<P: AsRef<Path>>(messages: &[RenderedMessage], path: P) -> Result<()> {
    fs::write(path, bundle_text(messages))?;
    Ok(())
}

/// Render the batch as PDF bytes, one page per message.
///
/// A new page starts before each message except the first; a message whose
/// lines run past the bottom margin continues on extra pages. An empty batch
/// produces a document with a single empty page rather than failing.
pub fn document_bytes(messages: &[RenderedMessage]) -> Result<Vec<u8>> {
    let doc = build_document(messages)?;
    let mut writer = BufWriter::new(Vec::new());
    doc.save(&mut writer).map_err(|e| Error::Document {
        message: e.to_string(),
    })?;
    writer.into_inner().map_err(|e| Error::Document {
        message: e.error().to_string(),
    })
}

/// Write the paginated document to one artifact
pub fn write_document<P: AsRef<Path>>(messages: &[RenderedMessage], path: P) -> Result<()> {
    fs::write(path, document_bytes(messages)?)?;
    Ok(())
}

fn build_document(messages: &[RenderedMessage]) -> Result<PdfDocumentReference> {
    // A4 portrait, top-down line layout
    let (doc, first_page, first_layer) =
        PdfDocument::new("Generated Emails", Mm(210.0), Mm(297.0), "Layer 1");
    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| Error::Document {
            message: e.to_string(),
        })?;

    let mut layer = doc.get_page(first_page).get_layer(first_layer);
    for (index, message) in messages.iter().enumerate() {
        if index > 0 {
            let (page, page_layer) = doc.add_page(Mm(210.0), Mm(297.0), "Layer 1");
            layer = doc.get_page(page).get_layer(page_layer);
        }

        let mut y = 282.0;
        for line in message.content.lines() {
            if y < 15.0 {
                let (page, page_layer) = doc.add_page(Mm(210.0), Mm(297.0), "Layer 1");
                layer = doc.get_page(page).get_layer(page_layer);
                y = 282.0;
            }
            layer.use_text(line, 11.0, Mm(10.0), Mm(y), &font);
            y -= 6.0;
        }
    }

    Ok(doc)
}

/// Outcome of per-recipient delivery: successes and failures side by side
#[derive(Debug, Clone, Default, Serialize)]
pub struct DeliveryReport {
    /// Files written, in batch order
    pub delivered: Vec<PathBuf>,
    /// Recipients whose delivery failed, with the reason
    pub failures: Vec<DeliveryFailure>,
}

/// One recipient's failed delivery
#[derive(Debug, Clone, Serialize)]
pub struct DeliveryFailure {
    pub recipient: String,
    pub reason: String,
}

impl DeliveryReport {
    pub fn all_delivered(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Deliver each message to its own file under `dir`.
///
/// One file's write failure is recorded in the report and never aborts the
/// remaining deliveries. Failing to create `dir` itself is batch-fatal since
/// no message could be delivered at all.
pub fn deliver_each<P: AsRef<Path>>(
    messages: &[RenderedMessage],
    dir: P,
) -> Result<DeliveryReport> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir)?;

    let mut report = DeliveryReport::default();
    for (index, message) in messages.iter().enumerate() {
        let path = dir.join(delivery_file_name(index, &message.recipient));
        match fs::write(&path, message.content.as_bytes()) {
            Ok(()) => report.delivered.push(path),
            Err(e) => report.failures.push(DeliveryFailure {
                recipient: message.recipient.clone(),
                reason: e.to_string(),
            }),
        }
    }

    Ok(report)
}

/// Deterministic per-recipient file name: 1-based ordinal plus the recipient
/// key with filesystem-hostile characters replaced
pub fn delivery_file_name(index: usize, recipient: &str) -> String {
    let sanitized: String = recipient
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_' | '@') {
                c
            } else {
                '_'
            }
        })
        .collect();

    if sanitized.is_empty() {
        format!("{:03}.txt", index + 1)
    } else {
        format!("{:03}_{}.txt", index + 1, sanitized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(recipient: &str, content: &str) -> RenderedMessage {
        RenderedMessage {
            recipient: recipient.to_string(),
            content: content.to_string(),
            unresolved: Vec::new(),
        }
    }

    #[test]
    fn test_bundle_text_joins_with_fixed_separator() {
        let messages = vec![message("a", "first\nbody"), message("b", "second")];
        assert_eq!(bundle_text(&messages), "first\nbody\n\nsecond");
    }

    #[test]
    fn test_bundle_text_empty_batch() {
        assert_eq!(bundle_text(&[]), "");
    }

    #[test]
    fn test_delivery_file_name_sanitizes() {
        assert_eq!(delivery_file_name(0, "a@x.com"), "001_a@x.com.txt");
        assert_eq!(delivery_file_name(1, "b c/d"), "002_b_c_d.txt");
        assert_eq!(delivery_file_name(2, ""), "003.txt");
    }

    #[test]
    fn test_deliver_each_writes_one_file_per_message() {
        let dir = tempfile::tempdir().unwrap();
        let messages = vec![message("a@x.com", "hello a"), message("b@y.com", "hello b")];

        let report = deliver_each(&messages, dir.path()).unwrap();

        assert!(report.all_delivered());
        assert_eq!(report.delivered.len(), 2);
        let body = fs::read_to_string(&report.delivered[0]).unwrap();
        assert_eq!(body, "hello a");
    }

    #[test]
    fn test_deliver_each_isolates_failures() {
        let dir = tempfile::tempdir().unwrap();
        // Occupy the first message's target path with a directory so its
        // write fails while the second delivery still goes through
        fs::create_dir(dir.path().join(delivery_file_name(0, "bad"))).unwrap();

        let messages = vec![message("bad", "never lands"), message("ok", "lands")];
        let report = deliver_each(&messages, dir.path()).unwrap();

        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].recipient, "bad");
        assert_eq!(report.delivered.len(), 1);
        assert!(report.delivered[0].ends_with(delivery_file_name(1, "ok")));
    }

    #[test]
    fn test_document_empty_batch_is_single_empty_page() {
        let bytes = document_bytes(&[]).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_document_renders_batch() {
        let messages = vec![
            message("a", "Dear Ana,\nline two"),
            message("b", "Dear Bo,"),
        ];
        let bytes = document_bytes(&messages).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }
}
