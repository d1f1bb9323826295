//! Template compilation and placeholder resolution
//!
//! Templates are plain text with `{{name}}` placeholders. Compilation scans
//! the text into literal and placeholder segments; no pattern is ever built
//! from a column name, so a header like `a.b` matches only the literal text
//! `{{a.b}}`.
//!
//! Unresolved-placeholder policy: a placeholder whose name is not a header
//! stays literal in the output (so authors can spot typos) and its name is
//! reported as non-fatal metadata alongside the rendered text. This policy
//! is uniform across single-row preview and batch rendering.

use crate::rowset::RowView;

#[derive(Debug, Clone, PartialEq)]
enum Segment {
    Literal(String),
    /// `name` is the trimmed lookup key; `raw` is the original spelling
    /// (braces included) so unresolved placeholders reproduce byte-for-byte
    Placeholder { name: String, raw: String },
}

/// A template text turned into a reusable row-to-string resolver.
///
/// Stateless and read-only; recompile whenever the template text changes.
#[derive(Debug, Clone, Default)]
pub struct CompiledTemplate {
    segments: Vec<Segment>,
}

/// Compile template text. Total for any input: an unmatched `{{`, or a
/// candidate with a stray `}` before the closing braces, stays literal.
pub fn compile(text: &str) -> CompiledTemplate {
    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut rest = text;

    while let Some(start) = rest.find("{{") {
        let after = &rest[start + 2..];
        match after.find("}}") {
            Some(end) if !after[..end].contains('}') => {
                literal.push_str(&rest[..start]);
                if !literal.is_empty() {
                    segments.push(Segment::Literal(std::mem::take(&mut literal)));
                }
                let inner = &after[..end];
                segments.push(Segment::Placeholder {
                    name: inner.trim().to_string(),
                    raw: format!("{{{{{inner}}}}}"),
                });
                rest = &after[end + 2..];
            }
            _ => {
                literal.push_str(&rest[..start + 2]);
                rest = &rest[start + 2..];
            }
        }
    }

    literal.push_str(rest);
    if !literal.is_empty() {
        segments.push(Segment::Literal(literal));
    }

    CompiledTemplate { segments }
}

impl CompiledTemplate {
    /// Render one row, leaving unresolved placeholders literal
    pub fn render(&self, row: &RowView<'_>) -> String {
        self.render_traced(row).0
    }

    /// Render one row and report unresolved placeholder names, deduplicated
    /// in first-occurrence order
    pub fn render_traced(&self, row: &RowView<'_>) -> (String, Vec<String>) {
        let mut out = String::new();
        let mut unresolved: Vec<String> = Vec::new();

        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Placeholder { name, raw } => match row.get(name) {
                    // Values are substituted verbatim: content is plain text
                    Some(value) => out.push_str(value),
                    None => {
                        out.push_str(raw);
                        if !unresolved.iter().any(|n| n == name) {
                            unresolved.push(name.clone());
                        }
                    }
                },
            }
        }

        (out, unresolved)
    }

    /// Placeholder names referenced by this template, deduplicated in
    /// first-occurrence order. Surfaced to editor collaborators for
    /// completion against the current header list.
    pub fn placeholders(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for segment in &self.segments {
            if let Segment::Placeholder { name, .. } = segment {
                if !names.contains(&name.as_str()) {
                    names.push(name);
                }
            }
        }
        names
    }
}
