//! # Document Codec
//!
//! Pure conversion between the document text and the [`Document`] model.
//!
//! ## Dialects
//!
//! | Dialect | Read | Write | Notes |
//! |---------|------|-------|-------|
//! | Structured JSON | yes | yes | `{ lists: [...], activeListId }`, 2-space indent |
//! | Single-status JSON | yes | no | tasks with a fixed `todo/doing/done` status |
//! | Checkbox lines | yes | no | `[ ]`, `[*]`, `[x]` one task per line |
//!
//! Decoding never fails. [`classify`] runs the dialect checks in order and
//! returns a tagged [`Dialect`]; [`decode`] folds that into a document. Text
//! in a legacy dialect is upgraded to structured JSON on the first mutation.
//!
//! ## Round trip
//!
//! `decode(&encode(&doc)?) == doc` for every document the structured check
//! accepts. Decoded documents are trusted as-is: invariant violations are
//! logged, not repaired.

mod legacy;
mod structured;

use thiserror::Error;
use tracing::{debug, warn};

use crate::domain::{Document, Task};

pub use legacy::{parse_checkbox_lines, parse_single_status};

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("Failed to encode document: {0}")]
    Encode(#[source] serde_json::Error),
}

/// Which dialect a text was recognized as, with its decoded payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dialect {
    /// Blank or whitespace-only text
    Empty,
    Structured(Document),
    SingleStatusJson(Vec<Task>),
    CheckboxLines(Vec<Task>),
}

impl Dialect {
    pub fn name(&self) -> &'static str {
        match self {
            Dialect::Empty => "empty",
            Dialect::Structured(_) => "structured",
            Dialect::SingleStatusJson(_) => "single-status-json",
            Dialect::CheckboxLines(_) => "checkbox-lines",
        }
    }

    /// True for dialects that are rewritten as structured JSON on first mutation
    pub fn is_legacy(&self) -> bool {
        matches!(self, Dialect::SingleStatusJson(_) | Dialect::CheckboxLines(_))
    }

    pub fn into_document(self) -> Document {
        match self {
            Dialect::Empty => Document::empty(),
            Dialect::Structured(doc) => doc,
            Dialect::SingleStatusJson(tasks) | Dialect::CheckboxLines(tasks) => {
                Document::from_tasks(tasks)
            }
        }
    }
}

/// Recognizes the dialect of `raw` and decodes it
pub fn classify(raw: &str) -> Dialect {
    if raw.trim().is_empty() {
        return Dialect::Empty;
    }

    if let Ok(value) = serde_json::from_str::<serde_json::Value>(raw) {
        match structured::check(&value) {
            structured::ShapeCheck::Valid(doc) | structured::ShapeCheck::Salvaged(doc) => {
                return Dialect::Structured(doc);
            }
            structured::ShapeCheck::NotStructured => {}
        }
        if let Some(tasks) = parse_single_status(&value) {
            return Dialect::SingleStatusJson(tasks);
        }
        debug!("text is JSON but in no known dialect, trying checkbox lines");
    }

    Dialect::CheckboxLines(parse_checkbox_lines(raw))
}

/// Decodes document text in any supported dialect
pub fn decode(raw: &str) -> Document {
    let dialect = classify(raw);
    debug!(dialect = dialect.name(), "decoded document text");

    let doc = dialect.into_document();
    for violation in doc.violations() {
        warn!("decoded document violates an invariant: {violation}");
    }
    doc
}

/// Encodes a document in the structured dialect
pub fn encode(doc: &Document) -> Result<String, CodecError> {
    structured::encode(doc)
}
