//! Text edits and the atomic edit set.
//!
//! Routes accumulate edits into an `EditSet`; finalizing deduplicates,
//! rejects conflicts, and produces the one ordering that is safe to apply
//! sequentially in place: grouped by document, spans descending by start, so
//! earlier edits never shift later offsets.

use rustc_hash::FxHashSet;
use weft_common::Span;

/// A single text replacement.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextEdit {
    pub uri: String,
    pub span: Span,
    pub new_text: String,
}

impl TextEdit {
    pub fn new(uri: impl Into<String>, span: Span, new_text: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            span,
            new_text: new_text.into(),
        }
    }
}

/// Two edits disagree about the same text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditConflict {
    pub uri: String,
    pub span: Span,
}

/// An accumulating cross-document edit collection.
#[derive(Debug, Clone, Default)]
pub struct EditSet {
    edits: Vec<TextEdit>,
}

impl EditSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, edit: TextEdit) {
        self.edits.push(edit);
    }

    pub fn len(&self) -> usize {
        self.edits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    /// Deduplicate by `(uri, span, text)`, reject conflicting or overlapping
    /// replacements, and order for sequential in-place application:
    /// documents ascending, then span start descending.
    pub fn finalize(self) -> Result<Vec<TextEdit>, EditConflict> {
        let mut seen: FxHashSet<(String, Span, String)> = FxHashSet::default();
        let mut edits: Vec<TextEdit> = Vec::with_capacity(self.edits.len());
        for edit in self.edits {
            let key = (edit.uri.clone(), edit.span, edit.new_text.clone());
            if seen.insert(key) {
                edits.push(edit);
            }
        }

        // After identical-edit dedup, any remaining same-document overlap is
        // two strategies disagreeing about the same text.
        edits.sort_by(|a, b| (a.uri.as_str(), a.span).cmp(&(b.uri.as_str(), b.span)));
        for pair in edits.windows(2) {
            if pair[0].uri == pair[1].uri && pair[0].span.overlaps(pair[1].span) {
                return Err(EditConflict {
                    uri: pair[1].uri.clone(),
                    span: pair[1].span,
                });
            }
            if pair[0].uri == pair[1].uri
                && pair[0].span == pair[1].span
                && pair[0].new_text != pair[1].new_text
            {
                return Err(EditConflict {
                    uri: pair[1].uri.clone(),
                    span: pair[1].span,
                });
            }
        }

        edits.sort_by(|a, b| {
            a.uri
                .cmp(&b.uri)
                .then(b.span.start.cmp(&a.span.start))
                .then(b.span.end.cmp(&a.span.end))
        });
        Ok(edits)
    }
}

#[cfg(test)]
#[path = "../tests/edits_tests.rs"]
mod edits_tests;
