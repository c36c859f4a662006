//! Per-document compilation results.

use weft_common::Span;

use crate::expressions::ExpressionEntry;
use crate::instructions::InstructionEntry;
use crate::symbols::{SymbolId, SymbolKind};

/// A declaration the forward resolver established in a document: a view-model
/// member, a template-local (`<let>`, iteration item), or a resource class.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeclarationEntry {
    /// Span of the declared name text.
    pub span: Span,
    pub name: String,
    pub kind: SymbolKind,
    pub symbol: SymbolId,
}

impl DeclarationEntry {
    pub fn new(span: Span, name: impl Into<String>, kind: SymbolKind, symbol: SymbolId) -> Self {
        Self {
            span,
            name: name.into(),
            kind,
            symbol,
        }
    }
}

/// Everything the compilation/discovery collaborators reported for one
/// document. Spans are original-document byte offsets throughout.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentSemantics {
    pub expressions: Vec<ExpressionEntry>,
    pub instructions: Vec<InstructionEntry>,
    pub declarations: Vec<DeclarationEntry>,
}

/// Outcome of compiling one document. A failed document contributes nothing
/// to the index but never aborts the rest of the workspace.
#[derive(Debug, Clone, PartialEq)]
pub enum SemanticsState {
    Compiled(DocumentSemantics),
    Failed { message: String },
}
