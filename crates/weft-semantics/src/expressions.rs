//! Scope-resolved expression tables.
//!
//! For each document, the type-checking collaborator reports every identifier
//! occurrence inside interpolation and binding expressions together with the
//! symbol it resolved the occurrence to. Scope shadowing is already applied:
//! an occurrence under a `repeat.for` or `<let>` that rebinds a name arrives
//! resolved to the local, not to the view-model member it shadows.

use weft_common::Span;

use crate::symbols::SymbolId;

/// Syntactic position of an identifier occurrence within an expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExpressionOccurrenceKind {
    /// Bare scope lookup: `total` in `${total}`.
    Identifier,
    /// Property access on an object: `total` in `${item.total}`.
    MemberAccess,
}

/// One identifier occurrence inside an expression, in original-document
/// coordinates.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpressionEntry {
    /// Span of the identifier text itself, not the whole expression.
    pub span: Span,
    pub name: String,
    pub kind: ExpressionOccurrenceKind,
    /// The symbol the forward resolver proved for this occurrence, or `None`
    /// when resolution failed. `None` is preserved, never guessed over.
    pub resolution: Option<SymbolId>,
}

impl ExpressionEntry {
    pub fn new(
        span: Span,
        name: impl Into<String>,
        kind: ExpressionOccurrenceKind,
        resolution: Option<SymbolId>,
    ) -> Self {
        Self {
            span,
            name: name.into(),
            kind,
            resolution,
        }
    }
}
