//! Proven reference sites.

use weft_common::Span;

use crate::symbols::SymbolId;

/// How a reference site denotes its symbol.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum ReferenceKind {
    /// The declaration site itself.
    Declaration,
    /// An element or attribute position naming a declared resource
    /// (`<my-widget>`, `my-attr="..."`).
    ResourceName,
    /// An attribute target naming a bindable property (`count` in
    /// `count.bind="total"`).
    BindableAttribute,
    /// A bare identifier inside an interpolation or binding expression
    /// (`total` in `${total}`).
    ExpressionIdentifier,
    /// A member access inside an expression (`total` in `${cart.total}`).
    MemberAccess,
}

/// A `(document, span)` occurrence the forward resolver proved to denote a
/// specific symbol. Sites are recorded for proven text occurrences only,
/// never synthesized.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceSite {
    pub uri: String,
    pub span: Span,
    pub symbol: SymbolId,
    pub kind: ReferenceKind,
}

impl ReferenceSite {
    pub fn new(uri: impl Into<String>, span: Span, symbol: SymbolId, kind: ReferenceKind) -> Self {
        Self {
            uri: uri.into(),
            span,
            symbol,
            kind,
        }
    }
}
