//! Linked instruction rows.
//!
//! The instruction-lowering collaborator turns markup into linked binding
//! instructions. The service only needs the name-bearing text positions each
//! row covers and the symbol the row was linked to.

use weft_common::Span;

use crate::symbols::SymbolId;

/// What a lowered instruction row names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum InstructionKind {
    /// An element or attribute position naming a declared resource.
    ResourceName,
    /// An attribute target naming a bindable property of a resource.
    BindableName,
}

/// One name occurrence produced by instruction lowering, in original-document
/// coordinates.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InstructionEntry {
    /// Span of the name text (the tag name, or the attribute-target segment).
    pub span: Span,
    pub name: String,
    pub kind: InstructionKind,
    /// The resource or bindable symbol the lowering pipeline linked this row
    /// to, when it proved one.
    pub resolution: Option<SymbolId>,
}

impl InstructionEntry {
    pub fn new(
        span: Span,
        name: impl Into<String>,
        kind: InstructionKind,
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
