//! Forward-resolution data model for the Weft language service.
//!
//! The compilation and discovery pipelines (markup parser, instruction
//! lowering, resource discovery, type checking) live outside this workspace.
//! What they deliver per document is captured here as plain data:
//! - stable symbol identities (`SymbolId`, `SymbolRecord`)
//! - scope-resolved expression tables (`ExpressionEntry`)
//! - linked instruction rows (`InstructionEntry`)
//! - declaration records and per-document results (`DocumentSemantics`)
//! - the declared-resource catalog (`ResourceCatalog`)
//! - the one trait seam to the general-purpose fallback resolver
//!
//! Nothing in this crate parses text or resolves names. An occurrence either
//! arrives with the symbol the forward resolver proved for it, or it arrives
//! unresolved and stays that way.

pub mod symbols;
pub use symbols::{SymbolId, SymbolKey, SymbolKind, SymbolRecord};

pub mod references;
pub use references::{ReferenceKind, ReferenceSite};

pub mod expressions;
pub use expressions::{ExpressionEntry, ExpressionOccurrenceKind};

pub mod instructions;
pub use instructions::{InstructionEntry, InstructionKind};

pub mod resources;
pub use resources::{
    BindableDefinition, ResourceCatalog, ResourceDefinition, ResourceKind, ResourceOrigin,
};

pub mod document;
pub use document::{DeclarationEntry, DocumentSemantics, SemanticsState};

pub mod capabilities;
pub use capabilities::{FallbackEdit, FallbackResolver, NullResolver, ResolverCapabilities};
