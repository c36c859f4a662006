//! Rename, references, and refactor policy engine for the Weft language
//! service.
//!
//! This crate is the semantic backbone behind the editor features:
//! - Provenance mapping between templates and their generated surrogates
//! - A materialized reverse reference index over forward-resolution output
//! - Tiered reference/definition queries with a deterministic ordering
//! - A policy-gated, all-or-nothing rename orchestrator
//! - Code actions sharing the same policy gate
//!
//! Parsing, instruction lowering, resource discovery, and type checking are
//! external collaborators; their results arrive through `weft-semantics`.

pub mod provenance;
pub use provenance::{EvidenceLevel, ProvenanceEdge, ProvenanceMap};

pub mod symbol_index;
pub use symbol_index::SymbolIndexSnapshot;

pub mod location_merge;
pub use location_merge::{CandidateLocation, MergeTier, MergedLocation, merge_location_tiers};

pub mod probe;
pub use probe::{RenameProbe, TargetClass};

pub mod decisions;
pub use decisions::{
    DecisionPointId, DecisionResolution, DecisionSet, DecisionSource, resolve_decisions,
};

pub mod settings;
pub use settings::{Settings, SettingsError};

pub mod refactor_policy;
pub use refactor_policy::{DenialReason, RenamePlan, RouteKind, gate_check};

pub mod edits;
pub use edits::{EditSet, TextEdit};

pub mod rename;
pub use rename::{
    PrepareRenameResult, RefactorError, RefactorErrorData, RefactorErrorKind, RefactorOperation,
    RenameConfidence, RenameSafety, WorkspaceRename,
};

pub mod code_actions;
pub use code_actions::{CodeAction, CodeActionKind, CodeActionRequest, DecisionChoice};

pub mod workspace;
pub use workspace::{DocumentEntry, Workspace};

#[cfg(test)]
pub(crate) mod fixtures;
