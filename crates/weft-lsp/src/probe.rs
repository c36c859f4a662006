//! Rename probe: classify a cursor position without committing to an edit.
//!
//! The probe answers four independent questions about a position: what class
//! of entity is here, where did it come from, did the forward resolver
//! actually name it (`has_semantic_provenance`), and can the provenance map
//! ground it in editable source (`has_mapped_provenance`). Both provenance
//! flags are required for a rewrite: semantic-without-mapped is "known but
//! unlocatable safely", mapped-without-semantic is "text matched but identity
//! unproven".

use weft_common::{Fingerprint, Span};
use weft_semantics::{ReferenceKind, ResourceOrigin, SymbolId, SymbolKind};

use crate::provenance::{EvidenceLevel, ProvenanceMap};
use crate::symbol_index::SymbolIndexSnapshot;

/// The class of entity a rename would act on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TargetClass {
    /// A declared UI resource or one of its bindables' attribute forms.
    Resource,
    /// A view-model member or template-local reached through an expression.
    ExpressionMember,
    /// Nothing renameable.
    Unknown,
}

/// Result of probing a position. Computed per request, never cached.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenameProbe {
    pub target: TargetClass,
    pub origin: ResourceOrigin,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbol: Option<SymbolId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub site_kind: Option<ReferenceKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trigger_span: Option<Span>,
    pub placeholder: String,
    /// The forward resolver proved this exact occurrence denotes the symbol.
    pub has_semantic_provenance: bool,
    /// The position is grounded in editable source: directly, or through an
    /// exact/mapped provenance edge.
    pub has_mapped_provenance: bool,
    /// Raw evidence grade at the trigger span, when the document has a
    /// surrogate. Heuristic shows up here even though it does not count as
    /// mapped; the policy gate decides what to do with it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evidence: Option<EvidenceLevel>,
    /// The fingerprint this probe was computed under.
    pub fingerprint: Fingerprint,
}

impl RenameProbe {
    /// Probe the position against one index snapshot.
    pub fn compute(
        snapshot: &SymbolIndexSnapshot,
        provenance: Option<&ProvenanceMap>,
        uri: &str,
        offset: u32,
        text: &str,
    ) -> Self {
        let Some(site) = snapshot.symbol_at(uri, offset) else {
            // Nothing proven here. A provenance edge may still cover the
            // offset (text matched but identity unproven).
            let mapped = provenance.is_some_and(|map| map.lookup_source(offset));
            return Self {
                target: TargetClass::Unknown,
                origin: ResourceOrigin::Unknown,
                symbol: None,
                site_kind: None,
                trigger_span: None,
                placeholder: String::new(),
                has_semantic_provenance: false,
                has_mapped_provenance: mapped,
                evidence: None,
                fingerprint: snapshot.fingerprint(),
            };
        };

        let record = snapshot.record(site.symbol);
        let target = match record.map(|r| r.kind) {
            Some(SymbolKind::Resource) => TargetClass::Resource,
            Some(SymbolKind::ViewModelMember) | Some(SymbolKind::TemplateLocal) => {
                TargetClass::ExpressionMember
            }
            None => match site.kind {
                ReferenceKind::ResourceName | ReferenceKind::BindableAttribute => {
                    TargetClass::Resource
                }
                _ => TargetClass::ExpressionMember,
            },
        };
        let origin = record.map(|r| r.origin).unwrap_or(ResourceOrigin::Unknown);

        let (mapped, evidence) = grounding_for_site(provenance, site.kind, site.span);

        let placeholder = text
            .get(site.span.start as usize..site.span.end as usize)
            .unwrap_or("")
            .to_string();

        Self {
            target,
            origin,
            symbol: Some(site.symbol),
            site_kind: Some(site.kind),
            trigger_span: Some(site.span),
            placeholder,
            has_semantic_provenance: true,
            has_mapped_provenance: mapped,
            evidence,
            fingerprint: snapshot.fingerprint(),
        }
    }

    /// Whether the probe still describes the current project state. A probe
    /// carried across a refresh is inconclusive and must be recomputed
    /// before any edit is produced.
    pub fn is_conclusive(&self, current: Fingerprint) -> bool {
        self.fingerprint == current
    }
}

/// How well one site is grounded in editable source.
///
/// Expression occurrences in a document with a surrogate are only as
/// trustworthy as the provenance edge covering them. Markup-direct
/// occurrences (tag names, attribute targets, declarations) and sites in
/// documents without a surrogate are the text the user edits; they are
/// grounded by construction.
pub(crate) fn grounding_for_site(
    provenance: Option<&ProvenanceMap>,
    kind: ReferenceKind,
    span: Span,
) -> (bool, Option<EvidenceLevel>) {
    let Some(map) = provenance else {
        return (true, None);
    };
    match kind {
        ReferenceKind::ExpressionIdentifier | ReferenceKind::MemberAccess => {
            let evidence = map.evidence_at(span);
            (evidence.is_some_and(|e| e.is_grounded()), evidence)
        }
        ReferenceKind::ResourceName
        | ReferenceKind::BindableAttribute
        | ReferenceKind::Declaration => (true, None),
    }
}

#[cfg(test)]
#[path = "../tests/probe_tests.rs"]
mod probe_tests;
