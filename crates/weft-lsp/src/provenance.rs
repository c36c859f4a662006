//! Provenance mapping between original documents and generated surrogates.
//!
//! Expressions inside markup are type-checked against a generated surrogate
//! document. Every result computed against the surrogate has to be translated
//! back to the document the user edits, with an honest signal about how much
//! that translation can be trusted. The surrogate-generation collaborator
//! records an edge per expansion; this module only stores and queries them.

use weft_common::Span;

/// How trustworthy a provenance edge is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EvidenceLevel {
    /// The generated text is a verbatim copy of the original span.
    Exact,
    /// The generated text is a deterministic expansion of the original span.
    Mapped,
    /// Positions were reconciled by nearest-enclosing-node proximity; no
    /// direct edge was recorded.
    Heuristic,
}

impl EvidenceLevel {
    /// Whether this grade is strong enough to ground an automatic rewrite.
    /// Heuristic matches are surfaced to the caller instead, never silently
    /// substituted.
    pub const fn is_grounded(self) -> bool {
        matches!(self, EvidenceLevel::Exact | EvidenceLevel::Mapped)
    }

    /// Lower rank is more trustworthy.
    const fn rank(self) -> u8 {
        match self {
            EvidenceLevel::Exact => 0,
            EvidenceLevel::Mapped => 1,
            EvidenceLevel::Heuristic => 2,
        }
    }
}

/// A recorded correspondence between an original-document span and a
/// generated-surrogate span. Cardinality may be many-to-one or one-to-many in
/// either direction; edges are never unique by span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProvenanceEdge {
    pub original: Span,
    pub generated: Span,
    pub evidence: EvidenceLevel,
}

/// All provenance edges for one original/surrogate document pair.
#[derive(Debug, Clone, Default)]
pub struct ProvenanceMap {
    edges: Vec<ProvenanceEdge>,
}

impl ProvenanceMap {
    /// Build a map from collaborator-supplied edges. Edge order is
    /// normalized so queries are reproducible regardless of supply order.
    pub fn new(mut edges: Vec<ProvenanceEdge>) -> Self {
        edges.sort_by_key(|e| {
            (
                e.original.start,
                e.original.end,
                e.generated.start,
                e.generated.end,
                e.evidence.rank(),
            )
        });
        Self { edges }
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    /// Translate a span in the generated surrogate back to its edge.
    ///
    /// Returns the most specific edge whose generated span contains `span`;
    /// the tightest match wins ties. `None` is not a failure: the caller
    /// falls back to inspecting the generated location directly or excludes
    /// the site.
    pub fn project_generated_span(&self, span: Span) -> Option<&ProvenanceEdge> {
        self.edges
            .iter()
            .filter(|e| e.generated.contains_span(span))
            .min_by_key(|e| {
                (
                    e.generated.len(),
                    e.original.len(),
                    e.evidence.rank(),
                    e.generated.start,
                )
            })
    }

    /// Whether an original-document offset participates in any edge. Used to
    /// gate whether a site has enough grounding to rewrite automatically.
    pub fn lookup_source(&self, offset: u32) -> bool {
        self.edges.iter().any(|e| e.original.contains(offset))
    }

    /// The best evidence grade among edges covering the whole original span.
    pub fn evidence_at(&self, span: Span) -> Option<EvidenceLevel> {
        self.edges
            .iter()
            .filter(|e| e.original.contains_span(span))
            .map(|e| e.evidence)
            .min_by_key(|evidence| evidence.rank())
    }
}

#[cfg(test)]
#[path = "../tests/provenance_tests.rs"]
mod provenance_tests;
