//! Tiered location merge.
//!
//! Reference and definition queries combine candidate lists from independent
//! resolution tiers. Merging is a pure function with a deterministic output
//! contract: callers can diff two runs byte for byte.

use rustc_hash::FxHashSet;
use weft_common::Span;
use weft_semantics::SymbolId;

/// One strategy for producing candidate locations. Tiers combine,
/// non-exclusively, in this priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, serde::Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum MergeTier {
    /// The document's own lexical scope.
    LocalScope,
    /// Cross-template resource declarations.
    ResourceDeclaration,
    /// The general-purpose fallback resolver. Only consulted by the caller
    /// when the higher tiers returned nothing.
    Fallback,
}

/// A candidate produced by one tier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateLocation {
    pub uri: String,
    pub span: Span,
    pub symbol: Option<SymbolId>,
}

impl CandidateLocation {
    pub fn new(uri: impl Into<String>, span: Span, symbol: Option<SymbolId>) -> Self {
        Self {
            uri: uri.into(),
            span,
            symbol,
        }
    }
}

/// A merged result, tagged with the tier that produced it.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MergedLocation {
    pub uri: String,
    pub span: Span,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbol: Option<SymbolId>,
    pub tier: MergeTier,
}

/// Combine tier outputs into one deduplicated, deterministically ordered
/// list.
///
/// Candidates are concatenated in tier priority order and deduplicated by
/// `(uri, span, symbol)`; the first (highest-tier) occurrence wins. A higher
/// tier's success does not suppress a non-overlapping lower-tier
/// contribution. Output ordering: the current document first, remaining
/// documents lexicographic, then span start ascending, span end ascending,
/// then symbol id as a stable tie-break.
pub fn merge_location_tiers(
    current_uri: &str,
    tiers: &[(MergeTier, Vec<CandidateLocation>)],
) -> Vec<MergedLocation> {
    let mut seen: FxHashSet<(String, Span, Option<SymbolId>)> = FxHashSet::default();
    let mut merged: Vec<MergedLocation> = Vec::new();

    for (tier, candidates) in tiers {
        for candidate in candidates {
            let key = (candidate.uri.clone(), candidate.span, candidate.symbol);
            if !seen.insert(key) {
                continue;
            }
            merged.push(MergedLocation {
                uri: candidate.uri.clone(),
                span: candidate.span,
                symbol: candidate.symbol,
                tier: *tier,
            });
        }
    }

    merged.sort_by(|a, b| {
        let a_key = (
            a.uri != current_uri,
            a.uri.as_str(),
            a.span.start,
            a.span.end,
            a.symbol.map(|s| s.0).unwrap_or(u64::MAX),
        );
        let b_key = (
            b.uri != current_uri,
            b.uri.as_str(),
            b.span.start,
            b.span.end,
            b.symbol.map(|s| s.0).unwrap_or(u64::MAX),
        );
        a_key.cmp(&b_key)
    });

    merged
}

#[cfg(test)]
#[path = "../tests/location_merge_tests.rs"]
mod location_merge_tests;
