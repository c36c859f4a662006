//! The referential index: a materialized inverse of the forward resolver.
//!
//! Answers "every site denoting symbol S" and "what does this position
//! denote" without recompiling per query. The index is built by replaying
//! forward-resolution output for every known document; it never re-derives a
//! binding by text matching, so scope shadowing is inherited for free: an
//! occurrence is indexed against exactly the symbol the forward resolver
//! proved for it.
//!
//! Snapshots are immutable. A fingerprint change forces a full rebuild, and
//! the new snapshot is published only once complete; in-flight readers keep
//! the one they started with.

use rustc_hash::FxHashMap;
use tracing::{debug, warn};
use weft_common::{Fingerprint, Location};
use weft_semantics::{
    DocumentSemantics, ExpressionOccurrenceKind, InstructionKind, ReferenceKind, ReferenceSite,
    ResourceCatalog, SemanticsState, SymbolId, SymbolRecord,
};

/// An immutable reverse reference index tagged with the fingerprint it was
/// built under.
#[derive(Debug)]
pub struct SymbolIndexSnapshot {
    fingerprint: Fingerprint,
    by_symbol: FxHashMap<SymbolId, Vec<ReferenceSite>>,
    by_document: FxHashMap<String, Vec<ReferenceSite>>,
    symbols: FxHashMap<SymbolId, SymbolRecord>,
}

impl SymbolIndexSnapshot {
    /// Build a snapshot from per-document compilation results and the
    /// resource catalog.
    ///
    /// A document that failed to compile contributes zero sites without
    /// aborting the rest of the build.
    pub fn build<'a>(
        fingerprint: Fingerprint,
        documents: impl IntoIterator<Item = (&'a str, &'a SemanticsState)>,
        catalog: &ResourceCatalog,
    ) -> Self {
        let mut sites: Vec<ReferenceSite> = Vec::new();
        let mut symbols: FxHashMap<SymbolId, SymbolRecord> = FxHashMap::default();

        for (uri, state) in documents {
            match state {
                SemanticsState::Compiled(semantics) => {
                    extract_document_sites(uri, semantics, &mut sites, &mut symbols);
                }
                SemanticsState::Failed { message } => {
                    warn!(uri, message = %message, "skipping failed document during index build");
                }
            }
        }

        for definition in catalog.iter() {
            // A discovered declaration site is forward-resolver output too;
            // indexing it keeps resource renames atomic across the declaring
            // file and every consuming template.
            if let Some(declaration) = &definition.declaration {
                sites.push(ReferenceSite::new(
                    declaration.uri.clone(),
                    declaration.span,
                    definition.symbol,
                    ReferenceKind::Declaration,
                ));
            }
            symbols
                .entry(definition.symbol)
                .and_modify(|record| {
                    record.origin = definition.origin;
                    if record.declaration.is_none() {
                        record.declaration = definition.declaration.clone();
                    }
                })
                .or_insert_with(|| SymbolRecord {
                    id: definition.symbol,
                    kind: weft_semantics::SymbolKind::Resource,
                    name: definition.name.clone(),
                    declaration: definition.declaration.clone(),
                    origin: definition.origin,
                });
        }

        // Deterministic site order; a declaration that also appears as a
        // plain occurrence keeps its declaration entry.
        sites.sort_by(|a, b| {
            (a.uri.as_str(), a.span, a.symbol, a.kind)
                .cmp(&(b.uri.as_str(), b.span, b.symbol, b.kind))
        });
        sites.dedup_by(|a, b| a.uri == b.uri && a.span == b.span && a.symbol == b.symbol);

        let mut by_symbol: FxHashMap<SymbolId, Vec<ReferenceSite>> = FxHashMap::default();
        let mut by_document: FxHashMap<String, Vec<ReferenceSite>> = FxHashMap::default();
        for site in sites {
            by_symbol.entry(site.symbol).or_default().push(site.clone());
            by_document.entry(site.uri.clone()).or_default().push(site);
        }

        debug!(
            symbols = by_symbol.len(),
            documents = by_document.len(),
            fingerprint = fingerprint.0,
            "built referential index"
        );

        Self {
            fingerprint,
            by_symbol,
            by_document,
            symbols,
        }
    }

    /// The fingerprint this snapshot was built under.
    pub fn fingerprint(&self) -> Fingerprint {
        self.fingerprint
    }

    /// Every proven site for a symbol, ordered by document then span.
    pub fn sites_for_symbol(&self, symbol: SymbolId) -> &[ReferenceSite] {
        self.by_symbol.get(&symbol).map(|v| v.as_slice()).unwrap_or(&[])
    }

    /// Every proven site within a document, ordered by span.
    pub fn sites_in_document(&self, uri: &str) -> &[ReferenceSite] {
        self.by_document.get(uri).map(|v| v.as_slice()).unwrap_or(&[])
    }

    /// All sites whose span contains the offset.
    pub fn sites_at(&self, uri: &str, offset: u32) -> Vec<&ReferenceSite> {
        self.sites_in_document(uri)
            .iter()
            .filter(|site| site.span.contains(offset))
            .collect()
    }

    /// The symbol denoted at an exact position: the tightest containing site
    /// wins, so `total` inside `${item.total}` resolves to the member access,
    /// not to any enclosing site.
    pub fn symbol_at(&self, uri: &str, offset: u32) -> Option<&ReferenceSite> {
        self.sites_at(uri, offset)
            .into_iter()
            .min_by_key(|site| (site.span.len(), site.span.start, site.kind))
    }

    pub fn record(&self, symbol: SymbolId) -> Option<&SymbolRecord> {
        self.symbols.get(&symbol)
    }

    /// Sorted unique documents containing at least one site for the symbol.
    pub fn documents_for_symbol(&self, symbol: SymbolId) -> Vec<&str> {
        let mut uris: Vec<&str> = self
            .sites_for_symbol(symbol)
            .iter()
            .map(|site| site.uri.as_str())
            .collect();
        uris.sort_unstable();
        uris.dedup();
        uris
    }

    /// Declaration locations for a symbol, from its sites and its record.
    pub fn declarations_of(&self, symbol: SymbolId) -> Vec<Location> {
        let mut locations: Vec<Location> = self
            .sites_for_symbol(symbol)
            .iter()
            .filter(|site| site.kind == ReferenceKind::Declaration)
            .map(|site| Location::new(site.uri.clone(), site.span))
            .collect();
        if locations.is_empty()
            && let Some(record) = self.record(symbol)
            && let Some(declaration) = &record.declaration
        {
            locations.push(declaration.clone());
        }
        locations
    }
}

/// Replay one document's forward-resolution output into reference sites.
fn extract_document_sites(
    uri: &str,
    semantics: &DocumentSemantics,
    sites: &mut Vec<ReferenceSite>,
    symbols: &mut FxHashMap<SymbolId, SymbolRecord>,
) {
    for declaration in &semantics.declarations {
        sites.push(ReferenceSite::new(
            uri,
            declaration.span,
            declaration.symbol,
            ReferenceKind::Declaration,
        ));
        symbols
            .entry(declaration.symbol)
            .or_insert_with(|| SymbolRecord {
                id: declaration.symbol,
                kind: declaration.kind,
                name: declaration.name.clone(),
                declaration: Some(Location::new(uri, declaration.span)),
                origin: weft_semantics::ResourceOrigin::Unknown,
            });
    }

    for entry in &semantics.expressions {
        // Only occurrences the forward resolver proved; unresolved entries
        // are preserved as unresolved, never guessed against an outer scope.
        let Some(symbol) = entry.resolution else {
            continue;
        };
        let kind = match entry.kind {
            ExpressionOccurrenceKind::Identifier => ReferenceKind::ExpressionIdentifier,
            ExpressionOccurrenceKind::MemberAccess => ReferenceKind::MemberAccess,
        };
        sites.push(ReferenceSite::new(uri, entry.span, symbol, kind));
    }

    for entry in &semantics.instructions {
        let Some(symbol) = entry.resolution else {
            continue;
        };
        let kind = match entry.kind {
            InstructionKind::ResourceName => ReferenceKind::ResourceName,
            InstructionKind::BindableName => ReferenceKind::BindableAttribute,
        };
        sites.push(ReferenceSite::new(uri, entry.span, symbol, kind));
    }
}

#[cfg(test)]
#[path = "../tests/symbol_index_tests.rs"]
mod symbol_index_tests;
