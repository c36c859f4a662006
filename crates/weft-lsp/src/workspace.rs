//! The workspace container.
//!
//! Owns everything long-lived: document texts and versions, per-document
//! compilation results, provenance edges, the resource catalog, settings,
//! and the published referential index snapshot. Requests run synchronously
//! to completion; the only suspension boundary is the external collaborator,
//! which the caller sequences as "refresh, then query".
//!
//! Snapshot discipline: a query observes either the pre- or post-refresh
//! index, never a partially rebuilt one. Rebuilds construct a fresh snapshot
//! and publish it only on success; an in-flight reader holding the previous
//! `Arc` keeps observing the prior valid structure.

use std::sync::Arc;

use rustc_hash::FxHashMap;
use tracing::debug;
use weft_common::{DocumentVersion, Fingerprint, FingerprintBuilder, content_hash};
use weft_semantics::{
    FallbackResolver, NullResolver, ReferenceSite, ResourceCatalog, SemanticsState,
};

use crate::code_actions::{CodeAction, CodeActionRequest, code_actions};
use crate::decisions::DecisionSet;
use crate::location_merge::{CandidateLocation, MergeTier, MergedLocation, merge_location_tiers};
use crate::probe::RenameProbe;
use crate::provenance::{ProvenanceEdge, ProvenanceMap};
use crate::rename::{
    PrepareRenameResult, RefactorContext, RefactorError, WorkspaceRename, prepare_rename, rename,
};
use crate::settings::Settings;
use crate::symbol_index::SymbolIndexSnapshot;

/// One open or discovered document.
#[derive(Debug, Clone)]
pub struct DocumentEntry {
    text: String,
    version: DocumentVersion,
    content_hash: u64,
}

impl DocumentEntry {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn version(&self) -> DocumentVersion {
        self.version
    }
}

/// Single-threaded, synchronous-per-request workspace state.
pub struct Workspace {
    documents: FxHashMap<String, DocumentEntry>,
    semantics: FxHashMap<String, SemanticsState>,
    provenance: FxHashMap<String, ProvenanceMap>,
    catalog: ResourceCatalog,
    project_version: u64,
    settings: Settings,
    resolver: Box<dyn FallbackResolver>,
    snapshot: Option<Arc<SymbolIndexSnapshot>>,
}

impl Workspace {
    /// A workspace wired without a fallback resolver.
    pub fn new(settings: Settings) -> Self {
        Self::with_resolver(settings, Box::new(NullResolver))
    }

    /// A workspace with an explicit fallback resolver; its capability
    /// descriptor is fixed here, at construction.
    pub fn with_resolver(settings: Settings, resolver: Box<dyn FallbackResolver>) -> Self {
        Self {
            documents: FxHashMap::default(),
            semantics: FxHashMap::default(),
            provenance: FxHashMap::default(),
            catalog: ResourceCatalog::new(),
            project_version: 0,
            settings,
            resolver,
            snapshot: None,
        }
    }

    // -----------------------------------------------------------------------
    // Mutation surface (the caller's "refresh" half)
    // -----------------------------------------------------------------------

    pub fn upsert_document(
        &mut self,
        uri: impl Into<String>,
        text: impl Into<String>,
        version: DocumentVersion,
    ) {
        let text = text.into();
        let entry = DocumentEntry {
            content_hash: content_hash(&text),
            text,
            version,
        };
        self.documents.insert(uri.into(), entry);
    }

    pub fn remove_document(&mut self, uri: &str) {
        self.documents.remove(uri);
        self.semantics.remove(uri);
        self.provenance.remove(uri);
    }

    /// Record a document's compilation result, as delivered by the forward
    /// pipeline.
    pub fn set_semantics(&mut self, uri: impl Into<String>, state: SemanticsState) {
        self.semantics.insert(uri.into(), state);
    }

    /// Record the provenance edges for a document's generated surrogate.
    pub fn set_provenance(&mut self, uri: impl Into<String>, edges: Vec<ProvenanceEdge>) {
        self.provenance.insert(uri.into(), ProvenanceMap::new(edges));
    }

    pub fn set_resource_catalog(&mut self, catalog: ResourceCatalog) {
        self.catalog = catalog;
    }

    pub fn bump_project_version(&mut self) {
        self.project_version += 1;
    }

    pub fn set_settings(&mut self, settings: Settings) {
        self.settings = settings;
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn document_text(&self, uri: &str) -> Option<&str> {
        self.documents.get(uri).map(|entry| entry.text())
    }

    // -----------------------------------------------------------------------
    // Fingerprint and snapshot
    // -----------------------------------------------------------------------

    /// The compilation fingerprint of the current state: catalog shape,
    /// every document's content hash and version, project version.
    pub fn fingerprint(&self) -> Fingerprint {
        let mut builder = FingerprintBuilder::new();
        builder
            .component(self.catalog.shape_hash())
            .component(self.project_version);

        let mut uris: Vec<&String> = self.documents.keys().collect();
        uris.sort_unstable();
        for uri in uris {
            let entry = &self.documents[uri];
            builder
                .text(uri)
                .component(entry.content_hash)
                .component(entry.version as u64);
        }
        builder.finish()
    }

    /// The current index snapshot, rebuilding wholesale if the fingerprint
    /// changed since the last publish.
    pub fn snapshot(&mut self) -> Arc<SymbolIndexSnapshot> {
        let fingerprint = self.fingerprint();
        if let Some(snapshot) = &self.snapshot
            && snapshot.fingerprint() == fingerprint
        {
            return Arc::clone(snapshot);
        }

        debug!(fingerprint = fingerprint.0, "rebuilding referential index");
        let mut entries: Vec<(&str, &SemanticsState)> = self
            .semantics
            .iter()
            .map(|(uri, state)| (uri.as_str(), state))
            .collect();
        entries.sort_unstable_by_key(|(uri, _)| *uri);

        let built = Arc::new(SymbolIndexSnapshot::build(
            fingerprint,
            entries,
            &self.catalog,
        ));
        self.snapshot = Some(Arc::clone(&built));
        built
    }

    // -----------------------------------------------------------------------
    // Query surface
    // -----------------------------------------------------------------------

    /// Probe the position without committing to any edit.
    pub fn probe(&mut self, uri: &str, offset: u32) -> RenameProbe {
        let snapshot = self.snapshot();
        RenameProbe::compute(
            &snapshot,
            self.provenance.get(uri),
            uri,
            offset,
            self.document_text(uri).unwrap_or(""),
        )
    }

    /// Every location denoting the symbol at the position, merged across
    /// tiers with the deterministic ordering contract.
    pub fn find_references(&mut self, uri: &str, offset: u32) -> Vec<MergedLocation> {
        let snapshot = self.snapshot();

        let mut local: Vec<CandidateLocation> = Vec::new();
        let mut cross: Vec<CandidateLocation> = Vec::new();
        if let Some(site) = snapshot.symbol_at(uri, offset) {
            let symbol = site.symbol;
            for reference in snapshot.sites_for_symbol(symbol) {
                let candidate =
                    CandidateLocation::new(reference.uri.clone(), reference.span, Some(symbol));
                if reference.uri == uri {
                    local.push(candidate);
                } else {
                    cross.push(candidate);
                }
            }
            if let Some(definition) = self.catalog.definition_for_symbol(symbol)
                && let Some(declaration) = &definition.declaration
            {
                cross.push(CandidateLocation::new(
                    declaration.uri.clone(),
                    declaration.span,
                    Some(symbol),
                ));
            }
        }

        // Absence upstream licenses the expensive fallback search.
        let mut fallback: Vec<CandidateLocation> = Vec::new();
        if local.is_empty() && cross.is_empty() && self.resolver.capabilities().references {
            fallback = self
                .resolver
                .references(uri, offset)
                .into_iter()
                .map(|location| CandidateLocation::new(location.uri, location.span, None))
                .collect();
        }

        merge_location_tiers(
            uri,
            &[
                (MergeTier::LocalScope, local),
                (MergeTier::ResourceDeclaration, cross),
                (MergeTier::Fallback, fallback),
            ],
        )
    }

    /// Declaration sites of the symbol at the position.
    pub fn definition(&mut self, uri: &str, offset: u32) -> Vec<MergedLocation> {
        let snapshot = self.snapshot();
        let Some(site) = snapshot.symbol_at(uri, offset) else {
            return Vec::new();
        };

        let mut local: Vec<CandidateLocation> = Vec::new();
        let mut cross: Vec<CandidateLocation> = Vec::new();
        for declaration in snapshot.declarations_of(site.symbol) {
            let candidate =
                CandidateLocation::new(declaration.uri.clone(), declaration.span, Some(site.symbol));
            if declaration.uri == uri {
                local.push(candidate);
            } else {
                cross.push(candidate);
            }
        }

        merge_location_tiers(
            uri,
            &[
                (MergeTier::LocalScope, local),
                (MergeTier::ResourceDeclaration, cross),
            ],
        )
    }

    /// All proven sites within one document, in span order.
    pub fn document_references(&mut self, uri: &str) -> Vec<ReferenceSite> {
        self.snapshot().sites_in_document(uri).to_vec()
    }

    /// Classify the rename target at the position.
    pub fn prepare_rename(
        &mut self,
        uri: &str,
        offset: u32,
    ) -> Result<PrepareRenameResult, RefactorError> {
        self.prepare_rename_with_overrides(uri, offset, &DecisionSet::new())
    }

    pub fn prepare_rename_with_overrides(
        &mut self,
        uri: &str,
        offset: u32,
        overrides: &DecisionSet,
    ) -> Result<PrepareRenameResult, RefactorError> {
        let snapshot = self.snapshot();
        let ctx = self.context(&snapshot);
        prepare_rename(&ctx, uri, offset, overrides)
    }

    /// Rename the entity at the position everywhere it is denoted, or deny
    /// with zero edits.
    pub fn rename(
        &mut self,
        uri: &str,
        offset: u32,
        new_name: &str,
    ) -> Result<WorkspaceRename, RefactorError> {
        self.rename_with_overrides(uri, offset, new_name, &DecisionSet::new())
    }

    pub fn rename_with_overrides(
        &mut self,
        uri: &str,
        offset: u32,
        new_name: &str,
        overrides: &DecisionSet,
    ) -> Result<WorkspaceRename, RefactorError> {
        let snapshot = self.snapshot();
        let ctx = self.context(&snapshot);
        rename(&ctx, uri, offset, new_name, overrides)
    }

    /// Actions available at the position. Never raises.
    pub fn code_actions(&mut self, request: &CodeActionRequest) -> Vec<CodeAction> {
        let snapshot = self.snapshot();
        let ctx = self.context(&snapshot);
        code_actions(&ctx, request)
    }

    fn context<'a>(&'a self, snapshot: &'a SymbolIndexSnapshot) -> RefactorContext<'a> {
        RefactorContext {
            snapshot,
            catalog: &self.catalog,
            provenance: &self.provenance,
            settings: &self.settings,
            resolver: self.resolver.as_ref(),
            documents: &self.documents,
        }
    }
}

#[cfg(test)]
#[path = "../tests/workspace_tests.rs"]
mod workspace_tests;
