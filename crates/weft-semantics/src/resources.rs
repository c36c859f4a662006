//! The declared-resource catalog.
//!
//! The resource-discovery collaborator scans class sources and configuration
//! for declared UI resources and delivers them as a catalog. The catalog's
//! iteration order is the discovery order and is part of the fingerprint, so
//! two identical discoveries produce identical shape hashes.

use std::hash::Hasher;

use indexmap::IndexMap;
use rustc_hash::FxHasher;
use weft_common::Location;

use crate::symbols::SymbolId;

/// The kind of a declared UI resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResourceKind {
    CustomElement,
    CustomAttribute,
    ValueConverter,
    BindingBehavior,
    TemplateController,
}

/// Where a resource definition came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResourceOrigin {
    /// Discovered by analyzing workspace class sources.
    SourceAnalyzed,
    /// Declared through project configuration, without an analyzable source.
    ConfigurationDeclared,
    /// Shipped by the framework itself. Never user-renameable.
    Builtin,
    /// Origin could not be established.
    Unknown,
}

/// A bindable property exposed by a resource.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BindableDefinition {
    pub name: String,
    pub symbol: SymbolId,
}

/// One declared resource.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceDefinition {
    /// The name templates use (kebab-case for elements and attributes).
    pub name: String,
    pub kind: ResourceKind,
    pub origin: ResourceOrigin,
    pub symbol: SymbolId,
    /// Declaration site in a workspace source, when one exists.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub declaration: Option<Location>,
    pub bindables: Vec<BindableDefinition>,
}

/// Name-keyed view of every resource the discovery pipeline reported.
#[derive(Debug, Clone, Default)]
pub struct ResourceCatalog {
    by_name: IndexMap<(ResourceKind, String), ResourceDefinition>,
}

impl ResourceCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a definition, replacing any prior definition of the same
    /// name and kind.
    pub fn define(&mut self, definition: ResourceDefinition) {
        self.by_name
            .insert((definition.kind, definition.name.clone()), definition);
    }

    pub fn get(&self, kind: ResourceKind, name: &str) -> Option<&ResourceDefinition> {
        self.by_name.get(&(kind, name.to_string()))
    }

    /// Find the definition a symbol belongs to, matching either the resource
    /// symbol itself or one of its bindables.
    pub fn definition_for_symbol(&self, symbol: SymbolId) -> Option<&ResourceDefinition> {
        self.by_name.values().find(|def| {
            def.symbol == symbol || def.bindables.iter().any(|b| b.symbol == symbol)
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = &ResourceDefinition> {
        self.by_name.values()
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    /// Hash of the catalog shape, fed into the compilation fingerprint.
    /// Covers names, kinds, origins, symbols, and declaration sites.
    pub fn shape_hash(&self) -> u64 {
        let mut hasher = FxHasher::default();
        for def in self.by_name.values() {
            hasher.write_u64(def.name.len() as u64);
            hasher.write(def.name.as_bytes());
            hasher.write_u8(def.kind as u8);
            hasher.write_u8(def.origin as u8);
            hasher.write_u64(def.symbol.0);
            match &def.declaration {
                Some(loc) => {
                    hasher.write(loc.uri.as_bytes());
                    hasher.write_u32(loc.span.start);
                    hasher.write_u32(loc.span.end);
                }
                None => hasher.write_u8(0),
            }
            for bindable in &def.bindables {
                hasher.write(bindable.name.as_bytes());
                hasher.write_u64(bindable.symbol.0);
            }
        }
        hasher.finish()
    }
}
