//! Stable symbol identities.
//!
//! A `SymbolId` is derived from the structural shape of a declaration, not
//! from allocation order, so recompiling an unchanged workspace reproduces
//! the same ids and two compilations agree on identity exactly when the
//! declaration did not structurally change.

use std::hash::Hasher;

use rustc_hash::FxHasher;
use weft_common::Location;

use crate::resources::ResourceOrigin;

/// The class of a semantically distinct declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SymbolKind {
    /// A member of a companion view-model class.
    ViewModelMember,
    /// A declared UI resource (custom element, value converter, ...).
    Resource,
    /// A template-local variable (`<let>`, iteration item, scope rebind).
    TemplateLocal,
}

/// Opaque identity for a declaration, scoped to a compilation fingerprint.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
pub struct SymbolId(pub u64);

/// The structural key a `SymbolId` is derived from.
///
/// `scope` disambiguates template-locals that share a name in different
/// scopes of one template (the forward resolver numbers scopes; the same
/// template shape yields the same numbering).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SymbolKey<'a> {
    pub kind: SymbolKind,
    /// Uri of the document holding the declaration.
    pub declaring_uri: &'a str,
    /// Enclosing container, e.g. the view-model class name. Empty for
    /// resources and top-of-template locals.
    pub container: &'a str,
    pub name: &'a str,
    pub scope: u32,
}

impl SymbolId {
    /// Derive the id for a structural key.
    pub fn of(key: &SymbolKey<'_>) -> Self {
        let mut hasher = FxHasher::default();
        hasher.write_u8(match key.kind {
            SymbolKind::ViewModelMember => 0,
            SymbolKind::Resource => 1,
            SymbolKind::TemplateLocal => 2,
        });
        for part in [key.declaring_uri, key.container, key.name] {
            hasher.write_u64(part.len() as u64);
            hasher.write(part.as_bytes());
        }
        hasher.write_u32(key.scope);
        Self(hasher.finish())
    }
}

/// Everything the service records about one symbol.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SymbolRecord {
    pub id: SymbolId,
    pub kind: SymbolKind,
    pub name: String,
    /// Declaration site, when it lies in a known document. Builtin and
    /// configuration-declared resources have none.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub declaration: Option<Location>,
    pub origin: ResourceOrigin,
}
