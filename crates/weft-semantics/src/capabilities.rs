//! The fallback-resolver seam.
//!
//! The general-purpose resolver (in practice, the host language service for
//! class sources) is an external collaborator. Its capabilities are declared
//! up front when the workspace is constructed; nothing in the service probes
//! for optional features at runtime.

use weft_common::Location;

/// What the fallback resolver supports. Supplied at construction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolverCapabilities {
    /// The resolver can answer reference queries.
    pub references: bool,
    /// The resolver can produce rename edits.
    pub rename: bool,
}

/// A single edit proposed by the fallback resolver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FallbackEdit {
    pub location: Location,
    pub new_text: String,
}

/// General-purpose resolution collaborator.
///
/// Called request/response; the caller sequences "refresh, then query". The
/// lower tier is only consulted when the semantic tiers returned nothing
/// (references) or every semantic route refused (rename).
pub trait FallbackResolver {
    fn capabilities(&self) -> ResolverCapabilities;

    /// Locations the resolver considers references of whatever is at the
    /// given position.
    fn references(&self, uri: &str, offset: u32) -> Vec<Location>;

    /// Rename edits for whatever is at the given position, or `None` when
    /// the resolver cannot rename it.
    fn rename_edits(&self, uri: &str, offset: u32, new_name: &str) -> Option<Vec<FallbackEdit>>;
}

/// A resolver with no capabilities, for workspaces wired without one.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullResolver;

impl FallbackResolver for NullResolver {
    fn capabilities(&self) -> ResolverCapabilities {
        ResolverCapabilities::default()
    }

    fn references(&self, _uri: &str, _offset: u32) -> Vec<Location> {
        Vec::new()
    }

    fn rename_edits(&self, _uri: &str, _offset: u32, _new_name: &str) -> Option<Vec<FallbackEdit>> {
        None
    }
}
