//! Compilation fingerprints.
//!
//! Every long-lived structure in the service (the referential index, the
//! provenance maps, the resource catalog view) is keyed by one fingerprint
//! combining the resource catalog shape, each document's content hash and
//! version, and the project version. A fingerprint mismatch invalidates the
//! whole structure; there is no incremental path.

use std::hash::Hasher;

use rustc_hash::FxHasher;

/// Monotonically increasing per-document version reported by the editor.
pub type DocumentVersion = i32;

/// Hash of a document's text, used as a fingerprint component.
pub fn content_hash(text: &str) -> u64 {
    let mut hasher = FxHasher::default();
    hasher.write(text.as_bytes());
    hasher.finish()
}

/// A fingerprint over the full compilation state.
///
/// Two equal fingerprints mean a cached structure built under one may be
/// observed under the other. Anything else forces a full rebuild.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
pub struct Fingerprint(pub u64);

/// Builds a fingerprint by hashing components in a fixed order.
///
/// Callers are responsible for feeding components in a deterministic order
/// (documents sorted by uri, catalog entries in declaration order); the
/// builder itself is order-sensitive on purpose.
#[derive(Default)]
pub struct FingerprintBuilder {
    hasher: FxHasher,
}

impl FingerprintBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mix a numeric component into the fingerprint.
    pub fn component(&mut self, value: u64) -> &mut Self {
        self.hasher.write_u64(value);
        self
    }

    /// Mix a string component (e.g. a document uri) into the fingerprint.
    pub fn text(&mut self, value: &str) -> &mut Self {
        // Length prefix keeps adjacent strings from colliding.
        self.hasher.write_u64(value.len() as u64);
        self.hasher.write(value.as_bytes());
        self
    }

    pub fn finish(&self) -> Fingerprint {
        Fingerprint(self.hasher.finish())
    }
}
