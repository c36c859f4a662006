//! Span and location primitives.
//!
//! Both markup documents and class sources are addressed by half-open byte
//! ranges. Editor-protocol position mapping (line/column, UTF-16) is the
//! protocol adapter's concern and never enters this crate.

/// A half-open byte range `[start, end)` within a single document.
///
/// The derived ordering sorts by `start`, then `end`, which is the ordering
/// every deterministic result list in the service is built on.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
pub struct Span {
    /// Inclusive start offset.
    pub start: u32,
    /// Exclusive end offset. Always `>= start`.
    pub end: u32,
}

impl Span {
    /// Create a new span. `start` must not exceed `end`.
    pub fn new(start: u32, end: u32) -> Self {
        debug_assert!(start <= end, "span start {start} exceeds end {end}");
        Self { start, end }
    }

    /// An empty span at the given offset.
    pub const fn empty(offset: u32) -> Self {
        Self {
            start: offset,
            end: offset,
        }
    }

    /// Length of the span in bytes.
    pub const fn len(&self) -> u32 {
        self.end - self.start
    }

    /// Whether the span covers zero bytes.
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Whether the span contains the given offset.
    ///
    /// An empty span contains only its own offset, so a cursor sitting on a
    /// zero-width marker still resolves to it.
    pub const fn contains(&self, offset: u32) -> bool {
        (self.start <= offset && offset < self.end)
            || (self.is_empty() && offset == self.start)
    }

    /// Whether `other` lies entirely within this span.
    pub const fn contains_span(&self, other: Span) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Whether the two spans share at least one offset.
    pub const fn overlaps(&self, other: Span) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// A span tagged with the identity of the document it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Location {
    /// Document uri.
    pub uri: String,
    /// The range within the document.
    pub span: Span,
}

impl Location {
    /// Create a new location.
    pub fn new(uri: impl Into<String>, span: Span) -> Self {
        Self {
            uri: uri.into(),
            span,
        }
    }
}
