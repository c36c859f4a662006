//! Common types for the Weft language service.
//!
//! This crate provides the foundational types used across the service crates:
//! - Source spans and document locations (`Span`, `Location`)
//! - Compilation fingerprints (`Fingerprint`, `FingerprintBuilder`)

// Span - source location tracking (byte offsets)
pub mod span;
pub use span::{Location, Span};

// Fingerprint - cache keys over the full compilation state
pub mod fingerprint;
pub use fingerprint::{DocumentVersion, Fingerprint, FingerprintBuilder, content_hash};
