//! Rename orchestration.
//!
//! Sequences probe, gate-check, route attempts, and edit aggregation. The
//! load-bearing invariant: a rename either rewrites every known reference
//! site for the resolved symbol or it produces zero edits and a typed
//! denial. A partially rewritten binding fails at runtime, not at edit time,
//! so a route that cannot prove completeness refuses entirely.

use rustc_hash::FxHashMap;
use tracing::debug;
use weft_common::{Fingerprint, Span};
use weft_semantics::{
    FallbackResolver, ReferenceKind, ReferenceSite, ResourceCatalog, SymbolId,
};

use crate::decisions::{DecisionPointId, DecisionSet};
use crate::edits::{EditSet, TextEdit};
use crate::probe::{RenameProbe, TargetClass, grounding_for_site};
use crate::provenance::{EvidenceLevel, ProvenanceMap};
use crate::refactor_policy::{DenialReason, RenamePlan, RouteKind, gate_check};
use crate::settings::Settings;
use crate::symbol_index::SymbolIndexSnapshot;

// ---------------------------------------------------------------------------
// Protocol payloads
// ---------------------------------------------------------------------------

/// Aggregate trust level of a rename or prepare-rename answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RenameConfidence {
    Exact,
    High,
    Partial,
    Low,
}

/// Trust signal attached to rename answers. Confidence below `High` informs
/// the caller's UI; it never blocks by itself — only the policy gate denies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenameSafety {
    pub confidence: RenameConfidence,
    pub total_references: u32,
    /// Always `<= total_references`.
    pub certain_references: u32,
}

/// Result of `prepare_rename`.
///
/// A classification failure ("nothing renameable here") is not an error:
/// it is reported as `can_rename: false` with a message. Policy denials are
/// reported as `RefactorError`.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrepareRenameResult {
    pub can_rename: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<Span>,
    pub placeholder: String,
    pub target: TargetClass,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub safety: Option<RenameSafety>,
    /// False when the probe was computed against an already-superseded
    /// project version.
    pub conclusive: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub localized_error_message: Option<String>,
}

impl PrepareRenameResult {
    fn cannot_rename(msg: &str) -> Self {
        Self {
            can_rename: false,
            range: None,
            placeholder: String::new(),
            target: TargetClass::Unknown,
            safety: None,
            conclusive: true,
            localized_error_message: Some(msg.to_string()),
        }
    }
}

/// A successful rename: one atomic cross-document edit set.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceRename {
    pub edits: Vec<TextEdit>,
    pub safety: RenameSafety,
    /// The fingerprint the edits were computed under; applying them against
    /// any other state is the caller's hazard.
    pub fingerprint: Fingerprint,
}

/// Stable error kind for the protocol adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RefactorErrorKind {
    RefactorPolicyDenied,
    InvalidNewName,
}

/// The operation a denial belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RefactorOperation {
    PrepareRename,
    Rename,
    CodeActions,
}

/// Machine-readable denial detail.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefactorErrorData {
    pub operation: RefactorOperation,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<DenialReason>,
    pub unresolved_decision_point_ids: Vec<DecisionPointId>,
}

/// A typed denial. Never retryable: the outcome depends on position and
/// project state, not on anything transient.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefactorError {
    pub kind: RefactorErrorKind,
    pub message: String,
    pub retryable: bool,
    pub data: RefactorErrorData,
}

impl RefactorError {
    pub fn denied(
        operation: RefactorOperation,
        reason: DenialReason,
        unresolved: Vec<DecisionPointId>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind: RefactorErrorKind::RefactorPolicyDenied,
            message: message.into(),
            retryable: false,
            data: RefactorErrorData {
                operation,
                reason: Some(reason),
                unresolved_decision_point_ids: unresolved,
            },
        }
    }

    pub fn invalid_name(operation: RefactorOperation, message: impl Into<String>) -> Self {
        Self {
            kind: RefactorErrorKind::InvalidNewName,
            message: message.into(),
            retryable: false,
            data: RefactorErrorData {
                operation,
                reason: None,
                unresolved_decision_point_ids: Vec::new(),
            },
        }
    }
}

impl std::fmt::Display for RefactorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for RefactorError {}

// ---------------------------------------------------------------------------
// Orchestration context
// ---------------------------------------------------------------------------

/// Borrowed view of everything a refactor request needs. Assembled by the
/// workspace per request; the underlying structures are immutable for the
/// request's lifetime.
pub(crate) struct RefactorContext<'a> {
    pub snapshot: &'a SymbolIndexSnapshot,
    pub catalog: &'a ResourceCatalog,
    pub provenance: &'a FxHashMap<String, ProvenanceMap>,
    pub settings: &'a Settings,
    pub resolver: &'a dyn FallbackResolver,
    pub documents: &'a FxHashMap<String, crate::workspace::DocumentEntry>,
}

impl<'a> RefactorContext<'a> {
    pub(crate) fn provenance_for(&self, uri: &str) -> Option<&ProvenanceMap> {
        self.provenance.get(uri)
    }

    pub(crate) fn text(&self, uri: &str) -> &str {
        self.documents.get(uri).map(|entry| entry.text()).unwrap_or("")
    }

    pub(crate) fn probe(&self, uri: &str, offset: u32) -> RenameProbe {
        RenameProbe::compute(
            self.snapshot,
            self.provenance_for(uri),
            uri,
            offset,
            self.text(uri),
        )
    }
}

// ---------------------------------------------------------------------------
// prepare_rename
// ---------------------------------------------------------------------------

pub(crate) fn prepare_rename(
    ctx: &RefactorContext<'_>,
    uri: &str,
    offset: u32,
    overrides: &DecisionSet,
) -> Result<PrepareRenameResult, RefactorError> {
    let probe = ctx.probe(uri, offset);

    if probe.target == TargetClass::Unknown {
        return Ok(PrepareRenameResult::cannot_rename(
            "You cannot rename this element.",
        ));
    }

    let Some(symbol) = probe.symbol else {
        return Ok(PrepareRenameResult::cannot_rename(
            "You cannot rename this element.",
        ));
    };

    let plan = gate_check(&probe, ctx.settings, overrides, ctx.resolver.capabilities());
    if !plan.allow_operation {
        return Err(denial_error(RefactorOperation::PrepareRename, &plan));
    }

    let safety = safety_for_symbol(ctx, symbol, plan.allow_heuristic_sites);

    Ok(PrepareRenameResult {
        can_rename: true,
        range: probe.trigger_span,
        placeholder: probe.placeholder.clone(),
        target: probe.target,
        safety: Some(safety),
        conclusive: probe.is_conclusive(ctx.snapshot.fingerprint()),
        localized_error_message: None,
    })
}

// ---------------------------------------------------------------------------
// rename
// ---------------------------------------------------------------------------

pub(crate) fn rename(
    ctx: &RefactorContext<'_>,
    uri: &str,
    offset: u32,
    new_name: &str,
    overrides: &DecisionSet,
) -> Result<WorkspaceRename, RefactorError> {
    let probe = ctx.probe(uri, offset);

    if probe.target == TargetClass::Unknown {
        return Err(RefactorError::denied(
            RefactorOperation::Rename,
            DenialReason::UnknownTarget,
            Vec::new(),
            "You cannot rename this element.",
        ));
    }

    let Some(symbol) = probe.symbol else {
        return Err(RefactorError::denied(
            RefactorOperation::Rename,
            DenialReason::UnknownTarget,
            Vec::new(),
            "You cannot rename this element.",
        ));
    };

    let plan = gate_check(&probe, ctx.settings, overrides, ctx.resolver.capabilities());
    if !plan.allow_operation {
        return Err(denial_error(RefactorOperation::Rename, &plan));
    }

    validate_new_name(probe.target, new_name)?;

    for route in &plan.routes {
        let outcome = match route {
            RouteKind::ResourceSpecific => {
                attempt_resource_route(ctx, &plan, symbol, new_name)
            }
            RouteKind::ExpressionMember => {
                attempt_expression_member_route(ctx, &plan, symbol, new_name)
            }
            RouteKind::Fallback => attempt_fallback_route(ctx, symbol, uri, offset, new_name),
        };

        match outcome {
            RouteOutcome::Produced(edits) => {
                debug!(?route, edits = edits.len(), "route produced edit set");
                let safety = safety_for_symbol(ctx, symbol, plan.allow_heuristic_sites);
                return Ok(WorkspaceRename {
                    edits,
                    safety,
                    fingerprint: ctx.snapshot.fingerprint(),
                });
            }
            RouteOutcome::Declined(why) => {
                debug!(?route, why, "route declined");
            }
        }
    }

    Err(RefactorError::denied(
        RefactorOperation::Rename,
        DenialReason::RouteExhausted,
        Vec::new(),
        "No rename strategy could produce a complete edit set.",
    ))
}

fn denial_error(operation: RefactorOperation, plan: &RenamePlan) -> RefactorError {
    let reason = plan.reason.unwrap_or(DenialReason::TargetNotAllowed);
    let message = match reason {
        DenialReason::UnknownTarget => "You cannot rename this element.",
        DenialReason::UnmappedProvenance => {
            "This occurrence cannot be safely located in editable source."
        }
        DenialReason::TargetNotAllowed => "You cannot rename elements owned by the framework.",
        DenialReason::DecisionRequired => {
            "The rename needs an explicit choice before it can proceed."
        }
        DenialReason::RouteExhausted => "No rename strategy could produce a complete edit set.",
    };
    RefactorError::denied(
        operation,
        reason,
        plan.unresolved_decision_points.clone(),
        message,
    )
}

// ---------------------------------------------------------------------------
// Routes
// ---------------------------------------------------------------------------

enum RouteOutcome {
    Produced(Vec<TextEdit>),
    Declined(&'static str),
}

/// Per-site safety verdict shared by the semantic routes.
fn site_is_safe(ctx: &RefactorContext<'_>, site: &ReferenceSite, allow_heuristic: bool) -> bool {
    let (grounded, evidence) =
        grounding_for_site(ctx.provenance_for(&site.uri), site.kind, site.span);
    grounded || (allow_heuristic && evidence == Some(EvidenceLevel::Heuristic))
}

/// Resource-kind-specific route: rewrites the declaration, every tag and
/// attribute form, and every expression occurrence of a declared resource,
/// honoring the resolved rename-style decision for markup sites.
fn attempt_resource_route(
    ctx: &RefactorContext<'_>,
    plan: &RenamePlan,
    symbol: SymbolId,
    new_name: &str,
) -> RouteOutcome {
    if ctx.catalog.definition_for_symbol(symbol).is_none()
        && ctx
            .snapshot
            .record(symbol)
            .is_none_or(|r| r.kind != weft_semantics::SymbolKind::Resource)
    {
        return RouteOutcome::Declined("symbol is not a declared resource");
    }

    let sites = ctx.snapshot.sites_for_symbol(symbol);
    if sites.is_empty() {
        return RouteOutcome::Declined("no known sites for resource");
    }

    let markup_name = match plan.decisions.value(DecisionPointId::RenameStyle) {
        Some("kebab-case") => kebab_case(new_name),
        _ => new_name.to_string(),
    };

    let mut edit_set = EditSet::new();
    for site in sites {
        if !site_is_safe(ctx, site, plan.allow_heuristic_sites) {
            return RouteOutcome::Declined("a site is not safely mappable");
        }
        let replacement = match site.kind {
            ReferenceKind::ResourceName | ReferenceKind::BindableAttribute => {
                markup_name.clone()
            }
            ReferenceKind::Declaration
            | ReferenceKind::ExpressionIdentifier
            | ReferenceKind::MemberAccess => new_name.to_string(),
        };
        edit_set.push(TextEdit::new(site.uri.clone(), site.span, replacement));
    }

    match edit_set.finalize() {
        Ok(edits) if !edits.is_empty() => RouteOutcome::Produced(edits),
        Ok(_) => RouteOutcome::Declined("route produced no edits"),
        Err(_) => RouteOutcome::Declined("route produced conflicting edits"),
    }
}

/// Generic expression-member route: plain identifier replacement at every
/// proven site of a view-model member or template-local.
fn attempt_expression_member_route(
    ctx: &RefactorContext<'_>,
    plan: &RenamePlan,
    symbol: SymbolId,
    new_name: &str,
) -> RouteOutcome {
    let sites = ctx.snapshot.sites_for_symbol(symbol);
    if sites.is_empty() {
        return RouteOutcome::Declined("no known sites for symbol");
    }

    let mut edit_set = EditSet::new();
    for site in sites {
        if !site_is_safe(ctx, site, plan.allow_heuristic_sites) {
            return RouteOutcome::Declined("a site is not safely mappable");
        }
        edit_set.push(TextEdit::new(site.uri.clone(), site.span, new_name));
    }

    match edit_set.finalize() {
        Ok(edits) if !edits.is_empty() => RouteOutcome::Produced(edits),
        Ok(_) => RouteOutcome::Declined("route produced no edits"),
        Err(_) => RouteOutcome::Declined("route produced conflicting edits"),
    }
}

/// Fallback route: delegate to the general-purpose resolver, then verify its
/// answer covers every site the index knows about. An uncovered site means
/// the fallback cannot prove completeness and the route refuses.
fn attempt_fallback_route(
    ctx: &RefactorContext<'_>,
    symbol: SymbolId,
    uri: &str,
    offset: u32,
    new_name: &str,
) -> RouteOutcome {
    let Some(fallback_edits) = ctx.resolver.rename_edits(uri, offset, new_name) else {
        return RouteOutcome::Declined("fallback resolver declined");
    };
    if fallback_edits.is_empty() {
        return RouteOutcome::Declined("fallback resolver returned no edits");
    }

    let known_sites = ctx.snapshot.sites_for_symbol(symbol);
    let covers = |site: &ReferenceSite| {
        fallback_edits.iter().any(|edit| {
            edit.location.uri == site.uri && edit.location.span.contains_span(site.span)
        })
    };
    if !known_sites.iter().all(covers) {
        return RouteOutcome::Declined("fallback answer misses a known site");
    }

    let mut edit_set = EditSet::new();
    for edit in fallback_edits {
        edit_set.push(TextEdit::new(
            edit.location.uri,
            edit.location.span,
            edit.new_text,
        ));
    }
    match edit_set.finalize() {
        Ok(edits) if !edits.is_empty() => RouteOutcome::Produced(edits),
        Ok(_) => RouteOutcome::Declined("route produced no edits"),
        Err(_) => RouteOutcome::Declined("route produced conflicting edits"),
    }
}

// ---------------------------------------------------------------------------
// Safety payload
// ---------------------------------------------------------------------------

/// Compute the trust signal over every known site of a symbol.
pub(crate) fn safety_for_symbol(
    ctx: &RefactorContext<'_>,
    symbol: SymbolId,
    allow_heuristic: bool,
) -> RenameSafety {
    let sites = ctx.snapshot.sites_for_symbol(symbol);
    let total = sites.len() as u32;
    let mut certain = 0u32;
    let mut all_exact = true;

    for site in sites {
        let (grounded, evidence) =
            grounding_for_site(ctx.provenance_for(&site.uri), site.kind, site.span);
        if grounded {
            certain += 1;
            if evidence == Some(EvidenceLevel::Mapped) {
                all_exact = false;
            }
        } else {
            all_exact = false;
        }
    }

    let confidence = if total > 0 && certain == total && all_exact {
        RenameConfidence::Exact
    } else if total > 0 && certain == total {
        RenameConfidence::High
    } else if allow_heuristic && certain * 2 >= total {
        RenameConfidence::Partial
    } else {
        RenameConfidence::Low
    };

    RenameSafety {
        confidence,
        total_references: total,
        certain_references: certain,
    }
}

// ---------------------------------------------------------------------------
// New-name validation
// ---------------------------------------------------------------------------

/// Names the expression language reserves; never valid member names.
const RESERVED_WORDS: &[&str] = &[
    "of", "in", "true", "false", "null", "undefined", "this", "$this", "$parent", "$event",
];

fn validate_new_name(target: TargetClass, new_name: &str) -> Result<(), RefactorError> {
    // Elements and attributes carry kebab names; value converters and
    // binding behaviors carry identifier names. Either shape is acceptable
    // here, and the rename-style decision governs the markup form.
    let valid = match target {
        TargetClass::Resource => {
            is_valid_resource_name(new_name) || is_valid_member_name(new_name)
        }
        TargetClass::ExpressionMember => is_valid_member_name(new_name),
        TargetClass::Unknown => false,
    };
    if valid {
        Ok(())
    } else {
        Err(RefactorError::invalid_name(
            RefactorOperation::Rename,
            format!("'{new_name}' is not a valid name for this target"),
        ))
    }
}

/// Check a view-model member / template-local name.
fn is_valid_member_name(name: &str) -> bool {
    if name.is_empty() || RESERVED_WORDS.contains(&name) {
        return false;
    }
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if is_identifier_start(first) => {}
        _ => return false,
    }
    chars.all(is_identifier_part)
}

/// Check a resource name: lowercase kebab segments (`my-widget`).
fn is_valid_resource_name(name: &str) -> bool {
    if name.is_empty() {
        return false;
    }
    name.split('-').all(|segment| {
        let mut chars = segment.chars();
        match chars.next() {
            Some(first) if first.is_ascii_lowercase() => {}
            _ => return false,
        }
        chars.all(|ch| ch.is_ascii_lowercase() || ch.is_ascii_digit())
    })
}

fn is_identifier_start(ch: char) -> bool {
    ch == '$' || ch == '_' || ch.is_alphabetic()
}

fn is_identifier_part(ch: char) -> bool {
    ch == '$' || ch == '_' || ch.is_alphanumeric()
}

/// Convert a camelCase or PascalCase name to its kebab-case markup form.
/// Already-kebab input passes through unchanged.
pub(crate) fn kebab_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for (i, ch) in name.chars().enumerate() {
        if ch.is_ascii_uppercase() {
            if i > 0 && !out.ends_with('-') {
                out.push('-');
            }
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}

#[cfg(test)]
#[path = "../tests/rename_tests.rs"]
mod rename_tests;
