//! The refactor policy gate.
//!
//! Every rename and code-action request passes through this single choke
//! point before any route runs. The gate maps (target class, resource
//! origin, provenance confidence, decision state) to an immutable
//! `RenamePlan`; a denial here means no route is attempted at all and the
//! denial carries a machine-readable reason.

use tracing::debug;
use weft_semantics::{ResolverCapabilities, ResourceOrigin};

use crate::decisions::{DecisionPointId, DecisionResolution, DecisionSet, resolve_decisions};
use crate::probe::{RenameProbe, TargetClass};
use crate::provenance::EvidenceLevel;
use crate::settings::Settings;

/// Why an operation was denied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DenialReason {
    /// Nothing renameable at the cursor.
    UnknownTarget,
    /// A text match exists but identity or a safe mapping cannot be proven.
    UnmappedProvenance,
    /// The target is real and mapped but policy forbids renaming it.
    TargetNotAllowed,
    /// A required decision point has no resolved value.
    DecisionRequired,
    /// Every route declined, most often unable to prove completeness.
    RouteExhausted,
}

/// One mutually-exclusive strategy for producing rename edits. Routes run in
/// plan order; the first route producing a non-empty edit set wins and later
/// routes are skipped — mixing edit strategies for one symbol is itself a
/// hazard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RouteKind {
    /// Resource-kind-specific rename (declaration, tag and attribute forms).
    ResourceSpecific,
    /// Generic expression-member rename.
    ExpressionMember,
    /// The general-purpose fallback resolver.
    Fallback,
}

/// The gate's verdict for one request. Computed per request, never cached.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenamePlan {
    pub allow_operation: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<DenialReason>,
    pub unresolved_decision_points: Vec<DecisionPointId>,
    pub try_semantic_rename: bool,
    pub allow_fallback_route: bool,
    /// Candidate routes in attempt order.
    pub routes: Vec<RouteKind>,
    /// Resolved decision values the routes consult.
    #[serde(skip)]
    pub decisions: DecisionResolution,
    /// Heuristic-grade sites may be edited (opt-in policy knob); the safety
    /// payload reports the reduced confidence.
    pub allow_heuristic_sites: bool,
}

impl RenamePlan {
    fn denied(reason: DenialReason, unresolved: Vec<DecisionPointId>) -> Self {
        Self {
            allow_operation: false,
            reason: Some(reason),
            unresolved_decision_points: unresolved,
            try_semantic_rename: false,
            allow_fallback_route: false,
            routes: Vec::new(),
            decisions: DecisionResolution::default(),
            allow_heuristic_sites: false,
        }
    }
}

/// Decision points that must be resolved before a target class may be
/// renamed.
pub fn required_decision_points(target: TargetClass) -> &'static [DecisionPointId] {
    match target {
        TargetClass::Resource => &[DecisionPointId::RenameStyle, DecisionPointId::FileRename],
        TargetClass::ExpressionMember => &[DecisionPointId::AliasStrategy],
        TargetClass::Unknown => &[],
    }
}

/// Compute the plan for one probed position.
pub fn gate_check(
    probe: &RenameProbe,
    settings: &Settings,
    request_overrides: &DecisionSet,
    capabilities: ResolverCapabilities,
) -> RenamePlan {
    if probe.target == TargetClass::Unknown {
        debug!("gate: unknown target");
        return RenamePlan::denied(DenialReason::UnknownTarget, Vec::new());
    }

    // Framework-owned names are never user-renameable, regardless of how
    // well the position is grounded.
    if probe.origin == ResourceOrigin::Builtin {
        debug!(placeholder = %probe.placeholder, "gate: builtin resource");
        return RenamePlan::denied(DenialReason::TargetNotAllowed, Vec::new());
    }

    let heuristic_site =
        probe.evidence == Some(EvidenceLevel::Heuristic) && settings.allow_heuristic_provenance;
    if !probe.has_mapped_provenance && !heuristic_site {
        debug!(
            evidence = ?probe.evidence,
            "gate: position not grounded in editable source"
        );
        return RenamePlan::denied(DenialReason::UnmappedProvenance, Vec::new());
    }

    let required = required_decision_points(probe.target);
    let decisions = resolve_decisions(
        required,
        request_overrides,
        &settings.decision_defaults,
        &settings.effective_inferred_style(),
    );
    if !decisions.is_complete() {
        debug!(unresolved = ?decisions.unresolved, "gate: decisions required");
        return RenamePlan::denied(DenialReason::DecisionRequired, decisions.unresolved);
    }

    let allow_fallback = settings.allow_fallback_route && capabilities.rename;
    let mut routes = match probe.target {
        TargetClass::Resource => vec![RouteKind::ResourceSpecific],
        TargetClass::ExpressionMember => vec![RouteKind::ExpressionMember],
        TargetClass::Unknown => unreachable!("unknown target denied above"),
    };
    if allow_fallback {
        routes.push(RouteKind::Fallback);
    }

    RenamePlan {
        allow_operation: true,
        reason: None,
        unresolved_decision_points: Vec::new(),
        try_semantic_rename: true,
        allow_fallback_route: allow_fallback,
        routes,
        decisions,
        allow_heuristic_sites: heuristic_site || settings.allow_heuristic_provenance,
    }
}

#[cfg(test)]
#[path = "../tests/refactor_policy_tests.rs"]
mod refactor_policy_tests;
