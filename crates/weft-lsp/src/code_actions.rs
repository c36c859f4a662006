//! Code actions sharing the refactor policy gate.
//!
//! The action list is computed from the same probe and gate as rename, so an
//! action is only ever offered where the corresponding request would be
//! allowed. A decision-required denial turns into one action per candidate
//! value, letting the caller re-request with an explicit choice instead of
//! guessing a convention.

use weft_common::Span;

use crate::decisions::{DecisionPointId, DecisionSet};
use crate::probe::TargetClass;
use crate::refactor_policy::{DenialReason, gate_check};
use crate::rename::RefactorContext;

/// The kind of an offered action, using editor-protocol kind strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum CodeActionKind {
    #[serde(rename = "refactor.rename")]
    RefactorRename,
    #[serde(rename = "refactor.rewrite.decision")]
    ResolveDecision,
}

/// An explicit decision choice carried by a `ResolveDecision` action.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionChoice {
    pub decision_point: DecisionPointId,
    pub value: String,
}

/// One offered action.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeAction {
    pub title: String,
    pub kind: CodeActionKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trigger_span: Option<Span>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decision: Option<DecisionChoice>,
}

/// A code-action request: a position in a document, plus any decision
/// overrides the caller already committed to.
#[derive(Debug, Clone, Default, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CodeActionRequest {
    pub uri: String,
    pub offset: u32,
    pub overrides: DecisionSet,
}

/// Compute the actions available at a position. Never raises; an empty list
/// is the answer when nothing applies.
pub(crate) fn code_actions(
    ctx: &RefactorContext<'_>,
    request: &CodeActionRequest,
) -> Vec<CodeAction> {
    let probe = ctx.probe(&request.uri, request.offset);
    if probe.target == TargetClass::Unknown {
        return Vec::new();
    }

    let plan = gate_check(
        &probe,
        ctx.settings,
        &request.overrides,
        ctx.resolver.capabilities(),
    );

    if plan.allow_operation {
        return vec![CodeAction {
            title: format!("Rename '{}'", probe.placeholder),
            kind: CodeActionKind::RefactorRename,
            trigger_span: probe.trigger_span,
            decision: None,
        }];
    }

    if plan.reason == Some(DenialReason::DecisionRequired) {
        let mut actions = Vec::new();
        for &point in &plan.unresolved_decision_points {
            for &value in point.candidates() {
                actions.push(CodeAction {
                    title: format!("Use '{}' for {}", value, point.as_str()),
                    kind: CodeActionKind::ResolveDecision,
                    trigger_span: probe.trigger_span,
                    decision: Some(DecisionChoice {
                        decision_point: point,
                        value: value.to_string(),
                    }),
                });
            }
        }
        return actions;
    }

    Vec::new()
}

#[cfg(test)]
#[path = "../tests/code_actions_tests.rs"]
mod code_actions_tests;
