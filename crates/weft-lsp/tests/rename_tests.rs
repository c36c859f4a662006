use super::*;
use weft_common::Location;
use weft_semantics::{
    DeclarationEntry, DocumentSemantics, ExpressionEntry, ExpressionOccurrenceKind, FallbackEdit,
    ResolverCapabilities, SemanticsState, SymbolKind,
};

use crate::fixtures::{
    CLASS_TEXT, CLASS_URI, TEMPLATE_TEXT, TEMPLATE_URI, cart_workspace, exact_edge, local_symbol,
    member_symbol, span_of,
};
use crate::provenance::ProvenanceEdge;
use crate::workspace::Workspace;

// ---------------------------------------------------------------------------
// E2E: literal rename from either entry point
// ---------------------------------------------------------------------------

fn assert_three_total_edits(result: &WorkspaceRename) {
    let mut edits = result.edits.clone();
    edits.sort_by(|a, b| (a.uri.as_str(), a.span).cmp(&(b.uri.as_str(), b.span)));

    assert_eq!(edits.len(), 3);
    assert_eq!(edits[0].uri, CLASS_URI);
    assert_eq!(edits[0].span, span_of(CLASS_TEXT, "total", 0));
    assert_eq!(edits[1].uri, TEMPLATE_URI);
    assert_eq!(edits[1].span, span_of(TEMPLATE_TEXT, "total", 0));
    assert_eq!(edits[2].uri, TEMPLATE_URI);
    assert_eq!(edits[2].span, span_of(TEMPLATE_TEXT, "total", 1));
    assert!(edits.iter().all(|e| e.new_text == "grandTotal"));
}

#[test]
fn test_rename_literal_from_template() {
    let mut fixture = cart_workspace();
    let offset = span_of(TEMPLATE_TEXT, "total", 0).start + 2;

    let result = fixture
        .workspace
        .rename(TEMPLATE_URI, offset, "grandTotal")
        .expect("rename succeeds");
    assert_three_total_edits(&result);
}

#[test]
fn test_rename_literal_from_class() {
    let mut fixture = cart_workspace();
    let offset = span_of(CLASS_TEXT, "total", 0).start;

    let result = fixture
        .workspace
        .rename(CLASS_URI, offset, "grandTotal")
        .expect("rename succeeds");
    assert_three_total_edits(&result);
}

#[test]
fn test_rename_edits_ordered_for_in_place_application() {
    let mut fixture = cart_workspace();
    let offset = span_of(CLASS_TEXT, "total", 0).start;

    let result = fixture
        .workspace
        .rename(CLASS_URI, offset, "grandTotal")
        .unwrap();

    // Documents ascending, spans descending within a document.
    let keys: Vec<(&str, u32)> = result
        .edits
        .iter()
        .map(|e| (e.uri.as_str(), e.span.start))
        .collect();
    let template_first = span_of(TEMPLATE_TEXT, "total", 0).start;
    let template_second = span_of(TEMPLATE_TEXT, "total", 1).start;
    assert_eq!(
        keys,
        vec![
            (CLASS_URI, span_of(CLASS_TEXT, "total", 0).start),
            (TEMPLATE_URI, template_second),
            (TEMPLATE_URI, template_first),
        ]
    );
}

// ---------------------------------------------------------------------------
// E2E: builtin denial
// ---------------------------------------------------------------------------

#[test]
fn test_rename_builtin_template_controller_denied() {
    let mut fixture = cart_workspace();
    let offset = fixture.repeat_span.start;

    let error = fixture
        .workspace
        .rename(TEMPLATE_URI, offset, "iterate")
        .unwrap_err();
    assert_eq!(error.kind, RefactorErrorKind::RefactorPolicyDenied);
    assert_eq!(error.data.reason, Some(DenialReason::TargetNotAllowed));
    assert!(!error.retryable);

    let json = serde_json::to_value(&error).unwrap();
    assert_eq!(json["kind"], "refactor-policy-denied");
}

#[test]
fn test_prepare_rename_builtin_denied_as_error() {
    let mut fixture = cart_workspace();
    let offset = fixture.repeat_span.start;

    let error = fixture
        .workspace
        .prepare_rename(TEMPLATE_URI, offset)
        .unwrap_err();
    assert_eq!(error.kind, RefactorErrorKind::RefactorPolicyDenied);
}

// ---------------------------------------------------------------------------
// Scope safety
// ---------------------------------------------------------------------------

const SCOPED_TEMPLATE_URI: &str = "scoped.html";
const SCOPED_TEMPLATE_TEXT: &str =
    "<p>${total}</p>\n<div repeat.for=\"item of rows\">${item.total}</div>\n";

/// `${total}` resolves to the view-model member; `${item.total}` resolves to
/// the iteration item's member. Same text, different symbols.
fn scoped_workspace() -> (Workspace, weft_semantics::SymbolId) {
    let vm_total = member_symbol("scoped.ts", "Scoped", "total");
    let item_total = member_symbol("row.ts", "Row", "total");
    let item_local = local_symbol(SCOPED_TEMPLATE_URI, "item", 1);

    let class_text = "export class Scoped {\n  total = 0;\n}\n";
    let mut workspace = Workspace::new(Settings::default());
    workspace.upsert_document(SCOPED_TEMPLATE_URI, SCOPED_TEMPLATE_TEXT, 1);
    workspace.upsert_document("scoped.ts", class_text, 1);

    workspace.set_semantics(
        "scoped.ts",
        SemanticsState::Compiled(DocumentSemantics {
            declarations: vec![DeclarationEntry::new(
                span_of(class_text, "total", 0),
                "total",
                SymbolKind::ViewModelMember,
                vm_total,
            )],
            ..DocumentSemantics::default()
        }),
    );

    workspace.set_semantics(
        SCOPED_TEMPLATE_URI,
        SemanticsState::Compiled(DocumentSemantics {
            declarations: vec![DeclarationEntry::new(
                span_of(SCOPED_TEMPLATE_TEXT, "item", 0),
                "item",
                SymbolKind::TemplateLocal,
                item_local,
            )],
            expressions: vec![
                ExpressionEntry::new(
                    span_of(SCOPED_TEMPLATE_TEXT, "total", 0),
                    "total",
                    ExpressionOccurrenceKind::Identifier,
                    Some(vm_total),
                ),
                ExpressionEntry::new(
                    span_of(SCOPED_TEMPLATE_TEXT, "item", 1),
                    "item",
                    ExpressionOccurrenceKind::Identifier,
                    Some(item_local),
                ),
                ExpressionEntry::new(
                    span_of(SCOPED_TEMPLATE_TEXT, "total", 1),
                    "total",
                    ExpressionOccurrenceKind::MemberAccess,
                    Some(item_total),
                ),
            ],
            ..DocumentSemantics::default()
        }),
    );

    (workspace, vm_total)
}

#[test]
fn test_renaming_view_model_member_leaves_item_member_untouched() {
    let (mut workspace, _) = scoped_workspace();
    let offset = span_of(SCOPED_TEMPLATE_TEXT, "total", 0).start;

    let result = workspace
        .rename(SCOPED_TEMPLATE_URI, offset, "sum")
        .expect("rename succeeds");

    let shadowed = span_of(SCOPED_TEMPLATE_TEXT, "total", 1);
    assert!(
        result
            .edits
            .iter()
            .all(|e| !(e.uri == SCOPED_TEMPLATE_URI && e.span == shadowed)),
        "the item-member occurrence must not be rewritten"
    );
    // Declaration plus the one interpolation occurrence.
    assert_eq!(result.edits.len(), 2);
}

#[test]
fn test_renaming_item_member_leaves_view_model_member_untouched() {
    let (mut workspace, _) = scoped_workspace();
    let offset = span_of(SCOPED_TEMPLATE_TEXT, "total", 1).start;

    let result = workspace
        .rename(SCOPED_TEMPLATE_URI, offset, "sum")
        .expect("rename succeeds");

    let outer = span_of(SCOPED_TEMPLATE_TEXT, "total", 0);
    assert!(
        result
            .edits
            .iter()
            .all(|e| !(e.uri == SCOPED_TEMPLATE_URI && e.span == outer))
    );
    assert_eq!(result.edits.len(), 1);
}

// ---------------------------------------------------------------------------
// E2E: shadowed <let> scope exclusion
// ---------------------------------------------------------------------------

const LET_TEMPLATE_URI: &str = "lets.html";
const LET_TEMPLATE_TEXT: &str = "<let total.bind=\"base\"></let>\n\
     <div repeat.for=\"entry of entries\">\n\
     <let total.bind=\"entry.total\"></let>\n\
     <span>${total}</span>\n\
     </div>\n";

fn let_workspace() -> Workspace {
    let outer_total = local_symbol(LET_TEMPLATE_URI, "total", 0);
    let inner_total = local_symbol(LET_TEMPLATE_URI, "total", 1);
    let entry_total = member_symbol("entry.ts", "Entry", "total");
    let entry_local = local_symbol(LET_TEMPLATE_URI, "entry", 1);

    let mut workspace = Workspace::new(Settings::default());
    workspace.upsert_document(LET_TEMPLATE_URI, LET_TEMPLATE_TEXT, 1);
    workspace.set_semantics(
        LET_TEMPLATE_URI,
        SemanticsState::Compiled(DocumentSemantics {
            declarations: vec![
                DeclarationEntry::new(
                    span_of(LET_TEMPLATE_TEXT, "total", 0),
                    "total",
                    SymbolKind::TemplateLocal,
                    outer_total,
                ),
                DeclarationEntry::new(
                    span_of(LET_TEMPLATE_TEXT, "entry", 0),
                    "entry",
                    SymbolKind::TemplateLocal,
                    entry_local,
                ),
                DeclarationEntry::new(
                    span_of(LET_TEMPLATE_TEXT, "total", 1),
                    "total",
                    SymbolKind::TemplateLocal,
                    inner_total,
                ),
            ],
            expressions: vec![
                ExpressionEntry::new(
                    span_of(LET_TEMPLATE_TEXT, "entry", 1),
                    "entry",
                    ExpressionOccurrenceKind::Identifier,
                    Some(entry_local),
                ),
                ExpressionEntry::new(
                    span_of(LET_TEMPLATE_TEXT, "total", 2),
                    "total",
                    ExpressionOccurrenceKind::MemberAccess,
                    Some(entry_total),
                ),
                // `${total}` sees the inner, shadowing declaration.
                ExpressionEntry::new(
                    span_of(LET_TEMPLATE_TEXT, "total", 3),
                    "total",
                    ExpressionOccurrenceKind::Identifier,
                    Some(inner_total),
                ),
            ],
            ..DocumentSemantics::default()
        }),
    );
    workspace
}

#[test]
fn test_renaming_inner_let_excludes_outer_declaration() {
    let mut workspace = let_workspace();
    let inner_decl = span_of(LET_TEMPLATE_TEXT, "total", 1);

    let result = workspace
        .rename(LET_TEMPLATE_URI, inner_decl.start, "subtotal")
        .expect("rename succeeds");

    let outer_decl = span_of(LET_TEMPLATE_TEXT, "total", 0);
    assert!(result.edits.iter().all(|e| e.span != outer_decl));
    // Inner declaration and the `${total}` usage.
    assert_eq!(result.edits.len(), 2);
    let spans: Vec<Span> = result.edits.iter().map(|e| e.span).collect();
    assert!(spans.contains(&inner_decl));
    assert!(spans.contains(&span_of(LET_TEMPLATE_TEXT, "total", 3)));
}

#[test]
fn test_renaming_outer_let_excludes_inner_spans() {
    let mut workspace = let_workspace();
    let outer_decl = span_of(LET_TEMPLATE_TEXT, "total", 0);

    let result = workspace
        .rename(LET_TEMPLATE_URI, outer_decl.start, "subtotal")
        .expect("rename succeeds");

    assert_eq!(result.edits.len(), 1);
    assert_eq!(result.edits[0].span, outer_decl);
}

// ---------------------------------------------------------------------------
// All-or-nothing
// ---------------------------------------------------------------------------

/// A workspace whose second expression occurrence is covered only by a
/// heuristic provenance edge.
fn heuristic_workspace() -> (Workspace, u32) {
    let total = member_symbol("h.ts", "H", "total");
    let template = "${total} ${total}";

    let mut workspace = Workspace::new(Settings::default());
    workspace.upsert_document("h.html", template, 1);

    let first = span_of(template, "total", 0);
    let second = span_of(template, "total", 1);
    workspace.set_semantics(
        "h.html",
        SemanticsState::Compiled(DocumentSemantics {
            expressions: vec![
                ExpressionEntry::new(
                    first,
                    "total",
                    ExpressionOccurrenceKind::Identifier,
                    Some(total),
                ),
                ExpressionEntry::new(
                    second,
                    "total",
                    ExpressionOccurrenceKind::Identifier,
                    Some(total),
                ),
            ],
            ..DocumentSemantics::default()
        }),
    );
    workspace.set_provenance(
        "h.html",
        vec![
            exact_edge(first),
            ProvenanceEdge {
                original: second,
                generated: Span::new(second.start + 200, second.end + 200),
                evidence: EvidenceLevel::Heuristic,
            },
        ],
    );

    (workspace, first.start)
}

#[test]
fn test_unprovable_site_denies_whole_rename_with_zero_edits() {
    let (mut workspace, offset) = heuristic_workspace();

    let error = workspace.rename("h.html", offset, "sum").unwrap_err();
    assert_eq!(error.kind, RefactorErrorKind::RefactorPolicyDenied);
    assert_eq!(error.data.reason, Some(DenialReason::RouteExhausted));
}

#[test]
fn test_heuristic_opt_in_allows_rename_with_partial_confidence() {
    let (mut workspace, offset) = heuristic_workspace();
    let mut settings = Settings::default();
    settings.allow_heuristic_provenance = true;
    settings.allow_fallback_route = false;
    workspace.set_settings(settings);

    let result = workspace.rename("h.html", offset, "sum").expect("rename");
    assert_eq!(result.edits.len(), 2);
    assert_eq!(result.safety.confidence, RenameConfidence::Partial);
    assert!(result.safety.certain_references < result.safety.total_references);
}

// ---------------------------------------------------------------------------
// Fallback route
// ---------------------------------------------------------------------------

struct ScriptedResolver {
    capabilities: ResolverCapabilities,
    edits: Vec<FallbackEdit>,
}

impl weft_semantics::FallbackResolver for ScriptedResolver {
    fn capabilities(&self) -> ResolverCapabilities {
        self.capabilities
    }

    fn references(&self, _uri: &str, _offset: u32) -> Vec<Location> {
        self.edits.iter().map(|e| e.location.clone()).collect()
    }

    fn rename_edits(&self, _uri: &str, _offset: u32, _new_name: &str) -> Option<Vec<FallbackEdit>> {
        if self.edits.is_empty() {
            None
        } else {
            Some(self.edits.clone())
        }
    }
}

#[test]
fn test_fallback_route_wins_when_semantic_route_refuses() {
    // Same shape as `heuristic_workspace`, but wired with a resolver that
    // covers both sites.
    let total = member_symbol("h.ts", "H", "total");
    let template = "${total} ${total}";
    let first = span_of(template, "total", 0);
    let second = span_of(template, "total", 1);

    let resolver = ScriptedResolver {
        capabilities: ResolverCapabilities {
            references: true,
            rename: true,
        },
        edits: vec![
            FallbackEdit {
                location: Location::new("h.html", first),
                new_text: "sum".to_string(),
            },
            FallbackEdit {
                location: Location::new("h.html", second),
                new_text: "sum".to_string(),
            },
        ],
    };

    let mut workspace = Workspace::with_resolver(Settings::default(), Box::new(resolver));
    workspace.upsert_document("h.html", template, 1);
    workspace.set_semantics(
        "h.html",
        SemanticsState::Compiled(DocumentSemantics {
            expressions: vec![
                ExpressionEntry::new(
                    first,
                    "total",
                    ExpressionOccurrenceKind::Identifier,
                    Some(total),
                ),
                ExpressionEntry::new(
                    second,
                    "total",
                    ExpressionOccurrenceKind::Identifier,
                    Some(total),
                ),
            ],
            ..DocumentSemantics::default()
        }),
    );
    workspace.set_provenance(
        "h.html",
        vec![
            exact_edge(first),
            ProvenanceEdge {
                original: second,
                generated: Span::new(second.start + 200, second.end + 200),
                evidence: EvidenceLevel::Heuristic,
            },
        ],
    );

    let result = workspace
        .rename("h.html", first.start, "sum")
        .expect("fallback");
    assert_eq!(result.edits.len(), 2);
}

#[test]
fn test_fallback_missing_a_known_site_is_refused() {
    let total = member_symbol("h.ts", "H", "total");
    let template = "${total} ${total}";
    let first = span_of(template, "total", 0);
    let second = span_of(template, "total", 1);

    // The resolver only knows about the first occurrence.
    let resolver = ScriptedResolver {
        capabilities: ResolverCapabilities {
            references: true,
            rename: true,
        },
        edits: vec![FallbackEdit {
            location: Location::new("h.html", first),
            new_text: "sum".to_string(),
        }],
    };

    let mut workspace = Workspace::with_resolver(Settings::default(), Box::new(resolver));
    workspace.upsert_document("h.html", template, 1);
    workspace.set_semantics(
        "h.html",
        SemanticsState::Compiled(DocumentSemantics {
            expressions: vec![
                ExpressionEntry::new(
                    first,
                    "total",
                    ExpressionOccurrenceKind::Identifier,
                    Some(total),
                ),
                ExpressionEntry::new(
                    second,
                    "total",
                    ExpressionOccurrenceKind::Identifier,
                    Some(total),
                ),
            ],
            ..DocumentSemantics::default()
        }),
    );
    // No grounding for the second occurrence, so the semantic route refuses
    // and the incomplete fallback answer must be refused as well.
    workspace.set_provenance("h.html", vec![exact_edge(first)]);

    let error = workspace.rename("h.html", first.start, "sum").unwrap_err();
    assert_eq!(error.data.reason, Some(DenialReason::RouteExhausted));
}

// ---------------------------------------------------------------------------
// Resource rename
// ---------------------------------------------------------------------------

#[test]
fn test_resource_rename_rewrites_declaration_and_markup() {
    let mut fixture = cart_workspace();
    let tag_span = span_of(TEMPLATE_TEXT, "x", 0);

    let result = fixture
        .workspace
        .rename(TEMPLATE_URI, tag_span.start, "y")
        .expect("rename succeeds");

    assert_eq!(result.edits.len(), 2);
    let uris: Vec<&str> = result.edits.iter().map(|e| e.uri.as_str()).collect();
    assert!(uris.contains(&"x.ts"));
    assert!(uris.contains(&TEMPLATE_URI));
}

#[test]
fn test_resource_rename_kebab_style_decision() {
    let mut fixture = cart_workspace();
    let tag_span = span_of(TEMPLATE_TEXT, "x", 0);

    let mut overrides = DecisionSet::new();
    overrides.set(DecisionPointId::RenameStyle, "kebab-case");

    let result = fixture
        .workspace
        .rename_with_overrides(TEMPLATE_URI, tag_span.start, "fancyBox", &overrides)
        .expect("rename succeeds");

    let markup_edit = result
        .edits
        .iter()
        .find(|e| e.uri == TEMPLATE_URI)
        .expect("markup edit");
    assert_eq!(markup_edit.new_text, "fancy-box");
    // The declaration keeps the requested spelling.
    let decl_edit = result.edits.iter().find(|e| e.uri == "x.ts").unwrap();
    assert_eq!(decl_edit.new_text, "fancyBox");
}

// ---------------------------------------------------------------------------
// Classification, validation, decisions
// ---------------------------------------------------------------------------

#[test]
fn test_rename_nothing_at_cursor_is_denied_unknown_target() {
    let mut fixture = cart_workspace();

    let error = fixture
        .workspace
        .rename(TEMPLATE_URI, 1, "anything")
        .unwrap_err();
    assert_eq!(error.data.reason, Some(DenialReason::UnknownTarget));
}

#[test]
fn test_invalid_new_name_is_typed_error() {
    let mut fixture = cart_workspace();
    let offset = span_of(CLASS_TEXT, "total", 0).start;

    for bad in ["", "1total", "of", "a b"] {
        let error = fixture
            .workspace
            .rename(CLASS_URI, offset, bad)
            .unwrap_err();
        assert_eq!(error.kind, RefactorErrorKind::InvalidNewName, "{bad:?}");
    }
}

#[test]
fn test_strict_decisions_surface_unresolved_point_ids() {
    let mut fixture = cart_workspace();
    let mut settings = Settings::default();
    settings.strict_decisions = true;
    fixture.workspace.set_settings(settings);

    let offset = span_of(CLASS_TEXT, "total", 0).start;
    let error = fixture
        .workspace
        .rename(CLASS_URI, offset, "grandTotal")
        .unwrap_err();
    assert_eq!(error.data.reason, Some(DenialReason::DecisionRequired));
    assert_eq!(
        error.data.unresolved_decision_point_ids,
        vec![DecisionPointId::AliasStrategy]
    );

    // An explicit request override unblocks the same request.
    let mut overrides = DecisionSet::new();
    overrides.set(DecisionPointId::AliasStrategy, "rewrite-references");
    let result = fixture
        .workspace
        .rename_with_overrides(CLASS_URI, offset, "grandTotal", &overrides)
        .expect("rename succeeds");
    assert_eq!(result.edits.len(), 3);
}

// ---------------------------------------------------------------------------
// prepare_rename
// ---------------------------------------------------------------------------

#[test]
fn test_prepare_rename_reports_range_placeholder_safety() {
    let mut fixture = cart_workspace();
    let span = span_of(TEMPLATE_TEXT, "total", 0);

    let prepared = fixture
        .workspace
        .prepare_rename(TEMPLATE_URI, span.start)
        .expect("prepare succeeds");

    assert!(prepared.can_rename);
    assert_eq!(prepared.range, Some(span));
    assert_eq!(prepared.placeholder, "total");
    assert!(prepared.conclusive);

    let safety = prepared.safety.expect("safety payload");
    assert_eq!(safety.total_references, 3);
    assert!(safety.certain_references <= safety.total_references);
    assert_eq!(safety.confidence, RenameConfidence::Exact);
}

#[test]
fn test_prepare_rename_on_nothing_is_not_an_error() {
    let mut fixture = cart_workspace();

    let prepared = fixture
        .workspace
        .prepare_rename(TEMPLATE_URI, 1)
        .expect("classification failure is a value, not an error");
    assert!(!prepared.can_rename);
    assert!(prepared.localized_error_message.is_some());
}

// ---------------------------------------------------------------------------
// Name helpers
// ---------------------------------------------------------------------------

#[test]
fn test_kebab_case_conversion() {
    assert_eq!(kebab_case("fancyBox"), "fancy-box");
    assert_eq!(kebab_case("FancyBox"), "fancy-box");
    assert_eq!(kebab_case("already-kebab"), "already-kebab");
    assert_eq!(kebab_case("x"), "x");
}

#[test]
fn test_member_name_validation() {
    assert!(is_valid_member_name("grandTotal"));
    assert!(is_valid_member_name("$parentValue"));
    assert!(is_valid_member_name("_private"));
    assert!(!is_valid_member_name("of"));
    assert!(!is_valid_member_name("$parent"));
    assert!(!is_valid_member_name("9lives"));
    assert!(!is_valid_member_name(""));
}

#[test]
fn test_resource_name_validation() {
    assert!(is_valid_resource_name("my-widget"));
    assert!(is_valid_resource_name("x"));
    assert!(is_valid_resource_name("a2-b3"));
    assert!(!is_valid_resource_name("My-Widget"));
    assert!(!is_valid_resource_name("-leading"));
    assert!(!is_valid_resource_name("double--dash"));
    assert!(!is_valid_resource_name(""));
}
