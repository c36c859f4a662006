//! Shared test fixtures.
//!
//! Tests act as the forward-resolution collaborators: they register document
//! texts, hand-build the semantics rows a compilation would deliver, and
//! supply provenance edges for the template surrogates. Spans are always
//! computed from the real document text so offsets stay honest.

use weft_common::{Location, Span};
use weft_semantics::{
    DeclarationEntry, DocumentSemantics, ExpressionEntry, ExpressionOccurrenceKind,
    InstructionEntry, InstructionKind, ResourceCatalog, ResourceDefinition, ResourceKind,
    ResourceOrigin, SemanticsState, SymbolId, SymbolKey, SymbolKind,
};

use crate::provenance::{EvidenceLevel, ProvenanceEdge};
use crate::settings::Settings;
use crate::workspace::Workspace;

/// Byte span of the nth occurrence of `needle` in `text`.
pub(crate) fn span_of(text: &str, needle: &str, occurrence: usize) -> Span {
    let mut search_start = 0usize;
    for _ in 0..occurrence {
        let found = text[search_start..]
            .find(needle)
            .expect("fixture needle occurrence");
        search_start += found + needle.len();
    }
    let found = text[search_start..]
        .find(needle)
        .expect("fixture needle occurrence");
    let start = search_start + found;
    Span::new(start as u32, (start + needle.len()) as u32)
}

pub(crate) fn member_symbol(uri: &str, container: &str, name: &str) -> SymbolId {
    SymbolId::of(&SymbolKey {
        kind: SymbolKind::ViewModelMember,
        declaring_uri: uri,
        container,
        name,
        scope: 0,
    })
}

pub(crate) fn local_symbol(uri: &str, name: &str, scope: u32) -> SymbolId {
    SymbolId::of(&SymbolKey {
        kind: SymbolKind::TemplateLocal,
        declaring_uri: uri,
        container: "",
        name,
        scope,
    })
}

pub(crate) fn resource_symbol(name: &str) -> SymbolId {
    SymbolId::of(&SymbolKey {
        kind: SymbolKind::Resource,
        declaring_uri: "",
        container: "",
        name,
        scope: 0,
    })
}

/// An exact provenance edge for an original span, shifted into surrogate
/// coordinates.
pub(crate) fn exact_edge(original: Span) -> ProvenanceEdge {
    ProvenanceEdge {
        original,
        generated: Span::new(original.start + 200, original.end + 200),
        evidence: EvidenceLevel::Exact,
    }
}

pub(crate) const TEMPLATE_URI: &str = "t.html";
pub(crate) const CLASS_URI: &str = "c.ts";

pub(crate) const TEMPLATE_TEXT: &str = "<p>${total}</p>\n\
     <x count.bind=\"total\"></x>\n\
     <div repeat.for=\"item of items\"></div>\n";

pub(crate) const CLASS_TEXT: &str = "export class C {\n  total = 42;\n}\n";

/// The canonical two-document workspace: a template binding to a view-model
/// member, one custom element usage, and a builtin template controller.
pub(crate) struct CartFixture {
    pub workspace: Workspace,
    pub total: SymbolId,
    pub repeat_span: Span,
}

pub(crate) fn cart_workspace() -> CartFixture {
    cart_workspace_with_settings(Settings::default())
}

pub(crate) fn cart_workspace_with_settings(settings: Settings) -> CartFixture {
    let total = member_symbol(CLASS_URI, "C", "total");
    let x_element = resource_symbol("x");
    let count_bindable = member_symbol("x.ts", "X", "count");
    let repeat_controller = resource_symbol("repeat");

    let mut workspace = Workspace::new(settings);
    workspace.upsert_document(TEMPLATE_URI, TEMPLATE_TEXT, 1);
    workspace.upsert_document(CLASS_URI, CLASS_TEXT, 1);

    // Class source: the declaration the discovery pass found.
    workspace.set_semantics(
        CLASS_URI,
        SemanticsState::Compiled(DocumentSemantics {
            declarations: vec![DeclarationEntry::new(
                span_of(CLASS_TEXT, "total", 0),
                "total",
                SymbolKind::ViewModelMember,
                total,
            )],
            ..DocumentSemantics::default()
        }),
    );

    // Template: two resolved expression occurrences of `total`, the element
    // and attribute rows, and an unresolved `items` occurrence.
    let interp_span = span_of(TEMPLATE_TEXT, "total", 0);
    let bind_value_span = span_of(TEMPLATE_TEXT, "total", 1);
    let repeat_span = span_of(TEMPLATE_TEXT, "repeat", 0);
    workspace.set_semantics(
        TEMPLATE_URI,
        SemanticsState::Compiled(DocumentSemantics {
            expressions: vec![
                ExpressionEntry::new(
                    interp_span,
                    "total",
                    ExpressionOccurrenceKind::Identifier,
                    Some(total),
                ),
                ExpressionEntry::new(
                    bind_value_span,
                    "total",
                    ExpressionOccurrenceKind::Identifier,
                    Some(total),
                ),
                ExpressionEntry::new(
                    span_of(TEMPLATE_TEXT, "items", 0),
                    "items",
                    ExpressionOccurrenceKind::Identifier,
                    None,
                ),
            ],
            instructions: vec![
                InstructionEntry::new(
                    span_of(TEMPLATE_TEXT, "x", 0),
                    "x",
                    InstructionKind::ResourceName,
                    Some(x_element),
                ),
                InstructionEntry::new(
                    span_of(TEMPLATE_TEXT, "count", 0),
                    "count",
                    InstructionKind::BindableName,
                    Some(count_bindable),
                ),
                InstructionEntry::new(
                    repeat_span,
                    "repeat",
                    InstructionKind::ResourceName,
                    Some(repeat_controller),
                ),
            ],
            declarations: Vec::new(),
        }),
    );

    // Surrogate provenance: both expression occurrences copied verbatim.
    workspace.set_provenance(
        TEMPLATE_URI,
        vec![exact_edge(interp_span), exact_edge(bind_value_span)],
    );

    let mut catalog = ResourceCatalog::new();
    catalog.define(ResourceDefinition {
        name: "x".to_string(),
        kind: ResourceKind::CustomElement,
        origin: ResourceOrigin::SourceAnalyzed,
        symbol: x_element,
        declaration: Some(Location::new("x.ts", Span::new(0, 1))),
        bindables: vec![weft_semantics::BindableDefinition {
            name: "count".to_string(),
            symbol: count_bindable,
        }],
    });
    catalog.define(ResourceDefinition {
        name: "repeat".to_string(),
        kind: ResourceKind::TemplateController,
        origin: ResourceOrigin::Builtin,
        symbol: repeat_controller,
        declaration: None,
        bindables: Vec::new(),
    });
    workspace.set_resource_catalog(catalog);

    CartFixture {
        workspace,
        total,
        repeat_span,
    }
}
