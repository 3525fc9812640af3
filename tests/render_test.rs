//! End-to-end rendering through the public API.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]
#![allow(missing_docs)]

use googletest::prelude::*;
use live_i18n::diagnostics::MemorySink;
use live_i18n::dom::{
    Document,
    DocumentTree,
    NodeId,
};
use live_i18n::{
    I18nError,
    LanguageController,
    TranslationTable,
    VarsMap,
};
use pretty_assertions::assert_eq;
use rstest::*;
use serde_json::json;

fn table() -> TranslationTable {
    serde_json::from_value(json!({
        "en": {
            "a": { "b": "Hi {n}" },
            "title": "Welcome",
            "card": { "heading": "Card", "body": "Body for {who}" },
            "deep": { "one": { "two": { "three": { "leaf": "Deep {x} and {x}" } } } },
            "rich": "<em>{n}</em>"
        },
        "es": {
            "a": { "b": "Hola {n}" },
            "title": "Bienvenido",
            "card": { "heading": "Tarjeta", "body": "Cuerpo para {who}" },
            "deep": { "one": { "two": { "three": { "leaf": "Profundo {x} y {x}" } } } },
            "rich": "<em>{n}</em>"
        }
    }))
    .unwrap()
}

/// Main tree with a title, a card whose shadow root hosts another card.
const NESTED_DOCUMENT: &str = r#"[
    { "tag": "h1", "attributes": { "id": "title", "data-i18n": "title" } },
    { "tag": "x-card", "attributes": { "id": "outer-card" }, "shadow": [
        { "tag": "h2", "attributes": { "id": "outer-heading", "data-i18n": "card.heading" } },
        { "tag": "x-card", "attributes": { "id": "inner-card" }, "shadow": [
            { "tag": "p", "attributes": {
                "id": "inner-body",
                "data-i18n": "card.body",
                "data-i18n-vars": "{\"who\": \"Ana\"}"
            } }
        ] }
    ] }
]"#;

fn controller_for(document: &str) -> (LanguageController<Document>, MemorySink) {
    let sink = MemorySink::new();
    let mut controller =
        LanguageController::new(Document::from_json_str(document).unwrap()).with_sink(sink.clone());
    controller.load(table());
    (controller, sink)
}

fn text_of(controller: &LanguageController<Document>, id: &str) -> String {
    let document = controller.document();
    document.text_content(document.element_by_id(id).unwrap())
}

fn vars(pairs: &[(&str, &str)]) -> VarsMap {
    pairs.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())).collect()
}

#[rstest]
#[googletest::test]
fn switching_language_changes_resolution() {
    let (mut controller, sink) = controller_for("[]");

    expect_that!(controller.get("a.b", &vars(&[("n", "Sam")])), eq("Hi Sam"));
    controller.set_language("es");
    expect_that!(controller.get("a.b", &vars(&[("n", "Sam")])), eq("Hola Sam"));
    expect_that!(sink.is_empty(), eq(true));
}

#[rstest]
#[case("title", "Welcome")]
#[case("a.b", "Hi {n}")]
#[case("deep.one.two.three.leaf", "Deep {x} and {x}")]
fn stored_strings_resolve_at_any_depth(#[case] key: &str, #[case] expected: &str) {
    let (controller, _) = controller_for("[]");

    assert_that!(controller.get(key, &VarsMap::new()), eq(expected));
}

#[rstest]
#[case("a.c")]
#[case("nope")]
#[case("deep.one.missing.three.leaf")]
#[case("title.extra")]
fn unresolvable_keys_fall_back_to_key(#[case] key: &str) {
    let (controller, sink) = controller_for("[]");

    assert_that!(controller.get(key, &VarsMap::new()), eq(key));
    assert_that!(
        sink.records(),
        elements_are![eq(&I18nError::MissingKey { key: key.to_string(), language: "en".to_string() })]
    );
}

#[rstest]
fn all_occurrences_of_a_placeholder_are_replaced() {
    let (controller, _) = controller_for("[]");

    assert_that!(
        controller.get("deep.one.two.three.leaf", &vars(&[("x", "v"), ("y", "unused")])),
        eq("Deep v and v")
    );
    assert_that!(controller.get("card.body", &VarsMap::new()), eq("Body for {who}"));
}

#[rstest]
fn unknown_language_changes_nothing() {
    let (mut controller, sink) = controller_for(NESTED_DOCUMENT);
    controller.apply();
    let before = controller.document().to_html();

    controller.set_language("fr");

    assert_that!(controller.current_language(), eq("en"));
    assert_eq!(controller.document().to_html(), before);
    assert_that!(
        sink.records(),
        elements_are![eq(&I18nError::UnknownLanguage { language: "fr".to_string() })]
    );
}

#[rstest]
#[googletest::test]
fn apply_reaches_nested_encapsulated_subtrees() {
    let (mut controller, sink) = controller_for(NESTED_DOCUMENT);

    controller.apply();

    expect_that!(text_of(&controller, "title"), eq("Welcome"));
    expect_that!(text_of(&controller, "outer-heading"), eq("Card"));
    expect_that!(text_of(&controller, "inner-body"), eq("Body for Ana"));

    controller.set_language("es");

    expect_that!(text_of(&controller, "title"), eq("Bienvenido"));
    expect_that!(text_of(&controller, "outer-heading"), eq("Tarjeta"));
    expect_that!(text_of(&controller, "inner-body"), eq("Cuerpo para Ana"));
    expect_that!(sink.is_empty(), eq(true));
}

#[rstest]
fn apply_is_idempotent() {
    let (mut controller, _) = controller_for(NESTED_DOCUMENT);

    controller.apply();
    let first = controller.document().to_html();
    controller.apply();
    let second = controller.document().to_html();

    assert_eq!(first, second);
}

#[rstest]
fn repeated_renders_do_not_grow_the_document() {
    let (mut controller, _) = controller_for(NESTED_DOCUMENT);
    controller.apply();
    let nodes = controller.document().node_count();

    for _ in 0..50 {
        controller.set_language("es");
        controller.set_language("en");
        controller.apply();
    }

    assert_eq!(controller.document().node_count(), nodes);
    assert_eq!(text_of(&controller, "inner-body"), "Body for Ana");
}

#[rstest]
#[googletest::test]
fn malformed_vars_leave_placeholders_untouched() {
    let (mut controller, sink) = controller_for(
        r#"[{ "tag": "p", "attributes": {
            "id": "broken", "data-i18n": "a.b", "data-i18n-vars": "{n: Sam}"
        } }]"#,
    );

    controller.apply();

    expect_that!(text_of(&controller, "broken"), eq("Hi {n}"));
    let records = sink.records();
    assert_that!(records.len(), eq(1));
    expect_that!(
        matches!(&records[0], I18nError::MalformedVars { key, .. } if key == "a.b"),
        eq(true)
    );
}

#[rstest]
fn text_is_escaped_unless_markup_is_requested() {
    let (mut controller, _) = controller_for(
        r#"[
            { "tag": "span", "attributes": {
                "data-i18n": "rich", "data-i18n-vars": "{\"n\": \"x\"}"
            } },
            { "tag": "span", "attributes": {
                "data-i18n": "rich", "data-i18n-vars": "{\"n\": \"x\"}", "data-i18n-html": ""
            } }
        ]"#,
    );

    controller.apply();

    assert_eq!(
        controller.document().to_html(),
        concat!(
            r#"<span data-i18n="rich" data-i18n-vars="{&quot;n&quot;: &quot;x&quot;}">"#,
            "&lt;em&gt;x&lt;/em&gt;</span>",
            r#"<span data-i18n="rich" data-i18n-html="" data-i18n-vars="{&quot;n&quot;: &quot;x&quot;}">"#,
            "<em>x</em></span>"
        )
    );
}

#[rstest]
fn works_through_the_document_trait_with_built_trees() {
    let mut document = Document::new();
    let root = DocumentTree::root(&document);
    let host = document.append_element(root, "x-outer");
    let outer_shadow = document.attach_shadow(host).unwrap();
    let inner_host = document.append_element(outer_shadow, "x-inner");
    let inner_shadow = document.attach_shadow(inner_host).unwrap();
    let target: NodeId = document.append_element(inner_shadow, "span");
    document.set_attribute(target, "data-i18n", "title");

    let mut controller = LanguageController::with_language(document, "es");
    controller.load(table());
    controller.apply();

    assert_eq!(controller.into_document().text_content(target), "Bienvenido");
}
