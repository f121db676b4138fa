use std::collections::HashSet;

use weave::id;
use weave::item::ItemRegistry;
use weavedom::{Document, Element};

#[derive(Debug, Clone, PartialEq)]
struct Planet {
    code: u32,
    name: &'static str,
}

fn planets() -> Vec<Planet> {
    vec![
        Planet { code: 1, name: "Mercury" },
        Planet { code: 2, name: "Venus" },
        Planet { code: 3, name: "Earth" },
    ]
}

// ============================================================================
// Identifiers
// ============================================================================

#[test]
fn test_id_of_is_stable() {
    let registry: ItemRegistry<String> = ItemRegistry::new();
    let item = "Red Planet".to_string();

    let first = registry.id_of(&item);
    let second = registry.id_of(&item.clone());

    assert_eq!(first, second);
    assert_eq!(first, "red-planet");
}

#[test]
fn test_distinct_display_forms_give_distinct_ids() {
    let registry: ItemRegistry<u32> = ItemRegistry::new();
    let ids: HashSet<String> = (0..50).map(|n| registry.id_of(&n)).collect();
    assert_eq!(ids.len(), 50);
}

#[test]
fn test_default_identifier_collides_on_equal_display_forms() {
    let registry: ItemRegistry<String> = ItemRegistry::new();
    assert_eq!(
        registry.id_of(&"Foo Bar".to_string()),
        registry.id_of(&"foo-bar".to_string())
    );
}

#[test]
fn test_custom_identifier_is_sanitized() {
    let registry = ItemRegistry::custom(
        |planet: &Planet| format!("Planet #{}", planet.code),
        |planet| planet.name.to_string(),
    );
    let ids: Vec<String> = planets().iter().map(|p| registry.id_of(p)).collect();
    assert_eq!(ids, vec!["planet-1", "planet-2", "planet-3"]);
}

#[test]
fn test_non_ascii_identifiers_stay_distinct() {
    let registry: ItemRegistry<String> = ItemRegistry::new();
    let cities = ["東京", "大阪", "Zürich", "Zurich", "!", "?"];

    let ids: HashSet<String> = cities.iter().map(|c| registry.id_of(&c.to_string())).collect();

    assert_eq!(ids.len(), cities.len());
    assert!(ids.iter().all(|id| !id.is_empty()));
}

#[test]
fn test_identify_builder_replaces_default() {
    let registry = ItemRegistry::new().identify(|n: &u32| format!("n{}", n % 10));
    assert_eq!(registry.id_of(&13), registry.id_of(&3));
    assert_eq!(registry.label_of(&13), "13");
}

// ============================================================================
// Labels and Rendering
// ============================================================================

#[test]
fn test_render_defaults_to_label_text() {
    let doc = Document::new();
    let target = doc.append(doc.body(), Element::span());
    let registry = ItemRegistry::custom(|p: &Planet| p.code.to_string(), |p| p.name.to_uppercase());

    registry.render_into(&planets()[2], &doc, target);

    assert_eq!(doc.text(target), "EARTH");
}

#[test]
fn test_custom_render_is_used() {
    let doc = Document::new();
    let target = doc.append(doc.body(), Element::div());
    let registry = ItemRegistry::custom(|p: &Planet| p.code.to_string(), |p| p.name.to_string())
        .render(|planet, doc, target| {
            doc.append(target, Element::span().class("code").text(planet.code.to_string()));
            doc.append(target, Element::span().class("name").text(planet.name));
        });

    registry.render_into(&planets()[1], &doc, target);

    assert_eq!(doc.children(target).len(), 2);
    assert_eq!(doc.text(target), "2Venus");
}

#[test]
fn test_replacing_format_leaves_rendered_nodes() {
    let doc = Document::new();
    let target = doc.append(doc.body(), Element::span());
    let mut registry: ItemRegistry<u32> = ItemRegistry::new();

    registry.render_into(&7, &doc, target);
    registry.set_format(|n| format!("#{n}"));

    assert_eq!(doc.text(target), "7");
    assert_eq!(registry.label_of(&7), "#7");
}

// ============================================================================
// Id Helpers
// ============================================================================

#[test]
fn test_build_joins_and_slugs_parts() {
    assert_eq!(id::build(&["Data List", "", "Row 1"]), "data-list-row-1");
    assert_eq!(id::build(&[""]), "");
}

#[test]
fn test_build_keeps_letters_of_any_script() {
    assert_eq!(id::build(&["東京"]), "東京");
    assert_eq!(id::build(&["Ünïcode Straße"]), "ünïcode-straße");
    assert_eq!(id::build(&["Σ-Δ 42"]), "σ-δ-42");
}

#[test]
fn test_build_encodes_parts_without_letters() {
    assert_eq!(id::build(&["---"]), "u2d2d2d");
    assert_eq!(id::build(&["+"]), "u2b");
    assert_ne!(id::build(&["+"]), id::build(&["-"]));
    assert_eq!(id::build(&["menu", "?"]), "menu-u3f");
}

#[test]
fn test_unique_never_repeats() {
    let ids: HashSet<String> = (0..20).map(|_| id::unique(&["toggle"])).collect();
    assert_eq!(ids.len(), 20);
    assert!(ids.iter().all(|id| id.starts_with("toggle-")));
    assert!(id::unique(&[]).starts_with("id-"));
}
