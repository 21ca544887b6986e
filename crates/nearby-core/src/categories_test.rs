use std::path::Path;

use super::*;

const MINIMAL: &str = r##"
categories:
  - name: Health Services
    accent_colors: ["#1E88E5", "#64B5F6"]
    subcategories:
      - { name: Doctor, icon: stethoscope }
      - { name: Dentist, icon: tooth }
rules:
  - category: Health Services
    subcategory: Doctor
    prefixes: ["Doctor -"]
  - category: Health Services
    subcategory: Dentist
    prefixes: ["Dentist -"]
"##;

fn expect_validation_error(yaml: &str, needle: &str) {
    let err = parse_categories(yaml).unwrap_err();
    assert!(
        matches!(err, ConfigError::Validation(ref msg) if msg.contains(needle)),
        "expected validation error containing {needle:?}, got: {err}"
    );
}

#[test]
fn parses_minimal_file() {
    let file = parse_categories(MINIMAL).expect("minimal file should parse");
    assert_eq!(file.categories.len(), 1);
    assert_eq!(file.rules.len(), 2);
}

#[test]
fn into_parts_separates_store_and_rules() {
    let (store, rules) = parse_categories(MINIMAL).unwrap().into_parts();
    let health = store.category("Health Services").expect("category present");
    assert_eq!(health.accent_colors, ["#1E88E5", "#64B5F6"]);
    assert_eq!(health.subcategory("Dentist").unwrap().icon, "tooth");
    assert_eq!(rules.len(), 2);
    assert!(rules.rule("Health Services", "Doctor").is_some());
}

#[test]
fn rejects_malformed_yaml() {
    let err = parse_categories("categories: [oops").unwrap_err();
    assert!(matches!(err, ConfigError::CategoriesFileParse(_)), "got: {err}");
}

#[test]
fn rejects_duplicate_category() {
    let yaml = r##"
categories:
  - { name: Food, accent_colors: ["#000", "#111"], subcategories: [] }
  - { name: Food, accent_colors: ["#000", "#111"], subcategories: [] }
"##;
    expect_validation_error(yaml, "duplicate category");
}

#[test]
fn rejects_empty_category_name() {
    let yaml = r##"
categories:
  - { name: "  ", accent_colors: ["#000", "#111"], subcategories: [] }
"##;
    expect_validation_error(yaml, "non-empty");
}

#[test]
fn rejects_wrong_accent_color_count() {
    let yaml = r##"
categories:
  - { name: Food, accent_colors: ["#000"], subcategories: [] }
"##;
    expect_validation_error(yaml, "exactly 2 accent colors");
}

#[test]
fn rejects_duplicate_subcategory() {
    let yaml = r##"
categories:
  - name: Food
    accent_colors: ["#000", "#111"]
    subcategories:
      - { name: Cafe, icon: coffee }
      - { name: Cafe, icon: cup }
"##;
    expect_validation_error(yaml, "duplicate subcategory");
}

#[test]
fn rejects_rule_for_undeclared_subcategory() {
    let yaml = r##"
categories:
  - { name: Food, accent_colors: ["#000", "#111"], subcategories: [{ name: Cafe, icon: coffee }] }
rules:
  - { category: Food, subcategory: Bakery, prefixes: ["Bakery -"] }
"##;
    expect_validation_error(yaml, "undeclared subcategory");
}

#[test]
fn rejects_duplicate_rule() {
    let yaml = r##"
categories:
  - { name: Food, accent_colors: ["#000", "#111"], subcategories: [{ name: Cafe, icon: coffee }] }
rules:
  - { category: Food, subcategory: Cafe, prefixes: ["Cafe -"] }
  - { category: Food, subcategory: Cafe, prefixes: ["Coffee -"] }
"##;
    expect_validation_error(yaml, "duplicate rule");
}

#[test]
fn rejects_rule_without_prefixes() {
    let yaml = r##"
categories:
  - { name: Food, accent_colors: ["#000", "#111"], subcategories: [{ name: Cafe, icon: coffee }] }
rules:
  - { category: Food, subcategory: Cafe, prefixes: [] }
"##;
    expect_validation_error(yaml, "non-empty prefix");
}

#[test]
fn rejects_empty_prefix_string() {
    let yaml = r##"
categories:
  - { name: Food, accent_colors: ["#000", "#111"], subcategories: [{ name: Cafe, icon: coffee }] }
rules:
  - { category: Food, subcategory: Cafe, prefixes: [""] }
"##;
    expect_validation_error(yaml, "non-empty prefix");
}

#[test]
fn missing_file_is_io_error() {
    let err = load_categories(Path::new("/nonexistent/categories.yaml")).unwrap_err();
    assert!(
        matches!(err, ConfigError::CategoriesFileIo { ref path, .. } if path.contains("nonexistent")),
        "got: {err}"
    );
}

#[test]
fn load_categories_from_real_file() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join("config")
        .join("categories.yaml");
    assert!(
        path.exists(),
        "categories.yaml missing at {path:?}; required for this test"
    );
    let file = load_categories(&path).expect("shipped categories.yaml must validate");
    let (store, rules) = file.into_parts();
    assert!(!store.categories().is_empty());

    let doctor = rules
        .rule("Health Services", "Doctor")
        .expect("Health Services / Doctor rule");
    assert!(doctor.matches("Doctor - Ali Veli"));

    let vet = rules.rule("Pet Services", "Vet").expect("Pet Services / Vet rule");
    assert!(vet.matches("Vet - Pati"));
    assert!(vet.matches("Veterinary - Can Dostlar"));
    assert!(!vet.matches("Pet Shop - Mama"));
}
