use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use xrcg_common_config::{ManifestConfig, RegistryConfig};
use xrcg_manifest::{
    load_manifest, render_manifest, update_manifest, update_manifest_file, validate_manifest,
    DuplicateKind,
};
use xrcg_registry::{compile, CommandRegistry};
use xrcg_test_utils::{assert_ok, base_manifest, sample_tree, temp_dir, write_manifest};

fn sample_registry() -> CommandRegistry {
    let tree = sample_tree();
    assert_ok!(compile(tree.root(), &RegistryConfig::default()))
}

fn menu_commands(document: &Value, menu: &str) -> Vec<String> {
    document["contributes"]["menus"][menu]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["command"].as_str().unwrap().to_string())
        .collect()
}

#[test]
fn test_end_to_end_sample() {
    let registry = sample_registry();
    let mut document = base_manifest();
    let summary = assert_ok!(update_manifest(
        &mut document,
        &registry,
        &ManifestConfig::default(),
        "1.4.0"
    ));

    assert_eq!(summary.commands, 3);
    assert_eq!(summary.submenus, vec!["xrcg.py", "xrcg.cs"]);
    assert!(summary.unlisted_groups.is_empty());

    let ids: Vec<&str> = document["contributes"]["commands"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["command"].as_str().unwrap())
        .collect();
    assert_eq!(
        ids,
        vec![
            "xrcg.generate-py-kafkaproducer",
            "xrcg.generate-cs-sbproducer",
            "xrcg.generate-py-kafkaconsumer",
        ]
    );

    // Python submenu sorted by description: "Generate PY kafkaconsumer" < "Generate Python ..."
    assert_eq!(
        menu_commands(&document, "xrcg.py"),
        vec!["xrcg.generate-py-kafkaconsumer", "xrcg.generate-py-kafkaproducer"]
    );
    assert_eq!(menu_commands(&document, "xrcg.cs"), vec!["xrcg.generate-cs-sbproducer"]);

    let titles: Vec<&str> = document["contributes"]["commands"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["title"].as_str().unwrap())
        .collect();
    assert_eq!(
        titles,
        vec!["Python Kafka producer", "C# Service Bus producer", "PY kafkaconsumer"]
    );
}

#[test]
fn test_generated_manifest_validates_clean() {
    let registry = sample_registry();
    let mut document = base_manifest();
    update_manifest(&mut document, &registry, &ManifestConfig::default(), "1.0.0").unwrap();

    let report = validate_manifest(&document);
    assert!(report.is_clean(), "{:?}", report.diagnostics);
    assert_eq!(report.commands_checked, 3);
}

#[test]
fn test_unrelated_keys_are_preserved_in_place() {
    let registry = sample_registry();
    let mut document = base_manifest();
    update_manifest(&mut document, &registry, &ManifestConfig::default(), "3.1.4").unwrap();

    let original = base_manifest();
    let keys: Vec<&String> = document.as_object().unwrap().keys().collect();
    let original_keys: Vec<&String> = original.as_object().unwrap().keys().collect();
    assert_eq!(keys, original_keys);

    for key in ["name", "publisher", "engines", "scripts", "devDependencies", "main"] {
        assert_eq!(document[key], original[key], "key {key} changed");
    }
    assert_eq!(
        document["contributes"]["configuration"],
        original["contributes"]["configuration"]
    );
    assert_eq!(document["version"], "3.1.4");
}

#[test]
fn test_update_is_idempotent_apart_from_version() {
    let registry = sample_registry();
    let settings = ManifestConfig::default();

    let mut once = base_manifest();
    update_manifest(&mut once, &registry, &settings, "1.0.0").unwrap();
    let mut twice = once.clone();
    update_manifest(&mut twice, &registry, &settings, "1.0.0").unwrap();
    assert_eq!(render_manifest(&once).unwrap(), render_manifest(&twice).unwrap());

    let mut bumped = once.clone();
    update_manifest(&mut bumped, &registry, &settings, "1.0.1").unwrap();
    bumped["version"] = json!("1.0.0");
    assert_eq!(bumped, once);
}

#[test]
fn test_stale_sections_are_replaced() {
    let registry = sample_registry();
    let mut document = base_manifest();
    document["contributes"]["commands"] = json!([{"command": "xrcg.old", "title": "Old"}]);
    document["contributes"]["menus"] = json!({"xrcg.gone": [{"command": "xrcg.old"}]});

    update_manifest(&mut document, &registry, &ManifestConfig::default(), "1.0.0").unwrap();

    assert!(document["contributes"]["menus"].get("xrcg.gone").is_none());
    let commands = document["contributes"]["commands"].as_array().unwrap();
    assert!(commands.iter().all(|c| c["command"] != "xrcg.old"));
}

#[test]
fn test_file_round_trip_preserves_number_spelling() {
    let registry = sample_registry();
    let dir = temp_dir();
    let mut manifest = base_manifest();
    manifest["contributes"]["configuration"]["properties"] = serde_json::from_str(
        r#"{"xrcg.timeout": {"type": "number", "default": 1.50}}"#,
    )
    .unwrap();
    let path = write_manifest(dir.path(), &manifest);

    update_manifest_file(&path, &registry, &ManifestConfig::default(), "1.0.0").unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.contains("\"default\": 1.50"));
    assert!(text.ends_with("}\n"));
    assert!(validate_manifest(&load_manifest(&path).unwrap()).is_clean());
}

#[test]
fn test_validator_catches_hand_edited_duplicates() {
    let registry = sample_registry();
    let mut document = base_manifest();
    update_manifest(&mut document, &registry, &ManifestConfig::default(), "1.0.0").unwrap();

    let first = document["contributes"]["commands"][0].clone();
    document["contributes"]["commands"]
        .as_array_mut()
        .unwrap()
        .push(first);

    let report = validate_manifest(&document);
    let kinds: Vec<DuplicateKind> = report.diagnostics.iter().map(|d| d.kind).collect();
    assert_eq!(kinds, vec![DuplicateKind::CommandId, DuplicateKind::Title]);
}
