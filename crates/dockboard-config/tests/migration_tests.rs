use std::path::PathBuf;

use dockboard_config::{migrate, validate, ConfigDocument, PortView, RawDocument, SchemaVersion};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use serde_json::{json, Value};

fn doc(value: Value) -> RawDocument {
    RawDocument::from_value(value).unwrap()
}

#[test]
fn test_v0_always_horizontal() {
    let input = doc(json!({"layout": "vertical", "compose_files": ["a.yml"]}));
    let out = migrate(&input, &[]).unwrap();
    assert_eq!(out.get("layout"), Some(&json!("horizontal")));
    assert_eq!(out.declared_version(), Ok(SchemaVersion::V2));
}

#[test]
fn test_catch_all_becomes_main_and_ports_become_port_view() {
    let input = doc(json!({
        "version": 1,
        "docker-compose": {"path": "/srv", "name": "docker-compose.yml"},
        "box": {"all": {"catch_all": true, "show_ports": "column"}}
    }));
    let out = migrate(&input, &[]).unwrap();
    let config = ConfigDocument::from_raw(&out).unwrap();

    let all = &config.boxes["all"];
    assert!(all.main);
    assert_eq!(all.port_view, Some(PortView::Column));
}

#[test]
fn test_malformed_legacy_box_is_reported() {
    let input = doc(json!({
        "version": 1,
        "docker-compose": {"path": "/srv", "name": "docker-compose.yml"},
        "box": ["web", "db"]
    }));
    let report = validate(&migrate(&input, &[]).unwrap());
    assert_eq!(report.messages(), vec!["boxes must be a mapping".to_string()]);
}

#[test]
fn test_malformed_watchers_are_reported_after_legacy_fold() {
    let input = doc(json!({
        "version": 1,
        "docker-compose": {"path": "/srv", "name": "docker-compose.yml"},
        "watchers": ["ping"],
        "check": {"ngrok": true}
    }));
    let report = validate(&migrate(&input, &[]).unwrap());
    assert_eq!(report.messages(), vec!["watchers must be a mapping".to_string()]);
}

#[test]
fn test_string_version_stays_decodable() {
    let input = doc(json!({"version": "2", "compose_files": ["/srv/dc.yml"]}));
    let out = migrate(&input, &[]).unwrap();
    assert_eq!(out, input);
    assert_eq!(ConfigDocument::from_raw(&out).unwrap().version, 2);
}

#[test]
fn test_manual_override_wins_from_every_version() {
    let manual = vec![PathBuf::from("/a/docker-compose.yml")];
    let inputs = [
        json!({"compose_files": ["/declared.yml"]}),
        json!({"version": 1, "docker-compose": {"path": "/srv", "name": "dc.yml"}}),
        json!({"version": 2, "compose_files": ["/declared.yml", "/other.yml"]}),
    ];
    for input in inputs {
        let out = migrate(&doc(input), &manual).unwrap();
        assert_eq!(out.get("compose_files"), Some(&json!(["/a/docker-compose.yml"])));
    }
}

#[test]
fn test_canonical_document_is_fixed_point() {
    let input = doc(json!({
        "version": 2,
        "title": "Stack",
        "layout": "vertical",
        "background_color": "blue",
        "interval": 2,
        "compose_files": ["/srv/docker-compose.yml"],
        "ignore_services": ["db"],
        "watchers": {"ping": {"api": {"name": "API", "address": "http://localhost"}}},
        "boxes": {"all": {"main": true, "size": "big"}}
    }));
    assert_eq!(migrate(&input, &[]).unwrap(), input);
}

#[test]
fn test_legacy_round_trip_valid_with_one_main_box() {
    let input = doc(json!({
        "docker-compose": {"path": "/srv", "name": "docker-compose.yml"},
        "box": {
            "all": {"catch_all": true, "name": "All"},
            "workers": {"name": "Workers", "list_only": ["worker"]}
        }
    }));
    let out = migrate(&input, &[]).unwrap();
    assert!(validate(&out).is_valid(), "{}", validate(&out));
}

#[test]
fn test_legacy_round_trip_invalid_without_main_box() {
    let input = doc(json!({
        "docker-compose": {"path": "/srv", "name": "docker-compose.yml"},
        "box": {"workers": {"name": "Workers"}}
    }));
    let report = validate(&migrate(&input, &[]).unwrap());
    assert!(!report.is_valid());
    assert_eq!(report.messages(), vec!["no box has the \"main\" parameter".to_string()]);
}

#[test]
fn test_legacy_round_trip_invalid_with_two_main_boxes() {
    let input = doc(json!({
        "docker-compose": {"path": "/srv", "name": "docker-compose.yml"},
        "box": {"a": {"catch_all": true}, "b": {"catch_all": true}}
    }));
    assert!(!validate(&migrate(&input, &[]).unwrap()).is_valid());
}

#[test]
fn test_yaml_file_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cabinet.yml");
    std::fs::write(
        &path,
        "version: 1\n\
         docker-compose:\n  path: /srv/app\n  name: docker-compose.yml\n\
         ignore: [flower]\n\
         check:\n  ngrok: true\n",
    )
    .unwrap();

    let raw = RawDocument::load(&path).unwrap();
    let canonical = migrate(&raw, &[]).unwrap();
    assert!(validate(&canonical).is_valid());

    let config = ConfigDocument::from_raw(&canonical).unwrap();
    assert_eq!(config.ignore_services, vec!["flower".to_string()]);
    assert_eq!(config.watchers.ping["ngrok"].address, "http://localhost:4040");
    assert_eq!(
        config.compose_files,
        vec![PathBuf::from("/srv/app/docker-compose.yml")]
    );
}

fn legacy_box() -> impl Strategy<Value = Value> {
    (
        any::<bool>(),
        prop::option::of("[a-z]{1,8}"),
        prop::option::of(prop_oneof![Just("big"), Just("small")]),
        prop::option::of(prop_oneof![Just("column"), Just("name"), Just("status")]),
        prop::collection::vec("[a-z]{1,6}", 0..4),
    )
        .prop_map(|(catch_all, name, size, ports, list_only)| {
            json!({
                "catch_all": catch_all,
                "name": name,
                "size": size,
                "show_ports": ports,
                "list_only": list_only,
            })
        })
}

fn legacy_document() -> impl Strategy<Value = Value> {
    (
        prop::option::of(Just(1)),
        prop::collection::btree_map("[a-z]{1,6}", legacy_box(), 0..5),
        prop::collection::vec("[a-z]{1,6}", 0..3),
        any::<bool>(),
        prop::option::of(prop::collection::vec("[A-Za-z.]{1,10}", 1..3)),
    )
        .prop_map(|(version, boxes, ignore, ngrok, build_check)| {
            let boxes: serde_json::Map<String, Value> = boxes.into_iter().collect();
            json!({
                "version": version,
                "docker-compose": {"path": "/srv", "name": "docker-compose.yml"},
                "box": boxes,
                "ignore": ignore,
                "check": {"ngrok": ngrok},
                "build_check": build_check,
            })
        })
}

proptest! {
    #[test]
    fn prop_migration_is_idempotent(value in legacy_document()) {
        let once = migrate(&doc(value), &[]).unwrap();
        let twice = migrate(&once, &[]).unwrap();
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn prop_manual_override_always_wins(
        value in legacy_document(),
        manual in prop::collection::vec("/[a-z]{1,8}/docker-compose.yml", 1..3)
    ) {
        let manual: Vec<PathBuf> = manual.into_iter().map(PathBuf::from).collect();
        let out = migrate(&doc(value), &manual).unwrap();
        let expected: Vec<Value> = manual
            .iter()
            .map(|p| json!(p.to_string_lossy()))
            .collect();
        prop_assert_eq!(out.get("compose_files"), Some(&Value::Array(expected)));
    }

    #[test]
    fn prop_round_trip_valid_iff_exactly_one_main(value in legacy_document()) {
        let main_count = value["box"]
            .as_object()
            .map_or(0, |b| b.values().filter(|x| x["catch_all"] == json!(true)).count());
        let boxes_exist = value["box"].as_object().is_some_and(|b| !b.is_empty());

        let report = validate(&migrate(&doc(value), &[]).unwrap());
        prop_assert_eq!(report.is_valid(), !boxes_exist || main_count == 1);
    }

    #[test]
    fn prop_build_checks_broadcast_to_every_box(value in legacy_document()) {
        let build_check = value["build_check"].clone();
        let out = migrate(&doc(value), &[]).unwrap();
        if let (Some(boxes), false) = (out.get("boxes").and_then(Value::as_object), build_check.is_null()) {
            for spec in boxes.values() {
                prop_assert_eq!(&spec["watch_for_build_files"], &build_check);
            }
        }
    }
}
