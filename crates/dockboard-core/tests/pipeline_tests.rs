//! Pipeline Integration Tests
//!
//! Legacy documents through migration, validation and layout planning.

use std::fs;
use std::path::PathBuf;

use dockboard_config::{BoxColor, Layout, PortView, RawDocument, SchemaVersion};
use dockboard_core::{Pipeline, PipelineError};
use dockboard_layout::BoxLayoutPlanner;
use dockboard_test_utils::*;
use pretty_assertions::assert_eq;
use serde_json::json;

// ============================================================================
// Prepare
// ============================================================================

#[test]
fn v0_document_becomes_canonical() {
    let config = Pipeline::default().prepare(&v0_document()).unwrap();

    assert_eq!(config.version, SchemaVersion::CURRENT.as_u8());
    assert_eq!(config.layout, Layout::Horizontal);
    assert_eq!(config.title, "Legacy Dashboard");
    assert_eq!(
        config.compose_files,
        vec![PathBuf::from("/srv/app/docker-compose.yml")]
    );
    let (id, main) = config.main_box().unwrap();
    assert_eq!(id, "all");
    assert_eq!(main.port_view, Some(PortView::Column));
}

#[test]
fn v1_document_folds_legacy_keys() {
    let config = Pipeline::default().prepare(&v1_document()).unwrap();

    assert_eq!(config.layout, Layout::Vertical);
    assert_eq!(config.ignore_services, vec!["db".to_string()]);
    assert_eq!(config.watchers.file_watch, Some(json!([".env"])));
    assert_eq!(config.watchers.ping["ngrok"].address, "http://localhost:4040");

    assert_eq!(config.boxes.len(), 2);
    assert!(config.boxes["main"].main);
    assert_eq!(config.boxes["main"].port_view, Some(PortView::Name));
    assert_eq!(config.boxes["workers"].includes, vec!["worker".to_string()]);
    for spec in config.boxes.values() {
        assert_eq!(spec.watch_for_build_files, vec!["git".to_string()]);
    }
}

#[test]
fn v2_document_gets_defaults() {
    let config = Pipeline::default().prepare(&v2_document()).unwrap();

    assert_eq!(config.background_color, BoxColor::Black);
    assert_eq!(config.interval, 5);
    assert!(config.boxes.is_empty());
    assert!(config.watchers.is_empty());
}

#[test]
fn manual_compose_files_replace_legacy_block() {
    let manual = vec![PathBuf::from("/opt/other/compose.yml")];
    let config = Pipeline::new(manual.clone()).prepare(&v1_document()).unwrap();
    assert_eq!(config.compose_files, manual);
}

#[test]
fn every_issue_is_reported() {
    let err = Pipeline::default()
        .prepare(&v2_with_boxes(json!({
            "a": {"main": true, "size": "huge"},
            "b": {"main": true},
        })))
        .unwrap_err();

    assert!(err.is_document_defect());
    let messages = err.validation_messages();
    assert_eq!(messages.len(), 2, "{messages:?}");
}

#[test]
fn document_without_main_box_is_rejected() {
    let err = Pipeline::default()
        .prepare(&v2_with_boxes(json!({"a": {"includes": ["web"]}})))
        .unwrap_err();
    assert!(matches!(err, PipelineError::Invalid(_)));
}

#[test]
fn empty_yaml_values_load_with_defaults() {
    let raw = RawDocument::from_yaml(
        "version: 2\ncompose_files: [/srv/dc.yml]\nignore_services:\ntitle:\ninterval:\n\
         boxes:\n  all:\n    main: true\n    includes:\n",
    )
    .unwrap();

    let config = Pipeline::default().prepare(&raw).unwrap();
    assert!(config.ignore_services.is_empty());
    assert_eq!(config.title, "Docker-Compose");
    assert_eq!(config.interval, 5);
    assert!(config.boxes["all"].main);
    assert!(config.boxes["all"].includes.is_empty());
}

#[test]
fn empty_boxes_value_falls_back_to_generated_layout() {
    let raw = RawDocument::from_yaml("version: 2\ncompose_files: [/srv/dc.yml]\nboxes:\n").unwrap();
    let config = Pipeline::default().prepare(&raw).unwrap();
    let compose = StaticCompose::new("/srv").with_services(["web"]);

    let config = Pipeline::default()
        .finish(config, &compose, &terminal(80, 24))
        .unwrap();
    assert_eq!(config.boxes["box_0"].includes, vec!["web".to_string()]);
}

#[test]
fn unknown_version_is_rejected() {
    let err = Pipeline::default()
        .prepare(&document(json!({"version": 7})))
        .unwrap_err();
    assert!(matches!(err, PipelineError::Migration(_)));
}

// ============================================================================
// Finish
// ============================================================================

#[test]
fn default_layout_follows_terminal_height() {
    let config = Pipeline::default().prepare(&v2_document()).unwrap();
    let compose = StaticCompose::new("/srv/app").with_services(service_names(23));

    let config = Pipeline::default()
        .finish(config, &compose, &terminal(120, 30))
        .unwrap();

    assert_eq!(config.boxes.len(), 2);
    assert_eq!(config.boxes["box_0"].includes.len(), 20);
    assert_eq!(config.boxes["box_1"].includes.len(), 3);
    assert_eq!(config.main_box().map(|(id, _)| id), Some("box_0"));
}

#[test]
fn tiny_terminal_is_environment_error() {
    let config = Pipeline::default().prepare(&v2_document()).unwrap();
    let compose = StaticCompose::new("/srv/app").with_services(["web"]);

    let err = Pipeline::default()
        .finish(config, &compose, &terminal(80, 8))
        .unwrap_err();
    assert!(err.is_environment());
}

#[test]
fn custom_planner_is_used() {
    let pipeline = Pipeline::default().with_planner(BoxLayoutPlanner::new().with_reserved_lines(0));
    let config = pipeline.prepare(&v2_document()).unwrap();
    let compose = StaticCompose::new("/srv/app").with_services(service_names(6));

    let config = pipeline.finish(config, &compose, &terminal(80, 3)).unwrap();
    assert_eq!(config.boxes.len(), 2);
}

// ============================================================================
// Load
// ============================================================================

#[test]
fn load_resolves_compose_files_next_to_config() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("docker-compose.yml"), COMPOSE_YAML).unwrap();
    let config_path = dir.path().join("dockboard.yml");
    fs::write(&config_path, CURRENT_V2_YAML).unwrap();

    let loaded = Pipeline::default()
        .load(&config_path, &terminal(80, 24))
        .unwrap();

    assert_eq!(
        loaded.config.compose_files,
        vec![dir.path().join("docker-compose.yml")]
    );
    assert_eq!(
        loaded.config.boxes["box_0"].includes,
        vec!["db".to_string(), "web".to_string(), "worker".to_string()]
    );
}

#[test]
fn load_rejects_manifest_without_services() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("docker-compose.yml"), "version: '3'\n").unwrap();
    let config_path = dir.path().join("dockboard.yml");
    fs::write(&config_path, CURRENT_V2_YAML).unwrap();

    let err = Pipeline::default()
        .load(&config_path, &terminal(80, 24))
        .unwrap_err();
    assert!(matches!(err, PipelineError::Compose(_)));
}

#[test]
fn load_reads_json_configuration() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("docker-compose.yml"), COMPOSE_YAML).unwrap();
    let config_path = dir.path().join("dockboard.json");
    fs::write(
        &config_path,
        r#"{"version": 2, "compose_files": ["./docker-compose.yml"], "ignore_services": ["db"]}"#,
    )
    .unwrap();

    let loaded = Pipeline::default()
        .load(&config_path, &terminal(80, 24))
        .unwrap();
    assert_eq!(
        loaded.config.boxes["box_0"].includes,
        vec!["web".to_string(), "worker".to_string()]
    );
}

#[test]
fn missing_config_file_is_config_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = Pipeline::default()
        .load(&dir.path().join("absent.yml"), &terminal(80, 24))
        .unwrap_err();
    assert!(matches!(err, PipelineError::Config(_)));
}
