//! Canonical document validation
//!
//! The validator never stops at the first problem: every rule runs and every
//! violation is collected into a [`ValidationReport`]. A field that is absent
//! (missing or null) skips its rule unless the field is required.

use std::fmt::{self, Display, Formatter};
use std::path::PathBuf;

use serde_json::Value as JsonValue;

use crate::literal::{BoxColor, BoxSize, InvalidLiteral, Layout, Literal, PortDetail, PortView};
use crate::raw::{is_truthy, RawDocument};

/// One rule violation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationIssue {
    /// Top-level enumerated field holds an unknown literal
    #[error("{0}")]
    InvalidLiteral(#[from] InvalidLiteral),

    #[error("you must inform at least one docker-compose file path")]
    MissingComposeFiles,

    #[error("docker-compose files must be a list of paths")]
    ComposeFilesNotAList,

    /// Top-level field has the wrong shape
    #[error("{field} must be {expected}")]
    WrongType {
        field: &'static str,
        expected: &'static str,
    },

    #[error("interval must be a positive integer")]
    InvalidInterval,

    #[error("only one box may have the \"main\" parameter, found {count}")]
    MultipleMainBoxes { count: usize },

    #[error("no box has the \"main\" parameter")]
    NoMainBox,

    #[error("box {box_id:?} must be a mapping")]
    BoxNotAMapping { box_id: String },

    #[error("box {box_id:?}: {source}")]
    InvalidBoxLiteral {
        box_id: String,
        source: InvalidLiteral,
    },

    /// Box field has the wrong shape
    #[error("{field} in box {box_id:?} must be {expected}")]
    WrongBoxFieldType {
        box_id: String,
        field: &'static str,
        expected: &'static str,
    },

    #[error("ping watcher {watcher:?} must have a string {field:?}")]
    InvalidPingWatcher {
        watcher: String,
        field: &'static str,
    },
}

/// Every violation found in one document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    /// True when no rule was violated
    #[inline]
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.issues.is_empty()
    }

    /// Violations in rule order
    #[inline]
    #[must_use]
    pub fn issues(&self) -> &[ValidationIssue] {
        &self.issues
    }

    /// User-facing message per violation
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.issues.iter().map(ToString::to_string).collect()
    }

    /// Check whether a violation was reported
    #[must_use]
    pub fn contains(&self, issue: &ValidationIssue) -> bool {
        self.issues.contains(issue)
    }

    fn push(&mut self, issue: impl Into<ValidationIssue>) {
        self.issues.push(issue.into());
    }
}

impl Display for ValidationReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for (i, issue) in self.issues.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "- {issue}")?;
        }
        Ok(())
    }
}

impl IntoIterator for ValidationReport {
    type Item = ValidationIssue;
    type IntoIter = std::vec::IntoIter<ValidationIssue>;

    fn into_iter(self) -> Self::IntoIter {
        self.issues.into_iter()
    }
}

/// Validator for canonical (v2) documents
#[derive(Debug, Clone, Default)]
pub struct Validator {
    manual_compose_paths: Vec<PathBuf>,
}

impl Validator {
    /// Create validator without a manual override
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Manual compose paths replace the document's `compose_files` when non-empty
    #[inline]
    #[must_use]
    pub fn with_manual_compose_paths(mut self, paths: impl Into<Vec<PathBuf>>) -> Self {
        self.manual_compose_paths = paths.into();
        self
    }

    /// Run every rule against the document
    #[must_use]
    pub fn validate(&self, document: &RawDocument) -> ValidationReport {
        tracing::info!("validating configuration data");
        let mut report = ValidationReport::default();

        check_literal::<Layout>(document.get("layout"), &mut report);
        check_literal::<BoxColor>(document.get("background_color"), &mut report);
        self.check_compose_files(document, &mut report);
        check_string_list(document.get("ignore_services"), "ignore_services", &mut report);
        check_string(document.get("title"), "title", &mut report);
        check_interval(document.get("interval"), &mut report);
        check_watchers(document.get("watchers"), &mut report);
        check_boxes(document.get("boxes"), &mut report);

        // Build checks are document-level; they run once, not per box.
        check_string_list(
            document.get("watch_for_build_files"),
            "watch_for_build_files",
            &mut report,
        );
        check_string_list(
            document.get("watch_for_build_git"),
            "watch_for_build_git",
            &mut report,
        );

        report
    }

    fn check_compose_files(&self, document: &RawDocument, report: &mut ValidationReport) {
        let overridden;
        let compose_files = if self.manual_compose_paths.is_empty() {
            document.get("compose_files")
        } else {
            overridden = self
                .manual_compose_paths
                .iter()
                .map(|p| JsonValue::from(p.to_string_lossy().into_owned()))
                .collect::<JsonValue>();
            Some(&overridden)
        };

        // Emptiness and type are independent checks; both may be reported.
        if !compose_files.is_some_and(is_truthy) {
            report.push(ValidationIssue::MissingComposeFiles);
        }
        if let Some(value) = present(compose_files) {
            if !is_string_list(value) {
                report.push(ValidationIssue::ComposeFilesNotAList);
            }
        }
    }
}

/// Validate a canonical document without a manual override
#[must_use]
pub fn validate(document: &RawDocument) -> ValidationReport {
    Validator::new().validate(document)
}

fn present(value: Option<&JsonValue>) -> Option<&JsonValue> {
    value.filter(|v| !v.is_null())
}

fn is_string_list(value: &JsonValue) -> bool {
    value
        .as_array()
        .is_some_and(|items| items.iter().all(JsonValue::is_string))
}

fn check_literal<L: Literal>(value: Option<&JsonValue>, report: &mut ValidationReport) {
    if let Some(value) = present(value) {
        if let Err(err) = L::decode(value) {
            report.push(err);
        }
    }
}

fn check_string(value: Option<&JsonValue>, field: &'static str, report: &mut ValidationReport) {
    if present(value).is_some_and(|v| !v.is_string()) {
        report.push(ValidationIssue::WrongType {
            field,
            expected: "a string",
        });
    }
}

fn check_string_list(value: Option<&JsonValue>, field: &'static str, report: &mut ValidationReport) {
    if present(value).is_some_and(|v| !is_string_list(v)) {
        report.push(ValidationIssue::WrongType {
            field,
            expected: "a list",
        });
    }
}

fn check_interval(value: Option<&JsonValue>, report: &mut ValidationReport) {
    if present(value).is_some_and(|v| !v.as_u64().is_some_and(|n| n > 0)) {
        report.push(ValidationIssue::InvalidInterval);
    }
}

fn check_watchers(value: Option<&JsonValue>, report: &mut ValidationReport) {
    let Some(watchers) = present(value) else {
        return;
    };
    let Some(watchers) = watchers.as_object() else {
        report.push(ValidationIssue::WrongType {
            field: "watchers",
            expected: "a mapping",
        });
        return;
    };

    let Some(ping) = present(watchers.get("ping")) else {
        return;
    };
    let Some(ping) = ping.as_object() else {
        report.push(ValidationIssue::WrongType {
            field: "watchers.ping",
            expected: "a mapping",
        });
        return;
    };

    for (id, entry) in ping {
        for field in ["name", "address"] {
            if !entry.get(field).is_some_and(JsonValue::is_string) {
                report.push(ValidationIssue::InvalidPingWatcher {
                    watcher: id.clone(),
                    field,
                });
            }
        }
        for field in ["message_on_success", "message_on_error"] {
            if present(entry.get(field)).is_some_and(|v| !v.is_string()) {
                report.push(ValidationIssue::InvalidPingWatcher {
                    watcher: id.clone(),
                    field,
                });
            }
        }
    }
}

fn check_boxes(value: Option<&JsonValue>, report: &mut ValidationReport) {
    let Some(boxes) = present(value) else {
        return;
    };
    let Some(boxes) = boxes.as_object() else {
        report.push(ValidationIssue::WrongType {
            field: "boxes",
            expected: "a mapping",
        });
        return;
    };
    if boxes.is_empty() {
        return;
    }

    let main_count = boxes
        .values()
        .filter(|b| b.get("main").is_some_and(is_truthy))
        .count();
    if main_count > 1 {
        report.push(ValidationIssue::MultipleMainBoxes { count: main_count });
    }
    if main_count == 0 {
        report.push(ValidationIssue::NoMainBox);
    }

    for (box_id, spec) in boxes {
        check_box(box_id, spec, report);
    }
}

fn check_box(box_id: &str, spec: &JsonValue, report: &mut ValidationReport) {
    let Some(spec) = spec.as_object() else {
        report.push(ValidationIssue::BoxNotAMapping {
            box_id: box_id.to_string(),
        });
        return;
    };

    let literal = |result: Result<(), InvalidLiteral>, report: &mut ValidationReport| {
        if let Err(source) = result {
            report.push(ValidationIssue::InvalidBoxLiteral {
                box_id: box_id.to_string(),
                source,
            });
        }
    };
    if let Some(size) = present(spec.get("size")) {
        literal(BoxSize::decode(size).map(drop), report);
    }
    if let Some(view) = present(spec.get("port_view")) {
        literal(PortView::decode(view).map(drop), report);
    }
    if let Some(detail) = present(spec.get("port_detail")) {
        literal(PortDetail::decode(detail).map(drop), report);
    }

    let mut wrong = |field: &'static str, expected: &'static str| {
        report.push(ValidationIssue::WrongBoxFieldType {
            box_id: box_id.to_string(),
            field,
            expected,
        });
    };
    for field in [
        "includes",
        "categories",
        "watch_for_build_files",
        "watch_for_build_git",
    ] {
        if present(spec.get(field)).is_some_and(|v| !is_string_list(v)) {
            wrong(field, "a list");
        }
    }
    for field in ["name", "watch_branch"] {
        if present(spec.get(field)).is_some_and(|v| !v.is_string()) {
            wrong(field, "a string");
        }
    }
    for field in ["main", "show_revision"] {
        if present(spec.get(field)).is_some_and(|v| !v.is_boolean()) {
            wrong(field, "a boolean");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: JsonValue) -> RawDocument {
        RawDocument::from_value(value).unwrap()
    }

    fn minimal() -> JsonValue {
        json!({"version": 2, "compose_files": ["/srv/docker-compose.yml"]})
    }

    #[test]
    fn minimal_document_is_valid() {
        let report = validate(&doc(minimal()));
        assert!(report.is_valid(), "{report}");
    }

    #[test]
    fn layout_and_color_literals() {
        let report = validate(&doc(json!({
            "compose_files": ["a.yml"],
            "layout": "diagonal",
            "background_color": "plaid"
        })));
        assert_eq!(report.issues().len(), 2);
        assert!(matches!(
            &report.issues()[0],
            ValidationIssue::InvalidLiteral(InvalidLiteral { field: "layout", .. })
        ));
        assert!(matches!(
            &report.issues()[1],
            ValidationIssue::InvalidLiteral(InvalidLiteral { field: "background_color", .. })
        ));
    }

    #[test]
    fn compose_files_required() {
        let report = validate(&doc(json!({"version": 2})));
        assert_eq!(report.issues(), &[ValidationIssue::MissingComposeFiles]);

        let report = validate(&doc(json!({"compose_files": []})));
        assert_eq!(report.issues(), &[ValidationIssue::MissingComposeFiles]);
    }

    #[test]
    fn compose_files_type_and_emptiness_both_reported() {
        let report = validate(&doc(json!({"compose_files": ""})));
        assert_eq!(
            report.issues(),
            &[
                ValidationIssue::MissingComposeFiles,
                ValidationIssue::ComposeFilesNotAList
            ]
        );

        let report = validate(&doc(json!({"compose_files": "/srv/dc.yml"})));
        assert_eq!(report.issues(), &[ValidationIssue::ComposeFilesNotAList]);
    }

    #[test]
    fn manual_override_satisfies_compose_files() {
        let validator = Validator::new().with_manual_compose_paths(vec![PathBuf::from("/a/dc.yml")]);
        assert!(validator.validate(&doc(json!({"version": 2}))).is_valid());
    }

    #[test]
    fn ignore_services_must_be_list() {
        let mut value = minimal();
        value["ignore_services"] = json!("db");
        let report = validate(&doc(value));
        assert_eq!(
            report.issues(),
            &[ValidationIssue::WrongType {
                field: "ignore_services",
                expected: "a list"
            }]
        );
    }

    #[test]
    fn interval_must_be_positive() {
        for bad in [json!(0), json!(-3), json!("5"), json!(1.5)] {
            let mut value = minimal();
            value["interval"] = bad;
            assert!(validate(&doc(value)).contains(&ValidationIssue::InvalidInterval));
        }
        let mut value = minimal();
        value["interval"] = json!(3);
        assert!(validate(&doc(value)).is_valid());
    }

    #[test]
    fn more_than_one_main_box() {
        let mut value = minimal();
        value["boxes"] = json!({"a": {"main": true}, "b": {"main": true}});
        let report = validate(&doc(value));
        assert!(!report.is_valid());
        assert_eq!(report.issues(), &[ValidationIssue::MultipleMainBoxes { count: 2 }]);
        assert_eq!(
            report.messages(),
            vec!["only one box may have the \"main\" parameter, found 2".to_string()]
        );
    }

    #[test]
    fn no_main_box() {
        let mut value = minimal();
        value["boxes"] = json!({"a": {"name": "A"}, "b": {"main": false}});
        let report = validate(&doc(value));
        assert_eq!(report.issues(), &[ValidationIssue::NoMainBox]);
    }

    #[test]
    fn main_box_and_box_literals_reported_together() {
        let mut value = minimal();
        value["boxes"] = json!({
            "a": {"size": "huge", "port_view": "grid", "port_detail": "all"},
            "b": {"includes": "web", "categories": {"x": 1}}
        });
        let report = validate(&doc(value));
        assert!(report.contains(&ValidationIssue::NoMainBox));
        let literal_fields: Vec<_> = report
            .issues()
            .iter()
            .filter_map(|i| match i {
                ValidationIssue::InvalidBoxLiteral { box_id, source } if box_id == "a" => {
                    Some(source.field)
                }
                _ => None,
            })
            .collect();
        assert_eq!(literal_fields, vec!["size", "port_view", "port_detail"]);
        assert!(report.contains(&ValidationIssue::WrongBoxFieldType {
            box_id: "b".into(),
            field: "includes",
            expected: "a list"
        }));
        assert!(report.contains(&ValidationIssue::WrongBoxFieldType {
            box_id: "b".into(),
            field: "categories",
            expected: "a list"
        }));
        assert_eq!(report.issues().len(), 6);
    }

    #[test]
    fn empty_boxes_skip_main_rule() {
        let mut value = minimal();
        value["boxes"] = json!({});
        assert!(validate(&doc(value)).is_valid());
    }

    #[test]
    fn document_level_build_checks_run_once() {
        let mut value = minimal();
        value["watch_for_build_files"] = json!("Dockerfile");
        value["boxes"] = json!({"a": {"main": true}, "b": {}, "c": {}});
        let report = validate(&doc(value));
        assert_eq!(
            report.issues(),
            &[ValidationIssue::WrongType {
                field: "watch_for_build_files",
                expected: "a list"
            }]
        );
    }

    #[test]
    fn ping_watchers_need_name_and_address() {
        let mut value = minimal();
        value["watchers"] = json!({"ping": {"api": {"name": "API"}}});
        let report = validate(&doc(value));
        assert_eq!(
            report.issues(),
            &[ValidationIssue::InvalidPingWatcher {
                watcher: "api".into(),
                field: "address"
            }]
        );
    }

    #[test]
    fn null_fields_are_absent() {
        let mut value = minimal();
        value["layout"] = JsonValue::Null;
        value["boxes"] = JsonValue::Null;
        assert!(validate(&doc(value)).is_valid());
    }

    #[test]
    fn report_display_lists_every_issue() {
        let report = validate(&doc(json!({"layout": "x"})));
        let text = report.to_string();
        assert_eq!(text.lines().count(), 2);
        assert!(text.lines().all(|l| l.starts_with("- ")));
    }
}
