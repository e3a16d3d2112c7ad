//! Schema migration chain
//!
//! Upgrades a document declared at any registered [`SchemaVersion`] to the
//! canonical one. Each version owns exactly one step in [`UPGRADE_STEPS`];
//! steps run once each, in increasing order, and never skip a version.
//!
//! Steps are pure: they take the mapping by value and return the upgraded
//! mapping. The manual compose override is an explicit argument, and when it
//! is non-empty it replaces `compose_files` at every step that touches it.
//!
//! ```text
//! v0 ──layout──▶ v1 ──legacy keys──▶ v2 (canonical)
//! ```

use std::path::{Path, PathBuf};

use serde_json::{json, Map, Value as JsonValue};
use tracing::{debug, info, warn};

use crate::error::MigrationError;
use crate::raw::{is_truthy, RawDocument, SchemaVersion};

/// Untyped document body threaded through the steps
pub type Mapping = Map<String, JsonValue>;

/// One upgrade step: `version -> version + 1`, or the canonical finaliser
pub type UpgradeStep = fn(Mapping, &[PathBuf]) -> Result<Mapping, MigrationError>;

/// Registered steps, indexed by the version they start from
pub const UPGRADE_STEPS: [(SchemaVersion, UpgradeStep); 3] = [
    (SchemaVersion::V0, upgrade_v0_to_v1),
    (SchemaVersion::V1, upgrade_v1_to_v2),
    (SchemaVersion::V2, finalize_v2),
];

/// Legacy box key → canonical box key
const BOX_FIELD_RENAMES: [(&str, &str); 6] = [
    ("name", "name"),
    ("size", "size"),
    ("target_branch", "watch_branch"),
    ("show_ports", "port_view"),
    ("list_only", "includes"),
    ("categories", "categories"),
];

/// Migrate a document to the canonical schema
///
/// The input is left untouched; a new document is returned.
///
/// # Errors
/// - [`MigrationError::UnknownSchemaVersion`] if the declared version has no step
/// - [`MigrationError::MissingRequiredKey`] for an incomplete legacy `docker-compose` block
pub fn migrate(
    document: &RawDocument,
    manual_compose_paths: &[PathBuf],
) -> Result<RawDocument, MigrationError> {
    let start = document.declared_version()?;
    match start {
        SchemaVersion::V0 => info!("using default configuration"),
        SchemaVersion::V1 => warn!("configuration version 1 is deprecated, please update to version 2"),
        SchemaVersion::V2 => {}
    }

    let first = UPGRADE_STEPS
        .iter()
        .position(|(version, _)| *version == start)
        .ok_or_else(|| MigrationError::UnknownSchemaVersion(start.as_u8().to_string()))?;

    let mut data = document.as_map().clone();
    for (version, step) in &UPGRADE_STEPS[first..] {
        debug!(from = %version, "applying configuration upgrade step");
        data = step(data, manual_compose_paths)?;
    }

    Ok(RawDocument::new(data))
}

/// v0 → v1: fix the layout and apply the manual override
///
/// # Errors
/// Never fails; the signature matches [`UpgradeStep`]
pub fn upgrade_v0_to_v1(mut data: Mapping, manual: &[PathBuf]) -> Result<Mapping, MigrationError> {
    data.insert("layout".into(), json!("horizontal"));
    stamp_manual_paths(&mut data, manual);
    data.insert("version".into(), SchemaVersion::V1.into());
    Ok(data)
}

/// v1 → v2: fold every legacy key into its canonical counterpart
///
/// # Errors
/// Returns [`MigrationError::MissingRequiredKey`] when no manual override is
/// given and the legacy `docker-compose` block lacks `path` or `name`
pub fn upgrade_v1_to_v2(mut data: Mapping, manual: &[PathBuf]) -> Result<Mapping, MigrationError> {
    let legacy_compose = data.shift_remove("docker-compose");
    let compose_files = if manual.is_empty() {
        legacy_compose_files(legacy_compose)?
    } else {
        manual_paths_value(manual)
    };
    data.insert("compose_files".into(), compose_files);

    if let Some(ignore) = data.shift_remove("ignore").filter(is_truthy) {
        data.insert("ignore_services".into(), ignore);
    }

    fold_watchers(&mut data);
    fold_boxes(&mut data);

    data.insert("version".into(), SchemaVersion::V2.into());
    Ok(data)
}

/// v2: canonical; only the manual override still applies
///
/// # Errors
/// Never fails; the signature matches [`UpgradeStep`]
pub fn finalize_v2(mut data: Mapping, manual: &[PathBuf]) -> Result<Mapping, MigrationError> {
    stamp_manual_paths(&mut data, manual);
    // An equivalent declaration such as "2" is kept as written.
    if SchemaVersion::from_field(data.get("version")) != Ok(SchemaVersion::V2) {
        data.insert("version".into(), SchemaVersion::V2.into());
    }
    Ok(data)
}

fn stamp_manual_paths(data: &mut Mapping, manual: &[PathBuf]) {
    if !manual.is_empty() {
        data.insert("compose_files".into(), manual_paths_value(manual));
    }
}

fn manual_paths_value(manual: &[PathBuf]) -> JsonValue {
    manual
        .iter()
        .map(|p| JsonValue::from(p.to_string_lossy().into_owned()))
        .collect()
}

fn legacy_compose_files(block: Option<JsonValue>) -> Result<JsonValue, MigrationError> {
    let Some(block) = block.filter(is_truthy) else {
        return Ok(JsonValue::Array(Vec::new()));
    };

    let required = |key: &'static str| {
        block
            .get(key)
            .and_then(JsonValue::as_str)
            .ok_or(MigrationError::MissingRequiredKey {
                key: "docker-compose",
                missing: key,
            })
    };
    let path = required("path")?;
    let name = required("name")?;

    let joined = Path::new(path).join(name);
    Ok(json!([joined.to_string_lossy()]))
}

fn fold_watchers(data: &mut Mapping) {
    let files = data.shift_remove("files").filter(is_truthy);
    let ping_ngrok = data
        .shift_remove("check")
        .as_ref()
        .and_then(|check| check.get("ngrok"))
        .is_some_and(is_truthy);

    if files.is_none() && !ping_ngrok {
        return;
    }
    if let Some(existing) = data.get("watchers").filter(|w| !w.is_null() && !w.is_object()) {
        // Left in place so validation rejects it.
        warn!(kind = crate::raw::kind_name(existing), "\"watchers\" is not a mapping, legacy watchers not folded");
        return;
    }

    let mut watchers = take_mapping(data, "watchers");
    if let Some(files) = files {
        watchers.insert("file_watch".into(), files);
    }
    if ping_ngrok {
        let mut ping = take_mapping(&mut watchers, "ping");
        ping.insert(
            "ngrok".into(),
            json!({
                "name": "Ngrok Access",
                "address": "http://localhost:4040",
                "message_on_success": "UP",
                "message_on_error": "DOWN",
            }),
        );
        watchers.insert("ping".into(), JsonValue::Object(ping));
    }
    data.insert("watchers".into(), JsonValue::Object(watchers));
}

fn fold_boxes(data: &mut Mapping) {
    // Document-level build checks are broadcast into every translated box.
    let build_files = data.shift_remove("build_check").filter(is_truthy);
    let build_git = data.shift_remove("build_check_using_git").filter(is_truthy);

    match data.shift_remove("box").filter(is_truthy) {
        Some(JsonValue::Object(legacy)) => {
            let boxes: Mapping = legacy
                .into_iter()
                .map(|(id, old)| {
                    let translated = translate_box(&old, build_files.as_ref(), build_git.as_ref());
                    (id, JsonValue::Object(translated))
                })
                .collect();
            data.insert("boxes".into(), JsonValue::Object(boxes));
        }
        // Carried over unchanged so validation rejects it.
        Some(other) => {
            warn!(kind = crate::raw::kind_name(&other), "legacy \"box\" key is not a mapping");
            data.insert("boxes".into(), other);
        }
        None => {}
    }
}

fn translate_box(
    old: &JsonValue,
    build_files: Option<&JsonValue>,
    build_git: Option<&JsonValue>,
) -> Mapping {
    let mut new = Mapping::new();
    if old.get("catch_all").is_some_and(is_truthy) {
        new.insert("main".into(), JsonValue::Bool(true));
    }
    for (legacy, canonical) in BOX_FIELD_RENAMES {
        if let Some(value) = old.get(legacy).filter(|v| is_truthy(v)) {
            new.insert(canonical.into(), value.clone());
        }
    }
    if let Some(files) = build_files {
        new.insert("watch_for_build_files".into(), files.clone());
    }
    if let Some(git) = build_git {
        new.insert("watch_for_build_git".into(), git.clone());
    }
    new
}

fn take_mapping(data: &mut Mapping, key: &str) -> Mapping {
    match data.shift_remove(key) {
        Some(JsonValue::Object(map)) => map,
        _ => Mapping::new(),
    }
}
