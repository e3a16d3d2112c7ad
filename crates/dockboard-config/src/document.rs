//! Typed canonical configuration
//!
//! A [`ConfigDocument`] is decoded only from a migrated document that passed
//! validation; it is what the dashboard renderer consumes.

use std::path::PathBuf;

use indexmap::IndexMap;
use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value as JsonValue};

use crate::error::ConfigError;
use crate::literal::{BoxColor, BoxSize, Layout, PortDetail, PortView};
use crate::raw::{RawDocument, SchemaVersion};

/// Default dashboard title
pub const DEFAULT_TITLE: &str = "Docker-Compose";

/// Default poll interval in seconds
pub const DEFAULT_INTERVAL_SECS: u64 = 5;

/// Canonical (v2) dashboard configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ConfigDocument {
    /// Schema version; always 2 once decoded
    #[serde(default = "current_version", deserialize_with = "decode_version")]
    pub version: u8,

    #[serde(default)]
    pub layout: Layout,

    #[serde(default = "default_title")]
    pub title: String,

    #[serde(default)]
    pub background_color: BoxColor,

    /// Poll interval in seconds
    #[serde(default = "default_interval")]
    pub interval: u64,

    /// Compose manifests, in override order
    pub compose_files: Vec<PathBuf>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ignore_services: Vec<String>,

    #[serde(default, skip_serializing_if = "Watchers::is_empty")]
    pub watchers: Watchers,

    /// Display groupings keyed by box id
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub boxes: IndexMap<String, BoxSpec>,
}

fn current_version() -> u8 {
    SchemaVersion::CURRENT.as_u8()
}

fn decode_version<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u8, D::Error> {
    let value = JsonValue::deserialize(deserializer)?;
    SchemaVersion::from_field(Some(&value))
        .map(SchemaVersion::as_u8)
        .map_err(serde::de::Error::custom)
}

fn default_title() -> String {
    DEFAULT_TITLE.to_string()
}

fn default_interval() -> u64 {
    DEFAULT_INTERVAL_SECS
}

impl ConfigDocument {
    /// Decode a canonical raw document
    ///
    /// # Errors
    /// Returns [`ConfigError::Decode`] if the document does not match the
    /// canonical shape; validation reports the same problems in detail
    pub fn from_raw(raw: &RawDocument) -> Result<Self, ConfigError> {
        let mut data = raw.clone().into_map();
        strip_nulls(&mut data);
        serde_json::from_value(JsonValue::Object(data))
            .map_err(|e| ConfigError::Decode(e.to_string()))
    }

    /// Serialize back into the canonical raw form
    ///
    /// # Errors
    /// Returns error if serialization fails
    pub fn to_raw(&self) -> Result<RawDocument, ConfigError> {
        RawDocument::from_value(serde_json::to_value(self)?)
    }

    /// The box marked `main`, if any
    #[must_use]
    pub fn main_box(&self) -> Option<(&str, &BoxSpec)> {
        self.boxes
            .iter()
            .find(|(_, b)| b.main)
            .map(|(id, b)| (id.as_str(), b))
    }

    /// Check whether a service is excluded from the dashboard
    #[inline]
    #[must_use]
    pub fn is_ignored(&self, service: &str) -> bool {
        self.ignore_services.iter().any(|s| s == service)
    }

    /// JSON schema of the canonical document
    #[must_use]
    pub fn json_schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(ConfigDocument)
    }
}

/// Secondary monitored conditions
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Watchers {
    /// File-change watch definition, passed through to the watcher
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_watch: Option<JsonValue>,

    /// HTTP ping checks keyed by id
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub ping: IndexMap<String, PingWatcher>,
}

impl Watchers {
    /// True when no watcher is configured
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.file_watch.is_none() && self.ping.is_empty()
    }
}

/// HTTP ping watcher
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct PingWatcher {
    pub name: String,
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_on_success: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_on_error: Option<String>,
}

/// One display grouping of services
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct BoxSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// The primary box; exactly one is required when boxes exist
    #[serde(default, skip_serializing_if = "is_false")]
    pub main: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<BoxSize>,

    /// Reference branch to diff service checkouts against
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub watch_branch: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port_view: Option<PortView>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port_detail: Option<PortDetail>,

    /// Services shown in this box
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub includes: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub watch_for_build_files: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub watch_for_build_git: Vec<String>,

    /// Layout hint: show the checked-out revision column
    #[serde(default, skip_serializing_if = "is_false")]
    pub show_revision: bool,
}

/// Null counts as absent: drop null keys wherever a default applies
///
/// `file_watch` is opaque and left untouched.
fn strip_nulls(data: &mut Map<String, JsonValue>) {
    data.retain(|_, v| !v.is_null());

    if let Some(JsonValue::Object(boxes)) = data.get_mut("boxes") {
        for spec in boxes.values_mut() {
            if let JsonValue::Object(spec) = spec {
                spec.retain(|_, v| !v.is_null());
            }
        }
    }

    if let Some(JsonValue::Object(watchers)) = data.get_mut("watchers") {
        watchers.retain(|_, v| !v.is_null());
        if let Some(JsonValue::Object(ping)) = watchers.get_mut("ping") {
            for entry in ping.values_mut() {
                if let JsonValue::Object(entry) = entry {
                    entry.retain(|_, v| !v.is_null());
                }
            }
        }
    }
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn is_false(value: &bool) -> bool {
    !*value
}
