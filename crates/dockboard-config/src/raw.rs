//! Untyped configuration documents
//!
//! Documents written against older schema versions carry keys the typed model
//! no longer knows about, so migration and validation work on an untyped
//! mapping. Keys keep the order the author wrote them in.

use std::fmt::{self, Display, Formatter};
use std::path::Path;

use serde_json::{Map, Value as JsonValue};

use crate::error::{ConfigError, MigrationError};

/// Schema versions with a registered upgrade path
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SchemaVersion {
    /// Implicit version of documents that declare none
    V0,
    /// Deprecated single-manifest schema
    V1,
    /// Canonical schema
    V2,
}

impl SchemaVersion {
    /// The version every document is upgraded to
    pub const CURRENT: Self = Self::V2;

    /// Numeric form as written in documents
    #[inline]
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        match self {
            Self::V0 => 0,
            Self::V1 => 1,
            Self::V2 => 2,
        }
    }

    /// Look up a version by number
    ///
    /// # Errors
    /// Returns [`MigrationError::UnknownSchemaVersion`] outside `0..=2`
    pub fn from_number(number: i64) -> Result<Self, MigrationError> {
        match number {
            0 => Ok(Self::V0),
            1 => Ok(Self::V1),
            2 => Ok(Self::V2),
            other => Err(MigrationError::UnknownSchemaVersion(other.to_string())),
        }
    }

    /// Decode the `version` field; absence means version 0
    ///
    /// # Errors
    /// Returns [`MigrationError::UnknownSchemaVersion`] for non-numeric or
    /// unregistered versions
    pub fn from_field(field: Option<&JsonValue>) -> Result<Self, MigrationError> {
        match field {
            None | Some(JsonValue::Null) => Ok(Self::V0),
            Some(JsonValue::Number(n)) => n
                .as_i64()
                .ok_or_else(|| MigrationError::UnknownSchemaVersion(n.to_string()))
                .and_then(Self::from_number),
            Some(JsonValue::String(s)) => s
                .trim()
                .parse::<i64>()
                .map_err(|_| MigrationError::UnknownSchemaVersion(s.clone()))
                .and_then(Self::from_number),
            Some(other) => Err(MigrationError::UnknownSchemaVersion(other.to_string())),
        }
    }
}

impl Display for SchemaVersion {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.as_u8())
    }
}

impl From<SchemaVersion> for JsonValue {
    fn from(version: SchemaVersion) -> Self {
        JsonValue::from(version.as_u8())
    }
}

/// A configuration document as authored, before or after migration
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawDocument {
    data: Map<String, JsonValue>,
}

impl RawDocument {
    /// Wrap an existing mapping
    #[inline]
    #[must_use]
    pub fn new(data: Map<String, JsonValue>) -> Self {
        Self { data }
    }

    /// Build from any JSON value
    ///
    /// # Errors
    /// Returns [`ConfigError::NotAMapping`] unless the value is an object
    pub fn from_value(value: JsonValue) -> Result<Self, ConfigError> {
        match value {
            JsonValue::Object(data) => Ok(Self { data }),
            other => Err(ConfigError::NotAMapping {
                found: kind_name(&other),
            }),
        }
    }

    /// Parse from YAML string
    ///
    /// # Errors
    /// Returns error if YAML is invalid or not a mapping
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let value: JsonValue = serde_yaml::from_str(yaml)?;
        Self::from_value(value)
    }

    /// Parse from JSON string
    ///
    /// # Errors
    /// Returns error if JSON is invalid or not a mapping
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let value: JsonValue = serde_json::from_str(json)?;
        Self::from_value(value)
    }

    /// Parse from TOML string
    ///
    /// # Errors
    /// Returns error if TOML is invalid
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let value: JsonValue = toml::from_str(text)?;
        Self::from_value(value)
    }

    /// Read a document from disk, choosing the format by extension
    ///
    /// Unknown extensions are parsed as YAML, which also accepts JSON.
    ///
    /// # Errors
    /// Returns error if the file cannot be read or parsed
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::io_error(path, e))?;
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);

        tracing::debug!(path = %path.display(), "loading configuration document");
        match extension.as_deref() {
            Some("json") => Self::from_json(&content),
            Some("toml") => Self::from_toml(&content),
            _ => Self::from_yaml(&content),
        }
    }

    /// Version the document declares
    ///
    /// # Errors
    /// Returns error if the version is unknown
    pub fn declared_version(&self) -> Result<SchemaVersion, MigrationError> {
        SchemaVersion::from_field(self.data.get("version"))
    }

    /// Get a top-level value
    #[inline]
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&JsonValue> {
        self.data.get(key)
    }

    /// Check whether a top-level key is present and not null
    #[inline]
    #[must_use]
    pub fn has(&self, key: &str) -> bool {
        self.get(key).is_some_and(|v| !v.is_null())
    }

    /// Borrow the underlying mapping
    #[inline]
    #[must_use]
    pub fn as_map(&self) -> &Map<String, JsonValue> {
        &self.data
    }

    /// Take the underlying mapping
    #[inline]
    #[must_use]
    pub fn into_map(self) -> Map<String, JsonValue> {
        self.data
    }

    /// Convert into a JSON value
    #[inline]
    #[must_use]
    pub fn into_value(self) -> JsonValue {
        JsonValue::Object(self.data)
    }

    /// Serialize to YAML string
    ///
    /// # Errors
    /// Returns error if serialization fails
    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(&self.data)?)
    }

    /// Serialize to pretty JSON string
    ///
    /// # Errors
    /// Returns error if serialization fails
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(&self.data)?)
    }
}

impl From<Map<String, JsonValue>> for RawDocument {
    fn from(data: Map<String, JsonValue>) -> Self {
        Self::new(data)
    }
}

impl TryFrom<JsonValue> for RawDocument {
    type Error = ConfigError;

    fn try_from(value: JsonValue) -> Result<Self, Self::Error> {
        Self::from_value(value)
    }
}

/// Loose truthiness used by legacy documents
///
/// Null, `false`, zero, and empty strings, lists or mappings count as unset.
#[must_use]
pub fn is_truthy(value: &JsonValue) -> bool {
    match value {
        JsonValue::Null => false,
        JsonValue::Bool(b) => *b,
        JsonValue::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        JsonValue::String(s) => !s.is_empty(),
        JsonValue::Array(a) => !a.is_empty(),
        JsonValue::Object(o) => !o.is_empty(),
    }
}

/// Short type name for diagnostics
#[must_use]
pub fn kind_name(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "list",
        JsonValue::Object(_) => "mapping",
    }
}
