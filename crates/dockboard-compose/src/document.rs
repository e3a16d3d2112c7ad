//! Compose manifest model
//!
//! Several manifests (`docker-compose.yml`, `docker-compose.override.yml`, …)
//! are merged in order into one document, the way `docker compose -f a -f b`
//! combines them.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value as JsonValue};

use crate::error::ComposeError;
use crate::path::resolve_path;

/// Read-only view of the service manifests
///
/// The dashboard core only ever reads through this trait.
pub trait ComposeAccessor {
    /// Names of every declared service
    fn services(&self) -> BTreeSet<String>;

    /// Look up a key of a service; names match case-insensitively
    ///
    /// # Errors
    /// Returns [`ComposeError::ServiceNotFound`] for unknown services
    fn get_from_service(&self, service: &str, key: &str) -> Result<Option<&JsonValue>, ComposeError>;

    /// Directory relative build contexts are resolved against
    fn base_path(&self) -> &Path;

    /// True when the service runs a prebuilt image instead of a build
    ///
    /// # Errors
    /// Returns [`ComposeError::ServiceNotFound`] for unknown services
    fn is_image(&self, service: &str) -> Result<bool, ComposeError> {
        Ok(self.get_from_service(service, "build")?.is_none())
    }

    /// Resolved build context of a service
    ///
    /// # Errors
    /// - [`ComposeError::ServiceNotFound`] for unknown services
    /// - [`ComposeError::NoBuildPath`] for image-only services
    /// - [`ComposeError::UnresolvedVariable`] for unset variables in the path
    fn build_path(&self, service: &str) -> Result<PathBuf, ComposeError> {
        let build = self.get_from_service(service, "build")?;
        let context = match build {
            Some(JsonValue::String(context)) => context.as_str(),
            Some(JsonValue::Object(build)) => build
                .get("context")
                .and_then(JsonValue::as_str)
                .ok_or_else(|| ComposeError::NoBuildPath(service.to_string()))?,
            _ => return Err(ComposeError::NoBuildPath(service.to_string())),
        };
        resolve_path(context, self.base_path())
    }
}

/// Merged compose manifests
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ComposeDocument {
    data: Map<String, JsonValue>,
    base_path: PathBuf,
}

impl ComposeDocument {
    /// Create from a parsed mapping
    #[inline]
    #[must_use]
    pub fn new(data: Map<String, JsonValue>, base_path: impl Into<PathBuf>) -> Self {
        Self {
            data,
            base_path: base_path.into(),
        }
    }

    /// Parse one manifest from YAML
    ///
    /// # Errors
    /// Returns [`ComposeError::InvalidYaml`] on syntax errors
    pub fn from_yaml(yaml: &str, base_path: impl Into<PathBuf>) -> Result<Self, ComposeError> {
        let base_path = base_path.into();
        let data = parse_manifest(yaml, &base_path)?;
        Ok(Self::new(data, base_path))
    }

    /// Read one manifest from disk
    ///
    /// # Errors
    /// Returns error if the file cannot be read or parsed
    pub fn load(path: &Path) -> Result<Self, ComposeError> {
        Self::load_all(&[path.to_path_buf()])
    }

    /// Read and merge manifests in order; later files override earlier ones
    ///
    /// The base path is the directory of the first manifest.
    ///
    /// # Errors
    /// Returns error if any file cannot be read or parsed
    pub fn load_all(paths: &[PathBuf]) -> Result<Self, ComposeError> {
        let base_path = paths
            .first()
            .and_then(|p| p.parent())
            .map(Path::to_path_buf)
            .unwrap_or_default();

        let mut merged = JsonValue::Object(Map::new());
        for path in paths {
            let content =
                std::fs::read_to_string(path).map_err(|e| ComposeError::io_error(path, e))?;
            let layer = parse_manifest(&content, path)?;
            tracing::debug!(path = %path.display(), services = layer.get("services").and_then(JsonValue::as_object).map_or(0, Map::len), "merging compose manifest");
            merged = merge_json(&merged, &JsonValue::Object(layer));
        }

        let data = match merged {
            JsonValue::Object(data) => data,
            _ => Map::new(),
        };
        Ok(Self::new(data, base_path))
    }

    /// Merge another manifest on top of this one
    #[must_use]
    pub fn merge(&self, other: &Self) -> Self {
        let merged = merge_json(
            &JsonValue::Object(self.data.clone()),
            &JsonValue::Object(other.data.clone()),
        );
        let data = match merged {
            JsonValue::Object(data) => data,
            _ => Map::new(),
        };
        Self::new(data, self.base_path.clone())
    }

    /// Service definitions keyed by name
    #[must_use]
    pub fn service_specs(&self) -> Option<&Map<String, JsonValue>> {
        self.data.get("services").and_then(JsonValue::as_object)
    }

    /// Declared volume names
    #[must_use]
    pub fn volumes(&self) -> Vec<&str> {
        top_level_keys(&self.data, "volumes")
    }

    /// Declared network names
    #[must_use]
    pub fn networks(&self) -> Vec<&str> {
        top_level_keys(&self.data, "networks")
    }

    /// A usable document has at least one service
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.service_specs().is_some_and(|s| !s.is_empty())
    }

    /// Fail unless the document is usable
    ///
    /// # Errors
    /// Returns [`ComposeError::Empty`] when no service is declared
    pub fn ensure_valid(&self) -> Result<(), ComposeError> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(ComposeError::Empty)
        }
    }
}

impl ComposeAccessor for ComposeDocument {
    fn services(&self) -> BTreeSet<String> {
        self.service_specs()
            .map(|s| s.keys().cloned().collect())
            .unwrap_or_default()
    }

    fn get_from_service(&self, service: &str, key: &str) -> Result<Option<&JsonValue>, ComposeError> {
        let spec = self
            .service_specs()
            .and_then(|specs| {
                specs
                    .iter()
                    .find(|(name, _)| name.eq_ignore_ascii_case(service))
                    .map(|(_, spec)| spec)
            })
            .ok_or_else(|| ComposeError::ServiceNotFound(service.to_string()))?;
        Ok(spec.get(key))
    }

    fn base_path(&self) -> &Path {
        &self.base_path
    }
}

fn parse_manifest(yaml: &str, path: &Path) -> Result<Map<String, JsonValue>, ComposeError> {
    let value: JsonValue = serde_yaml::from_str(yaml).map_err(|source| ComposeError::InvalidYaml {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(match value {
        JsonValue::Object(map) => map,
        _ => Map::new(),
    })
}

fn top_level_keys<'a>(data: &'a Map<String, JsonValue>, key: &str) -> Vec<&'a str> {
    data.get(key)
        .and_then(JsonValue::as_object)
        .map(|m| m.keys().map(String::as_str).collect())
        .unwrap_or_default()
}

/// Merge two JSON values (deep merge for objects)
///
/// Mappings merge key by key, sequences concatenate, scalars from `b` win.
fn merge_json(a: &JsonValue, b: &JsonValue) -> JsonValue {
    match (a, b) {
        (JsonValue::Object(a_map), JsonValue::Object(b_map)) => {
            let mut result = a_map.clone();
            for (key, b_val) in b_map {
                let merged = match result.get(key) {
                    Some(a_val) => merge_json(a_val, b_val),
                    None => b_val.clone(),
                };
                result.insert(key.clone(), merged);
            }
            JsonValue::Object(result)
        }
        (JsonValue::Array(a_arr), JsonValue::Array(b_arr)) => {
            let mut result = a_arr.clone();
            result.extend(b_arr.iter().cloned());
            JsonValue::Array(result)
        }
        (_, b_val) => b_val.clone(),
    }
}
