//! Testing utilities for the dockboard workspace
//!
//! Legacy and current configuration fixtures, an in-memory compose manifest
//! and terminal helpers.

#![allow(missing_docs)]

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use dockboard_compose::{ComposeAccessor, ComposeError};
use dockboard_config::RawDocument;
use dockboard_layout::FixedTerminal;
use serde_json::{json, Map, Value as JsonValue};

pub const LEGACY_V0_YAML: &str = "\
title: Legacy Dashboard
docker-compose:
  path: /srv/app
  name: docker-compose.yml
box:
  all:
    catch_all: true
    show_ports: column
";

pub const LEGACY_V1_YAML: &str = "\
version: 1
title: Legacy Dashboard
layout: vertical
docker-compose:
  path: /srv/app
  name: docker-compose.yml
ignore:
  - db
files:
  - .env
check:
  ngrok: true
build_check:
  - git
box:
  main:
    catch_all: true
    show_ports: name
  workers:
    list_only: [worker]
";

pub const CURRENT_V2_YAML: &str = "\
version: 2
title: Current Dashboard
layout: horizontal
compose_files:
  - docker-compose.yml
";

pub const COMPOSE_YAML: &str = "\
services:
  web:
    build: ./web
  worker:
    build:
      context: ./worker
  db:
    image: postgres
";

pub fn v0_document() -> RawDocument {
    RawDocument::from_yaml(LEGACY_V0_YAML).unwrap()
}

pub fn v1_document() -> RawDocument {
    RawDocument::from_yaml(LEGACY_V1_YAML).unwrap()
}

pub fn v2_document() -> RawDocument {
    RawDocument::from_yaml(CURRENT_V2_YAML).unwrap()
}

pub fn document(value: JsonValue) -> RawDocument {
    RawDocument::from_value(value).unwrap()
}

/// Canonical document with the given boxes and a single compose file
pub fn v2_with_boxes(boxes: JsonValue) -> RawDocument {
    document(json!({
        "version": 2,
        "compose_files": ["docker-compose.yml"],
        "boxes": boxes,
    }))
}

pub fn service_names(count: usize) -> Vec<String> {
    (0..count).map(|i| format!("service_{i:03}")).collect()
}

pub fn terminal(columns: u16, lines: u16) -> FixedTerminal {
    FixedTerminal::new(columns, lines)
}

/// In-memory compose manifest
#[derive(Debug, Clone, Default)]
pub struct StaticCompose {
    services: BTreeMap<String, Map<String, JsonValue>>,
    base_path: PathBuf,
}

impl StaticCompose {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            services: BTreeMap::new(),
            base_path: base_path.into(),
        }
    }

    pub fn with_image(mut self, name: &str, image: &str) -> Self {
        let mut spec = Map::new();
        spec.insert("image".into(), json!(image));
        self.services.insert(name.to_string(), spec);
        self
    }

    pub fn with_build(mut self, name: &str, context: &str) -> Self {
        let mut spec = Map::new();
        spec.insert("build".into(), json!(context));
        self.services.insert(name.to_string(), spec);
        self
    }

    pub fn with_services<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for name in names {
            self.services.insert(name.into(), Map::new());
        }
        self
    }
}

impl ComposeAccessor for StaticCompose {
    fn services(&self) -> BTreeSet<String> {
        self.services.keys().cloned().collect()
    }

    fn get_from_service(&self, service: &str, key: &str) -> Result<Option<&JsonValue>, ComposeError> {
        self.services
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(service))
            .map(|(_, spec)| spec.get(key))
            .ok_or_else(|| ComposeError::ServiceNotFound(service.to_string()))
    }

    fn base_path(&self) -> &Path {
        &self.base_path
    }
}
