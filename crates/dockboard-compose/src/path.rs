//! Manifest path resolution
//!
//! Compose manifests and their build contexts may reference environment
//! variables (`$VAR` or `${VAR}`) and paths relative to the manifest.

use std::path::{Component, Path, PathBuf};
use std::sync::OnceLock;

use regex::{Captures, Regex};

use crate::error::ComposeError;

fn variable_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\$\{(\w+)\}|\$(\w+)").expect("variable pattern is a valid regex")
    })
}

/// Resolve a path using the process environment
///
/// # Errors
/// Returns [`ComposeError::UnresolvedVariable`] for unset variables
pub fn resolve_path(path: &str, base: &Path) -> Result<PathBuf, ComposeError> {
    resolve_path_with(path, base, |name| std::env::var(name).ok())
}

/// Resolve a path with a custom variable lookup
///
/// Variables are expanded in both `path` and `base`. A path starting with `.`
/// is joined onto `base` and normalised; anything else is returned as is.
///
/// # Errors
/// Returns [`ComposeError::UnresolvedVariable`] when `lookup` has no value
/// or an empty one
pub fn resolve_path_with<F>(path: &str, base: &Path, lookup: F) -> Result<PathBuf, ComposeError>
where
    F: Fn(&str) -> Option<String>,
{
    let path = expand_variables(path, &lookup)?;
    if !path.starts_with('.') {
        return Ok(PathBuf::from(path));
    }

    let base = expand_variables(&base.to_string_lossy(), &lookup)?;
    Ok(normalize(&Path::new(&base).join(path)))
}

fn expand_variables<F>(text: &str, lookup: &F) -> Result<String, ComposeError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut missing = None;
    let expanded = variable_pattern().replace_all(text, |caps: &Captures<'_>| {
        let name = caps
            .get(1)
            .or_else(|| caps.get(2))
            .map_or("", |m| m.as_str());
        lookup(name).filter(|v| !v.is_empty()).unwrap_or_else(|| {
            missing.get_or_insert_with(|| name.to_string());
            String::new()
        })
    });

    match missing {
        Some(variable) => Err(ComposeError::UnresolvedVariable {
            variable,
            path: text.to_string(),
        }),
        None => Ok(expanded.into_owned()),
    }
}

/// Lexically normalise `.` and `..` components without touching the filesystem
#[must_use]
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}
