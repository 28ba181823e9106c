//! Package discovery for `[package]` and the hash path marker.

use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use once_cell::sync::Lazy;
use serde::Deserialize;

/// The package a stylesheet belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageInfo {
    /// The `name` field of the package manifest; empty when unnamed.
    pub name: String,
    /// Directory holding the manifest.
    pub root: PathBuf,
}

#[derive(Deserialize)]
struct Manifest {
    #[serde(default)]
    name: String,
}

/// Directory -> closest package, or `None` when no manifest exists above it.
static PACKAGE_CACHE: Lazy<Mutex<HashMap<PathBuf, Option<PackageInfo>>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));

impl PackageInfo {
    /// Creates package info from known values.
    pub fn new(name: impl Into<String>, root: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            root: root.into(),
        }
    }

    /// Finds the closest `package.json` at or above `dir`.
    ///
    /// Results are cached for the lifetime of the process, including misses.
    /// Manifests that cannot be parsed are skipped with a warning.
    pub fn discover(dir: &Path) -> Option<PackageInfo> {
        let mut cache = PACKAGE_CACHE.lock().unwrap_or_else(PoisonError::into_inner);
        discover_cached(dir, &mut cache)
    }

    /// Drops every cached lookup.
    pub fn clear_cache() {
        PACKAGE_CACHE
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    /// Path of `file` relative to the package root, with `/` separators.
    pub fn relative_path(&self, file: &Path) -> String {
        relative_to(file, &self.root)
    }
}

fn discover_cached(
    dir: &Path,
    cache: &mut HashMap<PathBuf, Option<PackageInfo>>,
) -> Option<PackageInfo> {
    if let Some(hit) = cache.get(dir) {
        return hit.clone();
    }

    let found = match read_manifest(dir) {
        Some(name) => Some(PackageInfo::new(name, dir)),
        None => dir.parent().and_then(|parent| discover_cached(parent, cache)),
    };

    cache.insert(dir.to_path_buf(), found.clone());
    found
}

fn read_manifest(dir: &Path) -> Option<String> {
    let path = dir.join("package.json");
    let content = std::fs::read_to_string(&path).ok()?;
    match serde_json::from_str::<Manifest>(&content) {
        Ok(manifest) => Some(manifest.name),
        Err(e) => {
            log::warn!("ignoring unreadable manifest {}: {}", path.display(), e);
            None
        }
    }
}

/// Expresses `path` relative to `base` using `/` separators. Steps above
/// `base` are written as `..`.
pub(crate) fn relative_to(path: &Path, base: &Path) -> String {
    let path: Vec<Component<'_>> = path.components().collect();
    let base: Vec<Component<'_>> = base.components().collect();

    let common = path
        .iter()
        .zip(base.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut parts: Vec<String> = Vec::new();
    parts.extend(base[common..].iter().map(|_| "..".to_string()));
    parts.extend(
        path[common..]
            .iter()
            .map(|c| c.as_os_str().to_string_lossy().into_owned()),
    );
    parts.join("/")
}
