//! Runtime resolution support.
//!
//! When a style-name reference is only known at run time, the generated code
//! carries a [`Snapshot`] of every stylesheet the source file imported and
//! calls the runtime helper with it. [`resolve_at_runtime`] is the Rust
//! rendition of that helper.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::StyleNameError;
use crate::stylesheet::StyleModuleMap;

use super::policy::ResolutionPolicy;
use super::resolver::{resolve_style_name, StyleMapSource};

/// Alias -> style module map for every import of one source file, in import
/// order.
///
/// Serializes to a plain JSON object of objects:
///
/// ```json
/// { "bar": { "a-b": "bar__a-b" }, "./foo.css": { "a-b": "foo__a-b" } }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Snapshot {
    maps: IndexMap<String, StyleModuleMap>,
}

impl Snapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces the map for `alias`. A replaced alias keeps its
    /// original position.
    pub fn insert(&mut self, alias: impl Into<String>, map: StyleModuleMap) {
        self.maps.insert(alias.into(), map);
    }

    pub fn len(&self) -> usize {
        self.maps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.maps.is_empty()
    }

    /// Parses a snapshot from its JSON form.
    ///
    /// # Errors
    ///
    /// Returns [`StyleNameError::InvalidSnapshot`] unless `json` is an object
    /// whose values are objects of strings.
    pub fn from_json(json: &str) -> Result<Self, StyleNameError> {
        serde_json::from_str(json).map_err(|e| StyleNameError::InvalidSnapshot {
            message: e.to_string(),
        })
    }

    /// Renders the snapshot as pretty-printed JSON.
    pub fn to_json(&self) -> String {
        let object: serde_json::Map<String, serde_json::Value> = self
            .maps
            .iter()
            .map(|(alias, map)| {
                let entries = map
                    .iter()
                    .map(|(local, scoped)| (local.clone(), serde_json::Value::String(scoped.clone())))
                    .collect();
                (alias.clone(), serde_json::Value::Object(entries))
            })
            .collect();
        format!("{:#}", serde_json::Value::Object(object))
    }
}

impl StyleMapSource for Snapshot {
    fn map_for(&self, alias: &str) -> Option<&StyleModuleMap> {
        self.maps.get(alias)
    }

    fn imports(&self) -> Vec<(&str, &StyleModuleMap)> {
        self.maps
            .iter()
            .map(|(alias, map)| (alias.as_str(), map))
            .collect()
    }
}

/// Resolves `reference` against an embedded snapshot.
///
/// Pure: the snapshot is never modified and nothing is cached between calls.
/// Follows the same rules as compile-time resolution.
///
/// # Errors
///
/// Same as [`resolve_style_name`].
pub fn resolve_at_runtime(
    reference: &str,
    snapshot: &Snapshot,
    policy: &ResolutionPolicy,
) -> Result<String, StyleNameError> {
    resolve_style_name(reference, snapshot, policy).map(|resolution| resolution.class_name)
}
