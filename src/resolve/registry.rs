//! Per-file registry of imported style module maps.
//!
//! This module provides [`StyleMapRegistry`], which compiles each stylesheet a
//! source file imports and remembers the result for the rest of that file.
//!
//! # Design
//!
//! A registry lives exactly as long as the transformation of one source file.
//! Nothing is shared between files: importing the same stylesheet from two
//! source files compiles it twice. Caching across files, if wanted, belongs
//! in the [`StylesheetCompiler`].
//!
//! # Registration Rules
//!
//! 1. **Path cache first**: a stylesheet path already compiled for this file
//!    is never compiled again, even when imported under another alias
//! 2. **Aliases**: every alias used for an import can qualify tokens
//!    (`alias.local`), and is listed once in the import order
//! 3. **Import order**: declaration order, used by auto-resolution
//!    (first import wins) and by plain resolution (latest import only)
//!
//! | Call | Compiles? | Import order after |
//! |------|-----------|--------------------|
//! | `register_import("a", "x.css")` | yes | `a` |
//! | `register_import("b", "x.css")` | no | `a, b` |
//! | `register_import("a", "y.css")` | yes | `a, b` |
//!
//! # Example
//!
//! ```rust
//! use std::path::Path;
//! use stylename::{CssModuleCompiler, ScopedNameGenerator, StyleMapRegistry};
//!
//! let compiler = CssModuleCompiler::new().with_source("/app/foo.css", ".a {}");
//! let generator = ScopedNameGenerator::from_pattern("[name]__[local]").unwrap();
//!
//! let mut registry = StyleMapRegistry::new(&compiler, &generator);
//! registry.register_import("foo", Path::new("/app/foo.css")).unwrap();
//!
//! assert_eq!(registry.lookup(Some("foo")).unwrap()["a"], "foo__a");
//! assert_eq!(registry.import_order(), ["foo"]);
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::CompileError;
use crate::scope::ScopedNameGenerator;
use crate::stylesheet::{RecursiveFetcher, StyleModuleMap, StylesheetCompiler};

use super::resolver::StyleMapSource;
use super::runtime::Snapshot;

/// Style module maps imported by one source file.
pub struct StyleMapRegistry<'a> {
    compiler: &'a dyn StylesheetCompiler,
    generator: &'a ScopedNameGenerator,
    by_alias: HashMap<String, Arc<StyleModuleMap>>,
    by_path: HashMap<PathBuf, Arc<StyleModuleMap>>,
    import_order: Vec<String>,
}

impl<'a> StyleMapRegistry<'a> {
    /// Creates an empty registry for one source file.
    pub fn new(compiler: &'a dyn StylesheetCompiler, generator: &'a ScopedNameGenerator) -> Self {
        Self {
            compiler,
            generator,
            by_alias: HashMap::new(),
            by_path: HashMap::new(),
            import_order: Vec::new(),
        }
    }

    /// Registers a stylesheet import and returns its map.
    ///
    /// # Errors
    ///
    /// Propagates the compiler's [`CompileError`]. Nothing is registered
    /// when compilation fails.
    pub fn register_import(
        &mut self,
        alias: &str,
        path: &Path,
    ) -> Result<Arc<StyleModuleMap>, CompileError> {
        let map = match self.by_path.get(path) {
            Some(map) => {
                log::debug!("reusing {} for import '{}'", path.display(), alias);
                Arc::clone(map)
            }
            None => {
                log::debug!("compiling {} for import '{}'", path.display(), alias);
                let map = RecursiveFetcher::new(self.compiler, self.generator).compile(path)?;
                let map = Arc::new(map);
                self.by_path.insert(path.to_path_buf(), Arc::clone(&map));
                map
            }
        };

        self.by_alias.insert(alias.to_string(), Arc::clone(&map));
        if !self.import_order.iter().any(|a| a == alias) {
            self.import_order.push(alias.to_string());
        }

        Ok(map)
    }

    /// Looks up an import.
    ///
    /// `Some(alias)` returns the map imported under that alias. `None`
    /// returns the implicit namespace for unqualified tokens: the most
    /// recently registered import.
    pub fn lookup(&self, alias: Option<&str>) -> Option<&StyleModuleMap> {
        let alias = match alias {
            Some(alias) => alias,
            None => self.import_order.last()?.as_str(),
        };
        self.by_alias.get(alias).map(|map| map.as_ref())
    }

    /// Aliases in import order.
    pub fn import_order(&self) -> &[String] {
        &self.import_order
    }

    /// Number of distinct stylesheets compiled for this file.
    pub fn compiled_count(&self) -> usize {
        self.by_path.len()
    }

    pub fn is_empty(&self) -> bool {
        self.import_order.is_empty()
    }

    /// Copies every registered map, in import order, for embedding.
    pub fn snapshot(&self) -> Snapshot {
        let mut snapshot = Snapshot::new();
        for (alias, map) in self.imports() {
            snapshot.insert(alias, map.clone());
        }
        snapshot
    }
}

impl StyleMapSource for StyleMapRegistry<'_> {
    fn map_for(&self, alias: &str) -> Option<&StyleModuleMap> {
        self.lookup(Some(alias))
    }

    fn imports(&self) -> Vec<(&str, &StyleModuleMap)> {
        self.import_order
            .iter()
            .filter_map(|alias| {
                self.by_alias
                    .get(alias)
                    .map(|map| (alias.as_str(), map.as_ref()))
            })
            .collect()
    }
}
