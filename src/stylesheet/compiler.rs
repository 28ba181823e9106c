//! The stylesheet compiler contract and dependency fetching.

use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};

use indexmap::IndexMap;

use crate::error::CompileError;
use crate::scope::ScopedNameGenerator;

/// Local class name -> scoped class name(s) for one stylesheet.
///
/// Values may hold several space-separated class names when the local class
/// composes others. Entries keep declaration order.
pub type StyleModuleMap = IndexMap<String, String>;

/// Turns a stylesheet into a [`StyleModuleMap`].
///
/// Implementations call [`ScopedNameGenerator::generate`] for every local
/// class they find and use `fetch` to resolve `composes ... from` references
/// to other stylesheets. Non-fatal diagnostics are logged with `log::warn!`;
/// anything that prevents a complete map is returned as a [`CompileError`].
pub trait StylesheetCompiler {
    fn compile(
        &self,
        stylesheet: &Path,
        generator: &ScopedNameGenerator,
        fetch: &mut dyn DependencyFetcher,
    ) -> Result<StyleModuleMap, CompileError>;
}

/// Resolves a dependency request (as written in the stylesheet) relative to
/// the stylesheet that made it.
pub trait DependencyFetcher {
    fn fetch(&mut self, request: &str, from: &Path) -> Result<StyleModuleMap, CompileError>;
}

/// Fetches dependencies by compiling them with the same compiler.
///
/// Each dependency is compiled at most once per fetcher. Import cycles are
/// reported as [`CompileError::Dependency`].
pub struct RecursiveFetcher<'a> {
    compiler: &'a dyn StylesheetCompiler,
    generator: &'a ScopedNameGenerator,
    compiled: HashMap<PathBuf, StyleModuleMap>,
    in_progress: Vec<PathBuf>,
}

impl<'a> RecursiveFetcher<'a> {
    pub fn new(compiler: &'a dyn StylesheetCompiler, generator: &'a ScopedNameGenerator) -> Self {
        Self {
            compiler,
            generator,
            compiled: HashMap::new(),
            in_progress: Vec::new(),
        }
    }

    /// Compiles a top-level stylesheet, fetching its dependencies through
    /// this fetcher.
    pub fn compile(&mut self, stylesheet: &Path) -> Result<StyleModuleMap, CompileError> {
        let compiler = self.compiler;
        let generator = self.generator;
        self.in_progress.push(normalize(stylesheet));
        let result = compiler.compile(stylesheet, generator, self);
        self.in_progress.pop();
        result
    }
}

impl DependencyFetcher for RecursiveFetcher<'_> {
    fn fetch(&mut self, request: &str, from: &Path) -> Result<StyleModuleMap, CompileError> {
        let base = from.parent().unwrap_or_else(|| Path::new(""));
        let resolved = normalize(&base.join(request));

        if let Some(map) = self.compiled.get(&resolved) {
            return Ok(map.clone());
        }
        if self.in_progress.contains(&resolved) {
            return Err(CompileError::Dependency {
                path: from.to_path_buf(),
                dependency: resolved,
                message: "circular composition".to_string(),
            });
        }

        log::debug!("compiling dependency {}", resolved.display());
        let map = self.compile(&resolved).map_err(|e| match e {
            CompileError::Dependency { .. } => e,
            other => CompileError::Dependency {
                path: from.to_path_buf(),
                dependency: resolved.clone(),
                message: other.to_string(),
            },
        })?;

        self.compiled.insert(resolved, map.clone());
        Ok(map)
    }
}

/// Removes `.` components and folds `..` into its parent, without touching
/// the file system.
pub(crate) fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !normalized.pop() {
                    normalized.push("..");
                }
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}
