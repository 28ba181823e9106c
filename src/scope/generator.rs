//! The scoped name generator.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::hash::HashOptions;
use super::package::{relative_to, PackageInfo};
use super::template::{Interpolation, LocalIdentTemplate};
use crate::error::ConfigurationError;
use crate::ident::{escape_local_ident, unescape};

/// Stands in for `[local]` while the rest of the interpolated template is
/// escaped.
const LOCAL_MARKER: &str = "[local]";
const ESCAPED_LOCAL_MARKER: &str = r"\[local\]";

/// User-supplied scoped name function: `(local_name, stylesheet_path, stylesheet_content)`.
pub type CustomScopedName = Arc<dyn Fn(&str, &Path, &str) -> String + Send + Sync>;

/// How scoped names are produced.
#[derive(Clone)]
pub enum ScopedNameTemplate {
    /// A placeholder template such as `[name]__[local]___[hash:base64:5]`.
    Pattern(LocalIdentTemplate),
    /// A function that computes the name itself. Its output is still escaped.
    Custom(CustomScopedName),
}

impl ScopedNameTemplate {
    /// Parses a placeholder template.
    pub fn pattern(source: &str) -> Result<Self, ConfigurationError> {
        LocalIdentTemplate::parse(source).map(ScopedNameTemplate::Pattern)
    }

    /// Wraps a custom naming function.
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(&str, &Path, &str) -> String + Send + Sync + 'static,
    {
        ScopedNameTemplate::Custom(Arc::new(f))
    }
}

impl fmt::Debug for ScopedNameTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScopedNameTemplate::Pattern(template) => {
                f.debug_tuple("Pattern").field(&template.source()).finish()
            }
            ScopedNameTemplate::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Turns local class names into deterministic, globally unique class names.
///
/// The same `(local name, stylesheet path, stylesheet content)` always yields
/// the same scoped name for a given template and hash configuration. Every
/// result is a valid CSS identifier.
///
/// The hash input is the package name and the stylesheet path relative to the
/// package root, followed by the unescaped local name and the stylesheet
/// content, separated by NUL. Editing any class in a stylesheet therefore
/// changes every hash for that stylesheet.
///
/// `[local]` is filled in after the rest of the template has been escaped,
/// with the class name exactly as written in the stylesheet. Escapes such as
/// `sm\:hidden` survive, so distinct local classes keep distinct names.
///
/// # Example
///
/// ```rust
/// use std::path::Path;
/// use stylename::{PackageInfo, ScopedNameGenerator};
///
/// let generator = ScopedNameGenerator::from_pattern("[name]__[local]")
///     .unwrap()
///     .with_package(PackageInfo::new("app", "/app"));
///
/// let scoped = generator.generate("title", Path::new("/app/src/card.css"), ".title {}");
/// assert_eq!(scoped, "card__title");
/// ```
#[derive(Debug, Clone)]
pub struct ScopedNameGenerator {
    template: ScopedNameTemplate,
    hash: HashOptions,
    context: PathBuf,
    package: Option<PackageInfo>,
}

impl ScopedNameGenerator {
    /// Creates a generator with default hash options.
    ///
    /// The context directory (used as the package root when no manifest is
    /// found) defaults to the current working directory.
    pub fn new(template: ScopedNameTemplate) -> Self {
        Self {
            template,
            hash: HashOptions::default(),
            context: std::env::current_dir().unwrap_or_default(),
            package: None,
        }
    }

    /// Creates a generator from a placeholder template.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigurationError`] if the template is invalid.
    pub fn from_pattern(pattern: &str) -> Result<Self, ConfigurationError> {
        Ok(Self::new(ScopedNameTemplate::pattern(pattern)?))
    }

    /// Replaces the hash options.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::InvalidHashLength`] for a zero length.
    pub fn with_hash(mut self, hash: HashOptions) -> Result<Self, ConfigurationError> {
        hash.validate()?;
        self.hash = hash;
        Ok(self)
    }

    /// Sets the fallback package root.
    pub fn with_context(mut self, context: impl Into<PathBuf>) -> Self {
        self.context = context.into();
        self
    }

    /// Pins the package instead of discovering it from the stylesheet path.
    pub fn with_package(mut self, package: PackageInfo) -> Self {
        self.package = Some(package);
        self
    }

    /// Returns the template in use.
    pub fn template(&self) -> &ScopedNameTemplate {
        &self.template
    }

    /// Returns the hash options in use.
    pub fn hash_options(&self) -> &HashOptions {
        &self.hash
    }

    /// Generates the scoped name for `local_name` declared in `stylesheet`.
    ///
    /// `local_name` is the class name as written in the stylesheet, CSS
    /// escapes included. The result is in the same escaped form, ready for
    /// use in a selector; [`unescape`] it for use in a `class` attribute.
    pub fn generate(&self, local_name: &str, stylesheet: &Path, content: &str) -> String {
        match &self.template {
            ScopedNameTemplate::Custom(f) => escape_local_ident(&f(local_name, stylesheet, content)),
            ScopedNameTemplate::Pattern(template) => {
                let raw = self.interpolate(template, local_name, stylesheet, content);
                escape_local_ident(&raw).replace(ESCAPED_LOCAL_MARKER, local_name)
            }
        }
    }

    fn interpolate(
        &self,
        template: &LocalIdentTemplate,
        local_name: &str,
        stylesheet: &Path,
        content: &str,
    ) -> String {
        let local = unescape(local_name);
        let package = self.package_for(stylesheet);

        let name = stylesheet
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let ext = stylesheet
            .extension()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        let directory = stylesheet
            .parent()
            .map(|dir| relative_to(dir, &package.root))
            .unwrap_or_default();
        let (path, folder) = if directory.is_empty() {
            (String::new(), String::new())
        } else {
            let directory = directory
                .split('/')
                .map(|part| if part == ".." { "_" } else { part })
                .collect::<Vec<_>>()
                .join("/");
            let folder = directory.rsplit('/').next().unwrap_or_default().to_string();
            (format!("{}/", directory), folder)
        };

        let hash_input = if template.uses_hash() {
            format!(
                "{}{}\0{}\0{}",
                package.name,
                package.relative_path(stylesheet),
                local,
                content
            )
        } else {
            String::new()
        };

        let interpolated = template.interpolate(&Interpolation {
            local: LOCAL_MARKER,
            package: &package.name,
            name: &name,
            ext: &ext,
            path: &path,
            folder: &folder,
            hash_input: hash_input.as_bytes(),
            hash: &self.hash,
        });

        interpolated.replace(['@', '+', '/'], "-")
    }

    fn package_for(&self, stylesheet: &Path) -> PackageInfo {
        if let Some(package) = &self.package {
            return package.clone();
        }
        stylesheet
            .parent()
            .and_then(PackageInfo::discover)
            .unwrap_or_else(|| PackageInfo::new("", self.context.clone()))
    }
}
