//! # Stylename - CSS Modules style-name resolution
//!
//! `stylename` turns symbolic style names such as `styleName="header active"`
//! into the globally unique class names a CSS Modules build produces.
//!
//! ## Core Concepts
//!
//! - [`ScopedNameGenerator`]: Deterministic local name -> scoped name, driven
//!   by a placeholder template like `[name]__[local]___[hash:base64:5]`
//! - [`StylesheetCompiler`]: Produces the [`StyleModuleMap`] of a stylesheet;
//!   [`CssModuleCompiler`] is the bundled implementation for plain CSS
//! - [`StyleMapRegistry`]: The stylesheets imported by one source file
//! - [`resolve_style_name`]: Resolves a reference against the registry
//! - [`Snapshot`] and [`resolve_at_runtime`]: The same resolution deferred to
//!   run time for references that are not literals
//! - [`FileTransform`]: Host-facing rewrite of style-name attributes
//!
//! ## Quick Start
//!
//! ```rust
//! use std::path::Path;
//! use stylename::{resolve_style_name, CssModuleCompiler, Options, StyleMapRegistry};
//!
//! let options = Options::new().template("[name]__[local]");
//! let generator = options.scoped_name_generator().unwrap();
//! let compiler = CssModuleCompiler::new()
//!     .with_source("/app/foo.css", ".header {} .active {}");
//!
//! let mut registry = StyleMapRegistry::new(&compiler, &generator);
//! registry.register_import("foo", Path::new("/app/foo.css")).unwrap();
//!
//! let resolution = resolve_style_name("header foo.active", &registry, &options.policy()).unwrap();
//! assert_eq!(resolution.class_name, "foo__header foo__active");
//! ```
//!
//! ## Resolution Rules
//!
//! - `alias.local` always looks in the import named `alias`; an unknown alias
//!   is an error under every policy
//! - `local` looks in the most recent import, or in every import in
//!   declaration order when `autoResolveMultipleImports` is set
//! - names no import defines follow `handleMissingStyleName`: `error` fails,
//!   `warn` logs and keeps the token, `ignore` drops it
//!
//! ## Logging
//!
//! Diagnostics go through the [`log`] facade. Install any logger to see
//! `warn`-policy messages and stylesheet warnings.

pub mod error;
pub mod ident;
pub mod options;
pub mod resolve;
pub mod scope;
pub mod stylesheet;
pub mod transform;

pub use error::{CompileError, ConfigurationError, StyleNameError};
pub use ident::{escape_identifier, escape_local_ident, unescape};
pub use options::{Options, DEFAULT_SCOPED_NAME};
pub use resolve::{
    resolve_at_runtime, resolve_style_name, MissingStyleNamePolicy, Resolution, ResolutionPolicy,
    Snapshot, StyleMapRegistry, StyleMapSource, StyleNameReference, StyleToken,
};
pub use scope::{
    CustomScopedName, DigestEncoding, HashFunction, HashOptions, LocalIdentTemplate, PackageInfo,
    ScopedNameGenerator, ScopedNameTemplate, Segment, DEFAULT_HASH_LENGTH,
};
pub use stylesheet::{
    CssModuleCompiler, DependencyFetcher, RecursiveFetcher, StyleModuleMap, StylesheetCompiler,
};
pub use transform::{
    AttributeValue, ClassNameValue, Expr, FileTransform, RuntimePrelude, DEFAULT_HELPER_MODULE,
    HELPER_IDENTIFIER, RUNTIME_HELPER_SOURCE, SNAPSHOT_IDENTIFIER,
};
