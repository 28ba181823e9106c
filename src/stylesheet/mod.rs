//! Stylesheet compilation.
//!
//! The resolver never parses stylesheets itself. It asks a
//! [`StylesheetCompiler`] for the [`StyleModuleMap`] of each imported file.
//!
//! - [`StylesheetCompiler`]: The collaborator contract
//! - [`DependencyFetcher`]: Callback for `composes ... from "<file>"`
//! - [`RecursiveFetcher`]: Fetcher that compiles dependencies with the same
//!   compiler, memoising them and rejecting import cycles
//! - [`CssModuleCompiler`]: Plain CSS implementation on top of `cssparser`
//!
//! ## Compiling a stylesheet
//!
//! ```rust
//! use std::path::Path;
//! use stylename::{CssModuleCompiler, RecursiveFetcher, ScopedNameGenerator};
//!
//! let compiler = CssModuleCompiler::new()
//!     .with_source("/app/base.css", ".root { margin: 0 }")
//!     .with_source("/app/card.css", ".card { composes: root from \"./base.css\"; }");
//! let generator = ScopedNameGenerator::from_pattern("[name]-[local]").unwrap();
//!
//! let map = RecursiveFetcher::new(&compiler, &generator)
//!     .compile(Path::new("/app/card.css"))
//!     .unwrap();
//! assert_eq!(map["card"], "card-card base-root");
//! ```

mod compiler;
mod css;

pub use compiler::{DependencyFetcher, RecursiveFetcher, StyleModuleMap, StylesheetCompiler};
pub use css::CssModuleCompiler;
