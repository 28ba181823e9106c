//! Scoped class name generation.
//!
//! This module provides:
//!
//! - [`ScopedNameGenerator`]: Maps `(local name, stylesheet path, content)` to a
//!   deterministic, escaped, globally unique class name
//! - [`ScopedNameTemplate`]: Either a placeholder template or a custom function
//! - [`LocalIdentTemplate`]: A parsed placeholder template
//! - [`HashOptions`], [`HashFunction`], [`DigestEncoding`]: `[hash]` settings
//! - [`PackageInfo`]: The package a stylesheet belongs to
//!
//! # Placeholders
//!
//! | Placeholder | Value |
//! |-------------|-------|
//! | `[local]` | The local class name |
//! | `[package]` | Name of the closest enclosing package |
//! | `[name]` | Stylesheet file name without extension |
//! | `[ext]` | Stylesheet extension without the dot |
//! | `[path]` | Stylesheet directory relative to the package root, with trailing `/` |
//! | `[folder]` | Name of the stylesheet's directory |
//! | `[hash]`, `[contenthash]` | Digest of package, path, local name and content |
//! | `[<fn>:hash:<digest>:<len>]` | Digest with explicit function, encoding and length |
//!
//! After interpolation `@`, `+` and `/` become `-` and the result is escaped.

mod generator;
mod hash;
mod package;
mod template;

pub use generator::{CustomScopedName, ScopedNameGenerator, ScopedNameTemplate};
pub use hash::{DigestEncoding, HashFunction, HashOptions, DEFAULT_HASH_LENGTH};
pub use package::PackageInfo;
pub use template::{LocalIdentTemplate, Segment};
