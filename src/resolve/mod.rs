//! Style-name resolution.
//!
//! This module provides:
//!
//! - [`StyleMapRegistry`]: Imports of one source file, compiled once per path
//! - [`resolve_style_name`]: Turns a reference like `"header foo.active"` into
//!   scoped class names
//! - [`Snapshot`] and [`resolve_at_runtime`]: The same resolution against an
//!   embedded copy of the registry, for references only known at run time
//! - [`ResolutionPolicy`] and [`MissingStyleNamePolicy`]: Per-file settings
//!
//! Both the registry and the snapshot implement [`StyleMapSource`], so
//! compile-time and run-time resolution cannot drift apart.
//!
//! ## Missing names
//!
//! | Policy | Output for `"missing other"` | Diagnostic |
//! |--------|------------------------------|------------|
//! | `error` | none, `MissingStyleName` | the error |
//! | `warn` | `"missing Other_cls"` | one `log::warn!` |
//! | `ignore` | `"Other_cls"` | none |

mod policy;
mod registry;
mod resolver;
mod runtime;

pub use policy::{MissingStyleNamePolicy, ResolutionPolicy};
pub use registry::StyleMapRegistry;
pub use resolver::{resolve_style_name, Resolution, StyleMapSource, StyleNameReference, StyleToken};
pub use runtime::{resolve_at_runtime, Snapshot};
