//! Attribute rewriting at the host boundary.
//!
//! The host owns parsing and printing of source files. This module decides,
//! per style-name attribute, what the destination attribute becomes:
//!
//! | Style-name value | Destination | Result |
//! |------------------|-------------|--------|
//! | literal | none | `"foo__a"` |
//! | literal | literal `"apple"` | `"apple foo__a"` |
//! | literal | expression `E` | `(E ? E + " " : "") + "foo__a"` |
//! | expression `X` | none | `getClassName(X, _styleModuleImportMap)` |
//! | spread `S` | any `D` | `D + (" " + S)` |
//!
//! Files that produced at least one runtime call get a [`RuntimePrelude`]
//! from [`FileTransform::finish`].

mod file;
mod value;

pub use file::{
    FileTransform, RuntimePrelude, DEFAULT_HELPER_MODULE, HELPER_IDENTIFIER, RUNTIME_HELPER_SOURCE,
    SNAPSHOT_IDENTIFIER,
};
pub use value::{AttributeValue, ClassNameValue, Expr};
