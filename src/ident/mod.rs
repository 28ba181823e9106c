//! CSS identifier escaping.
//!
//! This module provides the conversions between arbitrary strings and
//! syntactically valid CSS identifiers:
//!
//! - [`escape_identifier`]: Serializes a string as a CSS identifier using
//!   backslash escapes, with the shortest escape form that stays unambiguous
//! - [`escape_local_ident`]: Sanitizes a generated scoped class name (reserved
//!   and control characters become `-`) before escaping it
//! - [`unescape`]: Reads CSS escapes back into the characters they stand for
//!
//! `unescape(&escape_identifier(s)) == s` holds for every string without NUL
//! characters.

mod escape;
mod unescape;

pub use escape::{escape_identifier, escape_local_ident};
pub use unescape::unescape;
