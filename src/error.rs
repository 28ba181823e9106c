//! Error taxonomy for scoped name generation and style-name resolution.
//!
//! Three layers of errors exist:
//!
//! - [`ConfigurationError`]: a bad template, hash setting or policy value.
//!   Always fatal for the build.
//! - [`CompileError`]: the stylesheet compiler could not produce a
//!   [`StyleModuleMap`](crate::StyleModuleMap) for a file.
//! - [`StyleNameError`]: everything the resolver can fail with, including the
//!   two above so callers only ever handle one type.
//!
//! None of these are retried anywhere in the crate. The work is deterministic,
//! so the only remedy is a source or configuration change.

use std::path::PathBuf;

use thiserror::Error;

/// A configuration value that cannot be used.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    /// The scoped name template contains a `[...]` group that is not a
    /// recognised placeholder.
    #[error("unknown placeholder '[{placeholder}]' in scoped name template \"{template}\"")]
    UnknownPlaceholder {
        placeholder: String,
        template: String,
    },

    /// The named hash function is not supported.
    #[error("unsupported hash function '{name}'")]
    UnknownHashFunction { name: String },

    /// The named digest encoding is not supported.
    #[error("unsupported hash digest '{name}'")]
    UnknownDigest { name: String },

    /// A hash length of zero was requested.
    #[error("hash length must be greater than zero")]
    InvalidHashLength,

    /// The missing-style-name policy is not one of `error`, `warn`, `ignore`.
    #[error("invalid handleMissingStyleName value '{value}': expected one of error, warn, ignore")]
    InvalidPolicy { value: String },

    /// The options document could not be deserialized.
    #[error("invalid options: {message}")]
    InvalidOptions { message: String },
}

/// The stylesheet compiler failed; the partially compiled stylesheet is
/// discarded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    /// The stylesheet could not be read.
    #[error("failed to read stylesheet \"{}\": {message}", path.display())]
    Read { path: PathBuf, message: String },

    /// The stylesheet is syntactically broken.
    #[error("syntax error in \"{}\" at line {line}, column {column}: {message}", path.display())]
    Syntax {
        path: PathBuf,
        line: u32,
        column: u32,
        message: String,
    },

    /// A `composes ... from` dependency could not be compiled.
    #[error("cannot compose from \"{}\" in \"{}\": {message}", dependency.display(), path.display())]
    Dependency {
        path: PathBuf,
        dependency: PathBuf,
        message: String,
    },
}

/// Error returned by style-name resolution.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StyleNameError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    /// A token is qualified with an alias that no import declared.
    #[error("CSS module import does not exist: {alias} (in style name \"{token}\")")]
    UnknownImportAlias { alias: String, token: String },

    /// A token resolves in no imported stylesheet and the policy is `error`.
    #[error("could not resolve the style name '{token}'")]
    MissingStyleName { token: String },

    /// An unqualified token was used before any stylesheet was imported.
    #[error("cannot use style name '{token}' without importing at least one stylesheet")]
    NoStyleImports { token: String },

    #[error(transparent)]
    Compilation(#[from] CompileError),

    /// An embedded snapshot is not a JSON object of string-to-string objects.
    #[error("malformed style module snapshot: {message}")]
    InvalidSnapshot { message: String },
}
