//! Resolution policy for one source file.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigurationError;

/// What to do with a token that no imported stylesheet defines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MissingStyleNamePolicy {
    /// Fail the whole resolution with `MissingStyleName`.
    #[default]
    #[serde(rename = "error", alias = "throw")]
    Error,
    /// Log a warning and keep the original token.
    #[serde(rename = "warn")]
    Warn,
    /// Drop the token silently.
    #[serde(rename = "ignore")]
    Ignore,
}

impl MissingStyleNamePolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            MissingStyleNamePolicy::Error => "error",
            MissingStyleNamePolicy::Warn => "warn",
            MissingStyleNamePolicy::Ignore => "ignore",
        }
    }
}

impl FromStr for MissingStyleNamePolicy {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "error" | "throw" => Ok(MissingStyleNamePolicy::Error),
            "warn" => Ok(MissingStyleNamePolicy::Warn),
            "ignore" => Ok(MissingStyleNamePolicy::Ignore),
            other => Err(ConfigurationError::InvalidPolicy {
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for MissingStyleNamePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How unqualified and missing style names are handled.
///
/// Constant for the transformation of one source file. Serializes to the
/// record passed to the runtime helper:
///
/// ```json
/// { "autoResolveMultipleImports": true, "handleMissingStyleName": "ignore" }
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResolutionPolicy {
    /// Search every import, in declaration order, for unqualified tokens.
    /// When false only the most recent import is consulted.
    pub auto_resolve_multiple_imports: bool,
    pub handle_missing_style_name: MissingStyleNamePolicy,
}

impl ResolutionPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn auto_resolve(mut self, enabled: bool) -> Self {
        self.auto_resolve_multiple_imports = enabled;
        self
    }

    pub fn on_missing(mut self, policy: MissingStyleNamePolicy) -> Self {
        self.handle_missing_style_name = policy;
        self
    }

    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }
}
