//! User configuration.
//!
//! [`Options`] uses the option names CSS-Modules tooling users already know
//! and can be loaded from JSON or YAML:
//!
//! ```yaml
//! generateScopedName: "[name]__[local]___[hash:base64:5]"
//! autoResolveMultipleImports: true
//! handleMissingStyleName: warn
//! attributeNames:
//!   activeStyleName: activeClassName
//! ```
//!
//! | Option | Default |
//! |--------|---------|
//! | `generateScopedName` | `[path]___[name]__[local]___[hash:base64:5]` |
//! | `context` | current working directory |
//! | `autoResolveMultipleImports` | `false` |
//! | `handleMissingStyleName` | `throw` |
//! | `attributeNames` | `{ styleName: className }`, merged with user entries |
//! | `hashFunction` / `hashDigest` / `hashDigestLength` / `hashSalt` | `md4` / `hex` / `20` / `""` |
//! | `exclude` | none |

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ConfigurationError;
use crate::resolve::{MissingStyleNamePolicy, ResolutionPolicy};
use crate::scope::{DigestEncoding, HashFunction, HashOptions, ScopedNameGenerator, DEFAULT_HASH_LENGTH};

pub const DEFAULT_SCOPED_NAME: &str = "[path]___[name]__[local]___[hash:base64:5]";

fn default_attribute_names() -> IndexMap<String, String> {
    let mut names = IndexMap::new();
    names.insert("styleName".to_string(), "className".to_string());
    names
}

/// User entries are added to the default `styleName -> className` mapping.
fn merge_attribute_names<'de, D>(deserializer: D) -> Result<IndexMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    let user = IndexMap::<String, String>::deserialize(deserializer)?;
    let mut names = default_attribute_names();
    names.extend(user);
    Ok(names)
}

/// Configuration for scoped name generation and style-name resolution.
///
/// # Example
///
/// ```rust
/// use stylename::{MissingStyleNamePolicy, Options};
///
/// let options = Options::new()
///     .template("[local]__[hash:8]")
///     .auto_resolve(true)
///     .on_missing(MissingStyleNamePolicy::Warn)
///     .attribute("activeStyleName", "activeClassName");
///
/// assert_eq!(options.destination_for("styleName"), Some("className"));
/// assert_eq!(options.destination_for("activeStyleName"), Some("activeClassName"));
/// assert!(options.scoped_name_generator().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct Options {
    pub generate_scoped_name: String,
    pub context: Option<PathBuf>,
    pub auto_resolve_multiple_imports: bool,
    pub handle_missing_style_name: MissingStyleNamePolicy,
    #[serde(deserialize_with = "merge_attribute_names")]
    pub attribute_names: IndexMap<String, String>,
    pub hash_function: HashFunction,
    pub hash_digest: DigestEncoding,
    pub hash_digest_length: usize,
    pub hash_salt: String,
    /// Stylesheet import paths matching this pattern are left alone.
    pub exclude: Option<String>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            generate_scoped_name: DEFAULT_SCOPED_NAME.to_string(),
            context: None,
            auto_resolve_multiple_imports: false,
            handle_missing_style_name: MissingStyleNamePolicy::Error,
            attribute_names: default_attribute_names(),
            hash_function: HashFunction::Md4,
            hash_digest: DigestEncoding::Hex,
            hash_digest_length: DEFAULT_HASH_LENGTH,
            hash_salt: String::new(),
            exclude: None,
        }
    }
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses options from JSON.
    ///
    /// # Errors
    ///
    /// [`ConfigurationError::InvalidOptions`] for malformed documents,
    /// unknown fields and unknown `handleMissingStyleName`, `hashFunction`
    /// or `hashDigest` values.
    pub fn from_json(json: &str) -> Result<Self, ConfigurationError> {
        serde_json::from_str(json).map_err(|e| ConfigurationError::InvalidOptions {
            message: e.to_string(),
        })
    }

    /// Parses options from YAML.
    ///
    /// # Errors
    ///
    /// Same as [`from_json`](Self::from_json).
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigurationError> {
        serde_yaml::from_str(yaml).map_err(|e| ConfigurationError::InvalidOptions {
            message: e.to_string(),
        })
    }

    /// Reads options from a `.json`, `.yaml` or `.yml` file.
    pub fn from_path(path: &Path) -> Result<Self, ConfigurationError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigurationError::InvalidOptions {
            message: format!("cannot read {}: {}", path.display(), e),
        })?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json(&content),
            Some("yaml") | Some("yml") => Self::from_yaml(&content),
            _ => Err(ConfigurationError::InvalidOptions {
                message: format!("unsupported options file {}", path.display()),
            }),
        }
    }

    pub fn template(mut self, template: impl Into<String>) -> Self {
        self.generate_scoped_name = template.into();
        self
    }

    pub fn context(mut self, context: impl Into<PathBuf>) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn auto_resolve(mut self, enabled: bool) -> Self {
        self.auto_resolve_multiple_imports = enabled;
        self
    }

    pub fn on_missing(mut self, policy: MissingStyleNamePolicy) -> Self {
        self.handle_missing_style_name = policy;
        self
    }

    /// Maps a style-name attribute to the attribute it is rewritten into.
    pub fn attribute(mut self, source: impl Into<String>, destination: impl Into<String>) -> Self {
        self.attribute_names.insert(source.into(), destination.into());
        self
    }

    pub fn hash_function(mut self, function: HashFunction) -> Self {
        self.hash_function = function;
        self
    }

    pub fn hash_digest(mut self, digest: DigestEncoding) -> Self {
        self.hash_digest = digest;
        self
    }

    pub fn hash_digest_length(mut self, length: usize) -> Self {
        self.hash_digest_length = length;
        self
    }

    pub fn hash_salt(mut self, salt: impl Into<String>) -> Self {
        self.hash_salt = salt.into();
        self
    }

    pub fn exclude(mut self, pattern: impl Into<String>) -> Self {
        self.exclude = Some(pattern.into());
        self
    }

    /// The resolution policy for every source file.
    pub fn policy(&self) -> ResolutionPolicy {
        ResolutionPolicy::new()
            .auto_resolve(self.auto_resolve_multiple_imports)
            .on_missing(self.handle_missing_style_name)
    }

    /// The hash settings for `[hash]` placeholders.
    pub fn hash_options(&self) -> Result<HashOptions, ConfigurationError> {
        let hash = HashOptions {
            function: self.hash_function,
            digest: self.hash_digest,
            length: self.hash_digest_length,
            salt: self.hash_salt.clone(),
        };
        hash.validate()?;
        Ok(hash)
    }

    /// Builds the scoped name generator described by these options.
    ///
    /// # Errors
    ///
    /// Any [`ConfigurationError`] from the template or hash settings.
    pub fn scoped_name_generator(&self) -> Result<ScopedNameGenerator, ConfigurationError> {
        let generator =
            ScopedNameGenerator::from_pattern(&self.generate_scoped_name)?.with_hash(self.hash_options()?)?;
        Ok(match &self.context {
            Some(context) => generator.with_context(context),
            None => generator,
        })
    }

    /// The attribute `source` is rewritten into, if it is a style-name
    /// attribute.
    pub fn destination_for(&self, source: &str) -> Option<&str> {
        self.attribute_names.get(source).map(String::as_str)
    }

    /// Whether a stylesheet import is excluded from processing.
    ///
    /// # Errors
    ///
    /// [`ConfigurationError::InvalidOptions`] if `exclude` is not a valid
    /// regular expression.
    pub fn is_excluded(&self, import_path: &str) -> Result<bool, ConfigurationError> {
        let Some(pattern) = &self.exclude else {
            return Ok(false);
        };
        let regex = Regex::new(pattern).map_err(|e| ConfigurationError::InvalidOptions {
            message: format!("invalid exclude pattern: {}", e),
        })?;
        Ok(regex.is_match(import_path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = Options::default();
        assert_eq!(options.generate_scoped_name, DEFAULT_SCOPED_NAME);
        assert_eq!(options.policy(), ResolutionPolicy::default());
        assert_eq!(options.destination_for("styleName"), Some("className"));
        assert_eq!(options.destination_for("className"), None);

        let hash = options.hash_options().unwrap();
        assert_eq!(hash.function, HashFunction::Md4);
        assert_eq!(hash.digest, DigestEncoding::Hex);
        assert_eq!(hash.length, 20);
        assert_eq!(hash.salt, "");
    }

    #[test]
    fn test_from_json() {
        let options = Options::from_json(
            r#"{
                "generateScopedName": "[local]__[hash:8]",
                "autoResolveMultipleImports": true,
                "handleMissingStyleName": "ignore",
                "hashFunction": "sha256"
            }"#,
        )
        .unwrap();

        assert_eq!(options.generate_scoped_name, "[local]__[hash:8]");
        assert!(options.policy().auto_resolve_multiple_imports);
        assert_eq!(
            options.policy().handle_missing_style_name,
            MissingStyleNamePolicy::Ignore
        );
        assert_eq!(options.hash_options().unwrap().function, HashFunction::Sha256);
    }

    #[test]
    fn test_from_yaml_merges_attribute_names() {
        let options = Options::from_yaml(
            "handleMissingStyleName: throw\nattributeNames:\n  activeStyleName: activeClassName\n",
        )
        .unwrap();

        assert_eq!(options.handle_missing_style_name, MissingStyleNamePolicy::Error);
        assert_eq!(options.destination_for("styleName"), Some("className"));
        assert_eq!(options.destination_for("activeStyleName"), Some("activeClassName"));
    }

    #[test]
    fn test_invalid_policy_rejected() {
        let result = Options::from_json(r#"{ "handleMissingStyleName": "shout" }"#);
        assert!(matches!(result, Err(ConfigurationError::InvalidOptions { .. })));
    }

    #[test]
    fn test_unknown_field_rejected() {
        let result = Options::from_json(r#"{ "generateScopeName": "[local]" }"#);
        assert!(matches!(result, Err(ConfigurationError::InvalidOptions { .. })));
    }

    #[test]
    fn test_generator_rejects_bad_template() {
        let options = Options::new().template("[local]_[nope]");
        assert!(matches!(
            options.scoped_name_generator(),
            Err(ConfigurationError::UnknownPlaceholder { .. })
        ));
    }

    #[test]
    fn test_bad_hash_settings_rejected_at_load() {
        for json in [
            r#"{ "hashFunction": "crc32" }"#,
            r#"{ "hashDigest": "base7" }"#,
            r#"{ "hashDigest": 64 }"#,
        ] {
            let result = Options::from_json(json);
            assert!(
                matches!(result, Err(ConfigurationError::InvalidOptions { .. })),
                "{} was accepted",
                json
            );
        }

        let options = Options::from_yaml("hashFunction: SHA512
hashDigest: base36
").unwrap();
        assert_eq!(options.hash_function, HashFunction::Sha512);
        assert_eq!(options.hash_digest, DigestEncoding::Base(36));
    }

    #[test]
    fn test_hash_settings_serialize_by_name() {
        let options = Options::new()
            .hash_function(HashFunction::Sha1)
            .hash_digest(DigestEncoding::Base(62));
        let json = serde_json::to_value(&options).unwrap();
        assert_eq!(json["hashFunction"], "sha1");
        assert_eq!(json["hashDigest"], "base62");
    }

    #[test]
    fn test_generator_rejects_zero_hash_length() {
        assert!(matches!(
            Options::new().hash_digest_length(0).scoped_name_generator(),
            Err(ConfigurationError::InvalidHashLength)
        ));
    }

    #[test]
    fn test_generator_uses_context() {
        let dir = tempfile::tempdir().unwrap();
        let options = Options::new().template("[path][name]__[local]").context(dir.path());
        let generator = options.scoped_name_generator().unwrap();

        let stylesheet = dir.path().join("ui/card.css");
        assert_eq!(generator.generate("title", &stylesheet, ""), "ui-card__title");
    }

    #[test]
    fn test_exclude() {
        let options = Options::new().exclude("node_modules");
        assert!(options.is_excluded("node_modules/lib/a.css").unwrap());
        assert!(!options.is_excluded("./a.css").unwrap());
        assert!(!Options::new().is_excluded("node_modules/a.css").unwrap());

        let broken = Options::new().exclude("(");
        assert!(matches!(
            broken.is_excluded("a.css"),
            Err(ConfigurationError::InvalidOptions { .. })
        ));
    }

    #[test]
    fn test_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let json = dir.path().join("options.json");
        std::fs::write(&json, r#"{ "hashSalt": "pepper" }"#).unwrap();
        assert_eq!(Options::from_path(&json).unwrap().hash_salt, "pepper");

        let toml = dir.path().join("options.toml");
        std::fs::write(&toml, "hashSalt = 1").unwrap();
        assert!(Options::from_path(&toml).is_err());
    }
}
