//! Placeholder templates for scoped class names.
//!
//! A template such as `[name]__[local]___[hash:base64:5]` is parsed once into
//! a list of [`Segment`]s. Interpolation then walks the segments without
//! re-scanning the template text.

use once_cell::sync::Lazy;
use regex::Regex;

use super::hash::{DigestEncoding, HashFunction, HashOptions};
use crate::error::ConfigurationError;

static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[([^\[\]]*)\]").expect("placeholder pattern is valid"));

static HASH_PLACEHOLDER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?:([^:]+):)?(?:hash|contenthash)(?::([a-z]+\d*))?(?::(\d+))?$")
        .expect("hash placeholder pattern is valid")
});

/// One piece of a parsed template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Literal(String),
    Local,
    Package,
    Name,
    Ext,
    Path,
    Folder,
    Hash {
        function: Option<HashFunction>,
        digest: Option<DigestEncoding>,
        length: Option<usize>,
    },
}

/// A parsed placeholder template.
///
/// # Example
///
/// ```rust
/// use stylename::LocalIdentTemplate;
///
/// let template = LocalIdentTemplate::parse("[local]__[hash:8]").unwrap();
/// assert_eq!(template.source(), "[local]__[hash:8]");
///
/// assert!(LocalIdentTemplate::parse("[local]__[emoji]").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalIdentTemplate {
    source: String,
    segments: Vec<Segment>,
}

/// Values substituted into a template for one class name.
pub(crate) struct Interpolation<'a> {
    pub local: &'a str,
    pub package: &'a str,
    pub name: &'a str,
    pub ext: &'a str,
    pub path: &'a str,
    pub folder: &'a str,
    pub hash_input: &'a [u8],
    pub hash: &'a HashOptions,
}

impl LocalIdentTemplate {
    /// Parses a template, rejecting unknown placeholders.
    ///
    /// Placeholder names are case-insensitive.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::UnknownPlaceholder`] for any `[...]`
    /// group that is not a recognised placeholder, and the hash errors of
    /// [`HashFunction`] / [`DigestEncoding`] for bad hash parameters.
    pub fn parse(source: &str) -> Result<Self, ConfigurationError> {
        let mut segments = Vec::new();
        let mut last = 0;

        for caps in PLACEHOLDER.captures_iter(source) {
            let whole = caps.get(0).map_or(0..0, |m| m.range());
            let inner = caps.get(1).map_or("", |m| m.as_str());

            if whole.start > last {
                segments.push(Segment::Literal(source[last..whole.start].to_string()));
            }
            segments.push(parse_placeholder(inner, source)?);
            last = whole.end;
        }

        if last < source.len() {
            segments.push(Segment::Literal(source[last..].to_string()));
        }

        Ok(Self {
            source: source.to_string(),
            segments,
        })
    }

    /// Returns the template text this was parsed from.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Returns the parsed segments.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// True if any segment needs the digest.
    pub(crate) fn uses_hash(&self) -> bool {
        self.segments
            .iter()
            .any(|segment| matches!(segment, Segment::Hash { .. }))
    }

    pub(crate) fn interpolate(&self, values: &Interpolation<'_>) -> String {
        let mut output = String::new();

        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => output.push_str(text),
                Segment::Local => output.push_str(values.local),
                Segment::Package => output.push_str(values.package),
                Segment::Name => output.push_str(values.name),
                Segment::Ext => output.push_str(values.ext),
                Segment::Path => output.push_str(values.path),
                Segment::Folder => output.push_str(values.folder),
                Segment::Hash {
                    function,
                    digest,
                    length,
                } => {
                    let function = function.unwrap_or(values.hash.function);
                    let digest = digest.unwrap_or(values.hash.digest);
                    let length = length.unwrap_or(values.hash.length);
                    let bytes = function.digest(values.hash.salt.as_bytes(), values.hash_input);
                    output.push_str(&digest.encode(&bytes, length));
                }
            }
        }

        output
    }
}

fn parse_placeholder(inner: &str, template: &str) -> Result<Segment, ConfigurationError> {
    let segment = match inner.to_ascii_lowercase().as_str() {
        "local" => Segment::Local,
        "package" => Segment::Package,
        "name" => Segment::Name,
        "ext" => Segment::Ext,
        "path" => Segment::Path,
        "folder" => Segment::Folder,
        _ => {
            let Some(caps) = HASH_PLACEHOLDER.captures(inner) else {
                return Err(ConfigurationError::UnknownPlaceholder {
                    placeholder: inner.to_string(),
                    template: template.to_string(),
                });
            };

            let function = caps
                .get(1)
                .map(|m| m.as_str().parse::<HashFunction>())
                .transpose()?;
            let digest = caps
                .get(2)
                .map(|m| m.as_str().parse::<DigestEncoding>())
                .transpose()?;
            let length = match caps.get(3) {
                Some(m) => {
                    let length = m
                        .as_str()
                        .parse::<usize>()
                        .map_err(|_| ConfigurationError::InvalidHashLength)?;
                    if length == 0 {
                        return Err(ConfigurationError::InvalidHashLength);
                    }
                    Some(length)
                }
                None => None,
            };

            Segment::Hash {
                function,
                digest,
                length,
            }
        }
    };

    Ok(segment)
}
