//! The style-name resolution algorithm.

use crate::error::StyleNameError;
use crate::stylesheet::StyleModuleMap;

use super::policy::{MissingStyleNamePolicy, ResolutionPolicy};

/// Anything the resolver can look style names up in.
///
/// Implemented by the live [`StyleMapRegistry`](super::StyleMapRegistry) at
/// compile time and by the embedded [`Snapshot`](super::Snapshot) at run
/// time, so both follow exactly the same rules.
pub trait StyleMapSource {
    /// The map imported under `alias`.
    fn map_for(&self, alias: &str) -> Option<&StyleModuleMap>;

    /// All imports in declaration order.
    fn imports(&self) -> Vec<(&str, &StyleModuleMap)>;
}

/// One token of a style-name reference: `local` or `alias.local`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StyleToken<'a> {
    /// The token exactly as written.
    pub raw: &'a str,
    pub alias: Option<&'a str>,
    pub local: &'a str,
}

impl<'a> StyleToken<'a> {
    /// Splits on the first `.`; everything after it is the local name.
    pub fn parse(raw: &'a str) -> Self {
        match raw.split_once('.') {
            Some((alias, local)) => StyleToken {
                raw,
                alias: Some(alias),
                local,
            },
            None => StyleToken {
                raw,
                alias: None,
                local: raw,
            },
        }
    }
}

/// A space-separated list of style tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StyleNameReference<'a> {
    source: &'a str,
}

impl<'a> StyleNameReference<'a> {
    pub fn new(source: &'a str) -> Self {
        Self { source }
    }

    pub fn as_str(&self) -> &'a str {
        self.source
    }

    /// Tokens in order. Runs of ASCII whitespace separate tokens; empty
    /// tokens never appear.
    pub fn tokens(&self) -> impl Iterator<Item = StyleToken<'a>> + 'a {
        self.source.split_ascii_whitespace().map(StyleToken::parse)
    }
}

/// Result of resolving a reference.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    /// Resolved class names joined by single spaces.
    pub class_name: String,
    /// One message per token passed through under the `warn` policy.
    pub diagnostics: Vec<String>,
}

/// Resolves every token of `reference` against `source`.
///
/// Per token:
///
/// 1. `alias.local` looks in the map imported as `alias`. An alias that was
///    never imported is always an error.
/// 2. `local` with `auto_resolve_multiple_imports` scans all imports in
///    declaration order; the first map defining it wins.
/// 3. `local` without it looks only in the most recent import.
/// 4. Tokens nothing defines follow the missing-name policy.
///
/// # Errors
///
/// [`StyleNameError::UnknownImportAlias`] and
/// [`StyleNameError::NoStyleImports`] regardless of policy;
/// [`StyleNameError::MissingStyleName`] under the `error` policy.
///
/// # Example
///
/// ```rust
/// use stylename::{resolve_style_name, ResolutionPolicy, Snapshot, StyleModuleMap};
///
/// let mut foo = StyleModuleMap::new();
/// foo.insert("a".to_string(), "foo__a".to_string());
/// let mut snapshot = Snapshot::new();
/// snapshot.insert("foo", foo);
///
/// let resolution = resolve_style_name("a foo.a", &snapshot, &ResolutionPolicy::default()).unwrap();
/// assert_eq!(resolution.class_name, "foo__a foo__a");
/// ```
pub fn resolve_style_name<S>(
    reference: &str,
    source: &S,
    policy: &ResolutionPolicy,
) -> Result<Resolution, StyleNameError>
where
    S: StyleMapSource + ?Sized,
{
    let imports = source.imports();
    let mut classes: Vec<&str> = Vec::new();
    let mut diagnostics = Vec::new();

    for token in StyleNameReference::new(reference).tokens() {
        let found = match token.alias {
            Some(alias) => {
                let map = source
                    .map_for(alias)
                    .ok_or_else(|| StyleNameError::UnknownImportAlias {
                        alias: alias.to_string(),
                        token: token.raw.to_string(),
                    })?;
                map.get(token.local)
            }
            None if imports.is_empty() => {
                return Err(StyleNameError::NoStyleImports {
                    token: token.raw.to_string(),
                });
            }
            None if policy.auto_resolve_multiple_imports => imports
                .iter()
                .find_map(|(_, map)| map.get(token.local)),
            None => imports.last().and_then(|(_, map)| map.get(token.local)),
        };

        match found {
            Some(class_name) => {
                log::trace!("resolved style name '{}' to '{}'", token.raw, class_name);
                classes.push(class_name);
            }
            None => match policy.handle_missing_style_name {
                MissingStyleNamePolicy::Error => {
                    return Err(StyleNameError::MissingStyleName {
                        token: token.raw.to_string(),
                    });
                }
                MissingStyleNamePolicy::Warn => {
                    let message = StyleNameError::MissingStyleName {
                        token: token.raw.to_string(),
                    }
                    .to_string();
                    log::warn!("{}", message);
                    diagnostics.push(message);
                    classes.push(token.raw);
                }
                MissingStyleNamePolicy::Ignore => {
                    log::trace!("ignoring unresolved style name '{}'", token.raw);
                }
            },
        }
    }

    Ok(Resolution {
        class_name: classes.join(" "),
        diagnostics,
    })
}
