//! A CSS-Modules compiler for plain CSS built on `cssparser`.
//!
//! Only the parts of a stylesheet that affect the exported class map are
//! interpreted: class selectors, `:global`/`:local` switches, nested
//! conditional at-rules and `composes` declarations. Everything else is
//! tokenized and skipped.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use cssparser::{ParseError, Parser, ParserInput, Token};
use indexmap::IndexMap;

use super::compiler::{normalize, DependencyFetcher, StyleModuleMap, StylesheetCompiler};
use crate::error::CompileError;
use crate::ident::unescape;
use crate::scope::ScopedNameGenerator;

/// At-rules whose blocks contain further style rules.
const NESTED_AT_RULES: &[&str] = &["media", "supports", "layer", "container", "document", "scope"];

/// One `composes` target.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Composition {
    Local(String),
    Global(String),
    Imported { name: String, request: String },
}

/// A class selector: the decoded name and the text it was written as.
#[derive(Debug, Clone)]
struct ClassSelector {
    name: String,
    source: String,
}

#[derive(Debug, Default)]
struct Local {
    /// Source form of the first selector that declared the class.
    source: String,
    compositions: Vec<Composition>,
}

/// Local class names in first-appearance order.
type Locals = IndexMap<String, Local>;

/// Compiles CSS files into style module maps.
///
/// Stylesheets are read from disk unless a source was registered for the
/// path with [`with_source`](Self::with_source).
///
/// # Example
///
/// ```rust
/// use std::path::Path;
/// use stylename::{CssModuleCompiler, RecursiveFetcher, ScopedNameGenerator};
///
/// let compiler = CssModuleCompiler::new()
///     .with_source("/app/button.css", ".base { color: red } .primary { composes: base; }");
/// let generator = ScopedNameGenerator::from_pattern("[name]_[local]").unwrap();
///
/// let map = RecursiveFetcher::new(&compiler, &generator)
///     .compile(Path::new("/app/button.css"))
///     .unwrap();
/// assert_eq!(map["primary"], "button_primary button_base");
/// ```
#[derive(Debug, Clone, Default)]
pub struct CssModuleCompiler {
    sources: HashMap<PathBuf, String>,
}

impl CssModuleCompiler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serves `content` for `path` instead of reading the file system.
    pub fn with_source(mut self, path: impl AsRef<Path>, content: impl Into<String>) -> Self {
        self.sources.insert(normalize(path.as_ref()), content.into());
        self
    }

    fn read(&self, path: &Path) -> Result<String, CompileError> {
        if let Some(content) = self.sources.get(&normalize(path)) {
            return Ok(content.clone());
        }
        std::fs::read_to_string(path).map_err(|e| CompileError::Read {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }
}

impl StylesheetCompiler for CssModuleCompiler {
    fn compile(
        &self,
        stylesheet: &Path,
        generator: &ScopedNameGenerator,
        fetch: &mut dyn DependencyFetcher,
    ) -> Result<StyleModuleMap, CompileError> {
        let content = self.read(stylesheet)?;
        log::debug!("compiling stylesheet {}", stylesheet.display());

        let locals = parse_locals(stylesheet, &content)?;
        // The generator works on selector text; the map holds class names.
        let scoped: IndexMap<String, String> = locals
            .iter()
            .map(|(name, local)| {
                let selector = generator.generate(&local.source, stylesheet, &content);
                (name.clone(), unescape(&selector))
            })
            .collect();

        let sheet = Sheet {
            path: stylesheet,
            locals: &locals,
            scoped: &scoped,
        };

        let mut map = StyleModuleMap::with_capacity(locals.len());
        for name in locals.keys() {
            let mut classes = Vec::new();
            let mut visiting = Vec::new();
            expand(&sheet, name, fetch, &mut visiting, &mut classes)?;
            map.insert(name.clone(), classes.join(" "));
        }

        Ok(map)
    }
}

// =============================================================================
// Parsing
// =============================================================================

fn parse_locals(path: &Path, content: &str) -> Result<Locals, CompileError> {
    let mut input = ParserInput::new(content);
    let mut parser = Parser::new(&mut input);
    let mut locals = Locals::new();
    parse_rule_list(&mut parser, path, &mut locals)?;
    Ok(locals)
}

fn parse_rule_list<'i>(
    parser: &mut Parser<'i, '_>,
    path: &Path,
    locals: &mut Locals,
) -> Result<(), CompileError> {
    let mut prelude = Prelude::default();

    loop {
        let start = parser.position();
        let token = match parser.next_including_whitespace_and_comments() {
            Ok(token) => token.clone(),
            Err(_) => return Ok(()),
        };

        match token {
            Token::CurlyBracketBlock => {
                let rule = std::mem::take(&mut prelude);
                let mut outcome = Ok(());
                // The closure never fails; the only error left is unread block
                // content, which the parser skips to the closing brace anyway.
                let _ = parser.parse_nested_block(|block| {
                    outcome = rule.parse_block(block, path, locals);
                    Ok::<_, ParseError<'i, ()>>(())
                });
                outcome?;
            }
            Token::Semicolon => prelude = Prelude::default(),
            Token::CloseCurlyBracket => {
                return Err(syntax_error(parser, path, "unexpected `}`"));
            }
            Token::BadString(_) => {
                return Err(syntax_error(parser, path, "unterminated string"));
            }
            Token::BadUrl(_) => {
                return Err(syntax_error(parser, path, "malformed url"));
            }
            other => {
                let raw = parser.slice_from(start);
                prelude.feed(&other, raw, parser);
            }
        }
    }
}

fn syntax_error(parser: &Parser<'_, '_>, path: &Path, message: &str) -> CompileError {
    let location = parser.current_source_location();
    CompileError::Syntax {
        path: path.to_path_buf(),
        line: location.line + 1,
        column: location.column,
        message: message.to_string(),
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
enum Pending {
    #[default]
    Nothing,
    Dot,
    Colon,
}

/// Everything before a `{`: either a selector list or an at-rule prelude.
#[derive(Debug, Default)]
struct Prelude {
    at_rule: Option<String>,
    classes: Vec<ClassSelector>,
    global: bool,
    pending: Pending,
    seen: bool,
}

impl Prelude {
    fn nested(global: bool) -> Self {
        Self {
            global,
            seen: true,
            ..Self::default()
        }
    }

    /// `raw` is the source text of `token`.
    fn feed<'i>(&mut self, token: &Token<'i>, raw: &str, parser: &mut Parser<'i, '_>) {
        let pending = std::mem::take(&mut self.pending);

        match token {
            Token::WhiteSpace(_) | Token::Comment(_) => {}
            Token::AtKeyword(name) if !self.seen => {
                self.at_rule = Some(name.to_ascii_lowercase());
            }
            _ if self.at_rule.is_some() => {}
            Token::Delim('.') => self.pending = Pending::Dot,
            Token::Colon => self.pending = Pending::Colon,
            Token::Ident(name) if pending == Pending::Dot => {
                if !self.global && !self.classes.iter().any(|c| c.name.as_str() == &**name) {
                    self.classes.push(ClassSelector {
                        name: name.to_string(),
                        source: raw.to_string(),
                    });
                }
            }
            Token::Ident(name) if pending == Pending::Colon => {
                if name.eq_ignore_ascii_case("global") {
                    self.global = true;
                } else if name.eq_ignore_ascii_case("local") {
                    self.global = false;
                }
            }
            Token::Function(name) => {
                let global = if name.eq_ignore_ascii_case("global") {
                    true
                } else if name.eq_ignore_ascii_case("local") {
                    false
                } else {
                    self.global
                };
                let classes = &mut self.classes;
                // Reads the arguments to exhaustion, so nothing is dropped here.
                let _ = parser.parse_nested_block(|inner| {
                    let mut nested = Prelude::nested(global);
                    loop {
                        let start = inner.position();
                        let token = match inner.next_including_whitespace_and_comments() {
                            Ok(token) => token.clone(),
                            Err(_) => break,
                        };
                        let raw = inner.slice_from(start);
                        nested.feed(&token, raw, inner);
                    }
                    for class in nested.classes {
                        if !classes.iter().any(|c| c.name == class.name) {
                            classes.push(class);
                        }
                    }
                    Ok::<_, ParseError<'i, ()>>(())
                });
            }
            Token::Comma => self.global = false,
            _ => {}
        }

        if !matches!(token, Token::WhiteSpace(_) | Token::Comment(_)) {
            self.seen = true;
        }
    }

    fn parse_block(
        &self,
        block: &mut Parser<'_, '_>,
        path: &Path,
        locals: &mut Locals,
    ) -> Result<(), CompileError> {
        match &self.at_rule {
            Some(name) if NESTED_AT_RULES.contains(&name.as_str()) => {
                parse_rule_list(block, path, locals)
            }
            Some(_) => Ok(()),
            None => {
                let compositions = parse_declarations(block);
                if !compositions.is_empty() && self.classes.len() != 1 {
                    return Err(syntax_error(
                        block,
                        path,
                        "composition is only allowed when the selector is a single local class",
                    ));
                }
                for class in &self.classes {
                    locals.entry(class.name.clone()).or_insert_with(|| Local {
                        source: class.source.clone(),
                        compositions: Vec::new(),
                    });
                }
                if let Some(class) = self.classes.first() {
                    if let Some(local) = locals.get_mut(&class.name) {
                        local.compositions.extend(compositions);
                    }
                }
                Ok(())
            }
        }
    }
}

fn parse_declarations(block: &mut Parser<'_, '_>) -> Vec<Composition> {
    let mut compositions = Vec::new();
    let mut at_start = true;

    loop {
        let token = match block.next() {
            Ok(token) => token.clone(),
            Err(_) => break,
        };

        match token {
            Token::Ident(name) if at_start => {
                at_start = false;
                let is_composes =
                    name.eq_ignore_ascii_case("composes") || name.eq_ignore_ascii_case("compose-with");
                if is_composes && block.try_parse(|p| p.expect_colon()).is_ok() {
                    compositions.extend(parse_composes(block));
                    at_start = true;
                }
            }
            Token::Semicolon | Token::CurlyBracketBlock => at_start = true,
            _ => at_start = false,
        }
    }

    compositions
}

/// Where the classes named in a `composes` declaration live.
enum Origin {
    Local,
    Global,
    File(String),
}

/// Reads the value of one `composes` declaration, through its `;`.
fn parse_composes(block: &mut Parser<'_, '_>) -> Vec<Composition> {
    let mut names: Vec<String> = Vec::new();
    let mut origin = Origin::Local;

    loop {
        let token = match block.next() {
            Ok(token) => token.clone(),
            Err(_) => break,
        };

        match token {
            Token::Semicolon => break,
            Token::Ident(name) if name.eq_ignore_ascii_case("from") => {
                origin = match block.next().cloned() {
                    Ok(Token::QuotedString(request)) => Origin::File(request.to_string()),
                    Ok(Token::Ident(word)) if word.eq_ignore_ascii_case("global") => Origin::Global,
                    _ => {
                        log::warn!(
                            "ignoring composes of {:?}: expected a file or `global` after `from`",
                            names
                        );
                        names.clear();
                        Origin::Local
                    }
                };
            }
            Token::Ident(name) => names.push(name.to_string()),
            _ => {}
        }
    }

    names
        .into_iter()
        .map(|name| match &origin {
            Origin::Local => Composition::Local(name),
            Origin::Global => Composition::Global(name),
            Origin::File(request) => Composition::Imported {
                name,
                request: request.clone(),
            },
        })
        .collect()
}

// =============================================================================
// Composition
// =============================================================================

struct Sheet<'a> {
    path: &'a Path,
    locals: &'a Locals,
    scoped: &'a IndexMap<String, String>,
}

fn push_unique(classes: &mut Vec<String>, class: &str) {
    if !classes.iter().any(|c| c == class) {
        classes.push(class.to_string());
    }
}

fn expand(
    sheet: &Sheet<'_>,
    name: &str,
    fetch: &mut dyn DependencyFetcher,
    visiting: &mut Vec<String>,
    classes: &mut Vec<String>,
) -> Result<(), CompileError> {
    if visiting.iter().any(|v| v == name) {
        log::warn!(
            "circular composition of `{}` in {}",
            name,
            sheet.path.display()
        );
        return Ok(());
    }
    let (Some(own), Some(local)) = (sheet.scoped.get(name), sheet.locals.get(name)) else {
        log::warn!(
            "composes target `{}` does not exist in {}",
            name,
            sheet.path.display()
        );
        return Ok(());
    };

    push_unique(classes, own);
    visiting.push(name.to_string());

    for composition in &local.compositions {
        match composition {
            Composition::Local(target) => expand(sheet, target, &mut *fetch, visiting, classes)?,
            Composition::Global(target) => push_unique(classes, target),
            Composition::Imported { name: target, request } => {
                let dependency = fetch.fetch(request, sheet.path)?;
                match dependency.get(target) {
                    Some(value) => {
                        for class in value.split_whitespace() {
                            push_unique(classes, class);
                        }
                    }
                    None => log::warn!(
                        "composes target `{}` does not exist in {} (from {})",
                        target,
                        request,
                        sheet.path.display()
                    ),
                }
            }
        }
    }

    visiting.pop();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stylesheet::RecursiveFetcher;

    fn generator() -> ScopedNameGenerator {
        ScopedNameGenerator::from_pattern("[name]_[local]").unwrap()
    }

    fn compile(compiler: &CssModuleCompiler, path: &str) -> Result<StyleModuleMap, CompileError> {
        let generator = generator();
        RecursiveFetcher::new(compiler, &generator).compile(Path::new(path))
    }

    fn keys(map: &StyleModuleMap) -> Vec<&str> {
        map.keys().map(String::as_str).collect()
    }

    // =========================================================================
    // Local names
    // =========================================================================

    #[test]
    fn test_classes_in_first_appearance_order() {
        let compiler = CssModuleCompiler::new().with_source(
            "/s/a.css",
            ".b { color: red } .a, .b:hover > .c { color: blue } div.d {}",
        );
        let map = compile(&compiler, "/s/a.css").unwrap();
        assert_eq!(keys(&map), vec!["b", "a", "c", "d"]);
        assert_eq!(map["a"], "a_a");
    }

    #[test]
    fn test_global_classes_are_not_local() {
        let compiler = CssModuleCompiler::new().with_source(
            "/s/a.css",
            ":global(.reset) .box {} :global .g1 .g2, .local {} .x :local(.y) {}",
        );
        let map = compile(&compiler, "/s/a.css").unwrap();
        assert_eq!(keys(&map), vec!["box", "local", "x", "y"]);
    }

    #[test]
    fn test_classes_inside_pseudo_functions() {
        let compiler =
            CssModuleCompiler::new().with_source("/s/a.css", ".a:not(.b) {} :is(.c, .d) {}");
        let map = compile(&compiler, "/s/a.css").unwrap();
        assert_eq!(keys(&map), vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_nested_at_rules_are_searched() {
        let compiler = CssModuleCompiler::new().with_source(
            "/s/a.css",
            "@media (min-width: 10px) { .wide { width: 1px } @supports (display: grid) { .grid {} } }\n\
             @keyframes spin { from { opacity: 0 } to { opacity: 1 } }\n\
             @import \"other.css\";\n\
             .after {}",
        );
        let map = compile(&compiler, "/s/a.css").unwrap();
        assert_eq!(keys(&map), vec!["wide", "grid", "after"]);
    }

    #[test]
    fn test_numbers_are_not_classes() {
        let compiler = CssModuleCompiler::new().with_source("/s/a.css", ".a { margin: .5em }");
        let map = compile(&compiler, "/s/a.css").unwrap();
        assert_eq!(keys(&map), vec!["a"]);
    }

    #[test]
    fn test_escaped_class_names() {
        let compiler = CssModuleCompiler::new().with_source("/s/a.css", r".sm\:hidden {}");
        let map = compile(&compiler, "/s/a.css").unwrap();
        assert_eq!(map["sm:hidden"], "a_sm:hidden");
    }

    #[test]
    fn test_escaped_class_names_do_not_collide() {
        let compiler = CssModuleCompiler::new().with_source(
            "/s/a.css",
            r".a\.b {} .a-b {} .sm\:hidden {} .sm-hidden {} .w-1\/2 {}",
        );
        let map = compile(&compiler, "/s/a.css").unwrap();
        assert_eq!(map["a.b"], "a_a.b");
        assert_eq!(map["a-b"], "a_a-b");
        assert_eq!(map["sm:hidden"], "a_sm:hidden");
        assert_eq!(map["sm-hidden"], "a_sm-hidden");
        assert_eq!(map["w-1/2"], "a_w-1/2");
    }

    #[test]
    fn test_escapes_are_decoded_once() {
        let compiler =
            CssModuleCompiler::new().with_source("/s/a.css", r".a\\30 {} .a0 {} .\61 b {}");
        let generator = ScopedNameGenerator::from_pattern("[local]__[hash:6]").unwrap();
        let map = RecursiveFetcher::new(&compiler, &generator)
            .compile(Path::new("/s/a.css"))
            .unwrap();

        assert_eq!(keys(&map), vec![r"a\30", "a0", "ab"]);
        assert!(map[r"a\30"].starts_with(r"a\30__"), "{}", map[r"a\30"]);
        assert!(map["a0"].starts_with("a0__"));
        assert_ne!(map[r"a\30"][6..], map["a0"][4..]);
    }

    #[test]
    fn test_composes_escaped_class() {
        let compiler = CssModuleCompiler::new()
            .with_source("/s/a.css", r".sm\:hidden {} .nav { composes: sm\:hidden; }");
        let map = compile(&compiler, "/s/a.css").unwrap();
        assert_eq!(map["nav"], "a_nav a_sm:hidden");
    }

    // =========================================================================
    // Composition
    // =========================================================================

    #[test]
    fn test_composes_local() {
        let compiler = CssModuleCompiler::new().with_source(
            "/s/a.css",
            ".base {} .mid { composes: base; } .top { composes: mid; color: red }",
        );
        let map = compile(&compiler, "/s/a.css").unwrap();
        assert_eq!(map["mid"], "a_mid a_base");
        assert_eq!(map["top"], "a_top a_mid a_base");
    }

    #[test]
    fn test_composes_global() {
        let compiler = CssModuleCompiler::new()
            .with_source("/s/a.css", ".btn { composes: clearfix pull-left from global; }");
        let map = compile(&compiler, "/s/a.css").unwrap();
        assert_eq!(map["btn"], "a_btn clearfix pull-left");
    }

    #[test]
    fn test_composes_from_file() {
        let compiler = CssModuleCompiler::new()
            .with_source("/s/shared/base.css", ".base { composes: root; } .root {}")
            .with_source(
                "/s/app/card.css",
                ".card { composes: base from \"../shared/base.css\"; }",
            );
        let map = compile(&compiler, "/s/app/card.css").unwrap();
        assert_eq!(map["card"], "card_card base_base base_root");
    }

    #[test]
    fn test_composes_missing_target_is_not_fatal() {
        let compiler = CssModuleCompiler::new()
            .with_source("/s/base.css", ".base {}")
            .with_source(
                "/s/a.css",
                ".a { composes: nope; } .b { composes: gone from \"./base.css\"; }",
            );
        let map = compile(&compiler, "/s/a.css").unwrap();
        assert_eq!(map["a"], "a_a");
        assert_eq!(map["b"], "a_b");
    }

    #[test]
    fn test_composes_requires_single_class() {
        let compiler =
            CssModuleCompiler::new().with_source("/s/a.css", ".base {} .a .b { composes: base; }");
        let result = compile(&compiler, "/s/a.css");
        assert!(matches!(result, Err(CompileError::Syntax { .. })));
    }

    #[test]
    fn test_composes_local_cycle_terminates() {
        let compiler = CssModuleCompiler::new()
            .with_source("/s/a.css", ".a { composes: b; } .b { composes: a; }");
        let map = compile(&compiler, "/s/a.css").unwrap();
        assert_eq!(map["a"], "a_a a_b");
        assert_eq!(map["b"], "a_b a_a");
    }

    #[test]
    fn test_composes_file_cycle_is_error() {
        let compiler = CssModuleCompiler::new()
            .with_source("/s/a.css", ".a { composes: b from \"./b.css\"; }")
            .with_source("/s/b.css", ".b { composes: a from \"./a.css\"; }");
        let result = compile(&compiler, "/s/a.css");
        assert!(matches!(result, Err(CompileError::Dependency { .. })));
    }

    // =========================================================================
    // Failures
    // =========================================================================

    #[test]
    fn test_stray_closing_brace() {
        let compiler = CssModuleCompiler::new().with_source("/s/a.css", ".a {}\n}\n.b {}");
        match compile(&compiler, "/s/a.css") {
            Err(CompileError::Syntax { line, .. }) => assert_eq!(line, 2),
            other => panic!("Expected syntax error, got {:?}", other),
        }
    }

    #[test]
    fn test_unterminated_string() {
        let compiler =
            CssModuleCompiler::new().with_source("/s/a.css", ".a {}\n\"oops\n.b {}");
        assert!(matches!(
            compile(&compiler, "/s/a.css"),
            Err(CompileError::Syntax { .. })
        ));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.css");
        let generator = generator();
        let compiler = CssModuleCompiler::new();
        let result = RecursiveFetcher::new(&compiler, &generator).compile(&path);
        assert!(matches!(result, Err(CompileError::Read { .. })));
    }

    #[test]
    fn test_reads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("panel.css");
        std::fs::write(&path, ".panel { padding: 0 }").unwrap();

        let generator = generator();
        let compiler = CssModuleCompiler::new();
        let map = RecursiveFetcher::new(&compiler, &generator)
            .compile(&path)
            .unwrap();
        assert_eq!(map["panel"], "panel_panel");
    }
}
