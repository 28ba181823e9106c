//! Rewriting the style-name attributes of one source file.

use std::path::Path;

use crate::error::StyleNameError;
use crate::resolve::{resolve_style_name, Resolution, ResolutionPolicy, Snapshot, StyleMapRegistry};
use crate::scope::ScopedNameGenerator;
use crate::stylesheet::StylesheetCompiler;

use super::value::{append_spread, merge_dynamic, merge_resolved, AttributeValue, ClassNameValue, Expr};

/// Identifier of the embedded snapshot constant.
pub const SNAPSHOT_IDENTIFIER: &str = "_styleModuleImportMap";

/// Identifier the runtime helper is imported as.
pub const HELPER_IDENTIFIER: &str = "getClassName";

/// Module specifier the helper is imported from unless overridden.
pub const DEFAULT_HELPER_MODULE: &str = "stylename/get-class-name";

/// JavaScript source of the runtime helper. Hosts emit it as the module
/// named by the helper import.
pub const RUNTIME_HELPER_SOURCE: &str = include_str!("get_class_name.js");

/// Code to prepend to a source file that uses runtime resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimePrelude {
    /// `import getClassName from "...";`
    pub helper_import: String,
    /// Every map the file imported, in import order.
    pub snapshot: Snapshot,
}

impl RuntimePrelude {
    /// `const _styleModuleImportMap = {...};`
    pub fn snapshot_declaration(&self) -> String {
        format!("const {} = {};", SNAPSHOT_IDENTIFIER, self.snapshot.to_json())
    }

    /// The helper import followed by the snapshot declaration.
    pub fn to_source(&self) -> String {
        format!("{}\n{}\n", self.helper_import, self.snapshot_declaration())
    }
}

/// Transformation state for one source file.
///
/// Owns the file's [`StyleMapRegistry`] and policy. The host registers every
/// stylesheet import, then hands each style-name attribute to
/// [`rewrite`](Self::rewrite), and finally emits the prelude returned by
/// [`finish`](Self::finish).
///
/// # Example
///
/// ```rust
/// use std::path::Path;
/// use stylename::{
///     AttributeValue, ClassNameValue, CssModuleCompiler, Expr, FileTransform, ResolutionPolicy,
///     ScopedNameGenerator,
/// };
///
/// let compiler = CssModuleCompiler::new().with_source("/app/foo.css", ".a {} .b {}");
/// let generator = ScopedNameGenerator::from_pattern("[name]__[local]").unwrap();
/// let mut file = FileTransform::new(&compiler, &generator, ResolutionPolicy::default());
/// file.register_import("./foo.css", Path::new("/app/foo.css")).unwrap();
///
/// let literal = file.rewrite(&AttributeValue::Literal("a b".into()), None).unwrap();
/// assert_eq!(literal, Some(ClassNameValue::Literal("foo__a foo__b".into())));
///
/// let dynamic = file.rewrite(&AttributeValue::Expression(Expr::new("name")), None).unwrap();
/// assert_eq!(
///     dynamic.unwrap().to_source(),
///     "getClassName(name, _styleModuleImportMap)"
/// );
///
/// let prelude = file.finish().unwrap();
/// assert!(prelude.snapshot_declaration().contains("\"foo__a\""));
/// ```
pub struct FileTransform<'a> {
    registry: StyleMapRegistry<'a>,
    policy: ResolutionPolicy,
    helper_module: String,
    dynamic_rewrites: usize,
}

impl<'a> FileTransform<'a> {
    pub fn new(
        compiler: &'a dyn StylesheetCompiler,
        generator: &'a ScopedNameGenerator,
        policy: ResolutionPolicy,
    ) -> Self {
        Self {
            registry: StyleMapRegistry::new(compiler, generator),
            policy,
            helper_module: DEFAULT_HELPER_MODULE.to_string(),
            dynamic_rewrites: 0,
        }
    }

    /// Imports the runtime helper from `module` instead of the default.
    pub fn with_helper_module(mut self, module: impl Into<String>) -> Self {
        self.helper_module = module.into();
        self
    }

    /// Registers a stylesheet import of this file.
    ///
    /// `alias` is the import binding, or the import specifier for imports
    /// without one.
    pub fn register_import(&mut self, alias: &str, stylesheet: &Path) -> Result<(), StyleNameError> {
        self.registry.register_import(alias, stylesheet)?;
        Ok(())
    }

    pub fn registry(&self) -> &StyleMapRegistry<'a> {
        &self.registry
    }

    pub fn policy(&self) -> &ResolutionPolicy {
        &self.policy
    }

    /// Resolves a literal reference against this file's imports.
    pub fn resolve_literal(&self, reference: &str) -> Result<Resolution, StyleNameError> {
        resolve_style_name(reference, &self.registry, &self.policy)
    }

    /// Rewrites one style-name attribute into the value of its destination
    /// attribute.
    ///
    /// `destination` is the destination attribute's current value, if the
    /// element has one. Literals are resolved now; expressions become a
    /// runtime helper call. A spread only merges into an existing
    /// destination and yields `None` otherwise.
    ///
    /// # Errors
    ///
    /// Resolution errors for literal values.
    pub fn rewrite(
        &mut self,
        value: &AttributeValue,
        destination: Option<ClassNameValue>,
    ) -> Result<Option<ClassNameValue>, StyleNameError> {
        let rewritten = match value {
            AttributeValue::Literal(reference) => {
                let resolution = self.resolve_literal(reference)?;
                Some(merge_resolved(destination, resolution.class_name))
            }
            AttributeValue::Expression(expr) => {
                let call = self.runtime_call(expr);
                Some(merge_dynamic(destination, call))
            }
            AttributeValue::Spread(spread) => destination.map(|d| append_spread(d, spread)),
        };
        Ok(rewritten)
    }

    /// `getClassName(<expr>, _styleModuleImportMap[, <policy>])`.
    ///
    /// The policy argument is left out when it equals the defaults.
    pub fn runtime_call(&mut self, expr: &Expr) -> Expr {
        self.dynamic_rewrites += 1;

        let mut call = format!("{}({}, {}", HELPER_IDENTIFIER, expr.operand(), SNAPSHOT_IDENTIFIER);
        if !self.policy.is_default() {
            let policy = serde_json::json!({
                "autoResolveMultipleImports": self.policy.auto_resolve_multiple_imports,
                "handleMissingStyleName": self.policy.handle_missing_style_name.as_str(),
            });
            call.push_str(", ");
            call.push_str(&policy.to_string());
        }
        call.push(')');
        Expr::new(call)
    }

    /// Whether any attribute of this file needs runtime resolution.
    pub fn uses_runtime(&self) -> bool {
        self.dynamic_rewrites > 0
    }

    /// Ends the transformation of this file.
    ///
    /// Returns the prelude to emit when at least one value was rewritten to
    /// a runtime call. All calls share the single snapshot it declares.
    pub fn finish(self) -> Option<RuntimePrelude> {
        if !self.uses_runtime() {
            return None;
        }
        Some(RuntimePrelude {
            helper_import: format!(
                "import {} from {};",
                HELPER_IDENTIFIER,
                Expr::string_literal(&self.helper_module)
            ),
            snapshot: self.registry.snapshot(),
        })
    }
}
