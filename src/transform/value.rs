//! Attribute values at the host boundary and how they merge.

use std::borrow::Cow;
use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

/// Expressions that can appear as an operand without parentheses:
/// identifiers, member chains, string literals and integers.
static SIMPLE_EXPRESSION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"^(?:[A-Za-z_$][\w$]*(?:\.[A-Za-z_$][\w$]*)*|"(?:[^"\\]|\\.)*"|'(?:[^'\\]|\\.)*'|\d+)$"#,
    )
    .expect("simple expression pattern is valid")
});

/// Source text of a JavaScript expression, opaque to this crate.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Expr(String);

impl Expr {
    pub fn new(source: impl Into<String>) -> Self {
        Expr(source.into())
    }

    /// A double-quoted string literal for `value`.
    pub fn string_literal(value: &str) -> Self {
        Expr(serde_json::Value::String(value.to_string()).to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The expression, parenthesised unless it is a single primary
    /// expression.
    pub(crate) fn operand(&self) -> Cow<'_, str> {
        let source = self.0.trim();
        if SIMPLE_EXPRESSION.is_match(source) {
            Cow::Borrowed(source)
        } else {
            Cow::Owned(format!("({})", source))
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The value of a style-name attribute, as the host found it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeValue {
    /// A string literal known at compile time.
    Literal(String),
    /// Any other expression; resolved at run time.
    Expression(Expr),
    /// Class names arriving from a spread of props, appended to the
    /// destination attribute.
    Spread(Expr),
}

/// The value of a destination attribute such as `className`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassNameValue {
    Literal(String),
    Expression(Expr),
}

impl ClassNameValue {
    /// Renders the value as JavaScript source.
    pub fn to_source(&self) -> String {
        match self {
            ClassNameValue::Literal(value) => Expr::string_literal(value).0,
            ClassNameValue::Expression(expr) => expr.0.clone(),
        }
    }

    fn operand(&self) -> Cow<'_, str> {
        match self {
            ClassNameValue::Literal(value) => Cow::Owned(Expr::string_literal(value).0),
            ClassNameValue::Expression(expr) => expr.operand(),
        }
    }
}

/// Combines an existing destination with a statically resolved class string.
pub(crate) fn merge_resolved(destination: Option<ClassNameValue>, resolved: String) -> ClassNameValue {
    match destination {
        None => ClassNameValue::Literal(resolved),
        Some(destination) if resolved.is_empty() => destination,
        Some(ClassNameValue::Literal(existing)) if existing.is_empty() => {
            ClassNameValue::Literal(resolved)
        }
        Some(ClassNameValue::Literal(existing)) => {
            ClassNameValue::Literal(format!("{} {}", existing, resolved))
        }
        Some(ClassNameValue::Expression(existing)) => ClassNameValue::Expression(Expr(format!(
            "{} + {}",
            conditional_prefix(&existing),
            Expr::string_literal(&resolved)
        ))),
    }
}

/// Combines an existing destination with a runtime helper call.
pub(crate) fn merge_dynamic(destination: Option<ClassNameValue>, call: Expr) -> ClassNameValue {
    match destination {
        None => ClassNameValue::Expression(call),
        Some(ClassNameValue::Literal(existing)) if existing.is_empty() => {
            ClassNameValue::Expression(call)
        }
        Some(ClassNameValue::Literal(existing)) => ClassNameValue::Expression(Expr(format!(
            "{} + {}",
            Expr::string_literal(&format!("{} ", existing)),
            call
        ))),
        Some(ClassNameValue::Expression(existing)) => ClassNameValue::Expression(Expr(format!(
            "{} + {}",
            conditional_prefix(&existing),
            call
        ))),
    }
}

/// `destination + (" " + spread)`.
pub(crate) fn append_spread(destination: ClassNameValue, spread: &Expr) -> ClassNameValue {
    ClassNameValue::Expression(Expr(format!(
        "{} + (\" \" + {})",
        destination.operand(),
        spread.operand()
    )))
}

/// `(E ? E + " " : "")`: the existing classes plus a separator, if any.
fn conditional_prefix(existing: &Expr) -> String {
    let operand = existing.operand();
    format!("({} ? {} + \" \" : \"\")", operand, operand)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_literal_escapes() {
        assert_eq!(Expr::string_literal("a\"b\\c").as_str(), r#""a\"b\\c""#);
    }

    #[test]
    fn test_operand_parenthesises_compound_expressions() {
        assert_eq!(Expr::new("this.props.className").operand(), "this.props.className");
        assert_eq!(Expr::new("'apple'").operand(), "'apple'");
        assert_eq!(
            Expr::new("Math.random() > 0.5 ? 'apple' : 'banana'").operand(),
            "(Math.random() > 0.5 ? 'apple' : 'banana')"
        );
    }

    #[test]
    fn test_merge_resolved_without_destination() {
        assert_eq!(
            merge_resolved(None, "foo__a".into()),
            ClassNameValue::Literal("foo__a".into())
        );
    }

    #[test]
    fn test_merge_resolved_with_literal() {
        let merged = merge_resolved(
            Some(ClassNameValue::Literal("apple banana".into())),
            "foo__a".into(),
        );
        assert_eq!(merged, ClassNameValue::Literal("apple banana foo__a".into()));
    }

    #[test]
    fn test_merge_resolved_with_expression() {
        let merged = merge_resolved(
            Some(ClassNameValue::Expression(Expr::new("this.props.activeClassName"))),
            "foo__a".into(),
        );
        assert_eq!(
            merged.to_source(),
            r#"(this.props.activeClassName ? this.props.activeClassName + " " : "") + "foo__a""#
        );
    }

    #[test]
    fn test_merge_resolved_with_complex_expression() {
        let merged = merge_resolved(
            Some(ClassNameValue::Expression(Expr::new(
                "Math.random() > 0.5 ? 'apple' : 'banana'",
            ))),
            "foo__a".into(),
        );
        assert_eq!(
            merged.to_source(),
            r#"((Math.random() > 0.5 ? 'apple' : 'banana') ? (Math.random() > 0.5 ? 'apple' : 'banana') + " " : "") + "foo__a""#
        );
    }

    #[test]
    fn test_merge_resolved_empty_keeps_destination() {
        let destination = ClassNameValue::Literal("apple".into());
        assert_eq!(merge_resolved(Some(destination.clone()), String::new()), destination);
    }

    #[test]
    fn test_merge_dynamic() {
        let call = Expr::new("getClassName(foo, _styleModuleImportMap)");
        assert_eq!(
            merge_dynamic(Some(ClassNameValue::Literal("apple".into())), call.clone()).to_source(),
            r#""apple " + getClassName(foo, _styleModuleImportMap)"#
        );
        assert_eq!(
            merge_dynamic(
                Some(ClassNameValue::Expression(Expr::new("this.props.className"))),
                call
            )
            .to_source(),
            r#"(this.props.className ? this.props.className + " " : "") + getClassName(foo, _styleModuleImportMap)"#
        );
    }

    #[test]
    fn test_append_spread() {
        let spread = Expr::new("props.styleName");
        assert_eq!(
            append_spread(ClassNameValue::Literal("a b".into()), &spread).to_source(),
            r#""a b" + (" " + props.styleName)"#
        );
        assert_eq!(
            append_spread(ClassNameValue::Expression(Expr::new("x || y")), &spread).to_source(),
            r#"(x || y) + (" " + props.styleName)"#
        );
    }
}
