use std::fs;
use std::path::Path;

use serial_test::serial;
use stylename::{
    AttributeValue, ClassNameValue, CssModuleCompiler, Expr, FileTransform, Options, PackageInfo,
    StyleNameError, SNAPSHOT_IDENTIFIER,
};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A package with two stylesheets on disk.
fn write_package(root: &Path) {
    fs::create_dir_all(root.join("src/components")).unwrap();
    fs::write(root.join("package.json"), r#"{ "name": "@acme/web" }"#).unwrap();
    fs::write(
        root.join("src/components/header.css"),
        ".header { composes: reset from \"../base.css\"; }\n.active { font-weight: bold }\n",
    )
    .unwrap();
    fs::write(root.join("src/base.css"), ".reset { margin: 0 }\n").unwrap();
}

#[test]
#[serial]
fn test_literal_and_dynamic_values_in_one_file() {
    init_logging();
    PackageInfo::clear_cache();
    let dir = tempfile::tempdir().unwrap();
    write_package(dir.path());

    let options = Options::from_yaml("generateScopedName: \"[package]__[name]__[local]\"\n").unwrap();
    let generator = options.scoped_name_generator().unwrap();
    let compiler = CssModuleCompiler::new();
    let mut file = FileTransform::new(&compiler, &generator, options.policy());
    file.register_import("styles", &dir.path().join("src/components/header.css"))
        .unwrap();

    let literal = file
        .rewrite(&AttributeValue::Literal("header active".into()), None)
        .unwrap();
    assert_eq!(
        literal,
        Some(ClassNameValue::Literal(
            "-acme-web__header__header -acme-web__base__reset -acme-web__header__active".into()
        ))
    );
    assert!(!file.uses_runtime());

    let first = file
        .rewrite(&AttributeValue::Expression(Expr::new("props.styleName")), None)
        .unwrap()
        .unwrap();
    let second = file
        .rewrite(
            &AttributeValue::Expression(Expr::new("isOpen ? 'active' : 'header'")),
            Some(ClassNameValue::Expression(Expr::new("props.className"))),
        )
        .unwrap()
        .unwrap();

    assert_eq!(
        first.to_source(),
        "getClassName(props.styleName, _styleModuleImportMap)"
    );
    assert_eq!(
        second.to_source(),
        "(props.className ? props.className + \" \" : \"\") + getClassName((isOpen ? 'active' : 'header'), _styleModuleImportMap)"
    );

    let prelude = file.finish().unwrap();
    let source = prelude.to_source();
    assert_eq!(source.matches(&format!("const {}", SNAPSHOT_IDENTIFIER)).count(), 1);
    assert!(source.contains("\"styles\""));
    assert!(source.contains("\"-acme-web__header__active\""));
}

#[test]
fn test_literal_only_file_emits_no_runtime() {
    let compiler = CssModuleCompiler::new().with_source("/app/foo.css", ".header {} .active {}");
    let generator = Options::new()
        .template("[name]__[local]")
        .scoped_name_generator()
        .unwrap();
    let mut file = FileTransform::new(&compiler, &generator, Options::new().policy());
    file.register_import("./foo.css", Path::new("/app/foo.css")).unwrap();

    for destination in [None, Some(ClassNameValue::Literal("apple banana".into()))] {
        file.rewrite(&AttributeValue::Literal("header active".into()), destination)
            .unwrap();
    }

    assert!(file.finish().is_none());
}

#[test]
fn test_unknown_alias_is_reported_with_token() {
    let compiler = CssModuleCompiler::new().with_source("/app/foo.css", ".a {}");
    let generator = Options::new()
        .template("[name]__[local]")
        .scoped_name_generator()
        .unwrap();
    let mut file = FileTransform::new(&compiler, &generator, Options::new().policy());
    file.register_import("foo", Path::new("/app/foo.css")).unwrap();

    let err = file
        .rewrite(&AttributeValue::Literal("a bar.a".into()), None)
        .unwrap_err();
    assert_eq!(
        err,
        StyleNameError::UnknownImportAlias {
            alias: "bar".to_string(),
            token: "bar.a".to_string()
        }
    );
}

#[test]
fn test_stylesheet_errors_surface_as_compilation_errors() {
    let dir = tempfile::tempdir().unwrap();
    let broken = dir.path().join("broken.css");
    fs::write(&broken, ".a {}\n}\n").unwrap();

    let generator = Options::new()
        .template("[local]")
        .scoped_name_generator()
        .unwrap();
    let compiler = CssModuleCompiler::new();
    let mut file = FileTransform::new(&compiler, &generator, Options::new().policy());

    let result = file.register_import("broken", &broken);
    assert!(matches!(result, Err(StyleNameError::Compilation(_))));
    assert!(file.registry().is_empty());
}
