//! Catalog sources that must be rejected.

use expect_test::expect;
use ngx_catalog::{CatalogBuilder, CatalogError, ContextRef};

fn build(sources: &[(&str, &str)]) -> Result<ngx_catalog::Catalog, CatalogError> {
    let mut builder = CatalogBuilder::new();
    for (origin, text) in sources {
        builder.add_source(*origin, *text);
    }
    builder.build()
}

fn build_error(sources: &[(&str, &str)]) -> CatalogError {
    match build(sources) {
        Ok(_) => panic!("catalog unexpectedly built"),
        Err(err) => err,
    }
}

const CORE: &str = r#"
[module]
name = "core"

[[directive]]
name = "http"
context = ["main"]

[[directive]]
name = "server"
context = ["http"]
"#;

#[test]
fn unknown_context_is_fatal() {
    let err = build_error(&[(
        "a.toml",
        r#"
[module]
name = "a"

[[directive]]
name = "listen"
context = ["serverr"]
"#,
    )]);
    expect![[r#"directive 'listen' in module 'a' references unknown context 'serverr'"#]]
        .assert_eq(&err.to_string());
}

#[test]
fn ambiguous_bare_context_is_fatal() {
    let stream = r#"
[module]
name = "stream"

[[directive]]
name = "stream"
context = ["main"]

[[directive]]
name = "server"
context = ["stream"]
"#;
    let orphan = r#"
[module]
name = "orphan"

[[directive]]
name = "listen"
context = ["server"]
"#;
    let err = build_error(&[("core.toml", CORE), ("stream.toml", stream), ("orphan.toml", orphan)]);
    expect![[r#"directive 'listen' in module 'orphan' references ambiguous context 'server' (declared in core, stream)"#]]
        .assert_eq(&err.to_string());
}

#[test]
fn qualified_context_removes_the_ambiguity() {
    let stream = r#"
[module]
name = "stream"

[[directive]]
name = "stream"
context = ["main"]

[[directive]]
name = "server"
context = ["stream"]
"#;
    let qualified = r#"
[module]
name = "qualified"

[[directive]]
name = "listen"
context = ["stream/server"]
"#;
    let catalog = build(&[("core.toml", CORE), ("stream.toml", stream), ("q.toml", qualified)])
        .expect("catalog builds");
    let listen = catalog.resolve("listen", &["stream", "server"]);
    assert_eq!(listen.len(), 1);
    let ContextRef::Directive(parent) = listen[0].contexts()[0] else {
        panic!("directive context expected");
    };
    assert_eq!(catalog.module_of(catalog.directive(parent)).name(), "stream");
}

#[test]
fn empty_context_list_is_fatal() {
    let err = build_error(&[(
        "a.toml",
        r#"
[module]
name = "a"

[[directive]]
name = "orphan"
"#,
    )]);
    assert!(matches!(err, CatalogError::EmptyContexts { .. }));
}

#[test]
fn self_only_context_is_fatal() {
    let err = build_error(&[(
        "a.toml",
        r#"
[module]
name = "a"

[[directive]]
name = "loop"
context = ["self"]
"#,
    )]);
    assert!(matches!(err, CatalogError::SelfOnly { .. }));
}

#[test]
fn duplicate_module_is_fatal() {
    let err = build_error(&[("one.toml", CORE), ("two.toml", CORE)]);
    expect![[r#"two.toml: module 'core' is already defined"#]].assert_eq(&err.to_string());
}

#[test]
fn unknown_import_is_fatal() {
    let err = build_error(&[(
        "a.toml",
        r#"
[module]
name = "a"
imports = ["missing"]

[[directive]]
name = "x"
context = ["main"]
"#,
    )]);
    assert!(matches!(err, CatalogError::UnknownModule { .. }));
}

#[test]
fn inverted_range_is_fatal() {
    let err = build_error(&[(
        "a.toml",
        r#"
[module]
name = "a"

[[directive]]
name = "level"
context = ["main"]

[[directive.parameter]]
type = "integer"
min = 9
max = 1
"#,
    )]);
    expect![[r#"parameter 0 of directive 'level' in module 'a': minimum is greater than maximum"#]]
        .assert_eq(&err.to_string());
}

#[test]
fn enum_without_values_is_fatal() {
    let err = build_error(&[(
        "a.toml",
        r#"
[module]
name = "a"

[[directive]]
name = "mode"
context = ["main"]

[[directive.parameter]]
type = "enum"
"#,
    )]);
    assert!(matches!(err, CatalogError::InvalidParameter { index: 0, .. }));
}

#[test]
fn toggle_with_parameters_is_fatal() {
    let err = build_error(&[(
        "a.toml",
        r#"
[module]
name = "a"

[[directive]]
name = "flag"
context = ["main"]
toggle = true

[[directive.parameter]]
name = "extra"
"#,
    )]);
    assert!(matches!(err, CatalogError::InvalidParameter { .. }));
}

#[test]
fn unknown_fields_are_rejected() {
    let err = build_error(&[(
        "typo.toml",
        r#"
[module]
name = "a"

[[directive]]
name = "x"
contexts = ["main"]
"#,
    )]);
    assert!(matches!(err, CatalogError::Parse { .. }));
    assert!(err.to_string().starts_with("typo.toml: "));
}
