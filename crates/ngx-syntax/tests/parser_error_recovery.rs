mod common;
use common::*;
use expect_test::expect;

#[test]
fn test_missing_semicolon_before_brace() {
    let actual = snapshot_parse("server { listen 80 }");
    expect![[r#"
        SourceFile@0..20
          Directive@0..20
            Name@0..6
              Word@0..6 "server"
            Block@7..20
              LBrace@7..8 "{"
              Directive@9..18
                Name@9..15
                  Word@9..15 "listen"
                Arg@16..18
                  Word@16..18 "80"
              RBrace@19..20 "}"
        ---
        Errors:
          - expected ';' or '{' at 18..18
    "#]]
    .assert_eq(&actual);
}

#[test]
fn test_stray_closing_brace() {
    let actual = snapshot_parse("}\ngzip on;");
    expect![[r#"
        SourceFile@0..10
          RBrace@0..1 "}"
          Directive@2..10
            Name@2..6
              Word@2..6 "gzip"
            Arg@7..9
              Word@7..9 "on"
            Semicolon@9..10 ";"
        ---
        Errors:
          - unexpected '}' at 0..1
    "#]]
    .assert_eq(&actual);
}

#[test]
fn test_unclosed_blocks_keep_following_directives() {
    let parse = parse("http {\n    server {\n        listen 80;\n");
    assert!(!parse.ok());
    let errors: Vec<_> = parse.errors().iter().map(|e| e.message.as_str()).collect();
    assert_eq!(errors, vec!["expected '}'", "expected '}'"]);

    let file = parse.source_file();
    let listen = file
        .all_directives()
        .find(|d| d.name().as_deref() == Some("listen"))
        .expect("listen survives recovery");
    assert_eq!(listen.context_path(), vec!["http", "server"]);
}

#[test]
fn test_stray_semicolon() {
    let parse = parse(";\nuser www;");
    assert_eq!(parse.errors().len(), 1);
    assert_eq!(parse.errors()[0].message, "unexpected ';'");
    assert_eq!(parse.source_file().directives().count(), 1);
}

#[test]
fn test_block_without_name() {
    let parse = parse("{ listen 80; }");
    assert_eq!(parse.errors()[0].message, "expected directive name");
    let file = parse.source_file();
    let outer = file.directives().next().expect("directive node");
    assert!(outer.name().is_none());
    assert!(outer.block().is_some());
}

#[test]
fn test_unterminated_string() {
    let parse = parse("root \"/var/www;\n");
    assert!(!parse.ok());
    assert_eq!(parse.syntax().text().to_string(), "root \"/var/www;\n");
}
