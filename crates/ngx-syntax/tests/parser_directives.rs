mod common;
use common::*;
use expect_test::expect;

#[test]
fn test_simple_and_block_directives() {
    let actual = snapshot_parse("user nginx;\nevents { worker_connections 512; }\n");
    expect![[r#"
        SourceFile@0..47
          Directive@0..11
            Name@0..4
              Word@0..4 "user"
            Arg@5..10
              Word@5..10 "nginx"
            Semicolon@10..11 ";"
          Directive@12..46
            Name@12..18
              Word@12..18 "events"
            Block@19..46
              LBrace@19..20 "{"
              Directive@21..44
                Name@21..39
                  Word@21..39 "worker_connections"
                Arg@40..43
                  Word@40..43 "512"
                Semicolon@43..44 ";"
              RBrace@45..46 "}"
    "#]]
    .assert_eq(&actual);
}

#[test]
fn test_quoted_arguments() {
    let actual = snapshot_parse(r#"return 200 "ok";"#);
    expect![[r#"
        SourceFile@0..16
          Directive@0..16
            Name@0..6
              Word@0..6 "return"
            Arg@7..10
              Word@7..10 "200"
            Arg@11..15
              String@11..15 "\"ok\""
            Semicolon@15..16 ";"
    "#]]
    .assert_eq(&actual);
}

#[test]
fn test_lua_block_is_opaque() {
    let source = "content_by_lua_block {\n    if x then ngx.say(\"{\") end\n    local t = { a = 1 }\n}\n";
    let parse = parse(source);
    assert!(parse.ok(), "errors: {:?}", parse.errors());

    let root = parse.syntax();
    let kinds: Vec<_> = root.descendants().map(|node| node.kind()).collect();
    assert!(kinds.contains(&SyntaxKind::LuaBlock));
    assert!(
        !kinds.contains(&SyntaxKind::Block),
        "lua bodies must not be parsed as directive blocks"
    );
    assert_eq!(
        kinds
            .iter()
            .filter(|kind| **kind == SyntaxKind::Directive)
            .count(),
        1
    );
}

#[test]
fn test_lua_body_is_a_single_token() {
    let actual = snapshot_parse("init_by_lua_block { n = #t }\n");
    expect![[r#"
        SourceFile@0..29
          Directive@0..28
            Name@0..17
              Word@0..17 "init_by_lua_block"
            LuaBlock@18..28
              LBrace@18..19 "{"
              LuaCode@19..27 " n = #t "
              RBrace@27..28 "}"
    "#]]
    .assert_eq(&actual);
}

#[test]
fn test_lua_comments_and_strings_do_not_leak() {
    for body in [
        "\n                -- don't do this\n            ",
        " local n = #t ",
        "\n                --[[ } ]] ngx.say(\"}\", '{')\n            ",
        " local s = [==[ ' } ]==] ",
    ] {
        let source = format!(
            "http {{\n    server {{\n        location / {{\n            content_by_lua_block {{{body}}}\n        }}\n    }}\n}}\n"
        );
        let parse = parse(&source);
        assert!(parse.ok(), "{body:?}: {:?}", parse.errors());
        let file = parse.source_file();
        assert_eq!(file.all_directives().count(), 4, "{body:?}");
    }
}

#[test]
fn test_unterminated_lua_body() {
    let parse = parse("content_by_lua_block {\n  ngx.say('x')\n");
    assert_eq!(parse.errors().len(), 1);
    assert!(parse.errors()[0].to_string().contains("expected '}'"));
}

#[test]
fn test_if_condition_with_regex() {
    let source = r#"if ($http_user_agent ~* "(bot|crawler)") { return 403; }"#;
    let parse = parse(source);
    assert!(parse.ok(), "errors: {:?}", parse.errors());
    let file = parse.source_file();
    let directive = file.directives().next().expect("if directive");
    let args: Vec<_> = directive.args().map(|arg| arg.text()).collect();
    let args: Vec<&str> = args.iter().map(|arg| arg.as_str()).collect();
    assert_eq!(args, vec!["($http_user_agent", "~*", "\"(bot|crawler)\"", ")"]);
    assert!(directive.block().is_some());
}

#[test]
fn test_comments_are_preserved() {
    let source = "# global\nworker_processes 2; # trailing\n";
    let parse = parse(source);
    assert!(parse.ok());
    assert_eq!(parse.syntax().text().to_string(), source);
    let comments = parse
        .syntax()
        .descendants_with_tokens()
        .filter(|element| element.kind() == SyntaxKind::Comment)
        .count();
    assert_eq!(comments, 2);
}
