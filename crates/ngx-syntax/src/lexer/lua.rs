//! Brace matching inside `*_by_lua_block` bodies.
//!
//! Lua code is not tokenized by nginx rules: `#` is the length operator and
//! `'` may appear in comments. This scanner only needs to find the brace that
//! closes the body, so it recognizes the Lua constructs that can hide braces
//! (comments, long brackets, quoted strings) and lumps everything else
//! together.

use logos::Logos;

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
enum LuaToken {
    #[token("{")]
    LBrace,

    #[token("}")]
    RBrace,

    /// `-- ...` to end of line, or `--[==[ ... ]==]`.
    #[token("--", comment)]
    Comment,

    /// `[==[ ... ]==]`, or a plain `[`.
    #[token("[", long_bracket)]
    Bracket,

    #[token("\"", double_quoted)]
    #[token("'", single_quoted)]
    String,

    #[token("-")]
    #[regex(r#"[^{}"'\-\[]+"#)]
    Code,
}

fn comment(lex: &mut logos::Lexer<'_, LuaToken>) {
    let rest = lex.remainder();
    if let Some(len) = rest.strip_prefix('[').and_then(long_bracket_len) {
        lex.bump(1 + len);
    } else {
        lex.bump(rest.find(['\r', '\n']).unwrap_or(rest.len()));
    }
}

fn long_bracket(lex: &mut logos::Lexer<'_, LuaToken>) {
    if let Some(len) = long_bracket_len(lex.remainder()) {
        lex.bump(len);
    }
}

/// Length of the rest of a long bracket whose leading `[` is already
/// consumed: `=*[`, the body and the matching `]=*]`. Runs to the end of
/// `rest` when the bracket is never closed. `None` if `rest` does not
/// continue a long bracket opener.
fn long_bracket_len(rest: &str) -> Option<usize> {
    let level = rest.bytes().take_while(|&b| b == b'=').count();
    if rest.as_bytes().get(level) != Some(&b'[') {
        return None;
    }
    let body_start = level + 1;
    let close = format!("]{}]", "=".repeat(level));
    Some(
        rest[body_start..]
            .find(&close)
            .map_or(rest.len(), |at| body_start + at + close.len()),
    )
}

fn double_quoted(lex: &mut logos::Lexer<'_, LuaToken>) {
    quoted(lex, '"');
}

fn single_quoted(lex: &mut logos::Lexer<'_, LuaToken>) {
    quoted(lex, '\'');
}

/// Consumes a quoted string up to the closing `quote`. An unterminated
/// string stops at the end of the line.
fn quoted(lex: &mut logos::Lexer<'_, LuaToken>, quote: char) {
    let mut chars = lex.remainder().char_indices();
    let mut len = lex.remainder().len();
    while let Some((at, ch)) = chars.next() {
        match ch {
            '\\' => {
                chars.next();
            }
            '\n' | '\r' => {
                len = at;
                break;
            }
            ch if ch == quote => {
                len = at + ch.len_utf8();
                break;
            }
            _ => {}
        }
    }
    lex.bump(len);
}

/// Byte length of the Lua body at the start of `code`, which directly
/// follows the body's opening `{`. The body ends before the `}` that
/// balances it, or at the end of `code`.
pub(super) fn body_len(code: &str) -> usize {
    let mut lexer = LuaToken::lexer(code);
    let mut depth = 1usize;
    while let Some(token) = lexer.next() {
        match token {
            Ok(LuaToken::LBrace) => depth += 1,
            Ok(LuaToken::RBrace) => {
                depth -= 1;
                if depth == 0 {
                    return lexer.span().start;
                }
            }
            _ => {}
        }
    }
    code.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(code: &str) -> &str {
        &code[..body_len(code)]
    }

    #[test]
    fn nested_tables_balance() {
        assert_eq!(body(" local t = { a = { 1 } } } rest"), " local t = { a = { 1 } } ");
    }

    #[test]
    fn apostrophe_in_line_comment() {
        assert_eq!(body("\n -- don't do this\n }\n"), "\n -- don't do this\n ");
    }

    #[test]
    fn length_operator_before_brace() {
        assert_eq!(body(" n = #t }"), " n = #t ");
    }

    #[test]
    fn braces_in_strings_and_comments() {
        let code = " ngx.say(\"}\", '{') -- }\n --[[ } ]] s = [==[ ]] } ]==] }";
        assert_eq!(body(code), &code[..code.len() - 1]);
    }

    #[test]
    fn unterminated_string_stops_at_line_end() {
        assert_eq!(body(" x = 'oops\n}"), " x = 'oops\n");
    }

    #[test]
    fn unterminated_body_runs_to_end() {
        assert_eq!(body(" if x then"), " if x then");
    }

    #[test]
    fn subtraction_and_indexing() {
        assert_eq!(body(" a = b - c[1] }"), " a = b - c[1] ");
    }
}
