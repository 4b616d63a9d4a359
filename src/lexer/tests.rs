//! Unit tests for the lexer module.

use super::{lexer::tokenize, tokens::TokenKind};
use crate::errors::errors::ErrorImpl;

fn kinds(source: &str) -> Vec<TokenKind> {
    tokenize(source)
        .unwrap()
        .into_iter()
        .map(|token| token.kind)
        .collect()
}

#[test]
fn test_tokenize_keywords() {
    let tokens = tokenize("def class if elif else while for in return pass continue break and or not is True False None").unwrap();

    assert_eq!(tokens[0].kind, TokenKind::Def);
    assert_eq!(tokens[1].kind, TokenKind::Class);
    assert_eq!(tokens[2].kind, TokenKind::If);
    assert_eq!(tokens[3].kind, TokenKind::Elif);
    assert_eq!(tokens[4].kind, TokenKind::Else);
    assert_eq!(tokens[5].kind, TokenKind::While);
    assert_eq!(tokens[6].kind, TokenKind::For);
    assert_eq!(tokens[7].kind, TokenKind::In);
    assert_eq!(tokens[8].kind, TokenKind::Return);
    assert_eq!(tokens[9].kind, TokenKind::Pass);
    assert_eq!(tokens[10].kind, TokenKind::Continue);
    assert_eq!(tokens[11].kind, TokenKind::Break);
    assert_eq!(tokens[12].kind, TokenKind::And);
    assert_eq!(tokens[13].kind, TokenKind::Or);
    assert_eq!(tokens[14].kind, TokenKind::Not);
    assert_eq!(tokens[15].kind, TokenKind::Is);
    assert_eq!(tokens[16].kind, TokenKind::True);
    assert_eq!(tokens[17].kind, TokenKind::False);
    assert_eq!(tokens[18].kind, TokenKind::None);
    assert_eq!(tokens[19].kind, TokenKind::Newline);
    assert_eq!(tokens[20].kind, TokenKind::EOF);
    assert!(tokens[0].kind.is_reserved());
}

#[test]
fn test_tokenize_identifiers() {
    let tokens = tokenize("foo baz_123 _underscore CamelCase").unwrap();

    assert_eq!(tokens[0].kind, TokenKind::Identifier);
    assert_eq!(tokens[0].value, "foo");
    assert_eq!(tokens[1].value, "baz_123");
    assert_eq!(tokens[2].value, "_underscore");
    assert_eq!(tokens[3].value, "CamelCase");
    assert!(!tokens[3].kind.is_reserved());
}

#[test]
fn test_tokenize_numbers_and_spans() {
    let tokens = tokenize("x = 42").unwrap();

    assert_eq!(tokens[2].kind, TokenKind::Number);
    assert_eq!(tokens[2].value, "42");
    assert_eq!(tokens[2].span.from, 4);
    assert_eq!(tokens[2].span.to, 6);
}

#[test]
fn test_tokenize_operators() {
    assert_eq!(
        kinds("+ - * // % == != <= >= < > = -> . : ,"),
        vec![
            TokenKind::Plus,
            TokenKind::Dash,
            TokenKind::Star,
            TokenKind::DoubleSlash,
            TokenKind::Percent,
            TokenKind::Equals,
            TokenKind::NotEquals,
            TokenKind::LessEquals,
            TokenKind::GreaterEquals,
            TokenKind::Less,
            TokenKind::Greater,
            TokenKind::Assignment,
            TokenKind::Arrow,
            TokenKind::Dot,
            TokenKind::Colon,
            TokenKind::Comma,
            TokenKind::Newline,
            TokenKind::EOF,
        ]
    );
}

#[test]
fn test_tokenize_string() {
    let tokens = tokenize("T = TypeVar('T')").unwrap();

    assert_eq!(tokens[4].kind, TokenKind::String);
    assert_eq!(tokens[4].value, "T");
    assert_eq!(tokens[4].span.to - tokens[4].span.from, 3);
}

#[test]
fn test_tokenize_blocks() {
    let source = "def f():\n    pass\nx = 1\n";

    assert_eq!(
        kinds(source),
        vec![
            TokenKind::Def,
            TokenKind::Identifier,
            TokenKind::OpenParen,
            TokenKind::CloseParen,
            TokenKind::Colon,
            TokenKind::Newline,
            TokenKind::Indent,
            TokenKind::Pass,
            TokenKind::Newline,
            TokenKind::Dedent,
            TokenKind::Identifier,
            TokenKind::Assignment,
            TokenKind::Number,
            TokenKind::Newline,
            TokenKind::EOF,
        ]
    );
}

#[test]
fn test_tokenize_pending_dedents_at_eof() {
    let source = "while True:\n  if x:\n    pass";

    let tokens = kinds(source);
    let tail = &tokens[tokens.len() - 4..];
    assert_eq!(
        tail,
        &[TokenKind::Newline, TokenKind::Dedent, TokenKind::Dedent, TokenKind::EOF]
    );
}

#[test]
fn test_tokenize_ignores_blank_and_comment_lines() {
    let source = "x = 1\n\n   # comment\n\ny = 2 # trailing\n";

    assert_eq!(
        kinds(source),
        vec![
            TokenKind::Identifier,
            TokenKind::Assignment,
            TokenKind::Number,
            TokenKind::Newline,
            TokenKind::Identifier,
            TokenKind::Assignment,
            TokenKind::Number,
            TokenKind::Newline,
            TokenKind::EOF,
        ]
    );
}

#[test]
fn test_tokenize_newlines_inside_brackets() {
    let source = "x = [1,\n     2]\n";

    assert_eq!(
        kinds(source),
        vec![
            TokenKind::Identifier,
            TokenKind::Assignment,
            TokenKind::OpenBracket,
            TokenKind::Number,
            TokenKind::Comma,
            TokenKind::Number,
            TokenKind::CloseBracket,
            TokenKind::Newline,
            TokenKind::EOF,
        ]
    );
}

#[test]
fn test_tokenize_inconsistent_indentation() {
    let source = "if x:\n    y = 1\n  z = 2\n";
    let error = tokenize(source).unwrap_err();

    assert_eq!(error.get_internal_error(), &ErrorImpl::InconsistentIndentation);
    assert_eq!(error.get_location().line, 3);
}

#[test]
fn test_tokenize_unrecognised_token() {
    let error = tokenize("x = 1 $ 2").unwrap_err();

    assert_eq!(
        error.get_internal_error(),
        &ErrorImpl::UnrecognisedToken { token: String::from("$") }
    );
    assert_eq!(error.get_location().column, 7);
}
