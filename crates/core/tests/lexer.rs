//! Tests for the selection lexer: token kinds, token text, positions, and
//! end-of-input behavior.

mod common;

use common::EXTENDED;
use sparse_fields_core::{DelimiterTable, Lexer, Token, TokenKind, tokenize};

fn first(input: &str) -> Token<'_> {
    Lexer::new(input, &EXTENDED).next_token()
}

fn kinds(input: &str) -> Vec<TokenKind> {
    tokenize(input, DelimiterTable::standard())
        .iter()
        .map(|t| t.kind)
        .collect()
}

#[test]
fn delimiters_are_single_character_tokens() {
    let cases = [
        ("/", TokenKind::NestedFieldDelimiter),
        (".", TokenKind::NestedFieldDelimiter),
        ("(", TokenKind::FieldGroupStart),
        ("[", TokenKind::FieldGroupStart),
        (")", TokenKind::FieldGroupEnd),
        ("]", TokenKind::FieldGroupEnd),
        (",", TokenKind::FieldsDelimiter),
    ];
    for (input, kind) in cases {
        let tok = first(input);
        assert_eq!(tok.kind, kind, "input {input:?}");
        assert_eq!(tok.text, Some(input));
        assert_eq!(tok.position, 1);
    }
}

#[test]
fn consecutive_delimiters_are_not_merged() {
    let toks = tokenize("))", DelimiterTable::standard());
    assert_eq!(toks.len(), 3);
    assert_eq!(toks[0].position, 1);
    assert_eq!(toks[1].position, 2);
}

#[test]
fn whitespace_characters() {
    for ws in [" ", "\t", "\r", "\n"] {
        let tok = first(ws);
        assert_eq!(tok.kind, TokenKind::Whitespace);
        assert_eq!(tok.text, Some(ws));
    }
}

#[test]
fn whitespace_run_is_one_token() {
    let tok = first(" \t\r\n x");
    assert_eq!(tok.kind, TokenKind::Whitespace);
    assert_eq!(tok.text, Some(" \t\r\n "));
    assert_eq!(tok.position, 5);
}

#[test]
fn identifier_run() {
    let tok = first("foo");
    assert_eq!(tok.kind, TokenKind::Identifier);
    assert_eq!(tok.text, Some("foo"));
}

#[test]
fn identifier_stops_at_delimiter() {
    let tok = first("foo/");
    assert_eq!(tok.kind, TokenKind::Identifier);
    assert_eq!(tok.text, Some("foo"));
    assert_eq!(tok.position, 3);
}

#[test]
fn identifier_stops_at_whitespace() {
    let tok = first("foo ");
    assert_eq!(tok.text, Some("foo"));
}

#[test]
fn identifier_after_delimiter_and_whitespace() {
    for prefix in ["/", ".", " "] {
        let input = format!("{prefix}foo");
        let mut lexer = Lexer::new(&input, &EXTENDED);
        let _ = lexer.next_token();
        let tok = lexer.next_token();
        assert_eq!(tok.kind, TokenKind::Identifier);
        assert_eq!(tok.text, Some("foo"));
        assert_eq!(tok.position, 4);
    }
}

#[test]
fn end_of_input_is_idempotent() {
    let mut lexer = Lexer::new("foo", DelimiterTable::standard());
    assert_eq!(lexer.next_token().kind, TokenKind::Identifier);
    for _ in 0..3 {
        let tok = lexer.next_token();
        assert_eq!(tok.kind, TokenKind::EndOfInput);
        assert_eq!(tok.text, None);
        assert_eq!(tok.position, 3);
    }
}

#[test]
fn empty_input_is_end_of_input_at_zero() {
    let toks = tokenize("", DelimiterTable::standard());
    assert_eq!(toks.len(), 1);
    assert_eq!(toks[0].kind, TokenKind::EndOfInput);
    assert_eq!(toks[0].position, 0);
}

#[test]
fn full_stream() {
    use TokenKind::*;
    assert_eq!(
        kinds("foo, bar(baz/qux)"),
        [
            Identifier,
            FieldsDelimiter,
            Whitespace,
            Identifier,
            FieldGroupStart,
            Identifier,
            NestedFieldDelimiter,
            Identifier,
            FieldGroupEnd,
            EndOfInput,
        ]
    );
}

#[test]
fn iterator_stops_before_end_of_input() {
    let lexer = Lexer::new("a/b", DelimiterTable::standard());
    let texts: Vec<&str> = lexer.filter_map(|t| t.text).collect();
    assert_eq!(texts, ["a", "/", "b"]);
}

#[test]
fn spans_cover_token_text() {
    let input = "héllo/wörld";
    for tok in tokenize(input, DelimiterTable::standard()) {
        let span = tok.span();
        assert_eq!(span.end, tok.byte_end);
        assert_eq!(&input[span.start..span.end], tok.text.unwrap_or(""));
        assert_eq!(input[..span.end].chars().count(), tok.position);
    }
}

#[test]
fn unlisted_punctuation_is_identifier_text() {
    let toks = tokenize("a.b[c]", DelimiterTable::standard());
    assert_eq!(toks.len(), 2);
    assert_eq!(toks[0].text, Some("a.b[c]"));
}
