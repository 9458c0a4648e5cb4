use std::fmt;
use std::iter::FusedIterator;

use serde::Serialize;

use super::diag::Span;
use super::tables::{Delimiter, DelimiterTable, is_selection_whitespace};

/// Classification of a selection lexer token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    /// A run of characters that are neither delimiters nor whitespace.
    Identifier,
    /// Separates path segments (`/` by default).
    NestedFieldDelimiter,
    /// Opens a field group (`(` by default).
    FieldGroupStart,
    /// Closes a field group (`)` by default).
    FieldGroupEnd,
    /// Separates sibling paths (`,` by default).
    FieldsDelimiter,
    /// A run of spaces, tabs, carriage returns, or line feeds.
    Whitespace,
    /// No more input.
    EndOfInput,
}

impl From<Delimiter> for TokenKind {
    fn from(d: Delimiter) -> Self {
        match d {
            Delimiter::Fields => TokenKind::FieldsDelimiter,
            Delimiter::NestedField => TokenKind::NestedFieldDelimiter,
            Delimiter::GroupStart => TokenKind::FieldGroupStart,
            Delimiter::GroupEnd => TokenKind::FieldGroupEnd,
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TokenKind::Identifier => "identifier",
            TokenKind::NestedFieldDelimiter => "nested field delimiter",
            TokenKind::FieldGroupStart => "group start delimiter",
            TokenKind::FieldGroupEnd => "group end delimiter",
            TokenKind::FieldsDelimiter => "fields delimiter",
            TokenKind::Whitespace => "whitespace",
            TokenKind::EndOfInput => "end of input",
        };
        f.write_str(s)
    }
}

/// A token that borrows its text directly from the source input.
///
/// `position` counts characters: it is the offset one past the token's last
/// character, and the end-of-input token sits at `input.chars().count()`.
/// `byte_end` is the same boundary in bytes, for slicing and [`Span`]s.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    /// The classification of this token.
    pub kind: TokenKind,
    /// Borrowed slice of the source input; `None` for [`TokenKind::EndOfInput`].
    pub text: Option<&'a str>,
    /// Character offset one past the last character.
    pub position: usize,
    /// Byte offset one past the last character.
    pub byte_end: usize,
}

impl Token<'_> {
    /// Character offset of the first character.
    pub fn start(&self) -> usize {
        let chars = self.text.map_or(0, |t| t.chars().count());
        self.position.saturating_sub(chars)
    }

    /// Byte span covered by this token (zero-width at end of input).
    pub fn span(&self) -> Span {
        let len = self.text.map_or(0, str::len);
        Span::new(self.byte_end.saturating_sub(len), self.byte_end)
    }
}

/// Forward-only selection lexer.
///
/// Classification never fails: every character is a configured delimiter,
/// whitespace, or part of an identifier run. Once the input is exhausted
/// [`Lexer::next_token`] keeps returning the same end-of-input token.
#[derive(Debug, Clone)]
pub struct Lexer<'a> {
    input: &'a str,
    table: &'a DelimiterTable,
    /// Cursor in bytes.
    pos: usize,
    /// Cursor in characters.
    chars: usize,
}

impl<'a> Lexer<'a> {
    /// Create a lexer over `input` using `table` to recognize delimiters.
    pub fn new(input: &'a str, table: &'a DelimiterTable) -> Self {
        Self {
            input,
            table,
            pos: 0,
            chars: 0,
        }
    }

    /// Current cursor offset in characters.
    pub fn position(&self) -> usize {
        self.chars
    }

    /// Pull the next token.
    pub fn next_token(&mut self) -> Token<'a> {
        let start = self.pos;
        let Some(c) = self.input[start..].chars().next() else {
            return Token {
                kind: TokenKind::EndOfInput,
                text: None,
                position: self.chars,
                byte_end: start,
            };
        };

        let table = self.table;
        let kind = if let Some(delimiter) = table.kind_of(c) {
            self.pos += c.len_utf8();
            self.chars += 1;
            delimiter.into()
        } else if is_selection_whitespace(c) {
            self.take_while(is_selection_whitespace);
            TokenKind::Whitespace
        } else {
            self.take_while(|ch| !table.is_delimiter(ch) && !is_selection_whitespace(ch));
            TokenKind::Identifier
        };

        Token {
            kind,
            text: Some(&self.input[start..self.pos]),
            position: self.chars,
            byte_end: self.pos,
        }
    }

    /// Advance over the maximal run of characters satisfying `pred`.
    fn take_while(&mut self, pred: impl Fn(char) -> bool) {
        let rest = &self.input[self.pos..];
        for ch in rest.chars().take_while(|&ch| pred(ch)) {
            self.pos += ch.len_utf8();
            self.chars += 1;
        }
    }
}

/// Yields every token before end of input.
impl<'a> Iterator for Lexer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let tok = self.next_token();
        (tok.kind != TokenKind::EndOfInput).then_some(tok)
    }
}

impl FusedIterator for Lexer<'_> {}

/// Tokenize a whole selection, including the terminating end-of-input token.
///
/// Every token's `text` borrows from `input`; no token text is allocated.
pub fn tokenize<'a>(input: &'a str, table: &'a DelimiterTable) -> Vec<Token<'a>> {
    let mut lexer = Lexer::new(input, table);
    let mut toks = Vec::new();
    loop {
        let tok = lexer.next_token();
        toks.push(tok);
        if tok.kind == TokenKind::EndOfInput {
            return toks;
        }
    }
}
