use super::{
    error::UnexpectedToken,
    lexer::{Lexer, Token, TokenKind},
    state::ParseState,
    tables::DelimiterTable,
};
use crate::selection::Selection;

// ─── Public API ─────────────────────────────────────────────────────────────

/// Parse a selection string with the default delimiters (`,` `/` `(` `)`).
///
/// ```
/// use sparse_fields_core::parse_str;
///
/// let sel = parse_str("foo(bar,baz),qux").unwrap();
/// let paths: Vec<String> = sel.iter().map(|p| p.to_string()).collect();
/// assert_eq!(paths, ["foo/bar", "foo/baz", "qux"]);
/// ```
pub fn parse_str(input: &str) -> Result<Selection, UnexpectedToken> {
    parse_with_table(input, DelimiterTable::standard())
}

/// Parse a selection string with a caller-supplied delimiter table.
pub fn parse_with_table(input: &str, table: &DelimiterTable) -> Result<Selection, UnexpectedToken> {
    let mut state = ParseState::new();
    Parser::new(Lexer::new(input, table), &mut state).parse();
    state.into_result().map(Selection::new)
}

// ─── State machine ──────────────────────────────────────────────────────────

/// What the parser expects to handle next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    /// A path segment. `accept_end` is only set for the very first token, so
    /// empty input parses to nothing.
    Identifier { accept_end: bool },
    /// Whatever follows a segment: a delimiter or end of input.
    AfterIdentifier,
    /// A run of consecutive group-end delimiters.
    CloseGroups,
    Done,
}

/// Token-driven parser filling a [`ParseState`].
///
/// Whitespace tokens are skipped transparently. The parser stops at the
/// first grammar violation, recording it in the state; it never recurses, so
/// deeply nested groups do not grow the call stack.
pub struct Parser<'a, 's> {
    lexer: Lexer<'a>,
    state: &'s mut ParseState,
    current: Token<'a>,
    previous: Option<Token<'a>>,
    /// Unmatched group-start delimiters. Goes negative on a stray close,
    /// which is reported immediately.
    depth: isize,
}

impl<'a, 's> Parser<'a, 's> {
    /// Create a parser over `lexer` that writes into `state`.
    pub fn new(mut lexer: Lexer<'a>, state: &'s mut ParseState) -> Self {
        let current = next_significant(&mut lexer);
        Self {
            lexer,
            state,
            current,
            previous: None,
            depth: 0,
        }
    }

    /// Run to completion. Results and any error are left in the state.
    pub fn parse(mut self) {
        let mut step = Step::Identifier { accept_end: true };
        while step != Step::Done {
            step = match step {
                Step::Identifier { accept_end } => self.identifier(accept_end),
                Step::AfterIdentifier => self.after_identifier(),
                Step::CloseGroups => self.close_groups(),
                Step::Done => Step::Done,
            };
        }
    }

    // ── Token navigation ────────────────────────────────────────────────

    fn advance(&mut self) {
        let next = next_significant(&mut self.lexer);
        self.previous = Some(std::mem::replace(&mut self.current, next));
    }

    fn previous_kind(&self) -> Option<TokenKind> {
        self.previous.map(|t| t.kind)
    }

    fn fail(&mut self) -> Step {
        self.state.fail(&self.current);
        Step::Done
    }

    // ── Steps ───────────────────────────────────────────────────────────

    fn identifier(&mut self, accept_end: bool) -> Step {
        match self.current.kind {
            TokenKind::EndOfInput => {
                if !accept_end || self.depth > 0 {
                    return self.fail();
                }
                Step::Done
            }
            TokenKind::Identifier => {
                let segment = self.current.text.unwrap_or_default().to_owned();
                // A new sibling inside a group starts from a copy of the
                // group's prefix; a slash continues the current chain.
                let branch = self.depth > 0
                    && self.previous_kind() != Some(TokenKind::NestedFieldDelimiter);
                self.state.extend_prefix(segment, branch);
                self.advance();
                Step::AfterIdentifier
            }
            _ => self.fail(),
        }
    }

    fn after_identifier(&mut self) -> Step {
        match self.current.kind {
            TokenKind::NestedFieldDelimiter => {
                self.advance();
                Step::Identifier { accept_end: false }
            }
            TokenKind::FieldGroupStart => {
                self.depth += 1;
                self.advance();
                Step::Identifier { accept_end: false }
            }
            TokenKind::FieldGroupEnd => Step::CloseGroups,
            TokenKind::FieldsDelimiter => {
                self.state.finish_top();
                self.advance();
                Step::Identifier { accept_end: false }
            }
            TokenKind::EndOfInput => {
                if self.depth > 0 {
                    return self.fail();
                }
                self.state.finish_top();
                Step::Done
            }
            TokenKind::Identifier | TokenKind::Whitespace => self.fail(),
        }
    }

    fn close_groups(&mut self) -> Step {
        loop {
            // Only the innermost group closed right after a segment is a
            // finished path; outer frames in the same run are shared prefixes.
            if self.previous_kind() == Some(TokenKind::Identifier) {
                self.state.finish_top();
            } else {
                self.state.discard_top();
            }

            self.depth -= 1;
            if self.depth < 0 {
                return self.fail();
            }

            self.advance();
            if self.current.kind != TokenKind::FieldGroupEnd {
                break;
            }
        }

        match self.current.kind {
            TokenKind::EndOfInput => Step::Done,
            TokenKind::FieldsDelimiter => {
                // Drop the frame of the path that owned the closed group.
                self.state.discard_top();
                self.advance();
                Step::Identifier { accept_end: false }
            }
            _ => self.fail(),
        }
    }
}

fn next_significant<'a>(lexer: &mut Lexer<'a>) -> Token<'a> {
    loop {
        let tok = lexer.next_token();
        log::trace!("token {:?} {:?} @{}", tok.kind, tok.text, tok.position);
        if tok.kind != TokenKind::Whitespace {
            return tok;
        }
    }
}
