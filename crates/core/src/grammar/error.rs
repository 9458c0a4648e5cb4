use std::collections::BTreeMap;

use serde::Serialize;
use thiserror::Error;

use super::diag::{Diagnostic, Span, codes};
use super::lexer::{Token, TokenKind};
use super::tables::DelimiterError;

/// Snapshot of the token that violated the selection grammar.
///
/// A parse records at most one of these: the first offending token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[error("unexpected {kind}{} at position {position}", found_suffix(.text))]
pub struct UnexpectedToken {
    /// Literal text of the token; `None` at end of input.
    pub text: Option<String>,
    /// Kind of the offending token.
    pub kind: TokenKind,
    /// Character offset one past the token's last character.
    pub position: usize,
    /// Byte span of the token in the source; zero-width at end of input.
    pub span: Span,
}

fn found_suffix(text: &Option<String>) -> String {
    text.as_deref()
        .map(|t| format!(" {t:?}"))
        .unwrap_or_default()
}

impl UnexpectedToken {
    /// Convert into a renderable [`Diagnostic`] with structured context.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let code = if self.kind == TokenKind::EndOfInput {
            codes::PARSER_UNEXPECTED_END
        } else {
            codes::PARSER_UNEXPECTED_TOKEN
        };
        let mut ctx = BTreeMap::from([("kind".to_string(), self.kind.to_string())]);
        if let Some(text) = &self.text {
            ctx.insert("found".into(), text.clone());
        }
        Diagnostic::error(code, self.to_string(), Some(self.span)).with_context(ctx)
    }
}

impl From<&Token<'_>> for UnexpectedToken {
    fn from(tok: &Token<'_>) -> Self {
        Self {
            text: tok.text.map(str::to_owned),
            kind: tok.kind,
            position: tok.position,
            span: tok.span(),
        }
    }
}

/// Failure of a parse entry point that also builds a delimiter table.
#[derive(Debug, Error)]
pub enum SelectionError {
    /// The selection string is malformed.
    #[error(transparent)]
    Syntax(#[from] UnexpectedToken),
    /// The delimiter configuration is invalid.
    #[error(transparent)]
    Delimiters(#[from] DelimiterError),
}

impl SelectionError {
    /// Convert into a renderable [`Diagnostic`].
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            SelectionError::Syntax(err) => err.to_diagnostic(),
            SelectionError::Delimiters(err) => {
                Diagnostic::error(codes::INVALID_DELIMITERS, err.to_string(), None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_token_copies_every_field() {
        let tok = Token {
            kind: TokenKind::Identifier,
            text: Some("fé"),
            position: 2,
            byte_end: 3,
        };
        let err = UnexpectedToken::from(&tok);
        assert_eq!(err.text.as_deref(), Some("fé"));
        assert_eq!(err.kind, TokenKind::Identifier);
        assert_eq!(err.position, 2);
        assert_eq!(err.span, Span::new(0, 3));
    }

    #[test]
    fn display_mentions_text_and_position() {
        let err = UnexpectedToken {
            text: Some(")".into()),
            kind: TokenKind::FieldGroupEnd,
            position: 9,
            span: Span::new(8, 9),
        };
        assert_eq!(
            err.to_string(),
            "unexpected group end delimiter \")\" at position 9"
        );
    }

    #[test]
    fn display_at_end_of_input() {
        let err = UnexpectedToken {
            text: None,
            kind: TokenKind::EndOfInput,
            position: 4,
            span: Span::empty(4),
        };
        assert_eq!(err.to_string(), "unexpected end of input at position 4");
    }

    #[test]
    fn diagnostic_code_depends_on_kind() {
        let end = UnexpectedToken {
            text: None,
            kind: TokenKind::EndOfInput,
            position: 4,
            span: Span::empty(4),
        };
        assert_eq!(end.to_diagnostic().id, codes::PARSER_UNEXPECTED_END);

        let close = UnexpectedToken {
            text: Some(")".into()),
            kind: TokenKind::FieldGroupEnd,
            position: 9,
            span: Span::new(8, 9),
        };
        let d = close.to_diagnostic();
        assert_eq!(d.id, codes::PARSER_UNEXPECTED_TOKEN);
        assert_eq!(d.span, Some(Span::new(8, 9)));
        let ctx = d.context.as_ref().unwrap();
        assert_eq!(ctx.get("found").map(String::as_str), Some(")"));
        assert_eq!(
            ctx.get("kind").map(String::as_str),
            Some("group end delimiter")
        );
    }

    #[test]
    fn diagnostic_span_stays_in_bytes() {
        let err = UnexpectedToken {
            text: Some(",".into()),
            kind: TokenKind::FieldsDelimiter,
            position: 2,
            span: Span::new(2, 3),
        };
        assert_eq!(err.to_string(), "unexpected fields delimiter \",\" at position 2");
        assert_eq!(err.to_diagnostic().span, Some(Span::new(2, 3)));
    }
}
