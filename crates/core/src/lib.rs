//! sparse-fields core library.
//!
//! Parses partial-response field selections such as `foo,bar(baz,qux/quux)`
//! into flat [`FieldPath`]s and answers whether a response path is selected.
//! The main entry points are [`parse_str`] / [`Selection::parse`] for parsing
//! and [`Selection::matches`] for membership tests.

#![warn(missing_docs)]

/// Finished field paths and prefix matching.
pub mod field;
/// Selection grammar: lexer, parser, parse state, emitter, and related utilities.
pub mod grammar;
/// Selected path sets and their membership test.
pub mod selection;

// ── Convenience re-exports ──────────────────────────────────────────────────

// Parser
pub use grammar::parser::{Parser, parse_str, parse_with_table};
pub use grammar::state::ParseState;

// Lexer
pub use grammar::lexer::{Lexer, Token, TokenKind, tokenize};

// Results
pub use field::{FieldPath, FieldPathError, WILDCARD};
pub use selection::Selection;

// Errors
pub use grammar::error::{SelectionError, UnexpectedToken};

// Emitter
pub use grammar::emit::{EmitConfig, Layout, emit_selection};

// Diagnostics (re-exported from the diagnostics crate)
pub use grammar::diag::{Diagnostic, Severity, Span, codes};

// Delimiters (re-exported from the delimiters crate)
pub use grammar::tables::{
    Delimiter, DelimiterError, DelimiterOptions, DelimiterTable, load_delimiters_from_str,
};

// Serialization helpers
pub use grammar::dump::to_pretty_json;
