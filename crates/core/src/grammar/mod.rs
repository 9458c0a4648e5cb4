/// Re-exports from the diagnostics crate.
pub mod diag;
/// JSON serialization helpers for selections.
pub mod dump;
/// Selection emitter: converts finished paths back into selection text.
pub mod emit;
/// Parse errors and their conversion to diagnostics.
pub mod error;
/// Selection lexer: tokenizes raw input into borrowed tokens.
pub mod lexer;
/// Selection parser: the token-driven state machine producing field paths.
pub mod parser;
/// Working state of a single parse run.
pub mod state;
/// Re-exports of the delimiter configuration types used by the lexer.
pub mod tables;
