//! Diagnostic ID constants.
//!
//! Use these instead of string literals to get compile-time typo detection
//! and IDE autocomplete. Every constant has an entry in [`crate::explain`].

/// A token appeared where the grammar does not allow it.
pub const PARSER_UNEXPECTED_TOKEN: &str = "SEL1001";

/// The selection ended while a path or group was still open.
pub const PARSER_UNEXPECTED_END: &str = "SEL1002";

/// The delimiter configuration is invalid.
pub const INVALID_DELIMITERS: &str = "SEL2001";

/// Every known code, in ascending order.
pub const ALL: &[&str] = &[
    PARSER_UNEXPECTED_TOKEN,
    PARSER_UNEXPECTED_END,
    INVALID_DELIMITERS,
];
