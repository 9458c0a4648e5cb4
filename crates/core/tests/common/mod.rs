//! Shared test helpers for `sparse_fields_core` integration tests.

#![allow(unreachable_pub)]

use std::sync::LazyLock;

use sparse_fields_core::{
    DelimiterOptions, DelimiterTable, Selection, UnexpectedToken, parse_str, parse_with_table,
};

/// Table with two characters per structural kind: `/` `.` nest, `(` `[` open,
/// `)` `]` close. Fields stay `,`.
pub static EXTENDED: LazyLock<DelimiterTable> = LazyLock::new(|| {
    DelimiterOptions {
        fields: vec![','],
        nested: vec!['/', '.'],
        group_start: vec!['(', '['],
        group_end: vec![')', ']'],
    }
    .table()
    .unwrap_or_else(|e| panic!("extended delimiter table rejected: {e}"))
});

// ─── Parse helpers ───────────────────────────────────────────────────────────

/// Render every path of `selection` as `a/b/c`.
#[allow(dead_code)]
pub fn path_strings(selection: &Selection) -> Vec<String> {
    selection.iter().map(ToString::to_string).collect()
}

/// Parse with the default delimiters and render the paths, panicking on error.
#[allow(dead_code)]
pub fn parsed(input: &str) -> Vec<String> {
    let sel = parse_str(input).unwrap_or_else(|e| panic!("failed to parse {input:?}: {e}"));
    path_strings(&sel)
}

/// Parse with the extended table and render the paths, panicking on error.
#[allow(dead_code)]
pub fn parsed_extended(input: &str) -> Vec<String> {
    let sel = parse_with_table(input, &EXTENDED)
        .unwrap_or_else(|e| panic!("failed to parse {input:?}: {e}"));
    path_strings(&sel)
}

/// Parse with the default delimiters, expecting failure.
#[allow(dead_code)]
pub fn parse_err(input: &str) -> UnexpectedToken {
    match parse_str(input) {
        Ok(sel) => panic!("expected {input:?} to fail, got {:?}", path_strings(&sel)),
        Err(e) => e,
    }
}

/// Parse with the extended table, expecting failure.
#[allow(dead_code)]
pub fn parse_err_extended(input: &str) -> UnexpectedToken {
    match parse_with_table(input, &EXTENDED) {
        Ok(sel) => panic!("expected {input:?} to fail, got {:?}", path_strings(&sel)),
        Err(e) => e,
    }
}
