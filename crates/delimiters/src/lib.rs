//! Delimiter configuration for sparse-fields selection strings.
//!
//! A selection such as `foo,bar(baz/qux)` is structured by four kinds of
//! single-character delimiters. [`DelimiterOptions`] names the characters for
//! each kind (loadable from JSON) and [`DelimiterOptions::table`] turns them
//! into a validated, immutable [`DelimiterTable`] that the lexer consults.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when building or loading a delimiter configuration.
#[derive(Debug, Error)]
pub enum DelimiterError {
    /// JSON deserialization failed.
    #[error("invalid delimiter JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// The same character was assigned to more than one delimiter slot.
    #[error("delimiter {ch:?} is configured as both {first} and {second}")]
    Duplicate {
        /// The conflicting character.
        ch: char,
        /// The kind the character was first assigned to.
        first: Delimiter,
        /// The kind the character was assigned to again.
        second: Delimiter,
    },

    /// A delimiter set contained no characters.
    #[error("no characters configured for {kind}")]
    Empty {
        /// The kind whose set is empty.
        kind: Delimiter,
    },

    /// A whitespace character was configured as a delimiter.
    #[error("whitespace {ch:?} cannot be used as {kind}")]
    Whitespace {
        /// The offending character.
        ch: char,
        /// The kind it was configured for.
        kind: Delimiter,
    },
}

/// The structural role of a delimiter character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Delimiter {
    /// Separates sibling paths (`,` by default).
    Fields,
    /// Separates the segments of one path (`/` by default).
    NestedField,
    /// Opens a field group (`(` by default).
    GroupStart,
    /// Closes a field group (`)` by default).
    GroupEnd,
}

impl fmt::Display for Delimiter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Delimiter::Fields => write!(f, "fields delimiter"),
            Delimiter::NestedField => write!(f, "nested field delimiter"),
            Delimiter::GroupStart => write!(f, "group start delimiter"),
            Delimiter::GroupEnd => write!(f, "group end delimiter"),
        }
    }
}

/// Whitespace recognized by the lexer. Never valid as a delimiter.
pub fn is_selection_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r' | '\n')
}

/// Characters assigned to each delimiter kind.
///
/// Every set may hold several characters (e.g. both `/` and `.` as nested
/// field delimiters). Missing keys in JSON fall back to the defaults:
///
/// ```
/// let opts = sparse_fields_delimiters::load_delimiters_from_str(r#"{ "nested": ["/", "."] }"#)
///     .unwrap();
/// assert_eq!(opts.fields, vec![',']);
/// assert_eq!(opts.nested, vec!['/', '.']);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DelimiterOptions {
    /// Characters separating sibling paths.
    pub fields: Vec<char>,
    /// Characters separating segments of one path.
    pub nested: Vec<char>,
    /// Characters opening a group.
    pub group_start: Vec<char>,
    /// Characters closing a group.
    pub group_end: Vec<char>,
}

impl Default for DelimiterOptions {
    fn default() -> Self {
        Self {
            fields: vec![','],
            nested: vec!['/'],
            group_start: vec!['('],
            group_end: vec![')'],
        }
    }
}

impl DelimiterOptions {
    /// Build the character lookup table, rejecting duplicate assignments,
    /// empty sets, and whitespace delimiters.
    pub fn table(&self) -> Result<DelimiterTable, DelimiterError> {
        let mut map = BTreeMap::new();
        let sets = [
            (Delimiter::Fields, &self.fields),
            (Delimiter::NestedField, &self.nested),
            (Delimiter::GroupStart, &self.group_start),
            (Delimiter::GroupEnd, &self.group_end),
        ];
        for (kind, chars) in sets {
            if chars.is_empty() {
                return Err(DelimiterError::Empty { kind });
            }
            for &ch in chars {
                if is_selection_whitespace(ch) {
                    return Err(DelimiterError::Whitespace { ch, kind });
                }
                if let Some(first) = map.insert(ch, kind) {
                    return Err(DelimiterError::Duplicate {
                        ch,
                        first,
                        second: kind,
                    });
                }
            }
        }
        Ok(DelimiterTable {
            map,
            options: self.clone(),
        })
    }
}

static STANDARD: LazyLock<DelimiterTable> = LazyLock::new(|| DelimiterTable {
    map: BTreeMap::from([
        (',', Delimiter::Fields),
        ('/', Delimiter::NestedField),
        ('(', Delimiter::GroupStart),
        (')', Delimiter::GroupEnd),
    ]),
    options: DelimiterOptions::default(),
});

/// Validated, immutable mapping from delimiter characters to their kind.
///
/// Built once per configuration and shared read-only by any number of parses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DelimiterTable {
    map: BTreeMap<char, Delimiter>,
    options: DelimiterOptions,
}

impl DelimiterTable {
    /// The default table: `,` `/` `(` `)`.
    pub fn standard() -> &'static DelimiterTable {
        &STANDARD
    }

    /// Kind of `c`, or `None` when `c` is not a delimiter.
    pub fn kind_of(&self, c: char) -> Option<Delimiter> {
        self.map.get(&c).copied()
    }

    /// Whether `c` is any configured delimiter.
    pub fn is_delimiter(&self, c: char) -> bool {
        self.map.contains_key(&c)
    }

    /// Whether `c` separates path segments.
    pub fn is_nested(&self, c: char) -> bool {
        self.kind_of(c) == Some(Delimiter::NestedField)
    }

    /// All characters that separate path segments.
    pub fn nested_delimiters(&self) -> &[char] {
        &self.options.nested
    }

    /// Character used when joining sibling paths.
    pub fn primary_fields(&self) -> char {
        self.options.fields[0]
    }

    /// Character used when joining path segments.
    pub fn primary_nested(&self) -> char {
        self.options.nested[0]
    }

    /// Character used when opening a group.
    pub fn primary_group_start(&self) -> char {
        self.options.group_start[0]
    }

    /// Character used when closing a group.
    pub fn primary_group_end(&self) -> char {
        self.options.group_end[0]
    }

    /// The options this table was built from.
    pub fn options(&self) -> &DelimiterOptions {
        &self.options
    }
}

impl Default for DelimiterTable {
    fn default() -> Self {
        Self::standard().clone()
    }
}

/// Load and validate [`DelimiterOptions`] from a JSON string.
///
/// Keys are `fields`, `nested`, `group_start`, `group_end`, each an array of
/// single-character strings. Omitted keys keep their defaults. The result is
/// checked with [`DelimiterOptions::table`] before being returned.
pub fn load_delimiters_from_str(s: &str) -> Result<DelimiterOptions, DelimiterError> {
    let options: DelimiterOptions = serde_json::from_str(s)?;
    options.table()?;
    Ok(options)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_table_maps_defaults() {
        let t = DelimiterTable::standard();
        assert_eq!(t.kind_of(','), Some(Delimiter::Fields));
        assert_eq!(t.kind_of('/'), Some(Delimiter::NestedField));
        assert_eq!(t.kind_of('('), Some(Delimiter::GroupStart));
        assert_eq!(t.kind_of(')'), Some(Delimiter::GroupEnd));
        assert_eq!(t.kind_of('a'), None);
        assert_eq!(t.kind_of('.'), None);
    }

    #[test]
    fn default_options_build_standard_table() {
        let built = DelimiterOptions::default().table().unwrap();
        assert_eq!(&built, DelimiterTable::standard());
    }

    #[test]
    fn multiple_chars_per_kind() {
        let opts = DelimiterOptions {
            nested: vec!['/', '.'],
            group_start: vec!['(', '['],
            group_end: vec![')', ']'],
            ..Default::default()
        };
        let t = opts.table().unwrap();
        assert!(t.is_nested('.'));
        assert_eq!(t.kind_of('['), Some(Delimiter::GroupStart));
        assert_eq!(t.kind_of(']'), Some(Delimiter::GroupEnd));
        assert_eq!(t.nested_delimiters(), &['/', '.']);
        assert_eq!(t.primary_nested(), '/');
    }

    #[test]
    fn duplicate_across_kinds_rejected() {
        let opts = DelimiterOptions {
            fields: vec![',', '/'],
            ..Default::default()
        };
        let err = opts.table().unwrap_err();
        match err {
            DelimiterError::Duplicate { ch, first, second } => {
                assert_eq!(ch, '/');
                assert_eq!(first, Delimiter::Fields);
                assert_eq!(second, Delimiter::NestedField);
            }
            other => panic!("expected Duplicate, got {other:?}"),
        }
    }

    #[test]
    fn duplicate_within_kind_rejected() {
        let opts = DelimiterOptions {
            nested: vec!['/', '/'],
            ..Default::default()
        };
        assert!(matches!(
            opts.table(),
            Err(DelimiterError::Duplicate { ch: '/', .. })
        ));
    }

    #[test]
    fn empty_set_rejected() {
        let opts = DelimiterOptions {
            group_end: vec![],
            ..Default::default()
        };
        assert!(matches!(
            opts.table(),
            Err(DelimiterError::Empty {
                kind: Delimiter::GroupEnd
            })
        ));
    }

    #[test]
    fn whitespace_rejected() {
        let opts = DelimiterOptions {
            fields: vec![' '],
            ..Default::default()
        };
        let err = opts.table().unwrap_err();
        assert!(
            err.to_string().contains("whitespace"),
            "unexpected message: {err}"
        );
    }

    #[test]
    fn load_partial_json_keeps_defaults() {
        let opts = load_delimiters_from_str(r#"{ "group_start": ["["], "group_end": ["]"] }"#)
            .unwrap();
        assert_eq!(opts.fields, vec![',']);
        assert_eq!(opts.nested, vec!['/']);
        assert_eq!(opts.group_start, vec!['[']);
        assert_eq!(opts.group_end, vec![']']);
    }

    #[test]
    fn load_rejects_conflicting_json() {
        let err = load_delimiters_from_str(r#"{ "fields": ["("] }"#).unwrap_err();
        assert!(
            err.to_string().contains("group start delimiter"),
            "unexpected message: {err}"
        );
    }

    #[test]
    fn load_rejects_malformed_json() {
        let err = load_delimiters_from_str("{ fields: ").unwrap_err();
        assert!(matches!(err, DelimiterError::InvalidJson(_)));
    }

    #[test]
    fn options_serde_roundtrip() {
        let opts = DelimiterOptions {
            nested: vec!['/', '.'],
            ..Default::default()
        };
        let json = serde_json::to_string(&opts).unwrap();
        let back: DelimiterOptions = serde_json::from_str(&json).unwrap();
        assert_eq!(opts, back);
    }

    #[test]
    fn table_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<DelimiterTable>();
    }
}
