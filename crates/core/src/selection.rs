//! The finished set of selected field paths and its membership test.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::field::FieldPath;
use crate::grammar::emit::{EmitConfig, emit_selection};
use crate::grammar::error::{SelectionError, UnexpectedToken};
use crate::grammar::parser::{parse_str, parse_with_table};
use crate::grammar::tables::{DelimiterOptions, DelimiterTable};

/// Field paths selected by one parsed selection string.
///
/// ```
/// use sparse_fields_core::Selection;
///
/// let sel = Selection::parse("id,author(name,avatar/url)").unwrap();
/// assert!(sel.matches("author/name", false));
/// assert!(sel.matches("author/avatar/url/width", false));
/// assert!(!sel.matches("author/email", false));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Selection {
    paths: Vec<FieldPath>,
}

impl Selection {
    /// Wrap already-built paths.
    pub fn new(paths: Vec<FieldPath>) -> Self {
        Self { paths }
    }

    /// Parse with the default delimiters.
    pub fn parse(input: &str) -> Result<Self, UnexpectedToken> {
        parse_str(input)
    }

    /// Parse with a custom delimiter configuration.
    pub fn parse_with(input: &str, options: &DelimiterOptions) -> Result<Self, SelectionError> {
        let table = options.table()?;
        Ok(parse_with_table(input, &table)?)
    }

    /// The selected paths, in the order they were finished.
    pub fn paths(&self) -> &[FieldPath] {
        &self.paths
    }

    /// Number of selected paths.
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// Whether nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Iterate over the selected paths.
    pub fn iter(&self) -> std::slice::Iter<'_, FieldPath> {
        self.paths.iter()
    }

    /// Whether `path` (segments separated by `/`) is selected.
    pub fn matches(&self, path: &str, ignore_case: bool) -> bool {
        self.matches_with(path, ignore_case, DelimiterTable::standard())
    }

    /// Whether `path` is selected, splitting it on every nested-field
    /// delimiter of `table`.
    pub fn matches_with(&self, path: &str, ignore_case: bool, table: &DelimiterTable) -> bool {
        if self.paths.is_empty() {
            return false;
        }
        let segments: Vec<&str> = path.split(|c| table.is_nested(c)).collect();
        self.matches_segments(&segments, ignore_case)
    }

    /// Whether any selected path matches the pre-split `segments`.
    pub fn matches_segments<S: AsRef<str>>(&self, segments: &[S], ignore_case: bool) -> bool {
        self.paths.iter().any(|p| p.matches(segments, ignore_case))
    }
}

impl FromIterator<FieldPath> for Selection {
    fn from_iter<I: IntoIterator<Item = FieldPath>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl IntoIterator for Selection {
    type Item = FieldPath;
    type IntoIter = std::vec::IntoIter<FieldPath>;

    fn into_iter(self) -> Self::IntoIter {
        self.paths.into_iter()
    }
}

impl<'a> IntoIterator for &'a Selection {
    type Item = &'a FieldPath;
    type IntoIter = std::slice::Iter<'a, FieldPath>;

    fn into_iter(self) -> Self::IntoIter {
        self.paths.iter()
    }
}

/// Canonical flat form: `a/b,a/c,d`.
impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&emit_selection(
            self,
            DelimiterTable::standard(),
            &EmitConfig::default(),
        ))
    }
}
