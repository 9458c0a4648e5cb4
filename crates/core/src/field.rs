//! Finished field paths and the prefix-matching rule.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Segment that matches any candidate segment.
pub const WILDCARD: &str = "*";

/// Errors raised when constructing a [`FieldPath`] by hand.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldPathError {
    /// No segments were supplied.
    #[error("field path must have at least one segment")]
    Empty,
    /// A segment was the empty string.
    #[error("field path segment {index} is empty")]
    EmptySegment {
        /// Zero-based index of the empty segment.
        index: usize,
    },
}

/// One selected path, e.g. `["foo", "bar", "baz"]` for `foo/bar/baz`.
///
/// Invariant: at least one segment, and no segment is empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct FieldPath {
    segments: Vec<String>,
}

impl FieldPath {
    /// Build a path from its segments.
    ///
    /// ```
    /// use sparse_fields_core::FieldPath;
    ///
    /// let path = FieldPath::new(["foo", "bar"]).unwrap();
    /// assert_eq!(path.to_string(), "foo/bar");
    /// assert!(FieldPath::new(Vec::<String>::new()).is_err());
    /// ```
    pub fn new<I, S>(segments: I) -> Result<Self, FieldPathError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let segments: Vec<String> = segments.into_iter().map(Into::into).collect();
        if segments.is_empty() {
            return Err(FieldPathError::Empty);
        }
        if let Some(index) = segments.iter().position(String::is_empty) {
            return Err(FieldPathError::EmptySegment { index });
        }
        Ok(Self { segments })
    }

    /// Wrap segments produced by the parser, which only emits non-empty
    /// identifier runs.
    pub(crate) fn from_parsed(segments: Vec<String>) -> Self {
        debug_assert!(!segments.is_empty() && segments.iter().all(|s| !s.is_empty()));
        Self { segments }
    }

    /// The path's segments, outermost first.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Number of segments (always at least one).
    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    /// Whether this path selects `candidate`.
    ///
    /// Each segment must equal the candidate segment at the same index, or be
    /// [`WILDCARD`]. The path may be shorter than the candidate (selecting a
    /// parent selects everything beneath it) but never longer.
    pub fn matches<S: AsRef<str>>(&self, candidate: &[S], ignore_case: bool) -> bool {
        if self.segments.len() > candidate.len() {
            return false;
        }
        self.segments
            .iter()
            .zip(candidate)
            .all(|(seg, other)| seg == WILDCARD || segment_eq(seg, other.as_ref(), ignore_case))
    }
}

fn segment_eq(a: &str, b: &str, ignore_case: bool) -> bool {
    if ignore_case {
        a.chars()
            .flat_map(char::to_lowercase)
            .eq(b.chars().flat_map(char::to_lowercase))
    } else {
        a == b
    }
}

impl TryFrom<Vec<String>> for FieldPath {
    type Error = FieldPathError;

    fn try_from(segments: Vec<String>) -> Result<Self, Self::Error> {
        Self::new(segments)
    }
}

impl From<FieldPath> for Vec<String> {
    fn from(path: FieldPath) -> Self {
        path.segments
    }
}

/// Segments joined with `/`.
impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("/"))
    }
}
