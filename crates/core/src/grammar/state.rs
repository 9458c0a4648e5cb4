use super::error::UnexpectedToken;
use super::lexer::Token;
use crate::field::FieldPath;

/// Mutable working state for one parse run.
///
/// Holds the finished paths, the first error (if any), and the stack of
/// in-progress path prefixes. The prefix stack is scratch memory: once the
/// run ends, successfully or not, whatever remains on it is ignored.
#[derive(Debug, Default)]
pub struct ParseState {
    finished: Vec<FieldPath>,
    error: Option<UnexpectedToken>,
    /// Each frame is an independently owned prefix; sibling branches inside a
    /// group get their own copy.
    prefixes: Vec<Vec<String>>,
}

impl ParseState {
    /// Fresh, empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Paths finished so far, in input order.
    pub fn finished(&self) -> &[FieldPath] {
        &self.finished
    }

    /// The first error recorded, if any.
    pub fn error(&self) -> Option<&UnexpectedToken> {
        self.error.as_ref()
    }

    /// Whether an error was recorded.
    pub fn is_failed(&self) -> bool {
        self.error.is_some()
    }

    /// Finished paths, or the recorded error. A failed run yields no paths.
    pub fn into_result(self) -> Result<Vec<FieldPath>, UnexpectedToken> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.finished),
        }
    }

    // ── Parser-facing operations ────────────────────────────────────────

    /// Record `tok` as the offending token unless an error is already set.
    pub(crate) fn fail(&mut self, tok: &Token<'_>) {
        if self.error.is_some() {
            return;
        }
        let err = UnexpectedToken::from(tok);
        log::debug!("selection parse failed: {err}");
        self.error = Some(err);
    }

    /// Append `segment` to a prefix frame.
    ///
    /// With `branch` set the top frame is copied and left in place, so the
    /// new sibling does not disturb the shared prefix; otherwise the top frame
    /// is extended in place. An empty stack starts a new frame either way.
    pub(crate) fn extend_prefix(&mut self, segment: String, branch: bool) {
        let mut frame = if branch {
            self.prefixes.last().cloned().unwrap_or_default()
        } else {
            self.prefixes.pop().unwrap_or_default()
        };
        frame.push(segment);
        self.prefixes.push(frame);
    }

    /// Pop the top frame and emit it as a finished path.
    pub(crate) fn finish_top(&mut self) {
        let Some(segments) = self.prefixes.pop() else {
            return;
        };
        if self.error.is_some() || segments.is_empty() {
            return;
        }
        let path = FieldPath::from_parsed(segments);
        log::debug!("selected path {path}");
        self.finished.push(path);
    }

    /// Pop the top frame without emitting it.
    pub(crate) fn discard_top(&mut self) {
        self.prefixes.pop();
    }

    #[cfg(test)]
    pub(crate) fn prefix_depth(&self) -> usize {
        self.prefixes.len()
    }
}
