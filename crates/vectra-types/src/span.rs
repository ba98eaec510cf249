use serde::{Deserialize, Serialize};
use std::fmt;

/// Source location span.
///
/// Script statements never cross a line boundary, so a span is a column
/// range on a single line. Line and column values are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    pub line: u32,
    pub start_col: u32,
    pub end_col: u32,
}

impl Span {
    /// Create a new span.
    pub fn new(line: u32, start_col: u32, end_col: u32) -> Self {
        Self {
            line,
            start_col,
            end_col,
        }
    }

    /// Create a zero-width span at a single position.
    pub fn point(line: u32, col: u32) -> Self {
        Self::new(line, col, col)
    }

    /// Merge two spans into one that covers both.
    ///
    /// Spans on different lines keep the line of `self`.
    pub fn merge(self, other: Span) -> Span {
        if self.line != other.line {
            return self;
        }
        Span::new(
            self.line,
            self.start_col.min(other.start_col),
            self.end_col.max(other.end_col),
        )
    }

    /// The 0-based line index this span belongs to.
    pub fn line_index(&self) -> usize {
        self.line.saturating_sub(1) as usize
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.start_col)
    }
}

/// Holds the script text for error reporting.
#[derive(Debug, Clone)]
pub struct ScriptSource {
    pub source: String,
    /// Cached line start byte offsets for fast line lookup.
    line_starts: Vec<usize>,
}

impl ScriptSource {
    /// Create a new script source.
    pub fn new(source: impl Into<String>) -> Self {
        let source = source.into();
        let line_starts = std::iter::once(0)
            .chain(source.match_indices('\n').map(|(i, _)| i + 1))
            .collect();
        Self {
            source,
            line_starts,
        }
    }

    /// Extract a source line by 1-based line number.
    ///
    /// Returns `None` if the line number is out of range.
    pub fn line(&self, line_number: u32) -> Option<&str> {
        let idx = line_number.checked_sub(1)? as usize;
        if idx >= self.line_starts.len() {
            return None;
        }
        let start = self.line_starts[idx];
        let end = self
            .line_starts
            .get(idx + 1)
            .map(|&s| s.saturating_sub(1))
            .unwrap_or(self.source.len());
        // CRLF scripts keep their `\r` in the buffer
        Some(self.source[start..end].trim_end_matches('\r'))
    }

    /// Get the total number of lines.
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }
}
