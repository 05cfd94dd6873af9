//! Line-oriented view of a rendered document.
//!
//! The diff engine operates on raw text lines with stable 1-based line
//! numbers, not on parsed blocks. A [`LineView`] is derived from a rendered
//! document and never persisted.

use serde::{Deserialize, Serialize};

/// An ordered sequence of raw text lines with stable line numbers.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineView {
    lines: Vec<String>,
}

impl LineView {
    /// Build a view from rendered text. A trailing newline does not produce
    /// an extra empty line.
    pub fn from_text(text: &str) -> Self {
        Self {
            lines: text.lines().map(str::to_string).collect(),
        }
    }

    /// Build a view directly from lines.
    pub fn from_lines(lines: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }

    /// The raw lines in order.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// The line at 1-based `number`, if present.
    pub fn line(&self, number: usize) -> Option<&str> {
        number
            .checked_sub(1)
            .and_then(|i| self.lines.get(i))
            .map(String::as_str)
    }

    /// Number of lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Returns `true` if the view has no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_text_splits_lines() {
        let view = LineView::from_text("a\nb\nc\n");
        assert_eq!(view.len(), 3);
        assert_eq!(view.line(1), Some("a"));
        assert_eq!(view.line(3), Some("c"));
        assert_eq!(view.line(4), None);
        assert_eq!(view.line(0), None);
    }

    #[test]
    fn empty_text_is_empty_view() {
        let view = LineView::from_text("");
        assert!(view.is_empty());
        assert_eq!(view.len(), 0);
    }

    #[test]
    fn from_lines_preserves_order() {
        let view = LineView::from_lines(["x", "y"]);
        assert_eq!(view.lines(), &["x".to_string(), "y".to_string()]);
    }
}
