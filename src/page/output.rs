//! Scrollable output sink.

use crate::utils::text::normalize_newlines;

#[derive(Debug, Default, Clone)]
pub struct OutputBuffer {
    text: String,
    /// Lines scrolled up from the bottom; 0 follows the newest output.
    scroll_offset: usize,
}

impl OutputBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `text`, normalizing line endings and guaranteeing a trailing
    /// newline. Jumps back to the newest output.
    pub fn append(&mut self, text: Option<&str>) {
        let Some(text) = text else {
            return;
        };
        self.text.push_str(&normalize_newlines(text));
        if !self.text.ends_with('\n') {
            self.text.push('\n');
        }
        self.scroll_to_bottom();
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.scroll_offset = 0;
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.text.lines()
    }

    pub fn line_count(&self) -> usize {
        self.text.lines().count()
    }

    pub fn scroll_offset(&self) -> usize {
        self.scroll_offset
    }

    pub fn scroll_up(&mut self) {
        if self.scroll_offset + 1 < self.line_count() {
            self.scroll_offset += 1;
        }
    }

    pub fn scroll_down(&mut self) {
        self.scroll_offset = self.scroll_offset.saturating_sub(1);
    }

    pub fn scroll_to_bottom(&mut self) {
        self.scroll_offset = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn none_is_a_no_op() {
        let mut out = OutputBuffer::new();
        out.append(None);
        assert!(out.is_empty());
    }

    #[test]
    fn append_adds_missing_newline() {
        let mut out = OutputBuffer::new();
        out.append(Some("hello"));
        out.append(Some("world\n"));
        assert_eq!(out.text(), "hello\nworld\n");
    }

    #[test]
    fn carriage_returns_are_normalized() {
        let mut out = OutputBuffer::new();
        out.append(Some("a\r\nb\rc"));
        assert_eq!(out.text(), "a\nb\nc\n");
    }

    #[test]
    fn empty_text_still_ends_in_newline() {
        let mut out = OutputBuffer::new();
        out.append(Some(""));
        assert_eq!(out.text(), "\n");
    }

    #[test]
    fn append_follows_the_tail() {
        let mut out = OutputBuffer::new();
        out.append(Some("1\n2\n3"));
        out.scroll_up();
        out.scroll_up();
        assert_eq!(out.scroll_offset(), 2);
        out.scroll_up();
        assert_eq!(out.scroll_offset(), 2);
        out.append(Some("4"));
        assert_eq!(out.scroll_offset(), 0);
    }

    #[test]
    fn clear_resets() {
        let mut out = OutputBuffer::new();
        out.append(Some("x"));
        out.clear();
        assert_eq!(out.text(), "");
        assert_eq!(out.line_count(), 0);
    }
}
