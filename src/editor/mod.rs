//! Code editor: line buffer, cursor and Python-aware editing.

pub mod highlight;
pub mod indent;

use unicode_width::UnicodeWidthStr;

use crate::utils::text::{indent_chars, indent_width, normalize_newlines};

/// Cursor position; `col` counts chars, not bytes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cursor {
    pub line: usize,
    pub col: usize,
}

#[derive(Debug, Clone)]
pub struct Editor {
    lines: Vec<String>,
    cursor: Cursor,
    indent_unit: usize,
    /// First visible line.
    scroll: usize,
}

impl Editor {
    pub fn new(indent_unit: usize) -> Self {
        Self {
            lines: vec![String::new()],
            cursor: Cursor::default(),
            indent_unit,
            scroll: 0,
        }
    }

    pub fn from_text(text: &str, indent_unit: usize) -> Self {
        let text = normalize_newlines(text);
        let mut lines: Vec<String> = text.split('\n').map(str::to_string).collect();
        if lines.is_empty() {
            lines.push(String::new());
        }
        Self {
            lines,
            cursor: Cursor::default(),
            indent_unit,
            scroll: 0,
        }
    }

    /// Whole document, lines joined with `\n`.
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    pub fn set_cursor(&mut self, line: usize, col: usize) {
        let line = line.min(self.lines.len() - 1);
        let col = col.min(self.line_len(line));
        self.cursor = Cursor { line, col };
    }

    pub fn indent_unit(&self) -> usize {
        self.indent_unit
    }

    pub fn scroll(&self) -> usize {
        self.scroll
    }

    /// Adjust scrolling so the cursor line is inside a `height`-line view.
    pub fn ensure_cursor_visible(&mut self, height: usize) {
        let height = height.max(1);
        if self.cursor.line < self.scroll {
            self.scroll = self.cursor.line;
        } else if self.cursor.line >= self.scroll + height {
            self.scroll = self.cursor.line + 1 - height;
        }
    }

    /// Text on the cursor line left of the cursor.
    pub fn text_before_cursor(&self) -> &str {
        let line = &self.lines[self.cursor.line];
        &line[..byte_index(line, self.cursor.col)]
    }

    /// Display width of the text left of the cursor.
    pub fn cursor_display_col(&self) -> usize {
        self.text_before_cursor().width()
    }

    fn line_len(&self, line: usize) -> usize {
        self.lines[line].chars().count()
    }

    // ----- Editing -----

    pub fn insert_char(&mut self, c: char) {
        if c == '\n' {
            self.insert_newline();
            return;
        }
        let Cursor { line, col } = self.cursor;
        let at = byte_index(&self.lines[line], col);
        self.lines[line].insert(at, c);
        self.cursor.col += 1;
    }

    /// Insert `text` verbatim at the cursor, leaving the cursor after it.
    pub fn insert_str(&mut self, text: &str) {
        let text = normalize_newlines(text);
        let Cursor { line, col } = self.cursor;
        let at = byte_index(&self.lines[line], col);
        let tail = self.lines[line].split_off(at);

        let mut parts = text.split('\n');
        if let Some(first) = parts.next() {
            self.lines[line].push_str(first);
        }
        let mut current = line;
        for part in parts {
            current += 1;
            self.lines.insert(current, part.to_string());
        }

        let col = self.line_len(current);
        self.lines[current].push_str(&tail);
        self.cursor = Cursor { line: current, col };
    }

    /// Split the line at the cursor and auto-indent the new line.
    pub fn insert_newline(&mut self) {
        let Cursor { line, col } = self.cursor;
        let at = byte_index(&self.lines[line], col);
        let rest = self.lines[line].split_off(at);
        let rest = rest.trim_start().to_string();

        let prev = self.prev_non_blank(line + 1);
        let width = indent::smart_indent(prev, &rest, None, self.indent_unit);
        self.lines.insert(line + 1, format!("{}{}", " ".repeat(width), rest));
        self.cursor = Cursor {
            line: line + 1,
            col: width,
        };
    }

    /// Insert spaces up to the next indent stop.
    pub fn insert_tab(&mut self) {
        let before = self.text_before_cursor().width();
        let n = self.indent_unit - before % self.indent_unit;
        for _ in 0..n {
            self.insert_char(' ');
        }
    }

    /// Remove one indent level from the cursor line.
    pub fn dedent_line(&mut self) {
        let line = self.cursor.line;
        let width = indent_width(&self.lines[line], self.indent_unit);
        let target = match width {
            0 => 0,
            w => (w - 1) / self.indent_unit * self.indent_unit,
        };
        self.set_indent(line, target);
    }

    pub fn backspace(&mut self) {
        let Cursor { line, col } = self.cursor;
        if col > 0 {
            let before = self.text_before_cursor();
            if before.chars().all(|c| c == ' ') && col % self.indent_unit == 0 {
                // Inside leading indentation: remove a whole level.
                let start = col - self.indent_unit;
                let from = byte_index(&self.lines[line], start);
                let to = byte_index(&self.lines[line], col);
                self.lines[line].replace_range(from..to, "");
                self.cursor.col = start;
            } else {
                let from = byte_index(&self.lines[line], col - 1);
                let to = byte_index(&self.lines[line], col);
                self.lines[line].replace_range(from..to, "");
                self.cursor.col -= 1;
            }
        } else if line > 0 {
            let current = self.lines.remove(line);
            let prev_len = self.line_len(line - 1);
            self.lines[line - 1].push_str(&current);
            self.cursor = Cursor {
                line: line - 1,
                col: prev_len,
            };
        }
    }

    pub fn delete(&mut self) {
        let Cursor { line, col } = self.cursor;
        if col < self.line_len(line) {
            let from = byte_index(&self.lines[line], col);
            let to = byte_index(&self.lines[line], col + 1);
            self.lines[line].replace_range(from..to, "");
        } else if line + 1 < self.lines.len() {
            let next = self.lines.remove(line + 1);
            self.lines[line].push_str(&next);
        }
    }

    /// Reformat the indentation of `line` with [`indent::smart_indent`].
    /// Blank lines are left alone.
    pub fn reindent_line(&mut self, line: usize) {
        if line >= self.lines.len() || self.lines[line].trim().is_empty() {
            return;
        }
        let existing = indent_width(&self.lines[line], self.indent_unit);
        let prev = self.prev_non_blank(line);
        let target = indent::smart_indent(
            prev,
            self.lines[line].trim_start(),
            Some(existing),
            self.indent_unit,
        );
        self.set_indent(line, target);
    }

    fn set_indent(&mut self, line: usize, width: usize) {
        let old = indent_chars(&self.lines[line]);
        let body = self.lines[line].trim_start().to_string();
        self.lines[line] = format!("{}{}", " ".repeat(width), body);
        if self.cursor.line == line {
            self.cursor.col = if self.cursor.col >= old {
                self.cursor.col - old + width
            } else {
                width
            };
        }
    }

    /// Closest non-blank line strictly above `line`.
    fn prev_non_blank(&self, line: usize) -> Option<&str> {
        self.lines[..line.min(self.lines.len())]
            .iter()
            .rev()
            .find(|l| !l.trim().is_empty())
            .map(String::as_str)
    }

    // ----- Movement -----

    pub fn move_left(&mut self) {
        if self.cursor.col > 0 {
            self.cursor.col -= 1;
        } else if self.cursor.line > 0 {
            self.cursor.line -= 1;
            self.cursor.col = self.line_len(self.cursor.line);
        }
    }

    pub fn move_right(&mut self) {
        if self.cursor.col < self.line_len(self.cursor.line) {
            self.cursor.col += 1;
        } else if self.cursor.line + 1 < self.lines.len() {
            self.cursor.line += 1;
            self.cursor.col = 0;
        }
    }

    pub fn move_up(&mut self) {
        if self.cursor.line > 0 {
            self.set_cursor(self.cursor.line - 1, self.cursor.col);
        }
    }

    pub fn move_down(&mut self) {
        if self.cursor.line + 1 < self.lines.len() {
            self.set_cursor(self.cursor.line + 1, self.cursor.col);
        }
    }

    /// Jump to the first non-blank char, or to column 0 if already there.
    pub fn move_home(&mut self) {
        let first = indent_chars(&self.lines[self.cursor.line]);
        self.cursor.col = if self.cursor.col == first { 0 } else { first };
    }

    pub fn move_end(&mut self) {
        self.cursor.col = self.line_len(self.cursor.line);
    }

    pub fn page_up(&mut self, height: usize) {
        self.set_cursor(self.cursor.line.saturating_sub(height), self.cursor.col);
    }

    pub fn page_down(&mut self, height: usize) {
        self.set_cursor(self.cursor.line + height, self.cursor.col);
    }
}

/// Byte offset of char column `col` in `line`, clamped to the line end.
fn byte_index(line: &str, col: usize) -> usize {
    line.char_indices()
        .nth(col)
        .map(|(i, _)| i)
        .unwrap_or(line.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_editor_has_one_empty_line() {
        let ed = Editor::new(4);
        assert_eq!(ed.line_count(), 1);
        assert_eq!(ed.text(), "");
    }

    #[test]
    fn typing_and_text_roundtrip() {
        let mut ed = Editor::new(4);
        for c in "x = 5".chars() {
            ed.insert_char(c);
        }
        ed.insert_newline();
        for c in "print(x)".chars() {
            ed.insert_char(c);
        }
        assert_eq!(ed.text(), "x = 5\nprint(x)");
        assert_eq!(ed.cursor(), Cursor { line: 1, col: 8 });
    }

    #[test]
    fn newline_after_colon_indents() {
        let mut ed = Editor::from_text("def f():", 4);
        ed.move_end();
        ed.insert_newline();
        assert_eq!(ed.lines()[1], "    ");
        assert_eq!(ed.cursor(), Cursor { line: 1, col: 4 });
    }

    #[test]
    fn newline_in_middle_carries_rest() {
        let mut ed = Editor::from_text("ab", 4);
        ed.set_cursor(0, 1);
        ed.insert_newline();
        assert_eq!(ed.text(), "a\nb");
    }

    #[test]
    fn backspace_removes_indent_level() {
        let mut ed = Editor::from_text("if x:\n        ", 4);
        ed.set_cursor(1, 8);
        ed.backspace();
        assert_eq!(ed.lines()[1], "    ");
        ed.backspace();
        assert_eq!(ed.lines()[1], "");
        ed.backspace();
        assert_eq!(ed.text(), "if x:");
        assert_eq!(ed.cursor(), Cursor { line: 0, col: 5 });
    }

    #[test]
    fn delete_joins_lines() {
        let mut ed = Editor::from_text("a\nb", 4);
        ed.move_end();
        ed.delete();
        assert_eq!(ed.text(), "ab");
    }

    #[test]
    fn insert_str_spans_lines() {
        let mut ed = Editor::from_text("[]", 4);
        ed.set_cursor(0, 1);
        ed.insert_str("1,\n2");
        assert_eq!(ed.text(), "[1,\n2]");
        assert_eq!(ed.cursor(), Cursor { line: 1, col: 1 });
    }

    #[test]
    fn multibyte_chars_use_char_columns() {
        let mut ed = Editor::from_text("héllo", 4);
        ed.set_cursor(0, 2);
        ed.insert_char('X');
        assert_eq!(ed.text(), "héXllo");
        assert_eq!(ed.text_before_cursor(), "héX");
    }

    #[test]
    fn reindent_follows_block_structure() {
        let mut ed = Editor::from_text("for i in x:\nprint(i)", 4);
        ed.reindent_line(1);
        assert_eq!(ed.lines()[1], "    print(i)");
    }

    #[test]
    fn tab_and_dedent() {
        let mut ed = Editor::from_text("x", 4);
        ed.insert_tab();
        assert_eq!(ed.lines()[0], "    x");
        ed.insert_tab();
        assert_eq!(ed.lines()[0], "        x");
        ed.dedent_line();
        assert_eq!(ed.lines()[0], "    x");
        assert_eq!(ed.cursor().col, 4);
    }

    #[test]
    fn scrolling_keeps_cursor_in_view() {
        let mut ed = Editor::from_text(&"x\n".repeat(50), 4);
        ed.set_cursor(30, 0);
        ed.ensure_cursor_visible(10);
        assert_eq!(ed.scroll(), 21);
        ed.set_cursor(5, 0);
        ed.ensure_cursor_visible(10);
        assert_eq!(ed.scroll(), 5);
    }
}
