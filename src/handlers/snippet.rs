//! Insert a toolbox snippet at the editor cursor.

use crate::editor::Editor;
use crate::utils::text::decode_escapes;

/// Insert the escaped snippet `literal` at the cursor and reindent every
/// inserted line. A newline is added first when the cursor line already has
/// code before the cursor.
pub fn insert_snippet(editor: &mut Editor, literal: &str) {
    let mut text = decode_escapes(literal);
    let needs_break = !editor.text_before_cursor().trim().is_empty();
    if needs_break {
        text.insert(0, '\n');
    }

    let start = editor.cursor().line + usize::from(needs_break);
    editor.insert_str(&text);
    let end = editor.cursor().line;

    for line in start..=end {
        editor.reindent_line(line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inserts_at_empty_cursor_line() {
        let mut ed = Editor::new(4);
        insert_snippet(&mut ed, r"for i in range(5):\n    print(i)");
        assert_eq!(ed.text(), "for i in range(5):\n    print(i)");
        assert_eq!(ed.cursor().line, 1);
    }

    #[test]
    fn breaks_line_when_code_precedes_cursor() {
        let mut ed = Editor::from_text("x = 1", 4);
        ed.move_end();
        insert_snippet(&mut ed, "print(x)");
        assert_eq!(ed.text(), "x = 1\nprint(x)");
    }

    #[test]
    fn whitespace_before_cursor_does_not_break() {
        let mut ed = Editor::from_text("if ok:\n    ", 4);
        ed.set_cursor(1, 4);
        insert_snippet(&mut ed, r"for i in x:\n    print(i)");
        assert_eq!(ed.text(), "if ok:\n    for i in x:\n        print(i)");
    }

    #[test]
    fn tabs_are_decoded_then_reindented() {
        let mut ed = Editor::new(4);
        insert_snippet(&mut ed, r"while True:\n\tbreak");
        assert_eq!(ed.text(), "while True:\n    break");
    }

    #[test]
    fn literal_dedent_is_kept() {
        let mut ed = Editor::new(4);
        insert_snippet(
            &mut ed,
            r"if x > 0:\n    print(1)\nelse:\n    print(2)\nprint(3)",
        );
        assert_eq!(
            ed.text(),
            "if x > 0:\n    print(1)\nelse:\n    print(2)\nprint(3)"
        );
    }

    #[test]
    fn cursor_ends_after_insert() {
        let mut ed = Editor::from_text("a = 1", 4);
        ed.set_cursor(0, 0);
        insert_snippet(&mut ed, "b = 2");
        assert_eq!(ed.text(), "b = 2a = 1");
        assert_eq!(ed.cursor().col, 5);
    }
}
