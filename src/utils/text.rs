/// Convert `\r\n` and lone `\r` to `\n`.
pub fn normalize_newlines(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}

/// Decode the `\n` and `\t` escape sequences snippet literals are stored with.
pub fn decode_escapes(literal: &str) -> String {
    literal.replace("\\n", "\n").replace("\\t", "\t")
}

/// Width of the leading whitespace of `line`, counting a tab as `tab_width`.
pub fn indent_width(line: &str, tab_width: usize) -> usize {
    line.chars()
        .take_while(|c| c.is_whitespace())
        .map(|c| if c == '\t' { tab_width } else { 1 })
        .sum()
}

/// Number of leading whitespace chars of `line`.
pub fn indent_chars(line: &str) -> usize {
    line.chars().take_while(|c| c.is_whitespace()).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_become_control_chars() {
        assert_eq!(
            decode_escapes("for i in range(3):\\n\\tprint(i)"),
            "for i in range(3):\n\tprint(i)"
        );
    }

    #[test]
    fn indent_counts_tabs_as_units() {
        assert_eq!(indent_width("\t  x", 4), 6);
        assert_eq!(indent_chars("\t  x"), 3);
        assert_eq!(indent_width("x", 4), 0);
    }
}
