//! Python indentation rule used for new lines and reindenting.

const BLOCK_ENDERS: &[&str] = &["return", "pass", "break", "continue", "raise"];
const DEDENTERS: &[&str] = &["else", "elif", "except", "finally"];

/// Indentation width for a line.
///
/// `prev` is the closest non-blank line above, `current` the line's text
/// without its leading whitespace. `existing` is the line's current
/// indentation when reindenting; it is kept when shallower than the computed
/// value. A fresh line passes `None`.
pub fn smart_indent(prev: Option<&str>, current: &str, existing: Option<usize>, unit: usize) -> usize {
    let Some(prev) = prev else {
        return 0;
    };
    let p = crate::utils::text::indent_width(prev, unit);
    let code = strip_comment(prev.trim());

    if code.ends_with(':') || code.ends_with(['(', '[', '{']) {
        return p + unit;
    }

    let mut base = if starts_with_word(code, BLOCK_ENDERS) {
        p.saturating_sub(unit)
    } else {
        p
    };
    if starts_with_word(current, DEDENTERS) {
        base = base.saturating_sub(unit);
    }

    match existing {
        Some(existing) => existing.min(base),
        None => base,
    }
}

fn starts_with_word(line: &str, words: &[&str]) -> bool {
    let first: String = line
        .chars()
        .take_while(|c| c.is_alphanumeric() || *c == '_')
        .collect();
    words.contains(&first.as_str())
}

/// Drop a trailing `#` comment that is not inside a string literal.
fn strip_comment(line: &str) -> &str {
    let mut quote: Option<char> = None;
    let mut escaped = false;
    for (i, c) in line.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match (quote, c) {
            (Some(_), '\\') => escaped = true,
            (Some(q), c) if c == q => quote = None,
            (None, '\'' | '"') => quote = Some(c),
            (None, '#') => return line[..i].trim_end(),
            _ => {}
        }
    }
    line
}
