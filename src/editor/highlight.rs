//! Single-line Python highlighter.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Plain,
    Keyword,
    Builtin,
    String,
    Number,
    Comment,
}

const KEYWORDS: &[&str] = &[
    "False", "None", "True", "and", "as", "assert", "async", "await", "break", "class",
    "continue", "def", "del", "elif", "else", "except", "finally", "for", "from", "global",
    "if", "import", "in", "is", "lambda", "nonlocal", "not", "or", "pass", "raise", "return",
    "try", "while", "with", "yield",
];

const BUILTINS: &[&str] = &[
    "abs", "all", "any", "bool", "dict", "enumerate", "filter", "float", "input", "int",
    "isinstance", "len", "list", "map", "max", "min", "open", "print", "range", "repr",
    "reversed", "round", "set", "sorted", "str", "sum", "tuple", "type", "zip",
];

/// Split `line` into `(kind, text)` runs covering the whole line.
pub fn tokenize(line: &str) -> Vec<(TokenKind, &str)> {
    let chars: Vec<(usize, char)> = line.char_indices().collect();
    let end_of = |i: usize| chars.get(i).map(|(b, _)| *b).unwrap_or(line.len());
    let mut tokens: Vec<(TokenKind, &str)> = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let (start, c) = chars[i];
        let (kind, next) = if c == '#' {
            (TokenKind::Comment, chars.len())
        } else if c == '\'' || c == '"' {
            let mut j = i + 1;
            while j < chars.len() && chars[j].1 != c {
                if chars[j].1 == '\\' {
                    j += 1;
                }
                j += 1;
            }
            (TokenKind::String, (j + 1).min(chars.len()))
        } else if c.is_ascii_digit() {
            let mut j = i + 1;
            while j < chars.len() && (chars[j].1.is_ascii_alphanumeric() || chars[j].1 == '.' || chars[j].1 == '_') {
                j += 1;
            }
            (TokenKind::Number, j)
        } else if c.is_alphabetic() || c == '_' {
            let mut j = i + 1;
            while j < chars.len() && (chars[j].1.is_alphanumeric() || chars[j].1 == '_') {
                j += 1;
            }
            let word = &line[start..end_of(j)];
            let kind = if KEYWORDS.contains(&word) {
                TokenKind::Keyword
            } else if BUILTINS.contains(&word) {
                TokenKind::Builtin
            } else {
                TokenKind::Plain
            };
            (kind, j)
        } else {
            let mut j = i + 1;
            while j < chars.len() {
                let d = chars[j].1;
                if d == '#' || d == '\'' || d == '"' || d.is_alphanumeric() || d == '_' {
                    break;
                }
                j += 1;
            }
            (TokenKind::Plain, j)
        };

        let text = &line[start..end_of(next)];
        match tokens.last_mut() {
            Some((last_kind, last_text)) if *last_kind == kind && kind == TokenKind::Plain => {
                let from = start - last_text.len();
                *last_text = &line[from..end_of(next)];
            }
            _ => tokens.push((kind, text)),
        }
        i = next;
    }

    tokens
}
