//! Collapsible panel of insertable snippets.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use serde::Deserialize;

pub mod state;

pub use state::ToolboxState;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Snippet {
    pub label: String,
    /// Literal text with `\n` / `\t` escapes still encoded.
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Section {
    pub title: String,
    /// Persistence key; sections without one are not remembered.
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub open: bool,
    pub snippets: Vec<Snippet>,
}

/// A selectable toolbox row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Row {
    Section(usize),
    Snippet(usize, usize),
}

#[derive(Debug, Clone)]
pub struct Toolbox {
    sections: Vec<Section>,
    selected: usize,
}

impl Toolbox {
    pub fn new(sections: Vec<Section>) -> Self {
        Self {
            sections,
            selected: 0,
        }
    }

    /// Built-in sections followed by those in the user snippet file, if any.
    pub fn load(user_file: Option<&Path>) -> Self {
        let mut sections = builtin_sections();
        if let Some(path) = user_file {
            match read_sections(path) {
                Ok(extra) => sections.extend(extra),
                Err(e) => tracing::warn!(error = %format!("{e:#}"), "skipping user snippets"),
            }
        }
        Self::new(sections)
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn sections_mut(&mut self) -> &mut [Section] {
        &mut self.sections
    }

    /// Visible rows: every header, plus the snippets of open sections.
    pub fn rows(&self) -> Vec<Row> {
        let mut rows = Vec::new();
        for (i, section) in self.sections.iter().enumerate() {
            rows.push(Row::Section(i));
            if section.open {
                rows.extend((0..section.snippets.len()).map(|j| Row::Snippet(i, j)));
            }
        }
        rows
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn selected_row(&self) -> Option<Row> {
        self.rows().get(self.selected).copied()
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.rows().len() {
            self.selected += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn snippet(&self, section: usize, index: usize) -> Option<&Snippet> {
        self.sections.get(section)?.snippets.get(index)
    }

    /// Flip a section open/closed and return its new state. The selection
    /// stays on the section header.
    pub fn toggle(&mut self, section: usize) -> Option<bool> {
        let s = self.sections.get_mut(section)?;
        s.open = !s.open;
        let open = s.open;
        if let Some(pos) = self.rows().iter().position(|r| *r == Row::Section(section)) {
            self.selected = pos;
        }
        Some(open)
    }
}

fn read_sections(path: &Path) -> Result<Vec<Section>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading snippets from {}", path.display()))?;
    let sections = serde_json::from_str(&text)
        .with_context(|| format!("parsing snippets in {}", path.display()))?;
    Ok(sections)
}

fn section(title: &str, key: &str, open: bool, snippets: &[(&str, &str)]) -> Section {
    Section {
        title: title.to_string(),
        key: Some(key.to_string()),
        open,
        snippets: snippets
            .iter()
            .map(|(label, text)| Snippet {
                label: label.to_string(),
                text: text.to_string(),
            })
            .collect(),
    }
}

pub fn builtin_sections() -> Vec<Section> {
    vec![
        section(
            "Basics",
            "basics",
            true,
            &[
                ("print", r#"print("Hello, world!")"#),
                ("variable", "name = \"Glide\""),
                ("input", r#"answer = input("Your name? ")\nprint("Hi", answer)"#),
                ("comment", "# explain this step"),
            ],
        ),
        section(
            "Control flow",
            "control",
            false,
            &[
                ("if / else", r#"if x > 0:\n    print("positive")\nelse:\n    print("not positive")"#),
                ("for loop", r"for i in range(5):\n    print(i)"),
                ("while loop", r"n = 3\nwhile n > 0:\n    print(n)\n    n -= 1"),
                ("try / except", r#"try:\n    value = int("42")\nexcept ValueError as err:\n    print(err)"#),
            ],
        ),
        section(
            "Functions",
            "functions",
            false,
            &[
                ("def", r##"def greet(name):\n    return f"Hello, {name}!""##),
                ("lambda", "square = lambda n: n * n"),
                ("class", r"class Point:\n    def __init__(self, x, y):\n        self.x = x\n        self.y = y"),
            ],
        ),
        section(
            "Collections",
            "collections",
            false,
            &[
                ("list", "items = [1, 2, 3]"),
                ("dict", r#"ages = {"ada": 36, "alan": 41}"#),
                ("comprehension", "squares = [n * n for n in range(10)]"),
                ("loop over dict", r"for key, value in ages.items():\n    print(key, value)"),
            ],
        ),
    ]
}
