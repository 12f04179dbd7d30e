//! UI layout and rendering logic for the TUI.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use super::app::{App, Focus, Prompt};
use crate::editor::highlight::{tokenize, TokenKind};
use crate::page::RunStatus;
use crate::toolbox::Row;

/// Render the main UI
pub fn render_ui(frame: &mut Frame, app: &mut App) {
    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),    // Panes
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
        .split(main_layout[0]);

    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(columns[0]);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(columns[1]);

    render_editor(frame, app, left[0]);
    render_output(frame, app, left[1]);
    render_toolbox(frame, app, right[0]);
    render_variables(frame, app, right[1]);
    render_status_bar(frame, app, main_layout[1]);

    if let Some(prompt) = app.active_prompt() {
        render_prompt(frame, prompt);
    }

    if app.show_help {
        render_help_overlay(frame);
    }
}

fn pane_block(title: &str, focused: bool) -> Block<'_> {
    let border = if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    Block::default()
        .borders(Borders::ALL)
        .border_style(border)
        .title(title)
}

fn token_style(kind: TokenKind) -> Style {
    match kind {
        TokenKind::Plain => Style::default(),
        TokenKind::Keyword => Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD),
        TokenKind::Builtin => Style::default().fg(Color::Cyan),
        TokenKind::String => Style::default().fg(Color::Green),
        TokenKind::Number => Style::default().fg(Color::Yellow),
        TokenKind::Comment => Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
    }
}

/// Render the code editor with a line-number gutter
fn render_editor(frame: &mut Frame, app: &mut App, area: Rect) {
    let height = area.height.saturating_sub(2) as usize;
    app.editor_height = height.max(1);
    app.editor.ensure_cursor_visible(app.editor_height);

    let gutter = app.editor.line_count().to_string().len();
    let scroll = app.editor.scroll();
    let gutter_style = Style::default().fg(Color::DarkGray);

    let lines: Vec<Line> = app
        .editor
        .lines()
        .iter()
        .enumerate()
        .skip(scroll)
        .take(height)
        .map(|(i, text)| {
            let mut spans = vec![Span::styled(format!("{:>gutter$} ", i + 1), gutter_style)];
            spans.extend(
                tokenize(text)
                    .into_iter()
                    .map(|(kind, s)| Span::styled(s.to_string(), token_style(kind))),
            );
            Line::from(spans)
        })
        .collect();

    let focused = app.focus == Focus::Editor;
    let paragraph = Paragraph::new(Text::from(lines)).block(pane_block("Code", focused));
    frame.render_widget(paragraph, area);

    if focused && app.active_prompt().is_none() && !app.show_help {
        let cursor = app.editor.cursor();
        let col = (gutter + 1 + app.editor.cursor_display_col()) as u16;
        let x = (area.x + 1 + col).min(area.right().saturating_sub(2));
        let y = area.y + 1 + (cursor.line - scroll) as u16;
        frame.set_cursor_position((x, y));
    }
}

/// Render the output sink, pinned to the newest line unless scrolled
fn render_output(frame: &mut Frame, app: &App, area: Rect) {
    let width = area.width.saturating_sub(2) as usize; // Account for borders
    let available_height = area.height.saturating_sub(2) as usize;

    // Wrapped here rather than by the paragraph so scrolling counts screen rows.
    let lines: Vec<Line> = app
        .output
        .lines()
        .flat_map(|l| wrap_to_width(l, width))
        .map(Line::from)
        .collect();
    let total_lines = lines.len();

    let title = if app.output.scroll_offset() > 0 {
        format!("Output (scrolled {} up)", app.output.scroll_offset())
    } else {
        "Output".to_string()
    };

    let mut paragraph = Paragraph::new(Text::from(lines)).block(pane_block(&title, false));

    if total_lines > available_height {
        let max_scroll = total_lines.saturating_sub(available_height);
        let offset = app.output.scroll_offset().min(max_scroll);
        paragraph = paragraph.scroll(((max_scroll - offset) as u16, 0));
    }

    frame.render_widget(paragraph, area);
}

/// Split `line` into rows no wider than `width` display columns.
fn wrap_to_width(line: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut rows = Vec::new();
    let mut row = String::new();
    let mut used = 0;
    for c in line.chars() {
        let w = UnicodeWidthChar::width(c).unwrap_or(0);
        if used + w > width && !row.is_empty() {
            rows.push(std::mem::take(&mut row));
            used = 0;
        }
        row.push(c);
        used += w;
    }
    rows.push(row);
    rows
}

/// Render the collapsible snippet list
fn render_toolbox(frame: &mut Frame, app: &App, area: Rect) {
    let focused = app.focus == Focus::Toolbox;
    let height = area.height.saturating_sub(2) as usize;
    let selected = app.toolbox.selected();
    let first = (selected + 1).saturating_sub(height.max(1));

    let sections = app.toolbox.sections();
    let lines: Vec<Line> = app
        .toolbox
        .rows()
        .into_iter()
        .enumerate()
        .skip(first)
        .take(height)
        .map(|(pos, row)| {
            let (text, base) = match row {
                Row::Section(i) => {
                    let marker = if sections[i].open { "▾" } else { "▸" };
                    (
                        format!("{marker} {}", sections[i].title),
                        Style::default().add_modifier(Modifier::BOLD),
                    )
                }
                Row::Snippet(i, j) => (format!("    {}", sections[i].snippets[j].label), Style::default()),
            };
            let style = if focused && pos == selected {
                base.add_modifier(Modifier::REVERSED)
            } else {
                base
            };
            Line::from(Span::styled(text, style))
        })
        .collect();

    let paragraph = Paragraph::new(Text::from(lines)).block(pane_block("Toolbox", focused));
    frame.render_widget(paragraph, area);
}

fn render_variables(frame: &mut Frame, app: &App, area: Rect) {
    let paragraph = Paragraph::new(app.variables.as_str())
        .block(pane_block("Variables", false))
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

/// Render the status bar
fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let status_style = match app.status {
        RunStatus::Error => Style::default().bg(Color::Red).fg(Color::White),
        RunStatus::Running | RunStatus::Loading => Style::default().bg(Color::Blue).fg(Color::White),
        RunStatus::Ready | RunStatus::Done => Style::default().bg(Color::Green).fg(Color::Black),
    };
    let run = if app.run_enabled { "F5 run" } else { "run disabled" };

    let mut spans = vec![Span::styled(format!(" {} ", app.status), status_style)];
    if let Some(version) = &app.runtime_version {
        spans.push(Span::raw(format!(" Python {version} |")));
    }
    spans.push(Span::raw(format!(" {run} | F1 help")));
    if !app.message.is_empty() {
        spans.push(Span::raw(format!(" | {}", app.message)));
    }

    let status_paragraph =
        Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::DarkGray).fg(Color::White));

    frame.render_widget(status_paragraph, area);
}

/// Render a single-line prompt popup
fn render_prompt(frame: &mut Frame, prompt: &Prompt) {
    let area = centered_rect(60, 20, frame.area());
    let popup_area = Rect {
        height: area.height.min(3),
        ..area
    };

    frame.render_widget(Clear, popup_area);
    let paragraph = Paragraph::new(prompt.value.as_str()).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!("{} (Enter to confirm, Esc to cancel)", prompt.title))
            .title_style(Style::default().fg(Color::Yellow)),
    );
    frame.render_widget(paragraph, popup_area);

    let x = (popup_area.x + 1 + prompt.value.width() as u16).min(popup_area.right().saturating_sub(2));
    frame.set_cursor_position((x, popup_area.y + 1));
}

/// Render help overlay
fn render_help_overlay(frame: &mut Frame) {
    let area = frame.area();

    // Create centered popup area
    let popup_area = centered_rect(70, 70, area);

    // Clear the background
    frame.render_widget(Clear, popup_area);

    let help_lines = vec![
        Line::from("Glide Help"),
        Line::from(""),
        Line::from("Running:"),
        Line::from("  F5 / Ctrl+R      - Run the code"),
        Line::from("  Ctrl+L           - Clear output"),
        Line::from("  Ctrl+S           - Download as .py"),
        Line::from("  F6 / F7 / F8     - Step / run to end / stop (not available)"),
        Line::from(""),
        Line::from("Navigation:"),
        Line::from("  F2 / Ctrl+T      - Switch between editor and toolbox"),
        Line::from("  Ctrl+↑ / Ctrl+↓  - Scroll output"),
        Line::from("  Enter (toolbox)  - Open section or insert snippet"),
        Line::from("  Tab / Shift+Tab  - Indent / dedent"),
        Line::from("  F1               - Toggle this help"),
        Line::from("  Ctrl+Q / Ctrl+C  - Quit"),
    ];

    let help_paragraph = Paragraph::new(Text::from(help_lines))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Help")
                .title_style(
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD),
                ),
        )
        .wrap(Wrap { trim: true });

    frame.render_widget(help_paragraph, popup_area);
}

/// Helper function to create a centered rectangle
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
