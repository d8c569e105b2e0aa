use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};
use unicode_width::UnicodeWidthChar;

use crate::app::{Model, StatusLevel};
use crate::nav::{Column, Seg};

use super::{COLUMN_WIDTHS, level_label};

/// Render the complete UI: the column strip plus the bottom bar.
pub fn render(model: &Model, frame: &mut Frame) {
    let area = frame.area();
    let rows = Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).split(area);

    let columns = Layout::horizontal(COLUMN_WIDTHS.map(Constraint::Percentage)).split(rows[0]);
    for (i, col) in model.nav.columns().iter().enumerate() {
        let focused = i == model.nav.focused_index();
        render_column(frame, columns[i], col, focused);
    }

    render_bottom_bar(model, frame, rows[1]);
}

fn render_column(frame: &mut Frame, area: Rect, col: &Column, focused: bool) {
    let title_style = if focused {
        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .title(Span::styled(level_label(col.level), title_style));

    let content_width = area.width.saturating_sub(2);
    let items: Vec<ListItem> = col
        .entries()
        .iter()
        .map(|entry| ListItem::new(entry_line(&entry.seg, &entry.text, content_width)))
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().bg(Color::Blue).add_modifier(Modifier::BOLD));

    let mut state = ListState::default().with_selected(Some(col.selected()));
    frame.render_stateful_widget(list, area, &mut state);
}

/// Object entries get their key prefix bolded; everything else renders as
/// a plain truncated line.
fn entry_line(seg: &Seg, text: &str, width: u16) -> Line<'static> {
    let text = truncate(text, width);
    if let Seg::Key(key) = seg {
        let prefix = format!("{key}: ");
        if let Some(rest) = text.strip_prefix(&prefix) {
            return Line::from(vec![
                Span::styled(prefix.clone(), Style::default().add_modifier(Modifier::BOLD)),
                Span::raw(rest.to_string()),
            ]);
        }
    }
    Line::raw(text)
}

fn render_bottom_bar(model: &Model, frame: &mut Frame, area: Rect) {
    if let Some(prompt) = &model.prompt {
        let (text, style) = match &prompt.error {
            Some(error) => (
                format!(" {}: {}  [{error}]", prompt.kind.label(), prompt.buffer),
                Style::default().bg(Color::Red).fg(Color::White),
            ),
            None => (
                format!(" {}: {}_", prompt.kind.label(), prompt.buffer),
                Style::default().bg(Color::Blue).fg(Color::White),
            ),
        };
        frame.render_widget(Paragraph::new(text).style(style), area);
        return;
    }

    if let Some((message, level)) = model.active_status() {
        let (prefix, style) = match level {
            StatusLevel::Info => (
                "[info]",
                Style::default().bg(Color::DarkGray).fg(Color::White),
            ),
            StatusLevel::Warning => (
                "[warn]",
                Style::default().bg(Color::Yellow).fg(Color::Black),
            ),
            StatusLevel::Error => ("[error]", Style::default().bg(Color::Red).fg(Color::White)),
        };
        let bar = Paragraph::new(format!(" {prefix} {message}")).style(style);
        frame.render_widget(bar, area);
        return;
    }

    let breadcrumb = model.nav.breadcrumb();
    let status = format!(
        " {}  q:quit  /:filter  i:insert  d:delete  r:reload",
        if breadcrumb.is_empty() { "-" } else { &breadcrumb }
    );
    let bar = Paragraph::new(status).style(Style::default().bg(Color::DarkGray).fg(Color::White));
    frame.render_widget(bar, area);
}

fn truncate(text: &str, max_width: u16) -> String {
    let max = max_width as usize;
    let mut width = 0usize;
    let mut out = String::new();
    for ch in text.chars() {
        let w = UnicodeWidthChar::width(ch).unwrap_or(0);
        if width + w > max.saturating_sub(1) {
            out.push('…');
            return out;
        }
        width += w;
        out.push(ch);
    }
    out
}
