//! Layout utilities and common components

use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
};
use textwrap::{Options, wrap};

use crate::theme::Theme;

/// Fill an area with the primary background
pub fn fill_background(frame: &mut Frame, area: Rect, theme: &Theme) {
    frame.render_widget(Paragraph::new("").style(Style::default().bg(theme.bg_primary)), area);
}

/// Create a centered rectangle with the given percentage of width and height
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::vertical([
        Constraint::Percentage((100 - percent_y) / 2),
        Constraint::Percentage(percent_y),
        Constraint::Percentage((100 - percent_y) / 2),
    ])
    .split(r);

    Layout::horizontal([
        Constraint::Percentage((100 - percent_x) / 2),
        Constraint::Percentage(percent_x),
        Constraint::Percentage((100 - percent_x) / 2),
    ])
    .split(popup_layout[1])[1]
}

/// Wrap `text` to `width` columns, prefixing every line with `indent`
///
/// Pre-wrapping (instead of `Paragraph::wrap`) keeps line counts known, so
/// callers can scroll to a given item.
pub fn wrapped(text: &str, width: usize, indent: &str, style: Style) -> Vec<Line<'static>> {
    let width = width.saturating_sub(indent.chars().count()).max(10);
    let options = Options::new(width);
    text.lines()
        .flat_map(|paragraph| {
            if paragraph.trim().is_empty() {
                vec![Line::from("")]
            } else {
                wrap(paragraph, &options)
                    .into_iter()
                    .map(|l| {
                        Line::from(vec![
                            Span::raw(indent.to_string()),
                            Span::styled(l.into_owned(), style),
                        ])
                    })
                    .collect()
            }
        })
        .collect()
}

/// Draw a vertical scrollbar one column wide
pub fn draw_scrollbar(
    frame: &mut Frame,
    area: Rect,
    scroll_offset: usize,
    total_lines: usize,
    theme: &Theme,
) {
    let height = area.height as usize;
    if total_lines <= height || height == 0 {
        return;
    }

    let thumb_height = (height * height).div_ceil(total_lines).max(1);
    let max_scroll = total_lines - height;
    let thumb_top = ((height - thumb_height) * scroll_offset.min(max_scroll)) / max_scroll;

    for i in 0..height {
        let on_thumb = i >= thumb_top && i < thumb_top + thumb_height;
        let (ch, style) = if on_thumb {
            ("█", Style::default().fg(theme.accent_secondary))
        } else {
            ("░", Style::default().fg(theme.bg_tertiary))
        };
        frame.render_widget(
            Paragraph::new(ch).style(style),
            Rect { x: area.x, y: area.y.saturating_add(i as u16), width: 1, height: 1 },
        );
    }
}

/// Keyboard hint line, e.g. `[s] Ouvir  [Tab] Exercícios`
pub fn hint_line(hints: &[(&str, &str)], theme: &Theme) -> Line<'static> {
    let mut spans = Vec::new();
    for (i, (key, label)) in hints.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw("   "));
        }
        spans.push(Span::styled(format!("[{}]", key), Style::default().fg(theme.accent_secondary)));
        spans.push(Span::styled(format!(" {}", label), Style::default().fg(theme.fg_muted)));
    }
    Line::from(spans)
}
