//! Lesson tab: explanation sections with speakable items

use std::ops::Range;

use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use super::layout::{draw_scrollbar, hint_line, wrapped};
use crate::app::state::{LessonCursor, LessonItem};
use crate::content::Lesson;
use crate::theme::Theme;

/// Rendered lesson plus the line range each focusable item occupies
struct Rendered {
    lines: Vec<Line<'static>>,
    ranges: Vec<Range<usize>>,
}

fn heading(text: &str, theme: &Theme) -> Line<'static> {
    Line::from(Span::styled(
        text.to_string(),
        Style::default().fg(theme.accent_primary).add_modifier(Modifier::BOLD),
    ))
}

fn build(lesson: &Lesson, cursor: &LessonCursor, width: usize, theme: &Theme) -> Rendered {
    let items = LessonItem::all(lesson);
    let mut out = Rendered {
        lines: vec![heading("Explicação do Tópico", theme), Line::from("")],
        ranges: Vec::with_capacity(items.len()),
    };

    for (i, item) in items.iter().enumerate() {
        let focused = i == cursor.focus;
        let marker = if focused { "▌ " } else { "  " };
        let body_style = if focused {
            Style::default().fg(theme.fg_primary)
        } else {
            Style::default().fg(theme.fg_secondary)
        };

        // Headings that belong to the item but are not part of its text
        match *item {
            LessonItem::Section(s) => {
                if let Some(section) = lesson.sections.get(s) {
                    out.lines.push(heading(&section.title, theme));
                }
            }
            LessonItem::Example { example: 0, .. } => {
                out.lines.push(Line::from(Span::styled(
                    "  Exemplos",
                    Style::default().fg(theme.fg_muted).add_modifier(Modifier::ITALIC),
                )));
            }
            LessonItem::StartQuiz => out.lines.push(Line::from("")),
            _ => {}
        }

        let start = out.lines.len();
        match *item {
            LessonItem::StartQuiz => {
                let style = if focused {
                    Style::default().fg(theme.bg_primary).bg(theme.accent_primary)
                } else {
                    Style::default().fg(theme.accent_primary)
                };
                let label = " Ir para os Exercícios → ";
                out.lines.push(Line::from(vec![
                    Span::raw(marker),
                    Span::styled(label, style.add_modifier(Modifier::BOLD)),
                ]));
            }
            LessonItem::Example { .. } => {
                let text = item.speech(lesson).map(|(t, _)| t).unwrap_or_default();
                let style = body_style.fg(theme.info);
                out.lines.extend(wrapped(&format!("• {}", text), width, marker, style));
            }
            _ => {
                let text = item.speech(lesson).map(|(t, _)| t).unwrap_or_default();
                out.lines.extend(wrapped(text, width, marker, body_style));
            }
        }
        if cursor.is_speaking(*item) {
            out.lines.push(Line::from(Span::styled(
                "    ♪ Ouvindo...  [s] Parar",
                Style::default().fg(theme.success),
            )));
        }
        out.ranges.push(start..out.lines.len());

        // Spacing after each paragraph
        if matches!(item, LessonItem::Intro | LessonItem::Section(_)) {
            out.lines.push(Line::from(""));
        }
    }

    out
}

/// Draw the lesson tab
pub fn draw(
    frame: &mut Frame,
    area: Rect,
    lesson: &Lesson,
    cursor: &mut LessonCursor,
    theme: &Theme,
) {
    let [body, hints] = Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(area);
    let [text_area, bar_area] =
        Layout::horizontal([Constraint::Min(1), Constraint::Length(1)]).areas(body);

    let rendered = build(lesson, cursor, text_area.width as usize, theme);
    cursor.scroll.total_lines = rendered.lines.len();
    cursor.scroll.visible_height = text_area.height as usize;
    if let Some(range) = rendered.ranges.get(cursor.focus) {
        cursor.scroll.reveal(range.start, range.end);
    }

    let offset = cursor.scroll.offset;
    frame.render_widget(Paragraph::new(rendered.lines).scroll((offset as u16, 0)), text_area);
    draw_scrollbar(frame, bar_area, offset, cursor.scroll.total_lines, theme);

    let speak_label = match LessonItem::all(lesson).get(cursor.focus) {
        Some(item) if cursor.is_speaking(*item) => "Parar",
        _ => "Ouvir",
    };
    let keys = [
        ("j/k", "Mover"),
        ("s", speak_label),
        ("Tab", "Exercícios"),
        ("Esc", "Voltar para tópicos"),
    ];
    frame.render_widget(Paragraph::new(hint_line(&keys, theme)), hints);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::exercise::fixtures;
    use crate::speech::UtteranceId;
    use pretty_assertions::assert_eq;

    fn text(lines: &[Line]) -> Vec<String> {
        lines.iter().map(|l| l.spans.iter().map(|s| s.content.as_ref()).collect()).collect()
    }

    #[test]
    fn every_item_gets_a_range() {
        let lesson = fixtures::exercise(5).lesson;
        let rendered = build(&lesson, &LessonCursor::default(), 80, &Theme::default());
        assert_eq!(rendered.ranges.len(), LessonItem::all(&lesson).len());
        assert!(rendered.ranges.windows(2).all(|w| w[0].end <= w[1].start));
    }

    #[test]
    fn focused_item_is_marked() {
        let lesson = fixtures::exercise(5).lesson;
        let cursor = LessonCursor { focus: 1, ..Default::default() };
        let rendered = build(&lesson, &cursor, 80, &Theme::default());
        let lines = text(&rendered.lines);

        let section = &lines[rendered.ranges[1].clone()];
        assert!(section[0].starts_with("▌ Use 'can'"));
        let intro = &lines[rendered.ranges[0].clone()];
        assert!(intro[0].starts_with("  Os verbos modais"));
    }

    #[test]
    fn speaking_item_shows_indicator() {
        let lesson = fixtures::exercise(5).lesson;
        let item = LessonItem::Example { section: 0, example: 0 };
        let cursor = LessonCursor {
            focus: 2,
            speaking: Some((UtteranceId::for_tests(1), item)),
            ..Default::default()
        };
        let rendered = build(&lesson, &cursor, 80, &Theme::default());
        let lines = text(&rendered.lines[rendered.ranges[2].clone()]);
        assert_eq!(lines.last().map(String::as_str), Some("    ♪ Ouvindo...  [s] Parar"));
    }

    #[test]
    fn focus_on_last_item_scrolls_down() {
        let lesson = fixtures::exercise(5).lesson;
        let last = LessonItem::all(&lesson).len() - 1;
        let mut cursor = LessonCursor { focus: last, ..Default::default() };
        let mut terminal =
            ratatui::Terminal::new(ratatui::backend::TestBackend::new(60, 6)).unwrap();
        terminal.draw(|f| draw(f, f.area(), &lesson, &mut cursor, &Theme::default())).unwrap();
        assert!(cursor.scroll.offset > 0);
    }
}
