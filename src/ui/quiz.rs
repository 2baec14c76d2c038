//! Quiz tab: reading passage, questions and results

use std::ops::Range;

use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use super::layout::{draw_scrollbar, hint_line, wrapped};
use crate::app::state::QuizCursor;
use crate::session::{ExerciseView, OptionMark, QuizResult};
use crate::theme::Theme;

/// Rendered quiz plus the line range of each question
struct Rendered {
    lines: Vec<Line<'static>>,
    questions: Vec<Range<usize>>,
}

fn option_symbol(mark: OptionMark) -> &'static str {
    match mark {
        OptionMark::Idle | OptionMark::Dimmed => "○",
        OptionMark::Selected => "●",
        OptionMark::Correct => "✓",
        OptionMark::Wrong => "✗",
    }
}

fn option_style(mark: OptionMark, theme: &Theme) -> Style {
    match mark {
        OptionMark::Idle => Style::default().fg(theme.fg_secondary),
        OptionMark::Selected => {
            Style::default().fg(theme.accent_primary).add_modifier(Modifier::BOLD)
        }
        OptionMark::Correct => Style::default().fg(theme.success).add_modifier(Modifier::BOLD),
        OptionMark::Wrong => Style::default().fg(theme.error),
        OptionMark::Dimmed => Style::default().fg(theme.fg_muted),
    }
}

fn result_card(result: QuizResult, theme: &Theme) -> Vec<Line<'static>> {
    let color = theme.score_color(result.band());
    vec![
        Line::from(Span::styled(
            "Resultado",
            Style::default().fg(theme.fg_primary).add_modifier(Modifier::BOLD),
        )),
        Line::from(vec![
            Span::styled(
                format!("  {}/{}", result.score, result.total),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ),
            Span::styled(format!("  ({}%)", result.percentage()), Style::default().fg(color)),
        ]),
        Line::from(Span::styled(
            format!("  {}", result.message().text()),
            Style::default().fg(theme.fg_secondary),
        )),
        hint_line(&[("n", "Novo Exercício")], theme),
        Line::from(""),
    ]
}

fn build(view: &ExerciseView, cursor: &QuizCursor, width: usize, theme: &Theme) -> Rendered {
    let exercise = &view.exercise;
    let quiz = &view.quiz;
    let submitted = quiz.is_submitted();
    let mut lines = Vec::new();

    if let Some(result) = quiz.result() {
        lines.extend(result_card(result, theme));
    }

    lines.extend(wrapped(
        &exercise.instructions,
        width,
        "",
        Style::default().fg(theme.fg_muted).add_modifier(Modifier::ITALIC),
    ));
    lines.push(Line::from(""));

    let paragraphs = exercise.reading_paragraphs();
    if !paragraphs.is_empty() {
        let speak = if cursor.speaking.is_some() { "♪ Parar" } else { "Ouvir" };
        lines.push(Line::from(vec![
            Span::styled(
                "Leia com atenção",
                Style::default().fg(theme.accent_primary).add_modifier(Modifier::BOLD),
            ),
            Span::raw("   "),
            Span::styled(format!("[s] {}", speak), Style::default().fg(theme.accent_secondary)),
        ]));
        for (i, paragraph) in paragraphs.iter().enumerate() {
            if i > 0 {
                lines.push(Line::from(Span::styled("  │", Style::default().fg(theme.border))));
            }
            let style = Style::default().fg(theme.fg_primary);
            lines.extend(wrapped(paragraph, width, "  │ ", style));
        }
        lines.push(Line::from(""));
    }

    let mut questions = Vec::with_capacity(exercise.questions.len());
    for (qi, question) in exercise.questions.iter().enumerate() {
        let start = lines.len();
        let current = qi == cursor.question;
        let number_style = if current && !submitted {
            Style::default().fg(theme.accent_primary).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.fg_primary).add_modifier(Modifier::BOLD)
        };
        lines.extend(wrapped(
            &format!("{}. {}", qi + 1, question.question_text),
            width,
            if current { "▌ " } else { "  " },
            number_style,
        ));

        for (oi, option) in question.options.iter().enumerate() {
            let mark = quiz.option_mark(question, oi);
            let mut style = option_style(mark, theme);
            if current && !submitted && oi == cursor.option {
                style = style.bg(theme.selection);
            }
            let letter = (b'a' + oi as u8) as char;
            lines.push(Line::from(vec![
                Span::raw("    "),
                Span::styled(format!("{} {}) {}", option_symbol(mark), letter, option), style),
            ]));
        }

        if submitted {
            lines.push(Line::from(Span::styled(
                "    Explicação:",
                Style::default().fg(theme.info).add_modifier(Modifier::BOLD),
            )));
            lines.extend(wrapped(
                &question.explanation_pt,
                width,
                "    ",
                Style::default().fg(theme.fg_secondary),
            ));
        }
        questions.push(start..lines.len());
        lines.push(Line::from(""));
    }

    Rendered { lines, questions }
}

/// Draw the quiz tab
pub fn draw(
    frame: &mut Frame,
    area: Rect,
    view: &ExerciseView,
    cursor: &mut QuizCursor,
    theme: &Theme,
) {
    let [body, hints] = Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(area);
    let [text_area, bar_area] =
        Layout::horizontal([Constraint::Min(1), Constraint::Length(1)]).areas(body);

    let rendered = build(view, cursor, text_area.width as usize, theme);
    cursor.scroll.total_lines = rendered.lines.len();
    cursor.scroll.visible_height = text_area.height as usize;
    if !view.quiz.is_submitted() {
        if let Some(range) = rendered.questions.get(cursor.question) {
            cursor.scroll.reveal(range.start, range.end);
        }
    }

    let offset = cursor.scroll.offset;
    frame.render_widget(Paragraph::new(rendered.lines).scroll((offset as u16, 0)), text_area);
    draw_scrollbar(frame, bar_area, offset, cursor.scroll.total_lines, theme);

    let hint = if view.quiz.is_submitted() {
        hint_line(&[("n", "Novo Exercício"), ("Tab", "Explicação"), ("Esc", "Voltar")], theme)
    } else {
        let progress = format!(
            "Verificar Respostas ({}/{})",
            view.quiz.answered_count(),
            view.exercise.questions.len()
        );
        let submit_key = if view.quiz.can_submit(&view.exercise) { "S" } else { "-" };
        let keys = [
            ("a-d", "Responder"),
            ("h/l", "Pergunta"),
            (submit_key, progress.as_str()),
            ("Tab", "Explicação"),
        ];
        hint_line(&keys, theme)
    };
    frame.render_widget(Paragraph::new(hint), hints);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Level, Skill, find_topic};
    use crate::content::ExerciseSet;
    use crate::content::exercise::fixtures;
    use crate::session::{QuizState, Tab};
    use pretty_assertions::assert_eq;

    fn view(exercise: ExerciseSet) -> ExerciseView {
        ExerciseView {
            level: Level::B1,
            skill: Skill::Grammar,
            topic: find_topic("modals").unwrap(),
            exercise,
            tab: Tab::Quiz,
            quiz: QuizState::default(),
        }
    }

    fn text(lines: &[Line]) -> Vec<String> {
        lines.iter().map(|l| l.spans.iter().map(|s| s.content.as_ref()).collect()).collect()
    }

    #[test]
    fn questions_list_four_lettered_options() {
        let v = view(fixtures::exercise(5));
        let rendered = build(&v, &QuizCursor::default(), 80, &Theme::default());
        assert_eq!(rendered.questions.len(), 5);

        let first = text(&rendered.lines[rendered.questions[0].clone()]);
        assert!(first[0].starts_with("▌ 1. Question 1"));
        assert_eq!(
            &first[1..],
            ["    ○ a) must", "    ○ b) can", "    ○ c) might", "    ○ d) would"]
        );
    }

    #[test]
    fn reading_passage_comes_before_questions() {
        let mut v = view(fixtures::reading_exercise());
        v.skill = Skill::Reading;
        let rendered = build(&v, &QuizCursor::default(), 80, &Theme::default());
        let lines = text(&rendered.lines);

        let heading = lines.iter().position(|l| l.starts_with("Leia com atenção")).unwrap();
        let passage = lines.iter().position(|l| l.contains("Maria lives in Lisbon.")).unwrap();
        assert!(heading < passage);
        assert!(passage < rendered.questions[0].start);
    }

    #[test]
    fn submitted_quiz_shows_result_marks_and_explanations() {
        let mut v = view(fixtures::exercise(5));
        for q in v.exercise.questions.clone() {
            // Always pick "must"; only question 1 has it as the answer
            v.quiz.answer(&v.exercise, q.id, 0).unwrap();
        }
        v.quiz.submit(&v.exercise).unwrap();

        let rendered = build(&v, &QuizCursor::default(), 80, &Theme::default());
        let lines = text(&rendered.lines);
        assert_eq!(lines[0], "Resultado");
        assert_eq!(lines[1], "  1/5  (20%)");
        assert_eq!(lines[2], "  Continue praticando! 💪");

        let second = text(&rendered.lines[rendered.questions[1].clone()]);
        assert!(second.contains(&"    ✗ a) must".to_string()));
        assert!(second.contains(&"    ✓ b) can".to_string()));
        assert!(second.contains(&"    Explicação:".to_string()));
    }

    #[test]
    fn selected_option_is_filled() {
        let mut v = view(fixtures::exercise(5));
        v.quiz.answer(&v.exercise, 1, 2).unwrap();
        let rendered = build(&v, &QuizCursor::default(), 80, &Theme::default());
        let first = text(&rendered.lines[rendered.questions[0].clone()]);
        assert_eq!(first[3], "    ● c) might");
    }
}
