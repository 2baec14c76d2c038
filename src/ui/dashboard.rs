//! Dashboard: breadcrumbs, selection lists, generation and exercise views

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs, Wrap},
};

use super::{command_line, layout, lesson, quiz};
use crate::app::state::AppState;
use crate::catalog::{Level, Skill, Topic};
use crate::session::{Tab, View};
use crate::theme::Theme;

const SPINNER: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Draw the dashboard screen
pub fn draw(frame: &mut Frame, state: &mut AppState, theme: &Theme) {
    let area = frame.area();
    layout::fill_background(frame, area, theme);

    let [header, body, command_area] =
        Layout::vertical([Constraint::Length(2), Constraint::Min(3), Constraint::Length(1)])
            .areas(area);

    draw_header(frame, header, state, theme);
    let body = Rect { x: body.x + 1, width: body.width.saturating_sub(2), ..body };

    let spinner = (state.landing_animation.start_time.elapsed().as_millis() / 80) as usize;
    let AppState { session, list, lesson: lesson_cursor, quiz: quiz_cursor, .. } = &mut *state;
    match session.view() {
        View::LevelSelect => {
            let rows = level_rows(theme);
            draw_list(frame, body, "Escolha o seu Nível", None, &rows, list.selected, theme);
        }
        View::SkillSelect { level } => {
            let subtitle = format!("Nível {} · {}", level.code(), level.label());
            draw_list(
                frame,
                body,
                "O que você quer praticar?",
                Some(&subtitle),
                &skill_rows(theme),
                list.selected,
                theme,
            );
        }
        View::TopicSelect { skill, error, .. } => {
            let [error_area, list_area] = Layout::vertical([
                Constraint::Length(if error.is_some() { 3 } else { 0 }),
                Constraint::Min(1),
            ])
            .areas(body);
            if let Some(message) = error {
                draw_error(frame, error_area, message, theme);
            }
            let title = format!("Tópicos de {}", skill.label());
            let rows = topic_rows(&session.topics(), theme);
            draw_list(frame, list_area, &title, None, &rows, list.selected, theme);
        }
        View::Generating { ticket } => {
            draw_generating(frame, body, ticket.level, spinner, theme);
        }
        View::Exercise(ex) => {
            let [title_area, tabs_area, content_area] = Layout::vertical([
                Constraint::Length(1),
                Constraint::Length(2),
                Constraint::Min(1),
            ])
            .areas(body);

            let title = Line::from(vec![
                level_badge(ex.level, theme),
                Span::raw(" "),
                Span::styled(
                    ex.exercise.title.clone(),
                    Style::default().fg(theme.fg_primary).add_modifier(Modifier::BOLD),
                ),
            ]);
            frame.render_widget(Paragraph::new(title), title_area);
            draw_tabs(frame, tabs_area, ex.tab, theme);

            match ex.tab {
                Tab::Lesson => {
                    lesson::draw(frame, content_area, &ex.exercise.lesson, lesson_cursor, theme)
                }
                Tab::Quiz => quiz::draw(frame, content_area, ex, quiz_cursor, theme),
            }
        }
    }

    command_line::draw(frame, command_area, &state.command_line, theme);
}

fn draw_header(frame: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    let mut spans = vec![Span::styled(
        " FalaFluente ",
        Style::default()
            .fg(theme.bg_primary)
            .bg(theme.accent_primary)
            .add_modifier(Modifier::BOLD),
    )];
    for (i, crumb) in state.session.breadcrumbs().into_iter().enumerate() {
        spans.push(Span::styled(
            if i == 0 { "  " } else { " › " },
            Style::default().fg(theme.fg_muted),
        ));
        spans.push(Span::styled(crumb, Style::default().fg(theme.fg_secondary)));
    }

    let [left, right] =
        Layout::horizontal([Constraint::Min(1), Constraint::Length(16)]).areas(area);
    frame.render_widget(
        Paragraph::new(Line::from(spans)).block(
            Block::default()
                .borders(Borders::BOTTOM)
                .border_style(Style::default().fg(theme.border)),
        ),
        left,
    );

    let (status, color) = if state.has_api_key {
        ("● IA pronta", theme.success)
    } else {
        ("○ sem chave API", theme.warning)
    };
    frame.render_widget(
        Paragraph::new(Span::styled(status, Style::default().fg(color)))
            .alignment(Alignment::Right)
            .block(
                Block::default()
                    .borders(Borders::BOTTOM)
                    .border_style(Style::default().fg(theme.border)),
            ),
        right,
    );
}

fn level_badge(level: Level, theme: &Theme) -> Span<'static> {
    Span::styled(
        format!(" {} ", level.code()),
        Style::default()
            .fg(theme.bg_primary)
            .bg(theme.level_color(level))
            .add_modifier(Modifier::BOLD),
    )
}

/// One selectable row: label spans and an optional description
type Row = (Vec<Span<'static>>, Option<&'static str>);

fn level_rows(theme: &Theme) -> Vec<Row> {
    Level::all()
        .iter()
        .map(|&level| {
            let label =
                Span::styled(format!(" {}", level.label()), Style::default().fg(theme.fg_primary));
            (vec![level_badge(level, theme), label], None)
        })
        .collect()
}

fn skill_rows(theme: &Theme) -> Vec<Row> {
    Skill::offered()
        .iter()
        .map(|skill| {
            let label = Span::styled(skill.label(), Style::default().fg(theme.fg_primary));
            (vec![label], Some(skill.description()))
        })
        .collect()
}

fn topic_rows(topics: &[Topic], theme: &Theme) -> Vec<Row> {
    topics
        .iter()
        .map(|topic| {
            let label = Span::styled(topic.name, Style::default().fg(theme.fg_primary));
            (vec![label], Some(topic.description))
        })
        .collect()
}

fn draw_list(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    subtitle: Option<&str>,
    rows: &[Row],
    selected: usize,
    theme: &Theme,
) {
    let mut lines = vec![Line::from(Span::styled(
        title.to_string(),
        Style::default().fg(theme.accent_primary).add_modifier(Modifier::BOLD),
    ))];
    if let Some(subtitle) = subtitle {
        lines.push(Line::from(Span::styled(
            subtitle.to_string(),
            Style::default().fg(theme.fg_muted),
        )));
    }
    lines.push(Line::from(""));

    let mut selected_line = 0;
    for (i, (label, description)) in rows.iter().enumerate() {
        let is_selected = i == selected;
        if is_selected {
            selected_line = lines.len();
        }
        let mut spans = vec![Span::styled(
            if is_selected { " ▶ " } else { "   " },
            Style::default().fg(theme.accent_primary),
        )];
        let emphasis = if is_selected {
            Style::default().add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        spans.extend(label.iter().cloned().map(|span| span.patch_style(emphasis)));
        let mut line = Line::from(spans);
        if is_selected {
            line = line.style(Style::default().bg(theme.selection));
        }
        lines.push(line);
        if let Some(description) = description {
            lines.push(Line::from(Span::styled(
                format!("     {}", description),
                Style::default().fg(theme.fg_muted),
            )));
        }
        lines.push(Line::from(""));
    }

    let keys = [("Enter", "Escolher"), ("Esc", "Voltar"), ("L", "Mudar nível"), ("?", "Ajuda")];
    lines.push(layout::hint_line(&keys, theme));

    // Keep the selection in view on short terminals
    let height = area.height as usize;
    let offset = (selected_line + 3).saturating_sub(height);
    frame.render_widget(Paragraph::new(lines).scroll((offset as u16, 0)), area);
}

fn draw_error(frame: &mut Frame, area: Rect, message: &str, theme: &Theme) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.error));
    frame.render_widget(
        Paragraph::new(Span::styled(format!("⚠ {}", message), Style::default().fg(theme.error)))
            .block(block)
            .wrap(Wrap { trim: true }),
        area,
    );
}

fn draw_generating(frame: &mut Frame, area: Rect, level: Level, spinner: usize, theme: &Theme) {
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("{} Preparando sua aula...", SPINNER[spinner % SPINNER.len()]),
            Style::default().fg(theme.accent_primary).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            format!(
                "A IA está gerando uma explicação detalhada e exercícios exclusivos para o nível {}",
                level.code()
            ),
            Style::default().fg(theme.fg_secondary),
        )),
        Line::from(""),
        layout::hint_line(&[("Esc", "Cancelar")], theme),
    ];
    let area = layout::centered_rect(80, 60, area);
    frame.render_widget(
        Paragraph::new(lines).alignment(Alignment::Center).wrap(Wrap { trim: true }),
        area,
    );
}

fn draw_tabs(frame: &mut Frame, area: Rect, tab: Tab, theme: &Theme) {
    let selected = match tab {
        Tab::Lesson => 0,
        Tab::Quiz => 1,
    };
    let tabs = Tabs::new(["Explicação", "Exercícios"])
        .select(selected)
        .style(Style::default().fg(theme.fg_muted))
        .highlight_style(
            Style::default()
                .fg(theme.accent_primary)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        )
        .divider("│")
        .block(
            Block::default()
                .borders(Borders::BOTTOM)
                .border_style(Style::default().fg(theme.border)),
        );
    frame.render_widget(tabs, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::find_topic;
    use crate::content::GenerationError;
    use crate::content::exercise::fixtures;
    use ratatui::{Terminal, backend::TestBackend};

    fn render(state: &mut AppState) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 40)).unwrap();
        terminal.draw(|f| draw(f, state, &Theme::default())).unwrap();
        let buffer = terminal.backend().buffer();
        let width = buffer.area.width as usize;
        buffer
            .content()
            .chunks(width)
            .map(|row| row.iter().map(|c| c.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn level_select_lists_every_level() {
        let mut state = AppState::default();
        let screen = render(&mut state);
        assert!(screen.contains("Escolha o seu Nível"));
        for level in Level::all() {
            assert!(screen.contains(level.label()), "missing {}", level.label());
        }
        assert!(screen.contains("sem chave API"));
    }

    #[test]
    fn topic_select_shows_breadcrumbs_and_error() {
        let mut state = AppState::default();
        state.session.choose_level(Level::B1).unwrap();
        state.session.choose_skill(Skill::Grammar).unwrap();
        let ticket = state.session.choose_topic(find_topic("modals").unwrap()).unwrap();
        state.session.resolve(ticket.id, Err(GenerationError::EmptyResponse));

        let screen = render(&mut state);
        assert!(screen.contains("Níveis › B1 › Grammar"));
        assert!(screen.contains("Tópicos de Gramática"));
        assert!(screen.contains("Não foi possível gerar o exercício"));
        assert!(screen.contains("Modal Verbs"));
    }

    #[test]
    fn generating_names_the_level() {
        let mut state = AppState::default();
        state.session.choose_level(Level::C1).unwrap();
        state.session.choose_skill(Skill::Vocabulary).unwrap();
        state.session.choose_topic(find_topic("travel").unwrap()).unwrap();

        let screen = render(&mut state);
        assert!(screen.contains("Preparando sua aula..."));
        assert!(screen.contains("C1"));
    }

    #[test]
    fn exercise_shows_title_and_tabs() {
        let mut state = AppState::default();
        state.session.choose_level(Level::B1).unwrap();
        state.session.choose_skill(Skill::Grammar).unwrap();
        let ticket = state.session.choose_topic(find_topic("modals").unwrap()).unwrap();
        state.session.resolve(ticket.id, Ok(fixtures::exercise(5)));

        let screen = render(&mut state);
        assert!(screen.contains("Modal Verbs in Action"));
        assert!(screen.contains("Explicação"));
        assert!(screen.contains("Exercícios"));
        assert!(screen.contains("Explicação do Tópico"));

        state.session.go_to_quiz().unwrap();
        let screen = render(&mut state);
        assert!(screen.contains("a) must"));
    }
}
