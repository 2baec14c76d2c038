//! Landing screen with typed title and feature cards

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};

use crate::app::state::LandingAnimation;
use crate::theme::Theme;

/// Speech-bubble logo
const LOGO: &[&str] = &[
    "╭──────────────╮",
    "│  Hi!  Olá!   │",
    "╰──┬───────────╯",
    "   ╰╯",
];

const TITLE: &str = "FalaFluente";
const TAGLINE: &str = "Aprenda com a estrutura do quadro europeu (A1-C1) com explicações focadas \
                       nas dificuldades de quem fala português. Exercícios infinitos gerados por IA.";
const PROMPT: &str = "Pressione qualquer tecla para começar...";

/// Feature cards: (heading, body)
const FEATURES: &[(&str, &str)] = &[
    ("Níveis CEFR", "Do básico A1 ao avançado C1, no padrão europeu."),
    ("Exercícios infinitos", "Cada aula e cada quiz são gerados na hora por IA."),
    ("Explicações certeiras", "Foco nos erros de brasileiros, como \"Make\" vs \"Do\"."),
];

/// Title with the not-yet-typed characters padded to keep it centered
fn typed_title(chars: usize) -> String {
    let visible: String = TITLE.chars().take(chars).collect();
    let padding = " ".repeat(TITLE.chars().count() - chars.min(TITLE.chars().count()));
    format!("{}{}", visible, padding)
}

/// Draw the landing screen
pub fn draw(frame: &mut Frame, animation: &LandingAnimation, theme: &Theme) {
    let area = frame.area();
    super::layout::fill_background(frame, area, theme);

    let [logo_area, title_area, tagline_area, features_area, prompt_area] = Layout::vertical([
        Constraint::Length(LOGO.len() as u16 + 1),
        Constraint::Length(2),
        Constraint::Length(4),
        Constraint::Length(6),
        Constraint::Length(2),
    ])
    .flex(ratatui::layout::Flex::Center)
    .areas(area);

    let logo: Vec<Line> = LOGO.iter().map(|l| Line::from(*l)).collect();
    frame.render_widget(
        Paragraph::new(logo)
            .style(Style::default().fg(theme.accent_primary).bg(theme.bg_primary))
            .alignment(Alignment::Center),
        logo_area,
    );

    let title_chars = animation.title_chars(TITLE.chars().count());
    if title_chars > 0 {
        frame.render_widget(
            Paragraph::new(typed_title(title_chars))
                .style(
                    Style::default()
                        .fg(theme.fg_primary)
                        .bg(theme.bg_primary)
                        .add_modifier(Modifier::BOLD),
                )
                .alignment(Alignment::Center),
            title_area,
        );
    }

    if animation.current_frame >= LandingAnimation::TITLE_END_FRAME {
        let tagline_area = super::layout::centered_rect(70, 100, tagline_area);
        frame.render_widget(
            Paragraph::new(TAGLINE)
                .style(Style::default().fg(theme.fg_muted).bg(theme.bg_primary))
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true }),
            tagline_area,
        );
    }

    draw_features(frame, features_area, animation.features_shown(FEATURES.len()), theme);

    // Blinking prompt
    if animation.complete {
        let blink = (animation.start_time.elapsed().as_millis() / 500) % 2 == 0;
        if blink {
            frame.render_widget(
                Paragraph::new(PROMPT)
                    .style(Style::default().fg(theme.fg_muted).bg(theme.bg_primary))
                    .alignment(Alignment::Center),
                prompt_area,
            );
        }
    }
}

fn draw_features(frame: &mut Frame, area: Rect, shown: usize, theme: &Theme) {
    let area = super::layout::centered_rect(90, 100, area);
    let columns = Layout::horizontal([Constraint::Ratio(1, 3); 3]).spacing(1).split(area);

    for (i, ((heading, body), column)) in FEATURES.iter().zip(columns.iter()).enumerate() {
        if i >= shown {
            break;
        }
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.border))
            .style(Style::default().bg(theme.bg_secondary));
        let text = vec![
            Line::from(Span::styled(
                *heading,
                Style::default().fg(theme.accent_primary).add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(*body, Style::default().fg(theme.fg_secondary))),
        ];
        frame.render_widget(
            Paragraph::new(text).block(block).wrap(Wrap { trim: true }),
            *column,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use ratatui::{Terminal, backend::TestBackend};

    #[test]
    fn typed_title_pads_to_full_width() {
        assert_eq!(typed_title(0), "           ");
        assert_eq!(typed_title(4), "Fala       ");
        assert_eq!(typed_title(11), TITLE);
        assert_eq!(typed_title(40), TITLE);
    }

    #[test]
    fn finished_animation_shows_title_and_features() {
        let mut animation = LandingAnimation::default();
        animation.set_frame(LandingAnimation::FEATURES_END_FRAME);

        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|f| draw(f, &animation, &Theme::default())).unwrap();

        let buffer = terminal.backend().buffer();
        let text: String = buffer.content().iter().map(|c| c.symbol()).collect();
        assert!(text.contains("FalaFluente"));
        assert!(text.contains("Níveis CEFR"));
        assert!(text.contains("Explicações certeiras"));
    }

    #[test]
    fn first_frame_has_no_title() {
        let mut animation = LandingAnimation::default();
        animation.set_frame(0);

        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|f| draw(f, &animation, &Theme::default())).unwrap();

        let text: String =
            terminal.backend().buffer().content().iter().map(|c| c.symbol()).collect();
        assert!(!text.contains("Fala"));
    }
}
