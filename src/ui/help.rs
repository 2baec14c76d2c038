//! Help overlay

use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

use super::layout::centered_rect;
use crate::theme::Theme;

const KEYS: &[(&str, &str)] = &[
    ("j/k ↑/↓", "Mover"),
    ("Enter", "Escolher / responder"),
    ("Esc", "Voltar"),
    ("Tab", "Explicação ↔ Exercícios"),
    ("h/l ←/→", "Pergunta anterior / próxima"),
    ("a-d", "Responder a pergunta atual"),
    ("S", "Verificar respostas"),
    ("s", "Ouvir / parar"),
    ("n", "Novo exercício"),
    ("L", "Mudar nível"),
    ("Ctrl-c", "Sair"),
];

const COMMANDS: &[(&str, &str)] = &[
    (":q", "Sair"),
    (":level", "Voltar aos níveis"),
    (":new", "Novo exercício"),
    (":lesson / :quiz", "Trocar de aba"),
    (":submit", "Verificar respostas"),
    (":key <chave>", "Salvar chave da API Anthropic"),
    (":key-clear", "Remover chave salva"),
    (":model <nome>", "haiku, sonnet4, sonnet, opus"),
];

fn section(title: &str, rows: &[(&str, &str)], theme: &Theme) -> Vec<Line<'static>> {
    let mut lines = vec![Line::from(Span::styled(
        title.to_string(),
        Style::default().fg(theme.accent_primary).add_modifier(Modifier::BOLD),
    ))];
    for (key, what) in rows {
        lines.push(Line::from(vec![
            Span::styled(format!("  {:<18}", key), Style::default().fg(theme.accent_secondary)),
            Span::styled(what.to_string(), Style::default().fg(theme.fg_secondary)),
        ]));
    }
    lines.push(Line::from(""));
    lines
}

/// Draw the help overlay on top of whatever is on screen
pub fn draw(frame: &mut Frame, area: Rect, theme: &Theme) {
    let overlay = centered_rect(70, 80, area);
    frame.render_widget(Clear, overlay);

    let block = Block::default()
        .title(" Ajuda ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border_focused))
        .style(Style::default().bg(theme.bg_secondary));

    let mut lines = section("Teclas", KEYS, theme);
    lines.extend(section("Comandos", COMMANDS, theme));
    lines.push(Line::from(Span::styled(
        "Qualquer tecla para fechar",
        Style::default().fg(theme.fg_muted),
    )));

    frame.render_widget(Paragraph::new(lines).block(block), overlay);
}
