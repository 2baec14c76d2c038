//! Key bindings

use crossterm::event::{KeyCode, KeyModifiers};

/// Vim-style key mapping (basic, without modifiers)
pub fn vim_key_to_action(key: KeyCode) -> Option<Action> {
    match key {
        KeyCode::Char('j') | KeyCode::Down => Some(Action::Down),
        KeyCode::Char('k') | KeyCode::Up => Some(Action::Up),
        KeyCode::Char('h') | KeyCode::Left => Some(Action::Left),
        KeyCode::Char('l') | KeyCode::Right => Some(Action::Right),
        KeyCode::Char('g') | KeyCode::Home => Some(Action::Top),
        KeyCode::Char('G') | KeyCode::End => Some(Action::Bottom),
        KeyCode::Enter | KeyCode::Char(' ') => Some(Action::Select),
        KeyCode::Esc | KeyCode::Backspace => Some(Action::Back),
        KeyCode::Tab | KeyCode::BackTab => Some(Action::ToggleTab),
        KeyCode::Char('?') => Some(Action::Help),
        KeyCode::Char(':') => Some(Action::Command),
        // Note: 'q' intentionally not mapped - use :q command to quit
        KeyCode::Char('s') => Some(Action::Speak),
        // Answer the current question by letter
        KeyCode::Char(c @ 'a'..='d') => Some(Action::Answer(c as usize - 'a' as usize)),
        KeyCode::Char('S') => Some(Action::Submit),
        KeyCode::Char('n') => Some(Action::NewExercise),
        KeyCode::Char('L') => Some(Action::ChangeLevel),
        _ => None,
    }
}

/// Key mapping with modifiers (for Ctrl combinations)
pub fn key_with_modifier_to_action(key: KeyCode, modifiers: KeyModifiers) -> Option<Action> {
    if modifiers.contains(KeyModifiers::CONTROL) {
        match key {
            KeyCode::Char('c') => Some(Action::Quit),
            _ => None,
        }
    } else {
        vim_key_to_action(key)
    }
}

/// Actions that can be taken in the app
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    // Navigation
    Up,
    Down,
    Left,
    Right,
    Top,
    Bottom,

    // Selection
    Select,
    Back,
    ToggleTab,

    // Exercise
    Speak,
    Answer(usize),
    Submit,
    NewExercise,
    ChangeLevel,

    // Modes
    Command,
    Help,
    Quit,
}
