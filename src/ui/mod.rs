//! UI rendering components

pub mod command_line;
pub mod dashboard;
pub mod help;
pub mod landing;
pub mod layout;
pub mod lesson;
pub mod quiz;

use ratatui::Frame;

use crate::app::state::{AppState, Screen};
use crate::theme::Theme;

/// Main draw function
///
/// Takes the state mutably so panels can record their scroll geometry.
pub fn draw(frame: &mut Frame, state: &mut AppState, theme: &Theme) {
    match state.screen {
        Screen::Landing => landing::draw(frame, &state.landing_animation, theme),
        Screen::Dashboard => dashboard::draw(frame, state, theme),
        Screen::Help => {
            dashboard::draw(frame, state, theme);
            help::draw(frame, frame.area(), theme);
        }
    }
}
