//! Theming system for FalaFluente

mod tokyo_night;

pub use tokyo_night::TOKYO_NIGHT;

use ratatui::style::Color;
use serde::{Deserialize, Serialize};

use crate::catalog::Level;
use crate::session::ScoreBand;

/// A color theme for the application
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Theme {
    pub name: String,

    // Background colors
    pub bg_primary: Color,
    pub bg_secondary: Color,
    pub bg_tertiary: Color,

    // Foreground colors
    pub fg_primary: Color,
    pub fg_secondary: Color,
    pub fg_muted: Color,

    // Accent colors
    pub accent_primary: Color,
    pub accent_secondary: Color,

    // Semantic colors
    pub success: Color,
    pub warning: Color,
    pub error: Color,
    pub info: Color,

    /// One accent per CEFR level, A1 first
    pub level_colors: [Color; 6],

    // UI elements
    pub border: Color,
    pub border_focused: Color,
    pub selection: Color,
}

impl Theme {
    /// Accent color for a level badge
    pub fn level_color(&self, level: Level) -> Color {
        self.level_colors[level.index()]
    }

    /// Color for a quiz score
    pub fn score_color(&self, band: ScoreBand) -> Color {
        match band {
            ScoreBand::Good => self.success,
            ScoreBand::Fair => self.warning,
            ScoreBand::Poor => self.error,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Theme::tokyo_night()
    }
}
