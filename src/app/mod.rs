//! Application state and event handling

pub mod command;
pub mod controller;
pub mod input;
pub mod state;

use std::io::{self, Stdout};

use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::config::Config;
use crate::content::{ApiKeyManager, ClaudeClient};
use crate::theme::Theme;
use crate::ui;
pub use controller::Controller;
use state::Screen;

/// The main application
pub struct App {
    /// Everything except the terminal
    controller: Controller,

    /// Colors, resolved once from the config
    theme: Theme,

    /// Terminal backend
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl App {
    /// Create a new application instance
    ///
    /// A missing API key is not an error here; the first generation
    /// reports it instead.
    pub fn new(config: Config) -> Result<Self> {
        let generator = match ApiKeyManager::get_api_key() {
            Ok(key) => match ClaudeClient::new(key, config.model) {
                Ok(client) => Some(client),
                Err(e) => {
                    tracing::warn!(error = %e, "Could not create Claude client");
                    None
                }
            },
            Err(e) => {
                tracing::info!(error = %e, "No API key configured");
                None
            }
        };

        let theme = config.active_theme();
        let config_path = Config::config_path().ok();
        let controller = Controller::new(config, config_path, generator, ClaudeClient::new);
        let terminal = Self::setup_terminal()?;

        Ok(Self { controller, theme, terminal })
    }

    /// Set up the terminal for TUI rendering
    fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;
        Ok(terminal)
    }

    /// Restore the terminal to its original state
    fn restore_terminal(&mut self) -> Result<()> {
        disable_raw_mode()?;
        execute!(self.terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
        self.terminal.show_cursor()?;
        Ok(())
    }

    /// Run the application main loop
    pub async fn run(&mut self) -> Result<()> {
        // Set up panic hook to restore terminal
        let original_hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |panic_info| {
            let _ = disable_raw_mode();
            let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
            original_hook(panic_info);
        }));

        loop {
            // Draw UI
            let Self { controller, theme, terminal } = self;
            terminal.draw(|frame| {
                ui::draw(frame, &mut controller.state, theme);
            })?;

            // Handle events
            if event::poll(std::time::Duration::from_millis(16))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        match self.controller.handle_key(key.code, key.modifiers) {
                            Ok(true) => break, // Exit requested
                            Ok(false) => {}    // Continue
                            Err(e) => {
                                tracing::error!("Error handling key: {}", e);
                                self.controller.state.command_line.set_error(e.to_string());
                            }
                        }
                    }
                }
            }

            // Generation results and speech completions
            self.controller.poll_background();

            // Update animations
            if matches!(self.controller.state.screen, Screen::Landing) {
                self.controller.state.landing_animation.tick();
            }
        }

        self.restore_terminal()?;
        Ok(())
    }
}

impl Drop for App {
    fn drop(&mut self) {
        let _ = self.restore_terminal();
    }
}
