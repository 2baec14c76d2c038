//! FalaFluente - English practice for Brazilian Portuguese speakers
//!
//! Pick a CEFR level, a skill and a topic; Claude writes a short lesson and
//! a multiple-choice quiz for it, explained in Portuguese. Lessons and
//! reading passages can be read aloud.

pub mod app;
pub mod catalog;
pub mod config;
pub mod content;
pub mod session;
pub mod speech;
pub mod theme;
pub mod ui;

pub use app::App;
pub use config::Config;
pub use theme::Theme;
