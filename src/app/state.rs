//! Application state definitions

use std::time::Instant;

use crate::content::Lesson;
use crate::session::{Session, ViewKind};
use crate::speech::{UtteranceId, Voice};

/// Which screen is currently displayed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Screen {
    #[default]
    Landing,
    Dashboard,
    Help,
}

/// Cursor over the level, skill or topic list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListCursor {
    pub selected: usize,
}

impl ListCursor {
    pub fn up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn down(&mut self, len: usize) {
        if self.selected + 1 < len {
            self.selected += 1;
        }
    }

    pub fn bottom(&mut self, len: usize) {
        self.selected = len.saturating_sub(1);
    }
}

/// Vertical scroll of a rendered panel
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScrollState {
    /// First visible line
    pub offset: usize,
    /// Total rendered lines (updated on render)
    pub total_lines: usize,
    /// Visible height in lines (updated on render)
    pub visible_height: usize,
}

impl ScrollState {
    /// Scroll just enough for `start..end` to be visible
    pub fn reveal(&mut self, start: usize, end: usize) {
        if start < self.offset {
            self.offset = start;
        } else if self.visible_height > 0 && end > self.offset + self.visible_height {
            self.offset = end.saturating_sub(self.visible_height).min(start);
        }
        self.offset = self.offset.min(self.total_lines.saturating_sub(1));
    }
}

/// Something on the lesson tab the cursor can rest on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LessonItem {
    Intro,
    Section(usize),
    Example { section: usize, example: usize },
    /// "Ir para os Exercícios"
    StartQuiz,
}

impl LessonItem {
    /// Focusable items in display order
    pub fn all(lesson: &Lesson) -> Vec<LessonItem> {
        let mut items = vec![Self::Intro];
        for (s, section) in lesson.sections.iter().enumerate() {
            items.push(Self::Section(s));
            items.extend(
                (0..section.examples.len()).map(|e| Self::Example { section: s, example: e }),
            );
        }
        items.push(Self::StartQuiz);
        items
    }

    /// Text and voice to read this item aloud with
    ///
    /// Explanations are Portuguese; examples are English.
    pub fn speech<'a>(&self, lesson: &'a Lesson) -> Option<(&'a str, Voice)> {
        match *self {
            Self::Intro => Some((lesson.intro.as_str(), Voice::PtBr)),
            Self::Section(s) => {
                lesson.sections.get(s).map(|sec| (sec.content.as_str(), Voice::PtBr))
            }
            Self::Example { section, example } => lesson
                .sections
                .get(section)
                .and_then(|sec| sec.examples.get(example))
                .map(|ex| (ex.as_str(), Voice::EnUs)),
            Self::StartQuiz => None,
        }
    }
}

/// Lesson tab state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LessonCursor {
    /// Index into [`LessonItem::all`]
    pub focus: usize,
    /// Utterance this tab started, and the item being read
    pub speaking: Option<(UtteranceId, LessonItem)>,
    pub scroll: ScrollState,
}

impl LessonCursor {
    pub fn is_speaking(&self, item: LessonItem) -> bool {
        self.speaking.is_some_and(|(_, it)| it == item)
    }
}

/// Quiz tab state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuizCursor {
    /// Index into the exercise's questions
    pub question: usize,
    /// Highlighted option of that question
    pub option: usize,
    /// Reading passage playback started from this tab
    pub speaking: Option<UtteranceId>,
    pub scroll: ScrollState,
}

impl QuizCursor {
    pub fn down(&mut self, question_count: usize, option_count: usize) {
        if self.option + 1 < option_count {
            self.option += 1;
        } else if self.question + 1 < question_count {
            self.question += 1;
            self.option = 0;
        }
    }

    pub fn up(&mut self, option_count_of_previous: usize) {
        if self.option > 0 {
            self.option -= 1;
        } else if self.question > 0 {
            self.question -= 1;
            self.option = option_count_of_previous.saturating_sub(1);
        }
    }

    pub fn next_question(&mut self, question_count: usize) {
        if self.question + 1 < question_count {
            self.question += 1;
            self.option = 0;
        }
    }

    pub fn previous_question(&mut self) {
        if self.question > 0 {
            self.question -= 1;
            self.option = 0;
        }
    }
}

/// State for the `:` command line
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandLineState {
    /// Whether a command is being typed
    pub active: bool,
    /// Input buffer
    pub input: String,
    /// Cursor position in input, in characters
    pub cursor: usize,
    /// Status/error message shown when not typing
    pub message: Option<String>,
    pub is_error: bool,
}

impl CommandLineState {
    pub fn enter_command_mode(&mut self) {
        self.active = true;
        self.input.clear();
        self.cursor = 0;
        self.message = None;
    }

    pub fn exit_command_mode(&mut self) {
        self.active = false;
        self.input.clear();
        self.cursor = 0;
    }

    pub fn set_message(&mut self, msg: impl Into<String>) {
        self.message = Some(msg.into());
        self.is_error = false;
    }

    pub fn set_error(&mut self, msg: impl Into<String>) {
        self.message = Some(msg.into());
        self.is_error = true;
    }

    pub fn clear_message(&mut self) {
        self.message = None;
    }

    fn byte_index(&self, char_idx: usize) -> usize {
        self.input.char_indices().nth(char_idx).map(|(i, _)| i).unwrap_or(self.input.len())
    }

    pub fn insert_char(&mut self, c: char) {
        let idx = self.byte_index(self.cursor);
        self.input.insert(idx, c);
        self.cursor += 1;
    }

    /// Delete character before cursor
    pub fn delete_char(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let idx = self.byte_index(self.cursor);
            self.input.remove(idx);
        }
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        if self.cursor < self.input.chars().count() {
            self.cursor += 1;
        }
    }
}

/// State for the landing animation
#[derive(Debug, Clone)]
pub struct LandingAnimation {
    /// When the animation started
    pub start_time: Instant,
    /// Current animation frame (50ms per frame)
    pub current_frame: usize,
    /// Whether animation is complete (ready for input)
    pub complete: bool,
}

impl Default for LandingAnimation {
    fn default() -> Self {
        Self { start_time: Instant::now(), current_frame: 0, complete: false }
    }
}

impl LandingAnimation {
    pub const MS_PER_FRAME: u128 = 50;
    /// Frames spent typing the title, one character per two frames
    pub const TITLE_END_FRAME: usize = 22;
    pub const FEATURES_END_FRAME: usize = 40;

    /// Advance the animation based on elapsed time
    pub fn tick(&mut self) {
        let elapsed_ms = self.start_time.elapsed().as_millis();
        self.set_frame((elapsed_ms / Self::MS_PER_FRAME) as usize);
    }

    pub fn set_frame(&mut self, frame: usize) {
        self.current_frame = frame;
        self.complete = frame >= Self::FEATURES_END_FRAME;
    }

    /// How many characters of a title of `len` characters to show
    pub fn title_chars(&self, len: usize) -> usize {
        (self.current_frame / 2).min(len)
    }

    /// How many feature cards to show
    pub fn features_shown(&self, total: usize) -> usize {
        if self.current_frame < Self::TITLE_END_FRAME {
            0
        } else {
            let per_card = (Self::FEATURES_END_FRAME - Self::TITLE_END_FRAME) / total.max(1);
            ((self.current_frame - Self::TITLE_END_FRAME) / per_card.max(1) + 1).min(total)
        }
    }
}

/// Full application state
#[derive(Debug, Default)]
pub struct AppState {
    pub screen: Screen,
    pub landing_animation: LandingAnimation,
    pub session: Session,
    /// Cursor for the selection lists
    pub list: ListCursor,
    pub lesson: LessonCursor,
    pub quiz: QuizCursor,
    pub command_line: CommandLineState,
    /// Whether a Claude client is configured
    pub has_api_key: bool,
}

impl AppState {
    /// Reset per-view cursors after the session moved to `kind`
    pub fn on_view_changed(&mut self, from: ViewKind, to: ViewKind) {
        match to {
            ViewKind::LevelSelect | ViewKind::SkillSelect | ViewKind::TopicSelect => {
                self.list = ListCursor::default();
            }
            ViewKind::Generating => {}
            ViewKind::Lesson | ViewKind::Quiz => {
                let tab_switch = matches!(from, ViewKind::Lesson | ViewKind::Quiz);
                if !tab_switch {
                    self.lesson = LessonCursor::default();
                    self.quiz = QuizCursor::default();
                }
            }
        }
        // Playback belongs to the view that started it
        self.lesson.speaking = None;
        self.quiz.speaking = None;
    }
}
