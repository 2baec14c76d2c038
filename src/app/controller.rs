//! Turns key presses and background events into session changes
//!
//! Kept apart from the terminal so the whole interaction can be driven in
//! tests.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use crossterm::event::{KeyCode, KeyModifiers};
use tokio::sync::mpsc;

use super::command::{Command, ParseResult, parse_command};
use super::input::{Action, key_with_modifier_to_action};
use super::state::{AppState, LessonItem, Screen};
use crate::catalog::{Level, Skill};
use crate::config::Config;
use crate::content::{
    ApiKeyManager, ClaudeClient, ClaudeModel, ContentGenerator, GenerationError,
};
use crate::session::generation::{GenerationOutcome, spawn_generation};
use crate::session::{GenerationTicket, Resolution, SessionError, Tab, ViewKind};
use crate::speech::{SpeechEvent, Speaker, Voice};

/// Builds a generator from an API key and model
pub type Connect<G> = fn(String, ClaudeModel) -> Result<G, GenerationError>;

/// Application logic without the terminal
pub struct Controller<G = ClaudeClient> {
    config: Config,
    /// Where `:model` persists the config; `None` keeps changes in memory
    config_path: Option<PathBuf>,
    pub state: AppState,
    generator: Option<Arc<G>>,
    connect: Connect<G>,
    speaker: Speaker,
    speech_rx: mpsc::UnboundedReceiver<SpeechEvent>,
    gen_tx: mpsc::Sender<GenerationOutcome>,
    gen_rx: mpsc::Receiver<GenerationOutcome>,
}

impl<G> Controller<G>
where
    G: ContentGenerator + Send + Sync + 'static,
{
    pub fn new(
        config: Config,
        config_path: Option<PathBuf>,
        generator: Option<G>,
        connect: Connect<G>,
    ) -> Self {
        let (speaker, speech_rx) = Speaker::new(config.speech.clone());
        let (gen_tx, gen_rx) = mpsc::channel(8);
        let state = AppState { has_api_key: generator.is_some(), ..AppState::default() };

        Self {
            config,
            config_path,
            state,
            generator: generator.map(Arc::new),
            connect,
            speaker,
            speech_rx,
            gen_tx,
            gen_rx,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Handle a key press, returns true if should exit
    pub fn handle_key(&mut self, code: KeyCode, modifiers: KeyModifiers) -> Result<bool> {
        if self.state.command_line.active {
            return self.handle_command_line_key(code);
        }

        let action = key_with_modifier_to_action(code, modifiers);
        match self.state.screen {
            Screen::Landing => {
                if action == Some(Action::Quit) {
                    return Ok(true);
                }
                // Any key progresses from landing
                self.state.screen = Screen::Dashboard;
                Ok(false)
            }
            Screen::Help => {
                if action == Some(Action::Quit) {
                    return Ok(true);
                }
                self.state.screen = Screen::Dashboard;
                Ok(false)
            }
            Screen::Dashboard => match action {
                Some(action) => self.handle_action(action),
                None => Ok(false),
            },
        }
    }

    fn handle_command_line_key(&mut self, code: KeyCode) -> Result<bool> {
        let cl = &mut self.state.command_line;
        match code {
            KeyCode::Esc => cl.exit_command_mode(),
            KeyCode::Enter => {
                let input = std::mem::take(&mut cl.input);
                cl.exit_command_mode();
                return match parse_command(&input) {
                    ParseResult::Ok(cmd) => self.execute_command(cmd),
                    ParseResult::UnknownCommand(cmd) => {
                        self.state.command_line.set_error(format!("Comando desconhecido: {}", cmd));
                        Ok(false)
                    }
                    ParseResult::MissingArgument(cmd) => {
                        self.state
                            .command_line
                            .set_error(format!("Argumento necessário: :{} <valor>", cmd));
                        Ok(false)
                    }
                };
            }
            KeyCode::Backspace => {
                if cl.input.is_empty() {
                    cl.exit_command_mode();
                } else {
                    cl.delete_char();
                }
            }
            KeyCode::Left => cl.move_left(),
            KeyCode::Right => cl.move_right(),
            KeyCode::Char(c) => cl.insert_char(c),
            _ => {}
        }
        Ok(false)
    }

    /// Apply one dashboard action, returns true if should exit
    pub fn handle_action(&mut self, action: Action) -> Result<bool> {
        let before = self.state.session.kind();
        self.state.command_line.clear_message();

        match action {
            Action::Quit => return Ok(true),
            Action::Command => self.state.command_line.enter_command_mode(),
            Action::Help => self.state.screen = Screen::Help,
            Action::ChangeLevel => self.state.session.change_level(),
            _ => match before {
                ViewKind::LevelSelect | ViewKind::SkillSelect | ViewKind::TopicSelect => {
                    self.handle_list_action(before, action)
                }
                ViewKind::Generating => {
                    if matches!(action, Action::Back | Action::Left) {
                        tracing::info!("Generation abandoned");
                        ignore(self.state.session.back());
                    }
                }
                ViewKind::Lesson => self.handle_lesson_action(action),
                ViewKind::Quiz => self.handle_quiz_action(action),
            },
        }

        self.sync_view(before);
        Ok(false)
    }

    fn handle_list_action(&mut self, kind: ViewKind, action: Action) {
        let len = self.list_len(kind);
        let list = &mut self.state.list;
        match action {
            Action::Up => list.up(),
            Action::Down => list.down(len),
            Action::Top => list.selected = 0,
            Action::Bottom => list.bottom(len),
            Action::Back | Action::Left => {
                if kind != ViewKind::LevelSelect {
                    ignore(self.state.session.back());
                }
            }
            Action::Select | Action::Right => self.choose(kind),
            _ => {}
        }
    }

    fn list_len(&self, kind: ViewKind) -> usize {
        match kind {
            ViewKind::LevelSelect => Level::all().len(),
            ViewKind::SkillSelect => Skill::offered().len(),
            ViewKind::TopicSelect => self.state.session.topics().len(),
            _ => 0,
        }
    }

    fn choose(&mut self, kind: ViewKind) {
        let selected = self.state.list.selected;
        let session = &mut self.state.session;
        match kind {
            ViewKind::LevelSelect => {
                if let Some(&level) = Level::all().get(selected) {
                    ignore(session.choose_level(level));
                }
            }
            ViewKind::SkillSelect => {
                if let Some(&skill) = Skill::offered().get(selected) {
                    ignore(session.choose_skill(skill));
                }
            }
            ViewKind::TopicSelect => {
                let Some(topic) = session.topics().get(selected).copied() else {
                    return;
                };
                match session.choose_topic(topic) {
                    Ok(ticket) => self.start_generation(ticket),
                    Err(e) => tracing::debug!(error = %e, "Ignored topic selection"),
                }
            }
            _ => {}
        }
    }

    fn start_generation(&mut self, ticket: GenerationTicket) {
        tracing::info!(
            ticket = ticket.id,
            level = %ticket.level,
            skill = %ticket.skill,
            topic = ticket.topic.id,
            "Requesting exercise"
        );
        match &self.generator {
            Some(generator) => {
                spawn_generation(generator.clone(), ticket, self.gen_tx.clone());
            }
            None => {
                self.state.session.resolve(ticket.id, Err(GenerationError::ApiKeyNotFound));
                self.state.command_line.set_error("Chave API não configurada. Use :key <api-key>");
            }
        }
    }

    fn handle_lesson_action(&mut self, action: Action) {
        let Some(ex) = self.state.session.exercise() else {
            return;
        };
        let items = LessonItem::all(&ex.exercise.lesson);
        let lesson = &mut self.state.lesson;
        match action {
            Action::Up => lesson.focus = lesson.focus.saturating_sub(1),
            Action::Down => lesson.focus = (lesson.focus + 1).min(items.len().saturating_sub(1)),
            Action::Top => lesson.focus = 0,
            Action::Bottom => lesson.focus = items.len().saturating_sub(1),
            Action::Select | Action::Speak => {
                match items.get(self.state.lesson.focus).copied() {
                    Some(LessonItem::StartQuiz) if action == Action::Select => {
                        ignore(self.state.session.go_to_quiz());
                    }
                    Some(item) => self.toggle_lesson_speech(item),
                    None => {}
                }
            }
            Action::Right => ignore(self.state.session.go_to_quiz()),
            Action::ToggleTab => ignore(self.state.session.toggle_tab()),
            Action::Back | Action::Left => ignore(self.state.session.back()),
            Action::NewExercise => ignore(self.state.session.new_exercise()),
            _ => {}
        }
    }

    fn toggle_lesson_speech(&mut self, item: LessonItem) {
        if self.state.lesson.is_speaking(item) {
            self.stop_speech();
            return;
        }
        let Some(ex) = self.state.session.exercise() else {
            return;
        };
        let Some((text, voice)) = item.speech(&ex.exercise.lesson) else {
            return;
        };
        let id = self.speaker.speak(text, voice);
        self.state.quiz.speaking = None;
        self.state.lesson.speaking = id.map(|id| (id, item));
        if id.is_none() {
            self.state.command_line.set_message("Síntese de voz desativada");
        }
    }

    fn handle_quiz_action(&mut self, action: Action) {
        let Some(ex) = self.state.session.exercise() else {
            return;
        };
        let questions = &ex.exercise.questions;
        let cursor = &mut self.state.quiz;
        let option_count = |i: usize| questions.get(i).map_or(0, |q| q.options.len());
        let current_id = questions.get(cursor.question).map(|q| q.id);

        match action {
            Action::Down => cursor.down(questions.len(), option_count(cursor.question)),
            Action::Up => cursor.up(option_count(cursor.question.saturating_sub(1))),
            Action::Right => cursor.next_question(questions.len()),
            Action::Left => cursor.previous_question(),
            Action::Top => {
                cursor.question = 0;
                cursor.option = 0;
            }
            Action::Bottom => {
                cursor.question = questions.len().saturating_sub(1);
                cursor.option = 0;
            }
            Action::Select => {
                let option = cursor.option;
                if let Some(id) = current_id {
                    ignore(self.state.session.answer(id, option));
                }
            }
            Action::Answer(option) => {
                if let Some(id) = current_id {
                    self.state.quiz.option = option;
                    ignore(self.state.session.answer(id, option));
                }
            }
            Action::Submit => self.submit(),
            Action::Speak => self.toggle_reading_speech(),
            Action::ToggleTab => ignore(self.state.session.toggle_tab()),
            Action::Back => ignore(self.state.session.back()),
            Action::NewExercise => ignore(self.state.session.new_exercise()),
            _ => {}
        }
    }

    fn toggle_reading_speech(&mut self) {
        if self.state.quiz.speaking.is_some() {
            self.stop_speech();
            return;
        }
        let session = &self.state.session;
        let Some(text) = session.exercise().and_then(|ex| ex.exercise.reading_text.as_deref())
        else {
            return;
        };
        let id = self.speaker.speak(text, Voice::EnUs);
        self.state.lesson.speaking = None;
        self.state.quiz.speaking = id;
        if id.is_none() {
            self.state.command_line.set_message("Síntese de voz desativada");
        }
    }

    fn submit(&mut self) {
        match self.state.session.submit() {
            Ok(result) => {
                self.stop_speech();
                self.state.quiz.scroll.offset = 0;
                self.state.command_line.set_message(format!(
                    "{} de {} corretas",
                    result.score, result.total
                ));
            }
            Err(SessionError::QuizIncomplete { answered, total }) => {
                self.state
                    .command_line
                    .set_error(format!("Responda todas as perguntas ({}/{})", answered, total));
            }
            Err(e) => tracing::debug!(error = %e, "Ignored submit"),
        }
    }

    fn stop_speech(&mut self) {
        self.speaker.stop();
        self.state.lesson.speaking = None;
        self.state.quiz.speaking = None;
    }

    /// Stop playback and reset cursors if the view changed
    fn sync_view(&mut self, before: ViewKind) {
        let after = self.state.session.kind();
        if after != before {
            tracing::debug!(from = %before, to = %after, "View changed");
            self.speaker.stop();
            self.state.on_view_changed(before, after);
        }
    }

    /// Run a parsed `:` command, returns true if should exit
    pub fn execute_command(&mut self, cmd: Command) -> Result<bool> {
        let before = self.state.session.kind();
        match cmd {
            Command::Quit => return Ok(true),
            Command::Nop => self.state.command_line.clear_message(),
            Command::Help => self.state.screen = Screen::Help,
            Command::Level => self.state.session.change_level(),
            Command::New => {
                if self.state.session.new_exercise().is_err() {
                    self.state.command_line.set_error("Nenhum exercício aberto");
                }
            }
            Command::Submit => {
                if before == ViewKind::Quiz || before == ViewKind::Lesson {
                    self.submit();
                } else {
                    self.state.command_line.set_error("Nenhum exercício aberto");
                }
            }
            Command::Lesson => self.open_tab(Tab::Lesson),
            Command::Quiz => self.open_tab(Tab::Quiz),
            Command::Key(key) => self.set_key(&key),
            Command::KeyClear => {
                match ApiKeyManager::delete_api_key() {
                    Ok(()) | Err(GenerationError::ApiKeyNotFound) => {
                        self.state.command_line.set_message("Chave API removida");
                    }
                    Err(e) => self.state.command_line.set_error(e.to_string()),
                }
                self.generator = None;
                self.state.has_api_key = false;
            }
            Command::Model(name) => self.set_model(&name)?,
        }
        self.sync_view(before);
        Ok(false)
    }

    fn open_tab(&mut self, tab: Tab) {
        if self.state.session.switch_tab(tab).is_err() {
            self.state.command_line.set_error("Nenhum exercício aberto");
        }
    }

    fn set_key(&mut self, key: &str) {
        let key = key.trim();
        if let Err(e) = ApiKeyManager::set_api_key(key) {
            self.state.command_line.set_error(e.to_string());
            return;
        }
        match (self.connect)(key.to_string(), self.config.model) {
            Ok(generator) => {
                tracing::info!("API key updated");
                self.generator = Some(Arc::new(generator));
                self.state.has_api_key = true;
                self.state
                    .command_line
                    .set_message(format!("Chave API salva: {}", ApiKeyManager::mask_key(key)));
            }
            Err(e) => self.state.command_line.set_error(e.to_string()),
        }
    }

    fn set_model(&mut self, name: &str) -> Result<()> {
        let Some(model) = ClaudeModel::parse(name) else {
            let known: Vec<_> = ClaudeModel::all().iter().map(|m| m.display_name()).collect();
            self.state
                .command_line
                .set_error(format!("Modelo desconhecido: {} ({})", name, known.join(", ")));
            return Ok(());
        };

        self.config.model = model;
        if let Some(path) = &self.config_path {
            self.config.save_to(path)?;
        }

        // Reconnect so the next request uses the new model
        if self.generator.is_some() {
            match ApiKeyManager::get_api_key().and_then(|key| (self.connect)(key, model)) {
                Ok(generator) => self.generator = Some(Arc::new(generator)),
                Err(e) => tracing::warn!(error = %e, "Could not reconnect with new model"),
            }
        }

        tracing::info!(model = model.model_id(), "Model changed");
        self.state.command_line.set_message(format!("Modelo: {}", model.display_name()));
        Ok(())
    }

    /// Apply finished generations and speech events
    pub fn poll_background(&mut self) {
        while let Ok(outcome) = self.gen_rx.try_recv() {
            let before = self.state.session.kind();
            let reauth = outcome.result.as_ref().err().is_some_and(|e| e.requires_reauth());
            let resolution = self.state.session.resolve(outcome.ticket.id, outcome.result);
            tracing::debug!(ticket = outcome.ticket.id, ?resolution, "Generation resolved");
            if resolution == Resolution::Failed && reauth {
                self.state.command_line.set_error("Chave API inválida. Use :key <api-key>");
            }
            self.sync_view(before);
        }

        while let Ok(event) = self.speech_rx.try_recv() {
            self.speaker.handle_event(event);
            let SpeechEvent::Finished(id) = event;
            if self.state.lesson.speaking.is_some_and(|(current, _)| current == id) {
                self.state.lesson.speaking = None;
            }
            if self.state.quiz.speaking == Some(id) {
                self.state.quiz.speaking = None;
            }
        }
    }
}

/// Session operations the key map can reach in the wrong view are no-ops
fn ignore(result: Result<(), SessionError>) {
    if let Err(e) = result {
        tracing::debug!(error = %e, "Ignored action");
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use super::*;
    use crate::catalog::{find_topic, topics_for};
    use crate::content::exercise::fixtures;
    use crate::content::validate::validate;
    use crate::content::{ExerciseSet, GenerationRequest};
    use crate::speech::SpeechConfig;
    use pretty_assertions::assert_eq;

    struct FakeGenerator {
        calls: AtomicUsize,
        delay: Duration,
    }

    impl ContentGenerator for FakeGenerator {
        async fn generate(
            &self,
            request: &GenerationRequest,
        ) -> Result<ExerciseSet, GenerationError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(self.delay).await;
            let set = if request.skill == Skill::Reading {
                fixtures::reading_exercise()
            } else {
                fixtures::exercise(5)
            };
            validate(set, request.skill)
        }
    }

    fn fake_connect(_key: String, _model: ClaudeModel) -> Result<FakeGenerator, GenerationError> {
        Ok(FakeGenerator { calls: AtomicUsize::new(0), delay: Duration::ZERO })
    }

    fn controller(
        generator: Option<FakeGenerator>,
        speech: SpeechConfig,
    ) -> Controller<FakeGenerator> {
        let config = Config { speech, ..Config::default() };
        let mut controller = Controller::new(config, None, generator, fake_connect);
        controller.state.screen = Screen::Dashboard;
        controller
    }

    fn with_generator(delay: Duration) -> Controller<FakeGenerator> {
        controller(
            Some(FakeGenerator { calls: AtomicUsize::new(0), delay }),
            SpeechConfig { command: "sleep".into(), args: vec!["30".into()], ..Default::default() },
        )
    }

    fn press(c: &mut Controller<FakeGenerator>, actions: &[Action]) {
        for &action in actions {
            c.handle_action(action).unwrap();
        }
    }

    /// B1 -> Grammar -> Modal Verbs
    fn open_modals(c: &mut Controller<FakeGenerator>) {
        let modals = topics_for(Skill::Grammar)
            .iter()
            .position(|t| t.id == "modals")
            .unwrap();
        press(c, &[Action::Down, Action::Down, Action::Select, Action::Select]);
        for _ in 0..modals {
            press(c, &[Action::Down]);
        }
        press(c, &[Action::Select]);
    }

    async fn wait_until_generated(c: &mut Controller<FakeGenerator>) {
        for _ in 0..200 {
            c.poll_background();
            if c.state.session.kind() != ViewKind::Generating {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("generation did not finish");
    }

    #[test]
    fn landing_advances_on_any_key() {
        let mut c = controller(None, SpeechConfig::default());
        c.state.screen = Screen::Landing;
        assert!(!c.handle_key(KeyCode::Char('x'), KeyModifiers::NONE).unwrap());
        assert_eq!(c.state.screen, Screen::Dashboard);
    }

    #[tokio::test]
    async fn full_exercise_flow() {
        let mut c = with_generator(Duration::ZERO);
        open_modals(&mut c);
        assert_eq!(c.state.session.kind(), ViewKind::Generating);
        assert_eq!(c.state.session.level(), Some(Level::B1));

        wait_until_generated(&mut c).await;
        assert_eq!(c.state.session.kind(), ViewKind::Lesson);

        press(&mut c, &[Action::ToggleTab]);
        assert_eq!(c.state.session.kind(), ViewKind::Quiz);

        // Question i is correct at i % 4; answer all but the last correctly
        for i in 0..5 {
            let answer = if i == 4 { 1 } else { i % 4 };
            press(&mut c, &[Action::Answer(answer), Action::Right]);
        }
        press(&mut c, &[Action::Submit]);

        let result = c.state.session.exercise().and_then(|ex| ex.quiz.result()).unwrap();
        assert_eq!((result.score, result.total), (4, 5));
        assert_eq!(c.state.command_line.message.as_deref(), Some("4 de 5 corretas"));
    }

    #[tokio::test]
    async fn tab_key_toggles_back_to_lesson() {
        let mut c = with_generator(Duration::ZERO);
        open_modals(&mut c);
        wait_until_generated(&mut c).await;

        press(&mut c, &[Action::ToggleTab, Action::Answer(2), Action::ToggleTab]);
        assert_eq!(c.state.session.kind(), ViewKind::Lesson);
        press(&mut c, &[Action::ToggleTab]);
        assert_eq!(c.state.session.kind(), ViewKind::Quiz);
        assert_eq!(c.state.session.exercise().unwrap().quiz.selected(1), Some(2));
    }

    #[tokio::test]
    async fn submit_needs_every_answer() {
        let mut c = with_generator(Duration::ZERO);
        open_modals(&mut c);
        wait_until_generated(&mut c).await;
        press(&mut c, &[Action::ToggleTab, Action::Answer(0), Action::Submit]);

        assert!(c.state.command_line.is_error);
        assert_eq!(
            c.state.command_line.message.as_deref(),
            Some("Responda todas as perguntas (1/5)")
        );
        assert!(!c.state.session.exercise().unwrap().quiz.is_submitted());
    }

    #[test]
    fn missing_key_fails_back_to_topics() {
        let mut c = controller(None, SpeechConfig::default());
        open_modals(&mut c);
        assert_eq!(c.state.session.kind(), ViewKind::TopicSelect);
        assert!(c.state.session.error().is_some());
        assert!(c.state.command_line.is_error);
    }

    #[tokio::test]
    async fn leaving_generation_discards_result() {
        let mut c = with_generator(Duration::from_millis(20));
        open_modals(&mut c);
        press(&mut c, &[Action::Back]);
        assert_eq!(c.state.session.kind(), ViewKind::TopicSelect);

        tokio::time::sleep(Duration::from_millis(100)).await;
        c.poll_background();
        assert_eq!(c.state.session.kind(), ViewKind::TopicSelect);
        assert!(c.state.session.error().is_none());
        assert!(c.state.session.exercise().is_none());
    }

    #[tokio::test]
    async fn switching_tabs_stops_speech() {
        let mut c = with_generator(Duration::ZERO);
        open_modals(&mut c);
        wait_until_generated(&mut c).await;

        press(&mut c, &[Action::Speak]);
        assert!(c.state.lesson.is_speaking(LessonItem::Intro));
        assert!(c.speaker.current().is_some());

        press(&mut c, &[Action::ToggleTab]);
        assert!(c.state.lesson.speaking.is_none());
        assert!(c.speaker.current().is_none());
    }

    #[tokio::test]
    async fn speaking_same_item_twice_stops_it() {
        let mut c = with_generator(Duration::ZERO);
        open_modals(&mut c);
        wait_until_generated(&mut c).await;

        // Focus the first example, which is read in English
        press(&mut c, &[Action::Down, Action::Down, Action::Select]);
        let item = LessonItem::Example { section: 0, example: 0 };
        assert!(c.state.lesson.is_speaking(item));

        press(&mut c, &[Action::Select]);
        assert!(!c.state.lesson.is_speaking(item));
        assert!(c.speaker.current().is_none());
    }

    #[tokio::test]
    async fn finished_speech_clears_indicator() {
        let mut c = controller(
            Some(FakeGenerator { calls: AtomicUsize::new(0), delay: Duration::ZERO }),
            SpeechConfig { command: "true".into(), args: vec![], ..Default::default() },
        );
        open_modals(&mut c);
        wait_until_generated(&mut c).await;
        press(&mut c, &[Action::Speak]);
        assert!(c.state.lesson.speaking.is_some());

        for _ in 0..200 {
            c.poll_background();
            if c.state.lesson.speaking.is_none() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        assert!(c.state.lesson.speaking.is_none());
    }

    #[tokio::test]
    async fn new_exercise_returns_to_topics_and_regenerates() {
        let mut c = with_generator(Duration::ZERO);
        open_modals(&mut c);
        wait_until_generated(&mut c).await;

        press(&mut c, &[Action::NewExercise]);
        assert_eq!(c.state.session.kind(), ViewKind::TopicSelect);
        assert_eq!(c.state.session.skill(), Some(Skill::Grammar));
        assert_eq!(c.state.list.selected, 0);

        let tenses = find_topic("tenses").unwrap();
        assert_eq!(c.state.session.topics()[0], tenses);
        press(&mut c, &[Action::Select]);
        wait_until_generated(&mut c).await;
        assert_eq!(c.state.session.topic(), Some(tenses));
        assert_eq!(c.generator.as_ref().unwrap().calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn change_level_resets_from_anywhere() {
        let mut c = controller(None, SpeechConfig::default());
        press(&mut c, &[Action::Select, Action::Select]);
        assert_eq!(c.state.session.kind(), ViewKind::TopicSelect);
        press(&mut c, &[Action::ChangeLevel]);
        assert_eq!(c.state.session.kind(), ViewKind::LevelSelect);
        assert_eq!(c.state.list.selected, 0);
    }

    #[test]
    fn command_line_quit() {
        let mut c = controller(None, SpeechConfig::default());
        assert!(!c.handle_key(KeyCode::Char(':'), KeyModifiers::NONE).unwrap());
        assert!(c.state.command_line.active);
        assert!(!c.handle_key(KeyCode::Char('q'), KeyModifiers::NONE).unwrap());
        assert!(c.handle_key(KeyCode::Enter, KeyModifiers::NONE).unwrap());
    }

    #[test]
    fn unknown_command_reports_error() {
        let mut c = controller(None, SpeechConfig::default());
        for code in [KeyCode::Char(':'), KeyCode::Char('x'), KeyCode::Enter] {
            c.handle_key(code, KeyModifiers::NONE).unwrap();
        }
        assert!(c.state.command_line.is_error);
        assert_eq!(c.state.command_line.message.as_deref(), Some("Comando desconhecido: x"));
    }

    #[test]
    fn model_command_updates_config() {
        let mut c = controller(None, SpeechConfig::default());
        c.execute_command(Command::Model("sonnet".into())).unwrap();
        assert_ne!(c.config().model, ClaudeModel::Haiku45);

        c.execute_command(Command::Model("gpt".into())).unwrap();
        assert!(c.state.command_line.is_error);
    }

    #[test]
    fn tab_commands_need_an_exercise() {
        let mut c = controller(None, SpeechConfig::default());
        c.execute_command(Command::Quiz).unwrap();
        assert!(c.state.command_line.is_error);
        assert_eq!(c.state.session.kind(), ViewKind::LevelSelect);
    }
}
