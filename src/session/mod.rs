//! Session controller
//!
//! Owns the navigation state machine:
//!
//! ```text
//! LevelSelect -> SkillSelect -> TopicSelect -> Generating -> Exercise(Lesson <-> Quiz)
//! ```
//!
//! Each [`View`] variant carries exactly the selections valid in that state,
//! so a topic without a skill (or an exercise without a topic) cannot be
//! represented. Generation results are matched against the
//! [`GenerationTicket`] that started them and dropped when stale.

pub mod generation;
pub mod quiz;

use thiserror::Error;

use crate::catalog::{Level, Skill, Topic, topics_for};
use crate::content::{ExerciseSet, GenerationError, GenerationRequest};
pub use quiz::{OptionMark, QuizResult, QuizState, ScoreBand, ScoreMessage};

/// Which half of the exercise is on screen
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Tab {
    #[default]
    Lesson,
    Quiz,
}

impl Tab {
    pub fn toggled(self) -> Self {
        match self {
            Self::Lesson => Self::Quiz,
            Self::Quiz => Self::Lesson,
        }
    }
}

/// Identifies one generation request and the selection that spawned it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationTicket {
    pub id: u64,
    pub level: Level,
    pub skill: Skill,
    pub topic: Topic,
}

impl GenerationTicket {
    pub fn request(&self) -> GenerationRequest {
        GenerationRequest::new(self.level, self.skill, self.topic.name)
    }
}

/// A received exercise and the user's progress through it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExerciseView {
    pub level: Level,
    pub skill: Skill,
    pub topic: Topic,
    pub exercise: ExerciseSet,
    pub tab: Tab,
    pub quiz: QuizState,
}

/// The current view and the selections it carries
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum View {
    #[default]
    LevelSelect,
    SkillSelect {
        level: Level,
    },
    TopicSelect {
        level: Level,
        skill: Skill,
        /// Message from the last failed generation
        error: Option<String>,
    },
    Generating {
        ticket: GenerationTicket,
    },
    Exercise(Box<ExerciseView>),
}

/// Field-less view tag, for matching and messages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    LevelSelect,
    SkillSelect,
    TopicSelect,
    Generating,
    Lesson,
    Quiz,
}

impl std::fmt::Display for ViewKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::LevelSelect => "level selection",
            Self::SkillSelect => "skill selection",
            Self::TopicSelect => "topic selection",
            Self::Generating => "generation",
            Self::Lesson => "lesson",
            Self::Quiz => "quiz",
        };
        f.write_str(name)
    }
}

/// Rejected session operations
///
/// These are guarded by the UI's reachability rules and never shown as
/// failures to the learner.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("cannot {action} during {view}")]
    InvalidTransition { action: &'static str, view: ViewKind },

    #[error("{0} is not offered")]
    SkillNotOffered(Skill),

    #[error("topic {0} is not offered for this skill")]
    TopicNotOffered(&'static str),

    #[error("no question with id {0}")]
    UnknownQuestion(u32),

    #[error("question {question} has no option {option}")]
    OptionOutOfRange { question: u32, option: usize },

    #[error("answers are frozen after submission")]
    QuizSubmitted,

    #[error("only {answered} of {total} questions answered")]
    QuizIncomplete { answered: usize, total: usize },
}

/// What happened to a finished generation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// The exercise is now on screen
    Applied,
    /// The session went back to topic selection with an error
    Failed,
    /// The user had moved on; the result was discarded
    Stale,
}

/// Selection and exercise state for one browsing session
#[derive(Debug, Default)]
pub struct Session {
    view: View,
    next_ticket: u64,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> &View {
        &self.view
    }

    pub fn kind(&self) -> ViewKind {
        match &self.view {
            View::LevelSelect => ViewKind::LevelSelect,
            View::SkillSelect { .. } => ViewKind::SkillSelect,
            View::TopicSelect { .. } => ViewKind::TopicSelect,
            View::Generating { .. } => ViewKind::Generating,
            View::Exercise(ex) => match ex.tab {
                Tab::Lesson => ViewKind::Lesson,
                Tab::Quiz => ViewKind::Quiz,
            },
        }
    }

    pub fn level(&self) -> Option<Level> {
        match &self.view {
            View::LevelSelect => None,
            View::SkillSelect { level } | View::TopicSelect { level, .. } => Some(*level),
            View::Generating { ticket } => Some(ticket.level),
            View::Exercise(ex) => Some(ex.level),
        }
    }

    pub fn skill(&self) -> Option<Skill> {
        match &self.view {
            View::LevelSelect | View::SkillSelect { .. } => None,
            View::TopicSelect { skill, .. } => Some(*skill),
            View::Generating { ticket } => Some(ticket.skill),
            View::Exercise(ex) => Some(ex.skill),
        }
    }

    pub fn topic(&self) -> Option<Topic> {
        match &self.view {
            View::Generating { ticket } => Some(ticket.topic),
            View::Exercise(ex) => Some(ex.topic),
            _ => None,
        }
    }

    pub fn exercise(&self) -> Option<&ExerciseView> {
        match &self.view {
            View::Exercise(ex) => Some(ex),
            _ => None,
        }
    }

    /// Error left by the last failed generation
    pub fn error(&self) -> Option<&str> {
        match &self.view {
            View::TopicSelect { error, .. } => error.as_deref(),
            _ => None,
        }
    }

    /// Topics offered in the current view
    pub fn topics(&self) -> Vec<Topic> {
        self.skill().map(topics_for).unwrap_or_default()
    }

    /// Trail shown above the dashboard, most general first
    pub fn breadcrumbs(&self) -> Vec<String> {
        let mut crumbs = vec!["Níveis".to_string()];
        crumbs.extend(self.level().map(|l| l.code().to_string()));
        crumbs.extend(self.skill().map(|s| s.name().to_string()));
        crumbs.extend(self.topic().map(|t| t.name.to_string()));
        crumbs
    }

    fn invalid(&self, action: &'static str) -> SessionError {
        SessionError::InvalidTransition { action, view: self.kind() }
    }

    /// LevelSelect -> SkillSelect
    pub fn choose_level(&mut self, level: Level) -> Result<(), SessionError> {
        if !matches!(self.view, View::LevelSelect) {
            return Err(self.invalid("choose a level"));
        }
        self.view = View::SkillSelect { level };
        Ok(())
    }

    /// SkillSelect -> TopicSelect
    pub fn choose_skill(&mut self, skill: Skill) -> Result<(), SessionError> {
        let View::SkillSelect { level } = self.view else {
            return Err(self.invalid("choose a skill"));
        };
        if !Skill::offered().contains(&skill) {
            return Err(SessionError::SkillNotOffered(skill));
        }
        self.view = View::TopicSelect { level, skill, error: None };
        Ok(())
    }

    /// TopicSelect -> Generating
    ///
    /// Returns the ticket the caller must run the generation for. Any
    /// earlier error is cleared.
    pub fn choose_topic(&mut self, topic: Topic) -> Result<GenerationTicket, SessionError> {
        let View::TopicSelect { level, skill, .. } = self.view else {
            return Err(self.invalid("choose a topic"));
        };
        if !topics_for(skill).contains(&topic) {
            return Err(SessionError::TopicNotOffered(topic.id));
        }

        self.next_ticket += 1;
        let ticket = GenerationTicket { id: self.next_ticket, level, skill, topic };
        tracing::debug!(ticket = ticket.id, topic = topic.id, "Generation started");
        self.view = View::Generating { ticket: ticket.clone() };
        Ok(ticket)
    }

    /// Feed a finished generation back into the session
    ///
    /// Only applies when the session is still waiting on this exact ticket.
    pub fn resolve(
        &mut self,
        ticket_id: u64,
        result: Result<ExerciseSet, GenerationError>,
    ) -> Resolution {
        let View::Generating { ticket } = &self.view else {
            tracing::debug!(ticket = ticket_id, "Discarding generation result after navigation");
            return Resolution::Stale;
        };
        if ticket.id != ticket_id {
            tracing::debug!(ticket = ticket_id, current = ticket.id, "Discarding stale generation");
            return Resolution::Stale;
        }
        let ticket = ticket.clone();

        match result {
            Ok(exercise) => {
                tracing::info!(title = %exercise.title, "Exercise ready");
                self.view = View::Exercise(Box::new(ExerciseView {
                    level: ticket.level,
                    skill: ticket.skill,
                    topic: ticket.topic,
                    exercise,
                    tab: Tab::Lesson,
                    quiz: QuizState::default(),
                }));
                Resolution::Applied
            }
            Err(err) => {
                tracing::warn!(error = %err, "Generation failed");
                self.view = View::TopicSelect {
                    level: ticket.level,
                    skill: ticket.skill,
                    error: Some(err.user_message().to_string()),
                };
                Resolution::Failed
            }
        }
    }

    /// Step one view back
    ///
    /// From `Generating` this abandons the request; its result will be
    /// discarded when it arrives. From an exercise it returns to topic
    /// selection.
    pub fn back(&mut self) -> Result<(), SessionError> {
        self.view = match &self.view {
            View::LevelSelect => return Err(self.invalid("go back")),
            View::SkillSelect { .. } => View::LevelSelect,
            View::TopicSelect { level, .. } => View::SkillSelect { level: *level },
            View::Generating { ticket } => {
                View::TopicSelect { level: ticket.level, skill: ticket.skill, error: None }
            }
            View::Exercise(ex) => View::TopicSelect { level: ex.level, skill: ex.skill, error: None },
        };
        Ok(())
    }

    /// Discard the exercise and pick a new topic in the same skill
    pub fn new_exercise(&mut self) -> Result<(), SessionError> {
        let View::Exercise(ex) = &self.view else {
            return Err(self.invalid("start a new exercise"));
        };
        self.view = View::TopicSelect { level: ex.level, skill: ex.skill, error: None };
        Ok(())
    }

    /// Full reset back to level selection, from anywhere
    pub fn change_level(&mut self) {
        self.view = View::LevelSelect;
    }

    pub fn switch_tab(&mut self, tab: Tab) -> Result<(), SessionError> {
        let View::Exercise(ex) = &mut self.view else {
            return Err(self.invalid("switch tabs"));
        };
        ex.tab = tab;
        Ok(())
    }

    pub fn toggle_tab(&mut self) -> Result<(), SessionError> {
        let tab = self.exercise().map(|ex| ex.tab.toggled()).ok_or(self.invalid("switch tabs"))?;
        self.switch_tab(tab)
    }

    /// The lesson's "go to exercises" action
    pub fn go_to_quiz(&mut self) -> Result<(), SessionError> {
        self.switch_tab(Tab::Quiz)
    }

    pub fn answer(&mut self, question_id: u32, option: usize) -> Result<(), SessionError> {
        let View::Exercise(ex) = &mut self.view else {
            return Err(self.invalid("answer"));
        };
        let ExerciseView { exercise, quiz, .. } = ex.as_mut();
        quiz.answer(exercise, question_id, option)
    }

    pub fn can_submit(&self) -> bool {
        self.exercise().is_some_and(|ex| ex.quiz.can_submit(&ex.exercise))
    }

    pub fn submit(&mut self) -> Result<QuizResult, SessionError> {
        let View::Exercise(ex) = &mut self.view else {
            return Err(self.invalid("submit"));
        };
        let ExerciseView { exercise, quiz, .. } = ex.as_mut();
        let result = quiz.submit(exercise)?;
        tracing::info!(score = result.score, total = result.total, "Quiz submitted");
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{GRAMMAR_TOPICS, VOCAB_TOPICS, find_topic};
    use crate::content::exercise::fixtures;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn modals() -> Topic {
        find_topic("modals").unwrap()
    }

    fn at_topics(level: Level, skill: Skill) -> Session {
        let mut session = Session::new();
        session.choose_level(level).unwrap();
        session.choose_skill(skill).unwrap();
        session
    }

    fn with_exercise(count: usize) -> Session {
        let mut session = at_topics(Level::B1, Skill::Grammar);
        let ticket = session.choose_topic(modals()).unwrap();
        assert_eq!(session.resolve(ticket.id, Ok(fixtures::exercise(count))), Resolution::Applied);
        session
    }

    #[test]
    fn starts_empty_at_level_select() {
        let session = Session::new();
        assert_eq!(session.kind(), ViewKind::LevelSelect);
        assert!(session.level().is_none());
        assert!(session.skill().is_none());
        assert!(session.exercise().is_none());
        assert_eq!(session.breadcrumbs(), vec!["Níveis".to_string()]);
    }

    #[test]
    fn forward_path_sets_selections() {
        let mut session = at_topics(Level::B1Plus, Skill::Vocabulary);
        assert_eq!(session.kind(), ViewKind::TopicSelect);
        assert_eq!(session.level(), Some(Level::B1Plus));
        assert_eq!(session.skill(), Some(Skill::Vocabulary));
        assert_eq!(session.topics(), VOCAB_TOPICS.to_vec());

        let ticket = session.choose_topic(find_topic("travel").unwrap()).unwrap();
        assert_eq!(session.kind(), ViewKind::Generating);
        assert_eq!(ticket.request(), GenerationRequest::new(Level::B1Plus, Skill::Vocabulary, "Travel & Tourism"));
        assert_eq!(
            session.breadcrumbs(),
            vec!["Níveis", "B1+", "Vocabulary", "Travel & Tourism"]
        );
    }

    #[test]
    fn transitions_out_of_order_are_rejected() {
        let mut session = Session::new();
        assert!(matches!(
            session.choose_skill(Skill::Grammar),
            Err(SessionError::InvalidTransition { view: ViewKind::LevelSelect, .. })
        ));
        assert!(session.choose_topic(modals()).is_err());
        assert!(session.submit().is_err());
        assert!(session.back().is_err());

        session.choose_level(Level::A1).unwrap();
        assert!(session.choose_level(Level::A2).is_err());
        assert_eq!(session.choose_skill(Skill::Listening), Err(SessionError::SkillNotOffered(Skill::Listening)));
    }

    #[test]
    fn topic_must_belong_to_skill() {
        let mut session = at_topics(Level::A2, Skill::Vocabulary);
        assert_eq!(session.choose_topic(modals()), Err(SessionError::TopicNotOffered("modals")));

        let mut session = at_topics(Level::A2, Skill::Reading);
        assert!(session.choose_topic(modals()).is_ok());
    }

    #[test]
    fn backward_transitions_clear_the_right_fields() {
        let mut session = at_topics(Level::C1, Skill::Grammar);
        session.back().unwrap();
        assert_eq!(session.view(), &View::SkillSelect { level: Level::C1 });
        session.back().unwrap();
        assert_eq!(session.view(), &View::LevelSelect);
    }

    #[test]
    fn success_opens_lesson_tab() {
        let session = with_exercise(5);
        let ex = session.exercise().unwrap();
        assert_eq!(session.kind(), ViewKind::Lesson);
        assert_eq!(ex.tab, Tab::Lesson);
        assert_eq!(ex.topic, modals());
        assert!(ex.quiz.answers().is_empty());
    }

    #[test]
    fn toggle_tab_flips_between_lesson_and_quiz() {
        let mut session = with_exercise(5);
        session.toggle_tab().unwrap();
        assert_eq!(session.kind(), ViewKind::Quiz);
        session.toggle_tab().unwrap();
        assert_eq!(session.kind(), ViewKind::Lesson);

        let mut session = at_topics(Level::B1, Skill::Grammar);
        assert!(matches!(
            session.toggle_tab(),
            Err(SessionError::InvalidTransition { view: ViewKind::TopicSelect, .. })
        ));
    }

    #[test]
    fn failure_returns_to_topics_with_error() {
        let mut session = at_topics(Level::B1, Skill::Grammar);
        let ticket = session.choose_topic(modals()).unwrap();

        let resolution = session.resolve(ticket.id, Err(GenerationError::EmptyResponse));
        assert_eq!(resolution, Resolution::Failed);
        assert_eq!(session.kind(), ViewKind::TopicSelect);
        assert!(session.exercise().is_none());
        assert!(session.topic().is_none());
        assert!(!session.error().unwrap_or_default().is_empty());
        assert_eq!(session.level(), Some(Level::B1));
        assert_eq!(session.skill(), Some(Skill::Grammar));
    }

    #[test]
    fn retry_clears_error() {
        let mut session = at_topics(Level::B1, Skill::Grammar);
        let ticket = session.choose_topic(modals()).unwrap();
        session.resolve(ticket.id, Err(GenerationError::EmptyResponse));
        assert!(session.error().is_some());

        let retry = session.choose_topic(modals()).unwrap();
        assert!(retry.id > ticket.id);
        assert!(session.error().is_none());
    }

    #[test]
    fn abandoned_generation_is_discarded() {
        let mut session = at_topics(Level::B1, Skill::Grammar);
        let first = session.choose_topic(modals()).unwrap();
        session.back().unwrap();
        assert_eq!(session.kind(), ViewKind::TopicSelect);

        let second = session.choose_topic(GRAMMAR_TOPICS[0]).unwrap();
        assert_eq!(session.resolve(first.id, Ok(fixtures::exercise(5))), Resolution::Stale);
        assert_eq!(session.kind(), ViewKind::Generating);
        assert_eq!(session.topic(), Some(GRAMMAR_TOPICS[0]));

        assert_eq!(session.resolve(second.id, Ok(fixtures::exercise(5))), Resolution::Applied);
        assert_eq!(session.exercise().map(|ex| ex.topic), Some(GRAMMAR_TOPICS[0]));
    }

    #[test]
    fn late_result_after_reset_is_discarded() {
        let mut session = at_topics(Level::B1, Skill::Grammar);
        let ticket = session.choose_topic(modals()).unwrap();
        session.change_level();

        assert_eq!(session.resolve(ticket.id, Ok(fixtures::exercise(5))), Resolution::Stale);
        assert_eq!(session.view(), &View::LevelSelect);

        let mut session = at_topics(Level::B1, Skill::Grammar);
        let ticket = session.choose_topic(modals()).unwrap();
        session.back().unwrap();
        assert_eq!(session.resolve(ticket.id, Err(GenerationError::EmptyResponse)), Resolution::Stale);
        assert!(session.error().is_none());
    }

    #[test]
    fn modal_verbs_scenario() {
        let mut session = with_exercise(5);
        session.go_to_quiz().unwrap();
        assert_eq!(session.kind(), ViewKind::Quiz);

        let questions = session.exercise().unwrap().exercise.questions.clone();
        for (i, q) in questions.iter().enumerate() {
            assert!(!session.can_submit());
            let option = if i == 0 { (q.correct_answer_index + 1) % 4 } else { q.correct_answer_index };
            session.answer(q.id, option).unwrap();
        }
        assert!(session.can_submit());

        let result = session.submit().unwrap();
        assert_eq!(result.score, 4);
        assert_eq!(result.message(), ScoreMessage::Positive);
        assert_eq!(session.answer(questions[0].id, 0), Err(SessionError::QuizSubmitted));
        assert_eq!(session.submit().unwrap(), result);
    }

    #[test]
    fn new_exercise_keeps_level_and_skill() {
        let mut session = with_exercise(5);
        session.answer(1, 0).unwrap();
        session.new_exercise().unwrap();

        assert_eq!(session.kind(), ViewKind::TopicSelect);
        assert_eq!(session.level(), Some(Level::B1));
        assert_eq!(session.skill(), Some(Skill::Grammar));
        assert!(session.exercise().is_none());
        assert!(session.topic().is_none());
    }

    #[test]
    fn change_level_clears_everything() {
        let mut session = with_exercise(5);
        session.answer(1, 0).unwrap();
        session.change_level();

        assert_eq!(session.view(), &View::LevelSelect);
        assert!(session.level().is_none());
        assert!(session.skill().is_none());
    }

    #[test]
    fn back_from_exercise_goes_to_topics() {
        let mut session = with_exercise(5);
        session.back().unwrap();
        assert_eq!(session.kind(), ViewKind::TopicSelect);
        assert_eq!(session.skill(), Some(Skill::Grammar));
    }

    proptest! {
        #[test]
        fn tab_switching_preserves_answers(
            answers in proptest::collection::vec((1u32..=5, 0usize..4), 0..8),
            switches in proptest::collection::vec(any::<bool>(), 0..20),
        ) {
            let mut session = with_exercise(5);
            for (id, option) in &answers {
                session.answer(*id, *option).unwrap();
            }
            let before = session.exercise().unwrap().clone();

            for to_quiz in switches {
                let tab = if to_quiz { Tab::Quiz } else { Tab::Lesson };
                session.switch_tab(tab).unwrap();
            }
            session.switch_tab(before.tab).unwrap();

            prop_assert_eq!(session.exercise().unwrap(), &before);
        }
    }
}
