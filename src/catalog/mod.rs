//! Static catalogs: CEFR levels, practice skills and topics
//!
//! These are compiled-in configuration data. Nothing here is editable at
//! runtime.

use serde::{Deserialize, Serialize};

/// CEFR proficiency level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Level {
    A1,
    A2,
    B1,
    #[serde(rename = "B1+")]
    B1Plus,
    B2,
    C1,
}

impl Level {
    /// All levels, lowest first
    pub fn all() -> &'static [Level] {
        &[Self::A1, Self::A2, Self::B1, Self::B1Plus, Self::B2, Self::C1]
    }

    /// Short CEFR code used in prompts and badges
    pub fn code(&self) -> &'static str {
        match self {
            Self::A1 => "A1",
            Self::A2 => "A2",
            Self::B1 => "B1",
            Self::B1Plus => "B1+",
            Self::B2 => "B2",
            Self::C1 => "C1",
        }
    }

    /// Display label for the level picker
    pub fn label(&self) -> &'static str {
        match self {
            Self::A1 => "A1 Elementary",
            Self::A2 => "A2 Pre-intermediate",
            Self::B1 => "B1 Intermediate",
            Self::B1Plus => "B1+ Intermediate Plus",
            Self::B2 => "B2 Upper Intermediate",
            Self::C1 => "C1 Advanced",
        }
    }

    /// Position in [`Level::all`], used to pick the accent color
    pub fn index(&self) -> usize {
        Self::all().iter().position(|l| l == self).unwrap_or(0)
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

impl std::str::FromStr for Level {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "A1" => Ok(Self::A1),
            "A2" => Ok(Self::A2),
            "B1" => Ok(Self::B1),
            "B1+" | "B1PLUS" | "B1-PLUS" => Ok(Self::B1Plus),
            "B2" => Ok(Self::B2),
            "C1" => Ok(Self::C1),
            _ => Err(format!("Unknown level: {}. Options: A1, A2, B1, B1+, B2, C1", s)),
        }
    }
}

/// Practice category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Skill {
    Grammar,
    Vocabulary,
    Reading,
    /// Reserved; never offered in the skill picker
    Listening,
    UseOfEnglish,
}

impl Skill {
    /// Skills the user can pick
    pub fn offered() -> &'static [Skill] {
        &[Self::Grammar, Self::Vocabulary, Self::Reading, Self::UseOfEnglish]
    }

    /// English name, as used in generation prompts
    pub fn name(&self) -> &'static str {
        match self {
            Self::Grammar => "Grammar",
            Self::Vocabulary => "Vocabulary",
            Self::Reading => "Reading",
            Self::Listening => "Listening",
            Self::UseOfEnglish => "Use of English",
        }
    }

    /// Portuguese label shown in the skill picker
    pub fn label(&self) -> &'static str {
        match self {
            Self::Grammar => "Gramática",
            Self::Vocabulary => "Vocabulário",
            Self::Reading => "Leitura",
            Self::Listening => "Compreensão Oral",
            Self::UseOfEnglish => "Uso do Inglês",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Grammar => "Regras e estruturas",
            Self::Vocabulary => "Palavras e expressões",
            Self::Reading => "Compreensão de texto",
            Self::Listening => "Em breve",
            Self::UseOfEnglish => "Collocations e phrasal verbs",
        }
    }
}

impl std::fmt::Display for Skill {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for Skill {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['_', ' '], "-");
        match normalized.as_str() {
            "grammar" => Ok(Self::Grammar),
            "vocabulary" | "vocab" => Ok(Self::Vocabulary),
            "reading" => Ok(Self::Reading),
            "use-of-english" | "use" => Ok(Self::UseOfEnglish),
            _ => Err(format!(
                "Unknown skill: {}. Options: grammar, vocabulary, reading, use-of-english",
                s
            )),
        }
    }
}

/// A named sub-area within a skill
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Topic {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
}

pub const GRAMMAR_TOPICS: &[Topic] = &[
    Topic { id: "tenses", name: "Present & Past Tenses", description: "Simple, Continuous, Perfect" },
    Topic { id: "modals", name: "Modal Verbs", description: "Can, Could, Should, Must" },
    Topic { id: "conditionals", name: "Conditionals", description: "Zero, First, Second, Third" },
    Topic { id: "passive", name: "Passive Voice", description: "Formation and usage" },
    Topic { id: "prepositions", name: "Prepositions", description: "In, On, At, By, For" },
];

pub const VOCAB_TOPICS: &[Topic] = &[
    Topic { id: "daily_life", name: "Daily Life & Routines", description: "Everyday activities" },
    Topic { id: "business", name: "Business English", description: "Workplace and meetings" },
    Topic { id: "travel", name: "Travel & Tourism", description: "Airports, hotels, directions" },
    Topic { id: "phrasal_verbs", name: "Common Phrasal Verbs", description: "Get up, look for, etc." },
    Topic {
        id: "false_cognates",
        name: "False Cognates (Falsos Amigos)",
        description: "Pretend vs Intend, Push vs Pull",
    },
];

/// Topics offered for a skill
///
/// Reading and Use of English draw from both catalogs, grammar first.
pub fn topics_for(skill: Skill) -> Vec<Topic> {
    match skill {
        Skill::Grammar => GRAMMAR_TOPICS.to_vec(),
        Skill::Vocabulary => VOCAB_TOPICS.to_vec(),
        _ => GRAMMAR_TOPICS.iter().chain(VOCAB_TOPICS).copied().collect(),
    }
}

/// Look up a topic by id in either catalog
pub fn find_topic(id: &str) -> Option<Topic> {
    GRAMMAR_TOPICS.iter().chain(VOCAB_TOPICS).find(|t| t.id == id).copied()
}
