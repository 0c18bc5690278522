use serde::{Deserialize, Serialize};

/// Name fragments that mark a speaker as the AI side of a conversation.
/// Matched as lowercase substrings, so "Aiden" or "Craig" also match.
const COUNTERPART_MARKERS: &[&str] = &["chatgpt", "ai"];

/// Coarse speaker role.
///
/// Stored as `"user"` / `"assistant"` so conversations saved by earlier
/// versions of the app deserialize unchanged.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Role {
    /// The human whose language is being evaluated.
    #[serde(rename = "user")]
    Learner,
    /// Any detected AI/assistant party.
    #[serde(rename = "assistant")]
    Counterpart,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Learner => "learner",
            Role::Counterpart => "counterpart",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Map a speaker name to its role.
pub fn classify_speaker(name: &str) -> Role {
    let lower = name.to_lowercase();
    if COUNTERPART_MARKERS.iter().any(|m| lower.contains(m)) {
        Role::Counterpart
    } else {
        Role::Learner
    }
}

/// One speaker-attributed turn of a conversation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Message {
    pub id: String,
    pub sender: String,
    pub text: String,
    /// Always derived from `sender`; see [`Message::rename_sender`].
    role: Role,
    pub timestamp: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis: Option<AnalysisResult>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub viewed: bool,
}

impl Message {
    /// Build a message, deriving `role` from `sender`.
    pub fn new(
        id: impl Into<String>,
        sender: impl Into<String>,
        text: impl Into<String>,
        timestamp: impl Into<String>,
    ) -> Self {
        let sender = sender.into();
        let role = classify_speaker(&sender);
        Self {
            id: id.into(),
            sender,
            text: text.into(),
            role,
            timestamp: timestamp.into(),
            analysis: None,
            viewed: false,
        }
    }

    /// Rename the speaker and reclassify the role from the new name.
    pub fn rename_sender(&mut self, name: &str) {
        self.sender = name.to_string();
        self.role = classify_speaker(name);
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn is_learner(&self) -> bool {
        self.role == Role::Learner
    }
}

/// Per-message grammar/naturalness feedback.
///
/// Scores are on a 1-10 scale. Providers may return fractional values.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub grammar_errors: String,
    pub grammar_score: f32,
    pub naturalness_rating: String,
    pub naturalness_score: f32,
    pub improvement: String,
    pub extensions: String,
    pub is_natural: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VocabularySuggestion {
    pub phrase: String,
    pub reason: String,
    pub example: String,
}

/// Whole-conversation performance summary.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ConversationSummary {
    pub grammar_performance: String,
    #[serde(default)]
    pub grammar_score: f32,
    pub clarity_evaluation: String,
    #[serde(default)]
    pub clarity_score: f32,
    pub flow_analysis: String,
    #[serde(default)]
    pub flow_score: f32,
    #[serde(default)]
    pub key_suggestions: Vec<String>,
    #[serde(default)]
    pub suggested_vocabulary: Vec<VocabularySuggestion>,
}

/// Topic-driven vocabulary and sentence suggestions.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CheatSheet {
    pub vocabulary: Vec<String>,
    pub sentences: Vec<String>,
}

/// Difficulty of a practice topic.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum TopicLevel {
    /// Beginner: simple, everyday vocabulary.
    #[default]
    A,
    /// Intermediate: common expressions.
    B,
    /// Advanced: a wider range of natural expressions.
    C,
}

impl TopicLevel {
    pub const ALL: [TopicLevel; 3] = [TopicLevel::A, TopicLevel::B, TopicLevel::C];

    pub fn as_str(&self) -> &'static str {
        match self {
            TopicLevel::A => "A",
            TopicLevel::B => "B",
            TopicLevel::C => "C",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "A" | "a" => Some(TopicLevel::A),
            "B" | "b" => Some(TopicLevel::B),
            "C" | "c" => Some(TopicLevel::C),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TopicLevel::A => "Beginner",
            TopicLevel::B => "Intermediate",
            TopicLevel::C => "Advanced",
        }
    }
}

/// Traffic-light bucket for a 1-10 score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreBand {
    High,
    Medium,
    Low,
}

impl ScoreBand {
    pub fn from_score(score: f32) -> Self {
        if score >= 8.0 {
            ScoreBand::High
        } else if score >= 5.0 {
            ScoreBand::Medium
        } else {
            ScoreBand::Low
        }
    }
}
