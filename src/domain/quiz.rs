use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quiz {
    pub id: String,
    pub title: String,
    pub description: String,
    pub course: String,
    pub subject: String,
    pub topic: String,
    #[serde(rename = "type")]
    pub quiz_type: QuizType,
    pub due_date: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<i64>,
    pub total_points: i64,
    pub questions: Vec<Question>,
    pub is_active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A single multiple-choice question. `correct_answer` is a zero-based
/// index into `options`; writes guarantee it stays within bounds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer: i64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuizType {
    #[default]
    Quiz,
    Assignment,
}

impl QuizType {
    pub const ALLOWED: &'static str = "quiz, assignment";

    pub fn as_str(&self) -> &'static str {
        match self {
            QuizType::Quiz => "quiz",
            QuizType::Assignment => "assignment",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "quiz" => Some(QuizType::Quiz),
            "assignment" => Some(QuizType::Assignment),
            _ => None,
        }
    }
}

/// Optional filters applied to quiz list queries.
#[derive(Debug, Clone, Default)]
pub struct QuizFilter {
    pub quiz_type: Option<QuizType>,
    pub is_active: Option<bool>,
    pub course: Option<String>,
}
