use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Announcement {
    pub id: String,
    pub title: String,
    pub content: String,
    pub author: Author,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub course: Option<String>,
    #[serde(rename = "type")]
    pub announcement_type: AnnouncementType,
    pub priority: Priority,
    pub is_active: bool,
    /// Plain user-id string; no referential integrity is enforced.
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Author {
    pub name: String,
    pub avatar: String,
    pub role: AuthorRole,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthorRole {
    Teacher,
    Admin,
    Management,
}

impl AuthorRole {
    pub const ALLOWED: &'static str = "teacher, admin, management";

    pub fn as_str(&self) -> &'static str {
        match self {
            AuthorRole::Teacher => "teacher",
            AuthorRole::Admin => "admin",
            AuthorRole::Management => "management",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "teacher" => Some(AuthorRole::Teacher),
            "admin" => Some(AuthorRole::Admin),
            "management" => Some(AuthorRole::Management),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnnouncementType {
    #[default]
    General,
    Academic,
    Urgent,
}

impl AnnouncementType {
    pub const ALLOWED: &'static str = "general, academic, urgent";

    pub fn as_str(&self) -> &'static str {
        match self {
            AnnouncementType::General => "general",
            AnnouncementType::Academic => "academic",
            AnnouncementType::Urgent => "urgent",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "general" => Some(AnnouncementType::General),
            "academic" => Some(AnnouncementType::Academic),
            "urgent" => Some(AnnouncementType::Urgent),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub const ALLOWED: &'static str = "low, medium, high";

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "low" => Some(Priority::Low),
            "medium" => Some(Priority::Medium),
            "high" => Some(Priority::High),
            _ => None,
        }
    }
}

/// Optional filters applied to announcement list queries.
#[derive(Debug, Clone, Default)]
pub struct AnnouncementFilter {
    pub priority: Option<Priority>,
    pub is_active: Option<bool>,
    pub course: Option<String>,
}
