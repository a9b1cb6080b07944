//! Field rules shared by the request DTOs.
//!
//! Rules operate on trimmed values, matching what gets persisted. Each rule
//! carries the exact message reported back in the 400 `details` list.

use std::borrow::Cow;

use chrono::{DateTime, Utc};
use validator::ValidationError;

use crate::{
    domain::{object_id, AnnouncementType, AuthorRole, Priority, QuizType},
    error::{AppError, FieldError, Result},
};

fn rule_error(message: &'static str) -> ValidationError {
    let mut error = ValidationError::new("invalid");
    error.message = Some(Cow::Borrowed(message));
    error
}

fn owned_rule_error(message: String) -> ValidationError {
    let mut error = ValidationError::new("invalid");
    error.message = Some(Cow::Owned(message));
    error
}

/// Path-parameter ids must be well-formed before any query executes.
pub fn validate_id_param(id: &str) -> Result<()> {
    if object_id::is_valid(id) {
        Ok(())
    } else {
        Err(AppError::Validation(vec![FieldError {
            field: "id".to_string(),
            message: "Invalid id format".to_string(),
        }]))
    }
}

/// Maps an optional enum-valued query parameter, rejecting unknown values.
pub fn parse_enum_filter<T>(
    raw: Option<&str>,
    parse: impl Fn(&str) -> Option<T>,
    field: &str,
    message: &str,
) -> Result<Option<T>> {
    match raw {
        None => Ok(None),
        Some(value) => parse(value).map(Some).ok_or_else(|| {
            AppError::Validation(vec![FieldError {
                field: field.to_string(),
                message: message.to_string(),
            }])
        }),
    }
}

fn bounded(value: &str, min: usize, max: usize, required_msg: &'static str, bounds_msg: &'static str) -> std::result::Result<(), ValidationError> {
    let len = value.trim().chars().count();
    if len == 0 {
        return Err(rule_error(required_msg));
    }
    if len < min || len > max {
        return Err(rule_error(bounds_msg));
    }
    Ok(())
}

pub fn validate_title(title: &str) -> std::result::Result<(), ValidationError> {
    bounded(
        title,
        3,
        100,
        "Title is required",
        "Title must be between 3 and 100 characters",
    )
}

pub fn validate_content(content: &str) -> std::result::Result<(), ValidationError> {
    bounded(
        content,
        10,
        2000,
        "Content is required",
        "Content must be between 10 and 2000 characters",
    )
}

pub fn validate_description(description: &str) -> std::result::Result<(), ValidationError> {
    if description.trim().chars().count() == 0 {
        return Err(rule_error("Description is required"));
    }
    if description.trim().chars().count() > 500 {
        return Err(rule_error("Description cannot exceed 500 characters"));
    }
    Ok(())
}

pub fn validate_subject_length(subject: &str) -> std::result::Result<(), ValidationError> {
    if subject.trim().chars().count() > 100 {
        return Err(rule_error("Subject cannot be more than 100 characters"));
    }
    Ok(())
}

pub fn validate_required_course(course: &str) -> std::result::Result<(), ValidationError> {
    bounded(
        course,
        1,
        100,
        "Course is required",
        "Course cannot be more than 100 characters",
    )
}

pub fn validate_required_subject(subject: &str) -> std::result::Result<(), ValidationError> {
    bounded(
        subject,
        1,
        100,
        "Subject is required",
        "Subject cannot be more than 100 characters",
    )
}

pub fn validate_required_topic(topic: &str) -> std::result::Result<(), ValidationError> {
    bounded(
        topic,
        1,
        200,
        "Topic is required",
        "Topic cannot be more than 200 characters",
    )
}

pub fn validate_instructions(instructions: &str) -> std::result::Result<(), ValidationError> {
    if instructions.trim().chars().count() > 1000 {
        return Err(rule_error("Instructions cannot be more than 1000 characters"));
    }
    Ok(())
}

pub fn validate_author_name(name: &str) -> std::result::Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(rule_error("Author name is required"));
    }
    Ok(())
}

pub fn validate_author_role(role: &str) -> std::result::Result<(), ValidationError> {
    if AuthorRole::parse(role).is_none() {
        return Err(owned_rule_error(format!(
            "Author role must be one of: {}",
            AuthorRole::ALLOWED
        )));
    }
    Ok(())
}

pub fn validate_announcement_type(value: &str) -> std::result::Result<(), ValidationError> {
    if AnnouncementType::parse(value).is_none() {
        return Err(owned_rule_error(format!(
            "Type must be one of: {}",
            AnnouncementType::ALLOWED
        )));
    }
    Ok(())
}

pub fn validate_priority(value: &str) -> std::result::Result<(), ValidationError> {
    if Priority::parse(value).is_none() {
        return Err(owned_rule_error(format!(
            "Priority must be one of: {}",
            Priority::ALLOWED
        )));
    }
    Ok(())
}

pub fn validate_quiz_type(value: &str) -> std::result::Result<(), ValidationError> {
    if QuizType::parse(value).is_none() {
        return Err(owned_rule_error(format!(
            "Type must be one of: {}",
            QuizType::ALLOWED
        )));
    }
    Ok(())
}

pub fn validate_question_text(question: &str) -> std::result::Result<(), ValidationError> {
    if question.trim().is_empty() {
        return Err(rule_error("Question text is required"));
    }
    Ok(())
}

pub fn validate_course_filter(course: &str) -> std::result::Result<(), ValidationError> {
    if course.trim().is_empty() {
        return Err(rule_error("Course filter cannot be empty"));
    }
    Ok(())
}

/// Due dates must parse as RFC 3339 and sit strictly in the future.
pub fn validate_due_date(raw: &str) -> std::result::Result<(), ValidationError> {
    let Ok(parsed) = DateTime::parse_from_rfc3339(raw) else {
        return Err(rule_error("Due date must be a valid date"));
    };
    if parsed.with_timezone(&Utc) <= Utc::now() {
        return Err(rule_error("Due date must be in the future"));
    }
    Ok(())
}

/// Re-parses a due date that already passed [`validate_due_date`].
pub fn parse_due_date(raw: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| AppError::Internal(format!("Due date failed to re-parse: {e}")))
}
