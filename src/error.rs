use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppError>;

/// A single failed validation rule, reported back to the client as
/// `{field, message}` inside the 400 response body.
#[derive(Debug, Clone, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation failed")]
    Validation(Vec<FieldError>),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Too many requests: {0}")]
    TooManyRequests(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Validation(details) => (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "success": false,
                    "error": "Validation failed",
                    "details": details,
                })),
            )
                .into_response(),
            AppError::BadRequest(msg) => error_body(StatusCode::BAD_REQUEST, &msg),
            AppError::Unauthorized(msg) => error_body(StatusCode::UNAUTHORIZED, &msg),
            AppError::NotFound(msg) => error_body(StatusCode::NOT_FOUND, &msg),
            AppError::TooManyRequests(msg) => error_body(StatusCode::TOO_MANY_REQUESTS, &msg),
            AppError::Config(msg) => {
                tracing::error!(target: "security", "Configuration error: {}", msg);
                error_body(StatusCode::INTERNAL_SERVER_ERROR, "Server configuration error.")
            }
            AppError::Database(msg) => {
                tracing::error!("Database error: {}", msg);
                error_body(StatusCode::INTERNAL_SERVER_ERROR, "Server error")
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                error_body(StatusCode::INTERNAL_SERVER_ERROR, "Server error")
            }
        }
    }
}

fn error_body(status: StatusCode, message: &str) -> Response {
    let body = Json(json!({
        "success": false,
        "error": message,
    }));

    (status, body).into_response()
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::Database(err.to_string())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut details = Vec::new();
        flatten_errors("", &errors, &mut details);
        details.sort_by(|a, b| a.field.cmp(&b.field));
        AppError::Validation(details)
    }
}

/// Walks nested validation errors and produces flat field paths such as
/// `author.role` or `questions[1].options`.
fn flatten_errors(prefix: &str, errors: &validator::ValidationErrors, out: &mut Vec<FieldError>) {
    use validator::ValidationErrorsKind;

    for (field, kind) in errors.errors() {
        let field = wire_field_name(field);
        let path = if prefix.is_empty() {
            field
        } else {
            format!("{prefix}.{field}")
        };

        match kind {
            ValidationErrorsKind::Field(field_errors) => {
                for err in field_errors {
                    let message = err
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("Invalid value for {path}"));
                    out.push(FieldError {
                        field: path.clone(),
                        message,
                    });
                }
            }
            ValidationErrorsKind::Struct(inner) => flatten_errors(&path, inner, out),
            ValidationErrorsKind::List(entries) => {
                for (index, inner) in entries {
                    flatten_errors(&format!("{path}[{index}]"), inner, out);
                }
            }
        }
    }
}

/// The validator derive reports Rust field names; clients see the wire
/// names, so snake_case becomes camelCase and the `type` fields get their
/// serialized name back.
fn wire_field_name(field: &str) -> String {
    match field {
        "announcement_type" | "quiz_type" => "type".to_string(),
        _ => {
            let mut out = String::with_capacity(field.len());
            let mut upper_next = false;
            for c in field.chars() {
                if c == '_' {
                    upper_next = true;
                } else if upper_next {
                    out.extend(c.to_uppercase());
                    upper_next = false;
                } else {
                    out.push(c);
                }
            }
            out
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[test]
    fn field_names_map_to_wire_names() {
        assert_eq!(wire_field_name("title"), "title");
        assert_eq!(wire_field_name("due_date"), "dueDate");
        assert_eq!(wire_field_name("total_points"), "totalPoints");
        assert_eq!(wire_field_name("correct_answer"), "correctAnswer");
        assert_eq!(wire_field_name("quiz_type"), "type");
        assert_eq!(wire_field_name("announcement_type"), "type");
    }

    #[test]
    fn reported_paths_use_wire_names() {
        #[derive(Validate)]
        struct Form {
            #[validate(length(min = 3, message = "Title must be longer"))]
            title: String,
            #[validate(length(min = 1, message = "Due date is required"))]
            due_date: String,
            #[validate(range(min = 1, message = "Total points must be positive"))]
            total_points: i64,
        }

        let form = Form {
            title: "ab".to_string(),
            due_date: String::new(),
            total_points: 0,
        };

        let err = AppError::from(form.validate().unwrap_err());
        let AppError::Validation(details) = err else {
            panic!("expected validation error");
        };

        let fields: Vec<_> = details.iter().map(|d| d.field.as_str()).collect();
        assert_eq!(fields, vec!["dueDate", "title", "totalPoints"]);
    }
}
