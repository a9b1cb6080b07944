use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{
    api::{
        extract::ApiQuery,
        handlers::{ApiResponse, ListResponse, Pagination},
        state::AppState,
        validation,
    },
    domain::{object_id, Question, Quiz, QuizFilter, QuizType},
    error::{AppError, FieldError, Result},
};

const DEFAULT_PAGE: i64 = 1;
const DEFAULT_LIMIT: i64 = 10;
const UPCOMING_LIMIT: i64 = 5;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ListQuizzesQuery {
    #[validate(range(min = 1, message = "Page must be a positive integer"))]
    pub page: Option<i64>,
    #[validate(range(min = 1, max = 100, message = "Limit must be between 1 and 100"))]
    pub limit: Option<i64>,
    #[serde(rename = "type")]
    pub quiz_type: Option<String>,
    pub is_active: Option<bool>,
    #[validate(custom(function = crate::api::validation::validate_course_filter))]
    pub course: Option<String>,
}

// Serialize is needed because the list-level length rule records the
// offending value as an error param.
#[derive(Debug, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct QuestionPayload {
    #[serde(default)]
    #[validate(custom(function = crate::api::validation::validate_question_text))]
    pub question: String,
    #[serde(default)]
    #[validate(length(min = 2, max = 6, message = "Each question must have 2-6 options"))]
    pub options: Vec<String>,
    pub correct_answer: Option<i64>,
}

impl QuestionPayload {
    fn into_question(self) -> Result<Question> {
        Ok(Question {
            question: self.question.trim().to_string(),
            options: self
                .options
                .into_iter()
                .map(|o| o.trim().to_string())
                .collect(),
            correct_answer: self.correct_answer.ok_or_else(|| {
                AppError::Internal(
                    "Correct answer passed validation but was absent".to_string(),
                )
            })?,
        })
    }
}

/// correctAnswer has to land inside the options list; the per-field rules
/// cannot see across fields, so this runs after derive validation.
fn validate_correct_answers(questions: &[QuestionPayload]) -> Result<()> {
    let mut details = Vec::new();

    for (index, question) in questions.iter().enumerate() {
        let field = format!("questions[{index}].correctAnswer");
        match question.correct_answer {
            None => details.push(FieldError {
                field,
                message: "Correct answer index is required".to_string(),
            }),
            Some(answer) if answer < 0 || answer as usize >= question.options.len() => {
                details.push(FieldError {
                    field,
                    message: "Correct answer must be a valid option index".to_string(),
                })
            }
            Some(_) => {}
        }
    }

    if details.is_empty() {
        Ok(())
    } else {
        Err(AppError::Validation(details))
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateQuizRequest {
    #[serde(default)]
    #[validate(custom(function = crate::api::validation::validate_title))]
    pub title: String,
    #[serde(default)]
    #[validate(custom(function = crate::api::validation::validate_description))]
    pub description: String,
    #[serde(default)]
    #[validate(custom(function = crate::api::validation::validate_required_course))]
    pub course: String,
    #[serde(default)]
    #[validate(custom(function = crate::api::validation::validate_required_subject))]
    pub subject: String,
    #[serde(default)]
    #[validate(custom(function = crate::api::validation::validate_required_topic))]
    pub topic: String,
    #[serde(rename = "type")]
    #[validate(custom(function = crate::api::validation::validate_quiz_type))]
    pub quiz_type: Option<String>,
    #[serde(default, rename = "dueDate")]
    #[validate(custom(function = crate::api::validation::validate_due_date))]
    pub due_date: String,
    #[validate(range(min = 1, max = 480, message = "Duration must be between 1 and 480 minutes"))]
    pub duration: Option<i64>,
    #[serde(default, rename = "totalPoints")]
    #[validate(range(min = 1, max = 1000, message = "Total points must be between 1 and 1000"))]
    pub total_points: i64,
    #[serde(default)]
    #[validate(length(min = 1, message = "Quiz must have at least one question"), nested)]
    pub questions: Vec<QuestionPayload>,
    pub is_active: Option<bool>,
    #[validate(custom(function = crate::api::validation::validate_instructions))]
    pub instructions: Option<String>,
}

impl CreateQuizRequest {
    fn into_quiz(self) -> Result<Quiz> {
        let now = Utc::now();
        let due_date = validation::parse_due_date(&self.due_date)?;
        let questions = self
            .questions
            .into_iter()
            .map(QuestionPayload::into_question)
            .collect::<Result<Vec<_>>>()?;

        Ok(Quiz {
            id: object_id::generate(),
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
            course: self.course.trim().to_string(),
            subject: self.subject.trim().to_string(),
            topic: self.topic.trim().to_string(),
            quiz_type: self
                .quiz_type
                .as_deref()
                .and_then(QuizType::parse)
                .unwrap_or_default(),
            due_date,
            duration: self.duration,
            total_points: self.total_points,
            questions,
            is_active: self.is_active.unwrap_or(true),
            instructions: self.instructions.map(|i| i.trim().to_string()),
            created_at: now,
            updated_at: now,
        })
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateQuizRequest {
    #[validate(custom(function = crate::api::validation::validate_title))]
    pub title: Option<String>,
    #[validate(custom(function = crate::api::validation::validate_description))]
    pub description: Option<String>,
    #[validate(custom(function = crate::api::validation::validate_required_course))]
    pub course: Option<String>,
    #[validate(custom(function = crate::api::validation::validate_required_subject))]
    pub subject: Option<String>,
    #[validate(custom(function = crate::api::validation::validate_required_topic))]
    pub topic: Option<String>,
    #[serde(rename = "type")]
    #[validate(custom(function = crate::api::validation::validate_quiz_type))]
    pub quiz_type: Option<String>,
    #[serde(rename = "dueDate")]
    #[validate(custom(function = crate::api::validation::validate_due_date))]
    pub due_date: Option<String>,
    #[validate(range(min = 1, max = 480, message = "Duration must be between 1 and 480 minutes"))]
    pub duration: Option<i64>,
    #[serde(rename = "totalPoints")]
    #[validate(range(min = 1, max = 1000, message = "Total points must be between 1 and 1000"))]
    pub total_points: Option<i64>,
    #[validate(length(min = 1, message = "Quiz must have at least one question"), nested)]
    pub questions: Option<Vec<QuestionPayload>>,
    pub is_active: Option<bool>,
    #[validate(custom(function = crate::api::validation::validate_instructions))]
    pub instructions: Option<String>,
}

impl UpdateQuizRequest {
    fn apply_to(self, quiz: &mut Quiz) -> Result<()> {
        if let Some(title) = self.title {
            quiz.title = title.trim().to_string();
        }
        if let Some(description) = self.description {
            quiz.description = description.trim().to_string();
        }
        if let Some(course) = self.course {
            quiz.course = course.trim().to_string();
        }
        if let Some(subject) = self.subject {
            quiz.subject = subject.trim().to_string();
        }
        if let Some(topic) = self.topic {
            quiz.topic = topic.trim().to_string();
        }
        if let Some(raw) = self.quiz_type {
            quiz.quiz_type = QuizType::parse(&raw).ok_or_else(|| {
                AppError::Internal("Type passed validation but failed to parse".to_string())
            })?;
        }
        if let Some(raw) = self.due_date {
            quiz.due_date = validation::parse_due_date(&raw)?;
        }
        if let Some(duration) = self.duration {
            quiz.duration = Some(duration);
        }
        if let Some(total_points) = self.total_points {
            quiz.total_points = total_points;
        }
        if let Some(questions) = self.questions {
            quiz.questions = questions
                .into_iter()
                .map(QuestionPayload::into_question)
                .collect::<Result<Vec<_>>>()?;
        }
        if let Some(is_active) = self.is_active {
            quiz.is_active = is_active;
        }
        if let Some(instructions) = self.instructions {
            quiz.instructions = Some(instructions.trim().to_string());
        }
        Ok(())
    }
}

pub async fn list(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<ListQuizzesQuery>,
) -> Result<Json<ListResponse<Quiz>>> {
    params.validate()?;

    let page = params.page.unwrap_or(DEFAULT_PAGE);
    let limit = params.limit.unwrap_or(DEFAULT_LIMIT);
    // Saturates so an absurd page number yields an empty page, not a panic.
    let offset = page.saturating_sub(1).saturating_mul(limit);

    let filter = QuizFilter {
        quiz_type: validation::parse_enum_filter(
            params.quiz_type.as_deref(),
            QuizType::parse,
            "type",
            "Type must be one of: quiz, assignment",
        )?,
        is_active: params.is_active,
        course: params.course,
    };

    let quizzes = state.quiz_repo.list(&filter, limit, offset).await?;
    let total = state.quiz_repo.count(&filter).await?;

    Ok(Json(ListResponse::new(
        quizzes,
        Pagination::new(page, limit, total),
    )))
}

/// Up to five active quizzes due now or later, soonest first.
pub async fn upcoming(State(state): State<AppState>) -> Result<Json<ApiResponse<Vec<Quiz>>>> {
    let quizzes = state
        .quiz_repo
        .list_upcoming(Utc::now(), UPCOMING_LIMIT)
        .await?;

    Ok(Json(ApiResponse::data(quizzes)))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Quiz>>> {
    validation::validate_id_param(&id)?;

    let quiz = state
        .quiz_repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::NotFound("Quiz not found".to_string()))?;

    Ok(Json(ApiResponse::data(quiz)))
}

pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<CreateQuizRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Quiz>>)> {
    payload.validate()?;
    validate_correct_answers(&payload.questions)?;

    let quiz = payload.into_quiz()?;
    let created = state.quiz_repo.create(quiz).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(created, "Quiz created successfully")),
    ))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateQuizRequest>,
) -> Result<Json<ApiResponse<Quiz>>> {
    validation::validate_id_param(&id)?;
    payload.validate()?;
    if let Some(questions) = &payload.questions {
        validate_correct_answers(questions)?;
    }

    let mut quiz = state
        .quiz_repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::NotFound("Quiz not found".to_string()))?;

    payload.apply_to(&mut quiz)?;

    let updated = state.quiz_repo.update(&id, quiz).await?;

    Ok(Json(ApiResponse::with_message(
        updated,
        "Quiz updated successfully",
    )))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>> {
    validation::validate_id_param(&id)?;

    if !state.quiz_repo.delete(&id).await? {
        return Err(AppError::NotFound("Quiz not found".to_string()));
    }

    Ok(Json(ApiResponse::message("Quiz deleted successfully")))
}
