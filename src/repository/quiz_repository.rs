use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use sqlx::{FromRow, QueryBuilder, Sqlite, SqlitePool};

use crate::{
    domain::{Question, Quiz, QuizFilter, QuizType},
    error::{AppError, Result},
    repository::QuizRepository,
};

const COLUMNS: &str = "id, title, description, course, subject, topic, type, due_date, \
                       duration, total_points, questions, is_active, instructions, \
                       created_at, updated_at";

#[derive(FromRow)]
struct QuizRow {
    id: String,
    title: String,
    description: String,
    course: String,
    subject: String,
    topic: String,
    #[sqlx(rename = "type")]
    quiz_type: String,
    due_date: NaiveDateTime,
    duration: Option<i64>,
    total_points: i64,
    questions: String,
    is_active: i32,
    instructions: Option<String>,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

pub struct SqliteQuizRepository {
    pool: SqlitePool,
}

impl SqliteQuizRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_quiz(row: QuizRow) -> Result<Quiz> {
        let questions: Vec<Question> = serde_json::from_str(&row.questions)
            .map_err(|e| AppError::Database(format!("Invalid question list: {e}")))?;

        Ok(Quiz {
            id: row.id,
            title: row.title,
            description: row.description,
            course: row.course,
            subject: row.subject,
            topic: row.topic,
            quiz_type: QuizType::parse(&row.quiz_type)
                .ok_or_else(|| AppError::Database(format!("Invalid quiz type: {}", row.quiz_type)))?,
            due_date: DateTime::from_naive_utc_and_offset(row.due_date, Utc),
            duration: row.duration,
            total_points: row.total_points,
            questions,
            is_active: row.is_active != 0,
            instructions: row.instructions,
            created_at: DateTime::from_naive_utc_and_offset(row.created_at, Utc),
            updated_at: DateTime::from_naive_utc_and_offset(row.updated_at, Utc),
        })
    }

    fn encode_questions(questions: &[Question]) -> Result<String> {
        serde_json::to_string(questions)
            .map_err(|e| AppError::Internal(format!("Failed to encode question list: {e}")))
    }

    fn push_filter<'a>(builder: &mut QueryBuilder<'a, Sqlite>, filter: &'a QuizFilter) {
        let mut separator = " WHERE ";
        if let Some(quiz_type) = filter.quiz_type {
            builder.push(separator);
            builder.push("type = ");
            builder.push_bind(quiz_type.as_str());
            separator = " AND ";
        }
        if let Some(is_active) = filter.is_active {
            builder.push(separator);
            builder.push("is_active = ");
            builder.push_bind(if is_active { 1i32 } else { 0i32 });
            separator = " AND ";
        }
        if let Some(course) = filter.course.as_deref() {
            builder.push(separator);
            builder.push("course = ");
            builder.push_bind(course);
        }
    }
}

#[async_trait]
impl QuizRepository for SqliteQuizRepository {
    async fn create(&self, quiz: Quiz) -> Result<Quiz> {
        let questions_json = Self::encode_questions(&quiz.questions)?;

        sqlx::query(
            r#"
            INSERT INTO quizzes (
                id, title, description, course, subject, topic, type, due_date,
                duration, total_points, questions, is_active, instructions,
                created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&quiz.id)
        .bind(&quiz.title)
        .bind(&quiz.description)
        .bind(&quiz.course)
        .bind(&quiz.subject)
        .bind(&quiz.topic)
        .bind(quiz.quiz_type.as_str())
        .bind(quiz.due_date.naive_utc())
        .bind(quiz.duration)
        .bind(quiz.total_points)
        .bind(&questions_json)
        .bind(if quiz.is_active { 1i32 } else { 0i32 })
        .bind(&quiz.instructions)
        .bind(quiz.created_at.naive_utc())
        .bind(quiz.updated_at.naive_utc())
        .execute(&self.pool)
        .await?;

        self.find_by_id(&quiz.id)
            .await?
            .ok_or_else(|| AppError::Database("Failed to retrieve created quiz".to_string()))
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Quiz>> {
        let row = sqlx::query_as::<_, QuizRow>(&format!(
            "SELECT {COLUMNS} FROM quizzes WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(r) => Ok(Some(Self::row_to_quiz(r)?)),
            None => Ok(None),
        }
    }

    async fn list(&self, filter: &QuizFilter, limit: i64, offset: i64) -> Result<Vec<Quiz>> {
        let mut builder = QueryBuilder::new(format!("SELECT {COLUMNS} FROM quizzes"));
        Self::push_filter(&mut builder, filter);
        builder.push(" ORDER BY due_date ASC LIMIT ");
        builder.push_bind(limit);
        builder.push(" OFFSET ");
        builder.push_bind(offset);

        let rows = builder
            .build_query_as::<QuizRow>()
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(Self::row_to_quiz).collect()
    }

    async fn count(&self, filter: &QuizFilter) -> Result<i64> {
        let mut builder = QueryBuilder::new("SELECT COUNT(*) FROM quizzes");
        Self::push_filter(&mut builder, filter);

        let total = builder
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await?;

        Ok(total)
    }

    async fn list_upcoming(&self, now: DateTime<Utc>, limit: i64) -> Result<Vec<Quiz>> {
        let rows = sqlx::query_as::<_, QuizRow>(&format!(
            r#"
            SELECT {COLUMNS} FROM quizzes
            WHERE due_date >= ? AND is_active = 1
            ORDER BY due_date ASC
            LIMIT ?
            "#
        ))
        .bind(now.naive_utc())
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Self::row_to_quiz).collect()
    }

    async fn update(&self, id: &str, quiz: Quiz) -> Result<Quiz> {
        let questions_json = Self::encode_questions(&quiz.questions)?;
        let now = Utc::now().naive_utc();

        sqlx::query(
            r#"
            UPDATE quizzes
            SET title = ?, description = ?, course = ?, subject = ?, topic = ?,
                type = ?, due_date = ?, duration = ?, total_points = ?,
                questions = ?, is_active = ?, instructions = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&quiz.title)
        .bind(&quiz.description)
        .bind(&quiz.course)
        .bind(&quiz.subject)
        .bind(&quiz.topic)
        .bind(quiz.quiz_type.as_str())
        .bind(quiz.due_date.naive_utc())
        .bind(quiz.duration)
        .bind(quiz.total_points)
        .bind(&questions_json)
        .bind(if quiz.is_active { 1i32 } else { 0i32 })
        .bind(&quiz.instructions)
        .bind(now)
        .bind(id)
        .execute(&self.pool)
        .await?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::Database("Failed to retrieve updated quiz".to_string()))
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM quizzes WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
