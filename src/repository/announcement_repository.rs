use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use sqlx::{FromRow, QueryBuilder, Sqlite, SqlitePool};

use crate::{
    domain::{Announcement, AnnouncementFilter, AnnouncementType, Author, AuthorRole, Priority},
    error::{AppError, Result},
    repository::AnnouncementRepository,
};

const COLUMNS: &str = "id, title, content, author_name, author_avatar, author_role, \
                       subject, course, type, priority, is_active, created_by, \
                       created_at, updated_at";

#[derive(FromRow)]
struct AnnouncementRow {
    id: String,
    title: String,
    content: String,
    author_name: String,
    author_avatar: String,
    author_role: String,
    subject: Option<String>,
    course: Option<String>,
    #[sqlx(rename = "type")]
    announcement_type: String,
    priority: String,
    is_active: i32,
    created_by: String,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

pub struct SqliteAnnouncementRepository {
    pool: SqlitePool,
}

impl SqliteAnnouncementRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_announcement(row: AnnouncementRow) -> Result<Announcement> {
        Ok(Announcement {
            id: row.id,
            title: row.title,
            content: row.content,
            author: Author {
                name: row.author_name,
                avatar: row.author_avatar,
                role: AuthorRole::parse(&row.author_role).ok_or_else(|| {
                    AppError::Database(format!("Invalid author role: {}", row.author_role))
                })?,
            },
            subject: row.subject,
            course: row.course,
            announcement_type: AnnouncementType::parse(&row.announcement_type).ok_or_else(
                || {
                    AppError::Database(format!(
                        "Invalid announcement type: {}",
                        row.announcement_type
                    ))
                },
            )?,
            priority: Priority::parse(&row.priority)
                .ok_or_else(|| AppError::Database(format!("Invalid priority: {}", row.priority)))?,
            is_active: row.is_active != 0,
            created_by: row.created_by,
            created_at: DateTime::from_naive_utc_and_offset(row.created_at, Utc),
            updated_at: DateTime::from_naive_utc_and_offset(row.updated_at, Utc),
        })
    }

    fn push_filter<'a>(builder: &mut QueryBuilder<'a, Sqlite>, filter: &'a AnnouncementFilter) {
        let mut separator = " WHERE ";
        if let Some(priority) = filter.priority {
            builder.push(separator);
            builder.push("priority = ");
            builder.push_bind(priority.as_str());
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
impl AnnouncementRepository for SqliteAnnouncementRepository {
    async fn create(&self, announcement: Announcement) -> Result<Announcement> {
        sqlx::query(
            r#"
            INSERT INTO announcements (
                id, title, content, author_name, author_avatar, author_role,
                subject, course, type, priority, is_active, created_by,
                created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&announcement.id)
        .bind(&announcement.title)
        .bind(&announcement.content)
        .bind(&announcement.author.name)
        .bind(&announcement.author.avatar)
        .bind(announcement.author.role.as_str())
        .bind(&announcement.subject)
        .bind(&announcement.course)
        .bind(announcement.announcement_type.as_str())
        .bind(announcement.priority.as_str())
        .bind(if announcement.is_active { 1i32 } else { 0i32 })
        .bind(&announcement.created_by)
        .bind(announcement.created_at.naive_utc())
        .bind(announcement.updated_at.naive_utc())
        .execute(&self.pool)
        .await?;

        self.find_by_id(&announcement.id).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve created announcement".to_string())
        })
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Announcement>> {
        let row = sqlx::query_as::<_, AnnouncementRow>(&format!(
            "SELECT {COLUMNS} FROM announcements WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(r) => Ok(Some(Self::row_to_announcement(r)?)),
            None => Ok(None),
        }
    }

    async fn list(
        &self,
        filter: &AnnouncementFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Announcement>> {
        let mut builder =
            QueryBuilder::new(format!("SELECT {COLUMNS} FROM announcements"));
        Self::push_filter(&mut builder, filter);
        builder.push(" ORDER BY created_at DESC LIMIT ");
        builder.push_bind(limit);
        builder.push(" OFFSET ");
        builder.push_bind(offset);

        let rows = builder
            .build_query_as::<AnnouncementRow>()
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(Self::row_to_announcement).collect()
    }

    async fn count(&self, filter: &AnnouncementFilter) -> Result<i64> {
        let mut builder = QueryBuilder::new("SELECT COUNT(*) FROM announcements");
        Self::push_filter(&mut builder, filter);

        let total = builder
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await?;

        Ok(total)
    }

    async fn update(&self, id: &str, announcement: Announcement) -> Result<Announcement> {
        let now = Utc::now().naive_utc();

        sqlx::query(
            r#"
            UPDATE announcements
            SET title = ?, content = ?, author_name = ?, author_avatar = ?,
                author_role = ?, subject = ?, course = ?, type = ?,
                priority = ?, is_active = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&announcement.title)
        .bind(&announcement.content)
        .bind(&announcement.author.name)
        .bind(&announcement.author.avatar)
        .bind(announcement.author.role.as_str())
        .bind(&announcement.subject)
        .bind(&announcement.course)
        .bind(announcement.announcement_type.as_str())
        .bind(announcement.priority.as_str())
        .bind(if announcement.is_active { 1i32 } else { 0i32 })
        .bind(now)
        .bind(id)
        .execute(&self.pool)
        .await?;

        self.find_by_id(id).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve updated announcement".to_string())
        })
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM announcements WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
