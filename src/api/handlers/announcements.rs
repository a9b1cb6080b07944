use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::Utc;
use serde::Deserialize;
use validator::Validate;

use crate::{
    api::{
        extract::ApiQuery,
        handlers::{ApiResponse, ListResponse, Pagination},
        middleware::auth::AuthUser,
        state::AppState,
        validation,
    },
    domain::{
        object_id, user::DEFAULT_AVATAR, Announcement, AnnouncementFilter, AnnouncementType,
        Author, AuthorRole, Priority,
    },
    error::{AppError, Result},
};

const DEFAULT_PAGE: i64 = 1;
const DEFAULT_LIMIT: i64 = 10;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ListAnnouncementsQuery {
    #[validate(range(min = 1, message = "Page must be a positive integer"))]
    pub page: Option<i64>,
    #[validate(range(min = 1, max = 100, message = "Limit must be between 1 and 100"))]
    pub limit: Option<i64>,
    pub priority: Option<String>,
    pub is_active: Option<bool>,
    #[validate(custom(function = crate::api::validation::validate_course_filter))]
    pub course: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateAnnouncementRequest {
    #[serde(default)]
    #[validate(custom(function = crate::api::validation::validate_title))]
    pub title: String,
    #[serde(default)]
    #[validate(custom(function = crate::api::validation::validate_content))]
    pub content: String,
    #[serde(default)]
    #[validate(nested)]
    pub author: AuthorPayload,
    #[validate(custom(function = crate::api::validation::validate_subject_length))]
    pub subject: Option<String>,
    #[serde(default)]
    #[validate(custom(function = crate::api::validation::validate_required_course))]
    pub course: String,
    #[serde(rename = "type")]
    #[validate(custom(function = crate::api::validation::validate_announcement_type))]
    pub announcement_type: Option<String>,
    #[validate(custom(function = crate::api::validation::validate_priority))]
    pub priority: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AuthorPayload {
    #[serde(default)]
    #[validate(custom(function = crate::api::validation::validate_author_name))]
    pub name: String,
    pub avatar: Option<String>,
    #[serde(default)]
    #[validate(custom(function = crate::api::validation::validate_author_role))]
    pub role: String,
}

impl AuthorPayload {
    fn into_author(self) -> Result<Author> {
        Ok(Author {
            name: self.name.trim().to_string(),
            avatar: self.avatar.unwrap_or_else(|| DEFAULT_AVATAR.to_string()),
            role: AuthorRole::parse(&self.role).ok_or_else(|| {
                AppError::Internal("Author role passed validation but failed to parse".to_string())
            })?,
        })
    }
}

impl CreateAnnouncementRequest {
    fn into_announcement(self, created_by: String) -> Result<Announcement> {
        let now = Utc::now();
        Ok(Announcement {
            id: object_id::generate(),
            title: self.title.trim().to_string(),
            content: self.content.trim().to_string(),
            author: self.author.into_author()?,
            subject: self.subject.map(|s| s.trim().to_string()),
            course: Some(self.course.trim().to_string()),
            announcement_type: self
                .announcement_type
                .as_deref()
                .and_then(AnnouncementType::parse)
                .unwrap_or_default(),
            priority: self
                .priority
                .as_deref()
                .and_then(Priority::parse)
                .unwrap_or_default(),
            is_active: self.is_active.unwrap_or(true),
            created_by,
            created_at: now,
            updated_at: now,
        })
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAnnouncementRequest {
    #[validate(custom(function = crate::api::validation::validate_title))]
    pub title: Option<String>,
    #[validate(custom(function = crate::api::validation::validate_content))]
    pub content: Option<String>,
    #[validate(nested)]
    pub author: Option<AuthorPayload>,
    #[validate(custom(function = crate::api::validation::validate_subject_length))]
    pub subject: Option<String>,
    #[validate(custom(function = crate::api::validation::validate_required_course))]
    pub course: Option<String>,
    #[serde(rename = "type")]
    #[validate(custom(function = crate::api::validation::validate_announcement_type))]
    pub announcement_type: Option<String>,
    #[validate(custom(function = crate::api::validation::validate_priority))]
    pub priority: Option<String>,
    pub is_active: Option<bool>,
}

impl UpdateAnnouncementRequest {
    /// Overlays present fields on the stored document; absent fields keep
    /// their prior values.
    fn apply_to(self, announcement: &mut Announcement) -> Result<()> {
        if let Some(title) = self.title {
            announcement.title = title.trim().to_string();
        }
        if let Some(content) = self.content {
            announcement.content = content.trim().to_string();
        }
        if let Some(author) = self.author {
            announcement.author = author.into_author()?;
        }
        if let Some(subject) = self.subject {
            announcement.subject = Some(subject.trim().to_string());
        }
        if let Some(course) = self.course {
            announcement.course = Some(course.trim().to_string());
        }
        if let Some(raw) = self.announcement_type {
            announcement.announcement_type =
                AnnouncementType::parse(&raw).ok_or_else(|| {
                    AppError::Internal("Type passed validation but failed to parse".to_string())
                })?;
        }
        if let Some(raw) = self.priority {
            announcement.priority = Priority::parse(&raw).ok_or_else(|| {
                AppError::Internal("Priority passed validation but failed to parse".to_string())
            })?;
        }
        if let Some(is_active) = self.is_active {
            announcement.is_active = is_active;
        }
        Ok(())
    }
}

pub async fn list(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<ListAnnouncementsQuery>,
) -> Result<Json<ListResponse<Announcement>>> {
    params.validate()?;

    let page = params.page.unwrap_or(DEFAULT_PAGE);
    let limit = params.limit.unwrap_or(DEFAULT_LIMIT);
    // Saturates so an absurd page number yields an empty page, not a panic.
    let offset = page.saturating_sub(1).saturating_mul(limit);

    let filter = AnnouncementFilter {
        priority: validation::parse_enum_filter(
            params.priority.as_deref(),
            Priority::parse,
            "priority",
            "Priority must be one of: low, medium, high",
        )?,
        is_active: params.is_active,
        course: params.course,
    };

    let announcements = state.announcement_repo.list(&filter, limit, offset).await?;
    let total = state.announcement_repo.count(&filter).await?;

    Ok(Json(ListResponse::new(
        announcements,
        Pagination::new(page, limit, total),
    )))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Announcement>>> {
    validation::validate_id_param(&id)?;

    let announcement = state
        .announcement_repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::NotFound("Announcement not found".to_string()))?;

    Ok(Json(ApiResponse::data(announcement)))
}

pub async fn create(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Json(payload): Json<CreateAnnouncementRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Announcement>>)> {
    payload.validate()?;

    // createdBy is always stamped from the authenticated identity, never
    // taken from the request body.
    let announcement = payload.into_announcement(auth_user.user_id)?;
    let created = state.announcement_repo.create(announcement).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(
            created,
            "Announcement created successfully",
        )),
    ))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateAnnouncementRequest>,
) -> Result<Json<ApiResponse<Announcement>>> {
    validation::validate_id_param(&id)?;
    payload.validate()?;

    let mut announcement = state
        .announcement_repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::NotFound("Announcement not found".to_string()))?;

    payload.apply_to(&mut announcement)?;

    let updated = state.announcement_repo.update(&id, announcement).await?;

    Ok(Json(ApiResponse::with_message(
        updated,
        "Announcement updated successfully",
    )))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>> {
    validation::validate_id_param(&id)?;

    if !state.announcement_repo.delete(&id).await? {
        return Err(AppError::NotFound("Announcement not found".to_string()));
    }

    Ok(Json(ApiResponse::message(
        "Announcement deleted successfully",
    )))
}
