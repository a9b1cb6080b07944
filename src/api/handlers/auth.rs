use axum::{extract::State, Extension, Json};
use chrono::Utc;
use serde::Serialize;

use crate::{
    api::{handlers::ApiResponse, middleware::auth::AuthUser, state::AppState},
    domain::{object_id, User, UserRole},
    error::{AppError, Result},
};

/// The fixed demo login identity. There is no credential check: this is a
/// trust-the-caller login for the dashboard challenge, not a security
/// boundary.
const DEMO_USER_EMAIL: &str = "student@anyware.com";
const DEMO_USER_NAME: &str = "Talia";
const DEMO_USER_AVATAR: &str = "https://picsum.photos/200";

#[derive(Debug, Serialize)]
pub struct UserProfile {
    pub id: String,
    pub name: String,
    pub email: String,
    pub avatar: String,
    pub role: UserRole,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            avatar: user.avatar,
            role: user.role,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LoginData {
    pub user: UserProfile,
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct CurrentUserData {
    pub user: UserProfile,
}

pub async fn login(State(state): State<AppState>) -> Result<Json<ApiResponse<LoginData>>> {
    let user = find_or_create_demo_user(&state).await?;
    let token = state.token_service.issue(&user.id)?;

    Ok(Json(ApiResponse::with_message(
        LoginData {
            user: user.into(),
            token,
        },
        "Login successful",
    )))
}

pub async fn logout() -> Json<ApiResponse<()>> {
    // Tokens are stateless; nothing to invalidate server-side.
    Json(ApiResponse::message("Logout successful"))
}

pub async fn me(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> Result<Json<ApiResponse<CurrentUserData>>> {
    let user = state
        .user_repo
        .find_by_id(&auth_user.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(Json(ApiResponse::data(CurrentUserData {
        user: user.into(),
    })))
}

async fn find_or_create_demo_user(state: &AppState) -> Result<User> {
    if let Some(user) = state.user_repo.find_by_email(DEMO_USER_EMAIL).await? {
        return Ok(user);
    }

    let now = Utc::now();
    let user = User {
        id: object_id::generate(),
        name: DEMO_USER_NAME.to_string(),
        email: DEMO_USER_EMAIL.to_string(),
        avatar: DEMO_USER_AVATAR.to_string(),
        role: UserRole::Student,
        created_at: now,
        updated_at: now,
    };

    match state.user_repo.create(user).await {
        Ok(user) => Ok(user),
        // A concurrent first login may have won the insert; the unique email
        // constraint rejected ours, so fall back to the stored row.
        Err(create_err) => state
            .user_repo
            .find_by_email(DEMO_USER_EMAIL)
            .await?
            .ok_or(create_err),
    }
}
