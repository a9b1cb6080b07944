use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::*;
use crate::error::Result;

pub mod announcement_repository;
pub mod quiz_repository;
pub mod user_repository;

pub use announcement_repository::SqliteAnnouncementRepository;
pub use quiz_repository::SqliteQuizRepository;
pub use user_repository::SqliteUserRepository;

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, user: User) -> Result<User>;
    async fn find_by_id(&self, id: &str) -> Result<Option<User>>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;
}

#[async_trait]
pub trait AnnouncementRepository: Send + Sync {
    async fn create(&self, announcement: Announcement) -> Result<Announcement>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Announcement>>;
    async fn list(
        &self,
        filter: &AnnouncementFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Announcement>>;
    async fn count(&self, filter: &AnnouncementFilter) -> Result<i64>;
    async fn update(&self, id: &str, announcement: Announcement) -> Result<Announcement>;
    /// Returns false when no row matched the id.
    async fn delete(&self, id: &str) -> Result<bool>;
}

#[async_trait]
pub trait QuizRepository: Send + Sync {
    async fn create(&self, quiz: Quiz) -> Result<Quiz>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Quiz>>;
    async fn list(&self, filter: &QuizFilter, limit: i64, offset: i64) -> Result<Vec<Quiz>>;
    async fn count(&self, filter: &QuizFilter) -> Result<i64>;
    /// Active quizzes due at or after `now`, soonest first.
    async fn list_upcoming(&self, now: DateTime<Utc>, limit: i64) -> Result<Vec<Quiz>>;
    async fn update(&self, id: &str, quiz: Quiz) -> Result<Quiz>;
    /// Returns false when no row matched the id.
    async fn delete(&self, id: &str) -> Result<bool>;
}
