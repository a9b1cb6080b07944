use std::sync::Arc;

use sqlx::SqlitePool;

use crate::{
    auth::TokenService,
    config::Settings,
    repository::{
        AnnouncementRepository, QuizRepository, SqliteAnnouncementRepository,
        SqliteQuizRepository, SqliteUserRepository, UserRepository,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub user_repo: Arc<dyn UserRepository>,
    pub announcement_repo: Arc<dyn AnnouncementRepository>,
    pub quiz_repo: Arc<dyn QuizRepository>,
    pub token_service: Arc<TokenService>,
    pub settings: Arc<Settings>,
}

impl AppState {
    pub fn new(pool: SqlitePool, settings: Arc<Settings>) -> Self {
        let token_service = Arc::new(TokenService::new(
            settings.auth.jwt_secret.clone(),
            settings.auth.token_ttl_seconds,
        ));

        Self {
            user_repo: Arc::new(SqliteUserRepository::new(pool.clone())),
            announcement_repo: Arc::new(SqliteAnnouncementRepository::new(pool.clone())),
            quiz_repo: Arc::new(SqliteQuizRepository::new(pool)),
            token_service,
            settings,
        }
    }
}
