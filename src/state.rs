use crate::config::AppConfig;
use crate::db;
use crate::users::repo::PgUserRepository;
use crate::users::services::UserService;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub users: UserService,
}

impl AppState {
    pub async fn init(config: AppConfig) -> anyhow::Result<Self> {
        let pool = db::connect(&config.database).await?;
        db::migrate(&pool).await?;

        let users = UserService::new(Arc::new(PgUserRepository::new(pool)));
        Ok(Self::from_parts(Arc::new(config), users))
    }

    pub fn from_parts(config: Arc<AppConfig>, users: UserService) -> Self {
        Self { config, users }
    }

    /// State backed by the in-memory repository, for handler tests.
    #[cfg(test)]
    pub fn fake() -> Self {
        use crate::users::memory::InMemoryUserRepository;

        let config = AppConfig::from_lookup(|_| None).expect("default config");
        let users = UserService::new(Arc::new(InMemoryUserRepository::new()));
        Self::from_parts(Arc::new(config), users)
    }
}
