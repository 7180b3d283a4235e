use sqlx::SqlitePool;
use searchlist::config::AppConfig;

/// Shared application state / 应用共享状态
pub struct AppState {
    pub db: SqlitePool,
    /// Read-only after startup / 启动后只读
    pub config: AppConfig,
}
