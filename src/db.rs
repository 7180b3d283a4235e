use anyhow::Result;
use chrono::{Duration, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

/// Run database migrations / 运行数据库迁移
pub async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS articles (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            body TEXT NOT NULL DEFAULT '',
            published INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id TEXT PRIMARY KEY,
            unique_id TEXT NOT NULL UNIQUE,
            username TEXT NOT NULL UNIQUE,
            email TEXT,
            phone TEXT,
            enabled INTEGER NOT NULL DEFAULT 1,
            created_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Insert demo rows into empty tables / 空表时写入示例数据
pub async fn seed_demo_data(pool: &SqlitePool) -> Result<()> {
    let article_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM articles")
        .fetch_one(pool)
        .await?;

    if article_count == 0 {
        let articles = [
            ("Hello, axum", "Routing and extractors in five minutes.", true),
            ("Searching list views", "Say hello to case-insensitive search.", true),
            ("SQLite tips", "LIKE, ESCAPE and 100% literal matches.", true),
            ("Draft: hello again", "Not ready yet.", false),
        ];
        let now = Utc::now();
        for (i, (title, body, published)) in articles.into_iter().enumerate() {
            // older rows first so the newest-first listing is stable
            let created_at = (now - Duration::minutes((articles.len() - i) as i64)).to_rfc3339();
            sqlx::query(
                "INSERT INTO articles (title, body, published, created_at) VALUES (?, ?, ?, ?)",
            )
            .bind(title)
            .bind(body)
            .bind(published)
            .bind(&created_at)
            .execute(pool)
            .await?;
        }
        tracing::info!("Seeded {} demo articles", articles.len());
    }

    let user_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(pool)
        .await?;

    if user_count == 0 {
        let users = [
            ("admin", Some("admin@example.org"), None, true),
            ("alice", Some("alice@example.org"), Some("13800000001"), true),
            ("bob", None, Some("13800000002"), true),
            ("mallory", Some("mallory@example.org"), None, false),
        ];
        let now = Utc::now().to_rfc3339();
        for (i, (username, email, phone, enabled)) in users.into_iter().enumerate() {
            sqlx::query(
                "INSERT INTO users (id, unique_id, username, email, phone, enabled, created_at)
                 VALUES (?, ?, ?, ?, ?, ?, ?)",
            )
            .bind((i + 1).to_string())
            .bind(Uuid::new_v4().to_string())
            .bind(username)
            .bind(email)
            .bind(phone)
            .bind(enabled)
            .bind(&now)
            .execute(pool)
            .await?;
        }
        tracing::info!("Seeded {} demo users", users.len());
    }

    Ok(())
}
