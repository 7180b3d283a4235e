pub mod articles;
pub mod server;
pub mod users;

use axum::{routing::get, Json, Router};
use serde::Serialize;
use sqlx::sqlite::{SqlitePool, SqliteRow};
use sqlx::FromRow;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use searchlist::models::ListPage;
use searchlist::{ListRequest, ListView, SqlQuerySet, ViewError};

use crate::state::AppState;

#[derive(Serialize)]
pub struct ApiResponse<T> {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            code: 200,
            message: "success".to_string(),
            data: Some(data),
        }
    }
}

/// Materialize a SQL-backed list view / 执行列表视图查询
pub async fn render_list<V, T>(
    view: &V,
    request: &ListRequest,
    db: &SqlitePool,
) -> Result<Json<ApiResponse<ListPage<T>>>, ViewError>
where
    V: ListView<QuerySet = SqlQuerySet>,
    T: for<'r> FromRow<'r, SqliteRow> + Send + Unpin + Serialize,
{
    let queryset = view.get_queryset(request)?;
    let items = queryset.fetch_all::<T>(db).await?;
    let total = queryset.count(db).await?;

    tracing::debug!("{} listed {} of {} rows", view.view_name(), items.len(), total);
    Ok(Json(ApiResponse::success(ListPage { items, total })))
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/health", get(server::health_check))
        .route("/api/articles", get(articles::list_articles))
        .route("/api/users", get(users::list_users))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use serde_json::Value;
    use sqlx::sqlite::SqlitePoolOptions;
    use tower::ServiceExt;

    use searchlist::config::AppConfig;
    use searchlist::SearchConfig;

    async fn test_state(config: AppConfig) -> Arc<AppState> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        crate::db::run_migrations(&pool).await.unwrap();
        crate::db::seed_demo_data(&pool).await.unwrap();
        Arc::new(AppState { db: pool, config })
    }

    async fn get_json(state: Arc<AppState>, uri: &str) -> (StatusCode, Value) {
        let response = router(state)
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn titles(body: &Value) -> Vec<String> {
        body["data"]["items"]
            .as_array()
            .unwrap()
            .iter()
            .map(|a| a["title"].as_str().unwrap().to_string())
            .collect()
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = get_json(test_state(AppConfig::default()).await, "/api/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_articles_search_title_or_body() {
        let state = test_state(AppConfig::default()).await;
        let (status, body) = get_json(state, "/api/articles?q=HELLO").await;
        assert_eq!(status, StatusCode::OK);
        // the unpublished draft is filtered out by the base view
        assert_eq!(titles(&body), vec!["Searching list views", "Hello, axum"]);
        assert_eq!(body["data"]["total"], 2);
    }

    #[tokio::test]
    async fn test_articles_without_search() {
        let state = test_state(AppConfig::default()).await;
        let (_, all) = get_json(state.clone(), "/api/articles").await;
        let (_, empty) = get_json(state, "/api/articles?q=").await;
        assert_eq!(all["data"]["total"], 3);
        assert_eq!(titles(&all), titles(&empty));
        assert_eq!(titles(&all)[0], "SQLite tips");
    }

    #[tokio::test]
    async fn test_articles_percent_is_literal() {
        let state = test_state(AppConfig::default()).await;
        let (_, body) = get_json(state, "/api/articles?q=100%25").await;
        assert_eq!(titles(&body), vec!["SQLite tips"]);
    }

    #[tokio::test]
    async fn test_custom_search_param() {
        let mut config = AppConfig::default();
        config
            .views
            .insert("articles".to_string(), SearchConfig::new(["title"]).with_param("term"));
        let state = test_state(config).await;

        let (_, body) = get_json(state.clone(), "/api/articles?term=sqlite").await;
        assert_eq!(titles(&body), vec!["SQLite tips"]);

        // `q` is no longer the search parameter
        let (_, body) = get_json(state, "/api/articles?q=sqlite").await;
        assert_eq!(body["data"]["total"], 3);
    }

    #[tokio::test]
    async fn test_unconfigured_view_fails_only_when_searching() {
        let mut config = AppConfig::default();
        config.views.remove("articles");
        let state = test_state(config).await;

        let (status, _) = get_json(state.clone(), "/api/articles").await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = get_json(state, "/api/articles?q=x").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        let message = body["message"].as_str().unwrap();
        assert!(message.contains("ArticleListView"));
        assert!(message.contains("search_fields"));
    }

    #[tokio::test]
    async fn test_unknown_field_is_a_database_error() {
        let mut config = AppConfig::default();
        config
            .views
            .insert("articles".to_string(), SearchConfig::new(["title", "summary"]));
        let state = test_state(config).await;

        let (status, _) = get_json(state.clone(), "/api/articles").await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = get_json(state, "/api/articles?q=x").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["message"], "database error");
    }

    #[tokio::test]
    async fn test_users_search() {
        let state = test_state(AppConfig::default()).await;

        let (_, body) = get_json(state.clone(), "/api/users?q=example.org").await;
        let mut names: Vec<&str> = body["data"]["items"]
            .as_array()
            .unwrap()
            .iter()
            .map(|u| u["username"].as_str().unwrap())
            .collect();
        names.sort();
        // mallory is disabled
        assert_eq!(names, vec!["admin", "alice"]);

        let (_, body) = get_json(state, "/api/users?q=13800000002").await;
        assert_eq!(body["data"]["items"][0]["username"], "bob");
        assert_eq!(body["data"]["total"], 1);
    }
}
