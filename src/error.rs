//! Error types for search filters and list views / 搜索过滤与列表视图错误类型

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

/// Raised when a view tries to search without `search_fields` configured.
///
/// This is a programmer error: it is never turned into a user-facing message
/// by the filter itself.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("{view} must set `search_fields` attribute or define `get_search_fields`")]
    MissingSearchFields { view: String },
}

/// Errors raised while evaluating a queryset in memory / 内存查询错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("unknown field `{0}`")]
    UnknownField(String),
}

/// Everything a list view can fail with / 列表视图错误
#[derive(Debug, Error)]
pub enum ViewError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    #[error(transparent)]
    Query(#[from] QueryError),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl IntoResponse for ViewError {
    fn into_response(self) -> Response {
        // Misconfiguration and query failures are server-side faults / 服务端错误
        tracing::error!("List view failed: {}", self);
        let message = match &self {
            ViewError::Configuration(e) => e.to_string(),
            ViewError::Query(e) => e.to_string(),
            ViewError::Database(_) => "database error".to_string(),
        };
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "code": 500,
                "message": message,
            })),
        )
            .into_response()
    }
}
