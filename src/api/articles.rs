use axum::{extract::State, Json};
use std::sync::Arc;

use searchlist::models::{Article, ListPage};
use searchlist::{ListRequest, ListView, Order, Predicate, QuerySet, SearchView, SqlQuerySet, ViewError};

use super::{render_list, ApiResponse};
use crate::state::AppState;

/// Published articles, newest first / 已发布文章
pub struct ArticleListView;

impl ListView for ArticleListView {
    type QuerySet = SqlQuerySet;

    fn view_name(&self) -> &str {
        "ArticleListView"
    }

    fn get_queryset(&self, _request: &ListRequest) -> Result<SqlQuerySet, ViewError> {
        Ok(SqlQuerySet::new("articles")
            .filter(Predicate::exact("published", true))
            .order_by("created_at", Order::Desc)
            .order_by("id", Order::Desc))
    }
}

/// GET /api/articles?q=... - 文章列表
pub async fn list_articles(
    State(state): State<Arc<AppState>>,
    request: ListRequest,
) -> Result<Json<ApiResponse<ListPage<Article>>>, ViewError> {
    let view = SearchView::new(ArticleListView, state.config.view_config("articles"));
    render_list(&view, &request, &state.db).await
}
