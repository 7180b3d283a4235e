use axum::{extract::State, Json};
use std::sync::Arc;

use searchlist::models::{ListPage, User};
use searchlist::{ListRequest, ListView, Order, Predicate, QuerySet, SearchView, SqlQuerySet, ViewError};

use super::{render_list, ApiResponse};
use crate::state::AppState;

/// Enabled users, newest first / 启用的用户
pub struct UserListView;

impl ListView for UserListView {
    type QuerySet = SqlQuerySet;

    fn view_name(&self) -> &str {
        "UserListView"
    }

    fn get_queryset(&self, _request: &ListRequest) -> Result<SqlQuerySet, ViewError> {
        Ok(SqlQuerySet::new("users")
            .filter(Predicate::exact("enabled", true))
            .order_by("created_at", Order::Desc))
    }
}

/// GET /api/users?q=... - 用户列表
pub async fn list_users(
    State(state): State<Arc<AppState>>,
    request: ListRequest,
) -> Result<Json<ApiResponse<ListPage<User>>>, ViewError> {
    let view = SearchView::new(UserListView, state.config.view_config("users"));
    render_list(&view, &request, &state.db).await
}
