//! List views and their requests / 列表视图
//!
//! A [`ListView`] produces a queryset for a request. [`SearchView`] wraps any
//! list view and narrows its queryset with the request's search text.

use std::collections::HashMap;
use std::convert::Infallible;

use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::Uri;

use crate::error::ViewError;
use crate::queryset::QuerySet;
use crate::search::{SearchConfig, SearchFilter};

/// Query parameters of one request / 请求查询参数
///
/// When a key repeats, the last value wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListRequest {
    params: HashMap<String, String>,
}

impl ListRequest {
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            params: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Parse the query string of `uri`. A missing query gives an empty request.
    pub fn from_uri(uri: &Uri) -> Self {
        Self::from_query(uri.query().unwrap_or_default())
    }

    /// Decode a raw query string such as `q=hello&page=2`.
    ///
    /// Values are free text: characters a URI would reject (spaces, quotes)
    /// are kept as they are.
    pub fn from_query(query: &str) -> Self {
        match serde_urlencoded::from_str::<Vec<(String, String)>>(query) {
            Ok(pairs) => Self::from_pairs(pairs),
            Err(e) => {
                tracing::warn!("Ignoring undecodable query string {:?}: {}", query, e);
                Self::default()
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for ListRequest
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(ListRequest::from_uri(&parts.uri))
    }
}

/// A view that lists the rows of a queryset.
pub trait ListView {
    type QuerySet: QuerySet;

    fn view_name(&self) -> &str;

    fn get_queryset(&self, request: &ListRequest) -> Result<Self::QuerySet, ViewError>;
}

/// Adds keyword search to a list view / 为列表视图添加搜索
#[derive(Debug, Clone)]
pub struct SearchView<V> {
    inner: V,
    config: SearchConfig,
}

impl<V: ListView> SearchView<V> {
    pub fn new(inner: V, config: SearchConfig) -> Self {
        Self { inner, config }
    }

    pub fn inner(&self) -> &V {
        &self.inner
    }
}

impl<V: ListView> SearchFilter for SearchView<V> {
    fn view_name(&self) -> &str {
        self.inner.view_name()
    }

    fn search_config(&self) -> &SearchConfig {
        &self.config
    }
}

impl<V: ListView> ListView for SearchView<V> {
    type QuerySet = V::QuerySet;

    fn view_name(&self) -> &str {
        self.inner.view_name()
    }

    fn get_queryset(&self, request: &ListRequest) -> Result<Self::QuerySet, ViewError> {
        let queryset = self.inner.get_queryset(request)?;
        Ok(self.search(queryset, request)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigurationError;
    use crate::queryset::MemoryQuerySet;
    use crate::search::Predicate;
    use serde_json::json;

    /// Lists published posts only.
    struct PostListView;

    impl ListView for PostListView {
        type QuerySet = MemoryQuerySet;

        fn view_name(&self) -> &str {
            "PostListView"
        }

        fn get_queryset(&self, _request: &ListRequest) -> Result<MemoryQuerySet, ViewError> {
            let rows = MemoryQuerySet::from_values(vec![
                json!({"id": 1, "title": "Hello world", "body": "first", "published": true}),
                json!({"id": 2, "title": "Second", "body": "well HELLO there", "published": true}),
                json!({"id": 3, "title": "Third", "body": "nothing", "published": true}),
                json!({"id": 4, "title": "hello draft", "body": "wip", "published": false}),
            ]);
            Ok(rows.filter(Predicate::exact("published", true)))
        }
    }

    fn list(view: &SearchView<PostListView>, query: &str) -> Result<Vec<i64>, ViewError> {
        let rows = view.get_queryset(&ListRequest::from_query(query))?.into_rows()?;
        Ok(rows.iter().filter_map(|r| r["id"].as_i64()).collect())
    }

    #[test]
    fn test_request_from_query() {
        let req = ListRequest::from_query("q=hello+world&page=2");
        assert_eq!(req.get("q"), Some("hello world"));
        assert_eq!(req.get("page"), Some("2"));
        assert_eq!(req.get("missing"), None);
    }

    #[test]
    fn test_request_keeps_raw_free_text() {
        let req = ListRequest::from_query("q=hello world");
        assert_eq!(req.get("q"), Some("hello world"));

        let req = ListRequest::from_query("q=a\"b");
        assert_eq!(req.get("q"), Some("a\"b"));

        let req = ListRequest::from_query("q=%22quoted%22%20text");
        assert_eq!(req.get("q"), Some("\"quoted\" text"));
    }

    #[test]
    fn test_raw_free_text_still_searches() {
        let view = SearchView::new(PostListView, SearchConfig::new(["title", "body"]));
        assert_eq!(list(&view, "q=hello world").unwrap(), vec![1]);
    }

    #[test]
    fn test_request_repeated_key_keeps_last() {
        let req = ListRequest::from_query("q=first&q=second");
        assert_eq!(req.get("q"), Some("second"));
    }

    #[test]
    fn test_request_without_query() {
        let uri: Uri = "/api/articles".parse().unwrap();
        assert_eq!(ListRequest::from_uri(&uri), ListRequest::default());
    }

    #[test]
    fn test_search_across_fields() {
        let view = SearchView::new(PostListView, SearchConfig::new(["title", "body"]));
        assert_eq!(list(&view, "q=hello").unwrap(), vec![1, 2]);
    }

    #[test]
    fn test_no_search_value_keeps_prior_filters() {
        let view = SearchView::new(PostListView, SearchConfig::new(["title"]));
        assert_eq!(list(&view, "").unwrap(), vec![1, 2, 3]);
        assert_eq!(list(&view, "q=").unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn test_missing_fields_error_names_view() {
        let view = SearchView::new(PostListView, SearchConfig::default());
        assert_eq!(list(&view, "").unwrap(), vec![1, 2, 3]);

        match list(&view, "q=x") {
            Err(ViewError::Configuration(ConfigurationError::MissingSearchFields { view })) => {
                assert_eq!(view, "PostListView")
            }
            other => panic!("expected configuration error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_extractor_reads_uri() {
        let request = axum::http::Request::builder()
            .uri("/api/articles?term=rust")
            .body(())
            .unwrap();
        let (mut parts, _) = request.into_parts();
        let req = ListRequest::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(req.get("term"), Some("rust"));
    }
}
