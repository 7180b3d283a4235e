use crate::error::ConfigurationError;
use crate::queryset::QuerySet;
use crate::view::ListRequest;

use super::{Predicate, SearchConfig};

/// Keyword search for list views / 列表视图关键字搜索
///
/// Implementors provide a name and a [`SearchConfig`]; every other method has
/// a default and may be overridden, e.g. to compute the fields per request.
///
/// A request without search text never touches `get_search_fields`, so a view
/// with no fields configured still lists normally until someone searches.
pub trait SearchFilter {
    /// Identifier used in configuration errors.
    fn view_name(&self) -> &str;

    fn search_config(&self) -> &SearchConfig;

    fn get_search_param(&self) -> &str {
        &self.search_config().search_param
    }

    fn get_search_fields(&self) -> Result<Vec<String>, ConfigurationError> {
        match &self.search_config().search_fields {
            Some(fields) if !fields.is_empty() => Ok(fields.clone()),
            _ => Err(ConfigurationError::MissingSearchFields {
                view: self.view_name().to_string(),
            }),
        }
    }

    /// Search text of the request, `None` when the parameter is absent or empty.
    fn get_search_value<'r>(&self, request: &'r ListRequest) -> Option<&'r str> {
        request
            .get(self.get_search_param())
            .filter(|value| !value.is_empty())
    }

    /// OR of one case-insensitive contains per search field, or
    /// [`Predicate::All`] when there is nothing to search for.
    fn get_search_query(&self, request: &ListRequest) -> Result<Predicate, ConfigurationError> {
        let Some(value) = self.get_search_value(request) else {
            return Ok(Predicate::All);
        };

        let query = self
            .get_search_fields()?
            .into_iter()
            .map(|field| Predicate::icontains(field, value))
            .reduce(|q1, q2| q1 | q2)
            .unwrap_or(Predicate::All);

        tracing::debug!("{} search query: {}", self.view_name(), query);
        Ok(query)
    }

    /// Narrow `queryset` to the rows matching the request's search text.
    fn search<Q: QuerySet>(&self, queryset: Q, request: &ListRequest) -> Result<Q, ConfigurationError> {
        Ok(queryset.filter(self.get_search_query(request)?))
    }
}
