use serde::{Deserialize, Serialize};

/// Query parameter read when a view does not configure one.
pub const DEFAULT_SEARCH_PARAM: &str = "q";

/// Search configuration of one list view / 列表视图搜索配置
///
/// `search_fields` has no default: leaving it unset is only reported when a
/// request actually carries search text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Query parameter holding the search text / 搜索参数名
    #[serde(default = "default_search_param")]
    pub search_param: String,
    /// Fields matched against the search text / 搜索字段
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_fields: Option<Vec<String>>,
}

fn default_search_param() -> String {
    DEFAULT_SEARCH_PARAM.to_string()
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            search_param: default_search_param(),
            search_fields: None,
        }
    }
}

impl SearchConfig {
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            search_fields: Some(fields.into_iter().map(Into::into).collect()),
            ..Self::default()
        }
    }

    /// Replace the query parameter name.
    pub fn with_param(mut self, param: impl Into<String>) -> Self {
        self.search_param = param.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SearchConfig::default();
        assert_eq!(config.search_param, "q");
        assert_eq!(config.search_fields, None);
    }

    #[test]
    fn test_deserialize_partial() {
        let config: SearchConfig = serde_json::from_str(r#"{"search_fields": ["title"]}"#).unwrap();
        assert_eq!(config.search_param, "q");
        assert_eq!(config.search_fields, Some(vec!["title".to_string()]));

        let config: SearchConfig = serde_json::from_str(r#"{"search_param": "term"}"#).unwrap();
        assert_eq!(config.search_param, "term");
        assert_eq!(config.search_fields, None);
    }
}
