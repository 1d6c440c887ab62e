//! Request DTOs for the proxy API
//!
//! Query-parameter shapes for the proxied endpoints. The legacy front end
//! sends camelCase parameter names; they are preserved here.

use serde::Deserialize;

/// Query parameters of `GET /api/surah/:id`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChapterDetailQuery {
    /// Script variant (`uthmani` or `indopak`); defaults to `uthmani`
    pub font: Option<String>,
    /// Evict the cached entry before lookup, forcing a fresh fetch
    #[serde(rename = "clearCache")]
    pub clear_cache: Option<String>,
    /// Alias of `clearCache` kept for older clients
    #[serde(rename = "forceRefresh")]
    pub force_refresh: Option<String>,
}

impl ChapterDetailQuery {
    /// Script variant with the default applied.
    pub fn script(&self) -> &str {
        self.font.as_deref().unwrap_or("uthmani")
    }

    /// Whether either bypass flag was supplied with a truthy value.
    pub fn bypass_cache(&self) -> bool {
        let truthy = |v: &Option<String>| {
            v.as_deref()
                .map(|s| !s.is_empty() && s != "false" && s != "0")
                .unwrap_or(false)
        };
        truthy(&self.clear_cache) || truthy(&self.force_refresh)
    }
}

/// Query parameters of `GET /api/verses/random`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RandomVerseQuery {
    /// Comma-separated translation resource ids to include
    pub translations: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_script_default() {
        let query = ChapterDetailQuery::default();
        assert_eq!(query.script(), "uthmani");

        let query = ChapterDetailQuery {
            font: Some("indopak".to_string()),
            ..Default::default()
        };
        assert_eq!(query.script(), "indopak");
    }

    #[test]
    fn test_bypass_flags() {
        assert!(!ChapterDetailQuery::default().bypass_cache());

        let query = ChapterDetailQuery {
            clear_cache: Some("true".to_string()),
            ..Default::default()
        };
        assert!(query.bypass_cache());

        let query = ChapterDetailQuery {
            force_refresh: Some("1".to_string()),
            ..Default::default()
        };
        assert!(query.bypass_cache());

        let query = ChapterDetailQuery {
            clear_cache: Some("false".to_string()),
            ..Default::default()
        };
        assert!(!query.bypass_cache());
    }

    #[test]
    fn test_camel_case_parameter_names() {
        let query: ChapterDetailQuery =
            serde_urlencoded_like("font=indopak&clearCache=true&forceRefresh=false");
        assert_eq!(query.font.as_deref(), Some("indopak"));
        assert_eq!(query.clear_cache.as_deref(), Some("true"));
        assert_eq!(query.force_refresh.as_deref(), Some("false"));
    }

    // Deserialize from a query string through serde_json to avoid an extra
    // dev-dependency; field-name mapping is what is under test.
    fn serde_urlencoded_like(query: &str) -> ChapterDetailQuery {
        let map: std::collections::HashMap<&str, &str> = query
            .split('&')
            .filter_map(|pair| pair.split_once('='))
            .collect();
        serde_json::from_value(serde_json::to_value(map).unwrap()).unwrap()
    }
}
