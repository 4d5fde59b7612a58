use chrono::{DateTime, Utc};
use dashmap::DashMap;
use std::sync::Arc;

pub const NOTICE_KEY: &str = "notice";
pub const HOME_PAGE_CONTENT_KEY: &str = "home_page_content";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedContent {
    pub value: String,
    pub stored_at: DateTime<Utc>,
}

/// Last-seen copies of server-provided notice and home page content.
#[derive(Clone, Default)]
pub struct ContentCache {
    inner: Arc<DashMap<String, CachedContent>>,
}

impl ContentCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<CachedContent> {
        self.inner.get(key).map(|entry| entry.value().clone())
    }

    pub fn put(&self, key: &str, value: impl Into<String>) {
        self.inner.insert(
            key.to_string(),
            CachedContent {
                value: value.into(),
                stored_at: Utc::now(),
            },
        );
    }

    /// Returns the fetched notice when it is non-empty and differs from the
    /// cached one, and remembers it. Returns `None` when nothing new is shown.
    pub fn observe_notice(&self, fresh: &str) -> Option<String> {
        if fresh.is_empty() {
            return None;
        }
        if self.get(NOTICE_KEY).is_some_and(|cached| cached.value == fresh) {
            return None;
        }
        self.put(NOTICE_KEY, fresh);
        Some(fresh.to_string())
    }

    /// Content to display for the home page: the fetched copy when the fetch
    /// succeeded (stored for next time), otherwise the cached copy.
    pub fn home_content(&self, fetched: Option<&str>) -> String {
        match fetched {
            Some(content) => {
                self.put(HOME_PAGE_CONTENT_KEY, content);
                content.to_string()
            }
            None => self
                .get(HOME_PAGE_CONTENT_KEY)
                .map(|cached| cached.value)
                .unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notice_shown_once_per_change() {
        let cache = ContentCache::new();
        assert_eq!(cache.observe_notice(""), None);
        assert_eq!(cache.observe_notice("maintenance"), Some("maintenance".to_string()));
        assert_eq!(cache.observe_notice("maintenance"), None);
        assert_eq!(cache.observe_notice("upgrade"), Some("upgrade".to_string()));
    }

    #[test]
    fn home_content_falls_back_to_cached_copy() {
        let cache = ContentCache::new();
        assert_eq!(cache.home_content(None), "");
        assert_eq!(cache.home_content(Some("# Welcome")), "# Welcome");
        assert_eq!(cache.home_content(None), "# Welcome");
        assert!(cache.get(HOME_PAGE_CONTENT_KEY).is_some());
    }

    #[test]
    fn clones_share_entries() {
        let cache = ContentCache::new();
        let other = cache.clone();
        cache.put(NOTICE_KEY, "n");
        assert_eq!(other.get(NOTICE_KEY).map(|c| c.value), Some("n".to_string()));
    }
}
