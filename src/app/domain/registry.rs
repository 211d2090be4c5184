use std::collections::HashMap;

use crate::app::infrastructure::error::AppError;

/// Display title and content locator for one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageEntry {
    pub title: String,
    pub resource: String,
}

impl PageEntry {
    pub fn new(title: &str, resource: &str) -> Self {
        Self {
            title: title.to_string(),
            resource: resource.to_string(),
        }
    }
}

/// Outcome of resolving a page key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedPage<'a> {
    /// Key of the entry that was served, which is the fallback key when the
    /// requested one was absent or unknown.
    pub key: &'a str,
    pub entry: &'a PageEntry,
    pub is_fallback: bool,
}

/// Immutable page-key lookup with exactly one fallback entry.
#[derive(Debug, Clone)]
pub struct PageRegistry {
    pages: HashMap<String, PageEntry>,
    fallback_key: String,
    fallback: PageEntry,
}

impl PageRegistry {
    pub fn new(
        entries: impl IntoIterator<Item = (String, PageEntry)>,
        fallback_key: &str,
        fallback: PageEntry,
    ) -> Result<Self, AppError> {
        let mut pages = HashMap::new();
        for (key, entry) in entries {
            if key == fallback_key {
                return Err(AppError::Config(format!(
                    "page key {:?} is reserved for the fallback entry",
                    key
                )));
            }
            if pages.insert(key.clone(), entry).is_some() {
                return Err(AppError::Config(format!("duplicate page key {:?}", key)));
            }
        }

        Ok(Self {
            pages,
            fallback_key: fallback_key.to_string(),
            fallback,
        })
    }

    /// Exact match, else the fallback entry. Never fails.
    pub fn resolve(&self, key: Option<&str>) -> ResolvedPage<'_> {
        match key.and_then(|k| self.pages.get_key_value(k)) {
            Some((key, entry)) => ResolvedPage {
                key: key.as_str(),
                entry,
                is_fallback: false,
            },
            None => ResolvedPage {
                key: &self.fallback_key,
                entry: &self.fallback,
                is_fallback: true,
            },
        }
    }

    pub fn fallback_key(&self) -> &str {
        &self.fallback_key
    }

    /// Keys of the regular (non-fallback) entries, sorted.
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.pages.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }
}
