//! In-app navigation history.
//!
//! Every search is recorded as a URL-like entry (`/post?tags=..&limit=..&page=..`)
//! so the current parameters can be read back and earlier searches revisited.

use std::borrow::Cow;
use std::fmt;

use tracing::debug;

/// Path of the post listing.
pub const POST_PATH: &str = "/post";

/// Query-string key holding the tag query.
pub const TAGS_PARAM: &str = "tags";

/// Default number of posts per page.
pub const DEFAULT_LIMIT: u32 = 40;

/// Parameters of a post search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchParams {
    /// Space-separated tag query.
    pub tags: String,
    /// Posts per page.
    pub limit: u32,
    /// One-based page number.
    pub page: u32,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            tags: String::new(),
            limit: DEFAULT_LIMIT,
            page: 1,
        }
    }
}

impl SearchParams {
    /// Create search parameters. `page` is clamped to at least 1.
    pub fn new(tags: impl Into<String>, limit: u32, page: u32) -> Self {
        Self {
            tags: tags.into(),
            limit,
            page: page.max(1),
        }
    }

    /// Same tags and limit, different page.
    pub fn with_page(&self, page: u32) -> Self {
        Self::new(self.tags.clone(), self.limit, page)
    }

    /// New tags, same limit, back to the first page.
    pub fn with_tags(&self, tags: impl Into<String>) -> Self {
        Self::new(tags, self.limit, 1)
    }

    /// Whether a previous page exists.
    pub fn has_prev_page(&self) -> bool {
        self.page > 1
    }

    /// Encode as `tags=..&limit=..&page=..`.
    pub fn to_query_string(&self) -> String {
        format!(
            "{}={}&limit={}&page={}",
            TAGS_PARAM,
            urlencoding::encode(&self.tags),
            self.limit,
            self.page
        )
    }

    /// Decode a query string; missing or malformed values take defaults.
    pub fn from_query_string(query: &str) -> Self {
        let mut params = Self::default();
        let query = query.strip_prefix('?').unwrap_or(query);

        for pair in query.split('&').filter(|pair| !pair.is_empty()) {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            match key {
                TAGS_PARAM => params.tags = decode_component(value).into_owned(),
                "limit" => {
                    if let Ok(limit) = value.parse::<u32>() {
                        if limit > 0 {
                            params.limit = limit;
                        }
                    }
                }
                "page" => {
                    if let Ok(page) = value.parse::<u32>() {
                        params.page = page.max(1);
                    }
                }
                _ => {}
            }
        }

        params
    }
}

/// Decode a form-encoded component, treating `+` as a space.
fn decode_component(value: &str) -> Cow<'_, str> {
    let spaced = value.replace('+', " ");
    match urlencoding::decode(&spaced) {
        Ok(decoded) => Cow::Owned(decoded.into_owned()),
        Err(_) => Cow::Borrowed(value),
    }
}

/// One visited location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    /// Route path, e.g. `/post`.
    pub path: String,
    /// Search parameters of the route.
    pub params: SearchParams,
}

impl HistoryEntry {
    /// The full URL of this entry.
    pub fn url(&self) -> String {
        format!("{}?{}", self.path, self.params.to_query_string())
    }
}

impl fmt::Display for HistoryEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url())
    }
}

/// Linear browser-style history.
#[derive(Debug, Clone)]
pub struct Navigator {
    entries: Vec<HistoryEntry>,
    current: usize,
}

impl Navigator {
    /// Maximum number of entries kept; the oldest are dropped first.
    pub const MAX_HISTORY: usize = 100;

    /// Start at `path` with `params`.
    pub fn new(path: impl Into<String>, params: SearchParams) -> Self {
        Self {
            entries: vec![HistoryEntry {
                path: path.into(),
                params,
            }],
            current: 0,
        }
    }

    /// Navigate to a new entry, discarding any forward history.
    pub fn push(&mut self, path: impl Into<String>, params: SearchParams) -> &HistoryEntry {
        self.entries.truncate(self.current + 1);
        self.entries.push(HistoryEntry {
            path: path.into(),
            params,
        });
        if self.entries.len() > Self::MAX_HISTORY {
            let excess = self.entries.len() - Self::MAX_HISTORY;
            self.entries.drain(..excess);
        }
        self.current = self.entries.len() - 1;
        debug!(url = %self.entries[self.current], "Navigated");
        &self.entries[self.current]
    }

    /// The current entry.
    pub fn current(&self) -> &HistoryEntry {
        &self.entries[self.current]
    }

    /// Parameters of the current entry.
    pub fn params(&self) -> &SearchParams {
        &self.current().params
    }

    /// Path of the current entry.
    #[cfg(test)]
    pub fn path(&self) -> &str {
        &self.current().path
    }

    /// Whether [`back`](Self::back) would move.
    pub fn can_go_back(&self) -> bool {
        self.current > 0
    }

    /// Whether [`forward`](Self::forward) would move.
    pub fn can_go_forward(&self) -> bool {
        self.current + 1 < self.entries.len()
    }

    /// Step back one entry. Returns `None` at the start of history.
    pub fn back(&mut self) -> Option<&HistoryEntry> {
        if !self.can_go_back() {
            return None;
        }
        self.current -= 1;
        Some(&self.entries[self.current])
    }

    /// Step forward one entry. Returns `None` at the end of history.
    pub fn forward(&mut self) -> Option<&HistoryEntry> {
        if !self.can_go_forward() {
            return None;
        }
        self.current += 1;
        Some(&self.entries[self.current])
    }
}
