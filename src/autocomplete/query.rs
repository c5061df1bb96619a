//! Tokenized search query.
//!
//! The search field holds a whitespace-separated list of tags. The last token
//! is the *active* token: the only one that autocomplete looks up and
//! replaces.

use std::fmt;

/// A search query split into whitespace-separated tokens.
///
/// Runs of whitespace in raw input collapse to a single separator, so the
/// rendered text is always the tokens joined by one space. A trailing
/// separator produces an empty active token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    /// Never empty; the last element is the active token.
    tokens: Vec<String>,
}

impl Query {
    /// Parse raw text, collapsing consecutive whitespace.
    pub fn parse(raw: &str) -> Self {
        let mut tokens = vec![String::new()];
        let mut in_separator = false;

        for c in raw.chars() {
            if c.is_whitespace() {
                if !in_separator {
                    tokens.push(String::new());
                    in_separator = true;
                }
            } else {
                in_separator = false;
                if let Some(last) = tokens.last_mut() {
                    last.push(c);
                }
            }
        }

        Self { tokens }
    }

    /// All tokens, including a possibly empty active token.
    #[cfg(test)]
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// The last token, the one eligible for autocomplete.
    pub fn active_token(&self) -> &str {
        self.tokens.last().map(String::as_str).unwrap_or("")
    }

    /// Replace the active token, keeping every preceding token.
    pub fn replace_active(&mut self, replacement: &str) {
        match self.tokens.last_mut() {
            Some(last) => *last = replacement.to_string(),
            None => self.tokens.push(replacement.to_string()),
        }
    }

    /// The query rendered as text.
    pub fn text(&self) -> String {
        self.tokens.join(" ")
    }

    /// Non-empty tags in order, for submitting a search.
    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.tokens
            .iter()
            .map(String::as_str)
            .filter(|token| !token.is_empty())
    }

    /// Whether the query holds no tags at all.
    #[cfg(test)]
    pub fn is_blank(&self) -> bool {
        self.tags().next().is_none()
    }
}

impl Default for Query {
    fn default() -> Self {
        Self {
            tokens: vec![String::new()],
        }
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_collapses_whitespace() {
        let query = Query::parse("a   b  c");
        assert_eq!(query.text(), "a b c");
        assert_eq!(query.tokens(), ["a", "b", "c"]);
    }

    #[test]
    fn test_parse_collapses_tabs_and_newlines() {
        let query = Query::parse("rating:s\t\n  landscape");
        assert_eq!(query.text(), "rating:s landscape");
    }

    #[test]
    fn test_empty_query_has_empty_active_token() {
        let query = Query::parse("");
        assert_eq!(query.active_token(), "");
        assert!(query.is_blank());
        assert_eq!(query.text(), "");
    }

    #[test]
    fn test_trailing_space_starts_new_token() {
        let query = Query::parse("landscape ");
        assert_eq!(query.active_token(), "");
        assert_eq!(query.text(), "landscape ");
        assert!(!query.is_blank());
    }

    #[test]
    fn test_leading_space_is_kept_as_single_separator() {
        let query = Query::parse("   sky");
        assert_eq!(query.text(), " sky");
        assert_eq!(query.active_token(), "sky");
    }

    #[test]
    fn test_active_token_is_last() {
        let query = Query::parse("artist: cat");
        assert_eq!(query.active_token(), "cat");
    }

    #[test]
    fn test_replace_active_keeps_prior_tokens() {
        let mut query = Query::parse("artist: cat");
        query.replace_active("catgirl");
        assert_eq!(query.text(), "artist: catgirl");
    }

    #[test]
    fn test_replace_active_on_trailing_separator() {
        let mut query = Query::parse("sky ");
        query.replace_active("clouds");
        assert_eq!(query.text(), "sky clouds");
    }

    #[test]
    fn test_tags_skip_empty_tokens() {
        let query = Query::parse(" sky clouds ");
        let tags: Vec<&str> = query.tags().collect();
        assert_eq!(tags, vec!["sky", "clouds"]);
    }

    #[test]
    fn test_display_matches_text() {
        let query = Query::parse("a  b");
        assert_eq!(query.to_string(), "a b");
    }

    #[test]
    fn test_parse_handles_multibyte_tags() {
        let query = Query::parse("東方   初音ミク");
        assert_eq!(query.tokens(), ["東方", "初音ミク"]);
    }
}
