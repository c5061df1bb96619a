//! Match highlighting for suggestion names.
//!
//! Produces plain/emphasis segments instead of styled text so the renderer
//! decides how a match looks.

/// A run of text inside a suggestion name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Text outside any match.
    Plain(String),
    /// Text equal to the active token.
    Match(String),
}

#[cfg(test)]
impl Segment {
    /// The text of this segment.
    pub fn text(&self) -> &str {
        match self {
            Segment::Plain(text) | Segment::Match(text) => text,
        }
    }

    /// Whether this segment is a highlighted match.
    pub fn is_match(&self) -> bool {
        matches!(self, Segment::Match(_))
    }
}

/// Split `text` into segments, marking every occurrence of `needle`.
///
/// Matching is case-sensitive and non-overlapping, scanning left to right.
pub fn highlight(text: &str, needle: &str) -> Vec<Segment> {
    if needle.is_empty() {
        return vec![Segment::Plain(text.to_string())];
    }

    let mut segments = Vec::new();
    let mut last_end = 0;

    for (start, matched) in text.match_indices(needle) {
        if start > last_end {
            segments.push(Segment::Plain(text[last_end..start].to_string()));
        }
        segments.push(Segment::Match(matched.to_string()));
        last_end = start + matched.len();
    }

    if last_end < text.len() {
        segments.push(Segment::Plain(text[last_end..].to_string()));
    }

    if segments.is_empty() {
        segments.push(Segment::Plain(text.to_string()));
    }

    segments
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(s: &str) -> Segment {
        Segment::Plain(s.to_string())
    }

    fn hit(s: &str) -> Segment {
        Segment::Match(s.to_string())
    }

    #[test]
    fn test_empty_needle_is_plain() {
        assert_eq!(highlight("catgirl", ""), vec![plain("catgirl")]);
    }

    #[test]
    fn test_no_match_is_plain() {
        assert_eq!(highlight("catgirl", "dog"), vec![plain("catgirl")]);
    }

    #[test]
    fn test_prefix_match() {
        assert_eq!(highlight("catgirl", "cat"), vec![hit("cat"), plain("girl")]);
    }

    #[test]
    fn test_every_occurrence_is_marked() {
        assert_eq!(
            highlight("cat_and_cat", "cat"),
            vec![hit("cat"), plain("_and_"), hit("cat")]
        );
    }

    #[test]
    fn test_match_in_middle() {
        assert_eq!(
            highlight("black_cat_ears", "cat"),
            vec![plain("black_"), hit("cat"), plain("_ears")]
        );
    }

    #[test]
    fn test_case_sensitive() {
        assert_eq!(highlight("Cat", "cat"), vec![plain("Cat")]);
    }

    #[test]
    fn test_whole_text_match() {
        let segments = highlight("sky", "sky");
        assert_eq!(segments, vec![hit("sky")]);
        assert!(segments[0].is_match());
    }

    #[test]
    fn test_segments_rebuild_original_text() {
        let text = "ab_abab_b";
        let rebuilt: String = highlight(text, "ab").iter().map(Segment::text).collect();
        assert_eq!(rebuilt, text);
    }

    #[test]
    fn test_multibyte_match() {
        assert_eq!(
            highlight("初音ミク", "ミク"),
            vec![plain("初音"), hit("ミク")]
        );
    }
}
