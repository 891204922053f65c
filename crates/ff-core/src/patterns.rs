//! Blocked pattern set
//!
//! An immutable, ordered collection of lowercased substrings. Constructed once
//! and passed explicitly to the builder and to the verdict engine.

use crate::types::ParameterError;

/// Patterns blocked when no pattern list is configured.
pub const DEFAULT_PATTERNS: &[&str] = &[
    "/shorts/",
    "/youtubei/v1/reel/",
    "el=shortspage",
    "reel_watch_sequence",
    "reel_item_watch",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternSet {
    patterns: Box<[String]>,
}

impl Default for PatternSet {
    fn default() -> Self {
        Self {
            patterns: DEFAULT_PATTERNS.iter().map(|p| p.to_lowercase()).collect(),
        }
    }
}

impl PatternSet {
    /// Build a set from patterns, lowercasing each one.
    /// Order is kept; empty patterns are rejected.
    pub fn new<I, S>(patterns: I) -> Result<Self, ParameterError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns = patterns
            .into_iter()
            .enumerate()
            .map(|(index, p)| {
                let p = p.as_ref();
                if p.is_empty() {
                    Err(ParameterError::EmptyPattern { index })
                } else {
                    Ok(p.to_lowercase())
                }
            })
            .collect::<Result<Box<[String]>, _>>()?;
        Ok(Self { patterns })
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.patterns.iter().map(String::as_str)
    }

    /// Sorted distinct byte lengths of the patterns.
    pub fn window_lengths(&self) -> Vec<u32> {
        let mut lengths: Vec<u32> = self.patterns.iter().map(|p| p.len() as u32).collect();
        lengths.sort_unstable();
        lengths.dedup();
        lengths
    }

    /// First pattern (in set order) contained in `url`, case-insensitively.
    pub fn first_match(&self, url: &str) -> Option<&str> {
        let url = url.to_lowercase();
        self.iter().find(|p| url.contains(p))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_set_keeps_order() {
        let set = PatternSet::default();
        let got: Vec<&str> = set.iter().collect();
        assert_eq!(got, DEFAULT_PATTERNS);
    }

    #[test]
    fn test_lowercases_on_construction() {
        let set = PatternSet::new(["/Shorts/", "EL=ShortsPage"]).unwrap();
        let got: Vec<&str> = set.iter().collect();
        assert_eq!(got, vec!["/shorts/", "el=shortspage"]);
    }

    #[test]
    fn test_rejects_empty_pattern() {
        let err = PatternSet::new(["/shorts/", ""]).unwrap_err();
        assert_eq!(err, ParameterError::EmptyPattern { index: 1 });
    }

    #[test]
    fn test_window_lengths_are_sorted_and_distinct() {
        let set = PatternSet::new(["abcd", "ab", "wxyz", "abc"]).unwrap();
        assert_eq!(set.window_lengths(), vec![2, 3, 4]);
    }

    #[test]
    fn test_first_match_follows_set_order() {
        let set = PatternSet::default();
        let url = "https://www.youtube.com/youtubei/v1/reel/reel_watch_sequence";
        assert_eq!(set.first_match(url), Some("/youtubei/v1/reel/"));
        assert_eq!(set.first_match("https://youtube.com/watch?v=x"), None);
    }
}
