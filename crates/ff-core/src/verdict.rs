//! Exact verdict engine
//!
//! Second stage of the filtering protocol. Only URLs the prefilter reported as
//! "maybe member" need to reach it, but its answer does not depend on the
//! prefilter: `Block` iff some pattern is a case-insensitive substring of the
//! URL.

use crate::patterns::PatternSet;
use crate::types::Verdict;

/// Decide whether `url` is blocked by `patterns`.
pub fn verdict(url: &str, patterns: &PatternSet) -> Verdict {
    match patterns.first_match(url) {
        Some(pattern) => {
            log::trace!("blocked {url} (pattern {pattern:?})");
            Verdict::Block
        }
        None => Verdict::Allow,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blocks_shorts_url() {
        let set = PatternSet::default();
        assert_eq!(verdict("https://m.youtube.com/shorts/abc123", &set), Verdict::Block);
    }

    #[test]
    fn test_allows_watch_url() {
        let set = PatternSet::default();
        assert_eq!(verdict("https://youtube.com/watch?v=abc123", &set), Verdict::Allow);
    }

    #[test]
    fn test_matching_is_case_insensitive() {
        let set = PatternSet::default();
        assert_eq!(verdict("HTTPS://YOUTUBE.COM/SHORTS/ABC", &set), Verdict::Block);
        assert_eq!(
            verdict("https://youtube.com/feed?EL=SHORTSPAGE", &set),
            Verdict::Block
        );
        let upper = PatternSet::new(["/REEL/"]).unwrap();
        assert_eq!(verdict("https://x.test/reel/1", &upper), Verdict::Block);
    }

    #[test]
    fn test_empty_set_allows_everything() {
        let set = PatternSet::new(Vec::<String>::new()).unwrap();
        assert_eq!(verdict("https://m.youtube.com/shorts/abc123", &set), Verdict::Allow);
    }

    #[test]
    fn test_pattern_must_be_contiguous() {
        let set = PatternSet::default();
        assert_eq!(verdict("https://youtube.com/short/s/", &set), Verdict::Allow);
        assert_eq!(verdict("https://youtube.com/xreel_item_watchx", &set), Verdict::Block);
    }
}
