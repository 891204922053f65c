use std::collections::HashSet;

pub struct OptimizeStats {
    pub before: usize,
    pub after: usize,
    pub deduped: usize,
}

/// Remove patterns that repeat an earlier one, ignoring case.
/// The first occurrence keeps its position.
pub fn optimize_patterns(patterns: &mut Vec<String>) -> OptimizeStats {
    let before = patterns.len();

    let mut seen: HashSet<String> = HashSet::new();
    let mut deduped = 0usize;
    patterns.retain(|pattern| {
        if seen.insert(pattern.to_lowercase()) {
            true
        } else {
            deduped += 1;
            false
        }
    });

    let after = patterns.len();
    log::debug!("optimized patterns: {before} -> {after} ({deduped} duplicates)");

    OptimizeStats {
        before,
        after,
        deduped,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_removes_case_insensitive_duplicates() {
        let mut patterns: Vec<String> = ["/shorts/", "reel_item_watch", "/SHORTS/", "/shorts/"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let stats = optimize_patterns(&mut patterns);

        assert_eq!(patterns, vec!["/shorts/", "reel_item_watch"]);
        assert_eq!(stats.before, 4);
        assert_eq!(stats.after, 2);
        assert_eq!(stats.deduped, 2);
    }

    #[test]
    fn test_keeps_distinct_patterns_in_order() {
        let mut patterns = vec!["b".to_string(), "a".to_string()];
        let stats = optimize_patterns(&mut patterns);
        assert_eq!(patterns, vec!["b", "a"]);
        assert_eq!(stats.deduped, 0);
    }
}
