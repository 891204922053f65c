use ff_core::PositionError;

/// A line that could not be used as a pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedLine {
    /// 1-based line number
    pub line: usize,
    pub error: PositionError,
}

/// Result of parsing a pattern list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedList {
    pub patterns: Vec<String>,
    pub rejected: Vec<RejectedLine>,
    pub line_count: usize,
}

/// Parse a pattern list: one substring per line.
///
/// Blank lines and lines starting with `!` or `#` are skipped and
/// surrounding whitespace is trimmed. Lines that are not UTF-8 are recorded
/// in `rejected`; the rest of the list is still parsed.
pub fn parse_pattern_list(data: &[u8]) -> ParsedList {
    let mut parsed = ParsedList::default();

    let data = data.strip_suffix(b"\n").unwrap_or(data);
    if data.is_empty() {
        return parsed;
    }

    for (index, raw_line) in data.split(|&b| b == b'\n').enumerate() {
        parsed.line_count += 1;

        let raw_line = raw_line.strip_suffix(b"\r").unwrap_or(raw_line);
        let line = match std::str::from_utf8(raw_line) {
            Ok(line) => line.trim(),
            Err(e) => {
                log::warn!("skipping pattern on line {}: not valid UTF-8", index + 1);
                parsed.rejected.push(RejectedLine {
                    line: index + 1,
                    error: PositionError::InvalidUtf8 { valid_up_to: e.valid_up_to() },
                });
                continue;
            }
        };

        if line.is_empty() || is_comment_line(line) {
            continue;
        }

        parsed.patterns.push(line.to_string());
    }

    parsed
}

fn is_comment_line(line: &str) -> bool {
    line.starts_with('!') || line.starts_with('#')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skips_comments_and_blank_lines() {
        let text = b"! FocusFeed list\n# note\n\n/shorts/\n  el=shortspage  \r\nreel_item_watch";
        let parsed = parse_pattern_list(text);
        assert_eq!(parsed.patterns, vec!["/shorts/", "el=shortspage", "reel_item_watch"]);
        assert!(parsed.rejected.is_empty());
        assert_eq!(parsed.line_count, 6);
    }

    #[test]
    fn test_bracketed_line_is_a_pattern() {
        let parsed = parse_pattern_list(b"[reel]\n/shorts/\n");
        assert_eq!(parsed.patterns, vec!["[reel]", "/shorts/"]);
    }

    #[test]
    fn test_trailing_newline_is_not_a_line() {
        let parsed = parse_pattern_list(b"/shorts/\n");
        assert_eq!(parsed.patterns, vec!["/shorts/"]);
        assert_eq!(parsed.line_count, 1);
    }

    #[test]
    fn test_invalid_utf8_line_does_not_abort() {
        let parsed = parse_pattern_list(b"/shorts/\nbad\xfe\xffline\nreel_item_watch\n");
        assert_eq!(parsed.patterns, vec!["/shorts/", "reel_item_watch"]);
        assert_eq!(
            parsed.rejected,
            vec![RejectedLine { line: 2, error: PositionError::InvalidUtf8 { valid_up_to: 3 } }]
        );
    }

    #[test]
    fn test_empty_input_has_no_lines() {
        let parsed = parse_pattern_list(b"");
        assert!(parsed.patterns.is_empty());
        assert_eq!(parsed.line_count, 0);
    }
}
