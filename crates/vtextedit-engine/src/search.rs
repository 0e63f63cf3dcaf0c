//! Literal and regular-expression search over a document.
//!
//! Results are computed eagerly into a finite list so callers such as
//! "replace all" know the match count before acting.

use std::ops::Range;

use bitflags::bitflags;
use regex::{Regex, RegexBuilder};

use crate::editing::Document;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct FindFlags: u32 {
        /// Report matches last to first
        const BACKWARD = 0x1;
        const CASE_SENSITIVE = 0x2;
        /// Literal search only
        const WHOLE_WORD_ONLY = 0x4;
        const REGULAR_EXPRESSION = 0x8;
        /// Live-typing search; does not affect matching
        const INCREMENTAL_SEARCH = 0x10;
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("Invalid search pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// Find every match of `text` inside `[start, end)`; `end` of `None` means
/// the document end.
///
/// Matches are non-overlapping and ascending by start, or descending with
/// [`FindFlags::BACKWARD`]. An empty query yields no matches.
pub fn find_all_text(
    doc: &Document,
    text: &str,
    flags: FindFlags,
    start: usize,
    end: Option<usize>,
) -> Result<Vec<Range<usize>>, SearchError> {
    if text.is_empty() {
        return Ok(Vec::new());
    }

    let haystack = doc.text();
    let end = floor_char_boundary(&haystack, end.unwrap_or(haystack.len()));
    let start = ceil_char_boundary(&haystack, start.min(end));

    let regex = build_regex(text, flags)?;
    let whole_word =
        flags.contains(FindFlags::WHOLE_WORD_ONLY) && !flags.contains(FindFlags::REGULAR_EXPRESSION);

    let mut matches = Vec::new();
    let mut pos = start;
    while pos <= end {
        let Some(m) = regex.find_at(&haystack, pos) else {
            break;
        };
        if m.start() >= end {
            break;
        }

        let rejected = m.is_empty()
            || m.end() > end
            || (whole_word && !is_whole_word(&haystack, m.range()));
        if rejected {
            // Retry from the next character after the match start
            match next_char_boundary(&haystack, m.start()) {
                Some(next) => pos = next,
                None => break,
            }
            continue;
        }

        matches.push(m.range());
        pos = m.end();
    }

    if flags.contains(FindFlags::BACKWARD) {
        matches.reverse();
    }

    log::trace!("find {text:?} ({flags:?}): {} matches", matches.len());
    Ok(matches)
}

fn build_regex(text: &str, flags: FindFlags) -> Result<Regex, SearchError> {
    let pattern = if flags.contains(FindFlags::REGULAR_EXPRESSION) {
        text.to_string()
    } else {
        regex::escape(text)
    };

    RegexBuilder::new(&pattern)
        .case_insensitive(!flags.contains(FindFlags::CASE_SENSITIVE))
        .multi_line(true)
        .build()
        .map_err(|source| {
            log::warn!("Failed to compile search pattern {text:?}: {source}");
            SearchError::InvalidPattern {
                pattern: text.to_string(),
                source,
            }
        })
}

fn is_word_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}

fn is_whole_word(text: &str, range: Range<usize>) -> bool {
    let before = text[..range.start].chars().next_back();
    let after = text[range.end..].chars().next();
    !before.is_some_and(is_word_char) && !after.is_some_and(is_word_char)
}

fn next_char_boundary(text: &str, offset: usize) -> Option<usize> {
    text[offset..].chars().next().map(|ch| offset + ch.len_utf8())
}

fn floor_char_boundary(text: &str, offset: usize) -> usize {
    let mut offset = offset.min(text.len());
    while !text.is_char_boundary(offset) {
        offset -= 1;
    }
    offset
}

fn ceil_char_boundary(text: &str, offset: usize) -> usize {
    let mut offset = offset.min(text.len());
    while !text.is_char_boundary(offset) {
        offset += 1;
    }
    offset
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn find(text: &str, query: &str, flags: FindFlags) -> Vec<Range<usize>> {
        find_all_text(&Document::new(text), query, flags, 0, None).expect("valid query")
    }

    #[test]
    fn test_case_sensitive_literal() {
        assert_eq!(find("Foo foo FOO", "foo", FindFlags::CASE_SENSITIVE), vec![4..7]);
    }

    #[test]
    fn test_case_insensitive_literal_ascending() {
        let matches = find("Foo foo FOO", "foo", FindFlags::empty());

        insta::assert_debug_snapshot!(matches, @r"
        [
            0..3,
            4..7,
            8..11,
        ]
        ");
    }

    #[test]
    fn test_backward_reverses_order_only() {
        assert_eq!(
            find("Foo foo FOO", "foo", FindFlags::BACKWARD),
            vec![8..11, 4..7, 0..3]
        );
    }

    #[rstest]
    #[case::standalone("cat concat cat_ cat.", vec![0..3, 16..19])]
    #[case::unicode_neighbour("écat cat", vec![6..9])]
    fn test_whole_word_literal(#[case] text: &str, #[case] expected: Vec<Range<usize>>) {
        assert_eq!(find(text, "cat", FindFlags::WHOLE_WORD_ONLY), expected);
    }

    #[test]
    fn test_whole_word_ignored_for_regex() {
        let flags = FindFlags::WHOLE_WORD_ONLY | FindFlags::REGULAR_EXPRESSION;

        assert_eq!(find("concat cat", "cat", flags), vec![3..6, 7..10]);
    }

    #[test]
    fn test_regex_anchors_match_per_block() {
        let flags = FindFlags::REGULAR_EXPRESSION;

        assert_eq!(find("- one\ntwo\n- three", r"^- \w+", flags), vec![0..5, 10..17]);
    }

    #[test]
    fn test_regex_skips_zero_length_matches() {
        assert_eq!(find("aba", "a*", FindFlags::REGULAR_EXPRESSION), vec![0..1, 2..3]);
    }

    #[test]
    fn test_literal_treats_metacharacters_verbatim() {
        assert_eq!(find("a.b axb", "a.b", FindFlags::empty()), vec![0..3]);
    }

    #[test]
    fn test_sub_range_excludes_partial_matches() {
        let doc = Document::new("foo foo foo");

        let matches = find_all_text(&doc, "foo", FindFlags::empty(), 1, Some(9)).unwrap();

        assert_eq!(matches, vec![4..7]);
    }

    #[test]
    fn test_empty_query_has_no_matches() {
        assert!(find("anything", "", FindFlags::empty()).is_empty());
    }

    #[test]
    fn test_malformed_regex_is_an_error() {
        let doc = Document::new("text");

        let result = find_all_text(&doc, "(unclosed", FindFlags::REGULAR_EXPRESSION, 0, None);

        assert!(matches!(result, Err(SearchError::InvalidPattern { .. })));
    }

    #[test]
    fn test_malformed_regex_characters_are_fine_as_literal() {
        assert_eq!(find("f(x", "(", FindFlags::empty()), vec![1..2]);
    }
}
