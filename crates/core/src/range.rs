//! Slide range expressions.
//!
//! The user-facing grammar is a comma-separated list of tokens, each either a
//! single position (`7`) or an inclusive pair (`2-4`). Positions are 1-based
//! against the original document.
//!
//! Malformed tokens are dropped without failing the whole expression:
//! `"a, 2-1, 3"` parses to just `[3, 3]`. Callers that want to tell the user
//! what was ignored use [`parse_ranges_with_report`].

use crate::document::Document;
use std::collections::BTreeSet;
use std::fmt;

/// Ordered, de-duplicated set of ranges.
pub type RangeSet = BTreeSet<SlideRange>;

/// Inclusive interval of 1-based slide positions, `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SlideRange {
    start: usize,
    end: usize,
}

impl SlideRange {
    /// Create a range, or `None` if it is inverted or touches zero.
    pub fn new(start: usize, end: usize) -> Option<Self> {
        if start == 0 || start > end {
            return None;
        }
        Some(Self { start, end })
    }

    /// A range covering one position.
    pub fn single(position: usize) -> Option<Self> {
        Self::new(position, position)
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    /// Whether the position falls inside the range.
    pub fn contains(&self, position: usize) -> bool {
        (self.start..=self.end).contains(&position)
    }
}

impl fmt::Display for SlideRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start == self.end {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}-{}", self.start, self.end)
        }
    }
}

/// Outcome of parsing a range expression, including what was thrown away.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedRanges {
    /// Accepted ranges.
    pub ranges: RangeSet,

    /// Tokens that were dropped, trimmed, in input order.
    pub rejected: Vec<String>,
}

impl ParsedRanges {
    /// No filter was given; callers should keep every slide.
    pub fn selects_all(&self) -> bool {
        self.ranges.is_empty()
    }
}

/// Parse one trimmed, non-empty token.
fn parse_token(token: &str) -> Option<SlideRange> {
    match token.split_once('-') {
        Some((start, end)) => {
            let start = start.trim().parse::<usize>().ok()?;
            let end = end.trim().parse::<usize>().ok()?;
            SlideRange::new(start, end)
        }
        None => SlideRange::single(token.parse::<usize>().ok()?),
    }
}

/// Parse a range expression, keeping a list of the rejected tokens.
///
/// Blank tokens (`"1,,2"`, trailing commas) are skipped and not reported.
pub fn parse_ranges_with_report(expression: &str) -> ParsedRanges {
    let mut parsed = ParsedRanges::default();

    for token in expression.split(',').map(str::trim) {
        if token.is_empty() {
            continue;
        }

        match parse_token(token) {
            Some(range) => {
                parsed.ranges.insert(range);
            }
            None => parsed.rejected.push(token.to_string()),
        }
    }

    parsed
}

/// Parse a range expression, silently dropping malformed tokens.
///
/// An empty result means "no filter", not "no slides".
pub fn parse_ranges(expression: &str) -> RangeSet {
    let parsed = parse_ranges_with_report(expression);
    if !parsed.rejected.is_empty() {
        log::debug!("Dropped range tokens: {:?}", parsed.rejected);
    }
    parsed.ranges
}

/// Keep only the slides covered by `ranges`, re-serialized.
///
/// The header block is carried over unchanged. With no matching slides the
/// result is the header alone.
pub fn filter_document(document: &str, ranges: &RangeSet) -> String {
    Document::parse(document).select(ranges).to_markdown()
}

/// Apply a user-entered range expression to a serialized document.
///
/// A blank expression (or one with no valid tokens) returns the document
/// untouched.
pub fn select_slides(document: &str, expression: &str) -> String {
    let ranges = parse_ranges(expression);
    if ranges.is_empty() {
        return document.to_string();
    }
    filter_document(document, &ranges)
}

/// Number of slide blocks in a serialized document.
pub fn slide_count(document: &str) -> usize {
    Document::parse(document).slide_count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::assemble;
    use crate::types::{Slide, StyleDescriptor};
    use proptest::prelude::*;

    fn r(start: usize, end: usize) -> SlideRange {
        SlideRange::new(start, end).unwrap()
    }

    fn five_slide_doc() -> String {
        let slides: Vec<Slide> = (1..=5)
            .map(|i| Slide::new(format!("Slide {}", i), format!("Body {}", i)))
            .collect();
        assemble(&slides, &StyleDescriptor::default(), "Five").to_markdown()
    }

    fn headings(document: &str) -> Vec<String> {
        Document::parse(document)
            .slides()
            .iter()
            .map(|s| s.lines().next().unwrap_or_default().to_string())
            .collect()
    }

    #[test]
    fn test_parse_singles_and_pairs() {
        let ranges = parse_ranges("1-3, 5, 7-9");
        assert_eq!(
            ranges.into_iter().collect::<Vec<_>>(),
            vec![r(1, 3), r(5, 5), r(7, 9)]
        );
    }

    #[test]
    fn test_parse_drops_malformed() {
        let ranges = parse_ranges("a, 2-1, 3");
        assert_eq!(ranges.into_iter().collect::<Vec<_>>(), vec![r(3, 3)]);
    }

    #[test]
    fn test_parse_report_lists_rejected() {
        let parsed = parse_ranges_with_report("a, 2-1, 3, 0, 4-x, -2, 1-2-3");
        assert_eq!(parsed.ranges.into_iter().collect::<Vec<_>>(), vec![r(3, 3)]);
        assert_eq!(parsed.rejected, vec!["a", "2-1", "0", "4-x", "-2", "1-2-3"]);
    }

    #[test]
    fn test_parse_whitespace_around_dash() {
        let ranges = parse_ranges(" 2 - 4 ,\t6 ");
        assert_eq!(ranges.into_iter().collect::<Vec<_>>(), vec![r(2, 4), r(6, 6)]);
    }

    #[test]
    fn test_parse_empty_expression() {
        assert!(parse_ranges("").is_empty());
        assert!(parse_ranges("   ").is_empty());

        let parsed = parse_ranges_with_report(" , ,");
        assert!(parsed.selects_all());
        assert!(parsed.rejected.is_empty());
    }

    #[test]
    fn test_parse_dedupes() {
        assert_eq!(parse_ranges("3, 3, 3-3").len(), 1);
    }

    #[test]
    fn test_range_display() {
        assert_eq!(r(4, 4).to_string(), "4");
        assert_eq!(r(2, 9).to_string(), "2-9");
    }

    #[test]
    fn test_range_invariants() {
        assert!(SlideRange::new(0, 3).is_none());
        assert!(SlideRange::new(4, 3).is_none());
        assert!(r(2, 4).contains(3));
        assert!(!r(2, 4).contains(5));
    }

    #[test]
    fn test_filter_order_normalized() {
        let doc = five_slide_doc();
        let out = filter_document(&doc, &parse_ranges("5,1-2"));
        assert_eq!(headings(&out), vec!["# Slide 1", "# Slide 2", "# Slide 5"]);
    }

    #[test]
    fn test_filter_clamps() {
        let doc = five_slide_doc();
        let out = filter_document(&doc, &parse_ranges("1-100"));
        assert_eq!(out, doc);
    }

    #[test]
    fn test_filter_all_out_of_range_is_header_only() {
        let doc = five_slide_doc();
        let out = filter_document(&doc, &parse_ranges("9, 12-20"));
        let parsed = Document::parse(&out);

        assert!(parsed.is_header_only());
        assert_eq!(parsed.header(), Document::parse(&doc).header());
    }

    #[test]
    fn test_filter_header_only_document() {
        let doc = assemble(&[], &StyleDescriptor::default(), "Empty").to_markdown();
        assert_eq!(filter_document(&doc, &parse_ranges("1-3")), doc);
    }

    #[test]
    fn test_filter_separators_match_fresh_assembly() {
        let doc = five_slide_doc();
        let out = filter_document(&doc, &parse_ranges("2,4"));

        let fresh = assemble(
            &[
                Slide::new("Slide 2", "Body 2"),
                Slide::new("Slide 4", "Body 4"),
            ],
            &StyleDescriptor::default(),
            "Five",
        );
        assert_eq!(out, fresh.to_markdown());
    }

    #[test]
    fn test_select_slides_empty_expression_is_identity() {
        let doc = five_slide_doc();
        assert_eq!(select_slides(&doc, ""), doc);
        assert_eq!(select_slides(&doc, "x, y"), doc);
    }

    #[test]
    fn test_select_slides_applies_filter() {
        let doc = five_slide_doc();
        let out = select_slides(&doc, "3");
        assert_eq!(headings(&out), vec!["# Slide 3"]);
    }

    #[test]
    fn test_slide_count() {
        assert_eq!(slide_count(&five_slide_doc()), 5);
        assert_eq!(slide_count(""), 0);
    }

    proptest! {
        #[test]
        fn prop_parsed_ranges_are_valid(expr in "[0-9a-z ,-]{0,30}") {
            for range in parse_ranges(&expr) {
                prop_assert!(range.start() >= 1);
                prop_assert!(range.start() <= range.end());
            }
        }

        #[test]
        fn prop_filter_output_ascending(picks in prop::collection::vec(1usize..8, 1..6)) {
            let doc = five_slide_doc();
            let expr = picks
                .iter()
                .rev()
                .map(|p| p.to_string())
                .collect::<Vec<_>>()
                .join(",");
            let out = filter_document(&doc, &parse_ranges(&expr));

            let mut expected: Vec<usize> = picks.into_iter().filter(|p| *p <= 5).collect();
            expected.sort_unstable();
            expected.dedup();
            let expected: Vec<String> =
                expected.into_iter().map(|p| format!("# Slide {}", p)).collect();

            prop_assert_eq!(headings(&out), expected);
        }
    }
}
