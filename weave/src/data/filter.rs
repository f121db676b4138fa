//! Fuzzy text filtering using nucleo-matcher.

use nucleo_matcher::pattern::{AtomKind, CaseMatching, Normalization, Pattern};
use nucleo_matcher::{Config, Matcher, Utf32Str};

/// One label that matched a query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterMatch {
    /// Index into the label slice.
    pub index: usize,
    /// Higher is better.
    pub score: u32,
}

fn pattern(query: &str) -> Pattern {
    Pattern::new(
        query,
        CaseMatching::Ignore,
        Normalization::Smart,
        AtomKind::Fuzzy,
    )
}

/// Match `query` against every label, best score first.
///
/// An empty query matches every label with score 0, in input order.
///
/// ```
/// use weave::data::fuzzy_filter;
///
/// let labels = vec!["apple".to_string(), "banana".to_string(), "apricot".to_string()];
/// let matches = fuzzy_filter("ap", &labels);
/// assert_eq!(matches.len(), 2);
/// assert!(matches.iter().all(|m| m.index != 1));
/// ```
pub fn fuzzy_filter(query: &str, labels: &[String]) -> Vec<FilterMatch> {
    if query.is_empty() {
        return (0..labels.len())
            .map(|index| FilterMatch { index, score: 0 })
            .collect();
    }

    let mut matcher = Matcher::new(Config::DEFAULT);
    let pattern = pattern(query);
    let mut buf = Vec::new();

    let mut matches: Vec<FilterMatch> = labels
        .iter()
        .enumerate()
        .filter_map(|(index, label)| {
            let haystack = Utf32Str::new(label, &mut buf);
            pattern
                .score(haystack, &mut matcher)
                .map(|score| FilterMatch { index, score })
        })
        .collect();

    // Stable, so equal scores keep input order.
    matches.sort_by(|a, b| b.score.cmp(&a.score));
    matches
}

/// Whether a single label matches `query`. An empty query always matches.
pub fn fuzzy_matches(query: &str, label: &str) -> bool {
    if query.is_empty() {
        return true;
    }
    let mut matcher = Matcher::new(Config::DEFAULT);
    let mut buf = Vec::new();
    pattern(query)
        .score(Utf32Str::new(label, &mut buf), &mut matcher)
        .is_some()
}
