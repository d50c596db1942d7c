use forgeview_core::config::SelectorConfig;
use forgeview_core::types::{ProjectCollection, ProjectId};
use serde::Serialize;
use tracing::debug;

/// Scores how well a display label matches a search query.
///
/// Higher is better. Implementations should return values in `[0, 1]`, with
/// `0.0` meaning "no match".
pub trait MatchScorer {
    fn score(&self, label: &str, query: &str) -> f64;
}

impl<F> MatchScorer for F
where
    F: Fn(&str, &str) -> f64,
{
    fn score(&self, label: &str, query: &str) -> f64 {
        self(label, query)
    }
}

/// Case-insensitive substring and subsequence scoring.
///
/// | case                                   | score        |
/// |----------------------------------------|--------------|
/// | label equals query                     | 1.0          |
/// | label starts with query                | 0.8 ..= 0.9  |
/// | query starts a path or word segment    | 0.65 ..= 0.75|
/// | query occurs anywhere else             | 0.5 ..= 0.6  |
/// | query chars appear in order            | 0.1 .. 0.4   |
/// | otherwise                              | 0.0          |
///
/// Within a band, shorter labels and earlier occurrences score higher.
#[derive(Debug, Clone, Copy, Default)]
pub struct SubsequenceScorer;

const SEGMENT_SEPARATORS: &[char] = &['/', '-', '_', '.', ' '];

impl MatchScorer for SubsequenceScorer {
    fn score(&self, label: &str, query: &str) -> f64 {
        let query: Vec<char> = query.trim().to_lowercase().chars().collect();
        if query.is_empty() {
            return 1.0;
        }
        let label: Vec<char> = label.to_lowercase().chars().collect();
        if label.len() < query.len() {
            return 0.0;
        }
        if label == query {
            return 1.0;
        }

        let label_len = label.len() as f64;
        let length_penalty = (label.len() - query.len()) as f64 / label_len * 0.1;

        if label.starts_with(&query) {
            return 0.9 - length_penalty;
        }

        let occurrences: Vec<usize> = label
            .windows(query.len())
            .enumerate()
            .filter(|(_, window)| *window == query.as_slice())
            .map(|(pos, _)| pos)
            .collect();
        if let Some(&first) = occurrences.first() {
            let at_boundary = occurrences
                .iter()
                .any(|&pos| SEGMENT_SEPARATORS.contains(&label[pos - 1]));
            if at_boundary {
                return 0.75 - length_penalty;
            }
            let position_penalty = first as f64 / label_len * 0.05;
            return 0.6 - length_penalty * 0.5 - position_penalty;
        }

        subsequence_score(&label, &query)
    }
}

/// Greedy in-order match of `query` inside `label`; tighter spans score higher.
fn subsequence_score(label: &[char], query: &[char]) -> f64 {
    let mut first = None;
    let mut last = 0;
    let mut next = 0;
    for (idx, c) in label.iter().enumerate() {
        if next < query.len() && *c == query[next] {
            first.get_or_insert(idx);
            last = idx;
            next += 1;
        }
    }
    let Some(first) = first else {
        return 0.0;
    };
    if next < query.len() {
        return 0.0;
    }
    let span = (last - first + 1) as f64;
    let compactness = query.len() as f64 / span;
    // A contiguous span is a substring and was handled above, so compactness < 1.
    0.1 + 0.3 * compactness.min(0.999)
}

/// Filtering knobs shared by [`filter_and_sort`] and the selector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterOptions {
    /// Items scoring at or below this are dropped.
    pub min_score: f64,
    /// Cap on returned items; 0 keeps all.
    pub max_entries: usize,
}

impl Default for FilterOptions {
    fn default() -> Self {
        Self::from(&SelectorConfig::default())
    }
}

impl From<&SelectorConfig> for FilterOptions {
    fn from(config: &SelectorConfig) -> Self {
        Self {
            min_score: config.min_score,
            max_entries: config.max_entries,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoredCandidate {
    pub id: ProjectId,
    pub score: f64,
}

/// Filter `collection` against `query` and order the survivors.
///
/// An empty (or whitespace-only) query keeps every item in collection order.
/// Otherwise items are ordered by descending score, ties keeping collection
/// order.
pub fn filter_and_sort<M>(
    collection: &ProjectCollection,
    query: &str,
    scorer: &M,
    options: &FilterOptions,
) -> Vec<ScoredCandidate>
where
    M: MatchScorer + ?Sized,
{
    let query = query.trim();
    let mut results: Vec<ScoredCandidate> = if query.is_empty() {
        collection
            .ids()
            .iter()
            .map(|&id| ScoredCandidate { id, score: 1.0 })
            .collect()
    } else {
        let mut scored: Vec<ScoredCandidate> = collection
            .ids()
            .iter()
            .map(|&id| ScoredCandidate {
                id,
                score: scorer.score(collection.label(id), query),
            })
            .filter(|c| c.score > options.min_score)
            .collect();
        // Stable sort: equal scores keep collection order.
        scored.sort_by(|a, b| b.score.total_cmp(&a.score));
        scored
    };

    if options.max_entries > 0 {
        results.truncate(options.max_entries);
    }
    debug!(
        query,
        candidates = collection.len(),
        matches = results.len(),
        "filter_and_sort"
    );
    results
}

#[cfg(test)]
mod tests {
    use super::*;

    fn score(label: &str, query: &str) -> f64 {
        SubsequenceScorer.score(label, query)
    }

    fn ids(results: &[ScoredCandidate]) -> Vec<u64> {
        results.iter().map(|c| c.id.get()).collect()
    }

    #[test]
    fn exact_match_beats_prefix_beats_boundary_beats_infix() {
        let exact = score("widgets", "widgets");
        let prefix = score("widgets-legacy", "widgets");
        let boundary = score("acme/widgets", "widgets");
        let infix = score("mywidgets", "widgets");
        let subsequence = score("w-i-d-g-e-t-s", "widgets");
        assert_eq!(exact, 1.0);
        assert!(exact > prefix, "{exact} > {prefix}");
        assert!(prefix > boundary, "{prefix} > {boundary}");
        assert!(boundary > infix, "{boundary} > {infix}");
        assert!(infix > subsequence, "{infix} > {subsequence}");
        assert!(subsequence > 0.0);
    }

    #[test]
    fn scoring_is_case_insensitive_and_trims_query() {
        assert_eq!(score("Acme/Widgets", "  acme/WIDGETS "), 1.0);
    }

    #[test]
    fn missing_characters_score_zero() {
        assert_eq!(score("beta", "alpha"), 0.0);
        assert_eq!(score("ab", "abc"), 0.0);
        assert_eq!(score("cba", "abc"), 0.0);
    }

    #[test]
    fn bands_stay_within_documented_bounds() {
        let long = "x".repeat(200);
        assert!(score(&format!("ab{long}"), "ab") >= 0.8);
        assert!(score(&format!("{long}/ab"), "ab") >= 0.65);
        assert!(score(&format!("{long}ab"), "ab") >= 0.5);
        assert!(score(&format!("a{long}b"), "ab") < 0.4);
    }

    #[test]
    fn alpha_scenario_orders_exact_before_prefix() {
        let collection: ProjectCollection = [(1, "alpha"), (2, "beta"), (3, "alphabet")]
            .into_iter()
            .collect();
        let results = filter_and_sort(
            &collection,
            "alpha",
            &SubsequenceScorer,
            &FilterOptions::default(),
        );
        assert_eq!(ids(&results), vec![1, 3]);
    }

    #[test]
    fn empty_query_keeps_natural_order() {
        let collection: ProjectCollection = [(5, "e"), (1, "a"), (3, "c")].into_iter().collect();
        let results = filter_and_sort(
            &collection,
            "   ",
            &SubsequenceScorer,
            &FilterOptions::default(),
        );
        assert_eq!(ids(&results), vec![5, 1, 3]);
    }

    #[test]
    fn ties_keep_collection_order() {
        let collection: ProjectCollection = [(3, "x"), (1, "y"), (2, "z")].into_iter().collect();
        let flat = |_: &str, _: &str| 0.5;
        let results = filter_and_sort(&collection, "q", &flat, &FilterOptions::default());
        assert_eq!(ids(&results), vec![3, 1, 2]);
    }

    #[test]
    fn min_score_and_max_entries_are_applied() {
        let collection: ProjectCollection = [(1, "ab"), (2, "a-b"), (3, "abc"), (4, "zab")]
            .into_iter()
            .collect();
        let options = FilterOptions {
            min_score: 0.45,
            max_entries: 2,
        };
        let results = filter_and_sort(&collection, "ab", &SubsequenceScorer, &options);
        assert_eq!(ids(&results), vec![1, 3]);
    }

    #[test]
    fn nan_scores_are_dropped() {
        let collection: ProjectCollection = [(1, "a")].into_iter().collect();
        let nan = |_: &str, _: &str| f64::NAN;
        assert!(filter_and_sort(&collection, "a", &nan, &FilterOptions::default()).is_empty());
    }
}
