//! Invariants of filtering and ranking over generated collections.

use forgeview_core::types::{ProjectCollection, ProjectId, all_distinct};
use forgeview_selector::{FilterOptions, MatchScorer, SubsequenceScorer, filter_and_sort};
use proptest::prelude::*;
use std::collections::HashMap;

fn labels() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-z]{1,6}(/[a-z\\-]{1,8}){0,2}", 0..24)
}

fn collection_of(labels: &[String]) -> ProjectCollection {
    labels
        .iter()
        .enumerate()
        .map(|(idx, label)| (idx as u64 * 7 + 1, label.clone()))
        .collect()
}

proptest! {
    #[test]
    fn empty_query_returns_collection_in_order(labels in labels()) {
        let collection = collection_of(&labels);
        let results = filter_and_sort(&collection, "", &SubsequenceScorer, &FilterOptions::default());
        let ids: Vec<ProjectId> = results.iter().map(|c| c.id).collect();
        prop_assert_eq!(ids.as_slice(), collection.ids());
    }

    #[test]
    fn results_are_an_ordered_duplicate_free_subset(
        labels in labels(),
        query in "[a-z/\\-]{1,4}",
    ) {
        let collection = collection_of(&labels);
        let results = filter_and_sort(&collection, &query, &SubsequenceScorer, &FilterOptions::default());

        let ids: Vec<ProjectId> = results.iter().map(|c| c.id).collect();
        prop_assert!(all_distinct(&ids));
        prop_assert!(ids.iter().all(|id| collection.contains(*id)));

        let position: HashMap<ProjectId, usize> = collection
            .ids()
            .iter()
            .enumerate()
            .map(|(idx, id)| (*id, idx))
            .collect();
        for pair in results.windows(2) {
            prop_assert!(pair[0].score >= pair[1].score);
            if pair[0].score == pair[1].score {
                prop_assert!(position[&pair[0].id] < position[&pair[1].id]);
            }
        }
    }

    #[test]
    fn labels_containing_the_query_always_survive(
        labels in prop::collection::vec("[a-z/\\-]{1,12}", 1..16),
        pick in any::<prop::sample::Index>(),
        start in 0usize..12,
        len in 1usize..6,
    ) {
        let collection = collection_of(&labels);
        let label = pick.get(&labels);
        let start = start.min(label.len() - 1);
        let end = (start + len).min(label.len());
        let query = &label[start..end];

        let min_score = FilterOptions::default().min_score;
        prop_assert!(SubsequenceScorer.score(label, query) > min_score);

        let results = filter_and_sort(&collection, query, &SubsequenceScorer, &FilterOptions::default());
        for (id, candidate) in collection.ids().iter().map(|id| (*id, collection.label(*id))) {
            if candidate.contains(query.trim()) {
                prop_assert!(results.iter().any(|c| c.id == id));
            }
        }
    }

    #[test]
    fn filtering_is_deterministic(labels in labels(), query in "[a-z]{0,3}") {
        let collection = collection_of(&labels);
        let a = filter_and_sort(&collection, &query, &SubsequenceScorer, &FilterOptions::default());
        let b = filter_and_sort(&collection.clone(), &query, &SubsequenceScorer, &FilterOptions::default());
        prop_assert_eq!(a, b);
    }
}

#[test]
fn empty_collection_yields_nothing_for_any_query() {
    let collection = ProjectCollection::new();
    for query in ["", "a", "alpha", "  "] {
        assert!(filter_and_sort(&collection, query, &SubsequenceScorer, &FilterOptions::default()).is_empty());
    }
}
