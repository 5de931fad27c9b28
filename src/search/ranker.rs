use crate::indexing::index::{NameIndex, LEAF_PREFIX_LEN};
use crate::search::embedding::SemanticService;
use std::cmp::Ordering;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;

/// Number of suggestion words requested from the embedding by default
pub const DEFAULT_NEIGHBOR_COUNT: usize = 10;

/// Blends embedding neighbors with leaf-prefix matches and orders the result
pub struct RelevanceRanker {
    service: Arc<dyn SemanticService>,
    neighbor_count: usize,
}

impl RelevanceRanker {
    pub fn new(service: Arc<dyn SemanticService>) -> Self {
        Self {
            service,
            neighbor_count: DEFAULT_NEIGHBOR_COUNT,
        }
    }

    pub fn with_neighbor_count(mut self, neighbor_count: usize) -> Self {
        self.neighbor_count = neighbor_count;
        self
    }

    pub fn neighbor_count(&self) -> usize {
        self.neighbor_count
    }

    /// Suggestion words for `word`, closest first
    pub fn neighbors(&self, word: &str) -> Vec<String> {
        let mut found = self
            .service
            .neighbors(&word.to_lowercase(), self.neighbor_count);
        // stable: equal distances keep the service's order
        found.sort_by(|a, b| a.1.total_cmp(&b.1));
        found.into_iter().map(|(candidate, _)| candidate).collect()
    }

    /// Stems relevant to `query`, most relevant first.
    ///
    /// Candidates are the query itself plus its neighbors when they are known
    /// stems, together with stems owning a leaf that shares the query's first
    /// four characters (only for queries longer than three characters).
    pub fn related_stems(&self, query: &str, index: &NameIndex) -> Vec<String> {
        if query.is_empty() {
            return Vec::new();
        }

        let neighbor_stems = std::iter::once(query.to_string())
            .chain(self.neighbors(query))
            .filter(|word| index.contains_stem(word));

        let prefix_stems: &[String] = if query.chars().count() >= LEAF_PREFIX_LEN {
            index.stems_by_leaf_prefix(query)
        } else {
            &[]
        };

        let mut seen = HashSet::new();
        let candidates: Vec<String> = neighbor_stems
            .chain(prefix_stems.iter().cloned())
            .filter(|stem| seen.insert(stem.clone()))
            .collect();

        debug!("{} candidate stems for {:?}", candidates.len(), query);
        self.sort_by_relevance(candidates, query)
    }

    /// Order names of one stem group, most relevant to the stem first
    pub fn sort_names_within_stem(&self, names: &[String], stem: &str) -> Vec<String> {
        self.sort_by_relevance(names.to_vec(), stem)
    }

    /// Candidates containing `term` come first; each partition is then ordered
    /// by ascending distance to `term`. Equal keys keep their input order.
    pub fn sort_by_relevance(&self, candidates: Vec<String>, term: &str) -> Vec<String> {
        let mut keyed: Vec<(bool, f32, String)> = candidates
            .into_iter()
            .map(|candidate| {
                let distance = self.service.distance(term, &candidate);
                (candidate.contains(term), distance, candidate)
            })
            .collect();

        keyed.sort_by(|a, b| relevance_order(a.0, a.1, b.0, b.1));
        keyed.into_iter().map(|(_, _, candidate)| candidate).collect()
    }
}

fn relevance_order(
    left_contains: bool,
    left_distance: f32,
    right_contains: bool,
    right_distance: f32,
) -> Ordering {
    right_contains
        .cmp(&left_contains)
        .then_with(|| left_distance.total_cmp(&right_distance))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::embedding::MAX_DISTANCE;
    use std::collections::HashMap;

    /// Fixed neighbor lists and pairwise distances
    #[derive(Default)]
    struct StubService {
        neighbors: HashMap<String, Vec<(String, f32)>>,
        distances: HashMap<(String, String), f32>,
    }

    impl StubService {
        fn with_neighbor(mut self, word: &str, candidate: &str, distance: f32) -> Self {
            self.neighbors
                .entry(word.to_string())
                .or_default()
                .push((candidate.to_string(), distance));
            self
        }

        fn with_distance(mut self, a: &str, b: &str, distance: f32) -> Self {
            self.distances.insert((a.to_string(), b.to_string()), distance);
            self
        }
    }

    impl SemanticService for StubService {
        fn neighbors(&self, word: &str, max_count: usize) -> Vec<(String, f32)> {
            let mut found = self.neighbors.get(word).cloned().unwrap_or_default();
            found.truncate(max_count);
            found
        }

        fn distance(&self, a: &str, b: &str) -> f32 {
            self.distances
                .get(&(a.to_string(), b.to_string()))
                .copied()
                .unwrap_or(MAX_DISTANCE)
        }
    }

    fn ranker(service: StubService) -> RelevanceRanker {
        RelevanceRanker::new(Arc::new(service))
    }

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_containing_term_beats_distance() {
        let ranker = ranker(
            StubService::default()
                .with_distance("text", "glyph", 0.1)
                .with_distance("text", "subtext", 0.9),
        );
        let sorted = ranker.sort_by_relevance(strings(&["glyph", "subtext"]), "text");
        assert_eq!(sorted, ["subtext", "glyph"]);
    }

    #[test]
    fn test_distance_orders_within_partition() {
        let ranker = ranker(
            StubService::default()
                .with_distance("text", "doc", 0.5)
                .with_distance("text", "pencil", 0.2)
                .with_distance("text", "textformat", 0.4)
                .with_distance("text", "text", 0.0),
        );
        let sorted = ranker.sort_by_relevance(
            strings(&["doc", "textformat", "pencil", "text", "globe"]),
            "text",
        );
        assert_eq!(sorted, ["text", "textformat", "pencil", "doc", "globe"]);
    }

    #[test]
    fn test_neighbors_sorted_by_distance_stably() {
        let ranker = ranker(
            StubService::default()
                .with_neighbor("text", "bible", 0.8)
                .with_neighbor("text", "textual", 0.2)
                .with_neighbor("text", "writing", 0.8)
                .with_neighbor("text", "doc", 0.5),
        );
        assert_eq!(ranker.neighbors("Text"), ["textual", "doc", "bible", "writing"]);
    }

    #[test]
    fn test_neighbor_count_limits_suggestions() {
        let ranker = ranker(
            StubService::default()
                .with_neighbor("a", "b", 0.1)
                .with_neighbor("a", "c", 0.2),
        )
        .with_neighbor_count(1);
        assert_eq!(ranker.neighbors("a"), ["b"]);
    }

    #[test]
    fn test_empty_query_has_no_stems() {
        let index = NameIndex::from_resource("bolt_bolt\n");
        let ranker = ranker(StubService::default());
        assert!(ranker.related_stems("", &index).is_empty());
    }

    #[test]
    fn test_short_query_skips_prefix_search() {
        let index = NameIndex::from_resource("abacus_abacus\nabc.def_x\n");
        let ranker = ranker(StubService::default());
        assert!(ranker.related_stems("ab", &index).is_empty());
        // the query itself still counts when it is a stem
        assert_eq!(ranker.related_stems("abc", &index), ["abc"]);
    }

    #[test]
    fn test_related_stems_blend_neighbors_and_prefixes() {
        let index = NameIndex::from_resource(
            "text.below.photo_a\ndoc.text_b\ncharacter.textbox_c\npencil_d\nglobe_e\n",
        );
        let ranker = ranker(
            StubService::default()
                .with_neighbor("text", "pencil", 0.3)
                .with_neighbor("text", "writing", 0.1)
                .with_distance("text", "pencil", 0.3)
                .with_distance("text", "doc", 0.6)
                .with_distance("text", "character", 0.7)
                .with_distance("text", "text", 0.0),
        );
        let stems = ranker.related_stems("text", &index);
        assert_eq!(stems, ["text", "pencil", "doc", "character"]);
    }

    #[test]
    fn test_related_stems_without_duplicates() {
        let index = NameIndex::from_resource("bolt.fill_a\nbolt.slash_b\n");
        let ranker = ranker(StubService::default().with_neighbor("bolt", "bolt", 0.0));
        assert_eq!(ranker.related_stems("bolt", &index), ["bolt"]);
    }

    #[test]
    fn test_sort_names_within_stem_keeps_order_on_ties() {
        let ranker = ranker(StubService::default());
        let names = strings(&["info.circle", "info", "info.fill"]);
        assert_eq!(
            ranker.sort_names_within_stem(&names, "info"),
            ["info.circle", "info", "info.fill"]
        );
    }
}
