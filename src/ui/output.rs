//! Plain-text and JSON rendering for the non-interactive commands.

use crate::indexing::index::NameIndex;
use crate::search::ranker::RelevanceRanker;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SymbolEntry {
    pub name: String,
    pub identifier: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StemGroup {
    pub stem: String,
    pub symbols: Vec<SymbolEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchReport {
    pub query: String,
    pub stems: Vec<StemGroup>,
}

/// One stem's symbols in relevance order, with their identifiers
pub fn stem_group(stem: &str, ranker: &RelevanceRanker, index: &NameIndex) -> StemGroup {
    let symbols = ranker
        .sort_names_within_stem(index.names_for_stem(stem), stem)
        .into_iter()
        .map(|name| SymbolEntry {
            identifier: index.identifier(&name).unwrap_or(name.as_str()).to_string(),
            name,
        })
        .collect();
    StemGroup {
        stem: stem.to_string(),
        symbols,
    }
}

/// Related stems for `query` (at most `limit`), each expanded into its symbols
pub fn search_report(
    query: &str,
    limit: usize,
    ranker: &RelevanceRanker,
    index: &NameIndex,
) -> SearchReport {
    let stems = ranker
        .related_stems(query, index)
        .into_iter()
        .take(limit)
        .map(|stem| stem_group(&stem, ranker, index))
        .collect();
    SearchReport {
        query: query.to_string(),
        stems,
    }
}

pub fn format_search(report: &SearchReport) -> String {
    if report.stems.is_empty() {
        return format!("No symbols related to \"{}\".", report.query);
    }
    let mut out = format!("Found {} groups for \"{}\":\n", report.stems.len(), report.query);
    for group in &report.stems {
        out.push('\n');
        out.push_str(&format_group(group));
    }
    out.trim_end().to_string()
}

pub fn format_group(group: &StemGroup) -> String {
    let mut out = format!("{} ({} symbols)\n", group.stem, group.symbols.len());
    for symbol in &group.symbols {
        if symbol.identifier == symbol.name {
            out.push_str(&format!("  {}\n", symbol.name));
        } else {
            out.push_str(&format!("  {}  ->  {}\n", symbol.name, symbol.identifier));
        }
    }
    out
}

pub fn format_neighbors(word: &str, neighbors: &[String]) -> String {
    if neighbors.is_empty() {
        return format!("No suggestions for \"{}\".", word);
    }
    neighbors.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::embedding::Unavailable;
    use std::sync::Arc;

    fn setup() -> (RelevanceRanker, NameIndex) {
        let index = NameIndex::from_resource(
            "info.circle_circle.info\ninfo.fill_circle.info.fill\nbolt_bolt\n",
        );
        (RelevanceRanker::new(Arc::new(Unavailable)), index)
    }

    #[test]
    fn test_search_report_groups_symbols() {
        let (ranker, index) = setup();
        let report = search_report("info", 10, &ranker, &index);
        assert_eq!(report.stems.len(), 1);
        assert_eq!(report.stems[0].stem, "info");
        assert_eq!(
            report.stems[0].symbols[1],
            SymbolEntry {
                name: "info.fill".to_string(),
                identifier: "circle.info.fill".to_string(),
            }
        );
    }

    #[test]
    fn test_search_report_json_shape() {
        let (ranker, index) = setup();
        let report = search_report("bolt", 10, &ranker, &index);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["query"], "bolt");
        assert_eq!(json["stems"][0]["symbols"][0]["identifier"], "bolt");
    }

    #[test]
    fn test_limit_caps_groups() {
        let (ranker, index) = setup();
        assert!(search_report("info", 0, &ranker, &index).stems.is_empty());
    }

    #[test]
    fn test_human_format() {
        let (ranker, index) = setup();
        let text = format_search(&search_report("info", 10, &ranker, &index));
        assert!(text.starts_with("Found 1 groups for \"info\":"));
        assert!(text.contains("  info.circle  ->  circle.info"));
        assert_eq!(
            format_search(&search_report("zzzz", 10, &ranker, &index)),
            "No symbols related to \"zzzz\"."
        );
    }
}
