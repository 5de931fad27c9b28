use super::records::{parse_records, read_records, SymbolRecord};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Number of leading characters of a leaf used as its lookup key
pub const LEAF_PREFIX_LEN: usize = 4;

/// Stem of a symbol name: everything before the first '.', or the whole name
/// if it has no '.'. `stem_of("info.circle.fill") == "info"`.
pub fn stem_of(full_name: &str) -> &str {
    full_name.split('.').next().unwrap_or(full_name)
}

/// Lowercased first four characters of `text` (all of it when shorter)
pub fn leaf_key(text: &str) -> String {
    text.to_lowercase().chars().take(LEAF_PREFIX_LEN).collect()
}

/// Lookup structures derived once from the symbol name list
#[derive(Debug, Clone, Default)]
pub struct NameIndex {
    stem_to_names: HashMap<String, Vec<String>>,
    name_to_identifier: HashMap<String, String>,
    all_stems: HashSet<String>,
    leaf_prefix_to_stems: HashMap<String, Vec<String>>,
}

impl NameIndex {
    /// Build the index from records in source order.
    ///
    /// Empty full names are skipped. A repeated full name keeps its first
    /// position in the stem bucket while its identifier is overwritten.
    pub fn build<I>(records: I) -> Self
    where
        I: IntoIterator<Item = SymbolRecord>,
    {
        let mut index = Self::default();

        for record in records {
            if record.full_name.is_empty() {
                debug!("Skipping record with empty name");
                continue;
            }

            let stem = stem_of(&record.full_name).to_string();

            let previous = index
                .name_to_identifier
                .insert(record.full_name.clone(), record.identifier);
            if previous.is_none() {
                index
                    .stem_to_names
                    .entry(stem.clone())
                    .or_default()
                    .push(record.full_name.clone());
            }

            for leaf in record.full_name.split('.').filter(|leaf| !leaf.is_empty()) {
                let bucket = index.leaf_prefix_to_stems.entry(leaf_key(leaf)).or_default();
                if !bucket.contains(&stem) {
                    bucket.push(stem.clone());
                }
            }

            index.all_stems.insert(stem);
        }

        index
    }

    /// Parse resource text (`<fullName>_<identifier>` lines) and build the index
    pub fn from_resource(text: &str) -> Self {
        Self::build(parse_records(text))
    }

    /// Stems having a leaf whose lowercase first four characters equal `prefix`
    pub fn stems_by_leaf_prefix(&self, prefix: &str) -> &[String] {
        self.leaf_prefix_to_stems
            .get(&leaf_key(prefix))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Full names sharing `stem`, in first-seen order
    pub fn names_for_stem(&self, stem: &str) -> &[String] {
        self.stem_to_names
            .get(stem)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Identifier to copy for a full name
    pub fn identifier(&self, full_name: &str) -> Option<&str> {
        self.name_to_identifier.get(full_name).map(String::as_str)
    }

    pub fn contains_stem(&self, stem: &str) -> bool {
        self.all_stems.contains(stem)
    }

    /// All distinct stems, in no particular order
    pub fn stems(&self) -> impl Iterator<Item = &str> {
        self.all_stems.iter().map(String::as_str)
    }

    pub fn stem_count(&self) -> usize {
        self.all_stems.len()
    }

    pub fn name_count(&self) -> usize {
        self.name_to_identifier.len()
    }

    pub fn is_empty(&self) -> bool {
        self.all_stems.is_empty()
    }
}

/// Whether the symbol names resource could be read
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexStatus {
    Loaded,
    Unavailable { path: PathBuf, reason: String },
}

/// An index together with the status of the resource it came from
#[derive(Debug, Clone)]
pub struct LoadedIndex {
    pub index: NameIndex,
    pub status: IndexStatus,
}

impl LoadedIndex {
    pub fn is_available(&self) -> bool {
        self.status == IndexStatus::Loaded
    }
}

/// Load the resource at `path`. A missing or unreadable file yields an empty
/// index with an `Unavailable` status instead of an error.
pub fn load_index(path: &Path) -> LoadedIndex {
    match read_records(path) {
        Ok(records) => {
            let index = NameIndex::build(records);
            info!(
                "Loaded {} symbol names in {} stems from {}",
                index.name_count(),
                index.stem_count(),
                path.display()
            );
            LoadedIndex {
                index,
                status: IndexStatus::Loaded,
            }
        }
        Err(e) => {
            warn!("Symbol names unavailable at {}: {}", path.display(), e);
            LoadedIndex {
                index: NameIndex::default(),
                status: IndexStatus::Unavailable {
                    path: path.to_path_buf(),
                    reason: e.to_string(),
                },
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> NameIndex {
        NameIndex::from_resource("info.circle_circle.info\ninfo.fill_circle.info.fill\nbolt_bolt\n")
    }

    #[test]
    fn test_stem_of() {
        assert_eq!(stem_of("info.circle.fill"), "info");
        assert_eq!(stem_of("bolt"), "bolt");
    }

    #[test]
    fn test_names_for_stem_keeps_source_order() {
        let index = sample();
        assert_eq!(index.names_for_stem("info"), ["info.circle", "info.fill"]);
        assert_eq!(index.names_for_stem("bolt"), ["bolt"]);
        assert!(index.names_for_stem("missing").is_empty());
    }

    #[test]
    fn test_leaf_prefix_lookup() {
        let index = sample();
        assert_eq!(index.stems_by_leaf_prefix("circ"), ["info"]);
        assert_eq!(index.stems_by_leaf_prefix("CIRC"), ["info"]);
        assert_eq!(index.stems_by_leaf_prefix("bolt"), ["bolt"]);
        assert!(index.stems_by_leaf_prefix("xyzw").is_empty());
    }

    #[test]
    fn test_leaf_key_lowercases_before_truncating() {
        // 'İ' lowercases to two chars
        assert_eq!(leaf_key("İstanbul"), "i\u{307}st");
        assert_eq!(leaf_key("İstanbul").chars().count(), LEAF_PREFIX_LEN);
        assert_eq!(leaf_key("TEXTBOX"), "text");
    }

    #[test]
    fn test_short_leaf_key() {
        let index = NameIndex::from_resource("a.up_a.up\n");
        assert_eq!(index.stems_by_leaf_prefix("up"), ["a"]);
        assert_eq!(index.stems_by_leaf_prefix("a"), ["a"]);
    }

    #[test]
    fn test_duplicate_name_last_identifier_wins() {
        let index = NameIndex::from_resource("star_first\nstar.fill_x\nstar_second\n");
        assert_eq!(index.identifier("star"), Some("second"));
        assert_eq!(index.names_for_stem("star"), ["star", "star.fill"]);
        assert_eq!(index.name_count(), 2);
    }

    #[test]
    fn test_empty_names_are_skipped() {
        let index = NameIndex::build(vec![SymbolRecord::new("", "x")]);
        assert!(index.is_empty());
        assert!(index.stems_by_leaf_prefix("").is_empty());
    }

    #[test]
    fn test_bucket_deduplicates_stems() {
        let index = NameIndex::from_resource("text.below_a\ntext.above_b\n");
        assert_eq!(index.stems_by_leaf_prefix("text"), ["text"]);
    }
}
