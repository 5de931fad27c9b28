use crate::core::error::{Error, Result};
use candle_core::{Device, Tensor};
use rayon::prelude::*;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Distance reported for words the embedding does not know.
/// Cosine distance never exceeds 2.0, so unknown words always sort last.
pub const MAX_DISTANCE: f32 = 2.0;

/// Word similarity provider consumed by the ranker
pub trait SemanticService: Send + Sync {
    /// Up to `max_count` words close to `word`, with non-negative distances
    /// (smaller is more similar). Unknown words yield an empty list.
    fn neighbors(&self, word: &str, max_count: usize) -> Vec<(String, f32)>;

    /// Distance between two words, or `MAX_DISTANCE` if either is unknown
    fn distance(&self, a: &str, b: &str) -> f32;
}

/// Stand-in used when no word vectors are installed
#[derive(Debug, Clone, Copy, Default)]
pub struct Unavailable;

impl SemanticService for Unavailable {
    fn neighbors(&self, _word: &str, _max_count: usize) -> Vec<(String, f32)> {
        Vec::new()
    }

    fn distance(&self, _a: &str, _b: &str) -> f32 {
        MAX_DISTANCE
    }
}

/// In-memory word embedding backed by an L2-normalised `[words, dim]` matrix
pub struct WordEmbedding {
    words: Vec<String>,
    lookup: HashMap<String, usize>,
    vectors: Tensor,
    dim: usize,
}

impl WordEmbedding {
    /// Load a GloVe / fastText style text file (`word v1 v2 ... vd` per line).
    /// A leading `count dim` header line is accepted and ignored.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let embedding = Self::parse(&content)?;
        info!(
            "Loaded {} word vectors ({} dimensions) from {}",
            embedding.len(),
            embedding.dim,
            path.display()
        );
        Ok(embedding)
    }

    /// Parse word-vector text
    pub fn parse(content: &str) -> Result<Self> {
        let mut lines: Vec<&str> = content
            .lines()
            .filter(|line| !line.trim().is_empty())
            .collect();

        if lines.first().map(|line| is_header(line)).unwrap_or(false) {
            lines.remove(0);
        }

        let entries: Vec<(String, Vec<f32>)> = lines
            .par_iter()
            .filter_map(|line| {
                let parsed = parse_vector_line(line);
                if parsed.is_none() {
                    debug!("Skipping malformed vector line");
                }
                parsed
            })
            .collect();

        Self::from_entries(entries)
    }

    /// Build from `(word, vector)` pairs. Words are lowercased and the first
    /// occurrence wins; vectors of the wrong dimension or zero norm are skipped.
    pub fn from_entries<I>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, Vec<f32>)>,
    {
        let mut words = Vec::new();
        let mut lookup = HashMap::new();
        let mut data = Vec::new();
        let mut dim = 0;

        for (word, vector) in entries {
            let word = word.to_lowercase();
            if lookup.contains_key(&word) {
                continue;
            }
            if dim == 0 {
                dim = vector.len();
            }
            if vector.len() != dim || dim == 0 {
                debug!("Skipping vector for {:?}: expected {} dimensions", word, dim);
                continue;
            }
            let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
            if norm == 0.0 || !norm.is_finite() {
                debug!("Skipping zero vector for {:?}", word);
                continue;
            }
            data.extend(vector.iter().map(|x| x / norm));
            lookup.insert(word.clone(), words.len());
            words.push(word);
        }

        if words.is_empty() {
            return Err(Error::Embedding("No usable word vectors".to_string()));
        }

        let vectors = Tensor::from_vec(data, (words.len(), dim), &Device::Cpu)?;

        Ok(Self {
            words,
            lookup,
            vectors,
            dim,
        })
    }

    /// Number of words in the vocabulary
    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn contains(&self, word: &str) -> bool {
        self.lookup.contains_key(&word.to_lowercase())
    }

    fn row(&self, word: &str) -> Option<usize> {
        self.lookup.get(&word.to_lowercase()).copied()
    }

    fn similarities(&self, row: usize) -> Result<Vec<f32>> {
        let query = self.vectors.get(row)?.unsqueeze(1)?.contiguous()?;
        let scores = self.vectors.matmul(&query)?.squeeze(1)?;
        Ok(scores.to_vec1::<f32>()?)
    }

    fn similarity(&self, a: usize, b: usize) -> Result<f32> {
        let left = self.vectors.get(a)?;
        let right = self.vectors.get(b)?;
        Ok(left.mul(&right)?.sum_all()?.to_scalar::<f32>()?)
    }
}

impl SemanticService for WordEmbedding {
    fn neighbors(&self, word: &str, max_count: usize) -> Vec<(String, f32)> {
        let Some(row) = self.row(word) else {
            return Vec::new();
        };
        if max_count == 0 {
            return Vec::new();
        }

        let scores = match self.similarities(row) {
            Ok(scores) => scores,
            Err(e) => {
                warn!("Neighbor lookup for {:?} failed: {}", word, e);
                return Vec::new();
            }
        };

        let mut ranked: Vec<(usize, f32)> = scores
            .into_iter()
            .enumerate()
            .filter(|(i, _)| *i != row)
            .map(|(i, sim)| (i, (1.0 - sim).clamp(0.0, MAX_DISTANCE)))
            .collect();
        ranked.sort_by(|a, b| a.1.total_cmp(&b.1));
        ranked.truncate(max_count);

        ranked
            .into_iter()
            .map(|(i, distance)| (self.words[i].clone(), distance))
            .collect()
    }

    fn distance(&self, a: &str, b: &str) -> f32 {
        let (Some(left), Some(right)) = (self.row(a), self.row(b)) else {
            return MAX_DISTANCE;
        };
        match self.similarity(left, right) {
            Ok(sim) => (1.0 - sim).clamp(0.0, MAX_DISTANCE),
            Err(e) => {
                warn!("Distance between {:?} and {:?} failed: {}", a, b, e);
                MAX_DISTANCE
            }
        }
    }
}

/// Open the word vectors at `path`, degrading to `Unavailable` when the file
/// is missing or unusable.
pub fn open_semantic_service(path: &Path) -> Arc<dyn SemanticService> {
    if !path.exists() {
        warn!(
            "No word vectors at {}; suggestions are disabled",
            path.display()
        );
        return Arc::new(Unavailable);
    }
    match WordEmbedding::load(path) {
        Ok(embedding) => Arc::new(embedding),
        Err(e) => {
            warn!("Failed to load word vectors from {}: {}", path.display(), e);
            Arc::new(Unavailable)
        }
    }
}

fn is_header(line: &str) -> bool {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    tokens.len() == 2 && tokens.iter().all(|t| t.parse::<usize>().is_ok())
}

fn parse_vector_line(line: &str) -> Option<(String, Vec<f32>)> {
    let mut tokens = line.split_whitespace();
    let word = tokens.next()?.to_string();
    let vector = tokens
        .map(|t| t.parse::<f32>().ok())
        .collect::<Option<Vec<f32>>>()?;
    if vector.is_empty() {
        return None;
    }
    Some((word, vector))
}
