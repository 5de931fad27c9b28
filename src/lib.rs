// Core functionality
pub mod core {
    pub mod config;
    pub mod error;
}

// Name list parsing & lookup structures
pub mod indexing {
    pub mod index;
    pub mod records;
}

// Word embeddings & relevance ranking
pub mod search {
    pub mod embedding;
    pub mod ranker;
}

// User interfaces
pub mod ui {
    pub mod cli;
    pub mod clipboard;
    pub mod output;
    pub mod tui;
}

// Re-export commonly used types
pub use core::config::{Config, Settings};
pub use core::error::{Error, Result};
pub use indexing::index::{load_index, stem_of, IndexStatus, LoadedIndex, NameIndex};
pub use indexing::records::{parse_records, SymbolRecord};
pub use search::embedding::{open_semantic_service, SemanticService, Unavailable, WordEmbedding, MAX_DISTANCE};
pub use search::ranker::RelevanceRanker;
pub use ui::cli::Cli;
pub use ui::clipboard::Clipboard;
pub use ui::tui::SymbolTui;
