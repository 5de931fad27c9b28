use clap::{Parser, Subcommand};

/// symbolpick - Find system symbol names by meaning
#[derive(Parser, Debug)]
#[command(name = "symbolpick")]
#[command(about = "Search system symbol names with word-embedding suggestions and copy their identifiers", long_about = None)]
#[command(version)]
#[command(subcommand_required = false)]
#[command(arg_required_else_help = false)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Initial search text for the interactive picker
    #[arg(value_name = "QUERY")]
    pub query: Option<String>,

    /// Custom base directory (default: ~/.symbolpick)
    #[arg(long, global = true)]
    pub base_dir: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize symbolpick (create directories and default settings)
    Init,
    /// List stems related to a query, with their symbols
    Search {
        /// Search text
        query: String,
        /// Maximum number of stems to print
        #[arg(short, long, default_value_t = 10)]
        limit: usize,
        /// Output results as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show suggestion words for a term
    Neighbors {
        /// Word to find suggestions for
        word: String,
        /// Output results as JSON
        #[arg(long)]
        json: bool,
    },
    /// List every symbol sharing a stem, most relevant first
    Group {
        /// Stem, e.g. "info" for "info.circle.fill"
        stem: String,
        /// Output results as JSON
        #[arg(long)]
        json: bool,
    },
}
