use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use symbolpick::ui::cli::{Cli, Commands};
use symbolpick::ui::output::{
    format_group, format_neighbors, format_search, search_report, stem_group,
};
use symbolpick::{
    load_index, open_semantic_service, Clipboard, Config, IndexStatus, LoadedIndex,
    RelevanceRanker, Settings, SymbolTui,
};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli);

    let base_dir = cli.base_dir.as_deref().map(PathBuf::from);
    let config = Config::new(base_dir)?;

    match &cli.command {
        Some(Commands::Init) => handle_init(&config),
        Some(Commands::Search { query, limit, json }) => {
            handle_search(&config, query, *limit, *json)
        }
        Some(Commands::Neighbors { word, json }) => handle_neighbors(&config, word, *json),
        Some(Commands::Group { stem, json }) => handle_group(&config, stem, *json),
        None => handle_picker(&config, cli.query.as_deref()),
    }
}

fn init_logging(cli: &Cli) {
    // The picker owns the terminal, so it stays silent unless RUST_LOG asks otherwise.
    let default_level = match (&cli.command, cli.verbose) {
        (None, _) => "off",
        (_, true) => "info",
        (_, false) => "warn",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Load settings, the name index, and the ranker
fn open(config: &Config) -> Result<(Settings, LoadedIndex, RelevanceRanker)> {
    let settings = config
        .load_settings()
        .with_context(|| format!("Failed to read {}", config.settings_path.display()))?;
    let loaded = load_index(&config.names_path(&settings));
    let ranker = open_ranker(config, &settings);
    Ok((settings, loaded, ranker))
}

fn open_ranker(config: &Config, settings: &Settings) -> RelevanceRanker {
    let service = open_semantic_service(&config.vectors_path(settings));
    RelevanceRanker::new(service).with_neighbor_count(settings.neighbor_count)
}

fn report_unavailable(loaded: &LoadedIndex) {
    if let IndexStatus::Unavailable { path, reason } = &loaded.status {
        eprintln!("Symbol data unavailable: {} ({})", path.display(), reason);
        eprintln!("Place a names file there, one `<name>_<identifier>` per line.");
    }
}

fn handle_init(config: &Config) -> Result<()> {
    println!("Initializing symbolpick...");

    if config.is_initialized() {
        println!("symbolpick is already initialized at: {:?}", config.base_dir);
        println!("To reinitialize, delete the directory and run 'init' again.");
        return Ok(());
    }

    config.init().context("Failed to create configuration directories")?;
    let settings = Settings::default();
    println!("✓ Created configuration directory: {:?}", config.base_dir);
    println!("✓ Created data directory: {:?}", config.data_dir);
    println!("✓ Created models directory: {:?}", config.models_dir);
    println!("✓ Wrote default settings: {:?}", config.settings_path);

    println!("\nInitialization complete!");
    println!("Next steps:");
    println!("  1. Copy the symbol names to: {}", config.names_path(&settings).display());
    println!(
        "  2. Optionally add word vectors (GloVe/fastText text) at: {}",
        config.vectors_path(&settings).display()
    );
    println!("  3. Run: symbolpick");

    Ok(())
}

fn handle_search(config: &Config, query: &str, limit: usize, json: bool) -> Result<()> {
    let (_, loaded, ranker) = open(config)?;
    report_unavailable(&loaded);

    let report = search_report(query, limit, &ranker, &loaded.index);
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", format_search(&report));
    }
    Ok(())
}

fn handle_neighbors(config: &Config, word: &str, json: bool) -> Result<()> {
    let settings = config
        .load_settings()
        .with_context(|| format!("Failed to read {}", config.settings_path.display()))?;
    let ranker = open_ranker(config, &settings);

    let neighbors = ranker.neighbors(word);
    if json {
        println!("{}", serde_json::to_string_pretty(&neighbors)?);
    } else {
        println!("{}", format_neighbors(word, &neighbors));
    }
    Ok(())
}

fn handle_group(config: &Config, stem: &str, json: bool) -> Result<()> {
    let (_, loaded, ranker) = open(config)?;
    report_unavailable(&loaded);

    let group = stem_group(stem, &ranker, &loaded.index);
    if json {
        println!("{}", serde_json::to_string_pretty(&group)?);
    } else if group.symbols.is_empty() {
        println!("No symbols with stem \"{}\".", stem);
    } else {
        print!("{}", format_group(&group));
    }
    Ok(())
}

fn handle_picker(config: &Config, query: Option<&str>) -> Result<()> {
    let (settings, loaded, ranker) = open(config)?;
    let clipboard = Clipboard::new(settings.copy_command.clone());

    let mut tui = SymbolTui::new(loaded, ranker, clipboard, &settings);
    if let Some(query) = query {
        tui = tui.with_query(query);
    }
    let picks = tui.run().context("Interactive picker failed")?;

    for pick in picks {
        println!("{}", pick.identifier);
    }
    Ok(())
}
