//! MovieFinder CLI
//!
//! Interactive movie search in the terminal, plus one-shot subcommands for
//! scripting.

use clap::{Parser, Subcommand};
use console::style;
use indicatif::{HumanDuration, ProgressBar, ProgressStyle};
use moviefinder::controller::run_fetch;
use moviefinder::{
    AppwriteStore, Catalog, Config, MemoryStore, Movie, SearchController, SearchRecord,
    TmdbClient, TrackingPolicy, TrendStore,
};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// MovieFinder - find movies you'll enjoy without the hassle
///
/// Searches the TMDB catalog as you type and keeps a running count of
/// what everyone searches for.
#[derive(Parser)]
#[command(name = "moviefinder")]
#[command(version)]
#[command(about = "Terminal movie search with trending searches", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Quiet period after typing before a search is sent, in milliseconds
    #[arg(long, global = true)]
    debounce_ms: Option<u64>,

    /// Number of trending searches to show
    #[arg(long, global = true)]
    trending_limit: Option<usize>,

    /// When a search is counted towards trending
    #[arg(long, global = true, value_enum)]
    tracking: Option<TrackingPolicy>,

    /// HTTP request timeout in seconds
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,

    /// Keep search counts in memory instead of Appwrite
    #[arg(long, global = true)]
    local_trends: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive search (default)
    Tui,

    /// Search the catalog once and print the results
    Search {
        /// Movie title to look for
        query: String,

        /// Print raw JSON
        #[arg(long)]
        json: bool,
    },

    /// List the most popular movies
    Discover {
        /// Print raw JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the most searched terms
    Trending {
        /// Number of entries (defaults to the configured trending limit)
        #[arg(short, long)]
        limit: Option<usize>,

        /// Print raw JSON
        #[arg(long)]
        json: bool,
    },

    /// Show which configuration values are set
    Config,
}

fn main() {
    let log_file = moviefinder::logging::init();
    log::info!("MovieFinder {} starting up", moviefinder::VERSION);

    let cli = Cli::parse();
    let config = apply_overrides(Config::from_env(), &cli);

    let result = match cli.command.unwrap_or(Commands::Tui) {
        Commands::Tui => cmd_tui(&config, cli.local_trends),
        Commands::Search { query, json } => cmd_search(&config, cli.local_trends, &query, json),
        Commands::Discover { json } => cmd_search(&config, cli.local_trends, "", json),
        Commands::Trending { limit, json } => {
            cmd_trending(&config, cli.local_trends, limit.unwrap_or(config.trending_limit), json)
        }
        Commands::Config => cmd_config(&config, log_file),
    };

    if let Err(e) = result {
        log::error!("{}", e);
        eprintln!("{} {}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }
}

fn apply_overrides(mut config: Config, cli: &Cli) -> Config {
    if let Some(ms) = cli.debounce_ms {
        config.debounce = Duration::from_millis(ms);
    }
    if let Some(limit) = cli.trending_limit {
        config.trending_limit = limit;
    }
    if let Some(tracking) = cli.tracking {
        config.tracking = tracking;
    }
    if let Some(secs) = cli.timeout_secs {
        config.http_timeout = Duration::from_secs(secs);
    }
    config
}

fn build_store(config: &Config, local: bool) -> moviefinder::Result<Arc<dyn TrendStore>> {
    if local {
        log::info!("Using in-memory trend store");
        return Ok(Arc::new(MemoryStore::new()));
    }
    Ok(Arc::new(AppwriteStore::new(&config.store, config.http_timeout)?))
}

fn spinner(message: String) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(spinner_style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        pb.set_style(spinner_style);
    }
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

/// Interactive mode
fn cmd_tui(config: &Config, local_trends: bool) -> moviefinder::Result<()> {
    let catalog: Arc<dyn Catalog> = Arc::new(TmdbClient::new(&config.catalog, config.http_timeout)?);
    let store = build_store(config, local_trends)?;
    let controller = SearchController::new(catalog, store, config);
    moviefinder::tui::run(controller)
}

/// Search and discover: an empty query lists popular movies
fn cmd_search(
    config: &Config,
    local_trends: bool,
    query: &str,
    json: bool,
) -> moviefinder::Result<()> {
    let catalog = TmdbClient::new(&config.catalog, config.http_timeout)?;
    let store = build_store(config, local_trends)?;

    let label = if query.is_empty() {
        "Loading popular movies".to_string()
    } else {
        format!("Searching for '{}'", query)
    };
    let pb = (!json).then(|| spinner(label));

    let start = Instant::now();
    let outcome = run_fetch(&catalog, store.as_ref(), config.tracking, query);
    if let Some(pb) = pb {
        pb.finish_and_clear();
    }
    let movies = outcome?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&movies).map_err(std::io::Error::from)?
        );
        return Ok(());
    }

    println!(
        "{} {} movies in {}",
        style("✓").green().bold(),
        style(movies.len()).green(),
        style(HumanDuration(start.elapsed())).cyan()
    );
    println!();
    print_movies(&movies);
    Ok(())
}

fn print_movies(movies: &[Movie]) {
    if movies.is_empty() {
        println!("  {}", style("No movies found").dim());
        return;
    }

    for (i, movie) in movies.iter().enumerate() {
        println!(
            "  {} {} {}",
            style(format!("{:3}.", i + 1)).dim(),
            style(&movie.title).cyan(),
            style(format!("({})", movie.year_label())).dim()
        );
        println!(
            "      {} {}  {} {}",
            style("Rating:").dim(),
            style(movie.rating_label()).yellow(),
            style("Lang:").dim(),
            movie.language_label()
        );
    }
}

/// Top searched terms
fn cmd_trending(
    config: &Config,
    local_trends: bool,
    limit: usize,
    json: bool,
) -> moviefinder::Result<()> {
    let store = build_store(config, local_trends)?;

    let pb = (!json).then(|| spinner("Loading trending searches".to_string()));
    let outcome = store.trending(limit);
    if let Some(pb) = pb {
        pb.finish_and_clear();
    }
    let records = outcome?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&records).map_err(std::io::Error::from)?
        );
        return Ok(());
    }

    print_trending(&records);
    Ok(())
}

fn print_trending(records: &[SearchRecord]) {
    if records.is_empty() {
        println!("  {}", style("No searches recorded yet").dim());
        return;
    }

    println!("{} Trending searches", style("→").cyan().bold());
    for (rank, record) in records.iter().enumerate().map(|(i, r)| (i + 1, r)) {
        println!(
            "  {} {} {}",
            style(format!("{:3}.", rank)).yellow().bold(),
            style(&record.search_term).cyan(),
            style(format!("({} searches)", record.count)).dim()
        );
        if let Some(url) = record.movie_page_url() {
            println!("      {} {}", style("Movie:").dim(), url);
        }
        if let Some(poster) = record.poster_url.as_deref() {
            println!("      {} {}", style("Poster:").dim(), poster);
        }
    }
}

fn cmd_config(config: &Config, log_file: Option<std::path::PathBuf>) -> moviefinder::Result<()> {
    println!("{} Configuration", style("→").cyan().bold());
    for (name, value) in config.describe() {
        match value {
            Some(v) => println!("  {:24} {}", style(name).bold(), style(v).green()),
            None => println!("  {:24} {}", style(name).bold(), style("(not set)").red()),
        }
    }
    println!();
    println!(
        "  {:24} {} ms",
        style("Debounce:").bold(),
        config.debounce.as_millis()
    );
    println!("  {:24} {}", style("Trending limit:").bold(), config.trending_limit);
    println!("  {:24} {:?}", style("Tracking:").bold(), config.tracking);
    println!(
        "  {:24} {} s",
        style("HTTP timeout:").bold(),
        config.http_timeout.as_secs()
    );
    if let Some(path) = log_file {
        println!("  {:24} {}", style("Log file:").bold(), path.display());
    }
    Ok(())
}
