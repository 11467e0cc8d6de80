//! # Space Search CLI (`space`)
//!
//! ## Usage
//!
//! ```bash
//! space --config ./config/space.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `space sources` | Page through the catalog |
//! | `space search "<query>"` | Ranked search, recorded to history |
//! | `space history list` | Paginated search history, newest first |
//! | `space history show <id>` | One history entry with its results |
//! | `space history delete <id>` | Delete one history entry |
//! | `space history clear` | Delete all history |
//! | `space serve` | Start the HTTP API server |
//!
//! Logs go to stderr and honor `RUST_LOG` (default `info`).

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use space_search::config;
use space_search::service::SpaceSearch;
use space_search::{history, search, server, sources};

#[derive(Parser)]
#[command(
    name = "space",
    about = "Space Search: keyword search over a NASA media catalog with persisted search history",
    version
)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./config/space.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List catalog items, one page at a time.
    Sources {
        #[arg(long)]
        page: Option<usize>,

        /// Items per page. Defaults to `[pagination].default_page_size`.
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Search the catalog.
    ///
    /// First-page searches are recorded to the search history.
    Search {
        /// The search query string.
        query: String,

        #[arg(long)]
        page: Option<usize>,

        #[arg(long)]
        page_size: Option<usize>,

        /// Do not record this search in the history.
        #[arg(long)]
        no_history: bool,
    },

    /// Inspect or prune the search history.
    History {
        #[command(subcommand)]
        action: HistoryAction,
    },

    /// Start the HTTP API server on `[server].bind`.
    Serve,
}

#[derive(Subcommand)]
enum HistoryAction {
    /// List history entries, newest first.
    List {
        #[arg(long)]
        page: Option<usize>,

        #[arg(long)]
        page_size: Option<usize>,
    },
    /// Show one entry and its stored results.
    Show { id: String },
    /// Delete one entry.
    Delete { id: String },
    /// Delete every entry.
    Clear,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let cfg = config::load_config(&cli.config)?;

    let service = || SpaceSearch::from_config(&cfg);

    match cli.command {
        Commands::Sources { page, limit } => sources::list_sources(&service()?, page, limit)?,
        Commands::Search {
            query,
            page,
            page_size,
            no_history,
        } => search::run_search(&service()?, &query, page, page_size, no_history)?,
        Commands::History { action } => {
            let service = service()?;
            match action {
                HistoryAction::List { page, page_size } => {
                    history::list_history(&service, page, page_size)?
                }
                HistoryAction::Show { id } => history::show_history(&service, &id)?,
                HistoryAction::Delete { id } => history::delete_history(&service, &id)?,
                HistoryAction::Clear => history::clear_history(&service)?,
            }
        }
        Commands::Serve => server::run_server(&cfg).await?,
    }

    Ok(())
}
