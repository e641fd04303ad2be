use bookstore::catalog::{DEFAULT_PAGE_SIZE, Page};
use bookstore::cli as prog_cli;
use bookstore::cli::OutputMode;
use bookstore::errors::CatalogError;
use bookstore::{Bookstore, Settings};
use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct AppConfig {
    uri: Option<String>,
    database: Option<String>,
    collection: Option<String>,
}

fn load_config(cli_cfg: Option<PathBuf>) -> AppConfig {
    // Precedence: CLI > env > config files > defaults
    // 1) Start with defaults
    let mut cfg = AppConfig::default();
    // 2) Load from config files (~/.config/bookstore.toml, ~/.bookstorerc, custom path)
    let mut paths: Vec<PathBuf> = vec![];
    if let Some(p) = &cli_cfg {
        paths.push(p.clone());
    }
    if let Ok(p) = std::env::var("BOOKSTORE_CONFIG") {
        paths.push(PathBuf::from(p));
    }
    if let Ok(home) = std::env::var("USERPROFILE").or_else(|_| std::env::var("HOME")) {
        let home_pb = PathBuf::from(home);
        paths.push(home_pb.join(".bookstorerc"));
        paths.push(home_pb.join(".config").join("bookstore.toml"));
    }
    if let Ok(cur) = std::env::current_dir() {
        paths.push(cur.join("bookstore.toml"));
    }
    for p in paths {
        if p.exists() {
            if let Ok(s) = std::fs::read_to_string(&p) {
                if let Ok(file_cfg) = toml::from_str::<AppConfig>(&s) {
                    if cfg.uri.is_none() {
                        cfg.uri = file_cfg.uri;
                    }
                    if cfg.database.is_none() {
                        cfg.database = file_cfg.database;
                    }
                    if cfg.collection.is_none() {
                        cfg.collection = file_cfg.collection;
                    }
                }
            }
        }
    }
    // 3) Environment variables
    if cfg.uri.is_none() {
        if let Ok(s) = std::env::var("BOOKSTORE_URI") {
            cfg.uri = Some(s);
        }
    }
    if cfg.database.is_none() {
        if let Ok(s) = std::env::var("BOOKSTORE_DB") {
            cfg.database = Some(s);
        }
    }
    if cfg.collection.is_none() {
        if let Ok(s) = std::env::var("BOOKSTORE_COLLECTION") {
            cfg.collection = Some(s);
        }
    }
    cfg
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Human,
    Plain,
    Json,
}

impl From<Format> for OutputMode {
    fn from(f: Format) -> Self {
        match f {
            Format::Human => Self::Human,
            Format::Plain => Self::Plain,
            Format::Json => Self::Json,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "bookstore", version, about = "Bookstore catalog CLI", long_about = None)]
struct Cli {
    /// Path to a config file (TOML)
    #[arg(long, help = "Path to a config file (TOML). If omitted, defaults are used.")]
    config: Option<PathBuf>,
    /// Override connection string (takes precedence over config)
    #[arg(long, help = "MongoDB connection string. Takes precedence over config/env.")]
    uri: Option<String>,
    #[arg(long, help = "Database name. Takes precedence over config/env.")]
    db: Option<String>,
    #[arg(long, help = "Collection name. Takes precedence over config/env.")]
    collection: Option<String>,
    #[arg(long, value_enum, default_value_t = Format::Human, help = "Output format")]
    format: Format,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(about = "List every book in the catalog")]
    Get,
    #[command(about = "List books by a specific author")]
    Author {
        #[arg(help = "Author name (exact match)")]
        author: String,
    },
    #[command(about = "List books in a specific genre")]
    Genre {
        #[arg(help = "Genre name (exact match)")]
        genre: String,
    },
    #[command(about = "List books published after a year (exclusive)")]
    Year {
        #[arg(help = "Publication year; books from this exact year are excluded")]
        year: i32,
    },
    #[command(about = "Set a new price on a book")]
    Update {
        #[arg(help = "Book id (ObjectId hex string)")]
        id: String,
        #[arg(help = "New price")]
        new_price: f64,
    },
    #[command(about = "Delete a book by id")]
    Delete {
        #[arg(help = "Book id (ObjectId hex string)")]
        id: String,
    },
    #[command(name = "in-stock", about = "List in-stock books published after a year")]
    InStock {
        #[arg(help = "Publication year; books from this exact year are excluded")]
        year: i32,
    },
    #[command(about = "List books reduced to title, author and price")]
    Projection,
    #[command(about = "List books sorted by price")]
    Sort {
        #[arg(default_value = "asc", help = "Sort order: asc or desc")]
        order: String,
    },
    #[command(about = "List one page of books")]
    Paginate {
        #[arg(help = "Page number, 1-based; defaults to 1")]
        page: Option<i64>,
        #[arg(help = "Page size; defaults to 5")]
        limit: Option<i64>,
    },
    #[command(name = "average-price", about = "Average book price per genre")]
    AveragePrice,
    #[command(name = "author-most-books", about = "Author with the most books in the catalog")]
    AuthorMostBooks,
    #[command(about = "Book counts grouped by publication decade")]
    Decade,
    #[command(name = "create-index-title", about = "Ensure the index on title exists")]
    CreateIndexTitle,
    #[command(
        name = "create-compound-index",
        about = "Ensure the compound index on author and published_year exists"
    )]
    CreateCompoundIndex,
    #[command(
        name = "explain-performance",
        about = "Explain the sample queries with executionStats"
    )]
    ExplainPerformance,
}

fn to_command(commands: Commands) -> Result<prog_cli::Command, CatalogError> {
    Ok(match commands {
        Commands::Get => prog_cli::Command::Get,
        Commands::Author { author } => prog_cli::Command::Author { author },
        Commands::Genre { genre } => prog_cli::Command::Genre { genre },
        Commands::Year { year } => prog_cli::Command::Year { year },
        Commands::Update { id, new_price } => prog_cli::Command::Update { id, new_price },
        Commands::Delete { id } => prog_cli::Command::Delete { id },
        Commands::InStock { year } => prog_cli::Command::InStock { year },
        Commands::Projection => prog_cli::Command::Projection,
        Commands::Sort { order } => prog_cli::Command::Sort { order: prog_cli::parse_order(&order)? },
        Commands::Paginate { page, limit } => prog_cli::Command::Paginate {
            page: Page::clamped(page.unwrap_or(1), limit.unwrap_or(DEFAULT_PAGE_SIZE)),
        },
        Commands::AveragePrice => prog_cli::Command::AveragePrice,
        Commands::AuthorMostBooks => prog_cli::Command::AuthorMostBooks,
        Commands::Decade => prog_cli::Command::Decade,
        Commands::CreateIndexTitle => prog_cli::Command::CreateIndexTitle,
        Commands::CreateCompoundIndex => prog_cli::Command::CreateCompoundIndex,
        Commands::ExplainPerformance => prog_cli::Command::ExplainPerformance,
    })
}

async fn run(cli: Cli, settings: &Settings) -> Result<(), CatalogError> {
    let cmd = to_command(cli.command)?;
    let store = Bookstore::connect(settings).await?;
    let result = prog_cli::run_with_format(&store, cmd, cli.format.into()).await;
    store.close().await;
    result
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    bookstore::logger::configure_from_env();
    let cfg = load_config(cli.config.clone());
    let settings = Settings {
        uri: cli.uri.clone().or(cfg.uri).unwrap_or_else(|| bookstore::DEFAULT_URI.into()),
        database: cli.db.clone().or(cfg.database).unwrap_or_else(|| bookstore::DEFAULT_DATABASE.into()),
        collection: cli
            .collection
            .clone()
            .or(cfg.collection)
            .unwrap_or_else(|| bookstore::DEFAULT_COLLECTION.into()),
    };
    let r = run(cli, &settings).await;
    if let Err(e) = r {
        log::error!("command failed: {e}");
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
