//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::aggregate::{compute_open_positions, compute_trades};
use crate::domain::analytics::compute_analytics;
use crate::domain::error::TradelogError;
use crate::domain::grouper::group;
use crate::domain::meta::portfolio_value;
use crate::domain::query::OrderQuery;

#[derive(Parser, Debug)]
#[command(name = "tradelog", about = "Personal trade journal and analytics")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create the journal database schema
    Init {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Import orders from a CSV file
    Import {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(short, long)]
        file: PathBuf,
    },
    /// List recorded orders
    Orders {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        symbol: Option<String>,
        #[arg(long)]
        side: Option<String>,
        #[arg(long)]
        sort: Option<String>,
        #[arg(long)]
        dir: Option<String>,
    },
    /// Show aggregated trades per symbol
    Trades {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Show open positions and total portfolio value
    Positions {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Show portfolio performance statistics
    Analytics {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Delete all orders, notes and the depot record
    Purge {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Start the web server
    Serve {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Init { config } => run_init(&config),
        Command::Import { config, file } => run_import(&config, &file),
        Command::Orders {
            config,
            symbol,
            side,
            sort,
            dir,
        } => run_orders(
            &config,
            symbol.as_deref(),
            side.as_deref(),
            sort.as_deref(),
            dir.as_deref(),
        ),
        Command::Trades { config } => run_trades(&config),
        Command::Positions { config } => run_positions(&config),
        Command::Analytics { config } => run_analytics(&config),
        Command::Purge { config } => run_purge(&config),
        Command::Serve { config } => run_serve(&config),
    }
}

pub fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        let err = TradelogError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        };
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

#[cfg(feature = "sqlite")]
fn open_journal(
    config_path: &PathBuf,
) -> Result<crate::adapters::sqlite_adapter::SqliteAdapter, ExitCode> {
    use crate::adapters::sqlite_adapter::SqliteAdapter;

    let config = load_config(config_path)?;
    SqliteAdapter::from_config(&config).map_err(|e| {
        eprintln!("error: {e}");
        ExitCode::from(&e)
    })
}

#[cfg(feature = "sqlite")]
fn print_json<T: serde::Serialize>(value: &T) -> ExitCode {
    match serde_json::to_string_pretty(value) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: failed to serialize output: {e}");
            ExitCode::from(1)
        }
    }
}

#[cfg(not(feature = "sqlite"))]
fn sqlite_required(config_path: &PathBuf) -> ExitCode {
    let _ = config_path;
    eprintln!("error: sqlite feature is required");
    ExitCode::from(1)
}

fn run_init(config_path: &PathBuf) -> ExitCode {
    #[cfg(feature = "sqlite")]
    {
        let journal = match open_journal(config_path) {
            Ok(j) => j,
            Err(code) => return code,
        };
        if let Err(e) = journal.initialize_schema() {
            eprintln!("error: {e}");
            return ExitCode::from(&e);
        }
        eprintln!("Journal schema initialized");
        ExitCode::SUCCESS
    }
    #[cfg(not(feature = "sqlite"))]
    sqlite_required(config_path)
}

fn run_import(config_path: &PathBuf, file: &PathBuf) -> ExitCode {
    #[cfg(feature = "sqlite")]
    {
        use crate::adapters::csv_adapter;
        use crate::ports::journal_port::JournalPort;

        let journal = match open_journal(config_path) {
            Ok(j) => j,
            Err(code) => return code,
        };

        eprintln!("Importing orders from {}", file.display());
        let drafts = match csv_adapter::read_orders(file) {
            Ok(d) => d,
            Err(e) => {
                eprintln!("error: {e}");
                return ExitCode::from(&e);
            }
        };

        match journal.insert_orders(&drafts) {
            Ok(count) => {
                eprintln!("Imported {count} orders");
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("error: {e}");
                ExitCode::from(&e)
            }
        }
    }
    #[cfg(not(feature = "sqlite"))]
    {
        let _ = file;
        sqlite_required(config_path)
    }
}

fn run_orders(
    config_path: &PathBuf,
    symbol: Option<&str>,
    side: Option<&str>,
    sort: Option<&str>,
    dir: Option<&str>,
) -> ExitCode {
    #[cfg(feature = "sqlite")]
    {
        use crate::ports::journal_port::JournalPort;

        let query = match OrderQuery::parse(symbol, side, sort, dir) {
            Ok(q) => q,
            Err(e) => {
                eprintln!("error: {e}");
                return ExitCode::from(&e);
            }
        };
        let journal = match open_journal(config_path) {
            Ok(j) => j,
            Err(code) => return code,
        };
        match journal.list_orders() {
            Ok(orders) => print_json(&query.apply(orders)),
            Err(e) => {
                eprintln!("error: {e}");
                ExitCode::from(&e)
            }
        }
    }
    #[cfg(not(feature = "sqlite"))]
    {
        let _ = (symbol, side, sort, dir);
        sqlite_required(config_path)
    }
}

fn run_trades(config_path: &PathBuf) -> ExitCode {
    #[cfg(feature = "sqlite")]
    {
        use crate::ports::journal_port::JournalPort;

        let journal = match open_journal(config_path) {
            Ok(j) => j,
            Err(code) => return code,
        };
        match journal.list_orders() {
            Ok(orders) => print_json(&compute_trades(&group(orders))),
            Err(e) => {
                eprintln!("error: {e}");
                ExitCode::from(&e)
            }
        }
    }
    #[cfg(not(feature = "sqlite"))]
    sqlite_required(config_path)
}

fn run_positions(config_path: &PathBuf) -> ExitCode {
    #[cfg(feature = "sqlite")]
    {
        use crate::ports::journal_port::JournalPort;

        let journal = match open_journal(config_path) {
            Ok(j) => j,
            Err(code) => return code,
        };
        let orders = match journal.list_orders() {
            Ok(o) => o,
            Err(e) => {
                eprintln!("error: {e}");
                return ExitCode::from(&e);
            }
        };
        let depot = match journal.get_depot() {
            Ok(v) => v,
            Err(e) => {
                eprintln!("error: {e}");
                return ExitCode::from(&e);
            }
        };

        let positions = compute_open_positions(&group(orders));
        let total = portfolio_value(depot, &positions);
        let code = print_json(&positions);
        eprintln!("Depot value: {depot:.2}");
        eprintln!("Total portfolio value: {total:.2}");
        code
    }
    #[cfg(not(feature = "sqlite"))]
    sqlite_required(config_path)
}

fn run_analytics(config_path: &PathBuf) -> ExitCode {
    #[cfg(feature = "sqlite")]
    {
        use crate::ports::journal_port::JournalPort;

        let journal = match open_journal(config_path) {
            Ok(j) => j,
            Err(code) => return code,
        };
        match journal.list_orders() {
            Ok(orders) => print_json(&compute_analytics(&group(orders))),
            Err(e) => {
                eprintln!("error: {e}");
                ExitCode::from(&e)
            }
        }
    }
    #[cfg(not(feature = "sqlite"))]
    sqlite_required(config_path)
}

fn run_purge(config_path: &PathBuf) -> ExitCode {
    #[cfg(feature = "sqlite")]
    {
        use crate::ports::journal_port::JournalPort;

        let journal = match open_journal(config_path) {
            Ok(j) => j,
            Err(code) => return code,
        };
        match journal.delete_all() {
            Ok(()) => {
                eprintln!("Journal emptied");
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("error: {e}");
                ExitCode::from(&e)
            }
        }
    }
    #[cfg(not(feature = "sqlite"))]
    sqlite_required(config_path)
}

fn run_serve(config_path: &PathBuf) -> ExitCode {
    #[cfg(feature = "web")]
    {
        use crate::adapters::sqlite_adapter::SqliteAdapter;
        use crate::adapters::web::{build_router, AppState};
        use crate::ports::journal_port::JournalPort;
        use std::net::SocketAddr;
        use std::sync::Arc;

        eprintln!("Loading config from {}", config_path.display());
        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(code) => return code,
        };

        let journal = match SqliteAdapter::from_config(&config) {
            Ok(j) => j,
            Err(e) => {
                eprintln!("error: {e}");
                return ExitCode::from(&e);
            }
        };
        if let Err(e) = journal.initialize_schema() {
            eprintln!("error: {e}");
            return ExitCode::from(&e);
        }

        use crate::ports::config_port::ConfigPort;
        let addr: SocketAddr = config
            .get_string("web", "listen")
            .unwrap_or_else(|| "127.0.0.1:3000".to_string())
            .parse()
            .unwrap_or_else(|_| "127.0.0.1:3000".parse().unwrap());

        eprintln!("Starting web server on {addr}");

        let state = AppState {
            journal: Arc::new(journal) as Arc<dyn JournalPort + Send + Sync>,
        };
        let router = build_router(state);

        tokio::runtime::Runtime::new().unwrap().block_on(async {
            let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
            axum::serve(listener, router).await.unwrap();
        });

        ExitCode::SUCCESS
    }

    #[cfg(not(feature = "web"))]
    {
        let _ = config_path;
        eprintln!("error: web feature is required for serve");
        ExitCode::from(1)
    }
}
