use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result};
use receipt_points::application::service::{ReceiptService, ServiceConfig};
use receipt_points::domain::ports::ReceiptStoreBox;
use receipt_points::domain::receipt::{ReceiptDraft, ReceiptId};
use receipt_points::error::ReceiptError;
use receipt_points::infrastructure::in_memory::InMemoryReceiptStore;
use receipt_points::interfaces::json::receipt_reader::ReceiptReader;
use receipt_points::interfaces::json::response::{ErrorResponse, IdResponse, PointsResponse};
use std::fs::File;
use std::io::{self, IsTerminal, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to persistent database (optional). If provided, uses RocksDB.
    #[arg(long, env = "RECEIPTS_DB_PATH", global = true)]
    db_path: Option<PathBuf>,

    /// Milliseconds a storage call may take before it is reported as failed
    #[arg(long, env = "RECEIPTS_STORE_TIMEOUT_MS", default_value_t = 5000, global = true)]
    store_timeout_ms: u64,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Store receipt JSON files and print the id assigned to each
    Process {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Print the points of a stored receipt
    ///
    /// Lookups only find receipts from earlier runs when `--db-path` points at a
    /// RocksDB store (feature `storage-rocksdb`). Without it every run starts
    /// from an empty in-memory store.
    Points {
        id: String,
        /// Also print the contribution of every rule to stderr
        #[arg(long)]
        explain: bool,
    },
    /// Store a receipt and print its points right away
    Score { file: PathBuf },
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .with_target(false);

    // stdout carries responses, so logs always go to stderr
    let _ = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
}

fn open_store(db_path: Option<PathBuf>) -> Result<ReceiptStoreBox> {
    match db_path {
        #[cfg(feature = "storage-rocksdb")]
        Some(path) => {
            use receipt_points::infrastructure::rocksdb::RocksDBStore;
            let store = RocksDBStore::open(&path).into_diagnostic()?;
            tracing::debug!(path = %path.display(), "Opened RocksDB store");
            Ok(Box::new(store))
        }
        #[cfg(not(feature = "storage-rocksdb"))]
        Some(_) => {
            tracing::warn!(
                "Persistent storage requested via --db-path, but 'storage-rocksdb' feature is not enabled. Falling back to In-Memory storage."
            );
            Ok(Box::new(InMemoryReceiptStore::new()))
        }
        None => Ok(Box::new(InMemoryReceiptStore::new())),
    }
}

fn read_draft(path: &Path) -> receipt_points::error::Result<ReceiptDraft> {
    let file = File::open(path).map_err(|e| {
        ReceiptError::validation(format!(
            "cannot open {}: {}",
            path.display(),
            e
        ))
    })?;
    ReceiptReader::new(file).read_draft()
}

fn print_json<T: serde::Serialize>(out: &mut impl Write, value: &T) -> Result<()> {
    let line = serde_json::to_string(value).into_diagnostic()?;
    writeln!(out, "{}", line).into_diagnostic()
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    let config = ServiceConfig {
        store_timeout: Duration::from_millis(cli.store_timeout_ms),
    };
    let ephemeral = cli.db_path.is_none();
    let service = ReceiptService::with_config(open_store(cli.db_path)?, config);

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Command::Process { files } => {
            for path in files {
                let result = match read_draft(&path) {
                    Ok(draft) => service.create_receipt(draft).await,
                    Err(e) => Err(e),
                };
                match result {
                    Ok(id) => print_json(&mut out, &IdResponse::from(id))?,
                    Err(e) => {
                        let body = serde_json::to_string(&ErrorResponse::from(&e)).into_diagnostic()?;
                        eprintln!("Error processing receipt {}: {}", path.display(), body);
                    }
                }
            }
        }
        Command::Points { id, explain } => {
            if ephemeral {
                tracing::warn!(
                    "No --db-path given. Looking up in an empty in-memory store, so receipts from earlier runs cannot be found."
                );
            }
            let id: ReceiptId = id.parse().into_diagnostic()?;
            if explain {
                let breakdown = service.explain_points(id).await.into_diagnostic()?;
                for contribution in &breakdown.rules {
                    eprintln!("{:<24} {:>6}", contribution.rule, contribution.points);
                }
                print_json(&mut out, &PointsResponse::from(breakdown.total))?;
            } else {
                let points = service.get_points(id).await.into_diagnostic()?;
                print_json(&mut out, &PointsResponse::from(points))?;
            }
        }
        Command::Score { file } => {
            let draft = read_draft(&file).into_diagnostic()?;
            let (id, points) = service.score_receipt(draft).await.into_diagnostic()?;
            tracing::info!(receipt_id = %id, points, "Scored receipt");
            print_json(&mut out, &PointsResponse::from(points))?;
        }
    }

    Ok(())
}
