use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::io::BufReader;
use tokio::sync::mpsc;

use tabspaces::config::StorageBackend;
use tabspaces::{util, Bridge, Config, Database, HostMirror, KeyValueStore, MemoryKvStore};
use tabspaces::{SqliteKvStore, SyncController};

/// Workspace engine speaking JSON lines over stdin/stdout
#[derive(Debug, Parser)]
#[command(name = "tabspaces", version, about)]
struct Args {
    /// Data directory (default: ~/.tabspaces)
    #[arg(long, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// Keep workspaces in memory only, regardless of config
    #[arg(long)]
    memory: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    util::init_data_dir(args.data_dir);

    let mut config = Config::load();
    if args.memory {
        config = config.with_storage_backend(StorageBackend::Memory);
    }

    // Initialize logging to file (<data_dir>/logs/tabspaces.log); stdout is the bridge.
    fs::create_dir_all(util::logs_dir())?;

    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(util::log_file_path())?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level)),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .init();

    let kv: Arc<dyn KeyValueStore> = match config.storage_backend {
        StorageBackend::Sqlite => {
            let path = config
                .database_path
                .clone()
                .unwrap_or_else(util::database_path);
            let db = Database::open(path.clone())
                .with_context(|| format!("Failed to open database at {}", path.display()))?;
            Arc::new(SqliteKvStore::new(db.connection()))
        }
        StorageBackend::Memory => Arc::new(MemoryKvStore::new()),
    };
    tracing::info!(backend = ?config.storage_backend, "Starting tabspaces bridge");

    let (command_tx, command_rx) = mpsc::unbounded_channel();
    let host = HostMirror::new().with_forwarding(command_tx);
    let controller = Arc::new(SyncController::new(
        kv,
        Arc::new(host.clone()),
        config.sync_settings(),
    ));

    Bridge::new(controller, host)
        .run(
            BufReader::new(tokio::io::stdin()),
            tokio::io::stdout(),
            command_rx,
        )
        .await?;

    tracing::info!("Input closed, shutting down");
    Ok(())
}
