//! Beverage Inventory - web page for tracking drink stock
//!
//! Serves the inventory page backed by a Supabase project or a local SQLite file.

use beverage_inventory::config::{AppConfig, Backend, RawConfig};
use beverage_inventory::session::{SessionRegistry, MAX_SESSIONS};
use beverage_inventory::sync::{FetchOutcome, DEFAULT_TABLE};
use beverage_inventory::{
    InventorySession, InventorySynchronizer, RecordStore, SessionHandle, SqliteStore,
    SupabaseStore,
};
use clap::Parser;
use std::path::PathBuf;

/// Beverage inventory tracker - single page over a hosted record store
#[derive(Parser, Debug)]
#[command(name = "beverage_inventory")]
#[command(version, about, long_about = None)]
struct Args {
    /// Supabase project URL (e.g. https://xyz.supabase.co)
    #[arg(long, env = "SUPABASE_URL")]
    supabase_url: Option<String>,

    /// Supabase anon key
    #[arg(long, env = "SUPABASE_ANON_KEY", hide_env_values = true)]
    supabase_key: Option<String>,

    /// Use a local SQLite file instead of Supabase
    #[arg(short, long)]
    database: Option<PathBuf>,

    /// Name of the inventory table
    #[arg(long, default_value = DEFAULT_TABLE)]
    table: String,

    /// Port for the web UI
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// Initial page language (en, nl, es)
    #[arg(short, long, default_value = "en")]
    language: String,
}

impl From<Args> for RawConfig {
    fn from(args: Args) -> Self {
        RawConfig {
            supabase_url: args.supabase_url,
            supabase_anon_key: args.supabase_key,
            database: args.database,
            table: args.table,
            port: args.port,
            language: args.language,
        }
    }
}

#[tokio::main]
async fn main() {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match AppConfig::resolve(Args::parse().into()) {
        Ok(config) => config,
        Err(e) => {
            log::error!("{}", e);
            std::process::exit(1);
        }
    };

    log::info!("Starting beverage_inventory...");

    let result = match &config.backend {
        Backend::Supabase { url, anon_key } => match SupabaseStore::new(url, anon_key.as_str()) {
            Ok(store) => run(store, &config).await,
            Err(e) => Err(e),
        },
        Backend::Sqlite { path } => match open_sqlite(path, &config.table) {
            Ok(store) => run(store, &config).await,
            Err(e) => Err(e),
        },
    };

    if let Err(e) = result {
        log::error!("Fatal error: {}", e);
        std::process::exit(1);
    }
}

fn open_sqlite(path: &std::path::Path, table: &str) -> beverage_inventory::Result<SqliteStore> {
    log::info!("Database path: {}", path.display());

    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
            log::info!("Created directory: {}", parent.display());
        }
    }

    SqliteStore::open(path, table)
}

/// Check the store answers, then serve the page.
///
/// Visitors load their own snapshot on page mount; the startup fetch only
/// reports whether the table is reachable.
async fn run<S: RecordStore + 'static>(
    store: S,
    config: &AppConfig,
) -> beverage_inventory::Result<()> {
    let sync = InventorySynchronizer::new(store, config.table.as_str())?;
    let startup = SessionHandle::new(InventorySession::new(config.language));

    match sync.fetch_inventory(&startup).await {
        FetchOutcome::Refreshed(count) => {
            log::info!("Loaded {} inventory items from '{}'", count, sync.table())
        }
        FetchOutcome::Failed(e) => log::warn!("Initial inventory fetch failed: {}", e),
    }

    let sessions = SessionRegistry::new(config.language, MAX_SESSIONS);
    beverage_inventory::web::serve(sync, sessions, config.port).await
}
