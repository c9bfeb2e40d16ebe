//! # Mango Mart Bundle
//!
//! The storefront as one self-contained artifact: catalog data, cart state
//! and checkout behind a single [`Bundle`](bundle::Bundle).
//!
//! ## Module Organization
//! ```text
//! mango_bundle/
//! ├── lib.rs          ◄─── You are here (tracing setup & host loop)
//! ├── bundle.rs       ◄─── Bundle root: initialize(), catalog/cart/checkout ops
//! ├── dispatch.rs     ◄─── Command / Response, queued dispatcher
//! ├── inventory.rs    ◄─── InventoryService trait + in-memory stock
//! ├── config.rs       ◄─── BundleConfig (TOML + env)
//! ├── state/
//! │   ├── mod.rs      ◄─── State type exports
//! │   ├── cart.rs     ◄─── Shared cart + checkout guard
//! │   └── receipts.rs ◄─── Receipt log
//! └── error.rs        ◄─── BundleError (startup), ApiError (commands)
//! ```
//!
//! ## Host Protocol
//! ```text
//! stdin  (one JSON command per line)     stdout (one JSON reply per line)
//! ──────────────────────────────────     ────────────────────────────────
//! {"type":"listProducts"}            ──► {"ok":{"type":"products","data":[..]}}
//! {"type":"addItem",                 ──► {"ok":{"type":"cart","data":{..}}}
//!  "productId":"MANGO-KENT",
//!  "quantity":2}
//! {"type":"checkout"}                ──► {"ok":{"type":"receipt","data":{..}}}
//! not json                           ──► {"error":{"code":"VALIDATION_ERROR",..}}
//! ```
//!
//! Logs go to stderr so stdout carries replies only.

pub mod bundle;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod inventory;
pub mod state;

use std::path::PathBuf;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use bundle::Bundle;
use config::BundleConfig;
use dispatch::{Command, Reply};
use error::{ApiError, BundleResult, ErrorCode};

/// Serves commands from stdin until it closes.
///
/// ## Startup Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                       Host Startup                                      │
/// │                                                                         │
/// │  1. Initialize Logging ───────────────────────────────────────────────► │
/// │     • tracing-subscriber with env filter, stderr                        │
/// │     • Default: info,mango=debug, override with RUST_LOG                 │
/// │                                                                         │
/// │  2. Load Config ──────────────────────────────────────────────────────► │
/// │     • first argument, else $MANGO_CONFIG, else defaults                 │
/// │                                                                         │
/// │  3. Bundle::initialize ───────────────────────────────────────────────► │
/// │                                                                         │
/// │  4. Spawn Dispatcher & Read stdin ────────────────────────────────────► │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub async fn run() -> BundleResult<()> {
    init_tracing();

    let config_path = std::env::args_os().nth(1).map(PathBuf::from);
    let config = BundleConfig::load(config_path)?;
    let queue_depth = config.dispatch_queue_depth;

    let bundle = Bundle::initialize(config)?;
    let (handle, worker) = dispatch::spawn(bundle, queue_depth);

    info!(store = %bundle.config().store_name, "Mango Mart ready");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let reply = match serde_json::from_str::<Command>(line) {
            Ok(command) => Reply::from(handle.send(command).await),
            Err(err) => Reply::Error(ApiError::new(
                ErrorCode::ValidationError,
                format!("Malformed command: {}", err),
            )),
        };

        let mut out = serde_json::to_vec(&reply)?;
        out.push(b'\n');
        stdout.write_all(&out).await?;
        stdout.flush().await?;
    }

    drop(handle);
    if let Err(err) = worker.await {
        warn!(error = %err, "Dispatcher task ended abnormally");
    }

    info!("stdin closed, shutting down");
    Ok(())
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=mango=trace` - Show trace for mango crates only
/// - Default: INFO, DEBUG for mango crates
pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,mango=debug"));

    // A subscriber may already be installed by an embedding host.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
