//! # Receipt Log
//!
//! Receipts from completed checkouts, kept for display.
//!
//! Memory only by default. With `receipt_log_path` configured, each receipt
//! is also appended to that file as one JSON line.

use std::path::PathBuf;

use mango_core::Receipt;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tokio::sync::RwLock;
use tracing::debug;

use crate::error::{BundleError, BundleResult};

#[derive(Debug, Default)]
pub struct ReceiptLog {
    entries: RwLock<Vec<Receipt>>,
    path: Option<PathBuf>,
}

impl ReceiptLog {
    pub fn new(path: Option<PathBuf>) -> Self {
        ReceiptLog {
            entries: RwLock::new(Vec::new()),
            path,
        }
    }

    /// Keeps the receipt in memory and appends it to the log file if one is
    /// configured.
    ///
    /// The in-memory copy is stored first, so a failed file write still
    /// leaves the receipt available for display.
    pub async fn record(&self, receipt: Receipt) -> BundleResult<()> {
        let line = serde_json::to_string(&receipt)?;
        self.entries.write().await.push(receipt);

        if let Some(path) = &self.path {
            let io_err = |source: std::io::Error| BundleError::Io {
                path: path.clone(),
                source,
            };
            let mut file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .await
                .map_err(io_err)?;
            file.write_all(format!("{}\n", line).as_bytes())
                .await
                .map_err(io_err)?;
            file.flush().await.map_err(io_err)?;
            debug!(?path, "Receipt appended to log");
        }

        Ok(())
    }

    /// All receipts recorded this session, oldest first.
    pub async fn all(&self) -> Vec<Receipt> {
        self.entries.read().await.clone()
    }
}
