//! # Command Dispatch
//!
//! Typed commands from the UI and the replies they produce.
//!
//! ## Command Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Dispatcher Flow                                      │
//! │                                                                         │
//! │  UI                                                                     │
//! │  ──                                                                     │
//! │  {"type":"addItem","productId":"MANGO-KENT","quantity":2}               │
//! │         │                                                               │
//! │         │ serde_json::from_str::<Command>                               │
//! │         ▼                                                               │
//! │  DispatcherHandle::send(command)                                        │
//! │         │                                                               │
//! │         │ mpsc (bounded by dispatch_queue_depth)                        │
//! │         ▼                                                               │
//! │  worker task ──► Bundle::dispatch(command) ──► oneshot reply            │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  Reply::Ok(Response::Cart { .. })  or  Reply::Error(ApiError)           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The worker handles one command at a time, in arrival order.

use std::ops::Deref;

use mango_core::{Product, Receipt};
use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, error, info};
use ts_rs::TS;

use crate::bundle::{Bundle, CartResponse};
use crate::error::{ApiError, ApiResult};

// =============================================================================
// Wire Types
// =============================================================================

/// A request from the UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Command {
    AddItem {
        #[serde(rename = "productId")]
        product_id: String,
        quantity: i64,
    },
    RemoveItem {
        #[serde(rename = "productId")]
        product_id: String,
    },
    SetQuantity {
        #[serde(rename = "productId")]
        product_id: String,
        quantity: i64,
    },
    ClearCart,
    GetCart,
    ListProducts,
    GetProduct {
        id: String,
    },
    SearchProducts {
        query: String,
    },
    Checkout,
    ListReceipts,
}

impl Command {
    /// Short name for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Command::AddItem { .. } => "addItem",
            Command::RemoveItem { .. } => "removeItem",
            Command::SetQuantity { .. } => "setQuantity",
            Command::ClearCart => "clearCart",
            Command::GetCart => "getCart",
            Command::ListProducts => "listProducts",
            Command::GetProduct { .. } => "getProduct",
            Command::SearchProducts { .. } => "searchProducts",
            Command::Checkout => "checkout",
            Command::ListReceipts => "listReceipts",
        }
    }
}

/// Successful result of a [`Command`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "type", content = "data", rename_all = "camelCase")]
pub enum Response {
    Products(Vec<Product>),
    Product(Product),
    Cart(CartResponse),
    Receipt(Receipt),
    Receipts(Vec<Receipt>),
}

/// What goes back over the wire: `{"ok": ...}` or `{"error": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub enum Reply {
    Ok(Response),
    Error(ApiError),
}

impl From<ApiResult<Response>> for Reply {
    fn from(result: ApiResult<Response>) -> Self {
        match result {
            Ok(response) => Reply::Ok(response),
            Err(err) => Reply::Error(err),
        }
    }
}

// =============================================================================
// Direct Dispatch
// =============================================================================

impl Bundle {
    /// Runs one command against this bundle.
    pub async fn dispatch(&self, command: Command) -> ApiResult<Response> {
        match command {
            Command::AddItem {
                product_id,
                quantity,
            } => self.add_item(&product_id, quantity).await.map(Response::Cart),
            Command::RemoveItem { product_id } => {
                self.remove_item(&product_id).await.map(Response::Cart)
            }
            Command::SetQuantity {
                product_id,
                quantity,
            } => self
                .set_quantity(&product_id, quantity)
                .await
                .map(Response::Cart),
            Command::ClearCart => self.clear_cart().await.map(Response::Cart),
            Command::GetCart => self.cart().await.map(Response::Cart),
            Command::ListProducts => Ok(Response::Products(self.list_products())),
            Command::GetProduct { id } => self.get_product(&id).map(Response::Product),
            Command::SearchProducts { query } => {
                self.search_products(&query).map(Response::Products)
            }
            Command::Checkout => self.checkout().await.map(Response::Receipt),
            Command::ListReceipts => Ok(Response::Receipts(self.receipts().await)),
        }
    }
}

// =============================================================================
// Queued Dispatch
// =============================================================================

struct Envelope {
    command: Command,
    reply: oneshot::Sender<ApiResult<Response>>,
}

/// Sending side of a running dispatcher. Cheap to clone.
#[derive(Debug, Clone)]
pub struct DispatcherHandle {
    tx: mpsc::Sender<Envelope>,
}

impl DispatcherHandle {
    /// Queues a command and waits for its reply.
    ///
    /// Waits for queue space when the dispatcher is backed up.
    pub async fn send(&self, command: Command) -> ApiResult<Response> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(Envelope { command, reply })
            .await
            .map_err(|_| ApiError::internal("Dispatcher has stopped"))?;
        rx.await
            .map_err(|_| ApiError::internal("Dispatcher dropped the command"))?
    }
}

/// Starts a worker that feeds queued commands to `bundle`.
///
/// Commands still run one at a time, each in its own task, so a command
/// that panics answers `INTERNAL` and the worker moves on to the next one.
/// The worker exits once every [`DispatcherHandle`] is dropped.
pub fn spawn<B>(bundle: B, queue_depth: usize) -> (DispatcherHandle, JoinHandle<()>)
where
    B: Deref<Target = Bundle> + Clone + Send + Sync + 'static,
{
    let (tx, mut rx) = mpsc::channel::<Envelope>(queue_depth.max(1));

    let worker = tokio::spawn(async move {
        debug!(queue_depth, "Dispatcher started");
        while let Some(Envelope { command, reply }) = rx.recv().await {
            let name = command.name();
            let task = tokio::spawn({
                let bundle = bundle.clone();
                async move { bundle.dispatch(command).await }
            });

            let result = match task.await {
                Ok(result) => result,
                Err(err) => {
                    error!(command = name, error = %err, "Command task failed");
                    Err(ApiError::internal(format!("{} failed unexpectedly", name)))
                }
            };
            if let Err(err) = &result {
                debug!(command = name, code = ?err.code, "Command failed");
            }
            if reply.send(result).is_err() {
                debug!(command = name, "Caller went away before the reply");
            }
        }
        info!("Dispatcher stopped");
    });

    (DispatcherHandle { tx }, worker)
}
