//! # State Module
//!
//! Mutable state owned by the bundle.
//!
//! Each concern gets its own state type instead of one `AppState` blob, so
//! a command locks only what it touches.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌──────────────────┐  ┌──────────────────┐  ┌──────────────────────┐   │
//! │  │  ProductCatalog  │  │    CartState     │  │     ReceiptLog       │   │
//! │  │  (Arc, r/o)      │  │  Mutex<Cart> +   │  │  RwLock<Vec<..>> +   │   │
//! │  │                  │  │  in-flight flag  │  │  optional JSON file  │   │
//! │  └──────────────────┘  └──────────────────┘  └──────────────────────┘   │
//! │                                                                         │
//! │  THREAD SAFETY:                                                        │
//! │  • Catalog: read-only after initialization                             │
//! │  • CartState: one writer; checkout holds the lock across its await     │
//! │  • ReceiptLog: append-only                                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod cart;
mod receipts;

pub use cart::{CartState, CheckoutGuard};
pub use receipts::ReceiptLog;
