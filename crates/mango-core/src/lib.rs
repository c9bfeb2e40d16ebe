//! # mango-core: Pure Business Logic for Mango Mart
//!
//! This crate is the **heart** of the Mango Mart bundle. It contains the
//! catalog, cart and checkout logic with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Mango Mart Architecture                          │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Storefront UI (browser)                      │   │
//! │  │    Product List ──► Cart Panel ──► Checkout ──► Receipt         │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ typed Commands                         │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    mango-bundle (Bundle root)                   │   │
//! │  │    initialize(), Dispatcher, CartState, InventoryService        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ mango-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │  catalog  │  │   cart    │  │ checkout  │  │ validation│  │   │
//! │  │   │  Product  │  │   Cart    │  │  Receipt  │  │   rules   │  │   │
//! │  │   │  lookup   │  │ CartLine  │  │ StockLkp  │  │  checks   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO GLOBAL STATE • NO LOGGING SINKS                  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, CartLine, Receipt)
//! - [`money`] - Money type with integer arithmetic
//! - [`catalog`] - Read-only product catalog
//! - [`cart`] - Cart and its totals
//! - [`checkout`] - Checkout flow and the stock lookup seam
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Example Usage
//!
//! ```rust
//! use mango_core::{checkout, Cart, CoreError, ProductCatalog};
//!
//! let catalog = ProductCatalog::from_json(
//!     r#"[{"id":"A","name":"Alphonso","priceCents":500,"stockQuantity":2}]"#,
//! ).unwrap();
//!
//! let mut cart = Cart::new();
//! cart.add_item(&catalog, "A", 3).unwrap();
//!
//! let err = checkout::checkout(&mut cart, &catalog, &catalog).unwrap_err();
//! assert!(matches!(err, CoreError::OutOfStock { .. }));
//! assert_eq!(cart.quantity_of("A"), 3);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod error;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{Cart, CartTotals};
pub use catalog::ProductCatalog;
pub use checkout::StockLookup;
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum distinct lines allowed in a single cart.
pub const MAX_CART_ITEMS: usize = 100;

/// Maximum quantity of a single line.
///
/// Guards against typos like 1000 instead of 10.
pub const MAX_ITEM_QUANTITY: i64 = 999;
