//! # Bundle Root
//!
//! Composes catalog, cart, inventory and receipts behind one entry point.
//!
//! ## Startup Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Bundle::initialize(config)                        │
//! │                                                                         │
//! │  already initialized? ── yes ──► return existing &'static Bundle        │
//! │        │ no                                                             │
//! │        ▼                                                                │
//! │  1. Load catalog ─── catalog_path set? read file : embedded JSON        │
//! │  2. Seed InMemoryInventory from catalog stock                           │
//! │  3. Empty CartState                                                     │
//! │  4. ReceiptLog (memory, + JSON lines if receipt_log_path)               │
//! │  5. Store in process-wide OnceLock                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every operation returns [`ApiResult`] so the UI gets a code and a message
//! for anything that goes wrong. Failed operations change nothing.

use std::fs;
use std::sync::{Arc, OnceLock};

use chrono::{DateTime, Utc};
use mango_core::{
    checkout, Cart, CartLine, CartTotals, CoreError, CoreResult, Product, ProductCatalog, Receipt,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use ts_rs::TS;

use crate::config::BundleConfig;
use crate::error::{ApiResult, BundleError, BundleResult};
use crate::inventory::{InMemoryInventory, InventoryService};
use crate::state::{CartState, ReceiptLog};

/// Catalog compiled into the artifact.
const EMBEDDED_CATALOG: &str = include_str!("../data/catalog.json");

static BUNDLE: OnceLock<Bundle> = OnceLock::new();

/// Cart contents plus totals at current prices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartResponse {
    pub lines: Vec<CartLine>,
    pub totals: CartTotals,
    /// When the cart was created or last cleared.
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl CartResponse {
    fn of(cart: &Cart, catalog: &ProductCatalog) -> CoreResult<Self> {
        Ok(CartResponse {
            lines: cart.lines().to_vec(),
            totals: cart.totals(catalog)?,
            created_at: cart.created_at(),
        })
    }
}

/// The storefront: one catalog, one cart, one inventory, one receipt log.
pub struct Bundle {
    config: BundleConfig,
    catalog: Arc<ProductCatalog>,
    cart: CartState,
    inventory: Arc<dyn InventoryService>,
    receipts: ReceiptLog,
}

impl std::fmt::Debug for Bundle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bundle")
            .field("store_name", &self.config.store_name)
            .field("products", &self.catalog.len())
            .finish_non_exhaustive()
    }
}

impl Bundle {
    // =========================================================================
    // Construction
    // =========================================================================

    /// Process-wide initialization.
    ///
    /// The first call builds the bundle; later calls ignore `config` and
    /// return the instance built by the first.
    pub fn initialize(config: BundleConfig) -> BundleResult<&'static Bundle> {
        if let Some(existing) = BUNDLE.get() {
            debug!("Bundle already initialized, reusing existing instance");
            return Ok(existing);
        }

        let bundle = Bundle::new(config)?;
        let bundle = BUNDLE.get_or_init(|| bundle);
        info!(
            store = %bundle.config.store_name,
            products = bundle.catalog.len(),
            "Bundle initialized"
        );
        Ok(bundle)
    }

    /// The process-wide instance, if [`Bundle::initialize`] has run.
    pub fn global() -> Option<&'static Bundle> {
        BUNDLE.get()
    }

    /// Builds an independent bundle with stock seeded from the catalog.
    pub fn new(config: BundleConfig) -> BundleResult<Self> {
        let catalog = Arc::new(load_catalog(&config)?);
        let inventory = Arc::new(InMemoryInventory::from_catalog(&catalog));
        Ok(Self::with_inventory(config, catalog, inventory))
    }

    /// Builds a bundle around an existing catalog and inventory service.
    pub fn with_inventory(
        config: BundleConfig,
        catalog: Arc<ProductCatalog>,
        inventory: Arc<dyn InventoryService>,
    ) -> Self {
        let receipts = ReceiptLog::new(config.receipt_log_path.clone());
        Bundle {
            config,
            catalog,
            cart: CartState::new(),
            inventory,
            receipts,
        }
    }

    pub fn config(&self) -> &BundleConfig {
        &self.config
    }

    // =========================================================================
    // Catalog
    // =========================================================================

    pub fn list_products(&self) -> Vec<Product> {
        self.catalog.list().cloned().collect()
    }

    pub fn get_product(&self, id: &str) -> ApiResult<Product> {
        Ok(self.catalog.get(id)?.clone())
    }

    pub fn search_products(&self, query: &str) -> ApiResult<Vec<Product>> {
        Ok(self
            .catalog
            .search(query)?
            .into_iter()
            .cloned()
            .collect())
    }

    // =========================================================================
    // Cart
    // =========================================================================

    pub async fn add_item(&self, product_id: &str, quantity: i64) -> ApiResult<CartResponse> {
        debug!(product_id = %product_id, quantity, "add_item");
        self.mutate_cart(|cart, catalog| cart.add_item(catalog, product_id, quantity))
            .await
    }

    pub async fn remove_item(&self, product_id: &str) -> ApiResult<CartResponse> {
        debug!(product_id = %product_id, "remove_item");
        self.mutate_cart(|cart, _| {
            cart.remove_item(product_id);
            Ok(())
        })
        .await
    }

    pub async fn set_quantity(&self, product_id: &str, quantity: i64) -> ApiResult<CartResponse> {
        debug!(product_id = %product_id, quantity, "set_quantity");
        self.mutate_cart(|cart, catalog| cart.set_quantity(catalog, product_id, quantity))
            .await
    }

    /// Explicit user reset.
    pub async fn clear_cart(&self) -> ApiResult<CartResponse> {
        debug!("clear_cart");
        self.mutate_cart(|cart, _| {
            cart.clear();
            Ok(())
        })
        .await
    }

    pub async fn cart(&self) -> ApiResult<CartResponse> {
        let catalog: &ProductCatalog = &self.catalog;
        let response = self
            .cart
            .read(|cart| CartResponse::of(cart, catalog))
            .await?;
        Ok(response)
    }

    /// Applies `f` to a copy of the cart and swaps it in only once the copy
    /// has been priced, so a failure anywhere leaves the cart untouched.
    async fn mutate_cart<F>(&self, f: F) -> ApiResult<CartResponse>
    where
        F: FnOnce(&mut Cart, &ProductCatalog) -> CoreResult<()>,
    {
        let catalog: &ProductCatalog = &self.catalog;
        let response = self
            .cart
            .mutate(|cart| {
                let mut staged = cart.clone();
                f(&mut staged, catalog)?;
                let response = CartResponse::of(&staged, catalog)?;
                *cart = staged;
                Ok(response)
            })
            .await?;
        Ok(response)
    }

    // =========================================================================
    // Checkout
    // =========================================================================

    /// Validates the cart against live stock and current prices, then commits.
    ///
    /// The cart stays locked from the stock lookup through the commit. A
    /// second checkout, or any cart mutation, arriving in that window fails
    /// with `CheckoutInProgress`.
    pub async fn checkout(&self) -> ApiResult<Receipt> {
        debug!("checkout");
        let mut cart = self.cart.begin_checkout().await?;

        if cart.is_empty() {
            return Err(CoreError::EmptyCart.into());
        }

        let product_ids: Vec<String> = cart.lines().iter().map(|l| l.product_id.clone()).collect();
        let levels = self.inventory.stock_levels(&product_ids).await?;

        let receipt = checkout::checkout(&mut *cart, &self.catalog, &levels).map_err(|err| {
            warn!(error = %err, "Checkout rejected");
            err
        })?;

        self.inventory.record_sale(&receipt).await;
        drop(cart);

        if let Err(err) = self.receipts.record(receipt.clone()).await {
            warn!(error = %err, receipt = %receipt.receipt_number(), "Receipt not persisted");
        }

        info!(
            receipt = %receipt.receipt_number(),
            total = %self.config.format_currency(receipt.grand_total_cents()),
            lines = receipt.lines().len(),
            "Checkout completed"
        );

        Ok(receipt)
    }

    /// Receipts from this session, oldest first.
    pub async fn receipts(&self) -> Vec<Receipt> {
        self.receipts.all().await
    }
}

/// Reads the catalog named by config, falling back to the embedded data.
pub fn load_catalog(config: &BundleConfig) -> BundleResult<ProductCatalog> {
    match &config.catalog_path {
        Some(path) => {
            info!(?path, "Loading catalog from file");
            let json = fs::read_to_string(path).map_err(|source| BundleError::Io {
                path: path.clone(),
                source,
            })?;
            Ok(ProductCatalog::from_json(&json)?)
        }
        None => Ok(ProductCatalog::from_json(EMBEDDED_CATALOG)?),
    }
}
