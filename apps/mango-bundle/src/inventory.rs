//! Inventory service trait and in-memory implementation.
//!
//! Checkout asks the inventory for current stock instead of trusting the
//! catalog snapshot. The bundle ships [`InMemoryInventory`], seeded from the
//! catalog and decremented as sales complete; anything backed by a real
//! stock system implements [`InventoryService`] and is handed to
//! [`Bundle::with_inventory`](crate::bundle::Bundle::with_inventory).

use std::collections::HashMap;

use async_trait::async_trait;
use mango_core::{ProductCatalog, Receipt};
use tokio::sync::RwLock;
use tracing::debug;

use crate::error::{ApiError, ApiResult};

/// Source of live stock levels.
#[async_trait]
pub trait InventoryService: Send + Sync {
    /// Current stock for each requested product.
    ///
    /// Products the service has no record of may be left out of the map;
    /// checkout treats them as zero available.
    async fn stock_levels(&self, product_ids: &[String]) -> ApiResult<HashMap<String, i64>>;

    /// Called once per completed checkout, while the cart is still held.
    async fn record_sale(&self, _receipt: &Receipt) {}
}

#[derive(Debug, Default)]
struct InMemoryInventoryState {
    levels: HashMap<String, i64>,
    fail_lookups: bool,
}

/// Stock held in memory for the lifetime of the bundle.
#[derive(Debug, Default)]
pub struct InMemoryInventory {
    state: RwLock<InMemoryInventoryState>,
}

impl InMemoryInventory {
    pub fn new(levels: HashMap<String, i64>) -> Self {
        InMemoryInventory {
            state: RwLock::new(InMemoryInventoryState {
                levels,
                fail_lookups: false,
            }),
        }
    }

    /// Seeds levels from each product's `stock_quantity`.
    pub fn from_catalog(catalog: &ProductCatalog) -> Self {
        Self::new(
            catalog
                .list()
                .map(|p| (p.id.clone(), p.stock_quantity))
                .collect(),
        )
    }

    /// Makes every lookup fail until switched back off.
    pub async fn set_fail_lookups(&self, fail: bool) {
        self.state.write().await.fail_lookups = fail;
    }
}

#[async_trait]
impl InventoryService for InMemoryInventory {
    async fn stock_levels(&self, product_ids: &[String]) -> ApiResult<HashMap<String, i64>> {
        let state = self.state.read().await;

        if state.fail_lookups {
            return Err(ApiError::inventory("Inventory lookup failed"));
        }

        Ok(product_ids
            .iter()
            .filter_map(|id| state.levels.get(id).map(|&level| (id.clone(), level)))
            .collect())
    }

    async fn record_sale(&self, receipt: &Receipt) {
        let mut state = self.state.write().await;
        for line in receipt.lines() {
            if let Some(level) = state.levels.get_mut(&line.product().id) {
                *level -= line.quantity();
                debug!(product_id = %line.product().id, remaining = *level, "Stock decremented");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mango_core::{checkout, Cart};

    fn catalog() -> ProductCatalog {
        ProductCatalog::from_json(
            r#"[
                {"id":"A","name":"Alphonso","priceCents":500,"stockQuantity":2},
                {"id":"B","name":"Kent","priceCents":300,"stockQuantity":7}
            ]"#,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_seeded_from_catalog() {
        let inventory = InMemoryInventory::from_catalog(&catalog());

        let levels = inventory
            .stock_levels(&["A".to_string(), "B".to_string(), "Z".to_string()])
            .await
            .unwrap();

        assert_eq!(levels.get("A"), Some(&2));
        assert_eq!(levels.get("B"), Some(&7));
        assert!(!levels.contains_key("Z"));
    }

    #[tokio::test]
    async fn test_record_sale_decrements() {
        let catalog = catalog();
        let inventory = InMemoryInventory::from_catalog(&catalog);
        let mut cart = Cart::new();
        cart.add_item(&catalog, "B", 3).unwrap();
        let receipt = checkout::checkout(&mut cart, &catalog, &catalog).unwrap();

        inventory.record_sale(&receipt).await;

        let levels = inventory
            .stock_levels(&["A".to_string(), "B".to_string()])
            .await
            .unwrap();
        assert_eq!(levels.get("B"), Some(&4));
        assert_eq!(levels.get("A"), Some(&2));
    }

    #[tokio::test]
    async fn test_fail_lookups() {
        let inventory = InMemoryInventory::from_catalog(&catalog());
        inventory.set_fail_lookups(true).await;

        let err = inventory.stock_levels(&["A".to_string()]).await.unwrap_err();
        assert_eq!(err.code, crate::error::ErrorCode::InventoryUnavailable);

        inventory.set_fail_lookups(false).await;
        assert!(inventory.stock_levels(&["A".to_string()]).await.is_ok());
    }
}
