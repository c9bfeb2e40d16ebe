//! # Product Catalog
//!
//! The read-only set of purchasable products.
//!
//! ```text
//! catalog.json ──► from_json() ──► validate each record ──► reject dup ids
//!                                                              │
//!                                                              ▼
//!                                                      ProductCatalog
//!                                                   (insertion order kept,
//!                                                    id → index lookup)
//! ```
//!
//! A catalog is built once and never mutated afterwards. Anything that needs
//! fresher stock than the catalog snapshot goes through a
//! [`StockLookup`](crate::checkout::StockLookup) collaborator instead.

use std::collections::HashMap;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::types::Product;
use crate::validation::{validate_product, validate_search_query, ValidationResult};

/// Read-only product catalog.
#[derive(Debug, Clone, Default)]
pub struct ProductCatalog {
    products: Vec<Product>,
    index: HashMap<String, usize>,
}

impl ProductCatalog {
    /// Builds a catalog from records, keeping their order.
    ///
    /// Every record is validated; the first invalid record or duplicate id
    /// aborts construction.
    pub fn new(products: Vec<Product>) -> ValidationResult<Self> {
        let mut index = HashMap::with_capacity(products.len());

        for (position, product) in products.iter().enumerate() {
            validate_product(product)?;
            if index.insert(product.id.clone(), position).is_some() {
                return Err(ValidationError::Duplicate {
                    field: "id".to_string(),
                    value: product.id.clone(),
                });
            }
        }

        Ok(ProductCatalog { products, index })
    }

    /// Parses a JSON array of products and builds the catalog.
    ///
    /// ```rust
    /// use mango_core::catalog::ProductCatalog;
    ///
    /// let catalog = ProductCatalog::from_json(
    ///     r#"[{"id":"A","name":"Alphonso","priceCents":500,"stockQuantity":2}]"#,
    /// ).unwrap();
    /// assert_eq!(catalog.get("A").unwrap().price_cents, 500);
    /// ```
    pub fn from_json(json: &str) -> ValidationResult<Self> {
        let products: Vec<Product> =
            serde_json::from_str(json).map_err(|e| ValidationError::InvalidFormat {
                field: "catalog".to_string(),
                reason: e.to_string(),
            })?;
        Self::new(products)
    }

    /// Iterates all products in insertion order.
    ///
    /// The iterator borrows the catalog and is lazy; calling `list()` again
    /// starts over from the first product.
    pub fn list(&self) -> impl Iterator<Item = &Product> + Clone + '_ {
        self.products.iter()
    }

    /// Looks up a product by id.
    pub fn get(&self, id: &str) -> CoreResult<&Product> {
        self.index
            .get(id)
            .map(|&position| &self.products[position])
            .ok_or_else(|| CoreError::NotFound(id.to_string()))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Case-insensitive substring search on product names.
    ///
    /// An empty (or all-whitespace) query matches every product.
    pub fn search(&self, query: &str) -> CoreResult<Vec<&Product>> {
        let needle = validate_search_query(query)?.to_lowercase();
        Ok(self
            .list()
            .filter(|p| needle.is_empty() || p.name.to_lowercase().contains(&needle))
            .collect())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: &str, name: &str, price_cents: i64, stock: i64) -> Product {
        Product {
            id: id.to_string(),
            name: name.to_string(),
            description: None,
            price_cents,
            stock_quantity: stock,
        }
    }

    fn sample() -> ProductCatalog {
        ProductCatalog::new(vec![
            product("C", "Chaunsa Mango", 350, 5),
            product("A", "Alphonso Mango", 500, 2),
            product("B", "Mango Lassi", 275, 0),
        ])
        .unwrap()
    }

    #[test]
    fn test_list_keeps_insertion_order() {
        let catalog = sample();
        let ids: Vec<&str> = catalog.list().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["C", "A", "B"]);
    }

    #[test]
    fn test_list_is_restartable() {
        let catalog = sample();
        let mut first = catalog.list();
        assert_eq!(first.next().map(|p| p.id.as_str()), Some("C"));

        let again: Vec<&str> = catalog.list().map(|p| p.id.as_str()).collect();
        assert_eq!(again.len(), 3);
        assert_eq!(again[0], "C");
    }

    #[test]
    fn test_get() {
        let catalog = sample();
        assert_eq!(catalog.get("A").unwrap().name, "Alphonso Mango");
        assert_eq!(
            catalog.get("Z").unwrap_err(),
            CoreError::NotFound("Z".to_string())
        );
        assert!(catalog.contains("B"));
        assert!(!catalog.contains("Z"));
        assert_eq!(catalog.len(), 3);
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let result = ProductCatalog::new(vec![
            product("A", "First", 100, 1),
            product("A", "Second", 200, 1),
        ]);
        assert_eq!(
            result.unwrap_err(),
            ValidationError::Duplicate {
                field: "id".to_string(),
                value: "A".to_string(),
            }
        );
    }

    #[test]
    fn test_negative_price_rejected() {
        let result = ProductCatalog::new(vec![product("A", "Bad", -1, 1)]);
        assert!(matches!(result, Err(ValidationError::OutOfRange { .. })));
    }

    #[test]
    fn test_from_json_reports_malformed_input() {
        let result = ProductCatalog::from_json("not json");
        assert!(matches!(result, Err(ValidationError::InvalidFormat { .. })));
    }

    #[test]
    fn test_search() {
        let catalog = sample();
        let hits: Vec<&str> = catalog
            .search("  MANGO ")
            .unwrap()
            .into_iter()
            .map(|p| p.id.as_str())
            .collect();
        assert_eq!(hits, vec!["C", "A", "B"]);

        let hits = catalog.search("lassi").unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "B");

        assert_eq!(catalog.search("").unwrap().len(), 3);
        assert!(catalog.search("durian").unwrap().is_empty());
    }
}
