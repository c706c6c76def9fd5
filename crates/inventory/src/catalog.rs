//! In-memory catalog: the single source of truth for products and warehouses.

use std::collections::HashSet;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use invsight_core::{AggregateRoot, DomainError, DomainResult, Entity, ProductId, WarehouseCode};

use crate::product::Product;
use crate::seed;
use crate::warehouse::Warehouse;

/// Owned product + warehouse collections.
///
/// Products sit behind an `RwLock`: readers take consistent snapshots, and the
/// write guard is only handed out inside this crate (to the mutation engine).
/// Warehouses are immutable after construction.
#[derive(Debug)]
pub struct CatalogStore {
    products: RwLock<Vec<Product>>,
    warehouses: Vec<Warehouse>,
}

impl CatalogStore {
    /// Build a catalog from explicit collections.
    ///
    /// Product ids and warehouse codes must be unique. Products may reference
    /// codes that are not in `warehouses`.
    pub fn new(products: Vec<Product>, warehouses: Vec<Warehouse>) -> DomainResult<Self> {
        let mut seen_codes = HashSet::new();
        for w in &warehouses {
            if !seen_codes.insert(w.id().clone()) {
                return Err(DomainError::invariant(format!(
                    "duplicate warehouse code {}",
                    w.id()
                )));
            }
        }

        let mut seen_ids = HashSet::new();
        for p in &products {
            if !seen_ids.insert(p.id().clone()) {
                return Err(DomainError::invariant(format!(
                    "duplicate product id {}",
                    p.id()
                )));
            }
        }

        tracing::debug!(
            products = products.len(),
            warehouses = warehouses.len(),
            "catalog initialised"
        );

        Ok(Self {
            products: RwLock::new(products),
            warehouses,
        })
    }

    /// Catalog pre-loaded with the demo fixture (12 products, 3 warehouses).
    pub fn seeded() -> Self {
        Self {
            products: RwLock::new(seed::seed_products()),
            warehouses: seed::seed_warehouses(),
        }
    }

    /// Snapshot of all products in insertion order.
    pub fn list_products(&self) -> Vec<Product> {
        self.read().clone()
    }

    /// All warehouses in insertion order.
    pub fn list_warehouses(&self) -> Vec<Warehouse> {
        self.warehouses.clone()
    }

    pub fn find_product(&self, id: &ProductId) -> DomainResult<Product> {
        self.read()
            .iter()
            .find(|p| p.id_typed() == id)
            .cloned()
            .ok_or_else(|| DomainError::not_found(format!("product {id}")))
    }

    pub fn find_warehouse(&self, code: &WarehouseCode) -> Option<&Warehouse> {
        self.warehouses.iter().find(|w| w.id() == code)
    }

    /// Read guard over the live product list.
    ///
    /// Mutations apply events only after validation succeeds, so the data is
    /// consistent even if a previous holder panicked; poisoning is ignored.
    pub(crate) fn read(&self) -> RwLockReadGuard<'_, Vec<Product>> {
        self.products.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Exclusive guard; the only write path into the catalog.
    pub(crate) fn write(&self) -> RwLockWriteGuard<'_, Vec<Product>> {
        self.products.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for CatalogStore {
    fn default() -> Self {
        Self::seeded()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_catalog_has_fixture_shape() {
        let store = CatalogStore::seeded();
        let products = store.list_products();
        let warehouses = store.list_warehouses();

        assert_eq!(products.len(), 12);
        assert_eq!(warehouses.len(), 3);
        assert_eq!(products[0].id_typed(), &ProductId::new("P-1001"));
        assert_eq!(products[11].id_typed(), &ProductId::new("P-1012"));

        // Every product references a known warehouse.
        for p in &products {
            assert!(store.find_warehouse(p.warehouse()).is_some(), "{}", p.id_typed());
        }
    }

    #[test]
    fn find_product_reports_missing_id() {
        let store = CatalogStore::seeded();
        assert_eq!(store.find_product(&ProductId::new("P-1002")).unwrap().stock(), 50);

        let err = store.find_product(&ProductId::new("P-9999")).unwrap_err();
        assert_eq!(err, DomainError::not_found("product P-9999"));
    }

    #[test]
    fn new_rejects_duplicate_product_ids() {
        let products = vec![
            Product::new("P-1", "A", "A-1", "W1", 1, 1),
            Product::new("P-1", "B", "B-1", "W1", 2, 2),
        ];
        let err = CatalogStore::new(products, vec![Warehouse::new("W1", "W", "C", "X")]).unwrap_err();
        assert!(matches!(err, DomainError::InvariantViolation(_)));
    }

    #[test]
    fn new_rejects_duplicate_warehouse_codes() {
        let warehouses = vec![
            Warehouse::new("W1", "One", "C", "X"),
            Warehouse::new("W1", "Again", "C", "X"),
        ];
        assert!(CatalogStore::new(vec![], warehouses).is_err());
    }

    #[test]
    fn stores_are_isolated() {
        let a = CatalogStore::seeded();
        let b = CatalogStore::seeded();
        a.write()[0] = Product::new("P-1001", "Changed", "X", "BLR-A", 1, 1);

        assert_eq!(a.list_products()[0].name(), "Changed");
        assert_eq!(b.list_products()[0].name(), "12mm Hex Bolt");
    }
}
