//! Validated state transitions: the only writer into the catalog.

use std::sync::Arc;

use chrono::Utc;

use invsight_core::{Aggregate, DomainError, DomainResult, ProductId, WarehouseCode};

use crate::catalog::CatalogStore;
use crate::product::{Product, ProductCommand, TransferStock, UpdateDemand};

/// How to treat a transfer whose `from` differs from the product's warehouse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransferPolicy {
    /// Accept the transfer and log the mismatch; the product record is authoritative.
    #[default]
    Lenient,
    /// Reject the transfer with `InvalidArgument`.
    Strict,
}

/// Applies commands to products held in a [`CatalogStore`].
///
/// Each operation holds the catalog write guard from lookup through apply, so
/// the check-then-write for a product is indivisible and concurrent requests
/// serialise.
#[derive(Debug, Clone)]
pub struct MutationEngine {
    store: Arc<CatalogStore>,
    policy: TransferPolicy,
}

impl MutationEngine {
    pub fn new(store: Arc<CatalogStore>) -> Self {
        Self {
            store,
            policy: TransferPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: TransferPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Overwrite a product's demand. Stock and warehouse are untouched.
    pub fn update_demand(&self, id: &ProductId, demand: i64) -> DomainResult<Product> {
        let command = ProductCommand::UpdateDemand(UpdateDemand {
            product_id: id.clone(),
            demand,
            occurred_at: Utc::now(),
        });
        self.execute(id, &command, |_| Ok(()))
    }

    /// Move `qty` units out of the product's stock and re-home it at `to`.
    pub fn transfer_stock(
        &self,
        id: &ProductId,
        from: &WarehouseCode,
        to: &WarehouseCode,
        qty: i64,
    ) -> DomainResult<Product> {
        let command = ProductCommand::TransferStock(TransferStock {
            product_id: id.clone(),
            from: from.clone(),
            to: to.clone(),
            qty,
            occurred_at: Utc::now(),
        });
        self.execute(id, &command, |product| {
            if self.store.find_warehouse(to).is_none() {
                return Err(DomainError::invalid_argument(format!(
                    "unknown destination warehouse {to}"
                )));
            }
            self.check_source(product, from)
        })
    }

    /// Look up the product, run `precheck` against it, then handle and apply
    /// `command`, all under one write guard.
    fn execute<F>(&self, id: &ProductId, command: &ProductCommand, precheck: F) -> DomainResult<Product>
    where
        F: FnOnce(&Product) -> DomainResult<()>,
    {
        let mut products = self.store.write();

        let product = products
            .iter_mut()
            .find(|p| p.id_typed() == id)
            .ok_or_else(|| DomainError::not_found(format!("product {id}")))?;

        let events = precheck(product).and_then(|()| product.handle(command)).inspect_err(|e| {
            tracing::info!(product_id = %id, error = %e, "mutation rejected");
        })?;

        for event in &events {
            product.apply(event);
            tracing::info!(
                product_id = %id,
                event_type = event.event_type(),
                stock = product.stock(),
                demand = product.demand(),
                warehouse = %product.warehouse(),
                occurred_at = %event.occurred_at(),
                "mutation applied"
            );
        }

        Ok(product.clone())
    }

    fn check_source(&self, product: &Product, from: &WarehouseCode) -> DomainResult<()> {
        if product.warehouse() == from {
            return Ok(());
        }
        match self.policy {
            TransferPolicy::Lenient => {
                tracing::warn!(
                    product_id = %product.id_typed(),
                    claimed = %from,
                    actual = %product.warehouse(),
                    "transfer source does not match product warehouse"
                );
                Ok(())
            }
            TransferPolicy::Strict => Err(DomainError::invalid_argument(format!(
                "product {} is held in {}, not {from}",
                product.id_typed(),
                product.warehouse()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use invsight_core::AggregateRoot;

    fn engine() -> (Arc<CatalogStore>, MutationEngine) {
        let store = Arc::new(CatalogStore::seeded());
        let engine = MutationEngine::new(store.clone());
        (store, engine)
    }

    fn pid(s: &str) -> ProductId {
        ProductId::new(s)
    }

    fn code(s: &str) -> WarehouseCode {
        WarehouseCode::new(s)
    }

    #[test]
    fn update_demand_only_touches_demand() {
        let (store, engine) = engine();
        let before = store.find_product(&pid("P-1003")).unwrap();

        let updated = engine.update_demand(&pid("P-1003"), 10).unwrap();
        assert_eq!(updated.demand(), 10);
        assert_eq!(updated.stock(), before.stock());
        assert_eq!(updated.warehouse(), before.warehouse());
        assert_eq!(updated.version(), 1);
        assert_eq!(store.find_product(&pid("P-1003")).unwrap(), updated);
    }

    #[test]
    fn update_demand_rejects_negative_and_leaves_store_unchanged() {
        let (store, engine) = engine();
        let err = engine.update_demand(&pid("P-1003"), -1).unwrap_err();
        assert!(matches!(err, DomainError::InvalidArgument(_)));
        assert_eq!(store.find_product(&pid("P-1003")).unwrap().demand(), 80);
    }

    #[test]
    fn update_demand_unknown_product() {
        let (_, engine) = engine();
        let err = engine.update_demand(&pid("P-0000"), 5).unwrap_err();
        assert_eq!(err, DomainError::not_found("product P-0000"));
    }

    #[test]
    fn transfer_reduces_stock_and_relocates() {
        let (store, engine) = engine();
        let updated = engine
            .transfer_stock(&pid("P-1001"), &code("BLR-A"), &code("PNQ-C"), 50)
            .unwrap();

        assert_eq!(updated.stock(), 130);
        assert_eq!(updated.warehouse(), &code("PNQ-C"));
        assert_eq!(updated.demand(), 120);
        assert_eq!(store.find_product(&pid("P-1001")).unwrap(), updated);
    }

    #[test]
    fn transfer_beyond_stock_fails_without_side_effects() {
        let (store, engine) = engine();
        let before = store.find_product(&pid("P-1002")).unwrap();

        let err = engine
            .transfer_stock(&pid("P-1002"), &code("BLR-A"), &code("DEL-B"), 999)
            .unwrap_err();
        assert_eq!(err, DomainError::insufficient_stock(999, 50));
        assert_eq!(store.find_product(&pid("P-1002")).unwrap(), before);
    }

    #[test]
    fn transfer_rejects_non_positive_quantity() {
        let (_, engine) = engine();
        for qty in [0, -3] {
            let err = engine
                .transfer_stock(&pid("P-1001"), &code("BLR-A"), &code("DEL-B"), qty)
                .unwrap_err();
            assert!(matches!(err, DomainError::InvalidArgument(_)), "qty={qty}");
        }
    }

    #[test]
    fn transfer_rejects_unknown_destination() {
        let (store, engine) = engine();
        let err = engine
            .transfer_stock(&pid("P-1001"), &code("BLR-A"), &code("NOWHERE"), 1)
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidArgument(_)));
        assert_eq!(store.find_product(&pid("P-1001")).unwrap().stock(), 180);
    }

    #[test]
    fn transfer_unknown_product() {
        let (_, engine) = engine();
        let err = engine
            .transfer_stock(&pid("P-4040"), &code("BLR-A"), &code("DEL-B"), 1)
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[test]
    fn unknown_product_wins_over_unknown_destination() {
        let (_, engine) = engine();
        let err = engine
            .transfer_stock(&pid("P-9999"), &code("BLR-A"), &code("NOWHERE"), 1)
            .unwrap_err();
        assert_eq!(err, DomainError::not_found("product P-9999"));

        let strict = engine.with_policy(TransferPolicy::Strict);
        let err = strict
            .transfer_stock(&pid("P-9999"), &code("DEL-B"), &code("NOWHERE"), 0)
            .unwrap_err();
        assert_eq!(err, DomainError::not_found("product P-9999"));
    }

    #[test]
    fn lenient_policy_ignores_mismatched_source() {
        let (_, engine) = engine();
        let updated = engine
            .transfer_stock(&pid("P-1004"), &code("BLR-A"), &code("PNQ-C"), 4)
            .unwrap();
        assert_eq!(updated.stock(), 20);
        assert_eq!(updated.warehouse(), &code("PNQ-C"));
    }

    #[test]
    fn strict_policy_rejects_mismatched_source() {
        let (store, engine) = engine();
        let engine = engine.with_policy(TransferPolicy::Strict);

        let err = engine
            .transfer_stock(&pid("P-1004"), &code("BLR-A"), &code("PNQ-C"), 4)
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidArgument(_)));
        assert_eq!(store.find_product(&pid("P-1004")).unwrap().stock(), 24);

        let ok = engine
            .transfer_stock(&pid("P-1004"), &code("DEL-B"), &code("PNQ-C"), 4)
            .unwrap();
        assert_eq!(ok.stock(), 20);
    }

    #[test]
    fn concurrent_transfers_never_overdraw() {
        let (store, engine) = engine();

        // P-1002 holds 50 units; 20 threads each try to move 5.
        let handles: Vec<_> = (0..20)
            .map(|_| {
                let engine = engine.clone();
                std::thread::spawn(move || {
                    engine.transfer_stock(&pid("P-1002"), &code("BLR-A"), &code("BLR-A"), 5)
                })
            })
            .collect();

        let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        let succeeded = results.iter().filter(|r| r.is_ok()).count();
        let insufficient = results
            .iter()
            .filter(|r| matches!(r, Err(DomainError::InsufficientStock { .. })))
            .count();

        assert_eq!(succeeded, 10);
        assert_eq!(insufficient, 10);
        assert_eq!(store.find_product(&pid("P-1002")).unwrap().stock(), 0);
    }
}
