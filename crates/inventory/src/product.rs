use chrono::{DateTime, Utc};

use invsight_core::{Aggregate, AggregateRoot, DomainError, ProductId, WarehouseCode};

use crate::status::{StockStatus, classify};

/// Aggregate root: Product.
///
/// A product has exactly one warehouse affiliation at a time. Its health
/// status is not stored; see [`Product::status`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    id: ProductId,
    name: String,
    sku: String,
    warehouse: WarehouseCode,
    stock: u32,
    demand: u32,
    version: u64,
}

impl Product {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        sku: impl Into<String>,
        warehouse: impl Into<String>,
        stock: u32,
        demand: u32,
    ) -> Self {
        Self {
            id: ProductId::new(id),
            name: name.into(),
            sku: sku.into(),
            warehouse: WarehouseCode::new(warehouse),
            stock,
            demand,
            version: 0,
        }
    }

    pub fn id_typed(&self) -> &ProductId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn sku(&self) -> &str {
        &self.sku
    }

    pub fn warehouse(&self) -> &WarehouseCode {
        &self.warehouse
    }

    pub fn stock(&self) -> u32 {
        self.stock
    }

    pub fn demand(&self) -> u32 {
        self.demand
    }

    /// Health category, recomputed from the current stock and demand.
    pub fn status(&self) -> StockStatus {
        classify(self.stock, self.demand)
    }

    /// Case-insensitive substring match against name, SKU or id.
    ///
    /// `needle_lower` must already be lowercased.
    pub(crate) fn matches_search(&self, needle_lower: &str) -> bool {
        self.name.to_lowercase().contains(needle_lower)
            || self.sku.to_lowercase().contains(needle_lower)
            || self.id.as_str().to_lowercase().contains(needle_lower)
    }
}

impl AggregateRoot for Product {
    type Id = ProductId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

/// Command: UpdateDemand.
///
/// `demand` is the raw caller value; it is range-checked in `handle`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateDemand {
    pub product_id: ProductId,
    pub demand: i64,
    pub occurred_at: DateTime<Utc>,
}

/// Command: TransferStock.
///
/// `from` is caller context only; the product record is the authoritative source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferStock {
    pub product_id: ProductId,
    pub from: WarehouseCode,
    pub to: WarehouseCode,
    pub qty: i64,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProductCommand {
    UpdateDemand(UpdateDemand),
    TransferStock(TransferStock),
}

/// Event: DemandUpdated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DemandUpdated {
    pub product_id: ProductId,
    pub previous: u32,
    pub demand: u32,
    pub occurred_at: DateTime<Utc>,
}

/// Event: StockTransferred.
///
/// `from` is the warehouse the product was actually held in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockTransferred {
    pub product_id: ProductId,
    pub from: WarehouseCode,
    pub to: WarehouseCode,
    pub qty: u32,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProductEvent {
    DemandUpdated(DemandUpdated),
    StockTransferred(StockTransferred),
}

impl ProductEvent {
    pub fn event_type(&self) -> &'static str {
        match self {
            ProductEvent::DemandUpdated(_) => "inventory.product.demand_updated",
            ProductEvent::StockTransferred(_) => "inventory.product.stock_transferred",
        }
    }

    pub fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            ProductEvent::DemandUpdated(e) => e.occurred_at,
            ProductEvent::StockTransferred(e) => e.occurred_at,
        }
    }
}

impl Aggregate for Product {
    type Command = ProductCommand;
    type Event = ProductEvent;
    type Error = DomainError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            ProductEvent::DemandUpdated(e) => {
                self.demand = e.demand;
            }
            ProductEvent::StockTransferred(e) => {
                self.stock = self.stock.saturating_sub(e.qty);
                self.warehouse = e.to.clone();
            }
        }

        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            ProductCommand::UpdateDemand(cmd) => self.handle_update_demand(cmd),
            ProductCommand::TransferStock(cmd) => self.handle_transfer(cmd),
        }
    }
}

impl Product {
    fn ensure_product_id(&self, product_id: &ProductId) -> Result<(), DomainError> {
        if &self.id != product_id {
            return Err(DomainError::invariant("product_id mismatch"));
        }
        Ok(())
    }

    fn handle_update_demand(&self, cmd: &UpdateDemand) -> Result<Vec<ProductEvent>, DomainError> {
        self.ensure_product_id(&cmd.product_id)?;

        let demand = u32::try_from(cmd.demand).map_err(|_| {
            DomainError::invalid_argument(format!(
                "demand must be a non-negative integer no larger than {} (got {})",
                u32::MAX,
                cmd.demand
            ))
        })?;

        Ok(vec![ProductEvent::DemandUpdated(DemandUpdated {
            product_id: cmd.product_id.clone(),
            previous: self.demand,
            demand,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_transfer(&self, cmd: &TransferStock) -> Result<Vec<ProductEvent>, DomainError> {
        self.ensure_product_id(&cmd.product_id)?;

        if cmd.qty <= 0 {
            return Err(DomainError::invalid_argument(format!(
                "transfer quantity must be positive (got {})",
                cmd.qty
            )));
        }

        let requested = cmd.qty as u64;
        if requested > u64::from(self.stock) {
            return Err(DomainError::insufficient_stock(requested, u64::from(self.stock)));
        }

        // Bounded by `self.stock` above.
        let qty = cmd.qty as u32;

        Ok(vec![ProductEvent::StockTransferred(StockTransferred {
            product_id: cmd.product_id.clone(),
            from: self.warehouse.clone(),
            to: cmd.to.clone(),
            qty,
            occurred_at: cmd.occurred_at,
        })])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_time() -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000, 0).unwrap()
    }

    fn bolt() -> Product {
        Product::new("P-1001", "12mm Hex Bolt", "HEX-12-100", "BLR-A", 180, 120)
    }

    fn transfer(qty: i64) -> ProductCommand {
        ProductCommand::TransferStock(TransferStock {
            product_id: ProductId::new("P-1001"),
            from: WarehouseCode::new("BLR-A"),
            to: WarehouseCode::new("PNQ-C"),
            qty,
            occurred_at: test_time(),
        })
    }

    #[test]
    fn update_demand_emits_event_with_previous_value() {
        let product = bolt();
        let cmd = ProductCommand::UpdateDemand(UpdateDemand {
            product_id: ProductId::new("P-1001"),
            demand: 200,
            occurred_at: test_time(),
        });

        let events = product.handle(&cmd).unwrap();
        assert_eq!(events.len(), 1);
        match &events[0] {
            ProductEvent::DemandUpdated(e) => {
                assert_eq!(e.previous, 120);
                assert_eq!(e.demand, 200);
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn update_demand_rejects_negative() {
        let product = bolt();
        let cmd = ProductCommand::UpdateDemand(UpdateDemand {
            product_id: ProductId::new("P-1001"),
            demand: -1,
            occurred_at: test_time(),
        });

        let err = product.handle(&cmd).unwrap_err();
        assert!(matches!(err, DomainError::InvalidArgument(_)));
    }

    #[test]
    fn update_demand_rejects_overflow() {
        let product = bolt();
        let cmd = ProductCommand::UpdateDemand(UpdateDemand {
            product_id: ProductId::new("P-1001"),
            demand: i64::from(u32::MAX) + 1,
            occurred_at: test_time(),
        });

        assert!(matches!(product.handle(&cmd), Err(DomainError::InvalidArgument(_))));
    }

    #[test]
    fn transfer_moves_product_and_reduces_stock() {
        let mut product = bolt();
        let events = product.handle(&transfer(50)).unwrap();
        product.apply(&events[0]);

        assert_eq!(product.stock(), 130);
        assert_eq!(product.warehouse(), &WarehouseCode::new("PNQ-C"));
        assert_eq!(product.demand(), 120);
        assert_eq!(product.version(), 1);
    }

    #[test]
    fn transfer_of_entire_stock_is_allowed() {
        let mut product = bolt();
        let events = product.handle(&transfer(180)).unwrap();
        product.apply(&events[0]);
        assert_eq!(product.stock(), 0);
        assert_eq!(product.status(), StockStatus::Critical);
    }

    #[test]
    fn transfer_rejects_non_positive_quantity() {
        let product = bolt();
        assert!(matches!(product.handle(&transfer(0)), Err(DomainError::InvalidArgument(_))));
        assert!(matches!(product.handle(&transfer(-5)), Err(DomainError::InvalidArgument(_))));
    }

    #[test]
    fn transfer_rejects_more_than_stock() {
        let product = bolt();
        let err = product.handle(&transfer(181)).unwrap_err();
        assert_eq!(err, DomainError::insufficient_stock(181, 180));

        let err = product.handle(&transfer(i64::MAX)).unwrap_err();
        assert!(matches!(err, DomainError::InsufficientStock { .. }));
    }

    #[test]
    fn event_records_actual_source_warehouse() {
        let product = bolt();
        let cmd = ProductCommand::TransferStock(TransferStock {
            product_id: ProductId::new("P-1001"),
            from: WarehouseCode::new("DEL-B"),
            to: WarehouseCode::new("PNQ-C"),
            qty: 10,
            occurred_at: test_time(),
        });

        match &product.handle(&cmd).unwrap()[0] {
            ProductEvent::StockTransferred(e) => assert_eq!(e.from, WarehouseCode::new("BLR-A")),
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn handle_rejects_foreign_product_id() {
        let product = bolt();
        let cmd = ProductCommand::UpdateDemand(UpdateDemand {
            product_id: ProductId::new("P-1002"),
            demand: 1,
            occurred_at: test_time(),
        });
        assert!(matches!(product.handle(&cmd), Err(DomainError::InvariantViolation(_))));
    }

    #[test]
    fn search_matches_name_sku_and_id() {
        let product = bolt();
        assert!(product.matches_search("hex bolt"));
        assert!(product.matches_search("hex-12"));
        assert!(product.matches_search("p-1001"));
        assert!(!product.matches_search("washer"));
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: handle never mutates state, whatever the outcome.
            #[test]
            fn handle_does_not_mutate(stock in 0u32..1000, qty in -10i64..1200) {
                let product = Product::new("P-1", "Widget", "W-1", "BLR-A", stock, 10);
                let before = product.clone();
                let _ = product.handle(&ProductCommand::TransferStock(TransferStock {
                    product_id: ProductId::new("P-1"),
                    from: WarehouseCode::new("BLR-A"),
                    to: WarehouseCode::new("DEL-B"),
                    qty,
                    occurred_at: test_time(),
                }));
                prop_assert_eq!(product, before);
            }

            /// Property: an accepted transfer subtracts exactly qty and relocates.
            #[test]
            fn accepted_transfer_subtracts_qty(stock in 1u32..1000, pick in 0.0f64..1.0) {
                let qty = ((f64::from(stock) * pick) as i64).max(1);
                let mut product = Product::new("P-1", "Widget", "W-1", "BLR-A", stock, 10);
                let events = product.handle(&ProductCommand::TransferStock(TransferStock {
                    product_id: ProductId::new("P-1"),
                    from: WarehouseCode::new("BLR-A"),
                    to: WarehouseCode::new("DEL-B"),
                    qty,
                    occurred_at: test_time(),
                })).unwrap();
                for e in &events {
                    product.apply(e);
                }
                prop_assert_eq!(i64::from(product.stock()), i64::from(stock) - qty);
                prop_assert_eq!(product.warehouse().as_str(), "DEL-B");
            }
        }
    }
}
