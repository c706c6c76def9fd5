//! Inventory visibility core.
//!
//! This crate contains the catalog and the business rules over it: product
//! filtering, derived stock status, trend series and the two mutations
//! (demand revision, stock transfer). No IO, no HTTP.

pub mod catalog;
pub mod kpi;
pub mod mutation;
pub mod product;
pub mod query;
pub mod seed;
pub mod status;
pub mod warehouse;

pub use catalog::CatalogStore;
pub use kpi::{KpiGenerator, KpiPoint, KpiRange, NoPerturbation, Perturbation, RandomPerturbation};
pub use mutation::{MutationEngine, TransferPolicy};
pub use product::{
    DemandUpdated, Product, ProductCommand, ProductEvent, StockTransferred, TransferStock,
    UpdateDemand,
};
pub use query::{InventorySummary, ProductFilter, QueryEngine, StatusFilter};
pub use status::{StockStatus, classify};
pub use warehouse::Warehouse;
