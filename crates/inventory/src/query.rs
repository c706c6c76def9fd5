//! Read-only operations over the catalog.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use serde::Serialize;

use invsight_core::{DomainResult, ProductId};

use crate::catalog::CatalogStore;
use crate::kpi::{KpiGenerator, KpiPoint, KpiRange};
use crate::product::Product;
use crate::status::StockStatus;
use crate::warehouse::Warehouse;

/// Sentinel meaning "no restriction" for status and warehouse filters.
pub const ALL: &str = "All";

fn is_unrestricted(s: &str) -> bool {
    s.is_empty() || s.eq_ignore_ascii_case(ALL)
}

/// Status restriction of a product query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(StockStatus),
    /// A status name that matches no category; filters everything out.
    Unrecognized,
}

impl StatusFilter {
    /// Blank and `"All"` (any case) mean no restriction. Never fails.
    pub fn parse(s: &str) -> Self {
        let s = s.trim();
        if is_unrestricted(s) {
            return StatusFilter::All;
        }
        match s.parse::<StockStatus>() {
            Ok(status) => StatusFilter::Only(status),
            Err(_) => StatusFilter::Unrecognized,
        }
    }

    fn admits(self, product: &Product) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(status) => product.status() == status,
            StatusFilter::Unrecognized => false,
        }
    }
}

/// Product query. Criteria combine with logical AND.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductFilter {
    search: Option<String>,
    status: StatusFilter,
    warehouse: Option<String>,
}

impl ProductFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from raw transport arguments.
    pub fn from_parts(search: Option<&str>, status: Option<&str>, warehouse: Option<&str>) -> Self {
        let mut filter = Self::new();
        if let Some(s) = search {
            filter = filter.search(s);
        }
        if let Some(s) = status {
            filter = filter.status(StatusFilter::parse(s));
        }
        if let Some(w) = warehouse {
            filter = filter.warehouse(w);
        }
        filter
    }

    /// Case-insensitive substring over name, SKU and id. Empty is a no-op.
    pub fn search(mut self, needle: &str) -> Self {
        let needle = needle.to_lowercase();
        self.search = (!needle.is_empty()).then_some(needle);
        self
    }

    pub fn status(mut self, status: StatusFilter) -> Self {
        self.status = status;
        self
    }

    /// Exact warehouse code after trimming. Blank and `"All"` (any case) are no-ops.
    pub fn warehouse(mut self, code: &str) -> Self {
        let code = code.trim();
        self.warehouse = (!is_unrestricted(code)).then(|| code.to_string());
        self
    }

    pub fn matches(&self, product: &Product) -> bool {
        if let Some(needle) = &self.search {
            if !product.matches_search(needle) {
                return false;
            }
        }
        if let Some(code) = &self.warehouse {
            if product.warehouse().as_str() != code {
                return false;
            }
        }
        self.status.admits(product)
    }

    /// Keep matching products, preserving order.
    pub fn apply(&self, products: Vec<Product>) -> Vec<Product> {
        products.into_iter().filter(|p| self.matches(p)).collect()
    }
}

/// Aggregate indicators over a product set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct InventorySummary {
    pub products: usize,
    pub total_stock: u64,
    pub total_demand: u64,
    /// `Σ min(stock, demand) / Σ demand` as a whole percentage; 0 without demand.
    pub fill_rate: u32,
    pub healthy: usize,
    pub low: usize,
    pub critical: usize,
}

impl InventorySummary {
    pub fn from_products(products: &[Product]) -> Self {
        let mut summary = InventorySummary {
            products: products.len(),
            total_stock: 0,
            total_demand: 0,
            fill_rate: 0,
            healthy: 0,
            low: 0,
            critical: 0,
        };
        let mut covered: u64 = 0;

        for p in products {
            summary.total_stock += u64::from(p.stock());
            summary.total_demand += u64::from(p.demand());
            covered += u64::from(p.stock().min(p.demand()));
            match p.status() {
                StockStatus::Healthy => summary.healthy += 1,
                StockStatus::Low => summary.low += 1,
                StockStatus::Critical => summary.critical += 1,
            }
        }

        summary.fill_rate = fill_rate_percent(covered, summary.total_demand);
        summary
    }
}

/// Rounded half-up integer percentage of `covered / demand`.
fn fill_rate_percent(covered: u64, demand: u64) -> u32 {
    if demand == 0 {
        return 0;
    }
    let pct = (u128::from(covered) * 200 + u128::from(demand)) / (u128::from(demand) * 2);
    // covered <= demand, so pct <= 100.
    pct as u32
}

/// Query engine over a shared catalog.
#[derive(Debug, Clone)]
pub struct QueryEngine {
    store: Arc<CatalogStore>,
    kpis: Arc<KpiGenerator>,
}

impl QueryEngine {
    pub fn new(store: Arc<CatalogStore>, kpis: Arc<KpiGenerator>) -> Self {
        Self { store, kpis }
    }

    /// Products matching `filter`, in catalog order.
    pub fn products(&self, filter: &ProductFilter) -> Vec<Product> {
        let result = filter.apply(self.store.list_products());
        tracing::debug!(?filter, matched = result.len(), "products query");
        result
    }

    pub fn product(&self, id: &ProductId) -> DomainResult<Product> {
        self.store.find_product(id)
    }

    pub fn warehouses(&self) -> Vec<Warehouse> {
        self.store.list_warehouses()
    }

    /// Trend ending today (UTC).
    pub fn kpis(&self, range: &str) -> Vec<KpiPoint> {
        self.kpis_as_of(range, Utc::now().date_naive())
    }

    pub fn kpis_as_of(&self, range: &str, today: NaiveDate) -> Vec<KpiPoint> {
        let range = KpiRange::parse(range);
        let (stock, demand) = {
            let products = self.store.read();
            products.iter().fold((0u64, 0u64), |(s, d), p| {
                (s + u64::from(p.stock()), d + u64::from(p.demand()))
            })
        };
        tracing::debug!(days = range.days(), stock, demand, "kpi series");
        self.kpis.generate(range, today, stock, demand)
    }

    pub fn summary(&self, filter: &ProductFilter) -> InventorySummary {
        InventorySummary::from_products(&self.products(filter))
    }
}
