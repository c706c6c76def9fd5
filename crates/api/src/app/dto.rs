use serde::Deserialize;

use invsight_inventory::{KpiPoint, Product, ProductFilter, Warehouse};

// -------------------------
// Request DTOs
// -------------------------

/// Query string of `GET /products` and `GET /summary`.
#[derive(Debug, Default, Deserialize)]
pub struct ProductQuery {
    pub search: Option<String>,
    pub status: Option<String>,
    pub warehouse: Option<String>,
}

impl ProductQuery {
    pub fn to_filter(&self) -> ProductFilter {
        ProductFilter::from_parts(
            self.search.as_deref(),
            self.status.as_deref(),
            self.warehouse.as_deref(),
        )
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct KpiQuery {
    pub range: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateDemandRequest {
    pub demand: i64,
}

#[derive(Debug, Deserialize)]
pub struct TransferStockRequest {
    pub from: String,
    pub to: String,
    pub qty: i64,
}

// -------------------------
// JSON mapping helpers
// -------------------------

pub fn product_to_json(p: &Product) -> serde_json::Value {
    serde_json::json!({
        "id": p.id_typed().as_str(),
        "name": p.name(),
        "sku": p.sku(),
        "warehouse": p.warehouse().as_str(),
        "stock": p.stock(),
        "demand": p.demand(),
        "status": p.status().as_str(),
    })
}

pub fn warehouse_to_json(w: &Warehouse) -> serde_json::Value {
    serde_json::json!({
        "code": w.code.as_str(),
        "name": w.name,
        "city": w.city,
        "country": w.country,
    })
}

pub fn kpi_to_json(k: &KpiPoint) -> serde_json::Value {
    serde_json::json!({
        "date": k.date.format("%Y-%m-%d").to_string(),
        "stock": k.stock,
        "demand": k.demand,
    })
}
