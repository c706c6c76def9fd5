use axum::{Router, routing::get};

pub mod kpis;
pub mod products;
pub mod system;
pub mod warehouses;

/// Router for all catalog endpoints.
pub fn router() -> Router {
    Router::new()
        .nest("/products", products::router())
        .route("/warehouses", get(warehouses::list_warehouses))
        .route("/kpis", get(kpis::get_kpis))
        .route("/summary", get(kpis::get_summary))
}
