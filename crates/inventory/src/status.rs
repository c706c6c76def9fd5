//! Stock health classification.
//!
//! Status is always derived from the current stock/demand pair; it is never
//! stored on a product.

use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// Health category of a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StockStatus {
    Healthy,
    Low,
    Critical,
}

impl StockStatus {
    pub const ALL: [StockStatus; 3] = [StockStatus::Healthy, StockStatus::Low, StockStatus::Critical];

    pub fn as_str(self) -> &'static str {
        match self {
            StockStatus::Healthy => "Healthy",
            StockStatus::Low => "Low",
            StockStatus::Critical => "Critical",
        }
    }
}

impl core::fmt::Display for StockStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string names no known status.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown stock status: {0}")]
pub struct UnknownStatus(pub String);

impl FromStr for StockStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "healthy" => Ok(StockStatus::Healthy),
            "low" => Ok(StockStatus::Low),
            "critical" => Ok(StockStatus::Critical),
            _ => Err(UnknownStatus(s.to_string())),
        }
    }
}

/// Classify a stock/demand pair.
///
/// Comparison order is fixed: more stock than demand is healthy, an exact tie
/// is low, anything else is critical.
pub fn classify(stock: u32, demand: u32) -> StockStatus {
    if stock > demand {
        StockStatus::Healthy
    } else if stock == demand {
        StockStatus::Low
    } else {
        StockStatus::Critical
    }
}
