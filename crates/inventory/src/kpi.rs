//! Synthetic daily stock/demand trend.
//!
//! The catalog has no history, so each point is today's aggregate nudged by an
//! independent perturbation. The perturbation source is injectable; tests pin
//! it with [`RandomPerturbation::seeded`] or [`NoPerturbation`].

use std::sync::{Mutex, PoisonError};

use chrono::{Days, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Half-width of the stock perturbation window: deltas fall in `[-50, 50)`.
pub const STOCK_SPREAD: i64 = 50;
/// Half-width of the demand perturbation window: deltas fall in `[-40, 40)`.
pub const DEMAND_SPREAD: i64 = 40;

/// Length of a trend series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KpiRange {
    Week,
    Fortnight,
    #[default]
    Month,
}

impl KpiRange {
    /// `"7d"` and `"14d"` are recognised; anything else is the 30-day default.
    pub fn parse(s: &str) -> Self {
        match s.trim() {
            "7d" => KpiRange::Week,
            "14d" => KpiRange::Fortnight,
            _ => KpiRange::Month,
        }
    }

    pub fn days(self) -> u64 {
        match self {
            KpiRange::Week => 7,
            KpiRange::Fortnight => 14,
            KpiRange::Month => 30,
        }
    }
}

/// One day of aggregate stock and demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KpiPoint {
    pub date: NaiveDate,
    pub stock: u64,
    pub demand: u64,
}

/// Source of per-day offsets. Stock and demand are drawn independently.
pub trait Perturbation: Send {
    fn stock_delta(&mut self) -> i64;
    fn demand_delta(&mut self) -> i64;
}

/// Uniform perturbation backed by a `rand` generator.
#[derive(Debug, Clone)]
pub struct RandomPerturbation<R = StdRng> {
    rng: R,
}

impl RandomPerturbation<StdRng> {
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Reproducible sequence for a given seed.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl<R: Rng + Send> Perturbation for RandomPerturbation<R> {
    fn stock_delta(&mut self) -> i64 {
        self.rng.gen_range(-STOCK_SPREAD..STOCK_SPREAD)
    }

    fn demand_delta(&mut self) -> i64 {
        self.rng.gen_range(-DEMAND_SPREAD..DEMAND_SPREAD)
    }
}

/// Flat series: every point equals the current totals.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPerturbation;

impl Perturbation for NoPerturbation {
    fn stock_delta(&mut self) -> i64 {
        0
    }

    fn demand_delta(&mut self) -> i64 {
        0
    }
}

/// Builds trend series from aggregate totals.
pub struct KpiGenerator {
    perturbation: Mutex<Box<dyn Perturbation>>,
}

impl core::fmt::Debug for KpiGenerator {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("KpiGenerator").finish_non_exhaustive()
    }
}

impl KpiGenerator {
    pub fn new(perturbation: impl Perturbation + 'static) -> Self {
        Self {
            perturbation: Mutex::new(Box::new(perturbation)),
        }
    }

    /// Production default: entropy-seeded random perturbation.
    pub fn random() -> Self {
        Self::new(RandomPerturbation::from_entropy())
    }

    /// Generate `range.days()` points ending at `today` (inclusive), oldest first.
    pub fn generate(
        &self,
        range: KpiRange,
        today: NaiveDate,
        total_stock: u64,
        total_demand: u64,
    ) -> Vec<KpiPoint> {
        let mut perturbation = self
            .perturbation
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        (0..range.days())
            .rev()
            .filter_map(|offset| today.checked_sub_days(Days::new(offset)))
            .map(|date| KpiPoint {
                date,
                stock: perturb(total_stock, perturbation.stock_delta()),
                demand: perturb(total_demand, perturbation.demand_delta()),
            })
            .collect()
    }
}

impl Default for KpiGenerator {
    fn default() -> Self {
        Self::random()
    }
}

/// Apply `delta` to `base`, floored at zero.
fn perturb(base: u64, delta: i64) -> u64 {
    if delta >= 0 {
        base.saturating_add(delta.unsigned_abs())
    } else {
        base.saturating_sub(delta.unsigned_abs())
    }
}
