//! Service wiring: one catalog shared by the query and mutation engines.

use std::sync::Arc;

use invsight_inventory::{
    CatalogStore, KpiGenerator, MutationEngine, QueryEngine, RandomPerturbation,
};

use crate::config::ApiConfig;

#[derive(Debug, Clone)]
pub struct AppServices {
    queries: QueryEngine,
    mutations: MutationEngine,
}

impl AppServices {
    pub fn new(queries: QueryEngine, mutations: MutationEngine) -> Self {
        Self { queries, mutations }
    }

    pub fn queries(&self) -> &QueryEngine {
        &self.queries
    }

    pub fn mutations(&self) -> &MutationEngine {
        &self.mutations
    }
}

/// Seeded in-memory catalog wired according to `config`.
pub fn build_services(config: &ApiConfig) -> AppServices {
    let store = Arc::new(CatalogStore::seeded());
    build_services_with_store(config, store)
}

pub fn build_services_with_store(config: &ApiConfig, store: Arc<CatalogStore>) -> AppServices {
    let kpis = match config.kpi_seed {
        Some(seed) => KpiGenerator::new(RandomPerturbation::seeded(seed)),
        None => KpiGenerator::random(),
    };

    let queries = QueryEngine::new(store.clone(), Arc::new(kpis));
    let mutations = MutationEngine::new(store).with_policy(config.transfer_policy);
    AppServices::new(queries, mutations)
}
