use std::collections::BTreeMap;
use std::sync::Arc;

use super::normalizers::{LoscaCityPlanningAdapter, LoscaHealthCommissionAdapter, SourceAdapter};
use crate::error::{Result, ScraperError};

/// Registry of source adapters keyed by spider name
pub struct SpiderRegistry {
    adapters: BTreeMap<&'static str, Arc<dyn SourceAdapter>>,
}

impl SpiderRegistry {
    /// Create a registry with every built-in spider
    pub fn new() -> Self {
        let mut registry = Self {
            adapters: BTreeMap::new(),
        };
        registry.register(Arc::new(LoscaCityPlanningAdapter::new()));
        registry.register(Arc::new(LoscaHealthCommissionAdapter::new()));
        registry
    }

    /// Register an adapter under its spider name, replacing any previous one
    pub fn register(&mut self, adapter: Arc<dyn SourceAdapter>) {
        self.adapters.insert(adapter.spider_name(), adapter);
    }

    pub fn get(&self, spider: &str) -> Result<Arc<dyn SourceAdapter>> {
        self.adapters
            .get(spider)
            .cloned()
            .ok_or_else(|| ScraperError::UnknownSpider(spider.to_string()))
    }

    /// Spider names in alphabetical order
    pub fn list_spiders(&self) -> Vec<&'static str> {
        self.adapters.keys().copied().collect()
    }
}

impl Default for SpiderRegistry {
    fn default() -> Self {
        Self::new()
    }
}
