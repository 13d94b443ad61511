// Tue Jan 13 2026 - Alex

use serde::{Deserialize, Serialize};

/// Name of the runtime function that hands out the type-linkage table.
pub const DEFAULT_REGISTRY_SYMBOL: &str = "reflect.typelinks";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub registry_symbol: String,
    pub pointer_size: usize,
    pub max_name_depth: usize,
    pub log_failures: bool,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            registry_symbol: DEFAULT_REGISTRY_SYMBOL.to_string(),
            pointer_size: 8,
            max_name_depth: 64,
            log_failures: true,
        }
    }
}

impl CatalogConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_registry_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.registry_symbol = symbol.into();
        self
    }

    pub fn with_max_name_depth(mut self, depth: usize) -> Self {
        self.max_name_depth = depth;
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.registry_symbol.is_empty() {
            return Err("registry_symbol must not be empty".to_string());
        }
        if self.pointer_size != 8 {
            return Err(format!("unsupported pointer_size {}: only 8 is supported", self.pointer_size));
        }
        if self.max_name_depth == 0 {
            return Err("max_name_depth must be greater than 0".to_string());
        }
        Ok(())
    }
}
