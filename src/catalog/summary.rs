// Fri Jan 16 2026 - Alex

use crate::error::TypeFailure;
use crate::memory::Address;
use crate::types::Kind;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct TypeSummary {
    pub name: String,
    pub kind: Kind,
    pub size: u64,
    pub address: Option<Address>,
    pub repr: String,
}

/// Serializable snapshot of a built catalog, sorted by name.
#[derive(Debug, Clone, Serialize)]
pub struct CatalogSummary {
    pub type_count: usize,
    pub failure_count: usize,
    pub types: Vec<TypeSummary>,
    pub failures: Vec<TypeFailure>,
}

impl CatalogSummary {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
