// Tue Jan 15 2026 - Alex

use crate::error::CatalogError;
use crate::memory::Address;
use crate::symbol::dwarf::DwarfTag;
use crate::symbol::source::DebugEntrySource;

/// Finds the entry address of the runtime's type-registry function.
pub struct RegistryLocator<'a> {
    symbol: &'a str,
}

impl<'a> RegistryLocator<'a> {
    pub fn new(symbol: &'a str) -> Self {
        Self { symbol }
    }

    /// Consumes `source` up to the first subprogram named exactly `symbol`
    /// that carries a usable entry address.
    pub fn locate(&self, source: &mut dyn DebugEntrySource) -> Result<Address, CatalogError> {
        let mut skipped = 0usize;

        while let Some(entry) = source
            .next_entry()
            .map_err(|e| CatalogError::DebugInfo(e.to_string()))?
        {
            if entry.tag != DwarfTag::Subprogram || entry.name() != Some(self.symbol) {
                continue;
            }
            match entry.low_pc() {
                Some(pc) => {
                    log::debug!("located {} at {} ({} candidates without entry address skipped)", self.symbol, pc, skipped);
                    return Ok(pc);
                }
                None => skipped += 1,
            }
        }

        Err(CatalogError::NotFound(format!("unable to find {}", self.symbol)))
    }
}
