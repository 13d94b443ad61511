// Wed Jan 14 2026 - Alex

use crate::error::DescriptorError;
use crate::memory::Address;
use crate::types::descriptor::RuntimeType;

/// Materializes the descriptor stored at an address.
///
/// `sections` are the registry's section bases; offsets stored inside a
/// descriptor are relative to the section that contains it.
pub trait TypeResolver: Send + Sync {
    fn resolve(&self, addr: Address, sections: &[Address]) -> Result<RuntimeType, DescriptorError>;
}

/// Section base owning `addr`: the greatest base not above it.
pub fn owning_section(addr: Address, sections: &[Address]) -> Option<Address> {
    sections.iter().copied().filter(|base| *base <= addr).max()
}
