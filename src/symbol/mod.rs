// Tue Jan 13 2026 - Alex

pub mod dwarf;
pub mod locator;
pub mod source;

pub use dwarf::{AttributeName, AttributeValue, DebugEntry, DwarfError, DwarfTag};
pub use locator::RegistryLocator;
pub use source::{DebugEntrySource, EntryList, GimliEntrySource};
