// Tue Jan 15 2026 - Alex

pub mod catalog;
pub mod config;
pub mod error;
pub mod memory;
pub mod registry;
pub mod symbol;
pub mod types;

#[cfg(test)]
mod testing;

pub use catalog::{CatalogSources, CatalogSummary, DebugStruct, DebugType, TypeCatalog};
pub use config::CatalogConfig;
pub use error::{CatalogError, DescriptorError, TypeFailure};
pub use memory::{Address, ImageMemory, MemoryReader};
pub use registry::{BoundFunction, CodeBinder, DynValue, FuncSignature, TypeLinks};
pub use symbol::{DebugEntry, DebugEntrySource, GimliEntrySource};
pub use types::{GoTypeDecoder, Kind, RuntimeType, TypeRef, TypeResolver, TypeShape};
