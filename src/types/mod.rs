// Wed Jan 14 2026 - Alex

pub mod descriptor;
pub mod golayout;
pub mod naming;
pub mod resolver;

pub use descriptor::{ChanDir, Kind, Method, RuntimeType, StructField, TypeRef, TypeShape};
pub use golayout::{GoLayout, GoTypeDecoder, TFlag};
pub use naming::{TypeNamer, OPAQUE_POINTER_NAME, OPAQUE_POINTER_POINTER_NAME};
pub use resolver::{owning_section, TypeResolver};
