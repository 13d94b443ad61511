// Wed Jan 14 2026 - Alex

pub mod invoker;
pub mod signature;

pub use invoker::{BoundFunction, CodeBinder, InvokeError, RegistryInvoker, TypeLinks};
pub use signature::{DynValue, FuncSignature, ValueShape};
