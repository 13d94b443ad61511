// Wed Jan 14 2026 - Alex

use crate::error::CatalogError;
use crate::memory::Address;
use crate::registry::signature::{DynValue, FuncSignature};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvokeError {
    #[error("binding not supported: {0}")]
    Unsupported(String),
    #[error("call failed: {0}")]
    CallFailed(String),
}

/// A raw code address bound to a signature, ready to call.
pub trait BoundFunction {
    fn call(&self, args: &[DynValue]) -> Result<Vec<DynValue>, InvokeError>;
}

/// Host-specific bridge from (address, signature) to a callable.
///
/// Implementations must return `Unsupported` instead of binding when they
/// cannot vouch for the calling convention at `entry`.
pub trait CodeBinder {
    fn bind<'a>(&'a self, entry: Address, signature: &FuncSignature) -> Result<Box<dyn BoundFunction + 'a>, InvokeError>;
}

/// Validated output of the registry call: one base address per types
/// section and, per section, the offsets of every type descriptor in it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeLinks {
    pub sections: Vec<Address>,
    pub offsets: Vec<Vec<u32>>,
}

impl TypeLinks {
    pub fn descriptor_count(&self) -> usize {
        self.offsets.iter().map(Vec::len).sum()
    }

    /// `(section base, descriptor address)` for every registered descriptor, in registry order.
    pub fn descriptor_addresses(&self) -> impl Iterator<Item = (Address, Address)> + '_ {
        self.sections
            .iter()
            .zip(&self.offsets)
            .flat_map(|(base, offs)| offs.iter().map(move |off| (*base, *base + u64::from(*off))))
    }
}

pub struct RegistryInvoker<'a> {
    binder: &'a dyn CodeBinder,
}

impl<'a> RegistryInvoker<'a> {
    pub fn new(binder: &'a dyn CodeBinder) -> Self {
        Self { binder }
    }

    pub fn invoke(&self, entry: Address) -> Result<TypeLinks, CatalogError> {
        if entry.is_null() {
            return Err(CatalogError::NotFound("registry entry address is null".to_string()));
        }

        let signature = FuncSignature::typelinks();
        let function = self
            .binder
            .bind(entry, &signature)
            .map_err(|e| CatalogError::Invocation(format!("{} at {}: {}", signature, entry, e)))?;
        let out = function
            .call(&[])
            .map_err(|e| CatalogError::Invocation(e.to_string()))?;

        Self::validate(&signature, out)
    }

    fn validate(signature: &FuncSignature, out: Vec<DynValue>) -> Result<TypeLinks, CatalogError> {
        if out.len() != signature.results.len() {
            return Err(CatalogError::ShapeMismatch(format!("wrong number of output results: {}", out.len())));
        }
        for (value, expected) in out.iter().zip(&signature.results) {
            if !value.conforms_to(expected) {
                return Err(CatalogError::ShapeMismatch(format!("wrong type of result: {} (expected {})", value.shape(), expected)));
            }
        }

        let mut results = out.into_iter();
        let (Some(sections), Some(offsets)) = (results.next(), results.next()) else {
            return Err(CatalogError::ShapeMismatch("missing results".to_string()));
        };

        // Shapes are verified above, so these extractions cannot miss.
        let sections: Vec<Address> = sections
            .items()
            .unwrap_or_default()
            .iter()
            .filter_map(DynValue::as_pointer)
            .collect();
        let offsets: Vec<Vec<u32>> = offsets
            .items()
            .unwrap_or_default()
            .iter()
            .map(|inner| inner.items().unwrap_or_default().iter().filter_map(DynValue::as_u32).collect())
            .collect();

        if sections.len() != offsets.len() {
            return Err(CatalogError::ShapeMismatch(format!(
                "{} sections but {} offset tables",
                sections.len(),
                offsets.len()
            )));
        }

        Ok(TypeLinks { sections, offsets })
    }
}
