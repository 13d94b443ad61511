// Tue Jan 13 2026 - Alex

use crate::memory::{Address, MemoryError};
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Errors surfaced by the catalog accessors.
///
/// Build errors are cached, so this type is `Clone` and every later call
/// returns an identical value.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("registry result shape mismatch: {0}")]
    ShapeMismatch(String),
    #[error("debug info error: {0}")]
    DebugInfo(String),
    #[error("registry invocation failed: {0}")]
    Invocation(String),
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl CatalogError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, CatalogError::NotFound(_))
    }
}

/// Failure to decode or name a single runtime type descriptor.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DescriptorError {
    #[error("memory read failed: {0}")]
    Memory(String),
    #[error("unknown kind {kind} at {addr}")]
    UnknownKind { addr: Address, kind: u8 },
    #[error("null {what} reference in descriptor at {addr}")]
    NullReference { addr: Address, what: &'static str },
    #[error("invalid name at {addr}: {reason}")]
    InvalidName { addr: Address, reason: String },
    #[error("type name nesting exceeds {0} levels")]
    NameTooDeep(usize),
    #[error("layout violation at {addr}: {reason}")]
    Layout { addr: Address, reason: String },
}

impl From<MemoryError> for DescriptorError {
    fn from(err: MemoryError) -> Self {
        DescriptorError::Memory(err.to_string())
    }
}

/// Entry of the per-type failure record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeFailure {
    pub name: String,
    pub address: Option<Address>,
    pub repr: String,
    pub reason: String,
}

impl TypeFailure {
    pub fn new(name: impl Into<String>, address: Option<Address>, repr: impl Into<String>, reason: &DescriptorError) -> Self {
        Self {
            name: name.into(),
            address,
            repr: repr.into(),
            reason: reason.to_string(),
        }
    }
}

impl fmt::Display for TypeFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to add type {:?} ({}): {}", self.name, self.repr, self.reason)
    }
}
