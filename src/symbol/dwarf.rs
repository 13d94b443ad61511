// Tue Jan 15 2026 - Alex

use crate::memory::Address;
use std::fmt;
use thiserror::Error;

/// One debug information entry, reduced to the attributes the catalog reads.
#[derive(Debug, Clone, PartialEq)]
pub struct DebugEntry {
    pub tag: DwarfTag,
    pub attributes: Vec<(AttributeName, AttributeValue)>,
}

impl DebugEntry {
    pub fn new(tag: DwarfTag) -> Self {
        Self {
            tag,
            attributes: Vec::new(),
        }
    }

    /// Shorthand for a subprogram with a name and an optional entry address.
    pub fn subprogram(name: impl Into<String>, low_pc: Option<u64>) -> Self {
        let mut entry = Self::new(DwarfTag::Subprogram).with_attribute(AttributeName::Name, AttributeValue::String(name.into()));
        if let Some(pc) = low_pc {
            entry = entry.with_attribute(AttributeName::LowPc, AttributeValue::Address(pc));
        }
        entry
    }

    pub fn with_attribute(mut self, name: AttributeName, value: AttributeValue) -> Self {
        self.attributes.push((name, value));
        self
    }

    pub fn attribute(&self, name: AttributeName) -> Option<&AttributeValue> {
        self.attributes
            .iter()
            .find(|(attr, _)| *attr == name)
            .map(|(_, value)| value)
    }

    pub fn name(&self) -> Option<&str> {
        match self.attribute(AttributeName::Name)? {
            AttributeValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Entry address. Some producers encode it as plain data instead of an address form.
    pub fn low_pc(&self) -> Option<Address> {
        match self.attribute(AttributeName::LowPc)? {
            AttributeValue::Address(a) | AttributeValue::Unsigned(a) => Some(Address::new(*a)),
            _ => None,
        }
    }
}

/// Entry tags the catalog distinguishes; everything else keeps its raw code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DwarfTag {
    CompileUnit,
    Subprogram,
    Variable,
    Unknown(u16),
}

impl DwarfTag {
    pub fn from_u16(value: u16) -> Self {
        match value {
            0x11 => DwarfTag::CompileUnit,
            0x2e => DwarfTag::Subprogram,
            0x34 => DwarfTag::Variable,
            other => DwarfTag::Unknown(other),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeName {
    Name,
    LowPc,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    Address(u64),
    Unsigned(u64),
    String(String),
}

impl fmt::Display for DebugEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} {}", self.tag, self.name().unwrap_or("<unnamed>"))?;
        if let Some(pc) = self.low_pc() {
            write!(f, " @ {}", pc)?;
        }
        Ok(())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DwarfError {
    #[error("debug info read failed: {0}")]
    ReadError(String),
    #[error("malformed debug info: {0}")]
    InvalidFormat(String),
}

impl From<gimli::Error> for DwarfError {
    fn from(err: gimli::Error) -> Self {
        DwarfError::ReadError(err.to_string())
    }
}
