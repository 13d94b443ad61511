// Tue Jan 15 2026 - Alex

use crate::symbol::dwarf::{AttributeName, AttributeValue, DebugEntry, DwarfError, DwarfTag};
use std::collections::VecDeque;

/// Forward-only stream of debug information entries.
pub trait DebugEntrySource {
    /// `Ok(None)` marks the end of the stream.
    fn next_entry(&mut self) -> Result<Option<DebugEntry>, DwarfError>;
}

/// Entries already materialized in memory.
#[derive(Debug, Clone, Default)]
pub struct EntryList {
    entries: VecDeque<DebugEntry>,
}

impl EntryList {
    pub fn new(entries: Vec<DebugEntry>) -> Self {
        Self {
            entries: entries.into(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.entries.len()
    }
}

impl DebugEntrySource for EntryList {
    fn next_entry(&mut self) -> Result<Option<DebugEntry>, DwarfError> {
        Ok(self.entries.pop_front())
    }
}

/// Walks every unit of a loaded `gimli::Dwarf`, one unit at a time.
pub struct GimliEntrySource<R: gimli::Reader> {
    dwarf: gimli::Dwarf<R>,
    units: gimli::DebugInfoUnitHeadersIter<R>,
    pending: VecDeque<DebugEntry>,
}

impl<R: gimli::Reader> GimliEntrySource<R> {
    pub fn new(dwarf: gimli::Dwarf<R>) -> Self {
        let units = dwarf.units();
        Self {
            dwarf,
            units,
            pending: VecDeque::new(),
        }
    }

    /// Buffers the entries of the next unit. Returns false once all units are consumed.
    fn load_next_unit(&mut self) -> Result<bool, DwarfError> {
        let Some(header) = self.units.next()? else {
            return Ok(false);
        };
        let unit = self.dwarf.unit(header)?;

        let mut entries = unit.entries();
        while let Some((_, entry)) = entries.next_dfs()? {
            let converted = self.convert(&unit, entry)?;
            self.pending.push_back(converted);
        }

        Ok(true)
    }

    fn convert(
        &self,
        unit: &gimli::Unit<R>,
        entry: &gimli::DebuggingInformationEntry<'_, '_, R>,
    ) -> Result<DebugEntry, DwarfError> {
        let mut out = DebugEntry::new(DwarfTag::from_u16(entry.tag().0));

        if let Some(attr) = entry.attr(gimli::DW_AT_name)? {
            // Names in unsupported forms are dropped rather than failing the unit.
            if let Ok(raw) = self.dwarf.attr_string(unit, attr.value()) {
                let name = raw.to_string_lossy()?.into_owned();
                out = out.with_attribute(AttributeName::Name, AttributeValue::String(name));
            }
        }

        if let Some(attr) = entry.attr(gimli::DW_AT_low_pc)? {
            let pc = match attr.value() {
                gimli::AttributeValue::Addr(addr) => Some(AttributeValue::Address(addr)),
                gimli::AttributeValue::DebugAddrIndex(index) => {
                    Some(AttributeValue::Address(self.dwarf.address(unit, index)?))
                }
                gimli::AttributeValue::Udata(data) => Some(AttributeValue::Unsigned(data)),
                _ => None,
            };
            if let Some(pc) = pc {
                out = out.with_attribute(AttributeName::LowPc, pc);
            }
        }

        Ok(out)
    }
}

impl<R: gimli::Reader> DebugEntrySource for GimliEntrySource<R> {
    fn next_entry(&mut self) -> Result<Option<DebugEntry>, DwarfError> {
        loop {
            if let Some(entry) = self.pending.pop_front() {
                return Ok(Some(entry));
            }
            if !self.load_next_unit()? {
                return Ok(None);
            }
        }
    }
}
