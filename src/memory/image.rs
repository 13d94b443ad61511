// Tue Jan 13 2026 - Alex

use crate::memory::{Address, MemoryError, MemoryReader};
use memmap2::Mmap;
use std::fs::File;
use std::path::Path;
use std::sync::Arc;

enum ImageBytes {
    Owned(Vec<u8>),
    Mapped(Arc<Mmap>),
}

impl ImageBytes {
    fn as_slice(&self) -> &[u8] {
        match self {
            ImageBytes::Owned(bytes) => bytes,
            ImageBytes::Mapped(mmap) => mmap.as_ref(),
        }
    }
}

/// A flat little-endian memory image placed at `base_address`.
///
/// Either an owned buffer (snapshots, synthetic fixtures) or a memory-mapped
/// dump on disk.
pub struct ImageMemory {
    bytes: ImageBytes,
    base_address: Address,
}

impl ImageMemory {
    pub fn from_bytes(bytes: Vec<u8>, base_address: Address) -> Self {
        Self {
            bytes: ImageBytes::Owned(bytes),
            base_address,
        }
    }

    pub fn map_file<P: AsRef<Path>>(path: P, base_address: Address) -> Result<Self, MemoryError> {
        let file = File::open(path)?;
        // The mapping is read-only and the file is not expected to change underneath us.
        let mmap = unsafe { Mmap::map(&file) }?;
        Ok(Self {
            bytes: ImageBytes::Mapped(Arc::new(mmap)),
            base_address,
        })
    }

    fn slice(&self, addr: Address, len: usize) -> Result<&[u8], MemoryError> {
        let data = self.bytes.as_slice();
        let offset = addr
            .as_u64()
            .checked_sub(self.base_address.as_u64())
            .ok_or(MemoryError::OutOfBounds(addr.as_u64()))? as usize;
        let end = offset
            .checked_add(len)
            .ok_or(MemoryError::OutOfBounds(addr.as_u64()))?;
        data.get(offset..end)
            .ok_or(MemoryError::OutOfBounds(addr.as_u64()))
    }

    fn read_array<const N: usize>(&self, addr: Address) -> Result<[u8; N], MemoryError> {
        let bytes = self.slice(addr, N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(bytes);
        Ok(out)
    }
}

impl MemoryReader for ImageMemory {
    fn read_bytes(&self, addr: Address, len: usize) -> Result<Vec<u8>, MemoryError> {
        Ok(self.slice(addr, len)?.to_vec())
    }

    fn read_u8(&self, addr: Address) -> Result<u8, MemoryError> {
        Ok(self.read_array::<1>(addr)?[0])
    }

    fn read_u16(&self, addr: Address) -> Result<u16, MemoryError> {
        Ok(u16::from_le_bytes(self.read_array(addr)?))
    }

    fn read_u32(&self, addr: Address) -> Result<u32, MemoryError> {
        Ok(u32::from_le_bytes(self.read_array(addr)?))
    }

    fn read_u64(&self, addr: Address) -> Result<u64, MemoryError> {
        Ok(u64::from_le_bytes(self.read_array(addr)?))
    }
}
