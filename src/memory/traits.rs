// Wed Jan 15 2026 - Alex

use crate::memory::{Address, MemoryError};

pub trait MemoryReader: Send + Sync {
    fn read_bytes(&self, addr: Address, len: usize) -> Result<Vec<u8>, MemoryError>;
    fn read_u8(&self, addr: Address) -> Result<u8, MemoryError>;
    fn read_u16(&self, addr: Address) -> Result<u16, MemoryError>;
    fn read_u32(&self, addr: Address) -> Result<u32, MemoryError>;
    fn read_u64(&self, addr: Address) -> Result<u64, MemoryError>;

    fn read_i32(&self, addr: Address) -> Result<i32, MemoryError> {
        Ok(self.read_u32(addr)? as i32)
    }

    fn read_ptr(&self, addr: Address) -> Result<Address, MemoryError> {
        Ok(Address::new(self.read_u64(addr)?))
    }

    /// Reads exactly `len` bytes and decodes them as UTF-8.
    fn read_utf8(&self, addr: Address, len: usize) -> Result<String, MemoryError> {
        let bytes = self.read_bytes(addr, len)?;
        String::from_utf8(bytes)
            .map_err(|e| MemoryError::InvalidData(addr.as_u64(), e.to_string()))
    }
}
