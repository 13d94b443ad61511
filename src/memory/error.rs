// Tue Jan 13 2026 - Alex

use thiserror::Error;

#[derive(Error, Debug)]
pub enum MemoryError {
    #[error("image I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("address 0x{0:x} is outside the image")]
    OutOfBounds(u64),
    #[error("invalid data at 0x{0:x}: {1}")]
    InvalidData(u64, String),
}
