//! Non-volatile storage abstractions
//!
//! Provides a trait for the byte-addressable region that holds the remote's
//! settings block (EEPROM on older boards, emulated EEPROM in flash
//! on newer ones), plus a RAM-backed implementation for host simulation.

/// Value of an erased storage byte
pub const ERASED_BYTE: u8 = 0xFF;

/// Errors from non-volatile storage operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StorageError {
    /// Access extends past the end of the storage region
    OutOfBounds,
    /// Underlying read failed
    Read,
    /// Underlying write failed
    Write,
}

impl core::fmt::Display for StorageError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            StorageError::OutOfBounds => write!(f, "storage access out of bounds"),
            StorageError::Read => write!(f, "storage read failed"),
            StorageError::Write => write!(f, "storage write failed"),
        }
    }
}

/// Byte-addressable non-volatile storage
///
/// Implementations should handle:
/// - Bounds checking against [`capacity`](NvStorage::capacity)
/// - Page/erase management of the underlying medium
///
/// A single `write` call is the unit the caller treats as atomic. Whether
/// the medium survives power loss mid-write is the implementation's concern.
pub trait NvStorage {
    /// Size of the storage region in bytes
    fn capacity(&self) -> usize;

    /// Fill `buffer` with the bytes starting at `offset`
    fn read(&mut self, offset: usize, buffer: &mut [u8]) -> Result<(), StorageError>;

    /// Write `data` starting at `offset`
    fn write(&mut self, offset: usize, data: &[u8]) -> Result<(), StorageError>;
}

impl<T: NvStorage + ?Sized> NvStorage for &mut T {
    fn capacity(&self) -> usize {
        (**self).capacity()
    }

    fn read(&mut self, offset: usize, buffer: &mut [u8]) -> Result<(), StorageError> {
        (**self).read(offset, buffer)
    }

    fn write(&mut self, offset: usize, data: &[u8]) -> Result<(), StorageError> {
        (**self).write(offset, data)
    }
}

/// RAM-backed storage region
///
/// Starts fully erased, like a fresh EEPROM. Counts writes so callers can
/// observe wear-relevant behaviour.
#[derive(Debug, Clone)]
pub struct RamStorage<const N: usize> {
    bytes: [u8; N],
    writes: u32,
}

impl<const N: usize> Default for RamStorage<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> RamStorage<N> {
    /// Create an erased storage region
    pub const fn new() -> Self {
        Self {
            bytes: [ERASED_BYTE; N],
            writes: 0,
        }
    }

    /// Create a region with the given contents
    pub const fn from_bytes(bytes: [u8; N]) -> Self {
        Self { bytes, writes: 0 }
    }

    /// Raw contents
    pub fn as_bytes(&self) -> &[u8; N] {
        &self.bytes
    }

    /// Raw contents, mutable without counting as a write
    ///
    /// Lets a simulation inject bit rot behind the owner's back.
    pub fn as_bytes_mut(&mut self) -> &mut [u8; N] {
        &mut self.bytes
    }

    /// Number of successful writes since creation
    pub fn write_count(&self) -> u32 {
        self.writes
    }

    fn range(offset: usize, len: usize) -> Result<core::ops::Range<usize>, StorageError> {
        let end = offset.checked_add(len).ok_or(StorageError::OutOfBounds)?;
        if end > N {
            return Err(StorageError::OutOfBounds);
        }
        Ok(offset..end)
    }
}

impl<const N: usize> NvStorage for RamStorage<N> {
    fn capacity(&self) -> usize {
        N
    }

    fn read(&mut self, offset: usize, buffer: &mut [u8]) -> Result<(), StorageError> {
        let range = Self::range(offset, buffer.len())?;
        buffer.copy_from_slice(&self.bytes[range]);
        Ok(())
    }

    fn write(&mut self, offset: usize, data: &[u8]) -> Result<(), StorageError> {
        let range = Self::range(offset, data.len())?;
        self.bytes[range].copy_from_slice(data);
        self.writes = self.writes.saturating_add(1);
        Ok(())
    }
}
