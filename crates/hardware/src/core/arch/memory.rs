//! Data memory image.
//!
//! A sparse, byte-addressable store of fixed size. Unwritten addresses read
//! as zero. Writes are buffered and land when the Memory Access stage
//! commits at the end of the cycle, so a read always observes the image as it
//! was at the start of the stage.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::common::error::SimError;

/// One `(address, value)` pair in a memory window.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct MemoryCell {
    /// Byte address.
    pub address: u64,
    /// Committed byte value.
    pub value: u8,
}

/// Sparse memory image with scheduled writes.
#[derive(Clone, Debug)]
pub struct Memory {
    size: usize,
    data: BTreeMap<u64, u8>,
    pending: BTreeMap<u64, u8>,
}

impl Memory {
    /// Creates an all-zero memory of `size` bytes.
    pub const fn new(size: usize) -> Self {
        Self {
            size,
            data: BTreeMap::new(),
            pending: BTreeMap::new(),
        }
    }

    /// Configured size in bytes.
    pub const fn size(&self) -> usize {
        self.size
    }

    /// Validates an effective address.
    ///
    /// # Errors
    ///
    /// [`SimError::AddressFault`] if the address is negative or not below the size.
    pub fn check(&self, address: i64) -> Result<u64, SimError> {
        u64::try_from(address)
            .ok()
            .filter(|&a| a < self.size as u64)
            .ok_or(SimError::AddressFault {
                address,
                size: self.size,
            })
    }

    /// Reads the committed byte at `address`.
    ///
    /// # Errors
    ///
    /// [`SimError::AddressFault`] for out-of-range addresses.
    pub fn read(&self, address: i64) -> Result<u8, SimError> {
        let address = self.check(address)?;
        Ok(self.data.get(&address).copied().unwrap_or(0))
    }

    /// Buffers a byte write until [`Memory::commit`].
    ///
    /// # Errors
    ///
    /// [`SimError::AddressFault`] for out-of-range addresses, or
    /// [`SimError::MemoryWriteConflict`] if the address already has a pending write.
    pub fn schedule_write(&mut self, address: i64, value: u8) -> Result<(), SimError> {
        let address = self.check(address)?;
        if self.pending.contains_key(&address) {
            return Err(SimError::MemoryWriteConflict { address });
        }
        let _ = self.pending.insert(address, value);
        Ok(())
    }

    /// Applies all scheduled writes.
    pub fn commit(&mut self) {
        self.data.append(&mut self.pending);
    }

    /// Stores a byte directly, bypassing scheduling. Used for initial contents.
    ///
    /// # Errors
    ///
    /// [`SimError::AddressFault`] for out-of-range addresses.
    pub fn preset(&mut self, address: u64, value: u8) -> Result<(), SimError> {
        let address = self.check(address as i64)?;
        let _ = self.data.insert(address, value);
        Ok(())
    }

    /// Returns up to `len` consecutive cells starting at `start`, clipped to the image.
    pub fn window(&self, start: u64, len: usize) -> Vec<MemoryCell> {
        let end = start.saturating_add(len as u64).min(self.size as u64);
        (start..end)
            .map(|address| MemoryCell {
                address,
                value: self.data.get(&address).copied().unwrap_or(0),
            })
            .collect()
    }
}
