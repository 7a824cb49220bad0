//! General-Purpose Register File.
//!
//! This module implements the architectural register file. It performs the following:
//! 1. **Storage:** Maintains `R0`..`R{n-1}` as signed 64-bit integers.
//! 2. **Scheduled Writes:** Buffers at most one write per register per cycle until `commit`.
//! 3. **Bypass:** Serves forwarded values installed by the hazard unit ahead of committed state.
//! 4. **Invariant Enforcement:** Keeps `R0` hardwired to zero when configured as the zero register.

use std::collections::BTreeMap;

use tracing::trace;

use crate::common::error::SimError;
use crate::common::reg::RegId;

/// Architectural register file with end-of-cycle commit.
///
/// A write scheduled during cycle N becomes visible to reads in cycle N+1.
/// Within a cycle, a value installed with [`RegisterFile::forward`] takes
/// precedence over the committed value.
#[derive(Clone, Debug)]
pub struct RegisterFile {
    regs: Vec<i64>,
    pending: BTreeMap<RegId, i64>,
    forwarded: BTreeMap<RegId, i64>,
    zero_register: bool,
}

impl RegisterFile {
    /// Creates a register file with all registers set to zero.
    ///
    /// # Arguments
    ///
    /// * `count` - Number of registers.
    /// * `zero_register` - When `true`, `R0` always reads as 0 and ignores writes.
    pub fn new(count: usize, zero_register: bool) -> Self {
        Self {
            regs: vec![0; count],
            pending: BTreeMap::new(),
            forwarded: BTreeMap::new(),
            zero_register,
        }
    }

    /// Number of registers in the file.
    pub fn len(&self) -> usize {
        self.regs.len()
    }

    /// Returns `true` if the file holds no registers.
    pub fn is_empty(&self) -> bool {
        self.regs.is_empty()
    }

    /// Returns `true` if `id` is the hardwired zero register.
    #[inline]
    pub fn is_zero_register(&self, id: RegId) -> bool {
        self.zero_register && id == RegId::ZERO
    }

    /// Reads a register as seen by an instruction entering Execute.
    ///
    /// # Arguments
    ///
    /// * `id` - Register to read.
    ///
    /// # Returns
    ///
    /// The forwarded value for this cycle if one is installed, otherwise the
    /// committed value. The zero register always reads 0.
    pub fn read(&self, id: RegId) -> i64 {
        if self.is_zero_register(id) {
            return 0;
        }
        self.forwarded
            .get(&id)
            .copied()
            .unwrap_or_else(|| self.committed(id))
    }

    /// Reads the committed value, ignoring any bypass.
    pub fn committed(&self, id: RegId) -> i64 {
        if self.is_zero_register(id) {
            return 0;
        }
        self.regs.get(id.index()).copied().unwrap_or(0)
    }

    /// Installs a bypass value for `id`, visible to [`RegisterFile::read`]
    /// until the end of the current cycle. Ignored for the zero register.
    pub fn forward(&mut self, id: RegId, value: i64) {
        if self.is_zero_register(id) {
            return;
        }
        trace!(%id, value, "bypass installed");
        let _ = self.forwarded.insert(id, value);
    }

    /// Drops all bypass values installed this cycle.
    pub fn clear_forwarding(&mut self) {
        self.forwarded.clear();
    }

    /// Buffers a write to be applied by [`RegisterFile::commit`].
    ///
    /// Writes to the zero register are silently discarded.
    ///
    /// # Errors
    ///
    /// [`SimError::WriteConflict`] if `id` already has a pending write this cycle.
    pub fn schedule_write(&mut self, id: RegId, value: i64) -> Result<(), SimError> {
        if self.is_zero_register(id) {
            trace!("write to zero register discarded");
            return Ok(());
        }
        if self.pending.contains_key(&id) {
            return Err(SimError::WriteConflict { reg: id });
        }
        let _ = self.pending.insert(id, value);
        Ok(())
    }

    /// Returns the value scheduled for `id` this cycle, if any.
    pub fn pending_write(&self, id: RegId) -> Option<i64> {
        self.pending.get(&id).copied()
    }

    /// Applies every scheduled write and clears the bypass network.
    pub fn commit(&mut self) {
        for (id, value) in std::mem::take(&mut self.pending) {
            if let Some(slot) = self.regs.get_mut(id.index()) {
                *slot = value;
            }
        }
        self.forwarded.clear();
    }

    /// Sets a committed value directly. Used to apply configured initial state.
    pub fn preset(&mut self, id: RegId, value: i64) {
        if self.is_zero_register(id) {
            return;
        }
        if let Some(slot) = self.regs.get_mut(id.index()) {
            *slot = value;
        }
    }

    /// All committed register values in index order.
    pub fn values(&self) -> Vec<i64> {
        (0..self.regs.len())
            .map(|i| self.committed(RegId(i as u8)))
            .collect()
    }
}
