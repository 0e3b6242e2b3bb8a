use std::collections::HashMap;

use anchor_lang::prelude::*;

use crate::error::VaultError;

/// Active yield positions keyed by vault token.
///
/// Slots are 1-indexed: slot 0 holds `Pubkey::default()` so that an index of
/// zero always means "not registered". Removal swaps the last slot into the
/// vacated one, so slot order carries no meaning.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PositionRegistry {
    slots: Vec<Pubkey>,
    index: HashMap<Pubkey, usize>,
}

impl Default for PositionRegistry {
    fn default() -> Self {
        Self {
            slots: vec![Pubkey::default()],
            index: HashMap::new(),
        }
    }
}

impl PositionRegistry {
    pub fn register(&mut self, id: Pubkey) -> Result<usize> {
        require!(!self.is_registered(&id), VaultError::AlreadyRegistered);
        require!(id != Pubkey::default(), VaultError::InvalidVaultToken);

        let slot = self.slots.len();
        self.slots.push(id);
        self.index.insert(id, slot);
        Ok(slot)
    }

    pub fn deregister(&mut self, id: &Pubkey) -> Result<()> {
        let slot = self.index.remove(id).ok_or(VaultError::NotRegistered)?;

        let last = self.slots.len() - 1;
        if slot != last {
            let moved = self.slots[last];
            self.slots[slot] = moved;
            self.index.insert(moved, slot);
        }
        self.slots.truncate(last);
        Ok(())
    }

    pub fn is_registered(&self, id: &Pubkey) -> bool {
        self.index.contains_key(id)
    }

    /// Slot of `id`, or 0 when not registered
    pub fn slot_of(&self, id: &Pubkey) -> usize {
        self.index.get(id).copied().unwrap_or(0)
    }

    /// Registered positions
    pub fn count(&self) -> usize {
        self.slots.len() - 1
    }

    /// Slot table length including the reserved slot 0
    pub fn num_slots(&self) -> usize {
        self.slots.len()
    }

    /// Registered ids in slot order
    pub fn iter(&self) -> impl Iterator<Item = &Pubkey> + '_ {
        self.slots.iter().skip(1)
    }
}
