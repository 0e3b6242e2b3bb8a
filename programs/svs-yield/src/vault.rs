use std::collections::BTreeMap;

use anchor_lang::prelude::*;

use crate::{
    error::VaultError,
    interfaces::{LegoBook, PriceOracle, VaultAuthority},
    state::VaultState,
};

/// Everything an operation needs from its surroundings
pub struct VaultContext<'a> {
    /// Account invoking the operation
    pub caller: Pubkey,
    /// Unix timestamp of the operation
    pub now: i64,
    pub legos: &'a mut LegoBook,
    pub approvals: &'a dyn VaultAuthority,
    pub oracle: &'a dyn PriceOracle,
}

/// Share supply and per-holder balances of the vault
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ShareLedger {
    total_supply: u64,
    balances: BTreeMap<Pubkey, u64>,
    /// (owner, spender) -> shares the spender may burn on the owner's behalf
    allowances: BTreeMap<(Pubkey, Pubkey), u64>,
}

impl ShareLedger {
    pub fn total_supply(&self) -> u64 {
        self.total_supply
    }

    pub fn balance_of(&self, holder: &Pubkey) -> u64 {
        self.balances.get(holder).copied().unwrap_or(0)
    }

    pub fn allowance(&self, owner: &Pubkey, spender: &Pubkey) -> u64 {
        self.allowances.get(&(*owner, *spender)).copied().unwrap_or(0)
    }

    pub(crate) fn mint(&mut self, to: &Pubkey, shares: u64) -> Result<()> {
        self.total_supply = self
            .total_supply
            .checked_add(shares)
            .ok_or(VaultError::MathOverflow)?;
        let balance = self.balances.entry(*to).or_insert(0);
        *balance = balance.checked_add(shares).ok_or(VaultError::MathOverflow)?;
        Ok(())
    }

    pub(crate) fn burn(&mut self, from: &Pubkey, shares: u64) -> Result<()> {
        let balance = self.balance_of(from);
        require!(balance >= shares, VaultError::InsufficientShares);

        let remaining = balance - shares;
        if remaining == 0 {
            self.balances.remove(from);
        } else {
            self.balances.insert(*from, remaining);
        }
        self.total_supply = self
            .total_supply
            .checked_sub(shares)
            .ok_or(VaultError::MathOverflow)?;
        Ok(())
    }

    pub(crate) fn approve(&mut self, owner: &Pubkey, spender: &Pubkey, shares: u64) {
        if shares == 0 {
            self.allowances.remove(&(*owner, *spender));
        } else {
            self.allowances.insert((*owner, *spender), shares);
        }
    }

    pub(crate) fn spend_allowance(&mut self, owner: &Pubkey, spender: &Pubkey, shares: u64) -> Result<()> {
        let allowance = self.allowance(owner, spender);
        require!(allowance >= shares, VaultError::InsufficientAllowance);
        // A maximal allowance is never drawn down
        if allowance != u64::MAX {
            self.approve(owner, spender, allowance - shares);
        }
        Ok(())
    }
}

/// ERC-4626 style vault: share accounting on top of the yield ledger
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct YieldVault {
    pub state: VaultState,
    pub shares: ShareLedger,
}

impl YieldVault {
    /// Run `op` as one all-or-nothing operation.
    ///
    /// Vault state, share ledger and every Lego are checkpointed first and
    /// restored if `op` fails.
    pub(crate) fn transact<'a, T>(
        &mut self,
        ctx: &mut VaultContext<'a>,
        op: impl FnOnce(&mut Self, &mut VaultContext<'a>) -> Result<T>,
    ) -> Result<T> {
        require!(!self.state.locked, VaultError::Reentrancy);

        let vault_checkpoint = self.clone();
        let lego_checkpoint = ctx.legos.clone();

        self.state.locked = true;
        match op(self, ctx) {
            Ok(value) => {
                self.state.locked = false;
                Ok(value)
            }
            Err(err) => {
                *self = vault_checkpoint;
                *ctx.legos = lego_checkpoint;
                Err(err)
            }
        }
    }

    pub(crate) fn require_active(&self) -> Result<()> {
        require!(!self.state.paused, VaultError::VaultPaused);
        Ok(())
    }

    pub(crate) fn require_authority(&self, caller: &Pubkey) -> Result<()> {
        require!(*caller == self.state.authority, VaultError::Unauthorized);
        Ok(())
    }
}
