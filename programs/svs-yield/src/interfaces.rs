//! Collaborator boundaries: protocol adapters (Legos), the approval
//! authority and the valuation oracle.

use std::collections::{BTreeMap, BTreeSet};

use anchor_lang::prelude::*;

/// What a Lego reports back after taking a deposit
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LegoDeposit {
    /// Underlying actually consumed; any remainder stays with the vault
    pub asset_deposited: u64,
    pub vault_tokens_received: u64,
}

/// Uniform adapter onto one external yield protocol.
///
/// Calls into a Lego are the untrusted boundary of the ledger. A Lego must be
/// cloneable through `clone_box` so an operation can checkpoint it and restore
/// it when the operation fails.
pub trait Lego {
    /// Protocol handle this adapter is registered under
    fn lego_id(&self) -> Pubkey;

    fn deposit_for_yield(
        &mut self,
        asset: &Pubkey,
        amount: u64,
        vault_token: &Pubkey,
        extra_data: &[u8],
        recipient: &Pubkey,
    ) -> Result<LegoDeposit>;

    /// Redeem `amount` vault tokens held by `recipient`, returning underlying received
    fn withdraw_from_yield(
        &mut self,
        vault_token: &Pubkey,
        amount: u64,
        recipient: &Pubkey,
    ) -> Result<u64>;

    fn get_underlying_amount(&self, vault_token: &Pubkey, vault_token_balance: u64) -> Result<u64>;

    fn get_vault_token_amount(
        &self,
        asset: &Pubkey,
        underlying_amount: u64,
        vault_token: &Pubkey,
    ) -> Result<u64>;

    /// Whether vault-token balances grow in place to reflect yield
    fn is_rebasing(&self) -> bool;

    fn balance_of(&self, vault_token: &Pubkey, holder: &Pubkey) -> Result<u64>;

    fn vault_token_decimals(&self, vault_token: &Pubkey) -> Result<u8>;

    fn underlying_asset(&self, vault_token: &Pubkey) -> Result<Pubkey>;

    fn clone_box(&self) -> Box<dyn Lego>;
}

impl Clone for Box<dyn Lego> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

/// Directory of available Legos keyed by protocol handle
#[derive(Clone, Default)]
pub struct LegoBook {
    legos: BTreeMap<Pubkey, Box<dyn Lego>>,
}

impl LegoBook {
    pub fn insert(&mut self, lego: Box<dyn Lego>) -> Option<Box<dyn Lego>> {
        self.legos.insert(lego.lego_id(), lego)
    }

    pub fn remove(&mut self, lego_id: &Pubkey) -> Option<Box<dyn Lego>> {
        self.legos.remove(lego_id)
    }

    pub fn get(&self, lego_id: &Pubkey) -> Option<&dyn Lego> {
        self.legos.get(lego_id).map(|lego| lego.as_ref())
    }

    pub fn get_mut(&mut self, lego_id: &Pubkey) -> Option<&mut (dyn Lego + 'static)> {
        self.legos.get_mut(lego_id).map(|lego| lego.as_mut())
    }
}

/// Governance and permission checks consulted before any ledger mutation
pub trait VaultAuthority {
    fn is_approved_caller(&self, caller: &Pubkey) -> bool;
    fn is_approved_adapter(&self, lego_id: &Pubkey) -> bool;
    fn is_approved_vault_token(&self, vault_token: &Pubkey) -> bool;
}

/// Allow-list implementation of [`VaultAuthority`]
#[derive(Clone, Debug, Default)]
pub struct Approvals {
    pub callers: BTreeSet<Pubkey>,
    pub legos: BTreeSet<Pubkey>,
    pub vault_tokens: BTreeSet<Pubkey>,
}

impl VaultAuthority for Approvals {
    fn is_approved_caller(&self, caller: &Pubkey) -> bool {
        self.callers.contains(caller)
    }

    fn is_approved_adapter(&self, lego_id: &Pubkey) -> bool {
        self.legos.contains(lego_id)
    }

    fn is_approved_vault_token(&self, vault_token: &Pubkey) -> bool {
        self.vault_tokens.contains(vault_token)
    }
}

/// Converts an asset amount into the vault's quote currency
pub trait PriceOracle {
    fn quote_value(&self, asset: &Pubkey, amount: u64) -> Result<u64>;
}

/// Oracle for vaults quoted in their own base asset
#[derive(Clone, Copy, Debug, Default)]
pub struct UnitOracle;

impl PriceOracle for UnitOracle {
    fn quote_value(&self, _asset: &Pubkey, amount: u64) -> Result<u64> {
        Ok(amount)
    }
}
