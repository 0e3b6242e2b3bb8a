use std::collections::HashMap;

use anchor_lang::prelude::*;

use crate::{config::VaultConfig, error::VaultError, price::PriceTracker, registry::PositionRegistry};

/// One active allocation into an external protocol's vault token
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VaultPosition {
    /// Receipt token issued by the protocol (registry key)
    pub vault_token: Pubkey,
    /// Lego the position was opened through
    pub lego_id: Pubkey,
    /// Asset the vault token redeems for
    pub underlying_asset: Pubkey,
    /// Yield shows up as balance growth instead of exchange-rate growth
    pub is_rebasing: bool,
    /// Vault token decimals (may differ from the base asset)
    pub decimals: u8,
    /// Vault-token balance as of the last sync with the Lego
    pub balance: u64,
    /// Underlying deposited and not yet withdrawn, pro-rated on withdrawal
    pub cost_basis: u64,
    /// Underlying received above cost basis over the position's life
    pub realized_yield: u64,
    pub last_update: i64,
    pub price: PriceTracker,
}

impl VaultPosition {
    /// Weighted-average underlying per whole vault token (0 for rebasing positions)
    pub fn avg_price_per_share(&self) -> u64 {
        self.price.avg_price()
    }
}

/// Ledger state of one vault.
///
/// Owns the idle base-asset balance, the position registry and every
/// position's price tracking. Share supply lives on the façade.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VaultState {
    /// Address the vault holds Lego positions under
    pub address: Pubkey,
    /// Vault admin who can pause/unpause and transfer authority
    pub authority: Pubkey,
    /// Base asset accepted from depositors
    pub base_asset: Pubkey,
    /// Base asset held by the vault and not deployed
    pub idle_balance: u64,
    pub config: VaultConfig,
    /// Emergency pause flag
    pub paused: bool,
    /// Set while an operation is executing
    pub locked: bool,
    pub registry: PositionRegistry,
    pub positions: HashMap<Pubkey, VaultPosition>,
    /// Realized yield of positions that have since been deregistered
    pub retired_yield: u64,
}

impl VaultState {
    pub fn new(address: Pubkey, authority: Pubkey, base_asset: Pubkey, config: VaultConfig) -> Self {
        Self {
            address,
            authority,
            base_asset,
            idle_balance: 0,
            config,
            paused: false,
            locked: false,
            registry: PositionRegistry::default(),
            positions: HashMap::new(),
            retired_yield: 0,
        }
    }

    pub fn position(&self, vault_token: &Pubkey) -> Option<&VaultPosition> {
        self.positions.get(vault_token)
    }

    /// Active positions in registry slot order
    pub fn positions(&self) -> impl Iterator<Item = &VaultPosition> + '_ {
        self.registry
            .iter()
            .filter_map(|vault_token| self.positions.get(vault_token))
    }

    pub(crate) fn receive_assets(&mut self, amount: u64) -> Result<()> {
        self.idle_balance = self
            .idle_balance
            .checked_add(amount)
            .ok_or(VaultError::MathOverflow)?;
        Ok(())
    }

    pub(crate) fn release_assets(&mut self, amount: u64) -> Result<()> {
        self.idle_balance = self
            .idle_balance
            .checked_sub(amount)
            .ok_or(VaultError::InsufficientAssets)?;
        Ok(())
    }
}
