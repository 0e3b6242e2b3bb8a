//! SVS-Yield: an ERC-4626 vault ledger whose idle assets can be deployed
//! into external yield protocols through Lego adapters.

use anchor_lang::prelude::*;

pub mod config;
pub mod constants;
pub mod error;
pub mod events;
pub mod instructions;
pub mod interfaces;
pub mod ledger;
pub mod math;
pub mod price;
pub mod registry;
pub mod state;
pub mod vault;

pub use config::VaultConfig;
pub use error::VaultError;
pub use interfaces::{Approvals, Lego, LegoBook, LegoDeposit, PriceOracle, UnitOracle, VaultAuthority};
pub use ledger::{YieldDeposit, YieldRebalance, YieldWithdrawal};
pub use state::{VaultPosition, VaultState};
pub use vault::{ShareLedger, VaultContext, YieldVault};

impl YieldVault {
    /// Initialize a new vault for the given asset, seeded by the authority
    pub fn initialize(
        address: Pubkey,
        authority: Pubkey,
        base_asset: Pubkey,
        config: VaultConfig,
        seed_assets: u64,
    ) -> Result<Self> {
        instructions::initialize::handler(address, authority, base_asset, config, seed_assets)
    }

    /// Deposit assets and receive shares
    /// Returns shares minted (floor rounding - favors vault)
    pub fn deposit(
        &mut self,
        ctx: &mut VaultContext,
        assets: u64,
        receiver: Pubkey,
        min_shares_out: u64,
    ) -> Result<u64> {
        instructions::deposit::handler(self, ctx, assets, receiver, min_shares_out)
    }

    /// Mint exact shares by depositing required assets
    /// Pays assets (ceiling rounding - favors vault)
    pub fn mint(
        &mut self,
        ctx: &mut VaultContext,
        shares: u64,
        receiver: Pubkey,
        max_assets_in: u64,
    ) -> Result<u64> {
        instructions::mint::handler(self, ctx, shares, receiver, max_assets_in)
    }

    /// Withdraw exact assets by burning required shares
    /// Burns shares (ceiling rounding - favors vault)
    pub fn withdraw(
        &mut self,
        ctx: &mut VaultContext,
        assets: u64,
        receiver: Pubkey,
        owner: Pubkey,
        max_shares_in: u64,
    ) -> Result<u64> {
        instructions::withdraw::handler(self, ctx, assets, receiver, owner, max_shares_in)
    }

    /// Redeem shares for assets
    /// Receives assets (floor rounding - favors vault)
    pub fn redeem(
        &mut self,
        ctx: &mut VaultContext,
        shares: u64,
        receiver: Pubkey,
        owner: Pubkey,
        min_assets_out: u64,
    ) -> Result<u64> {
        instructions::redeem::handler(self, ctx, shares, receiver, owner, min_assets_out)
    }

    /// Allow a spender to withdraw/redeem against the caller's shares
    pub fn approve(&mut self, ctx: &mut VaultContext, spender: Pubkey, shares: u64) -> Result<()> {
        instructions::approve::handler(self, ctx, spender, shares)
    }

    // ============ Yield Positions ============

    /// Deploy idle assets into a yield position
    pub fn deposit_for_yield(
        &mut self,
        ctx: &mut VaultContext,
        lego_id: Pubkey,
        asset: Pubkey,
        vault_token: Pubkey,
        amount: u64,
        extra_data: &[u8],
    ) -> Result<YieldDeposit> {
        instructions::deposit_for_yield::handler(
            self, ctx, lego_id, asset, vault_token, amount, extra_data,
        )
    }

    /// Redeem a yield position back into idle assets
    pub fn withdraw_from_yield(
        &mut self,
        ctx: &mut VaultContext,
        lego_id: Pubkey,
        vault_token: Pubkey,
        amount: u64,
    ) -> Result<YieldWithdrawal> {
        instructions::withdraw_from_yield::handler(self, ctx, lego_id, vault_token, amount)
    }

    /// Move value between two yield positions atomically
    pub fn rebalance_yield_position(
        &mut self,
        ctx: &mut VaultContext,
        from_lego: Pubkey,
        from_vault_token: Pubkey,
        to_lego: Pubkey,
        to_vault_token: Pubkey,
        amount: u64,
    ) -> Result<YieldRebalance> {
        instructions::rebalance::handler(
            self,
            ctx,
            from_lego,
            from_vault_token,
            to_lego,
            to_vault_token,
            amount,
        )
    }

    // ============ Admin ============

    /// Pause all vault operations (emergency)
    pub fn pause(&mut self, ctx: &mut VaultContext) -> Result<()> {
        instructions::admin::pause(self, ctx)
    }

    /// Unpause vault operations
    pub fn unpause(&mut self, ctx: &mut VaultContext) -> Result<()> {
        instructions::admin::unpause(self, ctx)
    }

    /// Transfer vault authority
    pub fn transfer_authority(&mut self, ctx: &mut VaultContext, new_authority: Pubkey) -> Result<()> {
        instructions::admin::transfer_authority(self, ctx, new_authority)
    }

    // ============ View Functions ============

    /// Idle assets plus the live value of every yield position
    pub fn total_assets(&self, legos: &LegoBook) -> Result<u64> {
        self.state.total_assets(legos)
    }

    /// Convert assets to shares (floor rounding)
    pub fn convert_to_shares(&self, legos: &LegoBook, assets: u64) -> Result<u64> {
        instructions::view::preview_deposit(self, legos, assets)
    }

    /// Convert shares to assets (floor rounding)
    pub fn convert_to_assets(&self, legos: &LegoBook, shares: u64) -> Result<u64> {
        instructions::view::preview_redeem(self, legos, shares)
    }

    /// Preview shares for deposit (floor rounding)
    pub fn preview_deposit(&self, legos: &LegoBook, assets: u64) -> Result<u64> {
        instructions::view::preview_deposit(self, legos, assets)
    }

    /// Preview assets required for mint (ceiling rounding)
    pub fn preview_mint(&self, legos: &LegoBook, shares: u64) -> Result<u64> {
        instructions::view::preview_mint(self, legos, shares)
    }

    /// Preview shares to burn for withdraw (ceiling rounding)
    pub fn preview_withdraw(&self, legos: &LegoBook, assets: u64) -> Result<u64> {
        instructions::view::preview_withdraw(self, legos, assets)
    }

    /// Preview assets for redeem (floor rounding)
    pub fn preview_redeem(&self, legos: &LegoBook, shares: u64) -> Result<u64> {
        instructions::view::preview_redeem(self, legos, shares)
    }

    /// Max assets depositable (u64::MAX or 0 if paused)
    pub fn max_deposit(&self) -> u64 {
        instructions::view::max_deposit(self)
    }

    /// Max shares mintable (u64::MAX or 0 if paused)
    pub fn max_mint(&self) -> u64 {
        instructions::view::max_mint(self)
    }

    /// Max assets owner can withdraw
    pub fn max_withdraw(&self, legos: &LegoBook, owner: &Pubkey) -> Result<u64> {
        instructions::view::max_withdraw(self, legos, owner)
    }

    /// Max shares owner can redeem
    pub fn max_redeem(&self, owner: &Pubkey) -> u64 {
        instructions::view::max_redeem(self, owner)
    }

    pub fn share_balance(&self, holder: &Pubkey) -> u64 {
        self.shares.balance_of(holder)
    }

    pub fn position(&self, vault_token: &Pubkey) -> Option<&VaultPosition> {
        self.state.position(vault_token)
    }

    pub fn positions(&self) -> impl Iterator<Item = &VaultPosition> + '_ {
        self.state.positions()
    }

    /// Value above cost basis held in a position
    pub fn unrealized_yield(&self, legos: &LegoBook, vault_token: &Pubkey) -> Result<u64> {
        self.state.unrealized_yield(legos, vault_token)
    }
}
