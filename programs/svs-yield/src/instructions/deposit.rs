use anchor_lang::prelude::*;

use crate::{
    error::VaultError,
    events::Deposit as DepositEvent,
    math::{convert_to_shares, Rounding},
    vault::{VaultContext, YieldVault},
};

/// Deposit assets and receive shares (floor rounding - protects vault)
pub fn handler(
    vault: &mut YieldVault,
    ctx: &mut VaultContext,
    assets: u64,
    receiver: Pubkey,
    min_shares_out: u64,
) -> Result<u64> {
    let shares = vault.transact(ctx, |vault, ctx| {
        vault.require_active()?;
        require!(assets > 0, VaultError::ZeroAmount);
        require!(receiver != Pubkey::default(), VaultError::InvalidReceiver);

        let total_assets = vault.state.total_assets(ctx.legos)?;

        // Calculate shares to mint (floor rounding - user gets less)
        let shares = convert_to_shares(
            assets,
            total_assets,
            vault.shares.total_supply(),
            Rounding::Floor,
        )?;
        require!(shares > 0, VaultError::ZeroShares);
        require!(shares >= min_shares_out, VaultError::SlippageExceeded);

        vault.state.receive_assets(assets)?;
        vault.shares.mint(&receiver, shares)?;
        Ok(shares)
    })?;

    emit!(DepositEvent {
        vault: vault.state.address,
        caller: ctx.caller,
        owner: receiver,
        assets,
        shares,
    });

    Ok(shares)
}
