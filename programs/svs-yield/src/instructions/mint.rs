use anchor_lang::prelude::*;

use crate::{
    error::VaultError,
    events::Deposit as DepositEvent,
    math::{convert_to_assets, Rounding},
    vault::{VaultContext, YieldVault},
};

/// Mint exact shares, paying required assets (ceiling rounding - protects vault)
pub fn handler(
    vault: &mut YieldVault,
    ctx: &mut VaultContext,
    shares: u64,
    receiver: Pubkey,
    max_assets_in: u64,
) -> Result<u64> {
    let assets = vault.transact(ctx, |vault, ctx| {
        vault.require_active()?;
        require!(shares > 0, VaultError::ZeroAmount);
        require!(receiver != Pubkey::default(), VaultError::InvalidReceiver);

        let total_assets = vault.state.total_assets(ctx.legos)?;

        // Calculate required assets (ceiling rounding - user pays more)
        let assets = convert_to_assets(
            shares,
            total_assets,
            vault.shares.total_supply(),
            Rounding::Ceiling,
        )?;
        require!(assets > 0, VaultError::ZeroAmount);
        require!(assets <= max_assets_in, VaultError::SlippageExceeded);

        vault.state.receive_assets(assets)?;
        vault.shares.mint(&receiver, shares)?;
        Ok(assets)
    })?;

    emit!(DepositEvent {
        vault: vault.state.address,
        caller: ctx.caller,
        owner: receiver,
        assets,
        shares,
    });

    Ok(assets)
}
