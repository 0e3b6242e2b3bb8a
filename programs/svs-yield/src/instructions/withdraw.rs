use anchor_lang::prelude::*;

use crate::{
    error::VaultError,
    events::Withdraw as WithdrawEvent,
    instructions::withdraw_from_yield::emit_yield_withdrawal,
    math::{convert_to_shares, Rounding},
    vault::{VaultContext, YieldVault},
};

/// Withdraw exact assets by burning required shares (ceiling rounding - protects vault)
///
/// Any shortfall of idle assets is pulled out of yield positions first.
pub fn handler(
    vault: &mut YieldVault,
    ctx: &mut VaultContext,
    assets: u64,
    receiver: Pubkey,
    owner: Pubkey,
    max_shares_in: u64,
) -> Result<u64> {
    let (shares, pulled) = vault.transact(ctx, |vault, ctx| {
        vault.require_active()?;
        require!(assets > 0, VaultError::ZeroAmount);
        require!(receiver != Pubkey::default(), VaultError::InvalidReceiver);
        // Seed shares are locked under the vault's own address
        require!(owner != vault.state.address, VaultError::Unauthorized);

        let total_assets = vault.state.total_assets(ctx.legos)?;
        require!(assets <= total_assets, VaultError::InsufficientAssets);

        // Calculate shares to burn (ceiling rounding - user burns more)
        let shares = convert_to_shares(
            assets,
            total_assets,
            vault.shares.total_supply(),
            Rounding::Ceiling,
        )?;
        require!(shares <= max_shares_in, VaultError::SlippageExceeded);
        require!(
            vault.shares.balance_of(&owner) >= shares,
            VaultError::InsufficientShares
        );
        if ctx.caller != owner {
            vault.shares.spend_allowance(&owner, &ctx.caller, shares)?;
        }
        vault.shares.burn(&owner, shares)?;

        let pulled = vault.state.free_idle(ctx, assets)?;
        vault.state.release_assets(assets)?;
        Ok((shares, pulled))
    })?;

    for withdrawal in &pulled {
        emit_yield_withdrawal(vault.state.address, withdrawal);
    }
    emit!(WithdrawEvent {
        vault: vault.state.address,
        caller: ctx.caller,
        receiver,
        owner,
        assets,
        shares,
    });

    Ok(shares)
}
