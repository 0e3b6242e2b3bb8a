use anchor_lang::prelude::*;

use crate::{
    constants::MAX_AMOUNT,
    error::VaultError,
    events::Withdraw as WithdrawEvent,
    instructions::withdraw_from_yield::emit_yield_withdrawal,
    math::{convert_to_assets, Rounding},
    vault::{VaultContext, YieldVault},
};

/// Redeem shares for assets (floor rounding - protects vault)
///
/// `MAX_AMOUNT` redeems the owner's entire share balance.
pub fn handler(
    vault: &mut YieldVault,
    ctx: &mut VaultContext,
    shares: u64,
    receiver: Pubkey,
    owner: Pubkey,
    min_assets_out: u64,
) -> Result<u64> {
    let (shares, assets, pulled) = vault.transact(ctx, |vault, ctx| {
        vault.require_active()?;
        require!(receiver != Pubkey::default(), VaultError::InvalidReceiver);
        // Seed shares are locked under the vault's own address
        require!(owner != vault.state.address, VaultError::Unauthorized);

        let owner_shares = vault.shares.balance_of(&owner);
        let shares = if shares == MAX_AMOUNT { owner_shares } else { shares };
        require!(shares > 0, VaultError::ZeroAmount);
        require!(owner_shares >= shares, VaultError::InsufficientShares);

        let total_assets = vault.state.total_assets(ctx.legos)?;

        // Calculate assets to receive (floor rounding - user gets less)
        let assets = convert_to_assets(
            shares,
            total_assets,
            vault.shares.total_supply(),
            Rounding::Floor,
        )?;
        require!(assets > 0, VaultError::ZeroAmount);
        require!(assets >= min_assets_out, VaultError::SlippageExceeded);

        if ctx.caller != owner {
            vault.shares.spend_allowance(&owner, &ctx.caller, shares)?;
        }
        vault.shares.burn(&owner, shares)?;

        let pulled = vault.state.free_idle(ctx, assets)?;
        vault.state.release_assets(assets)?;
        Ok((shares, assets, pulled))
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

    Ok(assets)
}
