use anchor_lang::prelude::*;

use crate::{
    interfaces::LegoBook,
    math::{convert_to_assets, convert_to_shares, Rounding},
    vault::YieldVault,
};

/// Preview how many shares would be minted for given assets (floor rounding)
pub fn preview_deposit(vault: &YieldVault, legos: &LegoBook, assets: u64) -> Result<u64> {
    convert_to_shares(
        assets,
        vault.state.total_assets(legos)?,
        vault.shares.total_supply(),
        Rounding::Floor,
    )
}

/// Preview how many assets are required to mint exact shares (ceiling rounding)
pub fn preview_mint(vault: &YieldVault, legos: &LegoBook, shares: u64) -> Result<u64> {
    convert_to_assets(
        shares,
        vault.state.total_assets(legos)?,
        vault.shares.total_supply(),
        Rounding::Ceiling,
    )
}

/// Preview how many shares must be burned to withdraw exact assets (ceiling rounding)
pub fn preview_withdraw(vault: &YieldVault, legos: &LegoBook, assets: u64) -> Result<u64> {
    convert_to_shares(
        assets,
        vault.state.total_assets(legos)?,
        vault.shares.total_supply(),
        Rounding::Ceiling,
    )
}

/// Preview how many assets would be received for redeeming shares (floor rounding)
pub fn preview_redeem(vault: &YieldVault, legos: &LegoBook, shares: u64) -> Result<u64> {
    convert_to_assets(
        shares,
        vault.state.total_assets(legos)?,
        vault.shares.total_supply(),
        Rounding::Floor,
    )
}

/// Maximum assets that can be deposited (u64::MAX if not paused, 0 if paused)
pub fn max_deposit(vault: &YieldVault) -> u64 {
    if vault.state.paused {
        0
    } else {
        u64::MAX
    }
}

/// Maximum shares that can be minted (u64::MAX if not paused, 0 if paused)
pub fn max_mint(vault: &YieldVault) -> u64 {
    max_deposit(vault)
}

/// Maximum assets that owner can withdraw (limited by their shares)
pub fn max_withdraw(vault: &YieldVault, legos: &LegoBook, owner: &Pubkey) -> Result<u64> {
    if vault.state.paused || *owner == vault.state.address {
        return Ok(0);
    }
    let total_assets = vault.state.total_assets(legos)?;
    let max_assets = convert_to_assets(
        vault.shares.balance_of(owner),
        total_assets,
        vault.shares.total_supply(),
        Rounding::Floor,
    )?;
    Ok(max_assets.min(total_assets))
}

/// Maximum shares that owner can redeem (their share balance; 0 for locked seed shares)
pub fn max_redeem(vault: &YieldVault, owner: &Pubkey) -> u64 {
    if vault.state.paused || *owner == vault.state.address {
        0
    } else {
        vault.shares.balance_of(owner)
    }
}
