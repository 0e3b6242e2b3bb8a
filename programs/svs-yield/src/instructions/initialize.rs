use anchor_lang::prelude::*;

use crate::{
    config::VaultConfig,
    error::VaultError,
    events::{Deposit as DepositEvent, VaultInitialized},
    state::VaultState,
    vault::{ShareLedger, YieldVault},
};

/// Create a vault and seed it with the authority's minimum deposit.
///
/// Seed shares are minted 1:1 to the vault's own address. That holder can
/// never withdraw or redeem, so the share supply never returns to zero.
pub fn handler(
    address: Pubkey,
    authority: Pubkey,
    base_asset: Pubkey,
    config: VaultConfig,
    seed_assets: u64,
) -> Result<YieldVault> {
    config.validate()?;
    require!(address != Pubkey::default(), VaultError::InvalidConfig);
    require!(base_asset != Pubkey::default(), VaultError::InvalidAsset);
    require!(authority != Pubkey::default(), VaultError::InvalidReceiver);
    require!(
        seed_assets >= config.min_seed_deposit,
        VaultError::DepositTooSmall
    );

    let mut vault = YieldVault {
        state: VaultState::new(address, authority, base_asset, config),
        shares: ShareLedger::default(),
    };
    vault.state.receive_assets(seed_assets)?;
    vault.shares.mint(&address, seed_assets)?;

    msg!("Vault {} initialized for asset {}", address, base_asset);

    emit!(VaultInitialized {
        vault: address,
        authority,
        base_asset,
        seed_assets,
    });
    emit!(DepositEvent {
        vault: address,
        caller: authority,
        owner: address,
        assets: seed_assets,
        shares: seed_assets,
    });

    Ok(vault)
}
