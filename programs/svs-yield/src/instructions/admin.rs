use anchor_lang::prelude::*;

use crate::{
    error::VaultError,
    events::{AuthorityTransferred, VaultStatusChanged},
    vault::{VaultContext, YieldVault},
};

/// Pause all vault operations (emergency circuit breaker)
pub fn pause(vault: &mut YieldVault, ctx: &mut VaultContext) -> Result<()> {
    vault.transact(ctx, |vault, ctx| {
        vault.require_authority(&ctx.caller)?;
        require!(!vault.state.paused, VaultError::VaultPaused);
        vault.state.paused = true;
        Ok(())
    })?;

    msg!("Vault {} paused", vault.state.address);
    emit!(VaultStatusChanged {
        vault: vault.state.address,
        paused: true,
    });

    Ok(())
}

/// Unpause vault operations
pub fn unpause(vault: &mut YieldVault, ctx: &mut VaultContext) -> Result<()> {
    vault.transact(ctx, |vault, ctx| {
        vault.require_authority(&ctx.caller)?;
        require!(vault.state.paused, VaultError::VaultPaused);
        vault.state.paused = false;
        Ok(())
    })?;

    emit!(VaultStatusChanged {
        vault: vault.state.address,
        paused: false,
    });

    Ok(())
}

/// Transfer vault authority to new address
pub fn transfer_authority(
    vault: &mut YieldVault,
    ctx: &mut VaultContext,
    new_authority: Pubkey,
) -> Result<()> {
    let previous_authority = vault.transact(ctx, |vault, ctx| {
        vault.require_authority(&ctx.caller)?;
        require!(
            new_authority != Pubkey::default(),
            VaultError::InvalidReceiver
        );
        let previous = vault.state.authority;
        vault.state.authority = new_authority;
        Ok(previous)
    })?;

    emit!(AuthorityTransferred {
        vault: vault.state.address,
        previous_authority,
        new_authority,
    });

    Ok(())
}
