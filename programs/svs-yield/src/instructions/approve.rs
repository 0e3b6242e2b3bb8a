use anchor_lang::prelude::*;

use crate::{
    error::VaultError,
    vault::{VaultContext, YieldVault},
};

/// Let `spender` burn up to `shares` of the caller's shares in withdraw/redeem
pub fn handler(
    vault: &mut YieldVault,
    ctx: &mut VaultContext,
    spender: Pubkey,
    shares: u64,
) -> Result<()> {
    vault.transact(ctx, |vault, ctx| {
        require!(spender != Pubkey::default(), VaultError::InvalidReceiver);
        vault.shares.approve(&ctx.caller, &spender, shares);
        Ok(())
    })
}
