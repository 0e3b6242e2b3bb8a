use anchor_lang::prelude::*;

use crate::{
    events::YieldRebalanced,
    instructions::{
        deposit_for_yield::emit_yield_deposit, withdraw_from_yield::emit_yield_withdrawal,
    },
    ledger::YieldRebalance,
    vault::{VaultContext, YieldVault},
};

/// Migrate value from one yield position to another in a single operation
pub fn handler(
    vault: &mut YieldVault,
    ctx: &mut VaultContext,
    from_lego: Pubkey,
    from_vault_token: Pubkey,
    to_lego: Pubkey,
    to_vault_token: Pubkey,
    amount: u64,
) -> Result<YieldRebalance> {
    let rebalance = vault.transact(ctx, |vault, ctx| {
        vault.require_active()?;
        vault.state.rebalance_yield_position(
            ctx,
            from_lego,
            from_vault_token,
            to_lego,
            to_vault_token,
            amount,
        )
    })?;

    let address = vault.state.address;
    emit_yield_withdrawal(address, &rebalance.withdrawal);
    emit_yield_deposit(address, to_lego, &rebalance.deposit);
    emit!(YieldRebalanced {
        vault: address,
        from_vault_token,
        to_vault_token,
        underlying_moved: rebalance.deposit.asset_deposited,
    });

    Ok(rebalance)
}
