use anchor_lang::prelude::*;

use crate::{
    events::{PositionDeregistered, YieldWithdrawn},
    ledger::YieldWithdrawal,
    vault::{VaultContext, YieldVault},
};

/// Redeem vault tokens of a position back into idle base asset.
///
/// `amount` is clamped to the position balance. Emptying the position
/// deregisters it.
pub fn handler(
    vault: &mut YieldVault,
    ctx: &mut VaultContext,
    lego_id: Pubkey,
    vault_token: Pubkey,
    amount: u64,
) -> Result<YieldWithdrawal> {
    let withdrawal = vault.transact(ctx, |vault, ctx| {
        vault.require_active()?;
        vault
            .state
            .withdraw_from_yield(ctx, lego_id, vault_token, amount)
    })?;

    emit_yield_withdrawal(vault.state.address, &withdrawal);
    Ok(withdrawal)
}

pub(crate) fn emit_yield_withdrawal(vault: Pubkey, withdrawal: &YieldWithdrawal) {
    emit!(YieldWithdrawn {
        vault,
        vault_token: withdrawal.vault_token,
        vault_token_burned: withdrawal.vault_token_burned,
        underlying_received: withdrawal.underlying_received,
        quote_value: withdrawal.quote_value,
        realized_yield: withdrawal.realized_yield,
    });
    if withdrawal.deregistered {
        emit!(PositionDeregistered {
            vault,
            vault_token: withdrawal.vault_token,
        });
    }
}
