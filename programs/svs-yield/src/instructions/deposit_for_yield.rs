use anchor_lang::prelude::*;

use crate::{
    events::{PositionRegistered, YieldDeposited},
    ledger::YieldDeposit,
    vault::{VaultContext, YieldVault},
};

/// Move idle base asset into a yield position through its Lego.
///
/// `amount` is clamped to the idle balance; `MAX_AMOUNT` deploys all of it.
pub fn handler(
    vault: &mut YieldVault,
    ctx: &mut VaultContext,
    lego_id: Pubkey,
    asset: Pubkey,
    vault_token: Pubkey,
    amount: u64,
    extra_data: &[u8],
) -> Result<YieldDeposit> {
    let deposit = vault.transact(ctx, |vault, ctx| {
        vault.require_active()?;
        vault
            .state
            .deposit_for_yield(ctx, lego_id, asset, vault_token, amount, extra_data)
    })?;

    emit_yield_deposit(vault.state.address, lego_id, &deposit);
    Ok(deposit)
}

pub(crate) fn emit_yield_deposit(vault: Pubkey, lego_id: Pubkey, deposit: &YieldDeposit) {
    if deposit.registered {
        emit!(PositionRegistered {
            vault,
            vault_token: deposit.vault_token,
            lego_id,
        });
    }
    emit!(YieldDeposited {
        vault,
        lego_id,
        vault_token: deposit.vault_token,
        asset_deposited: deposit.asset_deposited,
        vault_tokens_received: deposit.vault_tokens_received,
        quote_value: deposit.quote_value,
    });
}
