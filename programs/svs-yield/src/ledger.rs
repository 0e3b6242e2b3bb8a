use anchor_lang::prelude::*;

use crate::{
    constants::MAX_VAULT_TOKEN_DECIMALS,
    error::VaultError,
    interfaces::LegoBook,
    math::{mul_div, price_per_share, value_at_price, Rounding},
    price::PriceTracker,
    state::{VaultPosition, VaultState},
    vault::VaultContext,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct YieldDeposit {
    pub asset_deposited: u64,
    pub vault_token: Pubkey,
    pub vault_tokens_received: u64,
    /// `asset_deposited` in the vault's quote currency
    pub quote_value: u64,
    /// The deposit opened a new position
    pub registered: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct YieldWithdrawal {
    pub vault_token: Pubkey,
    pub vault_token_burned: u64,
    pub underlying_asset: Pubkey,
    pub underlying_received: u64,
    /// `underlying_received` in the vault's quote currency
    pub quote_value: u64,
    /// Underlying received above the pro-rated cost basis
    pub realized_yield: u64,
    /// The withdrawal emptied and removed the position
    pub deregistered: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct YieldRebalance {
    pub withdrawal: YieldWithdrawal,
    pub deposit: YieldDeposit,
}

/// Clamp a requested amount to what is available.
///
/// `MAX_AMOUNT` and any literal above `available` resolve to `available`.
fn clamp_amount(requested: u64, available: u64) -> Result<u64> {
    require!(available > 0, VaultError::NoBalance);
    require!(requested > 0, VaultError::ZeroAmount);
    Ok(requested.min(available))
}

impl VaultState {
    /// Idle balance plus the underlying value of every registered position
    pub fn total_assets(&self, legos: &LegoBook) -> Result<u64> {
        self.positions().try_fold(self.idle_balance, |total, position| {
            let value = self.position_value(legos, position)?;
            total
                .checked_add(value)
                .ok_or_else(|| error!(VaultError::MathOverflow))
        })
    }

    /// Current underlying value of a position's vault-token holdings
    pub fn position_value(&self, legos: &LegoBook, position: &VaultPosition) -> Result<u64> {
        let lego = legos
            .get(&position.lego_id)
            .ok_or(VaultError::InvalidProtocol)?;
        let balance = lego.balance_of(&position.vault_token, &self.address)?;
        lego.get_underlying_amount(&position.vault_token, balance)
    }

    /// Value above cost basis not yet realized by a withdrawal.
    ///
    /// Non-rebasing positions are measured at the tracked average price rather
    /// than the instantaneous exchange rate.
    pub fn unrealized_yield(&self, legos: &LegoBook, vault_token: &Pubkey) -> Result<u64> {
        let position = self
            .positions
            .get(vault_token)
            .ok_or(VaultError::NotRegistered)?;
        let current = self.position_value(legos, position)?;
        let basis = if position.is_rebasing {
            position.cost_basis
        } else {
            value_at_price(
                position.balance,
                position.avg_price_per_share(),
                position.decimals,
                Rounding::Ceiling,
            )?
        };
        Ok(current.saturating_sub(basis))
    }

    /// Caller, Lego and vault-token approval, in that order
    fn authorize(&self, ctx: &VaultContext, lego_id: &Pubkey, vault_token: &Pubkey) -> Result<()> {
        require!(
            ctx.approvals.is_approved_caller(&ctx.caller),
            VaultError::Unauthorized
        );
        require!(
            ctx.approvals.is_approved_adapter(lego_id) && ctx.legos.get(lego_id).is_some(),
            VaultError::InvalidProtocol
        );
        require!(
            ctx.approvals.is_approved_vault_token(vault_token),
            VaultError::InvalidVaultToken
        );
        Ok(())
    }

    pub(crate) fn deposit_for_yield(
        &mut self,
        ctx: &mut VaultContext,
        lego_id: Pubkey,
        asset: Pubkey,
        vault_token: Pubkey,
        amount: u64,
        extra_data: &[u8],
    ) -> Result<YieldDeposit> {
        self.authorize(ctx, &lego_id, &vault_token)?;
        self.deposit_into_position(ctx, lego_id, asset, vault_token, amount, extra_data)
    }

    pub(crate) fn withdraw_from_yield(
        &mut self,
        ctx: &mut VaultContext,
        lego_id: Pubkey,
        vault_token: Pubkey,
        amount: u64,
    ) -> Result<YieldWithdrawal> {
        self.authorize(ctx, &lego_id, &vault_token)?;
        self.withdraw_from_position(ctx, lego_id, vault_token, amount)
    }

    /// Withdraw from one position and deposit the proceeds into another
    pub(crate) fn rebalance_yield_position(
        &mut self,
        ctx: &mut VaultContext,
        from_lego: Pubkey,
        from_vault_token: Pubkey,
        to_lego: Pubkey,
        to_vault_token: Pubkey,
        amount: u64,
    ) -> Result<YieldRebalance> {
        self.authorize(ctx, &from_lego, &from_vault_token)?;
        self.authorize(ctx, &to_lego, &to_vault_token)?;

        let withdrawal = self.withdraw_from_position(ctx, from_lego, from_vault_token, amount)?;
        let deposit = self.deposit_into_position(
            ctx,
            to_lego,
            self.base_asset,
            to_vault_token,
            withdrawal.underlying_received,
            &[],
        )?;
        Ok(YieldRebalance {
            withdrawal,
            deposit,
        })
    }

    /// Pull underlying out of registered positions until `needed` is idle.
    ///
    /// Positions are drained in slot order. The vault acts on its own behalf here,
    /// so caller and approval checks do not apply. A position whose Lego fails is
    /// restored to its prior state and skipped.
    pub(crate) fn free_idle(
        &mut self,
        ctx: &mut VaultContext,
        needed: u64,
    ) -> Result<Vec<YieldWithdrawal>> {
        let mut withdrawals = Vec::new();
        let vault_tokens: Vec<Pubkey> = self.registry.iter().copied().collect();

        for vault_token in vault_tokens {
            if self.idle_balance >= needed {
                break;
            }
            let Some(position) = self.positions.get(&vault_token) else {
                continue;
            };
            let lego_id = position.lego_id;
            let Some(lego) = ctx.legos.get(&lego_id) else {
                continue;
            };

            let position_checkpoint = position.clone();
            let lego_checkpoint = lego.clone_box();
            let registry_checkpoint = self.registry.clone();
            let (idle_checkpoint, retired_checkpoint) = (self.idle_balance, self.retired_yield);
            let shortfall = needed - self.idle_balance;

            match self.pull_from_position(ctx, lego_id, vault_token, shortfall) {
                Ok(Some(withdrawal)) => withdrawals.push(withdrawal),
                Ok(None) => {}
                Err(err) => {
                    msg!("Skipping yield position {}: {}", vault_token, err);
                    self.positions.insert(vault_token, position_checkpoint);
                    self.registry = registry_checkpoint;
                    self.idle_balance = idle_checkpoint;
                    self.retired_yield = retired_checkpoint;
                    ctx.legos.insert(lego_checkpoint);
                }
            }
        }

        require!(self.idle_balance >= needed, VaultError::InsufficientAssets);
        Ok(withdrawals)
    }

    /// Withdraw enough of one position to cover `shortfall`, or `None` if it is empty
    fn pull_from_position(
        &mut self,
        ctx: &mut VaultContext,
        lego_id: Pubkey,
        vault_token: Pubkey,
        shortfall: u64,
    ) -> Result<Option<YieldWithdrawal>> {
        let lego = ctx.legos.get(&lego_id).ok_or(VaultError::InvalidProtocol)?;
        if lego.balance_of(&vault_token, &self.address)? == 0 {
            return Ok(None);
        }
        // One extra unit absorbs the Lego's conversion rounding
        let request = lego
            .get_vault_token_amount(&self.base_asset, shortfall, &vault_token)?
            .saturating_add(1);

        self.withdraw_from_position(ctx, lego_id, vault_token, request)
            .map(Some)
    }

    fn deposit_into_position(
        &mut self,
        ctx: &mut VaultContext,
        lego_id: Pubkey,
        asset: Pubkey,
        vault_token: Pubkey,
        amount: u64,
        extra_data: &[u8],
    ) -> Result<YieldDeposit> {
        require!(asset == self.base_asset, VaultError::InvalidAsset);
        let amount = clamp_amount(amount, self.idle_balance)?;

        let recipient = self.address;
        let now = ctx.now;
        let lego = ctx.legos.get_mut(&lego_id).ok_or(VaultError::InvalidProtocol)?;

        let registered = match self.positions.get(&vault_token) {
            Some(position) => {
                require!(position.lego_id == lego_id, VaultError::InvalidProtocol);
                false
            }
            None => {
                require!(
                    self.registry.count() < self.config.max_positions as usize,
                    VaultError::RegistryFull
                );
                let decimals = lego.vault_token_decimals(&vault_token)?;
                require!(
                    decimals <= MAX_VAULT_TOKEN_DECIMALS,
                    VaultError::AdapterMisbehaved
                );
                let underlying_asset = lego.underlying_asset(&vault_token)?;
                require!(underlying_asset == self.base_asset, VaultError::InvalidAsset);

                self.registry.register(vault_token)?;
                self.positions.insert(
                    vault_token,
                    VaultPosition {
                        vault_token,
                        lego_id,
                        underlying_asset,
                        is_rebasing: lego.is_rebasing(),
                        decimals,
                        balance: 0,
                        cost_basis: 0,
                        realized_yield: 0,
                        last_update: now,
                        price: PriceTracker::default(),
                    },
                );
                true
            }
        };

        let balance_before = if registered {
            0
        } else {
            lego.balance_of(&vault_token, &recipient)?
        };

        // Funds leave the idle balance before the Lego sees them
        self.idle_balance -= amount;
        let receipt = lego.deposit_for_yield(&asset, amount, &vault_token, extra_data, &recipient)?;
        require!(
            receipt.asset_deposited > 0
                && receipt.asset_deposited <= amount
                && receipt.vault_tokens_received > 0,
            VaultError::AdapterMisbehaved
        );
        self.idle_balance += amount - receipt.asset_deposited;
        let balance_after = lego.balance_of(&vault_token, &recipient)?;

        let config = self.config;
        let position = self
            .positions
            .get_mut(&vault_token)
            .ok_or(VaultError::NotRegistered)?;

        if !position.is_rebasing {
            let implied_price = price_per_share(
                receipt.asset_deposited,
                receipt.vault_tokens_received,
                position.decimals,
            )?;
            position.price.record_sample(
                position.is_rebasing,
                implied_price,
                now,
                balance_before,
                receipt.vault_tokens_received,
                &config,
            )?;
        }
        position.balance = balance_after;
        position.cost_basis = position
            .cost_basis
            .checked_add(receipt.asset_deposited)
            .ok_or(VaultError::MathOverflow)?;
        position.last_update = now;

        let quote_value = ctx.oracle.quote_value(&asset, receipt.asset_deposited)?;

        msg!(
            "Deposited {} into yield position {} for {} vault tokens",
            receipt.asset_deposited,
            vault_token,
            receipt.vault_tokens_received
        );

        Ok(YieldDeposit {
            asset_deposited: receipt.asset_deposited,
            vault_token,
            vault_tokens_received: receipt.vault_tokens_received,
            quote_value,
            registered,
        })
    }

    fn withdraw_from_position(
        &mut self,
        ctx: &mut VaultContext,
        lego_id: Pubkey,
        vault_token: Pubkey,
        amount: u64,
    ) -> Result<YieldWithdrawal> {
        let recipient = self.address;
        let now = ctx.now;

        let position = self
            .positions
            .get_mut(&vault_token)
            .ok_or(VaultError::NoBalance)?;
        require!(position.lego_id == lego_id, VaultError::InvalidProtocol);
        let lego = ctx.legos.get_mut(&lego_id).ok_or(VaultError::InvalidProtocol)?;

        let balance = lego.balance_of(&vault_token, &recipient)?;
        let amount = clamp_amount(amount, balance)?;

        // Pro-rate the cost basis before handing control to the Lego
        let cost_removed = if amount == balance {
            position.cost_basis
        } else {
            mul_div(position.cost_basis, amount, balance, Rounding::Floor)?
        };
        position.cost_basis -= cost_removed;
        position.balance = balance - amount;
        position.last_update = now;

        let underlying_received = lego.withdraw_from_yield(&vault_token, amount, &recipient)?;
        let remaining = lego.balance_of(&vault_token, &recipient)?;
        require!(remaining <= balance - amount, VaultError::AdapterMisbehaved);
        position.balance = remaining;

        let realized_yield = underlying_received.saturating_sub(cost_removed);
        position.realized_yield = position
            .realized_yield
            .checked_add(realized_yield)
            .ok_or(VaultError::MathOverflow)?;
        let underlying_asset = position.underlying_asset;

        self.idle_balance = self
            .idle_balance
            .checked_add(underlying_received)
            .ok_or(VaultError::MathOverflow)?;

        let deregistered = remaining == 0;
        if deregistered {
            self.registry.deregister(&vault_token)?;
            if let Some(closed) = self.positions.remove(&vault_token) {
                self.retired_yield = self
                    .retired_yield
                    .checked_add(closed.realized_yield)
                    .ok_or(VaultError::MathOverflow)?;
            }
        }

        let quote_value = ctx.oracle.quote_value(&underlying_asset, underlying_received)?;

        msg!(
            "Withdrew {} vault tokens from {} for {} underlying",
            amount,
            vault_token,
            underlying_received
        );

        Ok(YieldWithdrawal {
            vault_token,
            vault_token_burned: amount,
            underlying_asset,
            underlying_received,
            quote_value,
            realized_yield,
            deregistered,
        })
    }
}
