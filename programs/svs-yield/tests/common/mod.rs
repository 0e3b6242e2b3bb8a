#![allow(dead_code)]

use std::{
    cell::Cell,
    collections::BTreeMap,
    rc::Rc,
};

use anchor_lang::prelude::*;
use svs_yield::{
    Approvals, Lego, LegoBook, LegoDeposit, UnitOracle, VaultConfig, VaultContext, VaultError,
    YieldDeposit, YieldVault, YieldWithdrawal,
};

pub const SEED: u64 = 1_000_000;
pub const REBASE_SCALE: u64 = 1_000_000;

/// Knobs shared between a test and its mock protocol.
///
/// They model market state outside the vault, so checkpoints do not restore them.
#[derive(Clone)]
pub struct LegoHandle {
    pub lego_id: Pubkey,
    pub vault_token: Pubkey,
    /// Underlying per whole vault token, or the rebase index for rebasing tokens
    pub rate: Rc<Cell<u64>>,
    pub fail: Rc<Cell<bool>>,
    /// Cap on underlying a single deposit consumes (0 = no cap)
    pub take_limit: Rc<Cell<u64>>,
}

impl LegoHandle {
    /// Scale the exchange rate (or rebase index) by `bps` / 10_000
    pub fn accrue(&self, bps: u64) {
        self.rate.set(self.rate.get() * (10_000 + bps) / 10_000);
    }
}

/// In-memory yield protocol with one vault token
#[derive(Clone)]
pub struct MockLego {
    id: Pubkey,
    asset: Pubkey,
    vault_token: Pubkey,
    rebasing: bool,
    decimals: u8,
    rate: Rc<Cell<u64>>,
    fail: Rc<Cell<bool>>,
    take_limit: Rc<Cell<u64>>,
    /// holder -> vault tokens (non-rebasing) or rebase-neutral units (rebasing)
    holdings: BTreeMap<Pubkey, u64>,
}

impl MockLego {
    fn unit(&self) -> u64 {
        10u64.pow(self.decimals as u32)
    }

    fn check_token(&self, vault_token: &Pubkey) -> Result<()> {
        if *vault_token != self.vault_token {
            return Err(ProgramError::InvalidArgument.into());
        }
        Ok(())
    }

    fn held(&self, holder: &Pubkey) -> u64 {
        self.holdings.get(holder).copied().unwrap_or(0)
    }

    fn to_balance(&self, raw: u64) -> u64 {
        if self.rebasing {
            (raw as u128 * self.rate.get() as u128 / REBASE_SCALE as u128) as u64
        } else {
            raw
        }
    }
}

impl Lego for MockLego {
    fn lego_id(&self) -> Pubkey {
        self.id
    }

    fn deposit_for_yield(
        &mut self,
        asset: &Pubkey,
        amount: u64,
        vault_token: &Pubkey,
        _extra_data: &[u8],
        recipient: &Pubkey,
    ) -> Result<LegoDeposit> {
        self.check_token(vault_token)?;
        if self.fail.get() || *asset != self.asset {
            return Err(ProgramError::InvalidArgument.into());
        }
        let limit = self.take_limit.get();
        let taken = if limit > 0 { amount.min(limit) } else { amount };

        let (raw, received) = if self.rebasing {
            let raw = (taken as u128 * REBASE_SCALE as u128 / self.rate.get() as u128) as u64;
            (raw, self.to_balance(raw))
        } else {
            let tokens = (taken as u128 * self.unit() as u128 / self.rate.get() as u128) as u64;
            (tokens, tokens)
        };
        *self.holdings.entry(*recipient).or_insert(0) += raw;

        Ok(LegoDeposit {
            asset_deposited: taken,
            vault_tokens_received: received,
        })
    }

    fn withdraw_from_yield(
        &mut self,
        vault_token: &Pubkey,
        amount: u64,
        recipient: &Pubkey,
    ) -> Result<u64> {
        self.check_token(vault_token)?;
        if self.fail.get() {
            return Err(ProgramError::InvalidArgument.into());
        }
        let held = self.held(recipient);
        let balance = self.to_balance(held);
        if amount > balance {
            return err!(VaultError::InsufficientAssets);
        }

        if self.rebasing {
            let burned = if amount == balance {
                held
            } else {
                let rate = self.rate.get() as u128;
                ((amount as u128 * REBASE_SCALE as u128 + rate - 1) / rate).min(held as u128) as u64
            };
            self.holdings.insert(*recipient, held - burned);
            Ok(amount)
        } else {
            self.holdings.insert(*recipient, held - amount);
            Ok(self.get_underlying_amount(vault_token, amount)?)
        }
    }

    fn get_underlying_amount(&self, vault_token: &Pubkey, vault_token_balance: u64) -> Result<u64> {
        self.check_token(vault_token)?;
        if self.rebasing {
            return Ok(vault_token_balance);
        }
        Ok((vault_token_balance as u128 * self.rate.get() as u128 / self.unit() as u128) as u64)
    }

    fn get_vault_token_amount(
        &self,
        _asset: &Pubkey,
        underlying_amount: u64,
        vault_token: &Pubkey,
    ) -> Result<u64> {
        self.check_token(vault_token)?;
        if self.rebasing {
            return Ok(underlying_amount);
        }
        Ok((underlying_amount as u128 * self.unit() as u128 / self.rate.get() as u128) as u64)
    }

    fn is_rebasing(&self) -> bool {
        self.rebasing
    }

    fn balance_of(&self, vault_token: &Pubkey, holder: &Pubkey) -> Result<u64> {
        self.check_token(vault_token)?;
        Ok(self.to_balance(self.held(holder)))
    }

    fn vault_token_decimals(&self, vault_token: &Pubkey) -> Result<u8> {
        self.check_token(vault_token)?;
        Ok(self.decimals)
    }

    fn underlying_asset(&self, vault_token: &Pubkey) -> Result<Pubkey> {
        self.check_token(vault_token)?;
        Ok(self.asset)
    }

    fn clone_box(&self) -> Box<dyn Lego> {
        Box::new(self.clone())
    }
}

/// A seeded vault plus its collaborators
pub struct Harness {
    pub vault: YieldVault,
    pub legos: LegoBook,
    pub approvals: Approvals,
    pub oracle: UnitOracle,
    pub now: i64,
    pub authority: Pubkey,
    pub manager: Pubkey,
    pub base_asset: Pubkey,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_config(VaultConfig::default())
    }

    pub fn with_config(config: VaultConfig) -> Self {
        let authority = Pubkey::new_unique();
        let manager = Pubkey::new_unique();
        let base_asset = Pubkey::new_unique();
        let vault = YieldVault::initialize(Pubkey::new_unique(), authority, base_asset, config, SEED)
            .unwrap();

        let mut approvals = Approvals::default();
        approvals.callers.insert(manager);

        Self {
            vault,
            legos: LegoBook::default(),
            approvals,
            oracle: UnitOracle,
            now: 1_700_000_000,
            authority,
            manager,
            base_asset,
        }
    }

    /// Register and approve a mock protocol whose vault token starts at price 1.0
    pub fn add_lego(&mut self, rebasing: bool, decimals: u8) -> LegoHandle {
        let initial_rate = if rebasing {
            REBASE_SCALE
        } else {
            10u64.pow(decimals as u32)
        };
        let handle = LegoHandle {
            lego_id: Pubkey::new_unique(),
            vault_token: Pubkey::new_unique(),
            rate: Rc::new(Cell::new(initial_rate)),
            fail: Rc::new(Cell::new(false)),
            take_limit: Rc::new(Cell::new(0)),
        };
        self.legos.insert(Box::new(MockLego {
            id: handle.lego_id,
            asset: self.base_asset,
            vault_token: handle.vault_token,
            rebasing,
            decimals,
            rate: handle.rate.clone(),
            fail: handle.fail.clone(),
            take_limit: handle.take_limit.clone(),
            holdings: BTreeMap::new(),
        }));
        self.approvals.legos.insert(handle.lego_id);
        self.approvals.vault_tokens.insert(handle.vault_token);
        handle
    }

    pub fn advance(&mut self, seconds: i64) {
        self.now += seconds;
    }

    pub fn as_caller<T>(
        &mut self,
        caller: Pubkey,
        op: impl FnOnce(&mut YieldVault, &mut VaultContext<'_>) -> T,
    ) -> T {
        let mut ctx = VaultContext {
            caller,
            now: self.now,
            legos: &mut self.legos,
            approvals: &self.approvals,
            oracle: &self.oracle,
        };
        op(&mut self.vault, &mut ctx)
    }

    pub fn deposit(&mut self, user: Pubkey, assets: u64) -> Result<u64> {
        self.as_caller(user, |vault, ctx| vault.deposit(ctx, assets, user, 0))
    }

    pub fn redeem(&mut self, user: Pubkey, shares: u64) -> Result<u64> {
        self.as_caller(user, |vault, ctx| vault.redeem(ctx, shares, user, user, 0))
    }

    pub fn withdraw(&mut self, user: Pubkey, assets: u64) -> Result<u64> {
        self.as_caller(user, |vault, ctx| {
            vault.withdraw(ctx, assets, user, user, u64::MAX)
        })
    }

    pub fn deposit_for_yield(&mut self, lego: &LegoHandle, amount: u64) -> Result<YieldDeposit> {
        let manager = self.manager;
        let asset = self.base_asset;
        self.as_caller(manager, |vault, ctx| {
            vault.deposit_for_yield(ctx, lego.lego_id, asset, lego.vault_token, amount, &[])
        })
    }

    pub fn withdraw_from_yield(&mut self, lego: &LegoHandle, amount: u64) -> Result<YieldWithdrawal> {
        let manager = self.manager;
        self.as_caller(manager, |vault, ctx| {
            vault.withdraw_from_yield(ctx, lego.lego_id, lego.vault_token, amount)
        })
    }

    pub fn total_assets(&self) -> u64 {
        self.vault.total_assets(&self.legos).unwrap()
    }

    pub fn idle(&self) -> u64 {
        self.vault.state.idle_balance
    }

    /// Idle balance plus every registered position valued through its Lego
    pub fn valued_sum(&self) -> u64 {
        let mut sum = self.idle();
        for position in self.vault.positions() {
            let lego = self.legos.get(&position.lego_id).unwrap();
            let balance = lego
                .balance_of(&position.vault_token, &self.vault.state.address)
                .unwrap();
            sum += lego
                .get_underlying_amount(&position.vault_token, balance)
                .unwrap();
        }
        sum
    }
}

pub fn assert_vault_err<T: std::fmt::Debug>(result: Result<T>, expected: VaultError) {
    let err = result.unwrap_err();
    assert_eq!(err, anchor_lang::error::Error::from(expected));
}
