use std::{cell::Cell, collections::BTreeMap, rc::Rc};

use anchor_lang::prelude::{ProgramError, Pubkey, Result};
use fuzz_accounts::*;
use svs_yield::{
    constants::MAX_AMOUNT, Approvals, Lego, LegoBook, LegoDeposit, UnitOracle, VaultConfig,
    VaultContext, YieldVault,
};
use trident_fuzz::fuzzing::*;
mod fuzz_accounts;

const SEED_ASSETS: u64 = 1_000_000;
const START_TIME: i64 = 1_700_000_000;

/// Exchange-rate protocol: one vault token priced at `rate` underlying per whole token
#[derive(Clone)]
struct RateLego {
    id: Pubkey,
    asset: Pubkey,
    vault_token: Pubkey,
    decimals: u8,
    rate: Rc<Cell<u64>>,
    holdings: BTreeMap<Pubkey, u64>,
}

impl RateLego {
    fn unit(&self) -> u128 {
        10u128.pow(self.decimals as u32)
    }
}

impl Lego for RateLego {
    fn lego_id(&self) -> Pubkey {
        self.id
    }

    fn deposit_for_yield(
        &mut self,
        _asset: &Pubkey,
        amount: u64,
        _vault_token: &Pubkey,
        _extra_data: &[u8],
        recipient: &Pubkey,
    ) -> Result<LegoDeposit> {
        let tokens = (amount as u128 * self.unit() / self.rate.get() as u128) as u64;
        *self.holdings.entry(*recipient).or_insert(0) += tokens;
        Ok(LegoDeposit {
            asset_deposited: amount,
            vault_tokens_received: tokens,
        })
    }

    fn withdraw_from_yield(
        &mut self,
        vault_token: &Pubkey,
        amount: u64,
        recipient: &Pubkey,
    ) -> Result<u64> {
        let held = self.holdings.get(recipient).copied().unwrap_or(0);
        if amount > held {
            return Err(ProgramError::InsufficientFunds.into());
        }
        self.holdings.insert(*recipient, held - amount);
        self.get_underlying_amount(vault_token, amount)
    }

    fn get_underlying_amount(&self, _vault_token: &Pubkey, vault_token_balance: u64) -> Result<u64> {
        Ok((vault_token_balance as u128 * self.rate.get() as u128 / self.unit()) as u64)
    }

    fn get_vault_token_amount(
        &self,
        _asset: &Pubkey,
        underlying_amount: u64,
        _vault_token: &Pubkey,
    ) -> Result<u64> {
        Ok((underlying_amount as u128 * self.unit() / self.rate.get() as u128) as u64)
    }

    fn is_rebasing(&self) -> bool {
        false
    }

    fn balance_of(&self, _vault_token: &Pubkey, holder: &Pubkey) -> Result<u64> {
        Ok(self.holdings.get(holder).copied().unwrap_or(0))
    }

    fn vault_token_decimals(&self, _vault_token: &Pubkey) -> Result<u8> {
        Ok(self.decimals)
    }

    fn underlying_asset(&self, _vault_token: &Pubkey) -> Result<Pubkey> {
        Ok(self.asset)
    }

    fn clone_box(&self) -> Box<dyn Lego> {
        Box::new(self.clone())
    }
}

struct Market {
    lego_id: Pubkey,
    vault_token: Pubkey,
    rate: Rc<Cell<u64>>,
}

/// Live vault plus the share price observed after the last user flow
struct VaultTracker {
    vault: Option<YieldVault>,
    legos: LegoBook,
    approvals: Approvals,
    oracle: UnitOracle,
    now: i64,
    authority: Pubkey,
    manager: Pubkey,
    users: Vec<Pubkey>,
    markets: Vec<Market>,
    /// (total_assets, total_supply) after the last user flow
    last_price: (u64, u64),
}

impl Default for VaultTracker {
    fn default() -> Self {
        Self {
            vault: None,
            legos: LegoBook::default(),
            approvals: Approvals::default(),
            oracle: UnitOracle,
            now: START_TIME,
            authority: Pubkey::new_unique(),
            manager: Pubkey::new_unique(),
            users: (0..3).map(|_| Pubkey::new_unique()).collect(),
            markets: Vec::new(),
            last_price: (0, 0),
        }
    }
}

impl VaultTracker {
    fn run<T>(
        &mut self,
        caller: Pubkey,
        op: impl FnOnce(&mut YieldVault, &mut VaultContext<'_>) -> Result<T>,
    ) -> Option<Result<T>> {
        let vault = self.vault.as_mut()?;
        let mut ctx = VaultContext {
            caller,
            now: self.now,
            legos: &mut self.legos,
            approvals: &self.approvals,
            oracle: &self.oracle,
        };
        Some(op(vault, &mut ctx))
    }

    fn price(&self) -> (u64, u64) {
        match &self.vault {
            Some(vault) => (
                vault.total_assets(&self.legos).unwrap(),
                vault.shares.total_supply(),
            ),
            None => (0, 0),
        }
    }

    fn random_user(&self) -> Pubkey {
        self.users[rand::random::<usize>() % self.users.len()]
    }

    fn random_market(&self) -> Option<&Market> {
        if self.markets.is_empty() {
            return None;
        }
        Some(&self.markets[rand::random::<usize>() % self.markets.len()])
    }
}

#[derive(FuzzTestMethods)]
struct FuzzTest {
    trident: Trident,
    fuzz_accounts: AccountAddresses,
    vault_tracker: VaultTracker,
}

#[flow_executor]
impl FuzzTest {
    fn new() -> Self {
        Self {
            trident: Trident::default(),
            fuzz_accounts: AccountAddresses::default(),
            vault_tracker: VaultTracker::default(),
        }
    }

    #[init]
    fn start(&mut self) {
        self.vault_tracker = VaultTracker::default();
        let tracker = &mut self.vault_tracker;
        let base_asset = Pubkey::new_unique();

        let vault = YieldVault::initialize(
            Pubkey::new_unique(),
            tracker.authority,
            base_asset,
            VaultConfig::default(),
            SEED_ASSETS,
        )
        .unwrap();
        tracker.approvals.callers.insert(tracker.manager);

        for decimals in [6u8, 8, 9] {
            let rate = Rc::new(Cell::new(10u64.pow(decimals as u32)));
            let market = Market {
                lego_id: Pubkey::new_unique(),
                vault_token: Pubkey::new_unique(),
                rate: rate.clone(),
            };
            tracker.legos.insert(Box::new(RateLego {
                id: market.lego_id,
                asset: base_asset,
                vault_token: market.vault_token,
                decimals,
                rate,
                holdings: BTreeMap::new(),
            }));
            tracker.approvals.legos.insert(market.lego_id);
            tracker.approvals.vault_tokens.insert(market.vault_token);
            tracker.markets.push(market);
        }

        tracker.vault = Some(vault);
        tracker.last_price = tracker.price();
    }

    /// Deposit fuzzed assets for a random user
    #[flow]
    fn flow_deposit(&mut self) {
        let tracker = &mut self.vault_tracker;
        let user = tracker.random_user();
        let assets = (rand::random::<u64>() % 1_000_000_000_000).max(1);

        if let Some(Ok(shares)) = tracker.run(user, |vault, ctx| vault.deposit(ctx, assets, user, 0)) {
            assert!(shares > 0, "Invariant: accepted deposit must mint shares");
        }
        self.check_share_price();
    }

    /// Redeem a fuzzed fraction of a random user's shares
    #[flow]
    fn flow_redeem(&mut self) {
        let tracker = &mut self.vault_tracker;
        let user = tracker.random_user();
        let Some(balance) = tracker.vault.as_ref().map(|v| v.share_balance(&user)) else {
            return;
        };
        if balance == 0 {
            return;
        }
        let shares = (rand::random::<u64>() % balance).max(1);
        let (total_before, supply_before) = tracker.price();

        if let Some(Ok(assets)) =
            tracker.run(user, |vault, ctx| vault.redeem(ctx, shares, user, user, 0))
        {
            // Floor rounding: never more than the pro-rata claim
            let claim = shares as u128 * total_before as u128 / supply_before as u128;
            assert!(assets as u128 <= claim, "Invariant: redeem paid above pro-rata");
        }
        self.check_share_price();
    }

    /// Withdraw fuzzed assets, burning ceiling shares
    #[flow]
    fn flow_withdraw(&mut self) {
        let tracker = &mut self.vault_tracker;
        let user = tracker.random_user();
        let assets = (rand::random::<u64>() % 1_000_000_000).max(1);
        let _ = tracker.run(user, |vault, ctx| {
            vault.withdraw(ctx, assets, user, user, u64::MAX)
        });
        self.check_share_price();
    }

    /// Deploy a fuzzed share of idle into a random market
    #[flow]
    fn flow_deposit_for_yield(&mut self) {
        let tracker = &mut self.vault_tracker;
        let manager = tracker.manager;
        let Some(market) = tracker.random_market() else {
            return;
        };
        let (lego_id, vault_token) = (market.lego_id, market.vault_token);
        let amount = if rand::random::<bool>() {
            MAX_AMOUNT
        } else {
            (rand::random::<u64>() % 1_000_000_000_000).max(1)
        };
        let Some(asset) = tracker.vault.as_ref().map(|v| v.state.base_asset) else {
            return;
        };

        let _ = tracker.run(manager, |vault, ctx| {
            vault.deposit_for_yield(ctx, lego_id, asset, vault_token, amount, &[])
        });
        self.reset_share_price();
    }

    /// Pull a fuzzed amount out of a random market
    #[flow]
    fn flow_withdraw_from_yield(&mut self) {
        let tracker = &mut self.vault_tracker;
        let manager = tracker.manager;
        let Some(market) = tracker.random_market() else {
            return;
        };
        let (lego_id, vault_token) = (market.lego_id, market.vault_token);
        let amount = if rand::random::<bool>() {
            MAX_AMOUNT
        } else {
            (rand::random::<u64>() % 1_000_000_000_000).max(1)
        };

        let _ = tracker.run(manager, |vault, ctx| {
            vault.withdraw_from_yield(ctx, lego_id, vault_token, amount)
        });
        self.reset_share_price();
    }

    /// Market gains up to 10% and time moves forward
    #[flow]
    fn flow_accrue_yield(&mut self) {
        let tracker = &mut self.vault_tracker;
        if let Some(market) = tracker.random_market() {
            let bps = rand::random::<u64>() % 1_000;
            market.rate.set(market.rate.get() * (10_000 + bps) / 10_000);
        }
        tracker.now += (rand::random::<u64>() % 7_200) as i64;
        self.check_share_price();
    }

    #[end]
    fn end(&mut self) {
        let tracker = &self.vault_tracker;
        let Some(vault) = &tracker.vault else {
            return;
        };

        // Invariant: total assets are idle plus every position valued through its Lego
        let mut valued = vault.state.idle_balance;
        for position in vault.positions() {
            let lego = tracker.legos.get(&position.lego_id).unwrap();
            let balance = lego
                .balance_of(&position.vault_token, &vault.state.address)
                .unwrap();
            assert!(balance > 0, "Invariant: registered position must hold vault tokens");
            assert_eq!(balance, position.balance, "Invariant: tracked balance drifted");
            valued += lego.get_underlying_amount(&position.vault_token, balance).unwrap();
        }
        assert_eq!(vault.total_assets(&tracker.legos).unwrap(), valued);

        // Invariant: registry and position map describe the same set
        assert_eq!(vault.state.registry.count(), vault.positions().count());
        assert_eq!(vault.state.registry.num_slots(), vault.state.registry.count() + 1);
        assert!(!vault.state.locked, "Invariant: vault left locked");
    }

    /// Share price may only rise across user flows and yield accrual.
    ///
    /// Pulling from a position can lose one unit of Lego rounding per market.
    fn check_share_price(&mut self) {
        let (total, supply) = self.vault_tracker.price();
        let (last_total, last_supply) = self.vault_tracker.last_price;
        let slack = self.vault_tracker.markets.len() as u128;
        if supply > 0 && last_supply > 0 {
            assert!(
                (total as u128 + slack) * last_supply as u128 >= last_total as u128 * supply as u128,
                "Invariant: share price decreased"
            );
        }
        self.vault_tracker.last_price = (total, supply);
    }

    /// Lego conversions round down, so yield moves re-baseline the share price
    fn reset_share_price(&mut self) {
        self.vault_tracker.last_price = self.vault_tracker.price();
    }
}

fn main() {
    // Run 1000 iterations with up to 100 flows per iteration
    FuzzTest::fuzz(1000, 100);
}
