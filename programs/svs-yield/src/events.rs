use anchor_lang::prelude::*;

#[event]
pub struct VaultInitialized {
    pub vault: Pubkey,
    pub authority: Pubkey,
    pub base_asset: Pubkey,
    pub seed_assets: u64,
}

#[event]
pub struct Deposit {
    pub vault: Pubkey,
    pub caller: Pubkey,
    pub owner: Pubkey,
    pub assets: u64,
    pub shares: u64,
}

#[event]
pub struct Withdraw {
    pub vault: Pubkey,
    pub caller: Pubkey,
    pub receiver: Pubkey,
    pub owner: Pubkey,
    pub assets: u64,
    pub shares: u64,
}

#[event]
pub struct YieldDeposited {
    pub vault: Pubkey,
    pub lego_id: Pubkey,
    pub vault_token: Pubkey,
    pub asset_deposited: u64,
    pub vault_tokens_received: u64,
    pub quote_value: u64,
}

#[event]
pub struct YieldWithdrawn {
    pub vault: Pubkey,
    pub vault_token: Pubkey,
    pub vault_token_burned: u64,
    pub underlying_received: u64,
    pub quote_value: u64,
    pub realized_yield: u64,
}

#[event]
pub struct YieldRebalanced {
    pub vault: Pubkey,
    pub from_vault_token: Pubkey,
    pub to_vault_token: Pubkey,
    pub underlying_moved: u64,
}

#[event]
pub struct PositionRegistered {
    pub vault: Pubkey,
    pub vault_token: Pubkey,
    pub lego_id: Pubkey,
}

#[event]
pub struct PositionDeregistered {
    pub vault: Pubkey,
    pub vault_token: Pubkey,
}

#[event]
pub struct VaultStatusChanged {
    pub vault: Pubkey,
    pub paused: bool,
}

#[event]
pub struct AuthorityTransferred {
    pub vault: Pubkey,
    pub previous_authority: Pubkey,
    pub new_authority: Pubkey,
}
