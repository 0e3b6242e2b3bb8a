pub mod admin;
pub mod approve;
pub mod deposit;
pub mod deposit_for_yield;
pub mod initialize;
pub mod mint;
pub mod rebalance;
pub mod redeem;
pub mod view;
pub mod withdraw;
pub mod withdraw_from_yield;
