use anchor_lang::prelude::*;

use crate::error::VaultError;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Rounding {
    Floor,
    Ceiling,
}

/// Convert assets to shares against the vault's live totals.
///
/// Formula: shares = assets × total_shares / total_assets
///
/// An empty share supply converts 1:1. The vault is seeded at initialization,
/// so an empty supply only occurs before the seed deposit lands.
pub fn convert_to_shares(
    assets: u64,
    total_assets: u64,
    total_shares: u64,
    rounding: Rounding,
) -> Result<u64> {
    if total_shares == 0 {
        return Ok(assets);
    }
    mul_div(assets, total_shares, total_assets, rounding)
}

/// Convert shares to assets against the vault's live totals.
///
/// Formula: assets = shares × total_assets / total_shares
pub fn convert_to_assets(
    shares: u64,
    total_assets: u64,
    total_shares: u64,
    rounding: Rounding,
) -> Result<u64> {
    if total_shares == 0 {
        return Ok(shares);
    }
    mul_div(shares, total_assets, total_shares, rounding)
}

/// Safe multiplication then division with configurable rounding.
///
/// Computes: (value × numerator) / denominator
/// Uses u128 intermediate to prevent overflow.
pub fn mul_div(value: u64, numerator: u64, denominator: u64, rounding: Rounding) -> Result<u64> {
    let result = mul_div_u128(value as u128, numerator as u128, denominator as u128, rounding)?;
    u64::try_from(result).map_err(|_| error!(VaultError::MathOverflow))
}

fn mul_div_u128(value: u128, numerator: u128, denominator: u128, rounding: Rounding) -> Result<u128> {
    require!(denominator > 0, VaultError::DivisionByZero);

    let product = value
        .checked_mul(numerator)
        .ok_or(VaultError::MathOverflow)?;

    let quotient = product / denominator;
    match rounding {
        Rounding::Floor => Ok(quotient),
        Rounding::Ceiling if product % denominator != 0 => quotient
            .checked_add(1)
            .ok_or_else(|| error!(VaultError::MathOverflow)),
        Rounding::Ceiling => Ok(quotient),
    }
}

/// One whole vault token expressed in base units.
pub fn unit(decimals: u8) -> Result<u64> {
    10u64
        .checked_pow(decimals as u32)
        .ok_or_else(|| error!(VaultError::MathOverflow))
}

/// Underlying paid per whole vault token (`10^decimals` base units), floor rounded.
pub fn price_per_share(underlying: u64, vault_tokens: u64, decimals: u8) -> Result<u64> {
    mul_div(underlying, unit(decimals)?, vault_tokens, Rounding::Floor)
}

/// Underlying value of `vault_tokens` at `price_per_share`.
pub fn value_at_price(
    vault_tokens: u64,
    price_per_share: u64,
    decimals: u8,
    rounding: Rounding,
) -> Result<u64> {
    mul_div(vault_tokens, price_per_share, unit(decimals)?, rounding)
}

/// Blend of two prices weighted by the share counts behind them.
///
/// Computes: (a × weight_a + b × weight_b) / (weight_a + weight_b), floor rounded.
pub fn weighted_average(a: u64, weight_a: u64, b: u64, weight_b: u64) -> Result<u64> {
    let total_weight = (weight_a as u128)
        .checked_add(weight_b as u128)
        .ok_or(VaultError::MathOverflow)?;
    require!(total_weight > 0, VaultError::DivisionByZero);

    let weighted_sum = (a as u128)
        .checked_mul(weight_a as u128)
        .and_then(|lhs| (b as u128).checked_mul(weight_b as u128).map(|rhs| (lhs, rhs)))
        .and_then(|(lhs, rhs)| lhs.checked_add(rhs))
        .ok_or(VaultError::MathOverflow)?;

    let result = mul_div_u128(weighted_sum, 1, total_weight, Rounding::Floor)?;
    u64::try_from(result).map_err(|_| error!(VaultError::MathOverflow))
}
