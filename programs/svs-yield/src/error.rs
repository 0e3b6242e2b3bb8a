use anchor_lang::prelude::*;

#[error_code]
pub enum VaultError {
    #[msg("Amount must be greater than zero")]
    ZeroAmount,

    #[msg("Operation would mint or burn zero shares")]
    ZeroShares,

    #[msg("Slippage tolerance exceeded")]
    SlippageExceeded,

    #[msg("Vault is paused")]
    VaultPaused,

    #[msg("Arithmetic overflow")]
    MathOverflow,

    #[msg("Division by zero")]
    DivisionByZero,

    #[msg("Insufficient shares balance")]
    InsufficientShares,

    #[msg("Insufficient share allowance for caller")]
    InsufficientAllowance,

    #[msg("Insufficient assets in vault")]
    InsufficientAssets,

    #[msg("Unauthorized - caller lacks the required capability")]
    Unauthorized,

    #[msg("Deposit amount below minimum threshold")]
    DepositTooSmall,

    #[msg("Receiver must not be the default address")]
    InvalidReceiver,

    #[msg("Asset does not match the vault base asset")]
    InvalidAsset,

    #[msg("Vault configuration is invalid")]
    InvalidConfig,

    #[msg("No balance available for this operation")]
    NoBalance,

    #[msg("Protocol is not an approved and available Lego")]
    InvalidProtocol,

    #[msg("Vault token is not approved")]
    InvalidVaultToken,

    #[msg("Yield position already registered")]
    AlreadyRegistered,

    #[msg("Yield position not registered")]
    NotRegistered,

    #[msg("Yield position registry is full")]
    RegistryFull,

    #[msg("Vault operation already in progress")]
    Reentrancy,

    #[msg("Lego returned an inconsistent result")]
    AdapterMisbehaved,
}
