/// Account storage slot of the fuzz test.
///
/// The vault under test is an in-process library, so every key lives on
/// `VaultTracker` and no on-chain addresses are stored here.
///
/// Docs: https://ackee.xyz/trident/docs/latest/trident-api-macro/trident-types/fuzz-accounts/
#[derive(Default)]
pub struct AccountAddresses {}
