//! Process-wide ledger state and token statistics.

use soroban_sdk::{contracttype, Address, Symbol};

/// Default delay between an unstake request and its release (7 days).
pub const DEFAULT_UNSTAKE_DELAY: u64 = 7 * 24 * 60 * 60;

/// Supply bookkeeping for the ledger's single token.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TokenStats {
    /// Currency symbol shared by every balance bucket.
    pub symbol: Symbol,

    /// Total amount in circulation.
    pub supply: i128,

    /// Account allowed to issue and retire.
    pub issuer: Address,
}

/// Counters and switches shared by every operation.
///
/// Created once at genesis by `init`, then loaded and written back by the
/// operations that touch it.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LedgerState {
    /// Number of token-table entries created for non-issuer accounts.
    pub account_count: u32,

    /// When set, every permitted activity is rejected.
    pub paused: bool,

    /// Seconds between `request_unstake` and the earliest `complete_unstake`.
    pub unstake_delay: u64,
}

impl LedgerState {
    pub fn genesis() -> Self {
        Self {
            account_count: 0,
            paused: false,
            unstake_delay: DEFAULT_UNSTAKE_DELAY,
        }
    }
}

/// A delayed unstake waiting for its release time.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PendingUnstake {
    pub amount: i128,
    pub release_at: u64,
}
