//! Profile records in both schema versions.

use soroban_sdk::{contracttype, Address, Env, Map, String, Symbol, Vec};

/// Rank assigned to freshly created or migrated profiles.
pub const DEFAULT_RANK: u64 = 50;

/// Legacy profile record.
///
/// Only read by the migration gate; nothing mutates a V1 record except
/// `setidhash` and the removal cascade.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ProfileV1 {
    pub account: Address,
    pub idhash: String,
    pub id_expiration: String,
    pub gft_balance: i128,
    pub staked_balance: i128,
    pub unstaking_balance: i128,
}

/// Current profile record.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ProfileV2 {
    /// Owning account.
    pub account: Address,

    /// Hash of the identity document checked off-chain.
    pub idhash: String,

    /// Expiration of the identity document.
    pub id_expiration: String,

    /// Link to public profile information.
    pub info_url: String,

    /// Liquid balance; mirrors the spendable part of the token table.
    pub gft_balance: i128,

    /// Balance locked by `stake`.
    pub staked_balance: i128,

    /// Balance released by `request_unstake` and awaiting completion.
    pub unstaking_balance: i128,

    /// Purchases minus sales reported by the order book.
    pub net_purchases: i128,

    /// Accounts that voted to promote this profile.
    pub promotion_votes: Vec<Address>,

    /// Accounts this profile voted to promote.
    pub voted_for: Vec<Address>,

    /// Free-form attributes with unique keys.
    pub attributes: Map<Symbol, String>,

    /// Reputation tier; lower is stronger, 0 means unset.
    pub rank: u64,

    /// Ledger timestamp of creation.
    pub created_at: u64,

    /// Ledger timestamp of the last modification.
    pub updated_at: u64,
}

impl ProfileV2 {
    /// Create a zero-balance profile.
    pub fn new(env: &Env, account: Address, idhash: String, id_expiration: String, now: u64) -> Self {
        Self {
            account,
            idhash,
            id_expiration,
            info_url: String::from_str(env, ""),
            gft_balance: 0,
            staked_balance: 0,
            unstaking_balance: 0,
            net_purchases: 0,
            promotion_votes: Vec::new(env),
            voted_for: Vec::new(env),
            attributes: Map::new(env),
            rank: DEFAULT_RANK,
            created_at: now,
            updated_at: now,
        }
    }

    /// Carry a legacy record forward. Creation time is the migration time.
    pub fn from_legacy(env: &Env, legacy: ProfileV1, now: u64) -> Self {
        let mut profile = Self::new(env, legacy.account, legacy.idhash, legacy.id_expiration, now);
        profile.gft_balance = legacy.gft_balance;
        profile.staked_balance = legacy.staked_balance;
        profile.unstaking_balance = legacy.unstaking_balance;
        profile
    }

    /// Sum of all three buckets.
    pub fn total_balance(&self) -> i128 {
        self.gft_balance + self.staked_balance + self.unstaking_balance
    }

    pub fn touch(&mut self, now: u64) {
        self.updated_at = now;
    }
}
