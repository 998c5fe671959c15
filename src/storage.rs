//! Storage key definitions and typed accessors for the ledger tables.

use soroban_sdk::{contracttype, Address, Env, Map, Vec};

use crate::profile::{ProfileV1, ProfileV2};
use crate::state::{LedgerState, TokenStats};
use crate::LedgerError;

/// Storage keys for the reputation ledger.
///
/// Singletons live in instance storage; every per-account table and
/// secondary index lives in persistent storage.
#[contracttype]
#[derive(Clone, Debug)]
pub enum LedgerKey {
    /// Contract administrator and token issuer.
    Admin,

    /// Optional second principal allowed to set ranks.
    RankManager,

    /// Token symbol and supply.
    TokenStats,

    /// Process-wide counters and switches.
    State,

    /// Legacy profile table.
    ProfileV1(Address),

    /// Current profile table.
    ProfileV2(Address),

    /// Token balance table.
    Balance(Address),

    /// Secondary index: rank -> number of V2 profiles at that rank.
    RankIndex,

    /// Verification edges by id.
    Verification(u64),

    /// Next free verification id.
    NextVerificationId,

    /// Secondary index: verifier -> verification ids.
    VerifierIndex(Address),

    /// Secondary index: verified account -> verification ids.
    VerifiedIndex(Address),

    /// Referral edge keyed by the referred account.
    Referral(Address),

    /// Secondary index: referrer -> referred accounts.
    ReferrerIndex(Address),

    /// Pending delayed unstake for an account.
    PendingUnstake(Address),

    /// Accounts locked out of activity.
    Lock(Address),
}

/// Time-to-live for ledger data in ledger entries.
pub const LEDGER_TTL_THRESHOLD: u32 = 518400; // ~30 days
pub const LEDGER_TTL_EXTEND: u32 = 2592000; // ~150 days

fn bump(env: &Env, key: &LedgerKey) {
    env.storage()
        .persistent()
        .extend_ttl(key, LEDGER_TTL_THRESHOLD, LEDGER_TTL_EXTEND);
}

// ========== Instance singletons ==========

pub fn read_admin(env: &Env) -> Result<Address, LedgerError> {
    env.storage()
        .instance()
        .get(&LedgerKey::Admin)
        .ok_or(LedgerError::NotInitialized)
}

pub fn read_rank_manager(env: &Env) -> Option<Address> {
    env.storage().instance().get(&LedgerKey::RankManager)
}

pub fn write_rank_manager(env: &Env, manager: &Address) {
    env.storage().instance().set(&LedgerKey::RankManager, manager);
}

pub fn read_stats(env: &Env) -> Result<TokenStats, LedgerError> {
    env.storage()
        .instance()
        .get(&LedgerKey::TokenStats)
        .ok_or(LedgerError::NotInitialized)
}

pub fn write_stats(env: &Env, stats: &TokenStats) {
    env.storage().instance().set(&LedgerKey::TokenStats, stats);
}

pub fn read_state(env: &Env) -> Result<LedgerState, LedgerError> {
    env.storage()
        .instance()
        .get(&LedgerKey::State)
        .ok_or(LedgerError::NotInitialized)
}

pub fn write_state(env: &Env, state: &LedgerState) {
    env.storage().instance().set(&LedgerKey::State, state);
}

// ========== Profile tables ==========

pub fn read_v1(env: &Env, account: &Address) -> Option<ProfileV1> {
    env.storage()
        .persistent()
        .get(&LedgerKey::ProfileV1(account.clone()))
}

pub fn write_v1(env: &Env, profile: &ProfileV1) {
    let key = LedgerKey::ProfileV1(profile.account.clone());
    env.storage().persistent().set(&key, profile);
    bump(env, &key);
}

pub fn remove_v1(env: &Env, account: &Address) {
    env.storage()
        .persistent()
        .remove(&LedgerKey::ProfileV1(account.clone()));
}

pub fn has_v1(env: &Env, account: &Address) -> bool {
    env.storage()
        .persistent()
        .has(&LedgerKey::ProfileV1(account.clone()))
}

pub fn read_v2(env: &Env, account: &Address) -> Option<ProfileV2> {
    env.storage()
        .persistent()
        .get(&LedgerKey::ProfileV2(account.clone()))
}

pub fn write_v2(env: &Env, profile: &ProfileV2) {
    let key = LedgerKey::ProfileV2(profile.account.clone());
    env.storage().persistent().set(&key, profile);
    bump(env, &key);
}

pub fn remove_v2(env: &Env, account: &Address) {
    env.storage()
        .persistent()
        .remove(&LedgerKey::ProfileV2(account.clone()));
}

pub fn has_v2(env: &Env, account: &Address) -> bool {
    env.storage()
        .persistent()
        .has(&LedgerKey::ProfileV2(account.clone()))
}

// ========== Token balances ==========

/// Raw token-table balance; `None` when no entry was ever created.
pub fn read_balance(env: &Env, account: &Address) -> Option<i128> {
    env.storage()
        .persistent()
        .get(&LedgerKey::Balance(account.clone()))
}

pub fn write_balance(env: &Env, account: &Address, amount: i128) {
    let key = LedgerKey::Balance(account.clone());
    env.storage().persistent().set(&key, &amount);
    bump(env, &key);
}

pub fn remove_balance(env: &Env, account: &Address) {
    env.storage()
        .persistent()
        .remove(&LedgerKey::Balance(account.clone()));
}

// ========== Rank index ==========

pub fn read_rank_index(env: &Env) -> Map<u64, u32> {
    env.storage()
        .persistent()
        .get(&LedgerKey::RankIndex)
        .unwrap_or_else(|| Map::new(env))
}

pub fn write_rank_index(env: &Env, index: &Map<u64, u32>) {
    env.storage().persistent().set(&LedgerKey::RankIndex, index);
    bump(env, &LedgerKey::RankIndex);
}

// ========== List-valued index entries ==========

pub fn read_ids(env: &Env, key: &LedgerKey) -> Vec<u64> {
    env.storage()
        .persistent()
        .get(key)
        .unwrap_or_else(|| Vec::new(env))
}

/// Write an id list, removing the entry entirely once empty.
pub fn write_ids(env: &Env, key: &LedgerKey, ids: &Vec<u64>) {
    if ids.is_empty() {
        env.storage().persistent().remove(key);
    } else {
        env.storage().persistent().set(key, ids);
        bump(env, key);
    }
}

pub fn read_addresses(env: &Env, key: &LedgerKey) -> Vec<Address> {
    env.storage()
        .persistent()
        .get(key)
        .unwrap_or_else(|| Vec::new(env))
}

/// Write an address list, removing the entry entirely once empty.
pub fn write_addresses(env: &Env, key: &LedgerKey, accounts: &Vec<Address>) {
    if accounts.is_empty() {
        env.storage().persistent().remove(key);
    } else {
        env.storage().persistent().set(key, accounts);
        bump(env, key);
    }
}

pub fn write_entry<V>(env: &Env, key: &LedgerKey, value: &V)
where
    V: soroban_sdk::IntoVal<Env, soroban_sdk::Val>,
{
    env.storage().persistent().set(key, value);
    bump(env, key);
}

pub fn remove_entry(env: &Env, key: &LedgerKey) {
    env.storage().persistent().remove(key);
}
