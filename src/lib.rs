//! # Soroban Reputation Ledger
//!
//! Token balances, staking and a rank-based reputation graph for the Soroban
//! blockchain. Features include:
//!
//! - Profiles in two schema versions, migrated on first touch
//! - A token table whose spendable part is mirrored in each profile
//! - Staking with delayed or accelerated unstaking
//! - Promotion votes and a slot-contention ranking algorithm
//! - Verification and referral edges between accounts
//! - Admin controls for ranks, locks and pausing
//!
//! ## Usage
//!
//! ```rust,ignore
//! client.init(&admin, &symbol_short!("GFT"));
//! client.create(&alice);
//! client.issue(&alice, &1_000, &memo);
//! client.stake(&alice, &400);
//! client.vote_to_promote(&bob, &alice);
//! ```
//!
//! Every entry point either commits all of its writes or returns a
//! [`LedgerError`], in which case the host discards them.

#![no_std]

mod balance;
mod edges;
mod events;
mod permit;
mod profile;
mod rank;
mod state;
mod storage;
mod store;
mod validation;

pub use edges::Verification;
pub use profile::{ProfileV1, ProfileV2, DEFAULT_RANK};
pub use rank::{best_eligible_rank, RankTier, CEILING_RANK, UNSET_RANK};
pub use state::{LedgerState, PendingUnstake, TokenStats, DEFAULT_UNSTAKE_DELAY};
pub use storage::LedgerKey;
pub use validation::{MAX_IDHASH_LENGTH, MAX_INFO_URL_LENGTH, MAX_MEMO_LENGTH};

use soroban_sdk::{contract, contracterror, contractimpl, Address, Env, String, Symbol, Vec};

use crate::events::*;

/// Error codes for the reputation ledger.
#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum LedgerError {
    /// Contract has already been initialized.
    AlreadyInitialized = 1,
    /// Contract has not been initialized.
    NotInitialized = 2,
    /// Caller lacks the required permission.
    Unauthorized = 3,
    /// Account already has a profile in either schema.
    AlreadyExists = 4,
    /// Profile, edge or pending record not found.
    NotFound = 5,
    /// Edge or vote already recorded.
    DuplicateEdge = 6,
    /// Balance lower than the requested amount.
    InsufficientFunds = 7,
    /// Unstaking balance lower than the requested amount.
    InsufficientUnstaking = 8,
    /// Account has no current-schema profile.
    ProfileNotUpgraded = 9,
    /// Token balance suffices but the liquid part does not.
    StakedFundsLocked = 10,
    /// Nobody voted for the candidate.
    NoVotes = 11,
    /// Candidate already holds the strongest rank.
    AtCeiling = 12,
    /// Votes do not improve the candidate's rank.
    InsufficientVotes = 13,
    /// Amount must be positive.
    InvalidAmount = 14,
    /// Memo is too long.
    InvalidMemo = 15,
    /// Info URL is too long.
    InvalidInfoUrl = 16,
    /// Identity hash is too long.
    InvalidIdHash = 17,
    /// Account is locked from activity.
    AccountLocked = 18,
    /// Contract is paused.
    ContractPaused = 19,
    /// Unstake release time has not been reached.
    UnstakeNotReady = 20,
    /// An account cannot vote for itself.
    SelfVote = 21,
}

#[contract]
pub struct ReputationLedger;

#[contractimpl]
impl ReputationLedger {
    // ========== Initialization ==========

    /// Initialize the ledger with its admin (also the token issuer) and the
    /// token symbol. The admin receives a profile so it can hold tokens.
    pub fn init(env: Env, admin: Address, symbol: Symbol) -> Result<(), LedgerError> {
        if env.storage().instance().has(&LedgerKey::Admin) {
            return Err(LedgerError::AlreadyInitialized);
        }

        admin.require_auth();
        env.storage().instance().set(&LedgerKey::Admin, &admin);
        storage::write_stats(
            &env,
            &TokenStats {
                symbol,
                supply: 0,
                issuer: admin.clone(),
            },
        );
        storage::write_state(&env, &LedgerState::genesis());

        let empty = String::from_str(&env, "");
        store::create(&env, &admin, empty.clone(), empty)?;
        Ok(())
    }

    /// Get the admin address.
    pub fn admin(env: Env) -> Result<Address, LedgerError> {
        storage::read_admin(&env)
    }

    pub fn state(env: Env) -> Result<LedgerState, LedgerError> {
        storage::read_state(&env)
    }

    pub fn token_stats(env: Env) -> Result<TokenStats, LedgerError> {
        storage::read_stats(&env)
    }

    /// Number of token holders other than the issuer.
    pub fn account_count(env: Env) -> Result<u32, LedgerError> {
        Ok(storage::read_state(&env)?.account_count)
    }

    // ========== Profiles ==========

    /// Create an empty profile for the calling account.
    pub fn create(env: Env, account: Address) -> Result<(), LedgerError> {
        account.require_auth();
        storage::read_admin(&env)?;

        let empty = String::from_str(&env, "");
        store::create(&env, &account, empty.clone(), empty)?;
        Ok(())
    }

    /// Create a profile carrying a checked identity hash (admin only).
    pub fn create_with_idhash(
        env: Env,
        account: Address,
        idhash: String,
        id_expiration: String,
    ) -> Result<(), LedgerError> {
        Self::require_admin(&env)?;
        store::create(&env, &account, idhash, id_expiration)?;
        Ok(())
    }

    /// Migrate a legacy profile. Safe to call for any account; returns
    /// whether a migration happened.
    pub fn upgrade(env: Env, account: Address) -> bool {
        store::upgrade(&env, &account)
    }

    pub fn exists_in_v1(env: Env, account: Address) -> bool {
        store::exists_in_v1(&env, &account)
    }

    pub fn exists_in_v2(env: Env, account: Address) -> bool {
        store::exists_in_v2(&env, &account)
    }

    pub fn exists(env: Env, account: Address) -> bool {
        store::exists(&env, &account)
    }

    /// Get a current-schema profile.
    pub fn get_profile(env: Env, account: Address) -> Option<ProfileV2> {
        storage::read_v2(&env, &account)
    }

    /// Get a legacy profile that has not been migrated yet.
    pub fn get_legacy(env: Env, account: Address) -> Option<ProfileV1> {
        storage::read_v1(&env, &account)
    }

    /// Seed a legacy profile (admin only), crediting its holdings to the
    /// token table.
    pub fn import_legacy(
        env: Env,
        account: Address,
        idhash: String,
        id_expiration: String,
        gft_balance: i128,
        staked_balance: i128,
        unstaking_balance: i128,
    ) -> Result<(), LedgerError> {
        Self::require_admin(&env)?;

        let mut state = storage::read_state(&env)?;
        let mut stats = storage::read_stats(&env)?;
        store::import_legacy(
            &env,
            &mut state,
            &mut stats,
            &account,
            idhash,
            id_expiration,
            gft_balance,
            staked_balance,
            unstaking_balance,
        )?;
        storage::write_state(&env, &state);
        storage::write_stats(&env, &stats);
        Ok(())
    }

    /// Set the identity hash in whichever schema holds the account (admin only).
    pub fn set_idhash(
        env: Env,
        account: Address,
        idhash: String,
        id_expiration: String,
    ) -> Result<(), LedgerError> {
        Self::require_admin(&env)?;
        store::set_idhash(&env, &account, idhash, id_expiration)
    }

    pub fn is_idhash_match(env: Env, account: Address, idhash: String) -> Result<bool, LedgerError> {
        store::is_idhash_match(&env, &account, &idhash)
    }

    pub fn set_info_url(env: Env, account: Address, url: String) -> Result<(), LedgerError> {
        account.require_auth();
        store::set_info_url(&env, &account, url)
    }

    pub fn set_attribute(
        env: Env,
        account: Address,
        key: Symbol,
        value: String,
    ) -> Result<(), LedgerError> {
        account.require_auth();
        store::set_attribute(&env, &account, key, value)
    }

    pub fn remove_attribute(env: Env, account: Address, key: Symbol) -> Result<(), LedgerError> {
        account.require_auth();
        store::remove_attribute(&env, &account, key)
    }

    /// Report a purchase by `account` (admin only).
    pub fn record_purchase(env: Env, account: Address, amount: i128) -> Result<(), LedgerError> {
        Self::require_admin(&env)?;
        Self::require_amount(amount)?;
        store::adjust_net_purchases(&env, &account, amount);
        Ok(())
    }

    /// Report a sale by `account` (admin only).
    pub fn record_sale(env: Env, account: Address, amount: i128) -> Result<(), LedgerError> {
        Self::require_admin(&env)?;
        Self::require_amount(amount)?;
        store::adjust_net_purchases(&env, &account, -amount);
        Ok(())
    }

    /// Remove a profile and every edge and vote referencing it (admin only).
    pub fn remove_profile(env: Env, account: Address) -> Result<(), LedgerError> {
        Self::require_admin(&env)?;
        let mut state = storage::read_state(&env)?;
        let mut stats = storage::read_stats(&env)?;
        store::remove_profile(&env, &mut state, &mut stats, &account)?;
        storage::write_stats(&env, &stats);
        storage::write_state(&env, &state);
        Ok(())
    }

    // ========== Verification and Referral ==========

    pub fn verify_user(env: Env, verifier: Address, target: Address) -> Result<u64, LedgerError> {
        verifier.require_auth();
        edges::verify_user(&env, &verifier, &target)
    }

    pub fn verifications_by(env: Env, verifier: Address) -> Vec<Verification> {
        edges::verifications_by(&env, &verifier)
    }

    pub fn verifications_of(env: Env, account: Address) -> Vec<Verification> {
        edges::verifications_of(&env, &account)
    }

    pub fn refer_user(env: Env, referrer: Address, target: Address) -> Result<(), LedgerError> {
        referrer.require_auth();
        edges::referred(&env, &referrer, &target)
    }

    pub fn get_referrer(env: Env, account: Address) -> Option<Address> {
        edges::get_referrer(&env, &account)
    }

    pub fn referrals_by(env: Env, referrer: Address) -> Vec<Address> {
        edges::referrals_by(&env, &referrer)
    }

    // ========== Token ==========

    /// Raw token-table balance, staked and unstaking funds included.
    pub fn balance(env: Env, account: Address) -> i128 {
        balance::balance_of(&env, &account)
    }

    /// Issue new tokens to `to` (admin only).
    pub fn issue(env: Env, to: Address, amount: i128, memo: String) -> Result<(), LedgerError> {
        Self::require_admin(&env)?;
        Self::require_amount(amount)?;
        Self::require_memo(&memo)?;

        let mut state = storage::read_state(&env)?;
        let mut stats = storage::read_stats(&env)?;
        stats.supply = stats
            .supply
            .checked_add(amount)
            .ok_or(LedgerError::InvalidAmount)?;
        balance::add_balance(&env, &mut state, &stats, &to, amount)?;
        storage::write_stats(&env, &stats);
        storage::write_state(&env, &state);

        emit_issued(&env, &to, amount, &memo);
        Ok(())
    }

    pub fn transfer(
        env: Env,
        from: Address,
        to: Address,
        amount: i128,
        memo: String,
    ) -> Result<(), LedgerError> {
        from.require_auth();
        Self::require_amount(amount)?;
        Self::require_memo(&memo)?;

        let mut state = storage::read_state(&env)?;
        let stats = storage::read_stats(&env)?;
        permit::require_activity(&env, &state, &from)?;
        permit::require_activity(&env, &state, &to)?;

        balance::sub_balance(&env, &from, amount)?;
        balance::add_balance(&env, &mut state, &stats, &to, amount)?;
        storage::write_state(&env, &state);

        emit_transferred(&env, &from, &to, amount, &memo);
        Ok(())
    }

    /// Take tokens out of circulation from the issuer's balance (admin only).
    pub fn retire(env: Env, amount: i128, memo: String) -> Result<(), LedgerError> {
        let admin = Self::require_admin(&env)?;
        Self::require_amount(amount)?;
        Self::require_memo(&memo)?;

        let mut stats = storage::read_stats(&env)?;
        balance::sub_balance(&env, &admin, amount)?;
        stats.supply -= amount;
        storage::write_stats(&env, &stats);

        emit_retired(&env, amount, &memo);
        Ok(())
    }

    // ========== Staking ==========

    pub fn stake(env: Env, account: Address, amount: i128) -> Result<(), LedgerError> {
        account.require_auth();
        Self::require_amount(amount)?;

        let state = storage::read_state(&env)?;
        permit::require_activity(&env, &state, &account)?;
        balance::stake(&env, &account, amount)?;
        Ok(())
    }

    /// Move staked funds to the unstaking bucket; they are released by
    /// `complete_unstake` once the unstake delay has passed.
    pub fn request_unstake(
        env: Env,
        account: Address,
        amount: i128,
    ) -> Result<PendingUnstake, LedgerError> {
        account.require_auth();
        Self::require_amount(amount)?;

        let state = storage::read_state(&env)?;
        permit::require_activity(&env, &state, &account)?;
        balance::request_unstake(&env, &state, &account, amount)
    }

    /// Release staked and unstaking funds after checking `amount` against
    /// the unstaking bucket. The whole of both buckets is released.
    pub fn unstake(env: Env, account: Address, amount: i128) -> Result<(), LedgerError> {
        account.require_auth();
        Self::require_amount(amount)?;
        balance::unstake(&env, &account, amount)?;
        Ok(())
    }

    /// Release a matured unstake request. Anyone may trigger it.
    pub fn complete_unstake(env: Env, account: Address) -> Result<(), LedgerError> {
        balance::complete_unstake(&env, &account)?;
        Ok(())
    }

    /// Release staked and unstaking funds immediately (admin only).
    pub fn accel_unstake(env: Env, account: Address) -> Result<(), LedgerError> {
        Self::require_admin(&env)?;
        balance::accel_unstake(&env, &account)?;
        Ok(())
    }

    pub fn pending_unstake(env: Env, account: Address) -> Option<PendingUnstake> {
        balance::read_pending_unstake(&env, &account)
    }

    // ========== Ranking ==========

    /// Vote for `candidate` and promote it if the vote improves its rank.
    /// Returns the candidate's new rank.
    pub fn vote_to_promote(env: Env, voter: Address, candidate: Address) -> Result<u64, LedgerError> {
        voter.require_auth();

        let state = storage::read_state(&env)?;
        permit::require_activity(&env, &state, &voter)?;
        rank::vote_to_promote(&env, &voter, &candidate)
    }

    pub fn unvote(env: Env, voter: Address, candidate: Address) -> Result<(), LedgerError> {
        voter.require_auth();
        rank::unvote(&env, &voter, &candidate)
    }

    /// Re-evaluate a candidate's rank from its current votes.
    pub fn promote_user(env: Env, account: Address) -> Result<u64, LedgerError> {
        store::upgrade(&env, &account);
        rank::promote(&env, &account)
    }

    /// Override a profile's rank (admin or rank manager only).
    pub fn set_rank(env: Env, caller: Address, account: Address, rank: u64) -> Result<(), LedgerError> {
        let admin = storage::read_admin(&env)?;
        let is_manager = storage::read_rank_manager(&env).map_or(false, |m| m == caller);
        if caller != admin && !is_manager {
            return Err(LedgerError::Unauthorized);
        }

        caller.require_auth();
        rank::set_rank(&env, &account, rank)
    }

    /// Current rank of an account. Legacy profiles report the default rank
    /// they will receive on migration.
    pub fn get_rank(env: Env, account: Address) -> Result<u64, LedgerError> {
        if let Some(profile) = storage::read_v2(&env, &account) {
            Ok(profile.rank)
        } else if store::exists_in_v1(&env, &account) {
            Ok(DEFAULT_RANK)
        } else {
            Err(LedgerError::NotFound)
        }
    }

    /// For rank 0, the strongest rank held; otherwise the closest held rank
    /// stronger than `rank`.
    pub fn next_strongest_rank(env: Env, rank: u64) -> Result<u64, LedgerError> {
        rank::next_strongest_rank(&env, rank)
    }

    /// Number of profiles holding `rank`.
    pub fn rank_occupancy(env: Env, rank: u64) -> u32 {
        rank::occupancy(&env, rank)
    }

    // ========== Admin Functions ==========

    /// Allow a second principal to set ranks (admin only).
    pub fn set_rank_manager(env: Env, manager: Address) -> Result<(), LedgerError> {
        Self::require_admin(&env)?;
        storage::write_rank_manager(&env, &manager);
        Ok(())
    }

    pub fn set_unstake_delay(env: Env, seconds: u64) -> Result<(), LedgerError> {
        Self::require_admin(&env)?;
        let mut state = storage::read_state(&env)?;
        state.unstake_delay = seconds;
        storage::write_state(&env, &state);
        Ok(())
    }

    pub fn pause(env: Env) -> Result<(), LedgerError> {
        Self::set_paused(&env, true)
    }

    pub fn unpause(env: Env) -> Result<(), LedgerError> {
        Self::set_paused(&env, false)
    }

    /// Lock an account out of activity (admin only).
    pub fn lock(env: Env, account: Address) -> Result<(), LedgerError> {
        Self::require_admin(&env)?;
        permit::lock(&env, &account);
        Ok(())
    }

    pub fn unlock(env: Env, account: Address) -> Result<(), LedgerError> {
        Self::require_admin(&env)?;
        permit::unlock(&env, &account)
    }

    pub fn is_locked(env: Env, account: Address) -> bool {
        permit::is_locked(&env, &account)
    }

    // ========== Internal Helpers ==========

    fn require_admin(env: &Env) -> Result<Address, LedgerError> {
        let admin = storage::read_admin(env)?;
        admin.require_auth();
        Ok(admin)
    }

    fn require_amount(amount: i128) -> Result<(), LedgerError> {
        if validation::validate_amount(amount) {
            Ok(())
        } else {
            Err(LedgerError::InvalidAmount)
        }
    }

    fn require_memo(memo: &String) -> Result<(), LedgerError> {
        if validation::validate_memo(memo) {
            Ok(())
        } else {
            Err(LedgerError::InvalidMemo)
        }
    }

    fn set_paused(env: &Env, paused: bool) -> Result<(), LedgerError> {
        Self::require_admin(env)?;
        let mut state = storage::read_state(env)?;
        state.paused = paused;
        storage::write_state(env, &state);

        emit_pause_changed(env, paused);
        Ok(())
    }
}
