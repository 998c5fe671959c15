//! Event emission helpers for the reputation ledger.

use soroban_sdk::{Address, Env, String, Symbol};

/// Emit an event when a profile is created.
pub fn emit_profile_created(env: &Env, account: &Address) {
    let topics = (Symbol::new(env, "profile_created"),);
    env.events().publish(topics, account.clone());
}

/// Emit an event when a legacy profile is migrated to the current schema.
pub fn emit_profile_upgraded(env: &Env, account: &Address) {
    let topics = (Symbol::new(env, "profile_upgraded"),);
    env.events().publish(topics, account.clone());
}

/// Emit an event when a legacy profile is imported.
pub fn emit_legacy_imported(env: &Env, account: &Address, total: i128) {
    let topics = (Symbol::new(env, "legacy_imported"),);
    env.events().publish(topics, (account.clone(), total));
}

/// Emit an event when a profile and its edges are removed.
pub fn emit_profile_removed(env: &Env, account: &Address, forfeited: i128) {
    let topics = (Symbol::new(env, "profile_removed"),);
    env.events().publish(topics, (account.clone(), forfeited));
}

pub fn emit_idhash_set(env: &Env, account: &Address, id_expiration: &String) {
    let topics = (Symbol::new(env, "idhash_set"),);
    env.events().publish(topics, (account.clone(), id_expiration.clone()));
}

pub fn emit_profile_updated(env: &Env, account: &Address, field: &Symbol) {
    let topics = (Symbol::new(env, "profile_updated"),);
    env.events().publish(topics, (account.clone(), field.clone()));
}

/// Emit an event when a verification edge is recorded.
pub fn emit_user_verified(env: &Env, verifier: &Address, verified: &Address, id: u64) {
    let topics = (Symbol::new(env, "user_verified"), verifier.clone());
    env.events().publish(topics, (verified.clone(), id));
}

/// Emit an event when a referral edge is recorded.
pub fn emit_user_referred(env: &Env, referrer: &Address, referred: &Address) {
    let topics = (Symbol::new(env, "user_referred"), referrer.clone());
    env.events().publish(topics, referred.clone());
}

pub fn emit_staked(env: &Env, account: &Address, amount: i128) {
    let topics = (Symbol::new(env, "staked"), account.clone());
    env.events().publish(topics, amount);
}

pub fn emit_unstake_requested(env: &Env, account: &Address, amount: i128, release_at: u64) {
    let topics = (Symbol::new(env, "unstake_requested"), account.clone());
    env.events().publish(topics, (amount, release_at));
}

/// Emit an event when staked and unstaking funds return to the liquid balance.
pub fn emit_unstaked(env: &Env, account: &Address, released: i128) {
    let topics = (Symbol::new(env, "unstaked"), account.clone());
    env.events().publish(topics, released);
}

pub fn emit_promotion_vote(env: &Env, voter: &Address, candidate: &Address) {
    let topics = (Symbol::new(env, "promotion_vote"), voter.clone());
    env.events().publish(topics, candidate.clone());
}

pub fn emit_promotion_unvote(env: &Env, voter: &Address, candidate: &Address) {
    let topics = (Symbol::new(env, "promotion_unvote"), voter.clone());
    env.events().publish(topics, candidate.clone());
}

/// Emit an event when a profile's rank changes.
pub fn emit_rank_changed(env: &Env, account: &Address, old_rank: u64, new_rank: u64) {
    let topics = (Symbol::new(env, "rank_changed"), account.clone());
    env.events().publish(topics, (old_rank, new_rank));
}

pub fn emit_issued(env: &Env, to: &Address, amount: i128, memo: &String) {
    let topics = (Symbol::new(env, "issue"), to.clone());
    env.events().publish(topics, (amount, memo.clone()));
}

pub fn emit_transferred(env: &Env, from: &Address, to: &Address, amount: i128, memo: &String) {
    let topics = (Symbol::new(env, "transfer"), from.clone(), to.clone());
    env.events().publish(topics, (amount, memo.clone()));
}

pub fn emit_retired(env: &Env, amount: i128, memo: &String) {
    let topics = (Symbol::new(env, "retire"),);
    env.events().publish(topics, (amount, memo.clone()));
}

pub fn emit_lock_changed(env: &Env, account: &Address, locked: bool) {
    let topics = (Symbol::new(env, "lock_changed"), account.clone());
    env.events().publish(topics, locked);
}

pub fn emit_pause_changed(env: &Env, paused: bool) {
    let topics = (Symbol::new(env, "pause_changed"),);
    env.events().publish(topics, paused);
}
