//! Token balances and the liquid/staked/unstaking buckets.
//!
//! The token table holds an account's total holdings. The profile's
//! `gft_balance` mirrors the spendable part of it and is moved in the same
//! invocation as the table entry, so the two never diverge: with nothing
//! staked or unstaking they are equal.

use soroban_sdk::{Address, Env};

use crate::events::*;
use crate::profile::ProfileV2;
use crate::state::{LedgerState, PendingUnstake, TokenStats};
use crate::storage::{self, LedgerKey};
use crate::store::{ensure_v2, now};
use crate::LedgerError;

/// Raw token-table balance, zero when no entry exists.
pub fn balance_of(env: &Env, account: &Address) -> i128 {
    storage::read_balance(env, account).unwrap_or(0)
}

/// Credit the token table only. A new entry for anyone but the issuer
/// counts as a new account.
pub fn credit_token_table(
    env: &Env,
    state: &mut LedgerState,
    stats: &TokenStats,
    owner: &Address,
    amount: i128,
) -> Result<(), LedgerError> {
    match storage::read_balance(env, owner) {
        Some(current) => {
            let credited = current.checked_add(amount).ok_or(LedgerError::InvalidAmount)?;
            storage::write_balance(env, owner, credited);
        }
        None => {
            if *owner != stats.issuer {
                state.account_count += 1;
            }
            storage::write_balance(env, owner, amount);
        }
    }
    Ok(())
}

/// Drop `owner`'s token entry and take its holdings out of circulation.
/// Returns the amount removed.
pub fn forfeit_token_table(
    env: &Env,
    state: &mut LedgerState,
    stats: &mut TokenStats,
    owner: &Address,
) -> i128 {
    let Some(held) = storage::read_balance(env, owner) else {
        return 0;
    };

    storage::remove_balance(env, owner);
    stats.supply -= held;
    if *owner != stats.issuer {
        state.account_count = state.account_count.saturating_sub(1);
    }
    held
}

/// Debit `owner`'s token entry and liquid mirror together.
pub fn sub_balance(env: &Env, owner: &Address, amount: i128) -> Result<(), LedgerError> {
    let current = balance_of(env, owner);
    if current < amount {
        return Err(LedgerError::InsufficientFunds);
    }

    let mut profile = storage::read_v2(env, owner).ok_or(LedgerError::ProfileNotUpgraded)?;
    if profile.gft_balance < amount {
        return Err(LedgerError::StakedFundsLocked);
    }

    storage::write_balance(env, owner, current - amount);
    profile.gft_balance -= amount;
    profile.touch(now(env));
    storage::write_v2(env, &profile);
    Ok(())
}

/// Credit `owner`'s token entry and liquid mirror together.
pub fn add_balance(
    env: &Env,
    state: &mut LedgerState,
    stats: &TokenStats,
    owner: &Address,
    amount: i128,
) -> Result<(), LedgerError> {
    let mut profile = storage::read_v2(env, owner).ok_or(LedgerError::ProfileNotUpgraded)?;

    credit_token_table(env, state, stats, owner, amount)?;
    profile.gft_balance += amount;
    profile.touch(now(env));
    storage::write_v2(env, &profile);
    Ok(())
}

/// Move liquid funds into the staked bucket.
pub fn stake(env: &Env, account: &Address, amount: i128) -> Result<ProfileV2, LedgerError> {
    let mut profile = ensure_v2(env, account)?;
    if profile.gft_balance < amount {
        return Err(LedgerError::InsufficientFunds);
    }

    profile.gft_balance -= amount;
    profile.staked_balance += amount;
    profile.touch(now(env));
    storage::write_v2(env, &profile);

    emit_staked(env, account, amount);
    Ok(profile)
}

pub fn read_pending_unstake(env: &Env, account: &Address) -> Option<PendingUnstake> {
    env.storage()
        .persistent()
        .get(&LedgerKey::PendingUnstake(account.clone()))
}

pub fn clear_pending_unstake(env: &Env, account: &Address) {
    storage::remove_entry(env, &LedgerKey::PendingUnstake(account.clone()));
}

/// Move staked funds into the unstaking bucket and schedule their release.
/// A new request adds to any pending amount and restarts the delay.
pub fn request_unstake(
    env: &Env,
    state: &LedgerState,
    account: &Address,
    amount: i128,
) -> Result<PendingUnstake, LedgerError> {
    let mut profile = ensure_v2(env, account)?;
    if profile.staked_balance < amount {
        return Err(LedgerError::InsufficientFunds);
    }

    let timestamp = now(env);
    let release_at = timestamp
        .checked_add(state.unstake_delay)
        .ok_or(LedgerError::InvalidAmount)?;
    let already = read_pending_unstake(env, account).map_or(0, |p| p.amount);
    let pending = PendingUnstake {
        amount: already.checked_add(amount).ok_or(LedgerError::InvalidAmount)?,
        release_at,
    };

    profile.staked_balance -= amount;
    profile.unstaking_balance += amount;
    profile.touch(timestamp);
    storage::write_v2(env, &profile);
    storage::write_entry(env, &LedgerKey::PendingUnstake(account.clone()), &pending);

    emit_unstake_requested(env, account, amount, pending.release_at);
    Ok(pending)
}

fn release_all(env: &Env, mut profile: ProfileV2) -> ProfileV2 {
    let released = profile.staked_balance + profile.unstaking_balance;
    profile.gft_balance += released;
    profile.staked_balance = 0;
    profile.unstaking_balance = 0;
    profile.touch(now(env));
    storage::write_v2(env, &profile);
    clear_pending_unstake(env, &profile.account);

    emit_unstaked(env, &profile.account, released);
    profile
}

/// Validate `amount` against the unstaking bucket, then release both the
/// staked and unstaking buckets in full.
pub fn unstake(env: &Env, account: &Address, amount: i128) -> Result<ProfileV2, LedgerError> {
    let profile = ensure_v2(env, account)?;
    if profile.unstaking_balance < amount {
        return Err(LedgerError::InsufficientUnstaking);
    }
    Ok(release_all(env, profile))
}

/// The delayed follow-up of `request_unstake`.
pub fn complete_unstake(env: &Env, account: &Address) -> Result<ProfileV2, LedgerError> {
    let pending = read_pending_unstake(env, account).ok_or(LedgerError::NotFound)?;
    if now(env) < pending.release_at {
        return Err(LedgerError::UnstakeNotReady);
    }
    unstake(env, account, pending.amount)
}

/// Release staked and unstaking funds immediately, without validation.
pub fn accel_unstake(env: &Env, account: &Address) -> Result<ProfileV2, LedgerError> {
    let profile = ensure_v2(env, account)?;
    Ok(release_all(env, profile))
}
