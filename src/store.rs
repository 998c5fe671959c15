//! Profile store: creation, migration gate, identity data and removal.
//!
//! Every mutating entry point calls [`ensure_v2`] (or [`upgrade`]) before it
//! reads a profile, so a legacy record is migrated on first touch and all
//! further logic sees only the current schema.

use soroban_sdk::{symbol_short, Address, Env, String, Symbol};

use crate::events::*;
use crate::profile::{ProfileV1, ProfileV2};
use crate::state::{LedgerState, TokenStats};
use crate::{balance, edges, rank, storage, validation, LedgerError};

pub fn now(env: &Env) -> u64 {
    env.ledger().timestamp()
}

pub fn exists_in_v1(env: &Env, account: &Address) -> bool {
    storage::has_v1(env, account)
}

pub fn exists_in_v2(env: &Env, account: &Address) -> bool {
    storage::has_v2(env, account)
}

pub fn exists(env: &Env, account: &Address) -> bool {
    exists_in_v1(env, account) || exists_in_v2(env, account)
}

/// Insert a zero-balance current profile.
pub fn create(
    env: &Env,
    account: &Address,
    idhash: String,
    id_expiration: String,
) -> Result<ProfileV2, LedgerError> {
    if exists(env, account) {
        return Err(LedgerError::AlreadyExists);
    }
    if !validation::validate_idhash(&idhash) {
        return Err(LedgerError::InvalidIdHash);
    }

    let profile = ProfileV2::new(env, account.clone(), idhash, id_expiration, now(env));
    storage::write_v2(env, &profile);
    rank::index_insert(env, profile.rank);

    emit_profile_created(env, account);
    Ok(profile)
}

/// Migrate a legacy record, if any. Returns whether a migration happened.
pub fn upgrade(env: &Env, account: &Address) -> bool {
    let Some(legacy) = storage::read_v1(env, account) else {
        return false;
    };

    let profile = ProfileV2::from_legacy(env, legacy, now(env));
    storage::write_v2(env, &profile);
    storage::remove_v1(env, account);
    rank::index_insert(env, profile.rank);

    emit_profile_upgraded(env, account);
    true
}

/// Migration gate: upgrade, then load the current record.
pub fn ensure_v2(env: &Env, account: &Address) -> Result<ProfileV2, LedgerError> {
    upgrade(env, account);
    storage::read_v2(env, account).ok_or(LedgerError::NotFound)
}

/// Update the identity hash in whichever schema holds the account.
pub fn set_idhash(
    env: &Env,
    account: &Address,
    idhash: String,
    id_expiration: String,
) -> Result<(), LedgerError> {
    if !validation::validate_idhash(&idhash) {
        return Err(LedgerError::InvalidIdHash);
    }

    if let Some(mut profile) = storage::read_v2(env, account) {
        profile.idhash = idhash;
        profile.id_expiration = id_expiration.clone();
        profile.touch(now(env));
        storage::write_v2(env, &profile);
    } else if let Some(mut legacy) = storage::read_v1(env, account) {
        legacy.idhash = idhash;
        legacy.id_expiration = id_expiration.clone();
        storage::write_v1(env, &legacy);
    } else {
        return Err(LedgerError::NotFound);
    }

    emit_idhash_set(env, account, &id_expiration);
    Ok(())
}

pub fn is_idhash_match(env: &Env, account: &Address, idhash: &String) -> Result<bool, LedgerError> {
    if let Some(profile) = storage::read_v2(env, account) {
        Ok(profile.idhash == *idhash)
    } else if let Some(legacy) = storage::read_v1(env, account) {
        Ok(legacy.idhash == *idhash)
    } else {
        Err(LedgerError::NotFound)
    }
}

pub fn set_info_url(env: &Env, account: &Address, url: String) -> Result<(), LedgerError> {
    if !validation::validate_info_url(&url) {
        return Err(LedgerError::InvalidInfoUrl);
    }

    let mut profile = ensure_v2(env, account)?;
    profile.info_url = url;
    profile.touch(now(env));
    storage::write_v2(env, &profile);

    emit_profile_updated(env, account, &symbol_short!("info_url"));
    Ok(())
}

/// Insert or replace one attribute.
pub fn set_attribute(env: &Env, account: &Address, key: Symbol, value: String) -> Result<(), LedgerError> {
    let mut profile = ensure_v2(env, account)?;
    profile.attributes.set(key.clone(), value);
    profile.touch(now(env));
    storage::write_v2(env, &profile);

    emit_profile_updated(env, account, &key);
    Ok(())
}

pub fn remove_attribute(env: &Env, account: &Address, key: Symbol) -> Result<(), LedgerError> {
    let mut profile = ensure_v2(env, account)?;
    if profile.attributes.remove(key.clone()).is_none() {
        return Err(LedgerError::NotFound);
    }
    profile.touch(now(env));
    storage::write_v2(env, &profile);

    emit_profile_updated(env, account, &key);
    Ok(())
}

/// Adjust `net_purchases` by `delta`. Accounts without a current profile are
/// ignored; the order book reports trades for any account.
pub fn adjust_net_purchases(env: &Env, account: &Address, delta: i128) {
    if let Some(mut profile) = storage::read_v2(env, account) {
        profile.net_purchases += delta;
        profile.touch(now(env));
        storage::write_v2(env, &profile);
    }
}

/// Seed a legacy record and credit its holdings to the token table.
#[allow(clippy::too_many_arguments)]
pub fn import_legacy(
    env: &Env,
    state: &mut LedgerState,
    stats: &mut TokenStats,
    account: &Address,
    idhash: String,
    id_expiration: String,
    gft_balance: i128,
    staked_balance: i128,
    unstaking_balance: i128,
) -> Result<ProfileV1, LedgerError> {
    if exists(env, account) {
        return Err(LedgerError::AlreadyExists);
    }
    if !validation::validate_opening_amount(gft_balance)
        || !validation::validate_opening_amount(staked_balance)
        || !validation::validate_opening_amount(unstaking_balance)
    {
        return Err(LedgerError::InvalidAmount);
    }
    if !validation::validate_idhash(&idhash) {
        return Err(LedgerError::InvalidIdHash);
    }

    let legacy = ProfileV1 {
        account: account.clone(),
        idhash,
        id_expiration,
        gft_balance,
        staked_balance,
        unstaking_balance,
    };
    storage::write_v1(env, &legacy);

    let total = gft_balance
        .checked_add(staked_balance)
        .and_then(|sum| sum.checked_add(unstaking_balance))
        .ok_or(LedgerError::InvalidAmount)?;
    stats.supply = stats.supply.checked_add(total).ok_or(LedgerError::InvalidAmount)?;
    balance::credit_token_table(env, state, stats, account, total)?;

    emit_legacy_imported(env, account, total);
    Ok(legacy)
}

/// Delete the account's profile in either schema, its token holdings, then
/// every edge and vote that references it.
pub fn remove_profile(
    env: &Env,
    state: &mut LedgerState,
    stats: &mut TokenStats,
    account: &Address,
) -> Result<(), LedgerError> {
    if storage::has_v1(env, account) {
        storage::remove_v1(env, account);
    } else if let Some(profile) = storage::read_v2(env, account) {
        rank::detach_votes(env, &profile);
        rank::index_remove(env, profile.rank);
        storage::remove_v2(env, account);
    } else {
        return Err(LedgerError::NotFound);
    }

    let forfeited = balance::forfeit_token_table(env, state, stats, account);
    balance::clear_pending_unstake(env, account);
    edges::remove_all_for(env, account);

    emit_profile_removed(env, account, forfeited);
    Ok(())
}
