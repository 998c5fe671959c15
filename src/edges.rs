//! Verification and referral edges between accounts.

use soroban_sdk::{contracttype, Address, Env, Vec};

use crate::events::*;
use crate::storage::{self, LedgerKey};
use crate::store::now;
use crate::LedgerError;

/// One account vouching for another.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Verification {
    pub id: u64,
    pub verifier: Address,
    pub verified: Address,
    pub verified_at: u64,
}

fn read_verification(env: &Env, id: u64) -> Option<Verification> {
    env.storage().persistent().get(&LedgerKey::Verification(id))
}

fn next_verification_id(env: &Env) -> u64 {
    let id: u64 = env
        .storage()
        .persistent()
        .get(&LedgerKey::NextVerificationId)
        .unwrap_or(0);
    storage::write_entry(env, &LedgerKey::NextVerificationId, &(id + 1));
    id
}

fn drop_id(env: &Env, key: &LedgerKey, id: u64) {
    let mut ids = storage::read_ids(env, key);
    if let Some(i) = ids.first_index_of(id) {
        ids.remove(i);
        storage::write_ids(env, key, &ids);
    }
}

/// Record that `verifier` verified `target`. Each ordered pair is recorded
/// at most once.
pub fn verify_user(env: &Env, verifier: &Address, target: &Address) -> Result<u64, LedgerError> {
    let by_verifier = LedgerKey::VerifierIndex(verifier.clone());
    let mut ids = storage::read_ids(env, &by_verifier);

    for id in ids.iter() {
        if let Some(edge) = read_verification(env, id) {
            if edge.verified == *target {
                return Err(LedgerError::DuplicateEdge);
            }
        }
    }

    let id = next_verification_id(env);
    let edge = Verification {
        id,
        verifier: verifier.clone(),
        verified: target.clone(),
        verified_at: now(env),
    };
    storage::write_entry(env, &LedgerKey::Verification(id), &edge);

    ids.push_back(id);
    storage::write_ids(env, &by_verifier, &ids);

    let by_verified = LedgerKey::VerifiedIndex(target.clone());
    let mut ids = storage::read_ids(env, &by_verified);
    ids.push_back(id);
    storage::write_ids(env, &by_verified, &ids);

    emit_user_verified(env, verifier, target, id);
    Ok(id)
}

fn collect(env: &Env, key: &LedgerKey) -> Vec<Verification> {
    let mut edges = Vec::new(env);
    for id in storage::read_ids(env, key).iter() {
        if let Some(edge) = read_verification(env, id) {
            edges.push_back(edge);
        }
    }
    edges
}

/// Verifications recorded by `verifier`.
pub fn verifications_by(env: &Env, verifier: &Address) -> Vec<Verification> {
    collect(env, &LedgerKey::VerifierIndex(verifier.clone()))
}

/// Verifications naming `account` as the verified party.
pub fn verifications_of(env: &Env, account: &Address) -> Vec<Verification> {
    collect(env, &LedgerKey::VerifiedIndex(account.clone()))
}

/// Record that `referrer` referred `target`. An account is referred once.
pub fn referred(env: &Env, referrer: &Address, target: &Address) -> Result<(), LedgerError> {
    let key = LedgerKey::Referral(target.clone());
    if env.storage().persistent().has(&key) {
        return Err(LedgerError::DuplicateEdge);
    }

    storage::write_entry(env, &key, referrer);

    let by_referrer = LedgerKey::ReferrerIndex(referrer.clone());
    let mut referred = storage::read_addresses(env, &by_referrer);
    referred.push_back(target.clone());
    storage::write_addresses(env, &by_referrer, &referred);

    emit_user_referred(env, referrer, target);
    Ok(())
}

pub fn get_referrer(env: &Env, account: &Address) -> Option<Address> {
    env.storage()
        .persistent()
        .get(&LedgerKey::Referral(account.clone()))
}

/// Accounts referred by `referrer`.
pub fn referrals_by(env: &Env, referrer: &Address) -> Vec<Address> {
    storage::read_addresses(env, &LedgerKey::ReferrerIndex(referrer.clone()))
}

/// Delete every verification and referral edge naming `account` on either
/// side, keeping the counterpart indexes in step.
pub fn remove_all_for(env: &Env, account: &Address) {
    let by_verified = LedgerKey::VerifiedIndex(account.clone());
    for id in storage::read_ids(env, &by_verified).iter() {
        if let Some(edge) = read_verification(env, id) {
            drop_id(env, &LedgerKey::VerifierIndex(edge.verifier), id);
            storage::remove_entry(env, &LedgerKey::Verification(id));
        }
    }
    storage::remove_entry(env, &by_verified);

    let by_verifier = LedgerKey::VerifierIndex(account.clone());
    for id in storage::read_ids(env, &by_verifier).iter() {
        if let Some(edge) = read_verification(env, id) {
            drop_id(env, &LedgerKey::VerifiedIndex(edge.verified), id);
            storage::remove_entry(env, &LedgerKey::Verification(id));
        }
    }
    storage::remove_entry(env, &by_verifier);

    if let Some(referrer) = get_referrer(env, account) {
        storage::remove_entry(env, &LedgerKey::Referral(account.clone()));

        let by_referrer = LedgerKey::ReferrerIndex(referrer);
        let mut referred = storage::read_addresses(env, &by_referrer);
        if let Some(i) = referred.first_index_of(account) {
            referred.remove(i);
            storage::write_addresses(env, &by_referrer, &referred);
        }
    }

    let by_referrer = LedgerKey::ReferrerIndex(account.clone());
    for referred in storage::read_addresses(env, &by_referrer).iter() {
        storage::remove_entry(env, &LedgerKey::Referral(referred));
    }
    storage::remove_entry(env, &by_referrer);
}
