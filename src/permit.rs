//! Activity permission: the capability check that gates user activity.

use soroban_sdk::{Address, Env};

use crate::events::*;
use crate::state::LedgerState;
use crate::storage::{self, LedgerKey};
use crate::LedgerError;

pub fn is_locked(env: &Env, account: &Address) -> bool {
    env.storage()
        .persistent()
        .has(&LedgerKey::Lock(account.clone()))
}

/// Fail unless the contract is running and `account` is not locked.
pub fn require_activity(env: &Env, state: &LedgerState, account: &Address) -> Result<(), LedgerError> {
    if state.paused {
        return Err(LedgerError::ContractPaused);
    }
    if is_locked(env, account) {
        return Err(LedgerError::AccountLocked);
    }
    Ok(())
}

pub fn lock(env: &Env, account: &Address) {
    storage::write_entry(env, &LedgerKey::Lock(account.clone()), &true);
    emit_lock_changed(env, account, true);
}

pub fn unlock(env: &Env, account: &Address) -> Result<(), LedgerError> {
    if !is_locked(env, account) {
        return Err(LedgerError::NotFound);
    }
    storage::remove_entry(env, &LedgerKey::Lock(account.clone()));
    emit_lock_changed(env, account, false);
    Ok(())
}
