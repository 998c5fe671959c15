//! Rank engine: promotion votes, the promotion algorithm and the rank index.
//!
//! Ranks are ordered numerically with lower meaning stronger; 0 is the unset
//! sentinel. The rank index maps each rank to the number of current profiles
//! holding it and is rewritten in the same invocation as every rank change.

use soroban_sdk::{log, Address, Env, Map, Vec};

use crate::events::*;
use crate::profile::ProfileV2;
use crate::store::{ensure_v2, now, upgrade};
use crate::{storage, LedgerError};

/// Strongest attainable rank.
pub const CEILING_RANK: u64 = 1;

/// Sentinel for "no rank".
pub const UNSET_RANK: u64 = 0;

/// Occupancy of one rank among a candidate's voters.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct RankTier {
    pub rank: u64,
    /// Profiles currently holding `rank`.
    pub occupants: u32,
    /// The candidate's voters holding `rank`.
    pub votes: u32,
}

impl RankTier {
    /// Rank the candidate could take in this tier: each occupant that did not
    /// vote for the candidate keeps a slot ahead of it.
    pub fn eligible_rank(&self) -> u64 {
        self.rank + u64::from(self.occupants.saturating_sub(self.votes))
    }
}

/// Best (numerically lowest) eligible rank over ranked tiers. Tiers at the
/// unset rank carry no standing and are skipped.
pub fn best_eligible_rank<I>(tiers: I) -> Option<u64>
where
    I: IntoIterator<Item = RankTier>,
{
    tiers
        .into_iter()
        .filter(|tier| tier.rank != UNSET_RANK)
        .map(|tier| tier.eligible_rank())
        .min()
}

// ========== Rank index ==========

pub fn index_insert(env: &Env, rank: u64) {
    let mut index = storage::read_rank_index(env);
    let count = index.get(rank).unwrap_or(0);
    index.set(rank, count + 1);
    storage::write_rank_index(env, &index);
}

pub fn index_remove(env: &Env, rank: u64) {
    let mut index = storage::read_rank_index(env);
    match index.get(rank) {
        Some(count) if count > 1 => index.set(rank, count - 1),
        Some(_) => {
            index.remove(rank);
        }
        None => return,
    }
    storage::write_rank_index(env, &index);
}

fn index_move(env: &Env, from: u64, to: u64) {
    if from != to {
        index_remove(env, from);
        index_insert(env, to);
    }
}

/// Number of current profiles at `rank`.
pub fn occupancy(env: &Env, rank: u64) -> u32 {
    storage::read_rank_index(env).get(rank).unwrap_or(0)
}

/// For `rank == 0`, the strongest rank held by anyone; otherwise the closest
/// held rank that is stronger than `rank`.
pub fn next_strongest_rank(env: &Env, rank: u64) -> Result<u64, LedgerError> {
    let index = storage::read_rank_index(env);
    let mut stronger = None;

    // Keys ascend, one per distinct held rank; the walk ends at the first
    // key that is not stronger than `rank`.
    for held in index.keys().iter() {
        if held == UNSET_RANK {
            continue;
        }
        if rank == UNSET_RANK {
            return Ok(held);
        }
        if held >= rank {
            break;
        }
        stronger = Some(held);
    }

    stronger.ok_or(LedgerError::NotFound)
}

// ========== Votes ==========

fn remove_all(list: &mut Vec<Address>, account: &Address) {
    while let Some(i) = list.first_index_of(account) {
        list.remove(i);
    }
}

/// Record `voter`'s vote for `candidate` and re-evaluate the candidate.
///
/// The promotion runs in the same invocation; a vote that does not lead to
/// a promotion is rejected together with the promotion.
pub fn vote_to_promote(env: &Env, voter: &Address, candidate: &Address) -> Result<u64, LedgerError> {
    upgrade(env, voter);
    upgrade(env, candidate);

    if voter == candidate {
        return Err(LedgerError::SelfVote);
    }

    let mut voter_profile = storage::read_v2(env, voter).ok_or(LedgerError::NotFound)?;
    let mut candidate_profile = storage::read_v2(env, candidate).ok_or(LedgerError::NotFound)?;

    if voter_profile.voted_for.contains(candidate) {
        return Err(LedgerError::DuplicateEdge);
    }

    let timestamp = now(env);
    voter_profile.voted_for.push_back(candidate.clone());
    voter_profile.touch(timestamp);
    candidate_profile.promotion_votes.push_back(voter.clone());
    candidate_profile.touch(timestamp);

    storage::write_v2(env, &voter_profile);
    storage::write_v2(env, &candidate_profile);
    emit_promotion_vote(env, voter, candidate);

    promote(env, candidate)
}

/// Withdraw `voter`'s vote for `candidate` from both lists. Ranks are not
/// re-evaluated.
pub fn unvote(env: &Env, voter: &Address, candidate: &Address) -> Result<(), LedgerError> {
    upgrade(env, voter);
    upgrade(env, candidate);

    let mut voter_profile = storage::read_v2(env, voter).ok_or(LedgerError::NotFound)?;
    let mut candidate_profile = storage::read_v2(env, candidate).ok_or(LedgerError::NotFound)?;

    if voter == candidate {
        return Ok(());
    }

    let timestamp = now(env);
    remove_all(&mut voter_profile.voted_for, candidate);
    voter_profile.touch(timestamp);
    remove_all(&mut candidate_profile.promotion_votes, voter);
    candidate_profile.touch(timestamp);

    storage::write_v2(env, &voter_profile);
    storage::write_v2(env, &candidate_profile);
    emit_promotion_unvote(env, voter, candidate);
    Ok(())
}

/// Drop every vote a departing profile cast or received from the
/// counterpart profiles.
pub fn detach_votes(env: &Env, profile: &ProfileV2) {
    let account = &profile.account;

    for candidate in profile.voted_for.iter() {
        if let Some(mut other) = storage::read_v2(env, &candidate) {
            remove_all(&mut other.promotion_votes, account);
            storage::write_v2(env, &other);
        }
    }

    for voter in profile.promotion_votes.iter() {
        if let Some(mut other) = storage::read_v2(env, &voter) {
            remove_all(&mut other.voted_for, account);
            storage::write_v2(env, &other);
        }
    }
}

// ========== Promotion ==========

/// Move `account` to the best rank its voters make it eligible for.
pub fn promote(env: &Env, account: &Address) -> Result<u64, LedgerError> {
    let mut profile = storage::read_v2(env, account).ok_or(LedgerError::NotFound)?;

    if profile.promotion_votes.is_empty() {
        return Err(LedgerError::NoVotes);
    }
    if profile.rank == CEILING_RANK {
        return Err(LedgerError::AtCeiling);
    }

    log!(env, "promoting", account.clone(), profile.rank);

    let mut votes_by_rank: Map<u64, u32> = Map::new(env);
    for voter in profile.promotion_votes.iter() {
        if let Some(voter_profile) = storage::read_v2(env, &voter) {
            let votes = votes_by_rank.get(voter_profile.rank).unwrap_or(0);
            votes_by_rank.set(voter_profile.rank, votes + 1);
        }
    }

    let index = storage::read_rank_index(env);
    let tiers = votes_by_rank.iter().map(|(rank, votes)| {
        let tier = RankTier {
            rank,
            occupants: index.get(rank).unwrap_or(0),
            votes,
        };
        log!(env, "rank tier", rank, tier.occupants, votes);
        tier
    });
    let best = best_eligible_rank(tiers).ok_or(LedgerError::InsufficientVotes)?;

    log!(env, "best eligible rank", best);

    if profile.rank != UNSET_RANK && best >= profile.rank {
        return Err(LedgerError::InsufficientVotes);
    }

    let old_rank = profile.rank;
    index_move(env, old_rank, best);
    profile.rank = best;
    profile.touch(now(env));
    storage::write_v2(env, &profile);

    emit_rank_changed(env, account, old_rank, best);
    Ok(best)
}

/// Administrative override of a profile's rank.
pub fn set_rank(env: &Env, account: &Address, rank: u64) -> Result<(), LedgerError> {
    let mut profile = ensure_v2(env, account)?;

    let old_rank = profile.rank;
    index_move(env, old_rank, rank);
    profile.rank = rank;
    profile.touch(now(env));
    storage::write_v2(env, &profile);

    emit_rank_changed(env, account, old_rank, rank);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tier(rank: u64, occupants: u32, votes: u32) -> RankTier {
        RankTier {
            rank,
            occupants,
            votes,
        }
    }

    #[test]
    fn test_full_tier_support_takes_the_tier() {
        // Both profiles at rank 10 voted: no slot is contested.
        assert_eq!(best_eligible_rank([tier(10, 2, 2)]), Some(10));
    }

    #[test]
    fn test_partial_support_lands_behind_holdouts() {
        assert_eq!(best_eligible_rank([tier(10, 5, 2)]), Some(13));
        assert_eq!(best_eligible_rank([tier(10, 2, 1)]), Some(11));
    }

    #[test]
    fn test_best_tier_wins() {
        let tiers = [tier(20, 1, 1), tier(5, 10, 1), tier(8, 3, 2)];
        // 20 + 0, 5 + 9, 8 + 1
        assert_eq!(best_eligible_rank(tiers), Some(9));
    }

    #[test]
    fn test_unset_tier_is_ignored() {
        assert_eq!(best_eligible_rank([tier(UNSET_RANK, 4, 4)]), None);
        assert_eq!(
            best_eligible_rank([tier(UNSET_RANK, 1, 1), tier(30, 1, 1)]),
            Some(30)
        );
        assert_eq!(best_eligible_rank(core::iter::empty()), None);
    }

    #[test]
    fn test_ceiling_is_reachable() {
        assert_eq!(tier(1, 1, 1).eligible_rank(), CEILING_RANK);
    }

    #[test]
    fn test_stale_occupancy_never_underflows() {
        assert_eq!(tier(7, 1, 3).eligible_rank(), 7);
    }
}
